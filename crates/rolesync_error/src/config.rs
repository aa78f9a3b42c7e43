//! Configuration error types.

use std::fmt;

/// Configuration error with source location.
///
/// Raised while loading settings or the role catalog. Fatal at startup.
/// `subject` names what was being configured when it is known: the
/// environment variable of a missing credential, or the catalog file.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Variable name or file path the error is about
    pub subject: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolesync_error::ConfigError;
    ///
    /// let err = ConfigError::new("Duplicate threshold 100 in category 'siteop'");
    /// assert!(err.message.contains("Duplicate threshold"));
    /// assert!(err.subject.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            subject: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A required setting was not provided.
    ///
    /// ```
    /// use rolesync_error::ConfigError;
    ///
    /// let err = ConfigError::missing_variable("GUILD_ID");
    /// assert_eq!(err.subject.as_deref(), Some("GUILD_ID"));
    /// assert_eq!(err.message, "GUILD_ID is not set");
    /// ```
    #[track_caller]
    pub fn missing_variable(name: &str) -> Self {
        Self::new(format!("{} is not set", name)).with_subject(name)
    }

    /// Attach the variable or file this error concerns, keeping the location.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(
                f,
                "Configuration Error ({}): {} at line {} in {}",
                subject, self.message, self.line, self.file
            ),
            None => write!(
                f,
                "Configuration Error: {} at line {} in {}",
                self.message, self.line, self.file
            ),
        }
    }
}
