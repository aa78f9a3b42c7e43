//! Identity cache error types.

/// Cache error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CacheErrorKind {
    /// Connection failed
    #[display("Cache connection error: {}", _0)]
    Connection(String),
    /// Query execution failed
    #[display("Cache query error: {}", _0)]
    Query(String),
    /// Migration error
    #[display("Cache migration error: {}", _0)]
    Migration(String),
}

/// Cache error with source location tracking.
///
/// # Examples
///
/// ```
/// use rolesync_error::{CacheError, CacheErrorKind};
///
/// let err = CacheError::new(CacheErrorKind::Query("disk I/O error".into()));
/// assert!(format!("{}", err).contains("disk I/O"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cache Error: {} at line {} in {}", kind, line, file)]
pub struct CacheError {
    /// The kind of error that occurred
    pub kind: CacheErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CacheError {
    /// Create a new CacheError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CacheErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::result::Error> for CacheError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        CacheError::new(CacheErrorKind::Query(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for CacheError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        CacheError::new(CacheErrorKind::Connection(err.to_string()))
    }
}
