//! Embed rendering for sync outcomes.
//!
//! A [`ReportView`] is transport-neutral: the gateway bot turns it into a
//! serenity [`CreateEmbed`], the webhook serializes it straight into the
//! Discord embed JSON shape.

use rolesync_core::{Category, RoleId, SECURITY, SITEOP, SyncOutcome, SyncReport};
use serde::Serialize;
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter};

/// Embed colour while a request is in flight.
pub const PENDING_COLOUR: u32 = 0x3498DB;
/// Embed colour for a clean sync.
pub const SUCCESS_COLOUR: u32 = 0x2ECC71;
/// Embed colour when some roles could not be changed or points were missing.
pub const WARNING_COLOUR: u32 = 0xE67E22;
/// Embed colour when nothing could be done.
pub const FAILURE_COLOUR: u32 = 0xE74C3C;

/// Discord rejects embeds with a field value longer than this many characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// One embed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether Discord may lay the field out beside its neighbours.
    pub inline: bool,
}

impl EmbedField {
    fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

/// Rendered embed, serializable as a Discord embed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    /// Embed title.
    pub title: String,
    /// Optional description under the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sidebar colour.
    #[serde(rename = "color")]
    pub colour: u32,
    /// Body fields in display order.
    pub fields: Vec<EmbedField>,
    /// Optional footer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl ReportView {
    /// Convert to a serenity embed builder.
    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(self.title.clone())
            .colour(Colour::new(self.colour))
            .fields(
                self.fields
                    .iter()
                    .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
            );
        if let Some(description) = &self.description {
            embed = embed.description(description.clone());
        }
        if let Some(footer) = &self.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer.text.clone()));
        }
        embed
    }

    /// Discord embed JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Human label for a category.
pub fn category_label(category: &Category) -> String {
    match category.as_str() {
        SITEOP => "Site Operator".to_string(),
        SECURITY => "Security".to_string(),
        other => other.to_string(),
    }
}

/// Mention markup for a role.
pub fn role_mention(role: RoleId) -> String {
    format!("<@&{}>", role)
}

fn mention_list(roles: &[RoleId]) -> String {
    if roles.is_empty() {
        "None".to_string()
    } else {
        let mentions: Vec<String> = roles.iter().map(|role| role_mention(*role)).collect();
        fit_field(&mentions, ", ")
    }
}

/// Join `items` with `separator`, dropping the tail for an "…and N more"
/// marker once the value would pass [`FIELD_VALUE_LIMIT`].
///
/// ```
/// use rolesync_discord::render::{FIELD_VALUE_LIMIT, fit_field};
///
/// let items: Vec<String> = (0..500).map(|i| format!("role {}", i)).collect();
/// let value = fit_field(&items, "\n");
/// assert!(value.chars().count() <= FIELD_VALUE_LIMIT);
/// assert!(value.ends_with("more"));
/// ```
pub fn fit_field(items: &[String], separator: &str) -> String {
    let separator_len = separator.chars().count();
    let mut value = String::new();
    let mut len = 0;

    for (index, item) in items.iter().enumerate() {
        let joint = if value.is_empty() { 0 } else { separator_len };
        let remaining = items.len() - index - 1;
        let reserve = if remaining == 0 {
            0
        } else {
            separator_len + more_marker(remaining).chars().count()
        };

        let item_len = item.chars().count();
        if len + joint + item_len + reserve > FIELD_VALUE_LIMIT {
            if !value.is_empty() {
                value.push_str(separator);
            }
            value.push_str(&more_marker(items.len() - index));
            return value;
        }

        if joint > 0 {
            value.push_str(separator);
        }
        value.push_str(item);
        len += joint + item_len;
    }
    value
}

fn more_marker(count: usize) -> String {
    format!("…and {} more", count)
}

fn footer(requested_by: &str) -> Option<EmbedFooter> {
    Some(EmbedFooter {
        text: format!("Requested by {}", requested_by),
    })
}

/// Placeholder shown while the sync runs.
pub fn updating_view(requested_by: &str) -> ReportView {
    ReportView {
        title: "Updating Roles".to_string(),
        description: Some("Checking your Roblox points...".to_string()),
        colour: PENDING_COLOUR,
        fields: Vec::new(),
        footer: footer(requested_by),
    }
}

/// Final embed for a finished request.
pub fn outcome_view(outcome: &SyncOutcome, requested_by: &str) -> ReportView {
    match outcome {
        SyncOutcome::NotLinked { .. } => ReportView {
            title: "Update Failed".to_string(),
            description: Some("Could not find a linked Roblox account.".to_string()),
            colour: FAILURE_COLOUR,
            fields: Vec::new(),
            footer: footer(requested_by),
        },
        SyncOutcome::Synced(report) => report_view(report, requested_by),
    }
}

fn report_view(report: &SyncReport, requested_by: &str) -> ReportView {
    let mut fields: Vec<EmbedField> = report
        .desired_roles()
        .iter()
        .map(|(category, role)| {
            let points = report.points().get(category.as_str());
            let target = role.map_or_else(|| "None".to_string(), role_mention);
            EmbedField::new(
                category_label(category),
                format!("{} → {}", points, target),
                true,
            )
        })
        .collect();
    fields.sort_by_key(|field| match field.name.as_str() {
        "Site Operator" => 0,
        "Security" => 1,
        _ => 2,
    });

    fields.push(EmbedField::new("Added", mention_list(report.added()), false));
    fields.push(EmbedField::new("Removed", mention_list(report.removed()), false));

    if !report.failures().is_empty() {
        let lines: Vec<String> = report
            .failures()
            .iter()
            .map(|f| {
                format!(
                    "{} ({}): {}",
                    role_mention(*f.role_id()),
                    f.operation(),
                    f.reason()
                )
            })
            .collect();
        fields.push(EmbedField::new("Failed", fit_field(&lines, "\n"), false));
    }

    let description = (*report.points_fallback())
        .then(|| "Points could not be fetched, so they were treated as 0.".to_string());

    let colour = if *report.points_fallback() || !report.failures().is_empty() {
        WARNING_COLOUR
    } else {
        SUCCESS_COLOUR
    };

    ReportView {
        title: "Roles Updated".to_string(),
        description,
        colour,
        fields,
        footer: footer(requested_by),
    }
}
