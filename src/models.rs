// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Current persisted format version. Blobs written before versioning load as 0.
pub const STORE_FORMAT_VERSION: u32 = 1;

pub const DEFAULT_CATEGORY: &str = "other";
pub const DEFAULT_CATEGORY_ICON: &str = "fas fa-folder";
pub const OTHER_SERVICE: &str = "other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String, // Plaintext
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default = "default_category", deserialize_with = "null_as_default_category")]
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Timestamp used for ordering: `updatedAt`, falling back to `createdAt`.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
            && !self.service_name.trim().is_empty()
            && !self.username.trim().is_empty()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |expires| expires < now)
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

// Stored blobs may carry `null` where a field was never filled in
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

// Older writers used numeric timestamps as ids
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    fn new(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }

    pub fn builtin() -> Vec<Category> {
        vec![
            Category::new("personal", "Personal", "fas fa-user"),
            Category::new("work", "Work", "fas fa-briefcase"),
            Category::new("social", "Social Media", "fas fa-share-alt"),
            Category::new("financial", "Financial", "fas fa-wallet"),
            Category::new(DEFAULT_CATEGORY, "Other", DEFAULT_CATEGORY_ICON),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(alias = "autoLock")]
    pub auto_lock_minutes: u32,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_lock_minutes: 5,
            theme: "light".to_string(),
        }
    }
}

/// Everything that is persisted, serialized as one blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub version: u32,
    pub entries: Vec<CredentialRecord>,
    pub categories: Vec<Category>,
    pub settings: Settings,
    // Unknown top-level fields from a newer or foreign writer
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            entries: Vec::new(),
            categories: Category::builtin(),
            settings: Settings::default(),
            extra: Map::new(),
        }
    }
}

/// Caller-supplied fields for create and update.
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    pub service: String,
    pub service_name: String,
    pub category: Option<String>,
    pub username: String,
    pub password: String,
    pub notes: Option<String>,
    pub expires_in_days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub service: Option<String>,
    pub category: Option<String>,
    pub search_term: Option<String>,
    pub sort: SortOrder,
}

impl RecordFilter {
    pub fn matches(&self, record: &CredentialRecord) -> bool {
        if !selector_matches(self.service.as_deref(), &record.service) {
            return false;
        }
        if !selector_matches(self.category.as_deref(), &record.category) {
            return false;
        }

        match self.search_term.as_deref().filter(|term| !term.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                record.service_name.to_lowercase().contains(&term)
                    || record.username.to_lowercase().contains(&term)
                    || record.notes.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

// `None` and "all" both mean no restriction
fn selector_matches(selector: Option<&str>, value: &str) -> bool {
    match selector {
        None | Some("all") => true,
        Some(wanted) => wanted == value,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub total: usize,
    pub weak: usize,
    pub expired: usize,
}

// Password generation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordGenerationOptions {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
}

impl PasswordGenerationOptions {
    /// All four character classes enabled.
    pub fn with_length(length: usize) -> Self {
        Self {
            length,
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(service_name: &str, username: &str, notes: &str) -> CredentialRecord {
        CredentialRecord {
            id: "1".into(),
            service: "google".into(),
            service_name: service_name.into(),
            username: username.into(),
            password: "pw".into(),
            notes: notes.into(),
            category: "personal".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn record_uses_camel_case_field_names() {
        let json = serde_json::to_value(record("Google", "me", "")).unwrap();
        assert!(json.get("serviceName").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn missing_category_defaults_to_other() {
        let json = r#"{"id":"7","serviceName":"X","username":"u","createdAt":"2024-01-01T00:00:00Z"}"#;
        let parsed: CredentialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.category, DEFAULT_CATEGORY);
        assert_eq!(parsed.last_modified(), parsed.created_at);
    }

    #[test]
    fn whitespace_only_username_is_invalid() {
        assert!(record("Google", "me", "").is_valid());
        assert!(!record("Google", "   ", "").is_valid());
        assert!(!record("", "me", "").is_valid());
    }

    #[test]
    fn legacy_auto_lock_key_is_accepted() {
        let settings: Settings = serde_json::from_str(r#"{"autoLock":15}"#).unwrap();
        assert_eq!(settings.auto_lock_minutes, 15);
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn filter_search_is_case_insensitive_across_fields() {
        let rec = record("GitHub", "octo@example.com", "Work laptop key");
        let by = |term: &str| RecordFilter {
            search_term: Some(term.into()),
            ..Default::default()
        };
        assert!(by("github").matches(&rec));
        assert!(by("OCTO").matches(&rec));
        assert!(by("laptop").matches(&rec));
        assert!(!by("gitlab").matches(&rec));
    }

    #[test]
    fn all_selector_matches_everything() {
        let rec = record("Google", "me", "");
        let filter = RecordFilter {
            service: Some("all".into()),
            category: Some("personal".into()),
            ..Default::default()
        };
        assert!(filter.matches(&rec));

        let filter = RecordFilter {
            category: Some("work".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&rec));
    }
}
