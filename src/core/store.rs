// src/core/store.rs
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::core::config::Config;
use crate::generators::strength;
use crate::models::{
    Category, CredentialRecord, DashboardCounts, RecordFilter, RecordInput, Settings, SortOrder,
    StoreData, DEFAULT_CATEGORY, DEFAULT_CATEGORY_ICON, OTHER_SERVICE, STORE_FORMAT_VERSION,
};
use crate::storage::{StorageBackend, StorageError};

pub const DEFAULT_STORAGE_KEY: &str = "securePasswordManagerData";
pub const DEFAULT_EXPIRATION_DAYS: u32 = 90;
pub const DEFAULT_RECENT_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Malformed state: {0}")]
    MalformedState(String),
}

impl From<StorageError> for StoreError {
    fn from(error: StorageError) -> Self {
        StoreError::Persistence(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::MalformedState(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// What `load` found in the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing persisted yet; in-memory state untouched.
    Absent,
    /// Blob merged over the in-memory state. `dropped` entries failed validation.
    Loaded { entries: usize, dropped: usize },
    /// Blob was unreadable and has been replaced by an empty entry list.
    Discarded { reason: String },
}

// Trimmed, defaulted form of a RecordInput
struct ValidatedInput {
    service: String,
    service_name: String,
    category: String,
    username: String,
    password: String,
    notes: String,
    expires_in_days: u32,
}

/// Owns the credential records and keeps the backend in step with them.
///
/// Every mutation is written through to the backend before it returns; a failed
/// write leaves the in-memory state as it was before the call.
pub struct RecordStore<B: StorageBackend> {
    backend: B,
    key: String,
    data: StoreData,
    default_expiration_days: u32,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            data: StoreData::default(),
            default_expiration_days: DEFAULT_EXPIRATION_DAYS,
        }
    }

    pub fn from_config(backend: B, config: &Config) -> Self {
        Self::new(backend)
            .with_key(&config.storage_key)
            .with_default_expiration_days(config.default_expiration_days)
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn with_default_expiration_days(mut self, days: u32) -> Self {
        if days > 0 {
            self.default_expiration_days = days;
        }
        self
    }

    /// Initializes and loads in one step, as a process does at startup.
    pub fn open(backend: B, config: &Config) -> Result<(Self, LoadOutcome)> {
        let mut store = Self::from_config(backend, config);
        store.initialize();
        let outcome = store.load()?;
        Ok((store, outcome))
    }

    /// Persists the current (default) state when the backend has nothing yet.
    /// Returns whether a fresh blob was written; failures are logged, not raised.
    pub fn initialize(&mut self) -> bool {
        match self.backend.get(&self.key) {
            Ok(Some(_)) => false,
            Ok(None) => match self.save() {
                Ok(()) => {
                    log::info!("Initialized empty credential store under '{}'", self.key);
                    true
                }
                Err(e) => {
                    log::error!("Failed to initialize credential store: {}", e);
                    false
                }
            },
            Err(e) => {
                log::warn!("Could not check for existing data: {}", e);
                false
            }
        }
    }

    pub fn load(&mut self) -> Result<LoadOutcome> {
        let raw = match self.backend.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(LoadOutcome::Absent),
        };

        let object = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(object)) => object,
            Ok(_) => return Ok(self.discard("stored data is not a JSON object".to_string())),
            Err(e) => return Ok(self.discard(e.to_string())),
        };

        Ok(self.merge(object))
    }

    fn discard(&mut self, reason: String) -> LoadOutcome {
        log::warn!("Error loading saved data, starting with fresh data: {}", reason);
        self.data.entries.clear();
        if let Err(e) = self.save() {
            log::error!("Failed to persist reset data: {}", e);
        }
        LoadOutcome::Discarded { reason }
    }

    // Loaded values win over the current ones when present
    fn merge(&mut self, mut object: Map<String, Value>) -> LoadOutcome {
        let version = object
            .remove("version")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        if version > u64::from(STORE_FORMAT_VERSION) {
            log::warn!(
                "Stored data has format version {} (newer than {}), loading best-effort",
                version,
                STORE_FORMAT_VERSION
            );
        } else if version < u64::from(STORE_FORMAT_VERSION) {
            log::info!("Upgrading stored data from format version {}", version);
        }

        let mut dropped = 0;
        if let Some(entries) = object.remove("entries") {
            self.data.entries = match entries {
                Value::Array(items) => {
                    let total = items.len();
                    let valid: Vec<CredentialRecord> = items
                        .into_iter()
                        .filter_map(|item| serde_json::from_value::<CredentialRecord>(item).ok())
                        .filter(CredentialRecord::is_valid)
                        .collect();
                    dropped = total - valid.len();
                    valid
                }
                _ => {
                    log::warn!("Stored entries are not a list, discarding them");
                    Vec::new()
                }
            };
        }
        if dropped > 0 {
            log::warn!("Dropped {} invalid entries while loading", dropped);
        }

        self.data.categories = match object.remove("categories") {
            Some(value) => serde_json::from_value::<Vec<Category>>(value).unwrap_or_else(|e| {
                log::warn!("Stored categories are malformed ({}), restoring built-ins", e);
                Category::builtin()
            }),
            None => Category::builtin(),
        };

        if let Some(value) = object.remove("settings") {
            match serde_json::from_value::<Settings>(value) {
                Ok(settings) => self.data.settings = settings,
                Err(e) => log::warn!("Stored settings are malformed ({}), keeping current", e),
            }
        }

        self.data.extra = object;

        log::info!("Loaded {} entries", self.data.entries.len());
        LoadOutcome::Loaded {
            entries: self.data.entries.len(),
            dropped,
        }
    }

    /// Writes the whole store and reads it back to confirm the write landed.
    pub fn save(&mut self) -> Result<()> {
        let before = self.data.entries.len();
        self.data.entries.retain(CredentialRecord::is_valid);
        if self.data.entries.len() < before {
            log::warn!("Dropped {} invalid entries before saving", before - self.data.entries.len());
        }
        self.data.version = STORE_FORMAT_VERSION;

        let result = self.write_verified();
        if let Err(e) = &result {
            log::error!("Error saving data: {}", e);
        }
        result
    }

    fn write_verified(&mut self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.data)?;
        self.backend.set(&self.key, &serialized)?;

        match self.backend.get(&self.key)? {
            Some(stored) if stored == serialized => Ok(()),
            Some(stored) if !stored.is_empty() => Err(StoreError::Persistence(
                "Saved data does not match what was written".into(),
            )),
            _ => Err(StoreError::Persistence("Failed to verify saved data".into())),
        }
    }

    // Save, restoring the snapshot if the write fails
    fn commit(&mut self, snapshot: StoreData) -> Result<()> {
        if let Err(e) = self.save() {
            self.data = snapshot;
            return Err(e);
        }
        Ok(())
    }

    fn validate(&self, input: RecordInput) -> Result<ValidatedInput> {
        let service_name = input.service_name.trim().to_string();
        if service_name.is_empty() {
            return Err(StoreError::Validation("Please enter a service name".into()));
        }

        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(StoreError::Validation("Username is required".into()));
        }

        let password = input.password.trim().to_string();
        if password.is_empty() {
            return Err(StoreError::Validation("Password is required".into()));
        }

        let service = match input.service.trim() {
            "" => OTHER_SERVICE.to_string(),
            service => service.to_string(),
        };

        let category = match input.category.as_deref().map(str::trim) {
            Some(id) if self.has_category(id) => id.to_string(),
            Some(id) if !id.is_empty() => {
                log::debug!("Unknown category '{}', using '{}'", id, DEFAULT_CATEGORY);
                DEFAULT_CATEGORY.to_string()
            }
            _ => DEFAULT_CATEGORY.to_string(),
        };

        let expires_in_days = match input.expires_in_days {
            Some(days) if days > 0 => days,
            _ => self.default_expiration_days,
        };

        Ok(ValidatedInput {
            service,
            service_name,
            category,
            username,
            password,
            notes: input.notes.unwrap_or_default().trim().to_string(),
            expires_in_days,
        })
    }

    fn expiry_from(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>> {
        Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| StoreError::Validation(format!("Expiration of {} days is out of range", days)))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    pub fn create(&mut self, input: RecordInput) -> Result<CredentialRecord> {
        let fields = self.validate(input)?;
        let now = Utc::now();
        let expires_at = Self::expiry_from(now, fields.expires_in_days)?;

        let record = CredentialRecord {
            id: self.fresh_id(),
            service: fields.service,
            service_name: fields.service_name,
            username: fields.username,
            password: fields.password,
            notes: fields.notes,
            category: fields.category,
            created_at: now,
            updated_at: Some(now),
            expires_at: Some(expires_at),
        };

        let snapshot = self.data.clone();
        self.data.entries.push(record.clone());
        self.commit(snapshot)?;

        log::info!("Created entry {} for {}", record.id, record.service_name);
        Ok(record)
    }

    pub fn update(&mut self, id: &str, input: RecordInput) -> Result<CredentialRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let fields = self.validate(input)?;

        let previous = self.data.entries[index].last_modified();
        let mut now = Utc::now();
        if now <= previous {
            // Clock did not move (or moved back); keep updatedAt strictly increasing
            now = previous + Duration::milliseconds(1);
        }
        let expires_at = Self::expiry_from(now, fields.expires_in_days)?;

        let snapshot = self.data.clone();
        let record = &mut self.data.entries[index];
        record.service = fields.service;
        record.service_name = fields.service_name;
        record.category = fields.category;
        record.username = fields.username;
        record.password = fields.password;
        record.notes = fields.notes;
        record.updated_at = Some(now);
        record.expires_at = Some(expires_at);
        let updated = record.clone();

        self.commit(snapshot)?;

        log::info!("Updated entry {}", id);
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<CredentialRecord> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let snapshot = self.data.clone();
        self.data.entries.retain(|entry| entry.id != id);
        self.commit(snapshot)?;

        log::info!("Deleted entry {}", id);
        Ok(removed)
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        let snapshot = self.data.clone();
        self.data.settings = settings;
        self.commit(snapshot)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.data.entries.iter().position(|entry| entry.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&CredentialRecord> {
        self.data.entries.iter().find(|entry| entry.id == id)
    }

    /// Filtered, sorted view. Equal timestamps keep insertion order.
    pub fn list(&self, filter: &RecordFilter) -> Vec<&CredentialRecord> {
        let mut matches: Vec<&CredentialRecord> = self
            .data
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        sort_by_modified(&mut matches, filter.sort);
        matches
    }

    /// The `n` most recently modified entries, ignoring any filter.
    pub fn recent(&self, n: usize) -> Vec<&CredentialRecord> {
        let mut entries: Vec<&CredentialRecord> = self.data.entries.iter().collect();
        sort_by_modified(&mut entries, SortOrder::Newest);
        entries.truncate(n);
        entries
    }

    pub fn dashboard_counts(&self) -> DashboardCounts {
        self.dashboard_counts_at(Utc::now())
    }

    pub fn dashboard_counts_at(&self, now: DateTime<Utc>) -> DashboardCounts {
        let entries = &self.data.entries;
        DashboardCounts {
            total: entries.len(),
            weak: entries
                .iter()
                .filter(|entry| strength::is_weak(&entry.password))
                .count(),
            expired: entries.iter().filter(|entry| entry.is_expired_at(now)).count(),
        }
    }

    fn has_category(&self, id: &str) -> bool {
        self.data.categories.iter().any(|category| category.id == id)
    }

    pub fn category_icon(&self, id: &str) -> &str {
        self.data
            .categories
            .iter()
            .find(|category| category.id == id)
            .map_or(DEFAULT_CATEGORY_ICON, |category| category.icon.as_str())
    }

    pub fn entries(&self) -> &[CredentialRecord] {
        &self.data.entries
    }

    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

fn sort_by_modified(entries: &mut [&CredentialRecord], order: SortOrder) {
    match order {
        SortOrder::Newest => entries.sort_by(|a, b| b.last_modified().cmp(&a.last_modified())),
        SortOrder::Oldest => entries.sort_by_key(|entry| entry.last_modified()),
    }
}
