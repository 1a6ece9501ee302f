// src/cli/handlers.rs
use std::error::Error;
use std::io::Write;

use chrono::{DateTime, Utc};

use crate::catalog;
use crate::cli::commands::EntryArgs;
use crate::core::store::RecordStore;
use crate::generators::{self, classify_strength, PasswordGenerator};
use crate::models::{
    CredentialRecord, PasswordGenerationOptions, RecordFilter, RecordInput, Settings, OTHER_SERVICE,
};
use crate::storage::StorageBackend;
use crate::utils::{format_expiry_at, format_time_ago_at, mask_password, truncate_string};

pub type HandlerResult = Result<(), Box<dyn Error>>;

/// Merges command-line fields over an existing record (for update) or defaults (for add).
pub fn build_input(args: &EntryArgs, existing: Option<&CredentialRecord>, password: String) -> RecordInput {
    let service = args
        .service
        .clone()
        .or_else(|| existing.map(|record| record.service.clone()))
        .unwrap_or_else(|| OTHER_SERVICE.to_string());

    let custom_name = args
        .name
        .clone()
        .or_else(|| existing.map(|record| record.service_name.clone()));
    let service_name = catalog::resolve_service_name(&service, custom_name.as_deref());

    RecordInput {
        service,
        service_name,
        category: args
            .category
            .clone()
            .or_else(|| existing.map(|record| record.category.clone())),
        username: args
            .username
            .clone()
            .or_else(|| existing.map(|record| record.username.clone()))
            .unwrap_or_default(),
        password,
        notes: args
            .notes
            .clone()
            .or_else(|| existing.map(|record| record.notes.clone())),
        expires_in_days: args.expires_in_days,
    }
}

fn write_entry_line<B: StorageBackend, W: Write>(
    store: &RecordStore<B>,
    record: &CredentialRecord,
    now: DateTime<Utc>,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{}  [{}] {:<20} {:<28} updated {}",
        record.id,
        store.category_icon(&record.category),
        truncate_string(&record.service_name, 20),
        truncate_string(&record.username, 28),
        format_time_ago_at(record.last_modified(), now),
    )
}

pub fn handle_add<B: StorageBackend, W: Write>(
    store: &mut RecordStore<B>,
    input: RecordInput,
    out: &mut W,
) -> HandlerResult {
    let record = store.create(input)?;
    writeln!(out, "✅ Entry saved successfully! ID: {}", record.id)?;
    Ok(())
}

pub fn handle_update<B: StorageBackend, W: Write>(
    store: &mut RecordStore<B>,
    id: &str,
    input: RecordInput,
    out: &mut W,
) -> HandlerResult {
    let record = store.update(id, input)?;
    writeln!(out, "✅ Entry updated successfully! ({})", record.service_name)?;
    Ok(())
}

pub fn handle_delete<B: StorageBackend, W: Write>(
    store: &mut RecordStore<B>,
    id: &str,
    out: &mut W,
) -> HandlerResult {
    let removed = store.delete(id)?;
    writeln!(out, "🗑️  Entry deleted successfully ({})", removed.service_name)?;
    Ok(())
}

pub fn handle_list<B: StorageBackend, W: Write>(
    store: &RecordStore<B>,
    filter: &RecordFilter,
    out: &mut W,
) -> HandlerResult {
    let entries = store.list(filter);
    if entries.is_empty() {
        writeln!(out, "No entries found")?;
        return Ok(());
    }

    let now = Utc::now();
    for record in entries {
        write_entry_line(store, record, now, out)?;
    }
    Ok(())
}

pub fn handle_recent<B: StorageBackend, W: Write>(
    store: &RecordStore<B>,
    count: usize,
    out: &mut W,
) -> HandlerResult {
    let entries = store.recent(count);
    if entries.is_empty() {
        writeln!(out, "No recent entries")?;
        return Ok(());
    }

    let now = Utc::now();
    for record in entries {
        write_entry_line(store, record, now, out)?;
    }
    Ok(())
}

pub fn handle_show<B: StorageBackend, W: Write>(
    store: &RecordStore<B>,
    id: &str,
    reveal: bool,
    out: &mut W,
) -> HandlerResult {
    let record = store
        .get(id)
        .ok_or_else(|| format!("Entry not found: {}", id))?;
    let now = Utc::now();

    writeln!(out, "🔑 {} ({})", record.service_name, record.service)?;
    writeln!(out, "   ID:       {}", record.id)?;
    writeln!(out, "   Username: {}", record.username)?;
    if reveal {
        writeln!(out, "   Password: {}", record.password)?;
    } else {
        writeln!(out, "   Password: {}", mask_password(&record.password))?;
    }
    writeln!(out, "   Strength: {}", classify_strength(&record.password))?;
    writeln!(out, "   Category: {}", record.category)?;
    if !record.notes.is_empty() {
        writeln!(out, "   Notes:    {}", record.notes)?;
    }
    writeln!(out, "   Created:  {}", record.created_at.to_rfc3339())?;
    writeln!(out, "   Updated:  {}", record.last_modified().to_rfc3339())?;
    if let Some(expires_at) = record.expires_at {
        writeln!(out, "   Expires:  {} ({})", expires_at.to_rfc3339(), format_expiry_at(expires_at, now))?;
    }
    Ok(())
}

pub fn handle_dashboard<B: StorageBackend, W: Write>(
    store: &RecordStore<B>,
    recent: usize,
    out: &mut W,
) -> HandlerResult {
    let counts = store.dashboard_counts();
    writeln!(out, "📊 Total passwords:   {}", counts.total)?;
    writeln!(out, "⚠️  Weak passwords:    {}", counts.weak)?;
    writeln!(out, "⏰ Expired passwords: {}", counts.expired)?;
    writeln!(out)?;
    writeln!(out, "Recent entries:")?;
    handle_recent(store, recent, out)
}

pub fn handle_categories<B: StorageBackend, W: Write>(
    store: &RecordStore<B>,
    out: &mut W,
) -> HandlerResult {
    for category in store.categories() {
        let count = store
            .entries()
            .iter()
            .filter(|record| record.category == category.id)
            .count();
        writeln!(out, "{:<10} {:<14} [{}] {} entries", category.id, category.name, category.icon, count)?;
    }
    Ok(())
}

pub fn handle_generate<W: Write>(
    options: &PasswordGenerationOptions,
    count: usize,
    out: &mut W,
) -> HandlerResult {
    let generator = PasswordGenerator::new();
    for _ in 0..count.max(1) {
        let generated = generator.generate_password(options)?;
        writeln!(
            out,
            "{}  ({})",
            generated.value,
            generator.analyze_password_strength(&generated.value)
        )?;
        if !generated.is_secure() {
            writeln!(out, "⚠️  Secure random source unavailable; this password used a weaker generator")?;
        }
    }
    Ok(())
}

pub fn handle_strength<W: Write>(password: &str, out: &mut W) -> HandlerResult {
    let strength = classify_strength(password);
    writeln!(out, "Strength: {}", strength)?;
    if generators::is_weak(password) {
        writeln!(out, "Counts as weak: use 8+ characters with an uppercase letter, a digit and a symbol")?;
    }
    Ok(())
}

pub fn handle_settings<B: StorageBackend, W: Write>(
    store: &mut RecordStore<B>,
    auto_lock: Option<u32>,
    theme: Option<String>,
    out: &mut W,
) -> HandlerResult {
    if auto_lock.is_some() || theme.is_some() {
        let current = store.settings();
        let settings = Settings {
            auto_lock_minutes: auto_lock.unwrap_or(current.auto_lock_minutes),
            theme: theme.unwrap_or_else(|| current.theme.clone()),
        };
        store.update_settings(settings)?;
        writeln!(out, "✅ Settings saved")?;
    }

    let settings = store.settings();
    writeln!(out, "Auto-lock: {} minutes", settings.auto_lock_minutes)?;
    writeln!(out, "Theme:     {}", settings.theme)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryBackend;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn args(username: &str) -> EntryArgs {
        EntryArgs {
            service: Some("github".into()),
            username: Some(username.into()),
            ..Default::default()
        }
    }

    #[test]
    fn build_input_resolves_catalog_names() {
        let input = build_input(&args("octo"), None, "pw".into());
        assert_eq!(input.service_name, "GitHub");
        assert_eq!(input.username, "octo");
    }

    #[test]
    fn build_input_keeps_existing_values_for_update() {
        let mut store = RecordStore::new(MemoryBackend::new());
        let mut first = build_input(&args("octo"), None, "pw".into());
        first.notes = Some("2FA on".into());
        let record = store.create(first).unwrap();

        let change = EntryArgs {
            category: Some("work".into()),
            ..Default::default()
        };
        let input = build_input(&change, Some(&record), record.password.clone());
        assert_eq!(input.service, "github");
        assert_eq!(input.service_name, "GitHub");
        assert_eq!(input.username, "octo");
        assert_eq!(input.notes.as_deref(), Some("2FA on"));
        assert_eq!(input.category.as_deref(), Some("work"));
    }

    #[test]
    fn add_list_and_delete_report_to_the_writer() {
        let mut store = RecordStore::new(MemoryBackend::new());
        let mut buf = Vec::new();
        handle_add(&mut store, build_input(&args("octo"), None, "pw".into()), &mut buf).unwrap();
        assert!(output(std::mem::take(&mut buf)).contains("Entry saved successfully"));

        handle_list(&store, &RecordFilter::default(), &mut buf).unwrap();
        let listing = output(std::mem::take(&mut buf));
        assert!(listing.contains("GitHub"));
        assert!(listing.contains("fas fa-folder"));

        let id = store.entries()[0].id.clone();
        handle_delete(&mut store, &id, &mut buf).unwrap();
        handle_list(&store, &RecordFilter::default(), &mut buf).unwrap();
        assert!(output(buf).ends_with("No entries found\n"));
    }

    #[test]
    fn add_surfaces_validation_errors() {
        let mut store = RecordStore::new(MemoryBackend::new());
        let mut buf = Vec::new();
        let err = handle_add(&mut store, build_input(&args(""), None, "pw".into()), &mut buf).unwrap_err();
        assert_eq!(err.to_string(), "Username is required");
    }

    #[test]
    fn show_masks_password_unless_revealed() {
        let mut store = RecordStore::new(MemoryBackend::new());
        let record = store
            .create(build_input(&args("octo"), None, "Secret123!".into()))
            .unwrap();

        let mut buf = Vec::new();
        handle_show(&store, &record.id, false, &mut buf).unwrap();
        assert!(!output(std::mem::take(&mut buf)).contains("Secret123!"));

        handle_show(&store, &record.id, true, &mut buf).unwrap();
        assert!(output(buf).contains("Secret123!"));
    }

    #[test]
    fn generate_prints_requested_number_of_candidates() {
        let mut buf = Vec::new();
        handle_generate(&PasswordGenerationOptions::with_length(20), 3, &mut buf).unwrap();
        assert_eq!(output(buf).lines().count(), 3);
    }

    #[test]
    fn settings_are_updated_and_printed() {
        let mut store = RecordStore::new(MemoryBackend::new());
        let mut buf = Vec::new();
        handle_settings(&mut store, Some(10), None, &mut buf).unwrap();
        let printed = output(buf);
        assert!(printed.contains("Auto-lock: 10 minutes"));
        assert!(printed.contains("Theme:     light"));
    }
}
