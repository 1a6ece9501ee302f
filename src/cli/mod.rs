// src/cli/mod.rs
use std::error::Error;
use std::io::Write;

use clap::Parser;

pub mod commands;
pub mod handlers;

pub use commands::{CliCommand, EntryArgs};

use crate::core::{Config, LoadOutcome, RecordStore};
use crate::generators::PasswordGenerator;
use crate::models::{PasswordGenerationOptions, RecordFilter, SortOrder};
use crate::storage::StorageBackend;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Storage URL: "memory:" or "file:<directory>"
    #[arg(long, env = "CREDVAULT_STORAGE")]
    pub storage: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Warns on stderr when the stored data could not be read and was reset.
pub fn report_load_outcome(outcome: &LoadOutcome) {
    if let LoadOutcome::Discarded { reason } = outcome {
        eprintln!("⚠️  Error loading saved data. Starting with fresh data. ({})", reason);
    }
}

fn resolve_password(args: &EntryArgs, config: &Config) -> Result<Option<String>, Box<dyn Error>> {
    if let Some(password) = &args.password {
        return Ok(Some(password.clone()));
    }

    if args.generate {
        let options = PasswordGenerationOptions::with_length(config.default_password_length);
        let generated = PasswordGenerator::new().generate_password(&options)?;
        if !generated.is_secure() {
            eprintln!("⚠️  Secure random source unavailable; generated password is weaker");
        }
        return Ok(Some(generated.value));
    }

    Ok(None)
}

fn prompt_password() -> Result<String, Box<dyn Error>> {
    let password = inquire::Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .prompt()?;
    Ok(password)
}

/// Runs one command against an opened store, writing human-readable output to `out`.
pub fn run<B: StorageBackend, W: Write>(
    command: CliCommand,
    store: &mut RecordStore<B>,
    config: &Config,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    match command {
        CliCommand::Init => {
            writeln!(out, "✅ Store ready under key '{}' ({} entries)", store.key(), store.entries().len())?;
            Ok(())
        }
        CliCommand::List { service, category, search, oldest } => {
            let filter = RecordFilter {
                service,
                category,
                search_term: search,
                sort: if oldest { SortOrder::Oldest } else { SortOrder::Newest },
            };
            handlers::handle_list(store, &filter, out)
        }
        CliCommand::Recent { count } => {
            handlers::handle_recent(store, count.unwrap_or(config.recent_entries), out)
        }
        CliCommand::Show { id, reveal } => handlers::handle_show(store, &id, reveal, out),
        CliCommand::Add(fields) => {
            let password = match resolve_password(&fields, config)? {
                Some(password) => password,
                None => prompt_password()?,
            };
            let input = handlers::build_input(&fields, None, password);
            handlers::handle_add(store, input, out)
        }
        CliCommand::Update { id, fields } => {
            let existing = store
                .get(&id)
                .cloned()
                .ok_or_else(|| format!("Entry not found: {}", id))?;
            let password = resolve_password(&fields, config)?.unwrap_or_else(|| existing.password.clone());
            let input = handlers::build_input(&fields, Some(&existing), password);
            handlers::handle_update(store, &id, input, out)
        }
        CliCommand::Delete { id, yes } => {
            if !yes {
                let confirmed = inquire::Confirm::new(&format!("Delete entry {}?", id))
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    writeln!(out, "Cancelled")?;
                    return Ok(());
                }
            }
            handlers::handle_delete(store, &id, out)
        }
        CliCommand::Dashboard => handlers::handle_dashboard(store, config.recent_entries, out),
        CliCommand::Categories => handlers::handle_categories(store, out),
        CliCommand::Generate {
            length,
            no_uppercase,
            no_lowercase,
            no_numbers,
            no_symbols,
            count,
        } => {
            let options = PasswordGenerationOptions {
                length: length.unwrap_or(config.default_password_length),
                include_uppercase: !no_uppercase,
                include_lowercase: !no_lowercase,
                include_numbers: !no_numbers,
                include_symbols: !no_symbols,
            };
            handlers::handle_generate(&options, count, out)
        }
        CliCommand::Strength { password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            handlers::handle_strength(&password, out)
        }
        CliCommand::Settings { auto_lock, theme } => {
            handlers::handle_settings(store, auto_lock, theme, out)
        }
    }
}
