// src/cli/commands.rs
use clap::{Args as ClapArgs, Subcommand};

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Create the store if it does not exist yet
    Init,

    /// List entries, newest first
    List {
        /// Only entries for this service slug ("all" for any)
        #[arg(long)]
        service: Option<String>,

        /// Only entries in this category ("all" for any)
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive text matched against service name, username and notes
        #[arg(long, short)]
        search: Option<String>,

        /// Oldest first
        #[arg(long)]
        oldest: bool,
    },

    /// Show the most recently changed entries
    Recent {
        /// Number of entries
        #[arg(long, short)]
        count: Option<usize>,
    },

    /// Show one entry
    Show {
        /// Entry ID
        #[arg(required = true)]
        id: String,

        /// Print the password in clear text
        #[arg(long)]
        reveal: bool,
    },

    /// Add an entry
    Add(EntryArgs),

    /// Update an entry; omitted fields keep their current value
    Update {
        /// Entry ID
        #[arg(required = true)]
        id: String,

        #[command(flatten)]
        fields: EntryArgs,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        #[arg(required = true)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Totals, weak and expired password counts, and recent entries
    Dashboard,

    /// List categories
    Categories,

    /// Generate passwords
    Generate {
        /// Password length
        #[arg(long, short)]
        length: Option<usize>,

        #[arg(long)]
        no_uppercase: bool,

        #[arg(long)]
        no_lowercase: bool,

        #[arg(long)]
        no_numbers: bool,

        #[arg(long)]
        no_symbols: bool,

        /// How many candidates to print
        #[arg(long, short, default_value_t = 3)]
        count: usize,
    },

    /// Rate a password (prompts with hidden input when omitted)
    Strength {
        password: Option<String>,
    },

    /// Show or change settings
    Settings {
        /// Auto-lock timeout in minutes
        #[arg(long)]
        auto_lock: Option<u32>,

        /// UI theme name
        #[arg(long)]
        theme: Option<String>,
    },
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct EntryArgs {
    /// Service slug from the catalog, or "other" with --name
    #[arg(long)]
    pub service: Option<String>,

    /// Display name for an "other" service
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short)]
    pub username: Option<String>,

    /// Password; prompted for when omitted
    #[arg(long, short)]
    pub password: Option<String>,

    /// Generate the password instead of prompting
    #[arg(long, conflicts_with = "password")]
    pub generate: bool,

    #[arg(long)]
    pub notes: Option<String>,

    /// Category ID (personal, work, social, financial, other)
    #[arg(long)]
    pub category: Option<String>,

    /// Days until the password should be rotated
    #[arg(long)]
    pub expires_in_days: Option<u32>,
}
