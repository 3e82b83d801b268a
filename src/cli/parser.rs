use crate::export::ExportFormat;
use crate::tracking::instrument::ThresholdPolicy;
use clap::{Parser, Subcommand};

/// Command-line interface definition for Trackify
/// Storefront activity tracker backed by SQLite
#[derive(Parser)]
#[command(
    name = "trackify",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track storefront user activity (views, cart, scroll, dwell) and summarize it from SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Diagnostic log level (error, warn, info, debug, trace)
    #[arg(global = true, long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Print the persistent session id (created on first use)
    Session,

    /// Record an event of any type
    Track {
        /// Event type (page_view, product_view, add_to_cart, search, ...)
        kind: String,

        #[arg(long = "data", value_name = "JSON", help = "Event data as a JSON object")]
        data: Option<String>,

        #[arg(long = "page", help = "Page path the event happened on (default: /)")]
        page: Option<String>,

        #[arg(long = "user", help = "Authenticated user id")]
        user: Option<String>,
    },

    /// Record a generic element click
    Click {
        element: String,

        #[arg(long = "page")]
        page: Option<String>,
    },

    /// Record a button click
    Button {
        name: String,

        #[arg(long = "page")]
        page: Option<String>,
    },

    /// Record a link click
    Link {
        href: String,

        #[arg(long = "text", default_value = "", help = "Visible link text")]
        text: String,

        #[arg(long = "page")]
        page: Option<String>,
    },

    /// Record a form interaction
    Form {
        name: String,

        #[arg(long = "action", default_value = "submit", help = "submit, input, focus or blur")]
        action: String,

        #[arg(long = "field", help = "Field the interaction refers to")]
        field: Option<String>,

        #[arg(long = "page")]
        page: Option<String>,
    },

    /// Record a hover over an element
    Hover {
        element: String,

        #[arg(long = "duration", default_value_t = 0, help = "Hover duration in milliseconds")]
        duration: u64,

        #[arg(long = "page")]
        page: Option<String>,
    },

    /// Replay a page visit: scroll positions and dwell ticks
    Browse {
        /// Page path being visited
        page: String,

        #[arg(
            long = "scroll",
            value_delimiter = ',',
            value_name = "PCT",
            help = "Scroll positions as percentages, in order (e.g. 30,80)"
        )]
        scroll: Vec<f64>,

        #[arg(long = "ticks", default_value_t = 0, help = "Number of dwell samples to record")]
        ticks: u32,

        #[arg(long = "interval", help = "Seconds between dwell samples (default: config)")]
        interval: Option<u64>,

        #[arg(long = "policy", value_enum, help = "Scroll threshold policy (default: config)")]
        policy: Option<ThresholdPolicy>,

        #[arg(long = "height", default_value_t = 3000.0, help = "Scrollable content height")]
        height: f64,

        #[arg(long = "viewport", default_value_t = 1000.0, help = "Visible viewport height")]
        viewport: f64,
    },

    /// List recorded activities, oldest first
    List {
        #[arg(long = "type", help = "Only events of this type")]
        kind: Option<String>,

        #[arg(long = "session", help = "Only the current session")]
        session: bool,
    },

    /// Show the activity dashboard
    Dashboard {
        #[arg(long = "top", help = "How many products to rank (default: config)")]
        top: Option<usize>,

        #[arg(long = "refresh", help = "Reload activities from the store before rendering")]
        refresh: bool,
    },

    /// Delete the current session's activities
    Clear,

    /// Export recorded activities
    Export {
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Output file (default: user_activities.<ext>)")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,

        #[arg(long = "session", help = "Only the current session")]
        session: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing or unknown fields")]
        check: bool,

        #[arg(long = "fix", requires = "check", help = "Append missing fields with default values")]
        fix: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
