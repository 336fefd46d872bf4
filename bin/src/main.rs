//! canteras CLI - Membership roster and storage usage for Las Canteras.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

use commands::Context;
use commands::members::MemberFields;
use display::{OutputFormat, SearchFieldArg, SourceArg};

#[derive(Parser)]
#[command(name = "canteras")]
#[command(about = "Membership roster and storage usage for Las Canteras", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file. Defaults to config.toml in the user config directory.
    #[arg(long, global = true, env = "CANTERAS_CONFIG")]
    config: Option<PathBuf>,

    /// Roster collection name
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Where to read documents from
    #[arg(long, value_enum, global = true)]
    source: Option<SourceArg>,

    /// Firestore project identifier
    #[arg(long, global = true, env = "CANTERAS_PROJECT")]
    project: Option<String>,

    /// Firestore web API key
    #[arg(long, global = true, env = "CANTERAS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory of JSON collection exports
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the storage used by the roster collection
    Usage {
        /// Quota in bytes for the capacity estimate
        #[arg(long)]
        quota: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List members ordered by membership number
    List {
        /// Field to search on
        #[arg(short, long, value_enum, default_value = "nif")]
        field: SearchFieldArg,

        /// Search text (NIF prefix, or part of the name or number)
        #[arg(short, long)]
        search: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a member's virtual card
    Card {
        /// National ID (NIF/DNI) of the member
        dni: String,
    },

    /// Add a member to the roster
    Add {
        /// National ID (NIF/DNI), used as the document identifier
        dni: String,

        /// Full name
        #[arg(long)]
        name: String,

        /// Membership number
        #[arg(long)]
        number: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Change a member's name, number or password
    Edit {
        /// National ID (NIF/DNI) of the member
        dni: String,

        /// New full name
        #[arg(long)]
        name: Option<String>,

        /// New membership number
        #[arg(long)]
        number: Option<String>,

        /// New password
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove a member from the roster
    Remove {
        /// National ID (NIF/DNI) of the member
        dni: String,

        /// Confirm the removal
        #[arg(short, long)]
        yes: bool,
    },

    /// Save the roster collection as a JSON export
    Export {
        /// Output directory. The file is named <collection>.json
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Show the settings file location and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings_path = cli.config.unwrap_or_else(canteras_lib::Settings::default_path);
    let mut settings = canteras_lib::Settings::load(&settings_path)?;
    if let Some(collection) = cli.collection {
        settings.collection = collection;
    }
    if let Some(source) = cli.source {
        settings.source = Some(source.into());
    }
    if let Some(project) = cli.project {
        settings.firestore.project_id = Some(project);
    }
    if let Some(api_key) = cli.api_key {
        settings.firestore.api_key = Some(api_key);
    }
    if let Some(dir) = cli.export_dir {
        settings.export.dir = Some(dir);
    }

    let ctx = Context::new(settings, settings_path, cli.quiet);
    let mut out = std::io::stdout();

    match command {
        Commands::Usage { quota, format } => {
            commands::usage::usage(&ctx, quota, format, &mut out).await
        }
        Commands::List {
            field,
            search,
            format,
        } => {
            commands::list::list_members(&ctx, field.into(), search.as_deref(), format, &mut out)
                .await
        }
        Commands::Card { dni } => commands::card::show_card(&ctx, &dni, &mut out).await,
        Commands::Add {
            dni,
            name,
            number,
            password,
        } => {
            let fields = MemberFields {
                name: Some(name),
                number: Some(number),
                password: Some(password),
            };
            commands::members::add_member(&ctx, &dni, fields, &mut out).await
        }
        Commands::Edit {
            dni,
            name,
            number,
            password,
        } => {
            let fields = MemberFields {
                name,
                number,
                password,
            };
            commands::members::edit_member(&ctx, &dni, fields, &mut out).await
        }
        Commands::Remove { dni, yes } => {
            commands::members::remove_member(&ctx, &dni, yes, &mut out).await
        }
        Commands::Export { output_dir } => commands::export::export(&ctx, output_dir).await,
        Commands::Config => commands::config::show_config(&ctx),
    }
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
