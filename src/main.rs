//! Warehouse CLI - command-line front end for the inventory catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use warehouse::output::{emit_failure, OutputMode};

mod commands;

#[derive(Parser)]
#[command(name = "warehouse")]
#[command(version)]
#[command(about = "Warehouse catalog - track items, brands, price tiers and stock")]
#[command(long_about = r#"
Warehouse keeps a local catalog of stock items.

Example usage:
  warehouse add --name Router --brand Acme --price high --amount 5
  warehouse list --sort name
  warehouse edit 1 --amount 3
  warehouse delete 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./warehouse.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List every item
    List {
        /// Column to sort by (id, name, brand, price, amount)
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Show one item
    Show {
        /// Item id
        id: i64,
    },

    /// Add a new item
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        brand: Option<String>,

        /// Price tier: low, middle or high
        #[arg(short, long, default_value = "low")]
        price: String,

        /// Units in stock (defaults to 0)
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Change fields of an existing item; omitted fields stay as they are
    Edit {
        /// Item id
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        brand: Option<String>,

        /// Price tier: low, middle or high
        #[arg(short, long)]
        price: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Delete one item
    Delete {
        /// Item id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every item
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show catalog statistics
    Stats,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Add { .. } => "add",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::DeleteAll { .. } => "delete-all",
            Commands::Stats => "stats",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_flag(cli.json);
    let command_name = cli.command.name();

    let result = run(cli, mode);
    if let Err(e) = &result {
        emit_failure(mode, command_name, &format!("{:#}", e))?;
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let open = || commands::Context::open(cli.config.as_deref(), cli.database.clone(), mode);

    match cli.command {
        Commands::Init { force } => commands::run_init(cli.config.as_deref(), force, mode),
        Commands::List { sort } => commands::run_list(&open()?, sort.as_deref()),
        Commands::Show { id } => commands::run_show(&open()?, id),
        Commands::Add { name, brand, price, amount } => {
            commands::run_add(&open()?, &name, brand.as_deref(), &price, amount.as_deref())
        }
        Commands::Edit { id, name, brand, price, amount } => commands::run_edit(
            &open()?,
            id,
            commands::FieldEdits { name, brand, price, amount },
        ),
        Commands::Delete { id, yes } => commands::run_delete(&open()?, id, yes),
        Commands::DeleteAll { yes } => commands::run_delete_all(&open()?, yes),
        Commands::Stats => commands::run_stats(&open()?),
    }
}
