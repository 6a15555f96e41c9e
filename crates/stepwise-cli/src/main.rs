//! stepwise CLI
//!
//! Applies or reverts versioned SQL migrations against a SQLite database

use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use stepwise_core::logging_facility::{self, Profile};
use stepwise_core::DirectiveFlags;
use stepwise_store::MigrateConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "stepwise")]
#[command(about = "stepwise - Versioned SQL migrations for SQLite", long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["all", "up", "down", "to", "reset", "status"])
))]
struct Cli {
    /// Apply every pending migration
    #[arg(long)]
    all: bool,

    /// Apply the next N migrations
    #[arg(long, value_name = "N")]
    up: Option<u32>,

    /// Revert the last N applied migrations
    #[arg(long, value_name = "N")]
    down: Option<u32>,

    /// Migrate forward or backward until V is the current version (0 reverts everything)
    #[arg(long, value_name = "V")]
    to: Option<i64>,

    /// Revert every applied migration
    #[arg(long, visible_alias = "clean")]
    reset: bool,

    /// List migrations and whether each is applied
    #[arg(long)]
    status: bool,

    /// Show what would run without changing the database
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// SQLite database file
    #[arg(long, env = "DB_PATH", value_name = "PATH")]
    db: PathBuf,

    /// Directory holding <version>-<name>.up.sql / .down.sql files
    #[arg(long, env = "MIGRATION_DIR", value_name = "DIR")]
    migrations: PathBuf,

    /// Log output format
    #[arg(
        long,
        env = "STEPWISE_LOG_FORMAT",
        default_value = "pretty",
        value_name = "pretty|json"
    )]
    log_format: Profile,
}

impl Cli {
    fn directive_flags(&self) -> DirectiveFlags {
        DirectiveFlags {
            all: self.all,
            up: self.up,
            down: self.down,
            to: self.to,
            reset: self.reset,
        }
    }
}

fn main() {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging_facility::init(cli.log_format);

    let config = MigrateConfig::new(&cli.db, &cli.migrations);
    tracing::debug!(
        db = %config.database_path.display(),
        migrations = %config.migrations_dir.display(),
        "configuration resolved"
    );
    let result = if cli.status {
        commands::status::execute(&config)
    } else {
        commands::migrate::execute(&config, &cli.directive_flags(), cli.dry_run)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
