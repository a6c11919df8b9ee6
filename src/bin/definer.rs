//! definer: MySQL definer audit and view algorithm migrations.
//!
//! Commands:
//! - databases / list / show-create: live inventory
//! - dump: transcript of every view in a schema
//! - scripts: transcript -> Flyway forward/rollback pairs
//! - rewrite: offline ALTER + rollback for one CREATE VIEW

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use definer::commands::{self, Target};
use definer::credentials::Credentials;
use definer::ddl::Algorithm;
use definer::emit::EmitOptions;
use definer::{logging, Config};

#[derive(Parser)]
#[command(name = "definer")]
#[command(about = "Audit MySQL definer objects and rewrite view algorithms", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./definer.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnArgs {
    /// Server host
    #[arg(short = 's', long)]
    host: String,

    /// Server port (default from config, else 3306)
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// User (overrides the credentials file)
    #[arg(short, long, env = "MYSQL_USER")]
    user: Option<String>,

    /// Password (overrides the credentials file)
    #[arg(short, long, env = "MYSQL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database (schema)
    #[arg(short, long)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List schemas on the server
    Databases {
        #[command(flatten)]
        conn: ConnArgs,
    },

    /// List routines, views, triggers and events with their definer
    List {
        #[command(flatten)]
        conn: ConnArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show an object's CREATE statement
    ShowCreate {
        #[command(flatten)]
        conn: ConnArgs,

        /// Object name
        name: String,

        /// Generate an ALTER VIEW for this algorithm (MERGE, TEMPTABLE, UNDEFINED)
        #[arg(long)]
        algo: Option<Algorithm>,

        /// Run the generated ALTER VIEW
        #[arg(long, requires = "algo")]
        execute: bool,
    },

    /// Dump a transcript of every view in the schema
    Dump {
        #[command(flatten)]
        conn: ConnArgs,

        /// Include the ALTER VIEW for this algorithm
        #[arg(long)]
        algo: Option<Algorithm>,
    },

    /// Generate forward/rollback scripts from a transcript
    Scripts {
        /// Transcript file
        report: PathBuf,

        /// Output directory (default from config, else flyway-views)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Recompose every forward statement for this algorithm
        #[arg(long)]
        algo: Option<Algorithm>,

        /// Overwrite existing script files
        #[arg(long)]
        force: bool,
    },

    /// Rewrite one CREATE VIEW (file or stdin) into ALTER + rollback
    Rewrite {
        /// Schema the view lives in
        #[arg(short, long)]
        database: String,

        /// View name
        #[arg(short, long)]
        name: String,

        #[arg(long)]
        algo: Algorithm,

        /// DDL file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.logging.level, cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Databases { conn } => commands::list_databases(&target(conn, &config)?).await,
        Commands::List { conn, json } => {
            commands::list_objects(&target(conn, &config)?, json).await
        }
        Commands::ShowCreate {
            conn,
            name,
            algo,
            execute,
        } => commands::show_create(&target(conn, &config)?, &name, algo, execute).await,
        Commands::Dump { conn, algo } => commands::dump_views(&target(conn, &config)?, algo).await,
        Commands::Scripts {
            report,
            out,
            algo,
            force,
        } => {
            let out_dir = out.unwrap_or_else(|| config.output.dir.clone());
            let options = EmitOptions {
                naming: config.output.naming(),
                target: algo,
                overwrite: force || config.output.overwrite,
            };
            let summary = commands::generate_scripts(&report, &out_dir, &options)?;
            if !summary.is_clean() {
                bail!("{} view(s) failed", summary.failures.len());
            }
            Ok(())
        }
        Commands::Rewrite {
            database,
            name,
            algo,
            file,
        } => commands::rewrite_ddl(file.as_deref(), &database, &name, algo),
    }
}

/// Resolve connection flags against the config and credentials file.
fn target(conn: ConnArgs, config: &Config) -> Result<Target> {
    let file_credentials = match config.credentials_path() {
        Some(path) if path.exists() => Credentials::from_file(&path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?,
        _ => Credentials::default(),
    };

    Ok(Target {
        host: conn.host,
        port: conn.port.unwrap_or(config.connection.port),
        database: conn.database,
        credentials: file_credentials.with_overrides(conn.user, conn.password),
    })
}
