mod cmd;
mod output;
mod root;

use clap::{Args, Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use orgtree_core::config::Backend;
use orgtree_core::render::Format;
use orgtree_core::types::SortOrder;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "orgtree",
    about = "Resolve an org chart stored as (employee, boss) rows and render it as a tree",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working root (default: auto-detect from orgtree.yaml or .git/)
    #[arg(long, global = true, env = "ORGTREE_ROOT")]
    root: Option<PathBuf>,

    /// Config file (default: <root>/orgtree.yaml)
    #[arg(long = "config-file", global = true, env = "ORGTREE_CONFIG")]
    config_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Edge store overrides; anything unset falls back to the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Store backend: sqlite or postgres
    #[arg(long, global = true, env = "ORGTREE_BACKEND")]
    pub backend: Option<Backend>,

    /// SQLite database file
    #[arg(long = "db", global = true, env = "ORGTREE_DB")]
    pub db_path: Option<PathBuf>,

    /// Postgres database name
    #[arg(long, global = true, env = "ORGTREE_PG_DATABASE")]
    pub database: Option<String>,

    /// Postgres user
    #[arg(long, global = true, env = "ORGTREE_PG_USER")]
    pub user: Option<String>,

    /// Postgres password
    #[arg(long, global = true, env = "ORGTREE_PG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Postgres host
    #[arg(long, global = true, env = "ORGTREE_PG_HOST")]
    pub host: Option<String>,

    /// Postgres port
    #[arg(long, global = true, env = "ORGTREE_PG_PORT")]
    pub port: Option<u16>,
}

/// Rendering overrides; anything unset falls back to the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    /// Directory for tree.html and tree.json
    #[arg(long, env = "ORGTREE_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Row order: numeric (1-2 before 1-10) or lexicographic (1-10 before 1-2)
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Delay between console lines, in milliseconds
    #[arg(long)]
    pub pace_ms: Option<u64>,

    /// Deepest level accepted below a root
    #[arg(long)]
    pub max_depth: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the employees/positions tables and insert the seed data (idempotent)
    Seed,

    /// Resolve the hierarchy and render it
    Tree {
        /// console, html, json, or all
        #[arg(long, short = 'f', default_value = "all")]
        format: Format,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List resolved rows (id, name, position, level, order sequence)
    Rows {
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Report employees no root can reach: missing bosses and boss cycles
    Check,

    /// Seed the store, then render every view
    Run {
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let config_path = root::resolve_config_path(&root, cli.config_file.as_deref());
    let ctx = cmd::Context {
        root,
        config_path,
        store: cli.store,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Seed => cmd::seed::run(&ctx),
        Commands::Tree { format, render } => cmd::tree::run(&ctx, format, &render),
        Commands::Rows { render } => cmd::rows::run(&ctx, &render),
        Commands::Check => cmd::check::run(&ctx),
        Commands::Run { render } => cmd::run::run(&ctx, &render),
        Commands::Config { subcommand } => cmd::config::run(&ctx, subcommand),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
