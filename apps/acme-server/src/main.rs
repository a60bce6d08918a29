use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig};
use birthdays::{Birthdays, BirthdaysConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const INGRESS_SECTION: &str = "api_ingress";
const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` so a missing database file gets created.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.contains("mode=") => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Acme Server - birthdays and congratulations
#[derive(Parser)]
#[command(name = "acme-server")]
#[command(about = "Acme Server - birthdays and congratulations")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Acme Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Only SQLite is wired in; anything else is rejected up front.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case(MEMORY_DSN) {
        return Ok("sqlite");
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Final DSN: `--mock` wins, relative sqlite paths resolve against `home_dir`.
fn resolve_dsn(config: &AppConfig, args: &CliArgs) -> Result<String> {
    if args.mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("No database configured; set `database.url` or pass --mock"))?;
    detect_from_dsn(db_config)?;

    let dsn = normalize_sqlite_scheme(db_config.url.trim());
    if dsn.starts_with("sqlite://") {
        return absolutize_sqlite_dsn(&dsn, &config.home_dir(), true);
    }
    Ok(dsn)
}

/// The driver only understands `sqlite:`; `sqlite3:` is accepted as an alias.
fn normalize_sqlite_scheme(dsn: &str) -> String {
    match dsn.get(..8) {
        Some(prefix) if prefix.eq_ignore_ascii_case("sqlite3:") => {
            format!("sqlite:{}", &dsn[8..])
        }
        _ => dsn.to_string(),
    }
}

async fn connect_db(config: &AppConfig, dsn: &str) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_string());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db_config = config.database.as_ref();
    // Each in-memory connection is its own database: keep a single one.
    if dsn == MEMORY_DSN {
        opts.max_connections(1);
    } else if let Some(max) = db_config.and_then(|d| d.max_conns) {
        opts.max_connections(max);
    }
    if let Some(ms) = db_config.and_then(|d| d.busy_timeout_ms) {
        let busy = Duration::from_millis(u64::from(ms));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
    }

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to database '{dsn}'"))
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let (host, port) = (config.server.host.as_str(), config.server.port);
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("invalid bind address '{host}:{port}'"))?
        .next()
        .ok_or_else(|| anyhow!("invalid bind address '{host}:{port}': no addresses"))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let addr = bind_addr(&config)?;
    let birthdays_cfg: BirthdaysConfig = config.module_config(birthdays::MODULE_NAME)?;
    let ingress_cfg: ApiIngressConfig = config.module_config(INGRESS_SECTION)?;

    let dsn = resolve_dsn(&config, &args)?;
    let db = connect_db(&config, &dsn).await?;

    let birthdays = Birthdays::init(birthdays_cfg, db).await?;
    let ingress = ApiIngress::new(ingress_cfg);
    let router = ingress.build_router(
        birthdays.register_rest(axum::Router::new()),
        Birthdays::openapi(),
    )?;

    ingress
        .serve(addr, router, async {
            if let Err(e) = modkit::runtime::wait_for_shutdown().await {
                tracing::error!(error = %e, "failed to listen for shutdown signals");
            }
        })
        .await?;

    tracing::info!("Acme Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config)?;
    let birthdays_cfg: BirthdaysConfig = config.module_config(birthdays::MODULE_NAME)?;
    if birthdays_cfg.min_age_years > birthdays_cfg.max_age_years {
        return Err(anyhow!(
            "invalid config for module 'birthdays': min_age_years exceeds max_age_years"
        ));
    }
    let _: ApiIngressConfig = config.module_config(INGRESS_SECTION)?;
    let dsn = resolve_dsn(&config, &args)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Database: {dsn}");
    println!("{}", config.to_yaml()?);

    Ok(())
}
