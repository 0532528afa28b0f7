//! reelscout - OMDB movie search CLI.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path, resolve_log_path};
use crate::tui::run_browser;
use reelscout_api::omdb::{MovieDetail, OmdbClient, TitleKind, imdb_title_url};
use reelscout_api::session::{ActionOutcome, SearchController, SearchFilters, SearchSession};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search OMDB titles.
    Search(SearchArgs),
    /// Show full details of one title.
    Details(DetailsArgs),
    /// Browse search results interactively via TUI.
    Browse(BrowseArgs),
    /// Config file operations.
    Config(ConfigCommand),
}

/// Title type accepted by `--type`.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// Feature films.
    Movie,
    /// TV series.
    Series,
    /// Single episodes.
    Episode,
    /// Video games.
    Game,
}

impl From<KindArg> for TitleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => Self::Movie,
            KindArg::Series => Self::Series,
            KindArg::Episode => Self::Episode,
            KindArg::Game => Self::Game,
        }
    }
}

/// Filters shared by `search` and `browse`.
#[derive(clap::Args)]
struct FilterArgs {
    /// Restrict results to one title type.
    #[arg(long = "type", value_enum)]
    kind: Option<KindArg>,

    /// Restrict results to one release year.
    #[arg(long)]
    year: Option<u16>,
}

impl FilterArgs {
    /// Converts to session filters.
    fn to_filters(&self) -> SearchFilters {
        SearchFilters {
            kind: self.kind.map(TitleKind::from),
            year: self.year,
        }
    }
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for.
    #[arg(long)]
    query: String,

    /// Number of result pages to load (10 titles per page).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Search filters.
    #[command(flatten)]
    filters: FilterArgs,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb ID (e.g. tt0372784).
    #[arg(long)]
    id: String,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Query to search right away.
    #[arg(long)]
    query: Option<String>,

    /// Search filters.
    #[command(flatten)]
    filters: FilterArgs,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Store the OMDB API key in the config file.
    SetKey {
        /// API key issued by omdbapi.com.
        key: String,
    },
    /// Show the active configuration.
    Show,
}

/// Builds an `OmdbClient` from config and the `OMDB_API_KEY` env var.
///
/// # Errors
///
/// Returns an error if no API key is configured or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Result<OmdbClient> {
    let api_key = config.api_key(std::env::var(API_KEY_ENV).ok())?;

    OmdbClient::builder()
        .base_url(config.base_url()?)
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.timeout())
        .build()
        .context("failed to build OMDB client")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the OMDB client fails to build or a request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let client = build_omdb_client(config)?;
    let session = SearchSession::with_filters(args.filters.to_filters());
    let mut controller = SearchController::with_session(Arc::new(client), session);

    match controller.submit_search(&args.query).await {
        ActionOutcome::Ignored => {
            tracing::info!("Empty query, nothing to search.");
            return Ok(());
        }
        ActionOutcome::NoResults { reason } => {
            tracing::info!("No results found. ({reason})");
            return Ok(());
        }
        ActionOutcome::Failed { reason } => bail!("OMDB search request failed: {reason}"),
        _ => {}
    }

    let mut loaded_pages: u32 = 1;
    while loaded_pages < args.pages && controller.session().has_more() {
        match controller.load_more().await {
            ActionOutcome::Failed { reason } => bail!("OMDB page request failed: {reason}"),
            ActionOutcome::Ignored | ActionOutcome::NoMorePages { .. } => break,
            _ => {}
        }
        loaded_pages = loaded_pages.saturating_add(1);
    }

    let session = controller.session();
    let pagination = session.pagination();
    tracing::info!(
        "Total results: {}  (showing {}, pages 1-{})",
        pagination.total,
        session.results().len(),
        pagination.page,
    );
    tracing::info!("IMDbID\t\tTitle\t\t\tYear\tType\tPoster");
    for item in session.results() {
        tracing::info!(
            "{}\t{}\t\t{}\t{}\t{}",
            item.imdb_id,
            item.title,
            item.year,
            item.kind.label(),
            if item.poster.url().is_some() { "yes" } else { "-" },
        );
    }
    if session.has_more() {
        tracing::info!("More results available: use --pages to load more.");
    }

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the OMDB client fails to build, the request fails,
/// or the title does not exist.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, config: &AppConfig) -> Result<()> {
    let client = build_omdb_client(config)?;
    let mut controller = SearchController::new(Arc::new(client));

    let outcome = controller.select_item(&args.id).await;
    let Some(detail) = controller.session().selected_detail() else {
        match outcome {
            ActionOutcome::DetailNotFound { reason } => {
                bail!("title {} not found: {reason}", args.id)
            }
            ActionOutcome::Failed { reason } => bail!("OMDB details request failed: {reason}"),
            _ => bail!("IMDb ID must not be empty"),
        }
    };

    print_detail(detail);
    Ok(())
}

/// Prints a detail record line by line.
fn print_detail(detail: &MovieDetail) {
    let field = |value: Option<&String>| value.map_or("-", String::as_str).to_owned();

    tracing::info!("{} ({})  [{}]", detail.title, detail.year, detail.kind.label());
    tracing::info!("Rated:\t\t{}", field(detail.rated.as_ref()));
    tracing::info!("Released:\t{}", field(detail.released.as_ref()));
    tracing::info!("Runtime:\t{}", field(detail.runtime.as_ref()));
    tracing::info!("Genre:\t\t{}", field(detail.genre.as_ref()));
    tracing::info!("Director:\t{}", field(detail.director.as_ref()));
    tracing::info!("Actors:\t\t{}", field(detail.actors.as_ref()));
    tracing::info!("Language:\t{}", field(detail.language.as_ref()));
    tracing::info!("Country:\t{}", field(detail.country.as_ref()));
    tracing::info!("IMDb rating:\t{}", field(detail.imdb_rating.as_ref()));
    for rating in &detail.ratings {
        tracing::info!("  {}:\t{}", rating.source, rating.value);
    }
    tracing::info!("Poster:\t\t{}", detail.poster.url().unwrap_or("(no image)"));
    tracing::info!("Plot:\t\t{}", field(detail.plot.as_ref()));
    tracing::info!("IMDb page:\t{}", imdb_title_url(&detail.imdb_id));
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the OMDB client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    let client = build_omdb_client(config)?;
    let session = SearchSession::with_filters(args.filters.to_filters());
    let controller = SearchController::with_session(Arc::new(client), session);

    run_browser(controller, args.query.as_deref()).await
}

/// Runs the `config set-key` subcommand.
///
/// # Errors
///
/// Returns an error if the key is blank or the config file cannot be written.
fn run_config_set_key(key: &str, mut config: AppConfig, config_path: &Path) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    config.omdb.api_key = Some(String::from(key));
    config.save(config_path)?;
    tracing::info!("Saved API key to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand. The API key itself is never printed.
///
/// # Errors
///
/// Returns an error if the configured base URL is invalid.
fn run_config_show(config: &AppConfig, config_path: &Path) -> Result<()> {
    let from_env = std::env::var(API_KEY_ENV)
        .ok()
        .is_some_and(|v| !v.trim().is_empty());
    let key_source = if from_env {
        "set (environment)"
    } else if config.api_key(None).is_ok() {
        "set (config file)"
    } else {
        "not configured"
    };

    tracing::info!("Config file:\t{}", config_path.display());
    tracing::info!("API key:\t{key_source}");
    tracing::info!("Base URL:\t{}", config.base_url()?);
    tracing::info!("Timeout:\t{}s", config.timeout().as_secs());
    Ok(())
}

/// Installs the global subscriber.
///
/// Output goes to stdout, or to `log_file` when a TUI owns the terminal.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let (writer, ansi) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.dir.as_ref())?;

    let log_file = matches!(cli.command, Commands::Browse(_)).then(|| resolve_log_path(&config_path));
    init_tracing(log_file.as_deref())?;

    let config = AppConfig::load(&config_path)?;
    match cli.command {
        Commands::Search(args) => run_search(&args, &config).await,
        Commands::Details(args) => run_details(&args, &config).await,
        Commands::Browse(args) => run_browse(&args, &config).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::SetKey { key } => run_config_set_key(&key, config, &config_path),
            ConfigSubcommands::Show => run_config_show(&config, &config_path),
        },
    }
}
