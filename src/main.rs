//! ToadLester reconcile CLI entrypoint.
//!
//! This is the main entrypoint for the toadlester command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use toadlester_reconcile::cli::{Cli, Commands, OutputFormatter};
use toadlester_reconcile::config::{
    ClientConfig, Manifest, ManifestParser, SettingValidator, find_manifest_file,
};
use toadlester_reconcile::error::{Result, ToadlesterError};
use toadlester_reconcile::identity::IdentityStrategy;
use toadlester_reconcile::reconciler::{Lifecycle, Reconciler};
use toadlester_reconcile::toadlester::{Setting, ToadlesterClient};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let strategy = if cli.unique_ids {
        IdentityStrategy::UniqueSuffix
    } else {
        IdentityStrategy::Timestamp
    };

    match cli.command {
        Commands::Create(ref args) => {
            cmd_lifecycle(&cli, Lifecycle::Create, args.clone().into(), strategy, &formatter).await
        }
        Commands::Read(ref args) => {
            cmd_lifecycle(&cli, Lifecycle::Read, args.clone().into(), strategy, &formatter).await
        }
        Commands::Update(ref args) => {
            cmd_lifecycle(&cli, Lifecycle::Update, args.clone().into(), strategy, &formatter).await
        }
        Commands::Delete(ref args) => {
            cmd_lifecycle(&cli, Lifecycle::Delete, args.clone().into(), strategy, &formatter).await
        }
        Commands::Snapshot => cmd_snapshot(&cli, strategy, &formatter).await,
        Commands::Validate { warnings } => cmd_validate(&cli, warnings, &formatter),
        Commands::Drift => cmd_drift(&cli, strategy, &formatter).await,
        Commands::Apply => cmd_apply(&cli, strategy, &formatter).await,
        Commands::Health => cmd_health(&cli, &formatter).await,
    }
}

/// Runs one lifecycle operation for a setting given on the command line.
async fn cmd_lifecycle(
    cli: &Cli,
    intent: Lifecycle,
    setting: Setting,
    strategy: IdentityStrategy,
    formatter: &OutputFormatter,
) -> Result<()> {
    SettingValidator::new().validate_setting(&setting)?;

    let manifest = load_manifest_if_present(cli.config.as_ref())?;
    let reconciler = build_reconciler(cli, manifest.as_ref(), strategy)?;

    let reconciled = match intent {
        Lifecycle::Create => reconciler.create(&setting).await?,
        Lifecycle::Read => reconciler.read(&setting).await?,
        Lifecycle::Update => reconciler.update(&setting).await?,
        Lifecycle::Delete => reconciler.delete(&setting).await?,
    };

    emit(&formatter.format_reconciled(intent, &reconciled))
}

/// Shows the full remote configuration.
async fn cmd_snapshot(
    cli: &Cli,
    strategy: IdentityStrategy,
    formatter: &OutputFormatter,
) -> Result<()> {
    let manifest = load_manifest_if_present(cli.config.as_ref())?;
    let reconciler = build_reconciler(cli, manifest.as_ref(), strategy)?;

    let aggregate = reconciler.read_aggregate().await?;
    emit(&formatter.format_snapshot(&aggregate))
}

/// Validates the manifest.
fn cmd_validate(cli: &Cli, show_warnings: bool, formatter: &OutputFormatter) -> Result<()> {
    let manifest = load_manifest(cli.config.as_ref())?;
    let result = SettingValidator::new().validate_manifest(&manifest)?;

    emit(&formatter.format_validation(&result, show_warnings))
}

/// Checks every manifest setting for drift.
async fn cmd_drift(cli: &Cli, strategy: IdentityStrategy, formatter: &OutputFormatter) -> Result<()> {
    let manifest = load_manifest(cli.config.as_ref())?;
    SettingValidator::new().validate_manifest(&manifest)?;
    let reconciler = build_reconciler(cli, Some(&manifest), strategy)?;

    let report = reconciler.check_drift(&manifest.settings).await?;
    emit(&formatter.format_drift(&report))
}

/// Creates or updates manifest settings until the service matches.
async fn cmd_apply(cli: &Cli, strategy: IdentityStrategy, formatter: &OutputFormatter) -> Result<()> {
    let manifest = load_manifest(cli.config.as_ref())?;
    SettingValidator::new().validate_manifest(&manifest)?;
    let reconciler = build_reconciler(cli, Some(&manifest), strategy)?;

    let result = reconciler.reconcile(&manifest.settings).await;
    emit(&formatter.format_reconciliation(&result))?;

    if result.success {
        Ok(())
    } else {
        Err(ToadlesterError::internal(format!(
            "{} of {} settings failed to reconcile",
            result.errors.len(),
            manifest.settings.len()
        )))
    }
}

/// Probes the service's metrics endpoint.
async fn cmd_health(cli: &Cli, formatter: &OutputFormatter) -> Result<()> {
    let manifest = load_manifest_if_present(cli.config.as_ref())?;
    let client = ToadlesterClient::new(&resolve_client_config(cli, manifest.as_ref())?)?;

    let status = client.health().await;
    emit(&formatter.format_health(&status))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Writes command output to stdout.
fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Resolves the manifest path.
fn resolve_manifest_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_manifest_file("."), |path| Ok(path.clone()))
}

/// Loads the manifest and its `.env`.
fn load_manifest(config_path: Option<&PathBuf>) -> Result<Manifest> {
    let manifest_file = resolve_manifest_path(config_path)?;
    debug!("Loading manifest from: {}", manifest_file.display());

    let parser =
        ManifestParser::new().with_base_path(manifest_file.parent().unwrap_or_else(|| Path::new(".")));
    parser.load_dotenv()?;
    parser.load_file(&manifest_file)
}

/// Loads the manifest when one was given or can be found.
fn load_manifest_if_present(config_path: Option<&PathBuf>) -> Result<Option<Manifest>> {
    if config_path.is_some() {
        return load_manifest(config_path).map(Some);
    }

    match find_manifest_file(".") {
        Ok(path) => load_manifest(Some(&path)).map(Some),
        Err(_) => {
            ManifestParser::new().load_dotenv()?;
            Ok(None)
        }
    }
}

/// Picks the client configuration: `--url` (or `TOADLESTER_URL`) first,
/// then the manifest endpoint, then the environment.
fn resolve_client_config(cli: &Cli, manifest: Option<&Manifest>) -> Result<ClientConfig> {
    let endpoint = manifest.and_then(|m| m.endpoint.clone());

    let mut config = match (&cli.url, endpoint) {
        (Some(url), Some(endpoint)) => ClientConfig::new(url).with_timeout_secs(endpoint.timeout_secs),
        (Some(url), None) => ClientConfig::new(url),
        (None, Some(endpoint)) => endpoint,
        (None, None) => ClientConfig::from_env()?,
    };

    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout_secs(secs);
    }

    info!("Using ToadLester endpoint {}", config.base_url);
    Ok(config)
}

/// Builds a reconciler over the resolved endpoint.
fn build_reconciler(
    cli: &Cli,
    manifest: Option<&Manifest>,
    strategy: IdentityStrategy,
) -> Result<Reconciler<ToadlesterClient>> {
    let config = resolve_client_config(cli, manifest)?;
    let client = ToadlesterClient::new(&config)?;
    Ok(Reconciler::new(client).with_identity_strategy(strategy))
}
