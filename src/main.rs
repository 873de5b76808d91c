use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use costchef::client::OciCliClient;
use costchef::config::{self, Config};
use costchef::credentials::{OciProfile, DEFAULT_PROFILE};
use costchef::error::CostChefError;
use costchef::exit_codes::{codes, exit_code_for_error};
use costchef::report::{print_summary, write_reports};
use costchef::utils::{expand_path, open_in_browser};
use costchef::validation::parse_compartment_list;
use costchef::{resolve_scopes, Aggregator, ScanContext};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "costchef")]
#[command(
    about = "Find dev/test OCI resources that are costing more than they should",
    long_about = "costchef scans OCI compartments for resources tagged as dev/test and reports\ncost optimization opportunities:\n\n  - Databases on production-grade shapes\n  - Compute instances without stop/start automation tags\n  - Oversized compute instances\n  - Unattached block volumes\n  - Unused reserved public IPs\n  - Load balancers without backends\n  - Security lists open to 0.0.0.0/0 on SSH/RDP\n\nAPI calls go through the OCI CLI (`oci`), which must be installed and configured.",
    after_help = "Examples:\n  costchef --output-path ./reports\n  costchef --compartments ocid1.compartment.oc1..xxx,ocid1.compartment.oc1..yyy\n  costchef --config-path ~/.oci/config --profile PROD"
)]
#[command(version)]
struct Cli {
    /// Directory to store CSV and HTML reports
    #[arg(long, default_value = ".")]
    output_path: PathBuf,

    /// Comma-separated compartment OCIDs to check (default: tenancy root)
    #[arg(long)]
    compartments: Option<String>,

    /// OCI config file (default: ~/.oci/config)
    #[arg(long, env = "OCI_CLI_CONFIG_FILE")]
    config_path: Option<PathBuf>,

    /// OCI config profile
    #[arg(long, env = "OCI_CLI_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Rules file overriding the built-in labels and shape lists
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Write the default rules file to this path and exit
    #[arg(long, value_name = "FILE")]
    init_rules: Option<PathBuf>,

    /// Do not open the HTML report in a browser
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Some(output) = &cli.init_rules {
        return match config::init_config(&expand_path(output)) {
            Ok(()) => ExitCode::from(codes::SUCCESS),
            Err(e) => {
                error!("{:#}", e);
                ExitCode::from(codes::FAILURE)
            }
        };
    }

    tokio::select! {
        result = run(&cli) => match result {
            Ok(()) => ExitCode::from(codes::SUCCESS),
            Err(e) => {
                error!("{:#}", e);
                ExitCode::from(exit_code(&e))
            }
        },
        _ = wait_for_interrupt(tokio::signal::ctrl_c()) => {
            eprintln!();
            eprintln!("Operation cancelled by user");
            ExitCode::from(codes::FAILURE)
        }
    }
}

/// Resolves when the user interrupts. If the handler cannot be installed,
/// the scan runs on without Ctrl-C handling.
async fn wait_for_interrupt(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        warn!("Could not install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<CostChefError>()
        .map(exit_code_for_error)
        .unwrap_or(codes::FAILURE)
}

async fn run(cli: &Cli) -> Result<()> {
    let profile = OciProfile::load(cli.config_path.as_deref(), Some(&cli.profile))?;
    info!("Loaded OCI profile {}", profile.describe());

    let rules = Config::load(cli.rules.as_deref())?;
    let client = OciCliClient::new(&profile)?;

    let requested = cli.compartments.as_deref().map(parse_compartment_list);
    let scopes = resolve_scopes(&client, requested.as_deref(), &profile.tenancy).await?;
    if scopes.is_empty() {
        anyhow::bail!("No accessible compartments found");
    }
    info!(
        "Will check compartments: {}",
        scopes
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let ctx = ScanContext::new(&client, &client, &rules);
    let outcome = Aggregator::default().run(&ctx, &scopes).await;

    if outcome.bundle.is_empty() {
        info!("No cost optimization opportunities found in dev/test resources.");
    } else {
        let output_dir = expand_path(&cli.output_path);
        let artifacts = write_reports(&outcome.bundle, &output_dir, Local::now())
            .context("Report generation failed")?;
        info!("Wrote {} report files", artifacts.all_files().count());

        if !cli.no_open {
            match open_in_browser(&artifacts.html_file) {
                Ok(()) => info!("Opening HTML report in default browser..."),
                Err(e) => warn!(
                    "Could not auto-open HTML report ({}). Please open manually: {}",
                    e,
                    artifacts.html_file.display()
                ),
            }
        }
    }

    print_summary(&outcome.bundle, &outcome.scan_errors);
    if outcome.bundle.is_empty() {
        info!("Your OCI dev/test kitchen is perfectly optimized: no waste detected!");
    } else {
        info!("Review the detailed reports and start cooking up some serious OCI savings!");
    }
    Ok(())
}
