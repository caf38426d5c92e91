use clap::Parser;
use fixture_harness::app::{handle_fatal_error, init_logging, AppConfig, FileConfig};
use fixture_harness::credentials::CredentialLoader;
use fixture_harness::workflow;
use std::path::PathBuf;
use tracing::warn;

/// Seed an in-memory employee table and ask a completion endpoint one question
#[derive(Parser)]
#[command(name = "fixture-harness")]
#[command(about = "Seed an in-memory fixture and run one completion request", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// File whose first line holds the API key
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Seed for the fixture generator
    #[arg(long)]
    seed: Option<u64>,

    /// Completion API root URL
    #[arg(long)]
    root_url: Option<String>,

    /// Model name sent with the request
    #[arg(long)]
    model: Option<String>,
}

impl Cli {
    fn app_config(&self) -> fixture_harness::Result<AppConfig> {
        let mut config = AppConfig::new(self.verbose);
        if let Some(path) = &self.config {
            config = config.with_file_config(FileConfig::load(path)?);
        }
        if let Some(path) = &self.key_file {
            config = config.with_credential_file(path.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(url) = &self.root_url {
            config = config.with_root_url(url);
        }
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.app_config() {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e.into(), cli.verbose),
    };
    init_logging(&config);

    tokio::select! {
        result = run(&config) => {
            if let Err(e) = result {
                handle_fatal_error(e, config.verbose);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            // The run future is dropped by now, which closes the database
            // connection and the HTTP client.
            warn!("Interrupted, resources released");
            eprintln!("Interrupted");
            std::process::exit(130);
        }
    }
}

async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let loader = CredentialLoader::new();
    let (credentials, _outcome) = workflow::prepare_credentials(config, &loader);

    let mut rng = config.rng();
    let report = workflow::run(config, &credentials, &mut rng).await?;

    println!("answer = {:?}", report.answer);
    Ok(())
}
