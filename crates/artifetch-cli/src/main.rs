//! Artifetch CLI - download artifacts from Helm repositories and Bitbucket

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use artifetch_core::Artifact;

mod commands;
mod error;
mod exit_codes;

use error::Result;

#[derive(Parser)]
#[command(name = "artifetch")]
#[command(author = "Artifetch Contributors")]
#[command(version)]
#[command(about = "Download artifacts from Helm repositories and Bitbucket", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Account configuration file (default: <config dir>/artifetch/artifacts.yaml)
    #[arg(long, global = true, env = "ARTIFETCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured accounts
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download an artifact
    Download {
        /// Account to download from (default: first account serving the type)
        #[arg(short, long)]
        account: Option<String>,

        /// Artifact type (e.g. helm/chart, helm/index, bitbucket/file)
        #[arg(short = 't', long = "type")]
        artifact_type: String,

        /// Artifact name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Artifact version (empty selects the latest)
        #[arg(short, long, default_value = "")]
        version: String,

        /// Direct reference (URL or path relative to the account repository)
        #[arg(short, long)]
        reference: Option<String>,

        /// Output file (if not set, writes to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List artifact names of an account
    Names {
        /// Account name
        #[arg(short, long)]
        account: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List versions of an artifact
    Versions {
        /// Account name
        #[arg(short, long)]
        account: String,

        /// Artifact name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let accounts = commands::load_accounts(cli.config.as_deref())?;

    match cli.command {
        Commands::Accounts { json } => commands::accounts::run(&accounts, json),

        Commands::Download {
            account,
            artifact_type,
            name,
            version,
            reference,
            output,
        } => {
            let mut artifact = Artifact::new(artifact_type, name, version);
            if let Some(reference) = reference {
                artifact = artifact.with_reference(reference);
            }
            commands::download::run(&accounts, account.as_deref(), &artifact, output.as_deref())
                .await
        }

        Commands::Names { account, json } => commands::list::names(&accounts, &account, json).await,

        Commands::Versions {
            account,
            name,
            json,
        } => commands::list::versions(&accounts, &account, &name, json).await,
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        let code = e.exit_code();
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(code);
    }
}
