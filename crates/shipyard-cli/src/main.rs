//! Shipyard CLI tool.

use clap::{Parser, Subcommand};
use shipyard_core::{CredentialsSource, PlatformSelection};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shipyard")]
#[command(about = "Build mobile apps with managed signing credentials", long_about = None)]
struct Cli {
    /// Credentials API URL
    #[arg(long, env = "SHIPYARD_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// API access token
    #[arg(long, env = "SHIPYARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve credentials and prepare build jobs
    Build {
        /// Project root containing shipyard.json
        #[arg(default_value = ".")]
        project_dir: PathBuf,
        /// Platform to build for (android, ios or all)
        #[arg(short, long)]
        platform: PlatformSelection,
        /// Build preset name
        #[arg(long, default_value = "release")]
        preset: String,
        /// Where signing credentials come from (local, remote or auto)
        #[arg(short = 's', long)]
        credentials_source: Option<CredentialsSource>,
        /// Account owning the project
        #[arg(long, env = "SHIPYARD_ACCOUNT")]
        account: String,
        /// Project name, defaults to the project directory name
        #[arg(long, env = "SHIPYARD_PROJECT")]
        project: Option<String>,
        /// iOS bundle identifier
        #[arg(long, env = "SHIPYARD_BUNDLE_IDENTIFIER")]
        bundle_identifier: Option<String>,
        /// URL of the uploaded project archive
        #[arg(long)]
        archive_url: Option<String>,
        /// Fail instead of prompting
        #[arg(long, env = "SHIPYARD_NON_INTERACTIVE")]
        non_interactive: bool,
    },
    /// Validate a build preset
    Validate {
        /// Project root containing shipyard.json
        #[arg(default_value = ".")]
        project_dir: PathBuf,
        /// Platform to validate (android, ios or all)
        #[arg(short, long)]
        platform: PlatformSelection,
        /// Build preset name
        #[arg(long, default_value = "release")]
        preset: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Build {
            project_dir,
            platform,
            preset,
            credentials_source,
            account,
            project,
            bundle_identifier,
            archive_url,
            non_interactive,
        } => {
            commands::build::run(commands::build::BuildOptions {
                api_url: cli.api_url,
                token: cli.token,
                project_dir,
                platform,
                preset,
                credentials_source,
                account,
                project,
                bundle_identifier,
                archive_url,
                non_interactive,
            })
            .await?;
        }
        Commands::Validate {
            project_dir,
            platform,
            preset,
        } => {
            commands::validate(&project_dir, platform, &preset)?;
        }
    }

    Ok(())
}
