//! Build command: resolve credentials and prepare one job per platform.

use anyhow::{Context, Result};
use futures::future::join;
use shipyard_builder::{AndroidBuilder, Builder, BuilderContext, IosBuilder, Job};
use shipyard_config::{ConfigReader, ConfigResult, ReaderOptions};
use shipyard_core::{
    CredentialsSource, Platform, PlatformSelection, ProjectContext, Prompter,
    RemoteCredentialStore,
};
use shipyard_credentials::{HttpCredentialStore, NonInteractivePrompter, TerminalPrompter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

pub struct BuildOptions {
    pub api_url: String,
    pub token: Option<String>,
    pub project_dir: PathBuf,
    pub platform: PlatformSelection,
    pub preset: String,
    pub credentials_source: Option<CredentialsSource>,
    pub account: String,
    pub project: Option<String>,
    pub bundle_identifier: Option<String>,
    pub archive_url: Option<String>,
    pub non_interactive: bool,
}

/// Run the build pipeline for every selected platform.
pub async fn run(opts: BuildOptions) -> Result<()> {
    let project_dir = opts
        .project_dir
        .canonicalize()
        .with_context(|| {
            format!(
                "Failed to resolve project directory: {}",
                opts.project_dir.display()
            )
        })?;

    let reader = ConfigReader::new(
        &project_dir,
        ReaderOptions::new(opts.platform).with_credentials_source(opts.credentials_source),
    );
    let resolution = reader
        .resolve_each(&opts.preset)
        .with_context(|| format!("Failed to read {}", reader.config_path().display()))?;

    let project_name = match opts.project {
        Some(name) => name,
        None => default_project_name(&project_dir)?,
    };
    let mut project = ProjectContext::new(&project_dir, opts.account, project_name);
    if let Some(bundle_identifier) = opts.bundle_identifier {
        project = project.with_bundle_identifier(bundle_identifier);
    }

    let archive_url = opts
        .archive_url
        .unwrap_or_else(|| format!("file://{}", project_dir.display()));

    let store: Arc<dyn RemoteCredentialStore> =
        Arc::new(HttpCredentialStore::new(opts.api_url, opts.token));
    let prompter: Arc<dyn Prompter> = if opts.non_interactive {
        Arc::new(NonInteractivePrompter::new())
    } else {
        Arc::new(TerminalPrompter::new())
    };
    let ctx = BuilderContext {
        project,
        credentials_source: resolution.credentials_source,
        store,
        prompter,
    };

    info!(
        preset = %opts.preset,
        platform = %opts.platform,
        credentials_source = %resolution.credentials_source,
        "Starting build"
    );

    let android = run_platform(
        resolution.android,
        |preset| AndroidBuilder::new(ctx.clone(), preset),
        &archive_url,
    );
    let ios = run_platform(
        resolution.ios,
        |preset| IosBuilder::new(ctx.clone(), preset),
        &archive_url,
    );
    let (android, ios) = join(android, ios).await;

    let mut failed = 0;
    for (platform, outcome) in [(Platform::Android, android), (Platform::Ios, ios)] {
        match outcome {
            Some(Ok(job)) => println!("{}", serde_json::to_string_pretty(&job)?),
            Some(Err(e)) => {
                failed += 1;
                error!(platform = %platform, error = %e, "Build failed");
                eprintln!("{} build failed: {:#}", platform, e);
            }
            None => {}
        }
    }

    if failed > 0 {
        anyhow::bail!("{} platform build(s) failed", failed);
    }
    Ok(())
}

/// Run one platform's pipeline, or nothing when the platform was not selected.
async fn run_platform<P, B>(
    preset: Option<ConfigResult<P>>,
    builder: impl FnOnce(P) -> B,
    archive_url: &str,
) -> Option<Result<Job>>
where
    B: Builder,
{
    let preset = match preset? {
        Ok(preset) => preset,
        Err(e) => return Some(Err(e.into())),
    };
    Some(prepare(builder(preset), archive_url).await)
}

async fn prepare<B: Builder>(mut builder: B, archive_url: &str) -> Result<Job> {
    builder
        .ensure_credentials()
        .await
        .with_context(|| format!("Failed to resolve {} credentials", builder.platform()))?;
    Ok(builder.prepare_job(archive_url))
}

fn default_project_name(project_dir: &Path) -> Result<String> {
    project_dir
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .context("Cannot derive a project name from the project directory; pass --project")
}
