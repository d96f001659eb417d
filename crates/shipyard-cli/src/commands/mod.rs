//! CLI commands.

pub mod build;

use anyhow::Result;
use serde::Serialize;
use shipyard_config::{ConfigReader, ConfigResult, ReaderOptions};
use shipyard_core::{Platform, PlatformSelection};
use std::path::Path;

/// Validate the named preset for every selected platform.
pub fn validate(project_dir: &Path, platform: PlatformSelection, preset: &str) -> Result<()> {
    let reader = ConfigReader::new(project_dir, ReaderOptions::new(platform));
    let resolution = reader.resolve_each(preset)?;

    println!("Configuration: {}", reader.config_path().display());
    println!("Credentials source: {}", resolution.credentials_source);

    let mut failed = 0;
    let mut report = |platform: Platform, outcome: Option<Result<String>>| match outcome {
        Some(Ok(json)) => println!("{} preset \"{}\" is valid:\n{}", platform, preset, json),
        Some(Err(e)) => {
            failed += 1;
            println!("{} preset \"{}\" is invalid: {}", platform, preset, e);
        }
        None => {}
    };

    report(Platform::Android, resolution.android.map(render));
    report(Platform::Ios, resolution.ios.map(render));

    if failed > 0 {
        anyhow::bail!("{} preset(s) failed validation", failed);
    }
    Ok(())
}

fn render<T: Serialize>(preset: ConfigResult<T>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&preset?)?)
}
