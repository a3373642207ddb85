#![deny(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::must_use_candidate)]

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use gatekeep::{Directive, Gatekeep, GatekeepConfig};
use gatekeep_common::{context::Context, internal, logging, status::Status};
use tokio::io::AsyncReadExt;

/// Run the gatekeep data hook over a single message.
///
/// Prints the SMTP reply and exits 0 when the message may continue, 1 when
/// it is denied.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (RON). Falls back to `GATEKEEP_CONFIG`, then the
    /// default locations.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw RFC 5322 message. Read from stdin when omitted.
    message: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config_path = find_config_file(args.config)?;
    let config = GatekeepConfig::from_file(&config_path)?;

    logging::init();
    internal!(level = INFO, "Loaded config from {}", config_path.display());

    let hook = Gatekeep::from_config(&config)?;

    let data = read_message(args.message.as_deref()).await?;
    let id = Context::message_id(&data).unwrap_or_else(|| String::from("<unknown>"));
    let mut context = Context::from_message(id, &data)?;

    let directive = hook.data_post(&mut context).await;
    let (status, response) = context
        .response
        .unwrap_or_else(|| (Status::Ok, String::from("Ok")));

    println!("{status} {response}");

    Ok(match directive {
        Directive::Continue => ExitCode::SUCCESS,
        Directive::Deny => ExitCode::FAILURE,
    })
}

async fn read_message(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let mut data = Vec::new();

    match path {
        Some(path) => {
            tokio::fs::File::open(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?
                .read_to_end(&mut data)
                .await?;
        }
        None => {
            tokio::io::stdin().read_to_end(&mut data).await?;
        }
    }

    Ok(data)
}

/// Find the configuration file using the following precedence:
/// 1. `--config`
/// 2. `GATEKEEP_CONFIG` environment variable
/// 3. ./gatekeep.config.ron (current working directory)
/// 4. /etc/gatekeep/gatekeep.config.ron (system-wide config)
fn find_config_file(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Ok(env_path) = std::env::var("GATEKEEP_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        anyhow::bail!(
            "GATEKEEP_CONFIG points to non-existent file: {}",
            path.display()
        );
    }

    let default_paths = [
        PathBuf::from("./gatekeep.config.ron"),
        PathBuf::from("/etc/gatekeep/gatekeep.config.ron"),
    ];

    for path in &default_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let paths_tried = default_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    anyhow::bail!(
        "No configuration file found. Tried:\n  - --config\n  - GATEKEEP_CONFIG environment variable\n{paths_tried}"
    )
}
