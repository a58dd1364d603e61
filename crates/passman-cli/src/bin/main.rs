//! passman - local credential vault
//!
//! Keeps (service, username, password) triples in a file encrypted under a
//! master password and hands them out through the clipboard, which is
//! cleared once the user is done.
//!
//! Usage: `passman get|add|remove <service>` or `passman init`.

use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use passman_cli::{list_process_names, CommandClipboard, Console};
use passman_core::{ClipboardExposure, Entry, Operation, Settings, SettingsManager, Vault};

/// passman - encrypted per-service credentials with clipboard handoff
#[derive(Parser, Debug)]
#[command(name = "passman")]
#[command(version)]
#[command(about = "passman - encrypted per-service credentials with clipboard handoff")]
struct Args {
    /// Operation to perform: get, add, remove or init
    operation: Operation,

    /// Service the operation targets (not used by init)
    service: Option<String>,

    /// Settings file (default: per-user config directory)
    #[arg(long, env = "PASSMAN_CONFIG")]
    config: Option<PathBuf>,

    /// Encrypted store file (overrides the settings file)
    #[arg(long, env = "PASSMAN_STORE")]
    store: Option<PathBuf>,

    /// Key derivation salt (overrides the settings file)
    #[arg(long, env = "PASSMAN_SALT", hide_env_values = true)]
    salt: Option<String>,

    /// Skip the clipboard history tool check before exposing a secret
    #[arg(long)]
    no_scan: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so they never mix with the prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut manager = match &args.config {
        Some(path) => SettingsManager::load(path),
        None => SettingsManager::new(),
    }
    .context("Failed to load settings")?;

    if !args.operation.requires_service() {
        return init(&mut manager).await;
    }

    let service = args
        .service
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Usage: passman add|remove|get <service>"))?;

    let settings = manager.get().clone().with_overrides(args.salt, args.store);
    // Salt problems surface before the password prompt
    let vault = Vault::new(&settings)?;

    let mut console = Console::new();
    let password = console.read_secret("Enter main password : ")?;

    match args.operation {
        Operation::Get => {
            let entry = vault.get(password.expose(), &service).await?;
            drop(password);

            if !args.no_scan {
                check_applications(&settings, &mut console).await?;
            }
            expose(&entry, &mut console).await?;
        }
        Operation::Add => {
            let entry = console.read_entry(&service).await?;
            vault.add(password.expose(), entry).await?;
            println!("Stored authorization information for {} service.", service);
        }
        Operation::Remove => {
            vault.remove(password.expose(), &service).await?;
            println!("Removed authorization information for {} service.", service);
        }
        // Returned early, before the password prompt
        Operation::Init => {}
    }

    Ok(())
}

async fn init(manager: &mut SettingsManager) -> anyhow::Result<()> {
    let path = manager.settings_file().display().to_string();

    if manager.init_salt().await? {
        info!("Generated salt in {}", path);
        println!("Generated a new salt in {}", path);
    } else {
        println!("A salt is already configured in {}; leaving it unchanged.", path);
    }

    Ok(())
}

/// Warn about clipboard history tools and let the user back out
async fn check_applications(settings: &Settings, console: &mut Console) -> anyhow::Result<()> {
    let suspects = settings.threat_scanner().scan(&list_process_names());
    if suspects.is_empty() {
        return Ok(());
    }

    warn!("{} clipboard history tool(s) running", suspects.len());
    for name in &suspects {
        println!("Found suspect application : {}", name);
    }
    console.pause("Press enter to continue.").await?;
    Ok(())
}

async fn expose(entry: &Entry, console: &mut Console) -> anyhow::Result<()> {
    let clipboard = CommandClipboard::for_host();

    println!(
        "Exposing authorization information for {} service.",
        entry.service()
    );
    ClipboardExposure::new(&clipboard)
        .expose(entry, console)
        .await
        .context("Clipboard handoff failed")?;

    Ok(())
}
