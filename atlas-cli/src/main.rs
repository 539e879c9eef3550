use anyhow::Result;
use atlas_cli::output::{print_error, print_located, print_summary, print_summary_json};
use atlas_cli::{commands, Cli, Commands, Settings};
use atlas_reconcile::ReconcileError;
use atlas_store::StoreError;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{e:#}"));
            if is_missing_configuration(&e) {
                print_error("Set NOTION_TOKEN in the environment or a .env file");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.env_file.as_deref())?;
    let store = commands::connect(&settings)?;

    match cli.command {
        Commands::Bootstrap(args) => {
            let summary = commands::bootstrap(store, &args, &settings.owner_name).await?;
            if args.json {
                print_summary_json(&summary)?;
            } else {
                print_summary(&summary, &settings.owner_name);
            }
        }
        Commands::Locate(args) => {
            let located = commands::locate(store, &args).await?;
            print_located(&args.name, args.kind, located.as_ref());
        }
    }
    Ok(())
}

fn is_missing_configuration(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<StoreError>(),
            Some(StoreError::MissingConfiguration(_))
        ) || cause
            .downcast_ref::<ReconcileError>()
            .is_some_and(ReconcileError::is_missing_configuration)
    })
}
