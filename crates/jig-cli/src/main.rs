//! Jig shell entry point

use std::process::ExitCode;

use clap::Parser;

use jig_cad::default_kernel;
use jig_cli::{AppState, Cli, CliError};
use jig_core::{AppConfig, AssemblyDefinition, Params, TabletHolder};
use jig_scene::SceneConfig;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jig_cli=info,jig_scene=info,jig_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let definition = TabletHolder::new();
    if cli.list_params {
        print_parameters(&definition);
        return Ok(());
    }

    let mut config = AppConfig::load(&cli.config)?;
    let params_path = cli.params_path()?;
    let params = Params::load(&params_path)?;
    tracing::info!(
        "Loaded {} parameters from {}",
        params.len(),
        params_path.display()
    );

    let mut state = AppState::new(
        default_kernel(),
        Box::new(definition),
        params,
        SceneConfig::default(),
    );
    state.restore_config(&config);
    for action in cli.actions() {
        state.queue_action(action);
    }
    state.process_actions();

    if let Some(tree) = state.tree() {
        print!("{}", tree.to_text());
    }
    if let Some(status) = state.status() {
        println!("{}", status);
    }

    state.store_config(&mut config);
    config.save(&cli.config)?;

    if state.assembly().is_none() {
        return Err(CliError::NothingBuilt(
            state.status().unwrap_or("no assembly").to_string(),
        ));
    }
    Ok(())
}

fn print_parameters(definition: &dyn AssemblyDefinition) {
    println!("{}", definition.name());
    for spec in definition.parameters() {
        println!(
            "  {:<20} {:<20} {} .. {}",
            spec.key, spec.label, spec.min, spec.max
        );
    }
}
