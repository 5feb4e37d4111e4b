//! Whole sessions driven from files on disk

use clap::Parser;
use jig_cad::MockKernel;
use jig_cli::{AppState, Cli, CliError};
use jig_core::projects::tablet_holder::default_params;
use jig_core::{AppConfig, Params, TabletHolder};
use jig_scene::{SceneBackend, SceneConfig};

fn session(cli: &Cli) -> Result<(AppState, AppConfig), CliError> {
    let config = AppConfig::load(&cli.config)?;
    let params = Params::load(cli.params_path()?)?;
    let mut state = AppState::new(
        Box::new(MockKernel::new()),
        Box::new(TabletHolder),
        params,
        SceneConfig::default(),
    );
    state.restore_config(&config);
    for action in cli.actions() {
        state.queue_action(action);
    }
    state.process_actions();
    Ok((state, config))
}

#[test]
fn test_session_saves_camera_and_restores_it() {
    let dir = tempfile::tempdir().unwrap();
    let params_path = dir.path().join("params.json");
    let config_path = dir.path().join("jig.ron");
    default_params().save(&params_path).unwrap();

    let args = [
        "jig",
        "--params",
        params_path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
    ];
    let cli = Cli::parse_from(args);
    let (state, mut config) = session(&cli).unwrap();
    assert_eq!(state.scene().len(), 6);
    state.store_config(&mut config);
    config.save(&config_path).unwrap();

    let (second, _) = session(&Cli::parse_from(args)).unwrap();
    assert_eq!(second.scene().camera(), state.scene().camera());
}

#[test]
fn test_session_applies_edits_hides_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let params_path = dir.path().join("params.json");
    let out = dir.path().join("stl");
    default_params().save(&params_path).unwrap();

    let cli = Cli::parse_from([
        "jig",
        "--params",
        params_path.to_str().unwrap(),
        "--config",
        dir.path().join("jig.ron").to_str().unwrap(),
        "--set",
        "visor_angle=30",
        "--hide",
        TabletHolder::ADAPTER,
        "--export",
        out.to_str().unwrap(),
    ]);
    let (state, _) = session(&cli).unwrap();

    assert_eq!(state.params().try_get("visor_angle"), Some(30.0));
    let text = state.tree().unwrap().to_text();
    assert!(text.contains("[ ] VESA Adapter"));
    assert!(text.contains("[x] Left Half"));
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 3);
}

#[test]
fn test_missing_params_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::parse_from([
        "jig",
        "--params",
        dir.path().join("absent.json").to_str().unwrap(),
    ]);
    assert!(matches!(session(&cli), Err(CliError::Params(_))));
}

#[test]
fn test_incomplete_params_leave_nothing_built() {
    let dir = tempfile::tempdir().unwrap();
    let params_path = dir.path().join("params.json");
    let mut params = default_params();
    params.remove("claw_grip");
    params.save(&params_path).unwrap();

    let cli = Cli::parse_from([
        "jig",
        "--params",
        params_path.to_str().unwrap(),
        "--config",
        dir.path().join("jig.ron").to_str().unwrap(),
    ]);
    let (state, _) = session(&cli).unwrap();
    assert!(state.assembly().is_none());
    assert!(state.status().unwrap().contains("claw_grip"));
}
