//! Action handling
//!
//! Actions are queued in [`AppState`] and dispatched here one at a time.

use std::path::Path;

use jig_core::export_stl;

use crate::state::{AppAction, AppState};

/// Dispatch an action to its handler
pub fn dispatch_action(action: AppAction, state: &mut AppState) {
    match action {
        AppAction::SetParameter { key, value } => handle_set_parameter(&key, value, state),
        AppAction::SetVisibility { label, visible } => {
            handle_set_visibility(&label, visible, state)
        }
        AppAction::Rebuild => {
            state.rebuild();
        }
        AppAction::Export(dir) => handle_export(&dir, state),
    }
}

fn handle_set_parameter(key: &str, value: f64, state: &mut AppState) {
    match state.definition().parameters().iter().find(|s| s.key == key) {
        Some(spec) if !spec.contains(value) => tracing::warn!(
            "{} = {} is outside {}..{}",
            key,
            value,
            spec.min,
            spec.max
        ),
        Some(_) => {}
        None => tracing::warn!("'{}' is not a parameter of '{}'", key, state.definition().name()),
    }

    let previous = state.params_mut().set(key, value);
    tracing::info!("Set {} = {} (was {:?})", key, value, previous);
    state.queue_action(AppAction::Rebuild);
}

fn handle_set_visibility(label: &str, visible: bool, state: &mut AppState) {
    if !state.set_item_checked(label, visible) {
        tracing::warn!("Cannot change visibility of '{}': no such item", label);
        state.set_status(format!("No item named '{}'", label));
    }
}

fn handle_export(dir: &Path, state: &mut AppState) {
    let Some(assembly) = state.assembly() else {
        tracing::error!("Nothing to export");
        state.set_status("Nothing to export");
        return;
    };

    let tolerance = state.sync().config().tessellation_tolerance;
    match export_stl(state.kernel(), assembly, dir, tolerance) {
        Ok(paths) => tracing::info!("Exported {} files to {}", paths.len(), dir.display()),
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            state.set_status(format!("Export failed: {}", e));
        }
    }
}
