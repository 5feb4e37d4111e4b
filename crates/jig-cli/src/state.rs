//! Application state
//!
//! Holds the parameters, the last successful assembly, the scene and its
//! item tree. Edits arrive as [`AppAction`]s and are processed one at a time.

use std::path::PathBuf;

use jig_cad::CadKernel;
use jig_core::{AppConfig, AssemblyDefinition, ItemTree, Params, PlacedAssembly};
use jig_scene::{Camera, Scene, SceneBackend, SceneConfig, SceneSync, SceneTree};

use crate::actions::dispatch_action;

/// Actions that can be performed on the app state
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Change one parameter, then rebuild
    SetParameter { key: String, value: f64 },
    /// Show or hide a top-level item
    SetVisibility { label: String, visible: bool },
    /// Rebuild from the current parameters
    Rebuild,
    /// Write one STL per part into a directory
    Export(PathBuf),
}

/// Application state
pub struct AppState {
    kernel: Box<dyn CadKernel>,
    definition: Box<dyn AssemblyDefinition>,
    params: Params,
    scene: Scene,
    sync: SceneSync,
    assembly: Option<PlacedAssembly>,
    tree: Option<SceneTree>,
    status: Option<String>,
    pending_actions: Vec<AppAction>,
}

impl AppState {
    /// Create a state with an empty scene; nothing is built until a
    /// [`AppAction::Rebuild`] is processed
    pub fn new(
        kernel: Box<dyn CadKernel>,
        definition: Box<dyn AssemblyDefinition>,
        params: Params,
        scene_config: SceneConfig,
    ) -> Self {
        let scene = Scene::new().with_background(scene_config.background);
        Self {
            kernel,
            definition,
            params,
            scene,
            sync: SceneSync::new(scene_config),
            assembly: None,
            tree: None,
            status: None,
            pending_actions: Vec::new(),
        }
    }

    /// Apply a saved camera pose, which then survives the first rebuild
    pub fn restore_config(&mut self, config: &AppConfig) {
        if let Some(pose) = config.camera {
            self.scene.set_camera(Camera::from(pose));
            self.sync.skip_initial_view();
        }
    }

    /// Record the current camera pose for saving
    pub fn store_config(&self, config: &mut AppConfig) {
        config.camera = Some(self.scene.camera().into());
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Take pending actions
    pub fn take_pending_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Process queued actions until none are left
    ///
    /// Each action runs to completion before the next one starts; actions
    /// queued while processing run after the current batch.
    pub fn process_actions(&mut self) {
        loop {
            let actions = self.take_pending_actions();
            if actions.is_empty() {
                break;
            }
            for action in actions {
                dispatch_action(action, self);
            }
        }
    }

    /// Rebuild the assembly and replace the scene content
    ///
    /// On failure the previous scene, item tree and cache stay as they were
    /// and the error is kept as the status message.
    pub fn rebuild(&mut self) -> bool {
        let assembly = match self.definition.build(self.kernel.as_ref(), &self.params) {
            Ok(assembly) => assembly,
            Err(e) => {
                tracing::error!("Rebuild of '{}' failed: {}", self.definition.name(), e);
                self.status = Some(format!("Rebuild failed: {}", e));
                return false;
            }
        };

        let hidden = self
            .tree
            .as_ref()
            .map(SceneTree::hidden_labels)
            .unwrap_or_default();
        let outcome = self
            .sync
            .sync(self.kernel.as_ref(), &mut self.scene, &assembly);
        let mut tree = SceneTree::new(&ItemTree::from_assembly(&assembly), &outcome);
        tree.restore_hidden(&mut self.scene, &hidden);

        self.status = if outcome.failures.is_empty() {
            None
        } else {
            let labels: Vec<_> = outcome.failures.iter().map(|f| f.label.as_str()).collect();
            Some(format!("Could not display: {}", labels.join(", ")))
        };
        self.assembly = Some(assembly);
        self.tree = Some(tree);
        true
    }

    /// Geometry kernel
    pub fn kernel(&self) -> &dyn CadKernel {
        self.kernel.as_ref()
    }

    /// Assembly definition being edited
    pub fn definition(&self) -> &dyn AssemblyDefinition {
        self.definition.as_ref()
    }

    /// Current parameters
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Scene shown to the user
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scene synchronizer and its cache
    pub fn sync(&self) -> &SceneSync {
        &self.sync
    }

    /// Last successfully built assembly
    pub fn assembly(&self) -> Option<&PlacedAssembly> {
        self.assembly.as_ref()
    }

    /// Item tree of the last successful build
    pub fn tree(&self) -> Option<&SceneTree> {
        self.tree.as_ref()
    }

    /// Check or uncheck a top-level item
    pub fn set_item_checked(&mut self, label: &str, checked: bool) -> bool {
        match self.tree.as_mut() {
            Some(tree) => tree.set_checked(&mut self.scene, label, checked),
            None => false,
        }
    }

    /// Latest status message, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Replace the status message
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}
