//! Checkable item tree
//!
//! Pairs each top-level item with the render set created for it, so toggling
//! a checkbox hides exactly that part's surfaces and edges.

use std::collections::BTreeSet;

use jig_core::{ItemNode, ItemTree};

use crate::scene::SceneBackend;
use crate::sync::{RenderSet, SyncOutcome, set_visibility};

/// A top-level item with its check state
#[derive(Debug, Clone, PartialEq)]
pub struct TreeItem {
    /// Item and its children
    pub node: ItemNode,
    /// Elements shown for this item
    pub render_set: RenderSet,
    /// Whether the item is shown
    pub checked: bool,
}

/// Item tree bound to the scene produced by one sync
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTree {
    title: String,
    items: Vec<TreeItem>,
}

impl SceneTree {
    /// Bind an item tree to the render sets of a sync
    ///
    /// Items are matched to render sets by position; every item starts
    /// checked.
    pub fn new(tree: &ItemTree, outcome: &SyncOutcome) -> Self {
        let items = tree
            .top_level()
            .iter()
            .enumerate()
            .map(|(i, node)| TreeItem {
                node: node.clone(),
                render_set: outcome.render_sets.get(i).cloned().unwrap_or_default(),
                checked: true,
            })
            .collect();
        Self {
            title: tree.root.label.clone(),
            items,
        }
    }

    /// Assembly name shown at the root
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Top-level items in assembly order
    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    /// Check or uncheck the item labeled `label`
    ///
    /// Returns false if no such item exists.
    pub fn set_checked(
        &mut self,
        backend: &mut dyn SceneBackend,
        label: &str,
        checked: bool,
    ) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.node.label == label) else {
            tracing::warn!("No item named '{}'", label);
            return false;
        };
        item.checked = checked;
        set_visibility(backend, &item.render_set, checked);
        true
    }

    /// Labels of unchecked items
    pub fn hidden_labels(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .filter(|i| !i.checked)
            .map(|i| i.node.label.clone())
            .collect()
    }

    /// Re-apply hidden state after a rebuild
    ///
    /// Labels with no matching item are ignored.
    pub fn restore_hidden(&mut self, backend: &mut dyn SceneBackend, labels: &BTreeSet<String>) {
        for label in labels {
            if self.items.iter().any(|i| &i.node.label == label) {
                self.set_checked(backend, label, false);
            }
        }
    }

    /// Text rendering with check marks on top-level items
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for item in &self.items {
            let mark = if item.checked { "[x]" } else { "[ ]" };
            out.push_str(&format!("  {} {} [{}]\n", mark, item.node.label, item.node.kind.name()));
            for child in &item.node.children {
                write_node(child, 2, &mut out);
            }
        }
        out
    }
}

fn write_node(node: &ItemNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{} [{}]\n", node.label, node.kind.name()));
    for child in &node.children {
        write_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use jig_cad::{CadKernel, MockKernel};
    use jig_core::{Part, PlacedAssembly, PlacedPart, RigidTransform};

    use crate::config::SceneConfig;
    use crate::scene::Scene;
    use crate::sync::SceneSync;

    fn setup() -> (Scene, SceneTree) {
        let kernel = MockKernel::new();
        let parts = ["one", "two"]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let solid = kernel
                    .create_box(DVec3::new(i as f64 * 3.0, 0.0, 0.0), DVec3::ONE)
                    .unwrap();
                PlacedPart::new(Part::solid(*label, solid), RigidTransform::IDENTITY)
            })
            .collect();
        let assembly = PlacedAssembly::new("asm", parts);

        let mut scene = Scene::new();
        let outcome = SceneSync::new(SceneConfig::default()).sync(&kernel, &mut scene, &assembly);
        let tree = SceneTree::new(&ItemTree::from_assembly(&assembly), &outcome);
        (scene, tree)
    }

    #[test]
    fn test_uncheck_hides_only_that_item() {
        let (mut scene, mut tree) = setup();
        assert_eq!(scene.visible_ids().len(), 4);

        assert!(tree.set_checked(&mut scene, "one", false));
        let visible = scene.visible_ids();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|id| tree.items()[1].render_set.contains(*id)));

        tree.set_checked(&mut scene, "one", true);
        assert_eq!(scene.visible_ids().len(), 4);
    }

    #[test]
    fn test_unknown_label() {
        let (mut scene, mut tree) = setup();
        assert!(!tree.set_checked(&mut scene, "missing", false));
        assert!(tree.hidden_labels().is_empty());
    }

    #[test]
    fn test_restore_hidden() {
        let (mut scene, mut tree) = setup();
        let hidden: BTreeSet<String> = ["two".to_string(), "gone".to_string()].into();
        tree.restore_hidden(&mut scene, &hidden);

        assert_eq!(tree.hidden_labels(), ["two".to_string()].into());
        assert_eq!(scene.visible_ids().len(), 2);
    }

    #[test]
    fn test_text_marks() {
        let (mut scene, mut tree) = setup();
        tree.set_checked(&mut scene, "two", false);
        assert_eq!(tree.to_text(), "asm\n  [x] one [Part]\n  [ ] two [Part]\n");
    }
}
