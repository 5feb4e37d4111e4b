//! Tree description of a placed assembly for item lists

use serde::Serialize;

use crate::part::{Part, Shape};

use super::PlacedAssembly;

/// Kind of tree item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    Assembly,
    Part,
    Compound,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Assembly => "Assembly",
            ItemKind::Part => "Part",
            ItemKind::Compound => "Compound",
        }
    }
}

/// One node of the item tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemNode {
    pub label: String,
    pub kind: ItemKind,
    pub children: Vec<ItemNode>,
}

impl ItemNode {
    fn from_part(part: &Part) -> Self {
        match part.shape() {
            Shape::Solid(_) => Self {
                label: part.label().to_string(),
                kind: ItemKind::Part,
                children: Vec::new(),
            },
            Shape::Compound(children) => Self {
                label: part.label().to_string(),
                kind: ItemKind::Compound,
                children: children.iter().map(|c| Self::from_part(c.part())).collect(),
            },
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ItemNode::count).sum::<usize>()
    }
}

/// Item tree of a placed assembly
///
/// The root is the assembly; its children are the top-level parts in
/// assembly order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTree {
    pub root: ItemNode,
}

impl ItemTree {
    pub fn from_assembly(assembly: &PlacedAssembly) -> Self {
        Self {
            root: ItemNode {
                label: assembly.name().to_string(),
                kind: ItemKind::Assembly,
                children: assembly
                    .parts()
                    .iter()
                    .map(|p| ItemNode::from_part(p.part()))
                    .collect(),
            },
        }
    }

    /// Top-level part items
    pub fn top_level(&self) -> &[ItemNode] {
        &self.root.children
    }

    /// Indented text rendering, one item per line
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        Self::write_node(&self.root, 0, &mut out);
        out
    }

    fn write_node(node: &ItemNode, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} [{}]\n", node.label, node.kind.name()));
        for child in &node.children {
            Self::write_node(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use jig_cad::{CadKernel, MockKernel};

    use crate::part::PlacedPart;
    use crate::transform::Placement;

    #[test]
    fn test_tree_mirrors_nesting() {
        let kernel = MockKernel::new();
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();
        let group = Part::compound(
            "Group",
            vec![
                PlacedPart::new(Part::solid("A", solid.clone()), Placement::IDENTITY),
                PlacedPart::new(Part::solid("B", solid.clone()), Placement::IDENTITY),
            ],
        );
        let assembly = PlacedAssembly::new(
            "Root",
            vec![
                PlacedPart::new(group, Placement::IDENTITY),
                PlacedPart::new(Part::solid("C", solid), Placement::IDENTITY),
            ],
        );

        let tree = ItemTree::from_assembly(&assembly);
        assert_eq!(tree.root.kind, ItemKind::Assembly);
        assert_eq!(tree.top_level().len(), 2);
        assert_eq!(tree.top_level()[0].kind, ItemKind::Compound);
        assert_eq!(tree.top_level()[0].children[1].label, "B");
        assert_eq!(tree.root.count(), 5);
        assert_eq!(
            tree.to_text(),
            "Root [Assembly]\n  Group [Compound]\n    A [Part]\n    B [Part]\n  C [Part]\n"
        );
    }
}
