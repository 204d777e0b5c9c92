use std::collections::HashMap;

use crate::nuclide::{DecayBranch, HalfLifeCategory, NuclideRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphLimits {
    pub max_depth: usize,
    /// Total number of edges created across the whole traversal.
    pub max_branches: usize,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_branches: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderReason {
    UndocumentedDaughter,
    FissionFragment,
    /// Known only as a parent in the decay index.
    IndexOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub label: String,
    pub protons: Option<u32>,
    pub neutrons: Option<u32>,
    pub reason: PlaceholderReason,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Real(Box<NuclideRecord>),
    Synthetic(Placeholder),
}

/// Uniform view of the fields needed to draw and describe a node.
#[derive(Clone, Copy, Debug)]
pub struct NodeProjection<'a> {
    pub label: &'a str,
    pub protons: Option<u32>,
    pub neutrons: Option<u32>,
    pub half_life: &'a str,
    pub category: HalfLifeCategory,
    pub decay_modes_text: &'a str,
    pub synthetic: bool,
}

impl NodeKind {
    pub fn project(&self) -> NodeProjection<'_> {
        match self {
            Self::Real(record) => NodeProjection {
                label: &record.label,
                protons: Some(record.protons),
                neutrons: Some(record.neutrons),
                half_life: &record.half_life.label,
                category: record.category(),
                decay_modes_text: &record.decay_modes_text,
                synthetic: false,
            },
            Self::Synthetic(placeholder) => NodeProjection {
                label: &placeholder.label,
                protons: placeholder.protons,
                neutrons: placeholder.neutrons,
                half_life: "unknown",
                category: HalfLifeCategory::Unknown,
                decay_modes_text: "",
                synthetic: true,
            },
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Real(record) if record.is_stable())
    }
}

#[derive(Clone, Debug)]
pub struct DecayGraphNode {
    pub key: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
    pub layer_pos: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug)]
pub struct DecayEdge {
    pub branch: DecayBranch,
    pub source: usize,
    pub target: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphStatus {
    Stable,
    NoDecayData,
    Renderable,
}

#[derive(Clone, Debug)]
pub struct DecayGraph {
    pub root: String,
    pub nodes: Vec<DecayGraphNode>,
    pub index_by_key: HashMap<String, usize>,
    pub edges: Vec<DecayEdge>,
    /// Set when a depth or branch cap stopped expansion.
    pub truncated: bool,
}

impl DecayGraph {
    pub(crate) fn new(root: String) -> Self {
        Self {
            root,
            nodes: Vec::new(),
            index_by_key: HashMap::new(),
            edges: Vec::new(),
            truncated: false,
        }
    }

    /// Inserts a node, or lowers the recorded depth of an existing one.
    pub(crate) fn ensure_node(
        &mut self,
        key: &str,
        depth: usize,
        make_kind: impl FnOnce() -> NodeKind,
    ) -> usize {
        if let Some(&index) = self.index_by_key.get(key) {
            let node = &mut self.nodes[index];
            node.depth = node.depth.min(depth);
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(DecayGraphNode {
            key: key.to_owned(),
            kind: make_kind(),
            depth,
            parents: Vec::new(),
            children: Vec::new(),
            layer_pos: 0,
            x: 0.0,
            y: 0.0,
        });
        self.index_by_key.insert(key.to_owned(), index);
        index
    }

    pub(crate) fn link(&mut self, source: usize, target: usize, branch: DecayBranch) {
        if !self.nodes[source].children.contains(&target) {
            self.nodes[source].children.push(target);
        }
        if !self.nodes[target].parents.contains(&source) {
            self.nodes[target].parents.push(source);
        }
        self.edges.push(DecayEdge {
            branch,
            source,
            target,
        });
    }

    pub fn node(&self, key: &str) -> Option<&DecayGraphNode> {
        self.index_by_key
            .get(key)
            .and_then(|&index| self.nodes.get(index))
    }

    pub fn root_node(&self) -> Option<&DecayGraphNode> {
        self.node(&self.root)
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn status(&self) -> GraphStatus {
        if self.root_node().is_some_and(|node| node.kind.is_stable()) {
            GraphStatus::Stable
        } else if self.edges.is_empty() {
            GraphStatus::NoDecayData
        } else {
            GraphStatus::Renderable
        }
    }
}
