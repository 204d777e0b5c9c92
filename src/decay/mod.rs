mod build;
mod graph;

pub use build::{DecaySources, build_decay_graph};
pub use graph::{DecayGraph, DecayGraphNode, GraphLimits, GraphStatus};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::graph::{DecayGraph, NodeKind, Placeholder, PlaceholderReason};
    use crate::nuclide::{DecayBranch, DecayMode};

    /// Graph over placeholder nodes; edges must list each parent before its children.
    pub(crate) fn graph_from_edges(edges: &[(&str, &str)]) -> DecayGraph {
        let root = edges.first().map(|(from, _)| *from).unwrap_or("root");
        let mut graph = DecayGraph::new(root.to_owned());
        let placeholder = |key: &str| {
            NodeKind::Synthetic(Placeholder {
                label: key.to_owned(),
                protons: None,
                neutrons: None,
                reason: PlaceholderReason::UndocumentedDaughter,
            })
        };
        graph.ensure_node(root, 0, || placeholder(root));

        for &(from, to) in edges {
            let source = match graph.index_by_key.get(from) {
                Some(&index) => index,
                None => graph.ensure_node(from, 0, || placeholder(from)),
            };
            let depth = graph.nodes[source].depth + 1;
            let target = graph.ensure_node(to, depth, || placeholder(to));
            graph.link(
                source,
                target,
                DecayBranch {
                    from: from.to_owned(),
                    to: to.to_owned(),
                    mode: DecayMode::Alpha,
                    branch_percent: Some(100.0),
                    q_value_kev: None,
                    half_life_seconds: None,
                    half_life_unit: None,
                    terminal: false,
                },
            );
        }
        graph
    }
}
