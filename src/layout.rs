use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use tracing::debug;

use crate::decay::DecayGraph;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub node_gap: f32,
    pub layer_gap: f32,
    pub padding: f32,
    /// Forward + backward barycenter passes.
    pub sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 118.0,
            node_height: 52.0,
            node_gap: 26.0,
            layer_gap: 112.0,
            padding: 48.0,
            sweeps: 3,
        }
    }
}

impl LayoutConfig {
    pub fn node_rect(&self, center: Pos2) -> Rect {
        Rect::from_center_size(center, vec2(self.node_width, self.node_height))
    }

    pub fn top_anchor(&self, center: Pos2) -> Pos2 {
        center - vec2(0.0, self.node_height * 0.5)
    }

    pub fn bottom_anchor(&self, center: Pos2) -> Pos2 {
        center + vec2(0.0, self.node_height * 0.5)
    }

    /// Cubic curve from the parent's bottom anchor to the child's top anchor.
    pub fn edge_curve(&self, parent: Pos2, child: Pos2) -> [Pos2; 4] {
        let start = self.bottom_anchor(parent);
        let end = self.top_anchor(child);
        let bend = ((end.y - start.y).abs() * 0.5).min(self.layer_gap);
        [
            start,
            start + vec2(0.0, bend),
            end - vec2(0.0, bend),
            end,
        ]
    }

    /// Where an edge label sits: halfway between the two anchors.
    pub fn edge_label_position(&self, parent: Pos2, child: Pos2) -> Pos2 {
        self.bottom_anchor(parent).lerp(self.top_anchor(child), 0.5)
    }
}

/// Positions every node in drawing space and returns the padded content bounds.
pub fn layered_layout(graph: &mut DecayGraph, config: &LayoutConfig) -> Rect {
    let mut layers = assign_layers(graph);
    for _ in 0..config.sweeps {
        sweep_forward(graph, &mut layers);
        sweep_backward(graph, &mut layers);
    }

    let bounds = assign_coordinates(graph, &layers, config);
    debug!(
        layers = layers.len(),
        nodes = graph.nodes.len(),
        width = bounds.width(),
        height = bounds.height(),
        "laid out decay graph"
    );
    bounds
}

/// Groups nodes by depth, keeping insertion order within each layer.
pub(crate) fn assign_layers(graph: &mut DecayGraph) -> Vec<Vec<usize>> {
    let mut layers = vec![Vec::new(); graph.max_depth() + 1];
    for (index, node) in graph.nodes.iter().enumerate() {
        layers[node.depth].push(index);
    }
    for layer in &layers {
        record_layer_positions(graph, layer);
    }
    layers
}

fn record_layer_positions(graph: &mut DecayGraph, layer: &[usize]) {
    for (position, &index) in layer.iter().enumerate() {
        graph.nodes[index].layer_pos = position;
    }
}

fn barycenter(graph: &DecayGraph, neighbors: &[usize], neighbor_depth: usize) -> Option<f32> {
    let (sum, count) = neighbors
        .iter()
        .map(|&index| &graph.nodes[index])
        .filter(|node| node.depth == neighbor_depth)
        .fold((0.0, 0usize), |(sum, count), node| {
            (sum + node.layer_pos as f32, count + 1)
        });
    (count > 0).then(|| sum / count as f32)
}

fn reorder_layer(
    graph: &mut DecayGraph,
    layer: &mut Vec<usize>,
    neighbor_depth: usize,
    use_parents: bool,
) {
    let mut keyed = layer
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let node = &graph.nodes[index];
            let neighbors = if use_parents {
                &node.parents
            } else {
                &node.children
            };
            // Nodes without neighbors in the adjacent layer hold their slot.
            let key = barycenter(graph, neighbors, neighbor_depth).unwrap_or(position as f32);
            (key, index)
        })
        .collect::<Vec<_>>();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    layer.clear();
    layer.extend(keyed.into_iter().map(|(_, index)| index));
    record_layer_positions(graph, layer);
}

fn sweep_forward(graph: &mut DecayGraph, layers: &mut [Vec<usize>]) {
    for depth in 1..layers.len() {
        reorder_layer(graph, &mut layers[depth], depth - 1, true);
    }
}

fn sweep_backward(graph: &mut DecayGraph, layers: &mut [Vec<usize>]) {
    for depth in (0..layers.len().saturating_sub(1)).rev() {
        reorder_layer(graph, &mut layers[depth], depth + 1, false);
    }
}

fn assign_coordinates(
    graph: &mut DecayGraph,
    layers: &[Vec<usize>],
    config: &LayoutConfig,
) -> Rect {
    let stride = config.node_width + config.node_gap;
    let mut bounds: Option<Rect> = None;

    for layer in layers {
        if layer.is_empty() {
            continue;
        }

        let count = layer.len() as f32;
        let layer_width = count * config.node_width + (count - 1.0) * config.node_gap;
        for (position, &index) in layer.iter().enumerate() {
            let node = &mut graph.nodes[index];
            node.x = position as f32 * stride + config.node_width * 0.5 - layer_width * 0.5;
            node.y = node.depth as f32 * config.layer_gap + config.node_height * 0.5;

            let rect = config.node_rect(pos2(node.x, node.y));
            bounds = Some(bounds.map_or(rect, |current| current.union(rect)));
        }
    }

    bounds
        .unwrap_or_else(|| Rect::from_center_size(Pos2::ZERO, Vec2::ZERO))
        .expand(config.padding)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::decay::fixtures::graph_from_edges;

    fn count_crossings(graph: &DecayGraph) -> usize {
        let mut crossings = 0;
        for (i, a) in graph.edges.iter().enumerate() {
            for b in &graph.edges[i + 1..] {
                let (a_from, a_to) = (&graph.nodes[a.source], &graph.nodes[a.target]);
                let (b_from, b_to) = (&graph.nodes[b.source], &graph.nodes[b.target]);
                if a_from.depth != b_from.depth || a_to.depth != b_to.depth {
                    continue;
                }
                let top = a_from.layer_pos as i64 - b_from.layer_pos as i64;
                let bottom = a_to.layer_pos as i64 - b_to.layer_pos as i64;
                if top * bottom < 0 {
                    crossings += 1;
                }
            }
        }
        crossings
    }

    #[test]
    fn barycenter_removes_a_simple_crossing() {
        // Insertion order puts c before d, but a (left) feeds d and b (right) feeds c.
        let mut graph = graph_from_edges(&[
            ("r", "a"),
            ("r", "b"),
            ("b", "c"),
            ("a", "d"),
        ]);
        let mut layers = assign_layers(&mut graph);
        assert_eq!(count_crossings(&graph), 1);

        sweep_forward(&mut graph, &mut layers);
        assert_eq!(count_crossings(&graph), 0);
        assert_eq!(graph.node("d").map(|node| node.layer_pos), Some(0));
    }

    #[test]
    fn layout_is_idempotent() {
        let edges = [
            ("r", "a"),
            ("r", "b"),
            ("r", "c"),
            ("a", "e"),
            ("c", "d"),
            ("b", "d"),
            ("d", "f"),
        ];
        let config = LayoutConfig::default();
        let mut graph = graph_from_edges(&edges);

        let first_bounds = layered_layout(&mut graph, &config);
        let first = graph.nodes.iter().map(|node| (node.x, node.y)).collect::<Vec<_>>();
        let second_bounds = layered_layout(&mut graph, &config);
        let second = graph.nodes.iter().map(|node| (node.x, node.y)).collect::<Vec<_>>();

        assert_eq!(first, second);
        assert_eq!(first_bounds, second_bounds);
    }

    #[test]
    fn layers_are_centered_on_the_vertical_axis() {
        let config = LayoutConfig::default();
        let mut graph = graph_from_edges(&[("r", "a"), ("r", "b"), ("r", "c"), ("a", "d")]);
        layered_layout(&mut graph, &config);

        for depth in 0..=graph.max_depth() {
            let xs = graph
                .nodes
                .iter()
                .filter(|node| node.depth == depth)
                .map(|node| node.x)
                .collect::<Vec<_>>();
            let mean = xs.iter().sum::<f32>() / xs.len() as f32;
            assert!(mean.abs() < 1e-3, "layer {depth} is off-center by {mean}");
        }

        let root = graph.root_node().expect("root");
        assert_eq!((root.x, root.y), (0.0, config.node_height * 0.5));
        let child = graph.node("a").expect("a");
        assert_eq!(child.y, config.layer_gap + config.node_height * 0.5);
    }

    #[test]
    fn bounds_include_every_node_box_plus_padding() {
        let config = LayoutConfig::default();
        let mut graph = graph_from_edges(&[("r", "a"), ("r", "b"), ("a", "c")]);
        let bounds = layered_layout(&mut graph, &config);

        for node in &graph.nodes {
            let rect = config.node_rect(pos2(node.x, node.y));
            assert!(bounds.contains_rect(rect));
        }
        assert_eq!(bounds.min.y, -config.padding);
        assert_eq!(
            bounds.max.y,
            2.0 * config.layer_gap + config.node_height + config.padding
        );
    }

    #[test]
    fn anchors_and_label_midpoint() {
        let config = LayoutConfig::default();
        let parent = pos2(0.0, 26.0);
        let child = pos2(0.0, 138.0);

        let curve = config.edge_curve(parent, child);
        assert_eq!(curve[0], pos2(0.0, 52.0));
        assert_eq!(curve[3], pos2(0.0, 112.0));
        assert!(curve[1].y > curve[0].y && curve[2].y < curve[3].y);
        assert_eq!(config.edge_label_position(parent, child), pos2(0.0, 82.0));
    }

    proptest! {
        #[test]
        fn sweeps_never_move_nodes_between_layers(
            fan in prop::collection::vec((0usize..6, 0usize..6), 1..40)
        ) {
            let names = (0..fan.len()).map(|i| format!("n{i}")).collect::<Vec<_>>();
            let mut edges = Vec::new();
            for (i, &(parent_pick, _)) in fan.iter().enumerate() {
                let parent = if i == 0 { "root" } else { names[parent_pick % i].as_str() };
                edges.push((parent, names[i].as_str()));
            }
            for (i, &(_, extra)) in fan.iter().enumerate() {
                if extra < i {
                    edges.push((names[extra].as_str(), names[i].as_str()));
                }
            }

            let mut graph = graph_from_edges(&edges);
            let before = graph.nodes.iter().map(|node| node.depth).collect::<Vec<_>>();
            let mut layers = assign_layers(&mut graph);
            let sizes = layers.iter().map(Vec::len).collect::<Vec<_>>();
            for _ in 0..3 {
                sweep_forward(&mut graph, &mut layers);
                sweep_backward(&mut graph, &mut layers);
            }

            prop_assert_eq!(layers.iter().map(Vec::len).collect::<Vec<_>>(), sizes);
            for (depth, layer) in layers.iter().enumerate() {
                for &index in layer {
                    prop_assert_eq!(graph.nodes[index].depth, depth);
                    prop_assert_eq!(before[index], depth);
                }
            }
        }
    }
}
