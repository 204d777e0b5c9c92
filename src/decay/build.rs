use std::collections::HashSet;

use tracing::debug;

use crate::nuclide::{
    Catalog, DecayBranch, DecayIndex, DecayMode, FISSION_FIRMNESS_FLOOR, NuclideRecord,
    nuclide_key, parse_decay_modes, parse_key,
};

use super::graph::{DecayGraph, GraphLimits, NodeKind, Placeholder, PlaceholderReason};

const FISSION_FRAGMENT_SUFFIX: &str = "/SF";

/// Read-only data the builder draws branches from.
#[derive(Clone, Copy)]
pub struct DecaySources<'a> {
    pub catalog: &'a Catalog,
    pub index: Option<&'a DecayIndex>,
}

impl<'a> DecaySources<'a> {
    pub fn new(catalog: &'a Catalog, index: Option<&'a DecayIndex>) -> Self {
        Self { catalog, index }
    }

    /// Catalog record first, then an index-only parent; `None` means the key is expanded nowhere.
    fn node_data(&self, key: &str) -> Option<NodeKind> {
        if let Some(record) = self.catalog.get(key) {
            return Some(NodeKind::Real(Box::new(record.clone())));
        }

        let entry = self.index?.entry(key)?;
        Some(NodeKind::Synthetic(Placeholder {
            label: entry.parent_id.clone(),
            protons: entry.protons,
            neutrons: entry.neutrons,
            reason: PlaceholderReason::IndexOnly,
        }))
    }

    fn placeholder(&self, key: &str) -> NodeKind {
        if let Some((parent, fragment)) = key.rsplit_once(FISSION_FRAGMENT_SUFFIX)
            && let Some((protons, neutrons)) = parse_key(parent)
        {
            let (protons, neutrons) = if fragment == "1" {
                (protons / 2, neutrons / 2)
            } else {
                (protons - protons / 2, neutrons - neutrons / 2)
            };
            return NodeKind::Synthetic(Placeholder {
                label: "fission fragment".to_owned(),
                protons: Some(protons),
                neutrons: Some(neutrons),
                reason: PlaceholderReason::FissionFragment,
            });
        }

        let (label, protons, neutrons) = match parse_key(key) {
            Some((protons, neutrons)) => (
                self.catalog.label_for(protons, neutrons),
                Some(protons),
                Some(neutrons),
            ),
            None => (key.to_owned(), None, None),
        };
        NodeKind::Synthetic(Placeholder {
            label,
            protons,
            neutrons,
            reason: PlaceholderReason::UndocumentedDaughter,
        })
    }

    /// Indexed branches, followed by branches derived from the mode text for modes the index lacks.
    fn collect_branches(&self, key: &str, kind: &NodeKind) -> Vec<DecayBranch> {
        let mut branches = self
            .index
            .map(|index| index.branches(key).to_vec())
            .unwrap_or_default();

        if let NodeKind::Real(record) = kind {
            let covered = branches
                .iter()
                .map(|branch| branch.mode.clone())
                .collect::<HashSet<_>>();
            let mut seen = branches
                .iter()
                .map(|branch| (branch.mode.clone(), branch.to.clone()))
                .collect::<HashSet<_>>();

            for branch in self.fallback_branches(key, record) {
                if covered.contains(&branch.mode) {
                    continue;
                }
                if seen.insert((branch.mode.clone(), branch.to.clone())) {
                    branches.push(branch);
                }
            }
        }

        branches
    }

    fn fallback_branches(&self, key: &str, record: &NuclideRecord) -> Vec<DecayBranch> {
        let mut branches = Vec::new();
        let make_branch = |to: String, mode: DecayMode, percent: Option<f64>, terminal: bool| {
            DecayBranch {
                from: key.to_owned(),
                to,
                mode,
                branch_percent: percent,
                q_value_kev: None,
                half_life_seconds: record.half_life.seconds,
                half_life_unit: record.half_life.unit.clone(),
                terminal,
            }
        };

        for parsed in parse_decay_modes(&record.decay_modes_text) {
            if !parsed.mode.is_renderable() {
                continue;
            }

            let daughter = match &parsed.mode {
                DecayMode::SpontaneousFission => {
                    if parsed
                        .percent
                        .is_some_and(|percent| percent < FISSION_FIRMNESS_FLOOR)
                    {
                        continue;
                    }
                    let share = parsed.percent.map(|percent| percent / 2.0);
                    for fragment in 1..=2 {
                        branches.push(make_branch(
                            format!("{key}{FISSION_FRAGMENT_SUFFIX}{fragment}"),
                            DecayMode::SpontaneousFission,
                            share,
                            true,
                        ));
                    }
                    continue;
                }
                DecayMode::Cluster => self.catalog.cluster_daughter(record, &parsed.code),
                mode => mode.daughter(record.protons, record.neutrons),
            };

            if let Some((protons, neutrons)) = daughter {
                branches.push(make_branch(
                    nuclide_key(protons, neutrons),
                    parsed.mode,
                    parsed.percent,
                    false,
                ));
            }
        }

        branches
    }
}

/// A node whose branches are being walked; each edge is created right before its
/// child's subtree.
struct Frame {
    index: usize,
    depth: usize,
    branches: std::vec::IntoIter<DecayBranch>,
    path: Vec<String>,
}

struct Traversal<'a> {
    sources: DecaySources<'a>,
    limits: GraphLimits,
    graph: DecayGraph,
    branch_count: usize,
    branch_capped: bool,
    expanded: HashSet<String>,
    /// Nodes with branches that were only reached at the depth cap.
    depth_capped: HashSet<String>,
}

impl Traversal<'_> {
    /// Opens a frame for the node at `index`, or `None` when it has nothing to expand.
    fn open(&mut self, index: usize, depth: usize, mut path: Vec<String>) -> Option<Frame> {
        let key = self.graph.nodes[index].key.clone();
        if self.expanded.contains(&key) {
            return None;
        }

        let kind = if index == 0 {
            self.graph.nodes[0].kind.clone()
        } else {
            self.sources.node_data(&key)?
        };
        if kind.is_stable() {
            return None;
        }

        let branches = self.sources.collect_branches(&key, &kind);
        if branches.is_empty() {
            return None;
        }
        if depth >= self.limits.max_depth {
            self.depth_capped.insert(key);
            return None;
        }

        self.depth_capped.remove(&key);
        self.expanded.insert(key.clone());
        path.push(key);
        Some(Frame {
            index,
            depth,
            branches: branches.into_iter(),
            path,
        })
    }

    fn run(mut self, root: Frame) -> DecayGraph {
        let mut stack = vec![root];

        while let Some(frame) = stack.last_mut() {
            let Some(branch) = frame.branches.next() else {
                stack.pop();
                continue;
            };
            if frame.path.contains(&branch.to) {
                continue;
            }
            if self.branch_count >= self.limits.max_branches {
                self.branch_capped = true;
                break;
            }
            self.branch_count += 1;

            let parent = frame.index;
            let child_depth = frame.depth + 1;
            let path = (!branch.terminal).then(|| frame.path.clone());

            let sources = self.sources;
            let target = self.graph.ensure_node(&branch.to, child_depth, || {
                sources
                    .node_data(&branch.to)
                    .unwrap_or_else(|| sources.placeholder(&branch.to))
            });
            self.graph.link(parent, target, branch);

            if let Some(path) = path
                && let Some(child) = self.open(target, child_depth, path)
            {
                stack.push(child);
            }
        }

        self.graph.truncated = self.branch_capped || !self.depth_capped.is_empty();
        self.graph
    }
}

/// Expands `root` into its decay graph, bounded by `limits`.
///
/// The walk is depth-first in branch order: every edge is recorded, counted against
/// `max_branches` and followed before the next sibling branch is considered. A key is
/// expanded at most once, the first time it is reached below `max_depth`.
pub fn build_decay_graph(
    sources: DecaySources<'_>,
    root: &NuclideRecord,
    limits: GraphLimits,
) -> DecayGraph {
    let root_key = root.key();
    let mut graph = DecayGraph::new(root_key.clone());
    graph.ensure_node(&root_key, 0, || NodeKind::Real(Box::new(root.clone())));

    let mut traversal = Traversal {
        sources,
        limits,
        graph,
        branch_count: 0,
        branch_capped: false,
        expanded: HashSet::new(),
        depth_capped: HashSet::new(),
    };
    let graph = match traversal.open(0, 0, Vec::new()) {
        Some(root_frame) => traversal.run(root_frame),
        None => {
            traversal.graph.truncated = !traversal.depth_capped.is_empty();
            traversal.graph
        }
    };

    debug!(
        root = %graph.root,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        truncated = graph.truncated,
        "built decay graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::decay::graph::GraphStatus;
    use crate::nuclide::fixtures::{sample_table, table_line};

    fn catalog() -> Catalog {
        Catalog::from_table(&sample_table())
    }

    fn build(catalog: &Catalog, index: Option<&DecayIndex>, root: &str) -> DecayGraph {
        let record = catalog.get(root).expect("root in catalog");
        build_decay_graph(
            DecaySources::new(catalog, index),
            record,
            GraphLimits::default(),
        )
    }

    /// Catalog of short-lived nuclides without mode text, so only indexed branches apply.
    fn lattice_catalog(keys: &[(u32, u32)]) -> Catalog {
        let table = keys
            .iter()
            .map(|&(protons, neutrons)| {
                table_line(protons + neutrons, protons, '0', "X", "1", "s", "")
            })
            .collect::<Vec<_>>()
            .join("\n");
        Catalog::from_table(&table)
    }

    fn index_from_edges(edges: &[((u32, u32), (u32, u32))]) -> DecayIndex {
        let mut object = serde_json::Map::new();
        for &((pz, pn), (dz, dn)) in edges {
            let entry = object
                .entry(nuclide_key(pz, pn))
                .or_insert_with(|| serde_json::json!({ "z": pz, "n": pn, "branches": [] }));
            if let Some(branches) = entry["branches"].as_array_mut() {
                branches.push(serde_json::json!({
                    "to": nuclide_key(dz, dn),
                    "mode": format!("mode-{}", branches.len()),
                }));
            }
        }
        DecayIndex::parse(&serde_json::Value::Object(object).to_string()).expect("valid index")
    }

    #[test]
    fn alpha_daughter_of_uranium_238() {
        let catalog = catalog();
        let graph = build(&catalog, None, "92-146");

        let alpha = graph
            .edges
            .iter()
            .find(|edge| edge.branch.mode == DecayMode::Alpha && edge.branch.from == "92-146")
            .expect("alpha edge");
        assert_eq!(alpha.branch.to, "90-144");
        assert_eq!(graph.nodes[alpha.target].key, "90-144");
    }

    #[test]
    fn carbon_14_fallback_edge() {
        let catalog = catalog();
        let graph = build(&catalog, None, "6-8");

        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.branch.to, "7-7");
        assert_eq!(edge.branch.mode.slug(), "beta-minus-decay");
        assert_eq!(edge.branch.branch_percent, Some(100.0));
        assert_eq!(graph.status(), GraphStatus::Renderable);
    }

    #[test]
    fn stable_root_is_a_single_node() {
        let catalog = catalog();
        let graph = build(&catalog, None, "1-0");

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.status(), GraphStatus::Stable);
    }

    #[test]
    fn uranium_chain_reaches_stable_lead_through_real_nodes() {
        let catalog = catalog();
        let graph = build(&catalog, None, "92-146");

        for key in ["90-144", "91-143", "92-142", "90-140"] {
            let node = graph.node(key).unwrap_or_else(|| panic!("{key} missing"));
            assert!(matches!(node.kind, NodeKind::Real(_)), "{key} should be real");
        }
        assert_eq!(graph.node("90-144").map(|node| node.depth), Some(1));
        assert_eq!(graph.node("92-142").map(|node| node.depth), Some(3));
    }

    #[test]
    fn missing_daughters_become_placeholders() {
        let catalog = catalog();
        let graph = build(&catalog, None, "92-146");

        let plutonium = graph.node("94-144").expect("double beta daughter");
        match &plutonium.kind {
            NodeKind::Synthetic(placeholder) => {
                assert_eq!(placeholder.reason, PlaceholderReason::UndocumentedDaughter);
                assert_eq!(placeholder.label, "Z94 N144");
            }
            NodeKind::Real(_) => panic!("Pu238 is not in the sample table"),
        }
        assert!(plutonium.children.is_empty());
    }

    #[test]
    fn fission_below_floor_is_dropped() {
        let catalog = catalog();
        let graph = build(&catalog, None, "92-146");
        assert!(
            graph
                .edges
                .iter()
                .all(|edge| edge.branch.mode != DecayMode::SpontaneousFission)
        );
    }

    #[test]
    fn fission_creates_two_terminal_fragments() {
        let catalog = catalog();
        let graph = build(&catalog, None, "98-154");

        let fragments = graph
            .edges
            .iter()
            .filter(|edge| edge.branch.mode == DecayMode::SpontaneousFission)
            .collect::<Vec<_>>();
        assert_eq!(fragments.len(), 2);
        for edge in fragments {
            assert!(edge.branch.terminal);
            assert_eq!(edge.branch.branch_percent, Some(3.092 / 2.0));
            let node = &graph.nodes[edge.target];
            assert!(node.children.is_empty());
            assert_eq!(node.kind.project().label, "fission fragment");
        }
        let first = graph.node("98-154/SF1").expect("first fragment");
        assert_eq!(first.kind.project().protons, Some(49));
    }

    #[test]
    fn index_branches_take_precedence_over_derived_modes() {
        let catalog = catalog();
        let index = DecayIndex::parse(
            r#"{ "C14": { "z": 6, "n": 8, "branches": [
                { "to": "7-7", "mode": "beta-minus-decay", "branchPercent": 99.0, "qValueKeV": 156.5 }
            ] } }"#,
        )
        .expect("valid index");
        let graph = build(&catalog, Some(&index), "6-8");

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].branch.q_value_kev, Some(156.5));
        assert_eq!(graph.edges[0].branch.branch_percent, Some(99.0));
    }

    #[test]
    fn index_only_parents_are_expanded() {
        let catalog = lattice_catalog(&[(10, 10)]);
        let index = DecayIndex::parse(
            r#"{
                "Ne20": { "z": 10, "n": 10, "branches": [ { "to": "Mystery", "mode": "alpha-decay" } ] },
                "Mystery": { "z": 8, "n": 8, "parentID": "Mystery",
                             "branches": [ { "to": "7-8", "mode": "proton-emission" } ] }
            }"#,
        )
        .expect("valid index");
        let graph = build(&catalog, Some(&index), "10-10");

        let mystery = graph.node("8-8").expect("index-only daughter");
        assert_eq!(mystery.kind.project().label, "Mystery");
        assert_eq!(mystery.children.len(), 1);
        assert!(graph.node("7-8").is_some());
    }

    #[test]
    fn cyclic_index_terminates() {
        let catalog = lattice_catalog(&[(1, 1), (2, 2)]);
        let index = index_from_edges(&[((1, 1), (2, 2)), ((2, 2), (1, 1))]);
        let graph = build(&catalog, Some(&index), "1-1");

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].branch.to, "2-2");
    }

    #[test]
    fn depth_cap_limits_long_chains() {
        let chain = (0..30).map(|step| (step + 1, 1)).collect::<Vec<_>>();
        let catalog = lattice_catalog(&chain);
        let edges = chain.windows(2).map(|pair| (pair[0], pair[1])).collect::<Vec<_>>();
        let index = index_from_edges(&edges);
        let graph = build(&catalog, Some(&index), "1-1");

        assert_eq!(graph.max_depth(), 15);
        assert_eq!(graph.edges.len(), 15);
        assert!(graph.truncated);
    }

    #[test]
    fn shallower_revisit_lowers_depth() {
        // 1-1 -> 2-2 -> 3-3 -> 4-4 is expanded first, then 1-1 -> 4-4 directly.
        let catalog = lattice_catalog(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        let index = index_from_edges(&[
            ((1, 1), (2, 2)),
            ((1, 1), (4, 4)),
            ((2, 2), (3, 3)),
            ((3, 3), (4, 4)),
            ((4, 4), (5, 5)),
        ]);
        let graph = build(&catalog, Some(&index), "1-1");

        assert_eq!(graph.node("4-4").map(|node| node.depth), Some(1));
        assert_eq!(graph.node("5-5").map(|node| node.depth), Some(4));
        assert_eq!(
            graph
                .edges
                .iter()
                .filter(|edge| edge.branch.from == "4-4")
                .count(),
            1,
            "4-4 is expanded once"
        );
    }

    #[test]
    fn node_first_reached_at_the_depth_cap_expands_from_a_shallower_path() {
        // 1-1 -> 2-1 -> ... -> 15-1 -> 16-1 puts 16-1 at depth 15 first; 1-1 -> 16-1 then
        // reaches it at depth 1, and its own branch to 17-1 must still be followed.
        let chain = (1..=16).map(|protons| (protons, 1)).collect::<Vec<_>>();
        let mut points = chain.clone();
        points.push((17, 1));
        let catalog = lattice_catalog(&points);

        let mut edges = chain.windows(2).map(|pair| (pair[0], pair[1])).collect::<Vec<_>>();
        edges.push(((1, 1), (16, 1)));
        edges.push(((16, 1), (17, 1)));
        let index = index_from_edges(&edges);
        let graph = build(&catalog, Some(&index), "1-1");

        let late = graph.node("16-1").expect("reached twice");
        assert_eq!(late.depth, 1);
        assert_eq!(late.children.len(), 1);
        assert_eq!(graph.node("17-1").map(|node| node.depth), Some(2));
        assert!(!graph.truncated, "every node with branches was expanded");
    }

    #[test]
    fn edges_follow_depth_first_branch_order_under_the_branch_cap() {
        let catalog = lattice_catalog(&[(1, 1), (2, 2), (3, 3), (4, 4)]);
        let index = index_from_edges(&[((1, 1), (2, 2)), ((1, 1), (3, 3)), ((2, 2), (4, 4))]);
        let root = catalog.get("1-1").expect("root");

        let edge_keys = |graph: &DecayGraph| {
            graph
                .edges
                .iter()
                .map(|edge| format!("{}->{}", edge.branch.from, edge.branch.to))
                .collect::<Vec<_>>()
        };

        let capped = build_decay_graph(
            DecaySources::new(&catalog, Some(&index)),
            root,
            GraphLimits {
                max_depth: 15,
                max_branches: 2,
            },
        );
        assert_eq!(edge_keys(&capped), ["1-1->2-2", "2-2->4-4"]);
        assert!(capped.node("3-3").is_none());
        assert!(capped.truncated);

        let full = build(&catalog, Some(&index), "1-1");
        assert_eq!(edge_keys(&full), ["1-1->2-2", "2-2->4-4", "1-1->3-3"]);
        let order = full.nodes.iter().map(|node| node.key.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["1-1", "2-2", "4-4", "3-3"]);
        assert!(!full.truncated);
    }

    proptest! {
        #[test]
        fn traversal_respects_caps(
            raw_edges in prop::collection::vec(((0u32..12, 0u32..12), (0u32..12, 0u32..12)), 1..300)
        ) {
            let edges = raw_edges
                .into_iter()
                .map(|((pz, pn), (dz, dn))| ((pz + 1, pn), (dz + 1, dn)))
                .collect::<Vec<_>>();
            let mut points = edges.iter().flat_map(|&(a, b)| [a, b]).collect::<Vec<_>>();
            points.sort_unstable();
            points.dedup();
            let catalog = lattice_catalog(&points);
            let index = index_from_edges(&edges);
            let root = catalog.get(&nuclide_key(edges[0].0.0, edges[0].0.1)).expect("root");

            let graph = build_decay_graph(
                DecaySources::new(&catalog, Some(&index)),
                root,
                GraphLimits::default(),
            );

            prop_assert!(graph.edges.len() <= 100);
            prop_assert!(graph.nodes.iter().all(|node| node.depth <= 15));
            for edge in &graph.edges {
                prop_assert!(graph.index_by_key.contains_key(&edge.branch.from));
                prop_assert!(graph.index_by_key.contains_key(&edge.branch.to));
                prop_assert_ne!(edge.source, edge.target);
            }
        }
    }
}
