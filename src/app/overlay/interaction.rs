use std::collections::HashSet;

use eframe::egui::{self, Pos2, pos2};

use crate::decay::{DecayGraph, DecayGraphNode};
use crate::layout::LayoutConfig;
use crate::nuclide::{DecayBranch, HalfLifeCategory};
use crate::util::format_percent;

use super::super::camera::Camera;

pub(in crate::app) fn node_hidden(
    node: &DecayGraphNode,
    hidden: &HashSet<HalfLifeCategory>,
) -> bool {
    hidden.contains(&node.kind.project().category)
}

/// Topmost visible node whose box contains `pointer`.
pub(in crate::app) fn hovered_node(
    graph: &DecayGraph,
    camera: &Camera,
    layout: &LayoutConfig,
    hidden: &HashSet<HalfLifeCategory>,
    pointer: Pos2,
) -> Option<usize> {
    if !camera.viewport().contains(pointer) {
        return None;
    }

    let data = camera.to_data(pointer);
    graph
        .nodes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, node)| {
            !node_hidden(node, hidden) && layout.node_rect(pos2(node.x, node.y)).contains(data)
        })
        .map(|(index, _)| index)
}

pub(in crate::app) fn edge_label(branch: &DecayBranch) -> String {
    let percent = format_percent(branch.branch_percent);
    if percent.is_empty() {
        branch.mode.short_label().to_owned()
    } else {
        format!("{} {percent}", branch.mode.short_label())
    }
}

pub(in crate::app) fn handle_overlay_pan(response: &egui::Response, camera: &mut Camera) {
    if response.dragged_by(egui::PointerButton::Primary)
        || response.dragged_by(egui::PointerButton::Secondary)
        || response.dragged_by(egui::PointerButton::Middle)
    {
        camera.pan_by(response.drag_delta());
    }
}
