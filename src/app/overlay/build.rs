use crate::decay::{DecaySources, GraphLimits, GraphStatus, build_decay_graph};
use crate::layout::{LayoutConfig, layered_layout};
use crate::nuclide::Catalog;

use super::super::load::IndexSlot;
use super::super::{DecayView, ViewModel};

/// What the overlay shows for `root`: a laid-out graph or one of the message states.
pub(in crate::app) fn decay_view_for(
    catalog: &Catalog,
    index: &IndexSlot,
    root: &str,
    limits: GraphLimits,
    layout: &LayoutConfig,
) -> DecayView {
    let Some(record) = catalog.get(root) else {
        return DecayView::NoDecayData;
    };
    if record.is_stable() {
        return DecayView::Stable;
    }
    if index.is_pending() {
        return DecayView::WaitingForIndex;
    }

    let sources = DecaySources::new(catalog, index.index());
    let mut graph = build_decay_graph(sources, record, limits);
    match graph.status() {
        GraphStatus::Stable => DecayView::Stable,
        // A lone root would read as a chain that does not exist.
        GraphStatus::NoDecayData => DecayView::NoDecayData,
        GraphStatus::Renderable => {
            let bounds = layered_layout(&mut graph, layout);
            DecayView::Graph { graph, bounds }
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn rebuild_decay_view(&mut self, new_root: bool) {
        let Some(root) = self.overlay.root.as_deref() else {
            self.overlay.view = DecayView::Empty;
            return;
        };

        let view = decay_view_for(&self.catalog, &self.index, root, self.limits, &self.layout);
        if let DecayView::Graph { bounds, .. } = &view {
            self.overlay.camera.frame_content(*bounds, new_root);
        }
        self.overlay.view = view;
    }

    /// Builds the deferred graph once the index load reaches a terminal state.
    pub(in crate::app) fn poll_decay_index(&mut self) {
        if self.index.poll() && matches!(self.overlay.view, DecayView::WaitingForIndex) {
            self.rebuild_decay_view(true);
        }
    }
}
