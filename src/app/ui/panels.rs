use std::collections::HashSet;
use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout};
use tracing::debug;

use crate::decay::GraphLimits;
use crate::layout::LayoutConfig;
use crate::nuclide::Catalog;

use super::super::camera::Camera;
use super::super::flash::FlashAnimation;
use super::super::load::IndexSlot;
use super::super::{DecayOverlay, DecayView, SelectionOrigin, ViewModel};

impl ViewModel {
    pub(in crate::app) const SEARCH_RESULT_ROWS: usize = 12;

    pub(in crate::app) fn new(catalog: Catalog, index: IndexSlot, limits: GraphLimits) -> Self {
        let mut model = Self {
            catalog,
            index,
            limits,
            layout: LayoutConfig::default(),
            chart_camera: Camera::chart(),
            selected: None,
            search: String::new(),
            flash: FlashAnimation::default(),
            overlay: DecayOverlay {
                open: false,
                root: None,
                view: DecayView::Empty,
                camera: Camera::overlay(),
                hidden_categories: HashSet::new(),
            },
        };
        let content = model.chart_content();
        model.chart_camera.set_content(content);
        model
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.poll_decay_index();
        if self.index.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Chart of nuclides");
                    ui.separator();
                    ui.label(format!("nuclides: {}", self.catalog.len()));
                    ui.label(format!("skipped lines: {}", self.catalog.skipped().total()));
                    ui.label(self.index.status_text());
                    ui.label(format!(
                        "limits: depth {}, branches {}",
                        self.limits.max_depth, self.limits.max_branches
                    ));
                    if ui.button("Reset chart view").clicked() {
                        self.chart_camera.reset();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(record) =
                            self.selected.as_deref().and_then(|key| self.catalog.get(key))
                        {
                            ui.label(format!("selected: {}", record.label));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_chart(ui));

        self.draw_decay_overlay(ctx);
    }

    /// Selection callback shared by the chart, search, info panel and overlay.
    pub(in crate::app) fn select(&mut self, selected: Option<String>, origin: SelectionOrigin) {
        let Some(key) = selected else {
            self.selected = None;
            self.flash.cancel();
            return;
        };

        debug!(%key, ?origin, "selected nuclide");
        self.selected = Some(key.clone());
        self.open_decay_overlay(key);
    }

    /// Shows the overlay for `root`, rebuilding only when the root changes.
    pub(in crate::app) fn open_decay_overlay(&mut self, root: String) {
        self.overlay.open = true;
        if self.overlay.root.as_deref() == Some(root.as_str()) {
            return;
        }
        self.overlay.root = Some(root);
        self.rebuild_decay_view(true);
    }
}
