use std::collections::HashSet;
use std::sync::mpsc::TryRecvError;

use eframe::egui::{self, Context, Rect};
use tracing::{error, info};

use crate::decay::{DecayGraph, GraphLimits};
use crate::layout::LayoutConfig;
use crate::nuclide::{Catalog, HalfLifeCategory};

mod camera;
mod chart;
mod flash;
mod load;
mod overlay;
mod render_utils;
mod ui;

pub use load::DataSources;

use camera::Camera;
use flash::FlashAnimation;
use load::{CatalogReceiver, IndexReceiver, IndexSlot};

pub struct NuclideChartApp {
    sources: DataSources,
    limits: GraphLimits,
    state: AppState,
}

enum AppState {
    Loading {
        catalog_rx: CatalogReceiver,
        index_rx: Option<IndexReceiver>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    catalog: Catalog,
    index: IndexSlot,
    limits: GraphLimits,
    layout: LayoutConfig,
    chart_camera: Camera,
    selected: Option<String>,
    search: String,
    flash: FlashAnimation,
    overlay: DecayOverlay,
}

/// Decay chain window state; its camera is independent of the chart's.
struct DecayOverlay {
    open: bool,
    root: Option<String>,
    view: DecayView,
    camera: Camera,
    hidden_categories: HashSet<HalfLifeCategory>,
}

enum DecayView {
    Empty,
    WaitingForIndex,
    Stable,
    NoDecayData,
    Graph { graph: DecayGraph, bounds: Rect },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SelectionOrigin {
    Chart,
    Search,
    Details,
    Overlay,
}

impl NuclideChartApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        sources: DataSources,
        limits: GraphLimits,
    ) -> Self {
        let state = Self::start_load(&sources);
        Self {
            sources,
            limits,
            state,
        }
    }

    fn start_load(sources: &DataSources) -> AppState {
        info!(table = %sources.table.display(), "loading nuclide data");
        let (catalog_rx, index_rx) = sources.spawn();
        AppState::Loading {
            catalog_rx,
            index_rx: Some(index_rx),
        }
    }
}

impl eframe::App for NuclideChartApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading {
                catalog_rx,
                index_rx,
            } => {
                match catalog_rx.try_recv() {
                    Ok(Ok(catalog)) => {
                        let index = match index_rx.take() {
                            Some(rx) => IndexSlot::Pending(rx),
                            None => IndexSlot::Unavailable,
                        };
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            catalog,
                            index,
                            self.limits,
                        ))));
                    }
                    Ok(Err(message)) => {
                        error!(error = %message, "failed to load nuclide table");
                        transition = Some(AppState::Error(message));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        error!("nuclide table loader exited without a result");
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading nuclide table...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the nuclide table");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.sources));
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
