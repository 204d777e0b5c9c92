use eframe::egui::{self, Key, RichText, Ui};

use crate::nuclide::HalfLifeCategory;

use super::super::render_utils::category_color;
use super::super::{SelectionOrigin, ViewModel};

impl ViewModel {
    /// Search pick: select, bring the cell into view and flash it.
    pub(in crate::app) fn select_from_search(&mut self, key: String, now: f64) {
        self.focus_chart_on(&key);
        self.flash.start(key.clone(), now);
        self.select(Some(key), SelectionOrigin::Search);
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Nuclide (e.g. U238, c14)")
            .on_hover_text("Fuzzy match against nuclide labels.");
        let search_response = ui.text_edit_singleline(&mut self.search);
        let submitted =
            search_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

        let results = self
            .catalog
            .search(&self.search, Self::SEARCH_RESULT_ROWS)
            .into_iter()
            .map(|record| (record.key(), record.label.clone(), record.half_life.label.clone()))
            .collect::<Vec<_>>();

        let now = ui.input(|input| input.time);
        let mut picked = None;
        if submitted && let Some((key, _, _)) = results.first() {
            picked = Some(key.clone());
        }

        if !self.search.trim().is_empty() {
            if results.is_empty() {
                ui.label("No matching nuclides.");
            }
            egui::ScrollArea::vertical()
                .id_salt("search_results_scroll")
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for (key, label, half_life) in &results {
                        let is_selected = self.selected.as_deref() == Some(key.as_str());
                        if ui
                            .selectable_label(is_selected, format!("{label}  ({half_life})"))
                            .on_hover_text(key.as_str())
                            .clicked()
                        {
                            picked = Some(key.clone());
                        }
                    }
                });
        }

        if let Some(key) = picked {
            self.select_from_search(key, now);
        }

        ui.separator();
        ui.heading("View");
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            if ui.button("Reset chart").clicked() {
                self.chart_camera.reset();
            }
            if ui.button("Reset decay view").clicked() {
                self.overlay.camera.reset();
            }
            if ui.button("Clear selection").clicked() {
                self.select(None, SelectionOrigin::Chart);
            }
        });
        ui.checkbox(&mut self.overlay.open, "Show decay chain window");
        ui.small("Scroll to zoom, right or middle drag to pan the chart.");

        ui.separator();
        ui.label(RichText::new("Half-life categories").strong());
        for category in HalfLifeCategory::ALL {
            let count = self
                .catalog
                .records()
                .iter()
                .filter(|record| record.category() == category)
                .count();
            ui.label(
                RichText::new(format!("■ {}  ({count})", category.label()))
                    .color(legend_text_color(category)),
            );
        }
    }
}

fn legend_text_color(category: HalfLifeCategory) -> egui::Color32 {
    // The stable fill is near-black; brighten it for the sidebar.
    match category {
        HalfLifeCategory::Stable => egui::Color32::from_gray(200),
        other => category_color(other),
    }
}
