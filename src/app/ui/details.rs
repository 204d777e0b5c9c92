use eframe::egui::{self, RichText, Ui};

use crate::nuclide::{NuclideRecord, parse_decay_modes};
use crate::util::{format_half_life, format_percent};

use super::super::{SelectionOrigin, ViewModel};

struct BranchRow {
    text: String,
    daughter: Option<String>,
}

impl ViewModel {
    fn branch_rows(&self, record: &NuclideRecord) -> Vec<BranchRow> {
        parse_decay_modes(&record.decay_modes_text)
            .into_iter()
            .map(|parsed| {
                let coordinates = parsed
                    .mode
                    .daughter(record.protons, record.neutrons)
                    .or_else(|| self.catalog.cluster_daughter(record, &parsed.code));
                let percent = format_percent(parsed.percent);
                let mut text = format!("{}  {}", parsed.mode.short_label(), parsed.mode.slug());
                if !percent.is_empty() {
                    text.push_str(&format!("  {percent}"));
                }

                let daughter = coordinates.map(|(protons, neutrons)| {
                    text.push_str(&format!("  → {}", self.catalog.label_for(protons, neutrons)));
                    self.catalog
                        .get_by_coordinates(protons, neutrons)
                        .map(NuclideRecord::key)
                });

                BranchRow {
                    text,
                    daughter: daughter.flatten(),
                }
            })
            .collect()
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Nuclide");
        ui.add_space(6.0);

        let Some(selected) = self.selected.clone() else {
            ui.label("Select a nuclide on the chart or through search.");
            return;
        };

        let Some(record) = self.catalog.get(&selected) else {
            ui.label("Selected nuclide is not in the table.");
            return;
        };

        let rows = self.branch_rows(record);
        let label = record.label.clone();

        ui.label(RichText::new(record.label.as_str()).strong().size(20.0));
        ui.small(selected.as_str());
        ui.add_space(6.0);

        egui::Grid::new("nuclide_details")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("Z / N / A");
                ui.label(format!(
                    "{} / {} / {}",
                    record.protons, record.neutrons, record.mass_number
                ));
                ui.end_row();

                ui.label("Half-life");
                ui.label(format_half_life(&record.half_life));
                ui.end_row();

                ui.label("Category");
                ui.label(record.category().label());
                ui.end_row();

                ui.label("Spin-parity");
                ui.label(if record.spin_parity.is_empty() {
                    "—"
                } else {
                    record.spin_parity.as_str()
                });
                ui.end_row();

                ui.label("Discovered");
                ui.label(
                    record
                        .discovery_year
                        .map(|year| year.to_string())
                        .unwrap_or_else(|| "—".to_owned()),
                );
                ui.end_row();

                ui.label("Primary decay");
                ui.label(record.decay_category.slug());
                ui.end_row();
            });

        ui.separator();
        ui.label(RichText::new("Decay modes (raw)").strong());
        if record.decay_modes_text.trim().is_empty() {
            ui.label("none listed");
        } else {
            ui.monospace(record.decay_modes_text.trim());
        }

        ui.separator();
        ui.label(RichText::new("Firm branches").strong());
        let mut pending_selection = None;
        if rows.is_empty() {
            ui.label("No firm decay branches.");
        } else {
            for row in &rows {
                match &row.daughter {
                    Some(key) => {
                        if ui.link(row.text.as_str()).on_hover_text(key.as_str()).clicked() {
                            pending_selection = Some(key.clone());
                        }
                    }
                    None => {
                        ui.label(row.text.as_str());
                    }
                }
            }
        }

        ui.separator();
        if ui.button(format!("Show decay chain of {label}")).clicked() {
            self.open_decay_overlay(selected);
        }

        if let Some(key) = pending_selection {
            self.select(Some(key), SelectionOrigin::Details);
        }
    }
}
