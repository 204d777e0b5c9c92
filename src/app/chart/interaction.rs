use eframe::egui::{self, Pos2, Ui, pos2};

use crate::nuclide::NuclideRecord;

use super::super::camera::Camera;
use super::super::{SelectionOrigin, ViewModel};

/// Wheel zoom around the pointer, shared by the chart and the decay overlay.
pub(in crate::app) fn zoom_with_wheel(ui: &Ui, response: &egui::Response, camera: &mut Camera) {
    if !response.hovered() {
        return;
    }

    let scroll = ui.input(|input| input.raw_scroll_delta.y);
    if scroll.abs() <= f32::EPSILON {
        return;
    }

    let pointer = ui
        .input(|input| input.pointer.hover_pos())
        .unwrap_or_else(|| response.rect.center());
    let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
    camera.zoom_at(pointer, zoom_factor);
}

/// Lattice point (neutrons, protons) under a chart-space position.
pub(in crate::app) fn lattice_point(data: Pos2) -> Option<(u32, u32)> {
    let neutrons = data.x.round();
    let protons = data.y.round();
    if neutrons < 0.0 || protons < 0.0 || !neutrons.is_finite() || !protons.is_finite() {
        return None;
    }
    Some((neutrons as u32, protons as u32))
}

pub(in crate::app) fn cell_center(record: &NuclideRecord) -> Pos2 {
    pos2(record.neutrons as f32, record.protons as f32)
}

impl ViewModel {
    pub(in crate::app) fn handle_chart_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.chart_camera.pan_by(response.drag_delta());
        }
    }

    pub(in crate::app) fn hovered_record(&self, pointer: Option<Pos2>) -> Option<&NuclideRecord> {
        let pointer = pointer?;
        if !self.chart_camera.viewport().contains(pointer) {
            return None;
        }
        let (neutrons, protons) = lattice_point(self.chart_camera.to_data(pointer))?;
        self.catalog.get_by_coordinates(protons, neutrons)
    }

    pub(in crate::app) fn apply_chart_selection(&mut self, selected: Option<String>) {
        self.select(selected, SelectionOrigin::Chart);
    }

    /// Pans the chart so the record's cell sits at the viewport center.
    pub(in crate::app) fn focus_chart_on(&mut self, key: &str) {
        let Some(record) = self.catalog.get(key) else {
            return;
        };
        if !self.chart_camera.viewport().is_positive() {
            return;
        }
        let target = self.chart_camera.to_screen(cell_center(record));
        let delta = self.chart_camera.viewport().center() - target;
        self.chart_camera.pan_by(delta);
    }
}
