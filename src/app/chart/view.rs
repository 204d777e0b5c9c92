use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, StrokeKind, Ui, pos2, vec2};

use super::super::camera::nice_ticks;
use super::super::render_utils::{
    FLASH_COLOR, HOVER_COLOR, SELECTED_COLOR, blend_color, category_color, draw_background,
    grid_stroke, rect_visible, text_color_on,
};
use super::super::ViewModel;
use super::interaction::{cell_center, zoom_with_wheel};

const CELL_FILL: f32 = 0.92;
const AXIS_TICK_SPACING_PX: f32 = 80.0;
const LABEL_MIN_CELL_PX: f32 = 26.0;

impl ViewModel {
    /// Chart-space extent of the catalog, one cell of margin on every side.
    pub(in crate::app) fn chart_content(&self) -> Rect {
        let bounds = self.catalog.bounds();
        Rect::from_min_max(
            pos2(bounds.min_n as f32 - 0.5, bounds.min_z as f32 - 0.5),
            pos2(bounds.max_n as f32 + 0.5, bounds.max_z as f32 + 0.5),
        )
        .expand(1.0)
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.chart_camera.set_viewport(rect);
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        zoom_with_wheel(ui, &response, &mut self.chart_camera);
        self.handle_chart_pan(&response);
        if response.dragged() {
            ui.ctx().request_repaint();
        }

        self.draw_axes(&painter, rect);

        let now = ui.input(|input| input.time);
        let flash_key = self.flash.key().map(str::to_owned);
        let flash_intensity = self.flash.sample(now);
        if flash_intensity.is_some() {
            ui.ctx().request_repaint();
        }

        let hovered = self.hovered_record(response.hover_pos());
        let hovered_key = hovered.map(|record| record.key());
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let visible = self.chart_camera.visible_data_rect().expand(1.0);
        let cell_px = self.chart_camera.scale();
        let font = FontId::proportional((cell_px * 0.32).clamp(8.0, 14.0));

        for record in self.catalog.records() {
            let center = cell_center(record);
            if !visible.contains(center) {
                continue;
            }

            let data_cell = Rect::from_center_size(center, vec2(CELL_FILL, CELL_FILL));
            let cell = self.chart_camera.data_rect_to_screen(data_cell);
            if !rect_visible(rect, cell) {
                continue;
            }

            let key = record.key();
            let is_selected = self.selected.as_deref() == Some(key.as_str());
            let is_hovered = hovered_key.as_deref() == Some(key.as_str());
            let flash = match (&flash_key, flash_intensity) {
                (Some(flash_key), Some(intensity)) if *flash_key == key => intensity,
                _ => 0.0,
            };

            let mut fill = category_color(record.category());
            if is_hovered {
                fill = blend_color(fill, HOVER_COLOR, 0.55);
            }
            fill = blend_color(fill, FLASH_COLOR, flash);
            painter.rect_filled(cell, (cell_px * 0.08).min(3.0), fill);

            if is_selected {
                painter.rect_stroke(
                    cell.expand(1.5),
                    (cell_px * 0.08).min(3.0),
                    Stroke::new(2.0, SELECTED_COLOR),
                    StrokeKind::Outside,
                );
            }

            if cell.width() >= LABEL_MIN_CELL_PX {
                painter.text(
                    cell.center(),
                    Align2::CENTER_CENTER,
                    record.label.as_str(),
                    font.clone(),
                    text_color_on(fill),
                );
            }
        }

        if let Some(record) = hovered {
            let panel_text = format!(
                "{}  |  Z {}  N {}  |  {}  |  {}",
                record.label,
                record.protons,
                record.neutrons,
                record.half_life.label,
                if record.decay_modes_text.trim().is_empty() {
                    "no listed decay"
                } else {
                    record.decay_modes_text.trim()
                }
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            self.apply_chart_selection(hovered_key);
        }
    }

    fn draw_axes(&self, painter: &egui::Painter, rect: Rect) {
        let visible = self.chart_camera.visible_data_rect();
        let label_color = Color32::from_gray(170);
        let font = FontId::proportional(11.0);

        let neutron_target = ((rect.width() / AXIS_TICK_SPACING_PX) as usize).max(2);
        for neutrons in nice_ticks(
            visible.min.x as f64,
            visible.max.x as f64,
            neutron_target,
            1.0,
        ) {
            let x = self.chart_camera.to_screen(pos2(neutrons as f32, 0.0)).x;
            painter.line_segment(
                [pos2(x, rect.top()), pos2(x, rect.bottom())],
                grid_stroke(),
            );
            painter.text(
                pos2(x, rect.bottom() - 4.0),
                Align2::CENTER_BOTTOM,
                format!("{neutrons:.0}"),
                font.clone(),
                label_color,
            );
        }

        let proton_target = ((rect.height() / AXIS_TICK_SPACING_PX) as usize).max(2);
        for protons in nice_ticks(
            visible.min.y as f64,
            visible.max.y as f64,
            proton_target,
            1.0,
        ) {
            let y = self.chart_camera.to_screen(pos2(0.0, protons as f32)).y;
            painter.line_segment(
                [pos2(rect.left(), y), pos2(rect.right(), y)],
                grid_stroke(),
            );
            painter.text(
                pos2(rect.left() + 4.0, y),
                Align2::LEFT_BOTTOM,
                format!("{protons:.0}"),
                font.clone(),
                label_color,
            );
        }

        painter.text(
            rect.right_bottom() - vec2(8.0, 18.0),
            Align2::RIGHT_BOTTOM,
            "N →",
            font.clone(),
            label_color,
        );
        painter.text(
            rect.left_top() + vec2(8.0, 32.0),
            Align2::LEFT_TOP,
            "Z ↑",
            font,
            label_color,
        );
    }
}
