use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, Context, FontId, RichText, Sense, Stroke, StrokeKind, Ui, pos2, vec2,
};

use crate::decay::DecayGraph;
use crate::layout::LayoutConfig;
use crate::nuclide::HalfLifeCategory;

use super::super::camera::Camera;
use super::super::chart::zoom_with_wheel;
use super::super::render_utils::{
    HOVER_COLOR, SELECTED_COLOR, blend_color, category_color, curve_visible, dim_color,
    draw_background, draw_curve, rect_visible, text_color_on,
};
use super::super::{DecayOverlay, DecayView, SelectionOrigin, ViewModel};
use super::interaction::{edge_label, handle_overlay_pan, hovered_node, node_hidden};

const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(150, 160, 172, 190);

impl ViewModel {
    pub(in crate::app) fn draw_decay_overlay(&mut self, ctx: &Context) {
        if !self.overlay.open {
            return;
        }

        let mut open = true;
        let mut pending_selection = None;
        let layout = self.layout;
        let title = self
            .overlay
            .root
            .as_deref()
            .and_then(|key| self.catalog.get(key))
            .map(|record| format!("Decay chain: {}", record.label))
            .unwrap_or_else(|| "Decay chain".to_owned());

        egui::Window::new(title)
            .id(egui::Id::new("decay_overlay"))
            .open(&mut open)
            .default_size([780.0, 580.0])
            .resizable(true)
            .show(ctx, |ui| {
                pending_selection = draw_overlay_contents(ui, &mut self.overlay, &layout);
            });

        self.overlay.open = open;
        if let Some(key) = pending_selection
            && self.catalog.get(&key).is_some()
        {
            self.select(Some(key), SelectionOrigin::Overlay);
        }
    }
}

fn draw_overlay_contents(
    ui: &mut Ui,
    overlay: &mut DecayOverlay,
    layout: &LayoutConfig,
) -> Option<String> {
    ui.horizontal_wrapped(|ui| {
        if let DecayView::Graph { graph, .. } = &overlay.view {
            ui.label(format!("nodes: {}", graph.nodes.len()));
            ui.label(format!("edges: {}", graph.edges.len()));
            if graph.truncated {
                ui.label(RichText::new("depth or branch limit reached").color(HOVER_COLOR))
                    .on_hover_text("Expansion stopped at the configured traversal caps.");
            }
        }
        if ui.button("Reset view").clicked() {
            overlay.camera.reset();
        }
    });

    draw_legend(ui, &mut overlay.hidden_categories);
    ui.separator();

    match &overlay.view {
        DecayView::Empty => {
            centered_message(ui, "Select a nuclide to see its decay chain.");
            None
        }
        DecayView::WaitingForIndex => {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("Loading decay data…");
                ui.add_space(8.0);
                ui.spinner();
            });
            ui.ctx().request_repaint();
            None
        }
        DecayView::Stable => {
            centered_message(ui, "Stable, no decay");
            None
        }
        DecayView::NoDecayData => {
            centered_message(ui, "No decay data");
            None
        }
        DecayView::Graph { graph, .. } => draw_decay_graph(
            ui,
            graph,
            &mut overlay.camera,
            layout,
            &overlay.hidden_categories,
        ),
    }
}

fn centered_message(ui: &mut Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading(message);
    });
}

/// Per-category visibility toggles; filtering happens at draw time only.
fn draw_legend(ui: &mut Ui, hidden: &mut HashSet<HalfLifeCategory>) {
    ui.horizontal_wrapped(|ui| {
        for category in HalfLifeCategory::ALL {
            let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
            ui.painter()
                .rect_filled(swatch, 2.0, category_color(category));
            ui.painter().rect_stroke(
                swatch,
                2.0,
                Stroke::new(1.0, Color32::from_gray(120)),
                StrokeKind::Inside,
            );

            let mut visible = !hidden.contains(&category);
            if ui.checkbox(&mut visible, category.label()).changed() {
                if visible {
                    hidden.remove(&category);
                } else {
                    hidden.insert(category);
                }
            }
        }
    });
}

fn draw_decay_graph(
    ui: &mut Ui,
    graph: &DecayGraph,
    camera: &mut Camera,
    layout: &LayoutConfig,
    hidden: &HashSet<HalfLifeCategory>,
) -> Option<String> {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    camera.set_viewport(rect);
    let painter = ui.painter_at(rect);
    draw_background(&painter, rect);

    zoom_with_wheel(ui, &response, camera);
    handle_overlay_pan(&response, camera);
    if response.dragged() {
        ui.ctx().request_repaint();
    }

    let hovered = response
        .hover_pos()
        .and_then(|pointer| hovered_node(graph, camera, layout, hidden, pointer));
    if hovered.is_some() {
        ui.output_mut(|output| {
            output.cursor_icon = egui::CursorIcon::PointingHand;
        });
    }

    let scale = camera.scale();
    let edge_width = (1.4 * scale.sqrt()).clamp(0.8, 3.0);
    let label_font = FontId::proportional((11.0 * scale).clamp(9.0, 14.0));
    for edge in &graph.edges {
        let source = &graph.nodes[edge.source];
        let target = &graph.nodes[edge.target];
        if node_hidden(source, hidden) || node_hidden(target, hidden) {
            continue;
        }

        let parent = pos2(source.x, source.y);
        let child = pos2(target.x, target.y);
        let curve = layout
            .edge_curve(parent, child)
            .map(|point| camera.to_screen(point));
        if !curve_visible(rect, &curve, 4.0) {
            continue;
        }

        let touches_hover = hovered == Some(edge.source) || hovered == Some(edge.target);
        let color = if touches_hover { HOVER_COLOR } else { EDGE_COLOR };
        draw_curve(&painter, curve, Stroke::new(edge_width, color));

        if scale >= 0.45 {
            painter.text(
                camera.to_screen(layout.edge_label_position(parent, child)),
                Align2::CENTER_CENTER,
                edge_label(&edge.branch),
                label_font.clone(),
                Color32::from_gray(215),
            );
        }
    }

    let name_font = FontId::proportional((14.0 * scale).clamp(8.0, 18.0));
    let detail_font = FontId::proportional((10.5 * scale).clamp(7.0, 13.0));
    for (index, node) in graph.nodes.iter().enumerate() {
        if node_hidden(node, hidden) {
            continue;
        }

        let projection = node.kind.project();
        let screen_rect = camera.data_rect_to_screen(layout.node_rect(pos2(node.x, node.y)));
        if !rect_visible(rect, screen_rect) {
            continue;
        }

        let mut fill = category_color(projection.category);
        if projection.synthetic {
            fill = dim_color(fill, 0.7);
        }
        if hovered == Some(index) {
            fill = blend_color(fill, HOVER_COLOR, 0.35);
        }
        let corner = (6.0 * scale).min(6.0);
        painter.rect_filled(screen_rect, corner, fill);

        let border = if index == 0 {
            Stroke::new(2.0, SELECTED_COLOR)
        } else {
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
        };
        painter.rect_stroke(screen_rect, corner, border, StrokeKind::Inside);

        if screen_rect.height() >= 18.0 {
            let text_color = text_color_on(fill);
            painter.text(
                screen_rect.center() - vec2(0.0, screen_rect.height() * 0.16),
                Align2::CENTER_CENTER,
                projection.label,
                name_font.clone(),
                text_color,
            );
            painter.text(
                screen_rect.center() + vec2(0.0, screen_rect.height() * 0.24),
                Align2::CENTER_CENTER,
                projection.half_life,
                detail_font.clone(),
                text_color,
            );
        }
    }

    if let Some(index) = hovered {
        let node = &graph.nodes[index];
        let projection = node.kind.project();
        let mut panel_text = format!(
            "{}  |  {}  |  half-life {}",
            projection.label, node.key, projection.half_life
        );
        if let Some(edge) = graph.edges.iter().find(|edge| edge.target == index) {
            panel_text.push_str(&format!("  |  via {}", edge_label(&edge.branch)));
            if let Some(q_value) = edge.branch.q_value_kev {
                panel_text.push_str(&format!(", Q {q_value:.0} keV"));
            }
        }
        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            panel_text,
            FontId::proportional(13.0),
            Color32::from_gray(240),
        );
    }

    if response.clicked_by(egui::PointerButton::Primary) {
        return hovered.map(|index| graph.nodes[index].key.clone());
    }
    None
}
