use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, epaint::CubicBezierShape};

use crate::nuclide::HalfLifeCategory;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const FLASH_COLOR: Color32 = Color32::from_rgb(250, 250, 250);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn category_color(category: HalfLifeCategory) -> Color32 {
    match category {
        HalfLifeCategory::Stable => Color32::from_rgb(32, 32, 36),
        HalfLifeCategory::Long => Color32::from_rgb(61, 116, 196),
        HalfLifeCategory::Medium => Color32::from_rgb(84, 170, 132),
        HalfLifeCategory::Short => Color32::from_rgb(224, 186, 72),
        HalfLifeCategory::Instant => Color32::from_rgb(226, 112, 72),
        HalfLifeCategory::Unstable => Color32::from_rgb(176, 76, 150),
        HalfLifeCategory::Unknown => Color32::from_rgb(118, 124, 132),
    }
}

/// Readable text color on top of `fill`.
pub(super) fn text_color_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::from_gray(18)
    } else {
        Color32::from_gray(238)
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

pub(super) fn grid_stroke() -> Stroke {
    Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70))
}

pub(super) fn rect_visible(view: Rect, rect: Rect) -> bool {
    view.intersects(rect)
}

/// A cubic curve is inside its control polygon, so the control-point box is a safe cull.
pub(super) fn curve_visible(view: Rect, points: &[Pos2; 4], padding: f32) -> bool {
    let bounds = points
        .iter()
        .fold(Rect::NOTHING, |bounds, point| bounds.union(Rect::from_min_max(*point, *point)));
    view.intersects(bounds.expand(padding))
}

pub(super) fn draw_curve(painter: &Painter, points: [Pos2; 4], stroke: Stroke) {
    painter.add(CubicBezierShape::from_points_stroke(
        points,
        false,
        Color32::TRANSPARENT,
        stroke,
    ));
}
