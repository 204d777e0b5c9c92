use std::ops::RangeInclusive;

use eframe::egui::{Pos2, Rect, Vec2, vec2};

/// Minimum on-screen overlap kept between clamped content and the viewport.
const PAN_CLAMP_MARGIN: f32 = 48.0;

#[derive(Clone, Debug)]
struct CameraConfig {
    zoom_range: RangeInclusive<f32>,
    /// Data y grows upward (proton axis) when set.
    flip_y: bool,
    clamp_pan: bool,
    allow_upscale: bool,
}

/// Pan/zoom state mapping data space onto a screen rectangle.
///
/// At `pan = 0`, `zoom = 1` the content center sits at the viewport center
/// scaled by `base_scale`, the fit computed from viewport and content sizes.
#[derive(Clone, Debug)]
pub struct Camera {
    pub zoom: f32,
    pub pan: Vec2,
    pub base_scale: f32,
    pub origin: Pos2,
    viewport: Rect,
    content: Rect,
    manual: bool,
    config: CameraConfig,
}

pub fn fit_scale(content: Vec2, view: Vec2, allow_upscale: bool) -> f32 {
    if content.x <= f32::EPSILON || content.y <= f32::EPSILON {
        return 1.0;
    }
    if view.x <= f32::EPSILON || view.y <= f32::EPSILON {
        return 1.0;
    }

    let fit = (view.x / content.x).min(view.y / content.y);
    if allow_upscale { fit } else { fit.min(1.0) }
}

impl Camera {
    /// Camera for the nuclide lattice: never zooms out past the fit, keeps content in view.
    pub fn chart() -> Self {
        Self::with_config(CameraConfig {
            zoom_range: 1.0..=40.0,
            flip_y: true,
            clamp_pan: true,
            allow_upscale: true,
        })
    }

    /// Camera for the decay overlay: free panning, never upscales past 1:1 on fit.
    pub fn overlay() -> Self {
        Self::with_config(CameraConfig {
            zoom_range: 0.25..=6.0,
            flip_y: false,
            clamp_pan: false,
            allow_upscale: false,
        })
    }

    fn with_config(config: CameraConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            base_scale: 1.0,
            origin: Pos2::ZERO,
            viewport: Rect::NOTHING,
            content: Rect::NOTHING,
            manual: false,
            config,
        }
    }

    pub fn scale(&self) -> f32 {
        self.base_scale * self.zoom
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn content(&self) -> Rect {
        self.content
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    fn axis(&self) -> Vec2 {
        if self.config.flip_y {
            vec2(1.0, -1.0)
        } else {
            vec2(1.0, 1.0)
        }
    }

    pub fn to_screen(&self, data: Pos2) -> Pos2 {
        self.viewport.center() + self.pan + (data - self.origin) * self.axis() * self.scale()
    }

    pub fn to_data(&self, screen: Pos2) -> Pos2 {
        self.origin + (screen - self.viewport.center() - self.pan) * self.axis() / self.scale()
    }

    pub fn data_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_two_pos(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    pub fn visible_data_rect(&self) -> Rect {
        Rect::from_two_pos(
            self.to_data(self.viewport.min),
            self.to_data(self.viewport.max),
        )
    }

    fn refit(&mut self) {
        if self.content.is_positive() {
            self.origin = self.content.center();
            self.base_scale = fit_scale(
                self.content.size(),
                self.viewport.size(),
                self.config.allow_upscale,
            );
        }
        self.clamp();
    }

    /// Container resize: the fit is recomputed, the user's zoom and pan are kept.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.refit();
    }

    /// New content extent (data load or new layout).
    pub fn set_content(&mut self, content: Rect) {
        self.content = content;
        self.refit();
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
        self.manual = false;
    }

    /// Frames freshly laid-out content. The view is reset when `new_root` is set or
    /// the user has not panned or zoomed since the last reset.
    pub fn frame_content(&mut self, content: Rect, new_root: bool) {
        if new_root {
            self.manual = false;
        }
        self.set_content(content);
        if !self.manual {
            self.reset();
        }
    }

    /// Zooms by `factor` keeping the data point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let data_before = self.to_data(anchor);
        self.zoom = (self.zoom * factor).clamp(
            *self.config.zoom_range.start(),
            *self.config.zoom_range.end(),
        );
        self.pan = anchor
            - self.viewport.center()
            - (data_before - self.origin) * self.axis() * self.scale();
        self.manual = true;
        self.clamp();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.pan += delta;
        self.manual = true;
        self.clamp();
    }

    fn clamp(&mut self) {
        if !self.config.clamp_pan || !self.content.is_positive() || !self.viewport.is_positive() {
            return;
        }

        let half_content = self.content.size() * self.scale() * 0.5;
        let half_view = self.viewport.size() * 0.5;
        let limit = (half_content + half_view - Vec2::splat(PAN_CLAMP_MARGIN)).max(Vec2::ZERO);
        self.pan = self.pan.clamp(-limit, limit);
    }
}

/// Smallest step in {1, 2, 5, 10}×10ⁿ giving at most `target` ticks over `[min, max]`.
pub fn nice_step(min: f64, max: f64, target: usize) -> f64 {
    let range = max - min;
    if !range.is_finite() || range <= 0.0 || target == 0 {
        return 1.0;
    }

    let mut magnitude = 10f64.powf((range / target as f64).log10().floor());
    loop {
        for multiplier in [1.0, 2.0, 5.0, 10.0] {
            let step = multiplier * magnitude;
            if tick_count(min, max, step) <= target {
                return step;
            }
        }
        magnitude *= 10.0;
    }
}

fn tick_count(min: f64, max: f64, step: f64) -> usize {
    let first = (min / step).ceil();
    let last = (max / step).floor();
    if last < first {
        0
    } else {
        (last - first) as usize + 1
    }
}

pub fn nice_ticks(min: f64, max: f64, target: usize, min_step: f64) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max < min || target == 0 {
        return Vec::new();
    }

    let step = nice_step(min, max, target).max(min_step);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|multiple| multiple as f64 * step).collect()
}
