//! Viewport overlay drawing (axis labels, camera readout, hints)

use egui::Painter;
use glam::Vec3;

use crate::i18n::t;

use super::camera::CameraPose;

/// Draw axis labels in the viewport
pub fn draw_axis_labels(painter: &Painter, rect: egui::Rect, pose: &CameraPose) {
    let labels = [
        (Vec3::new(1.6, 0.0, 0.0), "X", egui::Color32::from_rgb(220, 70, 70)),
        (Vec3::new(0.0, 1.6, 0.0), "Y", egui::Color32::from_rgb(70, 200, 70)),
        (Vec3::new(0.0, 0.0, 1.6), "Z", egui::Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in labels {
        if let Some(screen) = pose.project(pos, rect) {
            if rect.contains(screen) {
                painter.text(
                    screen,
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::monospace(12.0),
                    color,
                );
            }
        }
    }
}

/// Distance and orbit angles in the top-right corner
pub fn draw_camera_info(painter: &Painter, rect: egui::Rect, pose: &CameraPose) {
    let overlay_rect = egui::Rect::from_min_size(
        egui::pos2(rect.right() - 150.0, rect.top() + 4.0),
        egui::vec2(146.0, 44.0),
    );
    painter.rect_filled(
        overlay_rect,
        4.0,
        egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
    );

    let s = pose.spherical();
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        egui::Align2::LEFT_TOP,
        format!(
            "{} {:.2}\n{} {:.0}°  {} {:.0}°",
            t("overlay.distance"),
            s.radius,
            t("overlay.azimuth"),
            s.theta.to_degrees(),
            t("overlay.polar"),
            s.phi.to_degrees(),
        ),
        egui::FontId::monospace(10.0),
        egui::Color32::from_rgb(160, 160, 170),
    );
}

/// Navigation hint at the bottom of an empty scene
pub fn draw_nav_hint(painter: &Painter, rect: egui::Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        t("viewport.nav_hint"),
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(100, 100, 110),
    );
}

/// Centered message used when nothing can be rendered
pub fn draw_placeholder(painter: &Painter, rect: egui::Rect, message: &str) {
    painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(24, 24, 28));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(14.0),
        egui::Color32::from_rgb(140, 140, 150),
    );
}
