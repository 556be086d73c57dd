use std::path::Path;

use egui::{Align2, Color32, Context, FontId, Pos2, Rect, Stroke, TextureHandle, Vec2};

use crate::controller::{FrameSnapshot, GameState, Severity};
use crate::error::AppError;
use crate::view::texture::load_rgba;

const PANEL_SIZE: Vec2 = Vec2::new(700.0, 300.0);
const PANEL_BG: Color32 = Color32::from_rgb(13, 13, 20);
const CROSSHAIR_SIZE: f32 = 10.0;

const TITLE_OFFSET: f32 = -90.0;
const QUESTION_OFFSET: f32 = -40.0;
const ANSWER_LABEL_OFFSET: f32 = 20.0;
const ANSWER_OFFSET: f32 = 70.0;

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Success => Color32::from_rgb(51, 255, 51),
        Severity::Failure => Color32::from_rgb(255, 77, 51),
        Severity::Info => Color32::from_rgb(255, 204, 51),
    }
}

/// Typed answer followed by the caret when it is in its visible phase.
pub fn answer_line(answer: &str, caret_visible: bool) -> String {
    if caret_visible { format!("{answer}_") } else { answer.to_string() }
}

/// Decode the reveal image into an egui texture.
pub fn load_final_image(ctx: &Context, path: &Path) -> Result<TextureHandle, AppError> {
    let img = load_rgba(path)?;
    let size = [img.width() as usize, img.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
    Ok(ctx.load_texture("final_image", color_image, egui::TextureOptions::LINEAR))
}

/// Draw the 2D overlay for one frame.
pub fn build_ui(ctx: &Context, snapshot: &FrameSnapshot, final_image: &TextureHandle) {
    if snapshot.show_final_image {
        draw_final_image(ctx, final_image);
        return;
    }

    if snapshot.mode == GameState::Puzzle {
        draw_puzzle_panel(ctx, snapshot);
    }
    draw_message(ctx, snapshot);
    if snapshot.mode == GameState::Playing {
        draw_crosshair(ctx);
    }
}

fn overlay_painter(ctx: &Context, name: &'static str) -> egui::Painter {
    ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new(name)))
}

fn draw_crosshair(ctx: &Context) {
    let painter = overlay_painter(ctx, "crosshair");
    let center = ctx.available_rect().center();
    let stroke = Stroke::new(2.0, Color32::WHITE);
    painter.line_segment(
        [Pos2::new(center.x - CROSSHAIR_SIZE, center.y), Pos2::new(center.x + CROSSHAIR_SIZE, center.y)],
        stroke,
    );
    painter.line_segment(
        [Pos2::new(center.x, center.y - CROSSHAIR_SIZE), Pos2::new(center.x, center.y + CROSSHAIR_SIZE)],
        stroke,
    );
}

fn draw_puzzle_panel(ctx: &Context, snapshot: &FrameSnapshot) {
    let Some(puzzle) = &snapshot.puzzle else {
        return;
    };
    let painter = overlay_painter(ctx, "puzzle_panel");
    let screen = ctx.available_rect();
    let center = screen.center();

    // Dim the room behind the panel
    painter.rect_filled(screen, 0.0, Color32::from_black_alpha(115));
    painter.rect_filled(Rect::from_center_size(center, PANEL_SIZE), 6.0, PANEL_BG);

    let left = center.x - PANEL_SIZE.x / 2.0 + 50.0;
    painter.text(
        Pos2::new(center.x, center.y + TITLE_OFFSET),
        Align2::CENTER_CENTER,
        format!("LEVEL {}", puzzle.level_id),
        FontId::proportional(40.0),
        Color32::from_rgb(255, 230, 51),
    );
    painter.text(
        Pos2::new(left, center.y + QUESTION_OFFSET),
        Align2::LEFT_CENTER,
        &puzzle.question,
        FontId::proportional(22.0),
        Color32::WHITE,
    );
    painter.text(
        Pos2::new(left, center.y + ANSWER_LABEL_OFFSET),
        Align2::LEFT_CENTER,
        "Your Answer:",
        FontId::proportional(20.0),
        Color32::from_rgb(179, 255, 179),
    );
    painter.text(
        Pos2::new(left, center.y + ANSWER_OFFSET),
        Align2::LEFT_CENTER,
        answer_line(&puzzle.answer, puzzle.caret_visible),
        FontId::monospace(26.0),
        Color32::from_rgb(51, 255, 51),
    );
}

fn draw_message(ctx: &Context, snapshot: &FrameSnapshot) {
    let Some(message) = &snapshot.message else {
        return;
    };
    let painter = overlay_painter(ctx, "message");
    let center = ctx.available_rect().center();
    painter.text(
        Pos2::new(center.x, center.y + PANEL_SIZE.y / 2.0 + 50.0),
        Align2::CENTER_CENTER,
        &message.text,
        FontId::proportional(28.0),
        severity_color(message.severity),
    );
}

fn draw_final_image(ctx: &Context, final_image: &TextureHandle) {
    let painter = overlay_painter(ctx, "final_image");
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    painter.image(final_image.id(), ctx.available_rect(), uv, Color32::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_is_appended_only_when_visible() {
        assert_eq!(answer_line("12", true), "12_");
        assert_eq!(answer_line("12", false), "12");
        assert_eq!(answer_line("", true), "_");
    }

    #[test]
    fn each_severity_has_its_own_color() {
        let colors = [Severity::Success, Severity::Failure, Severity::Info].map(severity_color);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn missing_final_image_is_reported_with_path() {
        let ctx = Context::default();
        match load_final_image(&ctx, Path::new("does/not/exist.jpg")) {
            Err(err) => assert!(err.to_string().contains("does/not/exist.jpg"), "{err}"),
            Ok(_) => panic!("loading a missing image must fail"),
        }
    }
}
