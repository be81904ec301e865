// crates/framedeck-ui/src/modules/lightbox.rs
//
// Full-size frame preview over the gallery. Rendered only while the
// PreviewCursor is open; prev/next enablement comes straight from the
// Gallery model's boundary checks, so the buttons can never step outside
// the FrameSet.
//
// Keyboard: ← / → navigate, Esc closes.

use super::ClientModule;
use crate::context::FrameCaches;
use crate::helpers::format::truncate;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BORDER, DARK_TEXT_DIM};
use egui::{Color32, Key, RichText, Sense, Stroke, Ui, Vec2};

use framedeck_core::commands::ClientCommand;
use framedeck_core::helpers::frame_path::file_name;
use framedeck_core::state::SessionState;

const PREVIEW_MAX: Vec2 = Vec2::new(760.0, 520.0);

pub struct LightboxModule;

impl ClientModule for LightboxModule {
    fn name(&self) -> &str { "Preview" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, caches: &mut FrameCaches, cmd: &mut Vec<ClientCommand>) {
        let Some(index) = state.gallery.cursor() else { return };
        let Some(path) = state.gallery.current_frame() else { return };
        let total = state.gallery.frame_count();

        // ── Hotkeys ──────────────────────────────────────────────────────────
        ui.input(|i| {
            if i.key_pressed(Key::ArrowRight) {
                cmd.push(ClientCommand::NextFrame);
            }
            if i.key_pressed(Key::ArrowLeft) {
                cmd.push(ClientCommand::PreviousFrame);
            }
            if i.key_pressed(Key::Escape) {
                cmd.push(ClientCommand::ClosePreview);
            }
        });

        caches.request(path);

        let ctx = ui.ctx().clone();

        // Dim the whole viewport behind the preview window. Clicking the
        // dimmed area closes, like clicking outside a browser lightbox.
        let screen = ctx.screen_rect();
        let backdrop = egui::Area::new(egui::Id::new("lightbox_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(&ctx, |ui| {
                let response = ui.allocate_rect(screen, Sense::click());
                ui.painter().rect_filled(
                    screen,
                    0.0,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 160),
                );
                response
            });
        if backdrop.inner.clicked() {
            cmd.push(ClientCommand::ClosePreview);
        }

        egui::Window::new(
            RichText::new(format!("🔍 {}", truncate(file_name(path), 40))).size(12.0),
        )
        .order(egui::Order::Foreground)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .frame(
            egui::Frame::new()
                .fill(DARK_BG_2)
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::same(10)),
        )
        .show(&ctx, |ui| {
            // ── Image ────────────────────────────────────────────────────────
            match caches.texture(path) {
                Some(texture) => {
                    let size = texture.size_vec2();
                    let scale = (PREVIEW_MAX.x / size.x)
                        .min(PREVIEW_MAX.y / size.y)
                        .min(1.0);
                    ui.add(egui::Image::new((texture.id(), size * scale)));
                }
                None => {
                    let (rect, _) =
                        ui.allocate_exact_size(PREVIEW_MAX * 0.6, Sense::hover());
                    ui.painter().rect_filled(rect, 4.0, Color32::from_rgb(17, 18, 24));
                    let label = if caches.is_failed(path) {
                        "⚠ Error loading image"
                    } else {
                        "Loading…"
                    };
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        label,
                        egui::FontId::proportional(14.0),
                        Color32::from_gray(90),
                    );
                    if !caches.is_failed(path) {
                        ui.ctx().request_repaint();
                    }
                }
            }

            ui.add_space(8.0);

            // ── Controls ─────────────────────────────────────────────────────
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(state.gallery.has_previous(), egui::Button::new("◀ Prev"))
                    .clicked()
                {
                    cmd.push(ClientCommand::PreviousFrame);
                }
                if ui
                    .add_enabled(state.gallery.has_next(), egui::Button::new("Next ▶"))
                    .clicked()
                {
                    cmd.push(ClientCommand::NextFrame);
                }

                ui.label(
                    RichText::new(format!("{} / {}", index + 1, total))
                        .monospace()
                        .size(12.0)
                        .color(ACCENT),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕ Close").clicked() {
                        cmd.push(ClientCommand::ClosePreview);
                    }
                    if ui.button("💾 Save frame").clicked() {
                        cmd.push(ClientCommand::SaveCurrentFrame);
                    }
                    ui.label(
                        RichText::new("← → navigate, Esc closes")
                            .size(9.0)
                            .color(DARK_TEXT_DIM),
                    );
                });
            });
        });
    }
}
