// crates/framedeck-ui/src/modules/gallery.rs
//
// Thumbnail grid for the current FrameSet: numbered cards, checkbox
// multi-select, and the refresh / download controls. Clicking a card opens
// the lightbox; the checkbox only touches the selection.

use super::ClientModule;
use crate::context::FrameCaches;
use crate::helpers::format::truncate;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BG_4, DARK_BORDER, DARK_TEXT_DIM};
use egui::{Align, Color32, Id, Layout, RichText, Sense, Stroke, Ui};

use framedeck_core::commands::ClientCommand;
use framedeck_core::state::SessionState;

const CARD_W: f32 = 108.0;
const CARD_H: f32 = 96.0;
const THUMB_W: f32 = 100.0;
const THUMB_H: f32 = 62.0;

pub struct GalleryModule;

impl ClientModule for GalleryModule {
    fn name(&self) -> &str { "Frames" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, caches: &mut FrameCaches, cmd: &mut Vec<ClientCommand>) {
        ui.vertical(|ui| {
            // ── Header ──────────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 6, bottom: 6 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("🖼 Extracted Frames").size(12.0).strong());
                        if let Some(set) = state.gallery.frame_set() {
                            ui.label(
                                RichText::new(format!(
                                    "{} — {} frames",
                                    truncate(&set.video_name, 28),
                                    set.frame_count()
                                ))
                                .size(10.0)
                                .color(DARK_TEXT_DIM),
                            );
                        }

                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.button(RichText::new("⟳ Refresh").size(11.0)).clicked() {
                                cmd.push(ClientCommand::RefreshFrames);
                            }

                            // Video picker, once the server reports frames
                            // for more than one video.
                            if state.listing.len() > 1 {
                                let current = state
                                    .gallery
                                    .frame_set()
                                    .map(|s| s.video_name.clone())
                                    .unwrap_or_default();
                                egui::ComboBox::from_id_salt("video_picker")
                                    .selected_text(truncate(&current, 18).to_string())
                                    .show_ui(ui, |ui| {
                                        for video in &state.listing {
                                            if ui
                                                .selectable_label(
                                                    video.video_name == current,
                                                    format!(
                                                        "{} ({})",
                                                        video.video_name,
                                                        video.frame_count
                                                    ),
                                                )
                                                .clicked()
                                            {
                                                cmd.push(ClientCommand::ShowVideo(
                                                    video.video_name.clone(),
                                                ));
                                            }
                                        }
                                    });
                            }
                        });
                    });
                });

            ui.separator();

            // ── Selection / download toolbar ────────────────────────────────
            if !state.gallery.is_empty() {
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let selected = state.gallery.selected_count();
                    if ui.button(RichText::new("Select all").size(10.0)).clicked() {
                        cmd.push(ClientCommand::SelectAll);
                    }
                    if ui
                        .add_enabled(
                            selected > 0,
                            egui::Button::new(RichText::new("Clear").size(10.0)),
                        )
                        .clicked()
                    {
                        cmd.push(ClientCommand::DeselectAll);
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.add_space(6.0);
                        if ui
                            .button(RichText::new("⬇ Download all").size(10.0))
                            .clicked()
                        {
                            cmd.push(ClientCommand::DownloadAllFrames);
                        }
                        if ui
                            .add_enabled(
                                selected > 0,
                                egui::Button::new(
                                    RichText::new(format!("⬇ Selected ({selected})"))
                                        .size(10.0),
                                ),
                            )
                            .clicked()
                        {
                            cmd.push(ClientCommand::DownloadSelected);
                        }
                        if let Some(status) = &state.save_status {
                            if ui.small_button("✕").clicked() {
                                cmd.push(ClientCommand::ClearSaveStatus);
                            }
                            ui.label(
                                RichText::new(status).size(10.0).color(ACCENT),
                            );
                        }
                    });
                });
            }

            // ── Card grid ───────────────────────────────────────────────────
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                if state.gallery.is_empty() {
                    ui.add_space(40.0);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("🎞").size(32.0));
                        ui.add_space(6.0);
                        ui.label(
                            RichText::new("No frames extracted yet.\nSubmit a video or hit Refresh.")
                                .size(11.0)
                                .color(DARK_TEXT_DIM),
                        );
                    });
                    return;
                }

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

                    for (index, path) in state.gallery.frames().iter().enumerate() {
                        caches.request(path);
                        frame_card(ui, state, caches, cmd, index, path);
                    }
                });
                ui.add_space(8.0);
            });
        });
    }
}

fn frame_card(
    ui: &mut Ui,
    state: &SessionState,
    caches: &FrameCaches,
    cmd: &mut Vec<ClientCommand>,
    index: usize,
    path: &str,
) {
    let selected = state.gallery.is_selected(path);
    let border = if selected { ACCENT } else { DARK_BORDER };

    let card = egui::Frame::new()
        .fill(if selected { DARK_BG_4 } else { DARK_BG_3 })
        .stroke(Stroke::new(if selected { 1.5 } else { 1.0 }, border))
        .corner_radius(egui::CornerRadius::same(5))
        .inner_margin(egui::Margin::same(4))
        .show(ui, |ui| {
            ui.set_width(CARD_W);
            ui.set_height(CARD_H);
            ui.vertical_centered(|ui| {
                let thumb_rect = if let Some(texture) = caches.texture(path) {
                    ui.add(
                        egui::Image::new((texture.id(), egui::vec2(THUMB_W, THUMB_H)))
                            .corner_radius(egui::CornerRadius::same(3)),
                    )
                    .rect
                } else {
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(THUMB_W, THUMB_H),
                        Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 3.0, Color32::from_rgb(17, 18, 24));
                    if caches.is_failed(path) {
                        // Placeholder for a frame that wouldn't fetch or
                        // decode — cosmetic only.
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "⚠",
                            egui::FontId::proportional(18.0),
                            Color32::from_gray(90),
                        );
                    } else {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "…",
                            egui::FontId::proportional(16.0),
                            Color32::from_gray(70),
                        );
                        ui.ctx().request_repaint();
                    }
                    rect
                };

                ui.add_space(2.0);
                ui.horizontal(|ui| {
                    let mut checked = selected;
                    if ui.checkbox(&mut checked, "").changed() {
                        cmd.push(ClientCommand::ToggleSelect(path.to_string()));
                    }
                    // 1-based frame number, like the grid badge in the
                    // browser original.
                    ui.label(
                        RichText::new(format!("{}", index + 1))
                            .size(10.0)
                            .color(ACCENT)
                            .monospace(),
                    );
                });

                thumb_rect
            })
            .inner
        });

    // Only the thumbnail opens the lightbox — the checkbox below keeps
    // its own click.
    let interact = ui.interact(
        card.inner,
        Id::new("frame_card").with(index),
        Sense::click(),
    );
    if interact.clicked() {
        cmd.push(ClientCommand::OpenPreview(index));
    }
    if interact.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
}
