// crates/framedeck-ui/src/modules/status.rs
//
// Job status strip: phase indicator, progress bar, elapsed time, the
// metadata table, and the zip-download banner. Entirely derived from the
// session snapshot — the module holds no state of its own.
//
// Phase → presentation mapping lives in phase_style(); everything else in
// this file is layout.

use super::ClientModule;
use crate::context::FrameCaches;
use crate::helpers::format::{mb_label, prettify_key};
use crate::theme::{ACCENT, DARK_BG_2, DARK_TEXT_DIM};
use egui::{Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use framedeck_core::commands::ClientCommand;
use framedeck_core::helpers::time::format_elapsed;
use framedeck_core::state::{JobPhase, SessionState};

/// Muted green used for the "completed" banner and indicator.
const GREEN_DIM: Color32 = Color32::from_rgb(80, 190, 120);
/// Muted red used for error banners and the failed indicator.
const RED_DIM: Color32 = Color32::from_rgb(200, 80, 80);

/// The status-indicator mapping: phase → (label, dot color).
fn phase_style(phase: JobPhase) -> (&'static str, Color32) {
    match phase {
        JobPhase::Idle       => ("Idle", Color32::from_gray(110)),
        JobPhase::Submitting => ("Uploading…", ACCENT),
        JobPhase::Processing => ("Processing…", ACCENT),
        JobPhase::Completed  => ("Completed", GREEN_DIM),
        JobPhase::Failed     => ("Error", RED_DIM),
    }
}

pub struct StatusModule;

impl ClientModule for StatusModule {
    fn name(&self) -> &str { "Status" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, _caches: &mut FrameCaches, cmd: &mut Vec<ClientCommand>) {
        // Hidden until something has been submitted, like the original's
        // collapsed status section.
        if state.job.phase == JobPhase::Idle && state.download.is_none() {
            return;
        }

        let job = &state.job;
        let (label, color) = phase_style(job.phase);

        egui::Frame::new()
            .fill(DARK_BG_2)
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                // ── Indicator row ───────────────────────────────────────────
                ui.horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(
                        egui::vec2(10.0, 10.0),
                        egui::Sense::hover(),
                    );
                    ui.painter().circle_filled(dot.center(), 4.0, color);
                    ui.label(RichText::new(label).size(13.0).strong().color(color));

                    if !job.video_name.is_empty() {
                        ui.label(
                            RichText::new(&job.video_name)
                                .size(12.0)
                                .color(DARK_TEXT_DIM),
                        );
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if job.is_terminal() && ui.small_button("✕").clicked() {
                            cmd.push(ClientCommand::ClearJobStatus);
                        }
                        ui.label(
                            RichText::new(format!(
                                "Processing time: {}",
                                format_elapsed(job.elapsed_seconds)
                            ))
                            .size(11.0)
                            .color(DARK_TEXT_DIM),
                        );
                    });
                });

                // ── Progress ────────────────────────────────────────────────
                if matches!(job.phase, JobPhase::Submitting | JobPhase::Processing) {
                    ui.add_space(4.0);
                    ui.add(
                        egui::ProgressBar::new(job.progress as f32 / 100.0)
                            .fill(ACCENT)
                            .text(format!("{}%", job.progress))
                            .animate(job.phase == JobPhase::Submitting),
                    );
                }

                // ── Result line ─────────────────────────────────────────────
                match job.phase {
                    JobPhase::Completed => {
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new(format!(
                                "✓ Successfully extracted {} frames.",
                                state.gallery.frame_count()
                            ))
                            .size(11.0)
                            .color(GREEN_DIM),
                        );
                    }
                    JobPhase::Failed => {
                        ui.add_space(4.0);
                        // Backend message, verbatim.
                        let message = job.error.as_deref().unwrap_or("unknown error");
                        ui.label(RichText::new(message).size(11.0).color(RED_DIM));
                    }
                    _ => {}
                }

                // ── Metadata table ──────────────────────────────────────────
                if let Some(metadata) = &job.metadata {
                    if !metadata.is_empty() {
                        ui.add_space(6.0);
                        egui::CollapsingHeader::new(
                            RichText::new("Video metadata").size(11.0),
                        )
                        .default_open(true)
                        .show(ui, |ui| {
                            TableBuilder::new(ui)
                                .column(Column::auto().at_least(110.0))
                                .column(Column::remainder())
                                .vscroll(false)
                                .body(|mut body| {
                                    for (key, value) in metadata {
                                        body.row(18.0, |mut row| {
                                            row.col(|ui| {
                                                ui.label(
                                                    RichText::new(prettify_key(key))
                                                        .size(10.0)
                                                        .color(DARK_TEXT_DIM),
                                                );
                                            });
                                            row.col(|ui| {
                                                ui.label(
                                                    RichText::new(value).size(10.0),
                                                );
                                            });
                                        });
                                    }
                                });
                        });
                    }
                }
            });

        // ── Zip download banner ─────────────────────────────────────────────
        if let Some(download) = &state.download {
            ui.add_space(4.0);
            egui::Frame::new()
                .fill(DARK_BG_2)
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if let Some(message) = &download.error {
                            ui.label(
                                RichText::new(format!("✕ {message}"))
                                    .size(11.0)
                                    .color(RED_DIM),
                            );
                        } else if download.finished {
                            ui.label(
                                RichText::new(format!("✓ Saved {}", download.dest_name))
                                    .size(11.0)
                                    .color(GREEN_DIM),
                            );
                        } else {
                            ui.label(
                                RichText::new(format!(
                                    "⬇ {}  {}",
                                    download.dest_name,
                                    mb_label(download.received, download.total)
                                ))
                                .size(11.0)
                                .color(ACCENT),
                            );
                        }
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if (download.finished || download.error.is_some())
                                && ui.small_button("✕").clicked()
                            {
                                cmd.push(ClientCommand::DismissDownload);
                            }
                        });
                    });
                });
        }
    }
}
