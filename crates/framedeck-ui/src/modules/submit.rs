// crates/framedeck-ui/src/modules/submit.rs
//
// Left-panel form: choose a video (local file upload, or a path on the
// server's filesystem), tune the extraction options, hit Extract.
//
// The option values live in SessionState so /config can seed them; the
// form edits a scratch copy and pushes SetOptions when something changed.
// Validation (no file / empty path) happens in the state layer — the
// command is emitted regardless and the no-input case never reaches the
// network.

use std::path::PathBuf;

use super::ClientModule;
use crate::context::FrameCaches;
use crate::helpers::format::truncate;
use crate::theme::{ACCENT, DARK_BG_2, DARK_TEXT_DIM};
use egui::{Align, Layout, RichText, Ui};
use rfd::FileDialog;

use framedeck_core::commands::ClientCommand;
use framedeck_core::state::{JobPhase, SessionState};

const OUTPUT_FORMATS: &[&str] = &["png", "jpg"];

#[derive(PartialEq, Clone, Copy)]
enum SubmitMode {
    /// Upload a file from this machine.
    Upload,
    /// Point the server at a path it can already see.
    ServerPath,
}

pub struct SubmitModule {
    mode: SubmitMode,
    selected_file: Option<PathBuf>,
    server_path: String,
}

impl Default for SubmitModule {
    fn default() -> Self {
        Self {
            mode: SubmitMode::Upload,
            selected_file: None,
            server_path: String::new(),
        }
    }
}

impl SubmitModule {
    /// File-picker extension list, derived from the server's supported
    /// formats (".mp4" → "mp4") with a fallback while /config is pending.
    fn picker_extensions(state: &SessionState) -> Vec<String> {
        if state.supported_formats.is_empty() {
            return ["mp4", "avi", "mov", "mkv", "webm"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        }
        state
            .supported_formats
            .iter()
            .map(|f| f.trim_start_matches('.').to_string())
            .collect()
    }
}

impl ClientModule for SubmitModule {
    fn name(&self) -> &str { "Extract" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, _caches: &mut FrameCaches, cmd: &mut Vec<ClientCommand>) {
        ui.vertical(|ui| {
            // ── Header ──────────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 6, bottom: 6 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("🎬 Extract Frames").size(12.0).strong());
                        if let Some(mb) = state.max_upload_mb {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(
                                    RichText::new(format!("≤ {mb} MB"))
                                        .size(9.0)
                                        .color(DARK_TEXT_DIM),
                                );
                            });
                        }
                    });
                });

            ui.separator();
            ui.add_space(4.0);

            // ── Source ──────────────────────────────────────────────────────
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.mode, SubmitMode::Upload, "Upload file");
                ui.selectable_value(&mut self.mode, SubmitMode::ServerPath, "Server path");
            });
            ui.add_space(4.0);

            match self.mode {
                SubmitMode::Upload => {
                    if ui.button("📂 Choose video…").clicked() {
                        let extensions = Self::picker_extensions(state);
                        let extensions: Vec<&str> =
                            extensions.iter().map(String::as_str).collect();
                        if let Some(path) = FileDialog::new()
                            .add_filter("Video", &extensions)
                            .pick_file()
                        {
                            self.selected_file = Some(path);
                        }
                    }
                    match &self.selected_file {
                        Some(file) => {
                            let name = file
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default();
                            ui.label(
                                RichText::new(truncate(&name, 34)).size(11.0).color(ACCENT),
                            );
                        }
                        None => {
                            ui.label(
                                RichText::new("No file selected")
                                    .size(11.0)
                                    .color(DARK_TEXT_DIM),
                            );
                        }
                    }
                }
                SubmitMode::ServerPath => {
                    ui.label(RichText::new("Path on the server:").size(11.0));
                    ui.text_edit_singleline(&mut self.server_path);
                }
            }

            if !state.supported_formats.is_empty() {
                ui.label(
                    RichText::new(format!(
                        "Supported: {}",
                        state.supported_formats.join(", ")
                    ))
                    .size(9.0)
                    .color(DARK_TEXT_DIM),
                );
            }

            ui.add_space(8.0);
            ui.separator();

            // ── Options ─────────────────────────────────────────────────────
            // Edit a scratch copy; one SetOptions per changed frame keeps the
            // state authoritative without widgets writing into it directly.
            let mut options = state.options.clone();

            ui.label(RichText::new("Output folder").size(11.0));
            ui.text_edit_singleline(&mut options.output_root);

            ui.add_space(2.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Quality").size(11.0));
                ui.add(
                    egui::Slider::new(&mut options.quality, 1..=31)
                        .show_value(true),
                )
                .on_hover_text("FFmpeg quality scale — lower is better");
            });

            ui.horizontal(|ui| {
                ui.label(RichText::new("Format").size(11.0));
                egui::ComboBox::from_id_salt("output_format")
                    .selected_text(options.output_format.clone())
                    .show_ui(ui, |ui| {
                        for format in OUTPUT_FORMATS {
                            ui.selectable_value(
                                &mut options.output_format,
                                format.to_string(),
                                *format,
                            );
                        }
                    });
            });

            if options != state.options {
                cmd.push(ClientCommand::SetOptions(options));
            }

            ui.add_space(10.0);

            // ── Submit ──────────────────────────────────────────────────────
            let busy = matches!(
                state.job.phase,
                JobPhase::Submitting | JobPhase::Processing
            );
            let label = if busy { "⚡ Extract (restarts)" } else { "⚡ Extract Frames" };
            if ui
                .add_sized([ui.available_width(), 28.0], egui::Button::new(label))
                .clicked()
            {
                match self.mode {
                    SubmitMode::Upload => cmd.push(ClientCommand::SubmitUpload {
                        file: self.selected_file.clone(),
                    }),
                    SubmitMode::ServerPath => cmd.push(ClientCommand::SubmitServerPath {
                        path: self.server_path.clone(),
                    }),
                }
            }

            if let Some(message) = &state.form_error {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(message)
                        .size(11.0)
                        .color(egui::Color32::from_rgb(220, 90, 90)),
                );
            }
        });
    }
}
