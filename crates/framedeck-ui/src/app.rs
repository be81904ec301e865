// crates/framedeck-ui/src/app.rs (framedeck-ui)
use framedeck_api::{ApiWorker, DownloadTarget};
use framedeck_core::commands::ClientCommand;
use framedeck_core::helpers::frame_path::file_name;
use framedeck_core::state::{JobPhase, SessionState};

use crate::context::AppContext;
use crate::modules::{
    gallery::GalleryModule,
    lightbox::LightboxModule,
    status::StatusModule,
    submit::SubmitModule,
    ClientModule,
};
use crate::paths::default_download_dir;
use crate::theme::configure_style;

use eframe::egui;
use rfd::FileDialog;

// ── App ───────────────────────────────────────────────────────────────────────

pub struct FrameDeckApp {
    state:   SessionState,
    context: AppContext,
    // Panel modules as concrete types — a typo'd panel is a compile error,
    // not a silently blank screen.
    submit:   SubmitModule,
    status:   StatusModule,
    gallery:  GalleryModule,
    lightbox: LightboxModule,
    /// Commands emitted by modules each frame, processed after the UI pass
    pending_cmds: Vec<ClientCommand>,
}

impl FrameDeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>, base_url: String) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode — prevents egui overwriting our theme on OS
        // light/dark changes.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let api_worker = ApiWorker::new(base_url);
        // Seed the option form and pick up frames extracted before this
        // session; both fetches fail soft.
        api_worker.fetch_config();
        api_worker.refresh_frames();

        Self {
            state:        SessionState::default(),
            context:      AppContext::new(api_worker),
            submit:       SubmitModule::default(),
            status:       StatusModule,
            gallery:      GalleryModule,
            lightbox:     LightboxModule,
            pending_cmds: Vec::new(),
        }
    }

    fn process_command(&mut self, cmd: ClientCommand) {
        match cmd {
            // ── Submission ───────────────────────────────────────────────────
            ClientCommand::SubmitUpload { file } => {
                let Some(file) = file else {
                    // Records the validation error; nothing touches the
                    // network and the job stays Idle.
                    self.state.begin_upload(None);
                    return;
                };
                if let Some(job) = self.state.begin_upload(Some(&file)) {
                    self.context.frames.clear();
                    self.context.api_worker.submit_upload(
                        job,
                        file,
                        self.state.options.clone(),
                    );
                }
            }
            ClientCommand::SubmitServerPath { path } => {
                if let Some(job) = self.state.begin_process(&path) {
                    self.context.frames.clear();
                    self.context.api_worker.submit_process(
                        job,
                        path.trim().to_string(),
                        self.state.options.clone(),
                    );
                }
            }
            ClientCommand::ClearJobStatus => {
                self.state.clear_job();
            }

            // ── Gallery ──────────────────────────────────────────────────────
            ClientCommand::RefreshFrames => {
                self.context.api_worker.refresh_frames();
            }
            ClientCommand::ShowVideo(name) => {
                self.state.show_video(&name);
                self.context.frames.clear();
            }
            ClientCommand::OpenPreview(index) => self.state.gallery.open_preview(index),
            ClientCommand::NextFrame => self.state.gallery.next(),
            ClientCommand::PreviousFrame => self.state.gallery.previous(),
            ClientCommand::ClosePreview => self.state.gallery.close_preview(),
            ClientCommand::ToggleSelect(path) => self.state.gallery.toggle_select(&path),
            ClientCommand::SelectAll => self.state.gallery.select_all(),
            ClientCommand::DeselectAll => self.state.gallery.deselect_all(),

            // ── Downloads ────────────────────────────────────────────────────
            ClientCommand::DownloadAllFrames => {
                let video = match self.state.gallery.frame_set() {
                    Some(set) => set.video_name.clone(),
                    None => return,
                };
                self.start_zip_download(
                    format!("{video}_frames.zip"),
                    DownloadTarget::Video(video),
                );
            }
            ClientCommand::DownloadSelected => {
                let selected: Vec<String> =
                    self.state.gallery.selected().iter().cloned().collect();
                if selected.is_empty() {
                    return;
                }
                let video = self
                    .state
                    .gallery
                    .frame_set()
                    .map(|set| set.video_name.clone())
                    .unwrap_or_else(|| "frames".into());
                self.start_zip_download(
                    format!("{video}_selection.zip"),
                    DownloadTarget::Frames(selected),
                );
            }
            ClientCommand::SaveCurrentFrame => {
                let path = match self.state.gallery.current_frame() {
                    Some(path) => path.to_string(),
                    None => return,
                };
                let default_name = file_name(&path).to_string();
                if let Some(dest) = FileDialog::new()
                    .set_directory(default_download_dir())
                    .set_file_name(&default_name)
                    .save_file()
                {
                    self.context.api_worker.save_frame(path, dest);
                }
            }
            ClientCommand::DismissDownload => self.state.dismiss_download(),
            ClientCommand::ClearSaveStatus => self.state.save_status = None,

            // ── Options ──────────────────────────────────────────────────────
            ClientCommand::SetOptions(options) => self.state.options = options,
        }
    }

    /// Ask where to put the zip, then hand the streaming off to the worker.
    fn start_zip_download(&mut self, default_name: String, target: DownloadTarget) {
        let Some(dest) = FileDialog::new()
            .set_directory(default_download_dir())
            .set_file_name(&default_name)
            .add_filter("ZIP archive", &["zip"])
            .save_file()
        else {
            return;
        };
        let dest_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(default_name);
        self.state.begin_download(dest_name);
        self.context.api_worker.download_zip(target, dest);
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for FrameDeckApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.api_worker.shutdown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Dispatch all queued worker results into state / caches ────────────
        self.context.ingest_api_events(&mut self.state, ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("🎞 FrameDeck")
                            .strong()
                            .size(15.0)
                            .color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    ui.label(
                        egui::RichText::new(self.context.api_worker.base_url())
                            .size(11.0)
                            .weak(),
                    );
                });
            });

        egui::SidePanel::left("submit_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                self.submit.ui(ui, &self.state, &mut self.context.frames, &mut self.pending_cmds);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.status.ui(ui, &self.state, &mut self.context.frames, &mut self.pending_cmds);
            ui.add_space(6.0);
            self.gallery.ui(ui, &self.state, &mut self.context.frames, &mut self.pending_cmds);
            // Overlay last so it floats above the grid.
            self.lightbox.ui(ui, &self.state, &mut self.context.frames, &mut self.pending_cmds);
        });

        // ── Process commands emitted by modules this frame ────────────────────
        let cmds: Vec<ClientCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }

        // ── Feed the worker from the fetch queue, bounded in flight ───────────
        for path in self.context.frames.next_fetches() {
            self.context.api_worker.fetch_frame(path);
        }

        // Poll results arrive without user input; keep repainting while any
        // background work can still land events.
        let waiting = matches!(
            self.state.job.phase,
            JobPhase::Submitting | JobPhase::Processing
        ) || self
            .state
            .download
            .as_ref()
            .is_some_and(|d| !d.finished && d.error.is_none());
        if waiting {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}
