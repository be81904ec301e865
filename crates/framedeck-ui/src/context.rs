// crates/framedeck-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of the session
// state. FrameDeckApp holds one of these plus a SessionState and the
// module list — nothing else.
//
// Sub-struct layout:
//   AppContext
//     ├── api_worker          — the HTTP worker + its event channel
//     └── frames: FrameCaches — GPU frame textures + the fetch queue

use std::collections::{HashMap, HashSet, VecDeque};

use eframe::egui;

use framedeck_api::ApiWorker;
use framedeck_core::api_types::ApiEvent;
use framedeck_core::helpers::frame_path::normalize;
use framedeck_core::state::{JobPhase, SessionState};

/// Frame fetches allowed in flight from the UI's point of view.
/// Slightly above the worker's own socket cap so its semaphore stays fed.
const MAX_IN_FLIGHT: usize = 8;

// ── FrameCaches ──────────────────────────────────────────────────────────────
// Owns the GPU-resident frame textures and the queue of paths still to
// fetch. Modules call request(); the app drains next_fetches() once per
// frame and hands them to the worker. Keys are normalized paths so a
// /status path and a /frames path for the same image share one entry.
pub struct FrameCaches {
    textures: HashMap<String, egui::TextureHandle>,
    /// Paths whose fetch or decode failed — cards render a placeholder
    /// instead of retrying every frame.
    failed: HashSet<String>,
    /// Paths waiting for a fetch slot, oldest first.
    queue: VecDeque<String>,
    /// Membership set for queue + in-flight, so request() is idempotent.
    requested: HashSet<String>,
    in_flight: usize,
}

impl FrameCaches {
    fn new() -> Self {
        Self {
            textures: HashMap::new(),
            failed: HashSet::new(),
            queue: VecDeque::new(),
            requested: HashSet::new(),
            in_flight: 0,
        }
    }

    pub fn texture(&self, path: &str) -> Option<&egui::TextureHandle> {
        self.textures.get(normalize(path))
    }

    pub fn is_failed(&self, path: &str) -> bool {
        self.failed.contains(normalize(path))
    }

    /// Queue a fetch for `path` unless it's already cached, failed, queued
    /// or in flight.
    pub fn request(&mut self, path: &str) {
        let key = normalize(path);
        if self.textures.contains_key(key)
            || self.failed.contains(key)
            || self.requested.contains(key)
        {
            return;
        }
        self.requested.insert(key.to_string());
        self.queue.push_back(key.to_string());
    }

    /// Pop the paths that may be dispatched now, respecting MAX_IN_FLIGHT.
    pub fn next_fetches(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while self.in_flight < MAX_IN_FLIGHT {
            let Some(path) = self.queue.pop_front() else { break };
            self.in_flight += 1;
            out.push(path);
        }
        out
    }

    fn settle(&mut self, path: &str) {
        self.requested.remove(path);
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Drop every texture and queued request, as when the FrameSet is
    /// replaced. Results still in flight settle harmlessly afterwards.
    pub fn clear(&mut self) {
        self.textures.clear();
        self.failed.clear();
        self.queue.clear();
        self.requested.clear();
        self.in_flight = 0;
    }
}

// ── AppContext ───────────────────────────────────────────────────────────────

pub struct AppContext {
    pub api_worker: ApiWorker,
    pub frames: FrameCaches,
}

impl AppContext {
    pub fn new(api_worker: ApiWorker) -> Self {
        Self { api_worker, frames: FrameCaches::new() }
    }

    /// Drain the ApiWorker event channel and fold everything into the
    /// session state or the texture cache. Called once per frame from
    /// app::update — this is the single translation layer between worker
    /// output and UI-visible state.
    ///
    /// Job-scoped events carry their Job's id; SessionState's transition
    /// methods drop the ones that no longer match, so nothing a superseded
    /// submission sent can leak into the current job.
    pub fn ingest_api_events(&mut self, state: &mut SessionState, ctx: &egui::Context) {
        while let Ok(event) = self.api_worker.rx.try_recv() {
            match event {
                ApiEvent::ConfigFetched(config) => {
                    state.apply_config(&config);
                }

                ApiEvent::SubmitAccepted { job, filename } => {
                    state.submission_accepted(job, filename);
                    ctx.request_repaint();
                }

                ApiEvent::SubmitRejected { job, message } => {
                    state.submission_rejected(job, message);
                    ctx.request_repaint();
                }

                ApiEvent::Status { job, report } => {
                    let was_running = state.job.phase == JobPhase::Processing;
                    state.apply_status(job, &report);
                    // A completing report replaced the FrameSet — stale
                    // textures would never be looked up again, drop them.
                    if was_running && state.job.phase == JobPhase::Completed {
                        self.frames.clear();
                    }
                    ctx.request_repaint();
                }

                ApiEvent::FramesListed { videos } => {
                    let prefer = (!state.job.video_name.is_empty())
                        .then(|| state.job.video_name.clone());
                    state.apply_listing(videos, prefer.as_deref());
                    self.frames.clear();
                    ctx.request_repaint();
                }

                ApiEvent::FrameImage { path, width, height, rgba } => {
                    let tex = ctx.load_texture(
                        format!("frame-{path}"),
                        egui::ColorImage::from_rgba_unmultiplied(
                            [width as usize, height as usize],
                            &rgba,
                        ),
                        egui::TextureOptions::LINEAR,
                    );
                    self.frames.settle(&path);
                    self.frames.textures.insert(path, tex);
                    ctx.request_repaint();
                }

                ApiEvent::FrameImageFailed { path } => {
                    self.frames.settle(&path);
                    self.frames.failed.insert(path);
                    ctx.request_repaint();
                }

                ApiEvent::FrameSaved { dest } => {
                    crate::framedeck_log!("[app] frame saved → {}", dest.display());
                    let name = dest
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "frame".into());
                    state.save_status = Some(format!("✓ Saved: {name}"));
                    ctx.request_repaint();
                }

                ApiEvent::DownloadProgress { received, total } => {
                    state.download_progress(received, total);
                    ctx.request_repaint();
                }

                ApiEvent::DownloadFinished { dest } => {
                    crate::framedeck_log!("[app] zip saved → {}", dest.display());
                    state.download_finished();
                    ctx.request_repaint();
                }

                ApiEvent::DownloadFailed { message } => {
                    state.download_failed(message);
                    ctx.request_repaint();
                }
            }
        }
    }
}
