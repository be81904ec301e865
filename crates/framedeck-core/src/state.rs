// crates/framedeck-core/src/state.rs
//
// Pure session data — no egui, no ureq, no runtime handles.
// Nothing here persists: the session dies with the process.
//
// Every job-lifecycle transition is a method on SessionState so the whole
// state machine is testable without a server. The UI layer only ever calls
// these methods and renders the result; the worker only ever produces the
// events that feed them.

use std::collections::BTreeMap;
use std::path::Path;

use uuid::Uuid;

use crate::api_types::{ServerConfig, StatusReport, VideoFrames};
use crate::gallery::{FrameSet, Gallery};

/// Discrete lifecycle stage of a Job.
///
/// Legal transitions:
///   Idle → Submitting → Processing → Completed
///                     ↘ Failed      ↘ Failed
///
/// Completed and Failed are terminal for that Job instance; a new submission
/// always constructs a fresh Job with a fresh id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Submitting,
    Processing,
    Completed,
    Failed,
}

/// One video-to-frames extraction request and its lifecycle.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    /// Filename of the video being processed (server-reported name wins
    /// over the locally chosen one once polling starts).
    pub video_name: String,
    pub phase: JobPhase,
    /// 0..=100. Monotonic non-decreasing while Processing.
    pub progress: u8,
    pub elapsed_seconds: u64,
    /// Parsed video metadata from the backend, when the filename was
    /// structured enough to yield any.
    pub metadata: Option<BTreeMap<String, String>>,
    /// Set exactly when phase == Failed.
    pub error: Option<String>,
}

impl Job {
    /// The placeholder Job shown before anything has been submitted.
    pub fn idle() -> Self {
        Self {
            id: Uuid::nil(),
            video_name: String::new(),
            phase: JobPhase::Idle,
            progress: 0,
            elapsed_seconds: 0,
            metadata: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, JobPhase::Completed | JobPhase::Failed)
    }
}

impl Default for Job {
    fn default() -> Self {
        Job::idle()
    }
}

/// Extraction options posted with /upload and /process.
/// Seeded from GET /config; these defaults hold when that fetch fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub output_root: String,
    /// FFmpeg quality scale, 1–31 where lower is better.
    pub quality: u8,
    pub output_format: String,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            output_root: "extracted_frames".into(),
            quality: 2,
            output_format: "png".into(),
        }
    }
}

/// Progress of a zip download streaming to disk.
#[derive(Debug, Clone, Default)]
pub struct DownloadState {
    pub dest_name: String,
    pub received: u64,
    pub total: Option<u64>,
    pub finished: bool,
    pub error: Option<String>,
}

// ── SessionState ─────────────────────────────────────────────────────────────

/// The whole client-visible state: one Job, one Gallery, the option form
/// values, and the transient banners. Owned by the app controller and passed
/// by reference to rendering modules — no module holds its own copy.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub job: Job,
    pub gallery: Gallery,
    pub options: ExtractionOptions,
    /// Formats the server accepts, driving the format picker. Empty until
    /// /config answers.
    pub supported_formats: Vec<String>,
    pub max_upload_mb: Option<u64>,
    /// Inline validation message for the submit form (the browser original
    /// used a blocking alert here).
    pub form_error: Option<String>,
    /// Last /frames listing — feeds the video picker when the server has
    /// frames for more than one video.
    pub listing: Vec<VideoFrames>,
    pub download: Option<DownloadState>,
    /// Brief confirmation shown after a single-frame save.
    pub save_status: Option<String>,
}

impl SessionState {
    // ── Submission ───────────────────────────────────────────────────────────

    /// Begin an upload submission. Returns the new Job's id, or None when
    /// validation fails (no file chosen) — in which case the Job stays Idle
    /// and the caller must not touch the network.
    pub fn begin_upload(&mut self, file: Option<&Path>) -> Option<Uuid> {
        let Some(file) = file else {
            self.form_error = Some("Please select a video file".into());
            return None;
        };
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Some(self.begin_submit(name))
    }

    /// Begin a server-local-path submission. Returns None on an empty path.
    pub fn begin_process(&mut self, path: &str) -> Option<Uuid> {
        if path.trim().is_empty() {
            self.form_error = Some("Please enter a video path".into());
            return None;
        }
        let name = path
            .trim()
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_string();
        Some(self.begin_submit(name))
    }

    /// Construct the fresh Job. The previous job — whatever phase it was
    /// in — is gone from this point on: its events no longer match its id
    /// and its frames no longer apply.
    fn begin_submit(&mut self, video_name: String) -> Uuid {
        let id = Uuid::new_v4();
        self.job = Job {
            id,
            video_name,
            phase: JobPhase::Submitting,
            progress: 0,
            elapsed_seconds: 0,
            metadata: None,
            error: None,
        };
        self.gallery.clear();
        self.form_error = None;
        id
    }

    /// The server accepted the upload/process request; polling begins.
    pub fn submission_accepted(&mut self, job: Uuid, filename: String) {
        if self.job.id != job || self.job.phase != JobPhase::Submitting {
            return;
        }
        if !filename.is_empty() {
            self.job.video_name = filename;
        }
        self.job.phase = JobPhase::Processing;
    }

    /// The server refused the submission (non-2xx or an `{error}` body).
    /// Terminal — no poll loop ever runs for this Job.
    pub fn submission_rejected(&mut self, job: Uuid, message: String) {
        if self.job.id != job || self.job.phase != JobPhase::Submitting {
            return;
        }
        self.job.phase = JobPhase::Failed;
        self.job.error = Some(message);
    }

    // ── Polling ──────────────────────────────────────────────────────────────

    /// Fold one /status response into the Job. Events for a stale job id or
    /// a non-Processing phase are dropped — this is the second half of the
    /// cancellation rule (the first half stops the superseded poll thread).
    pub fn apply_status(&mut self, job: Uuid, report: &StatusReport) {
        if self.job.id != job || self.job.phase != JobPhase::Processing {
            return;
        }

        if let Some(name) = &report.current_video {
            if !name.is_empty() {
                self.job.video_name = name.clone();
            }
        }
        if let Some(secs) = report.elapsed_seconds {
            self.job.elapsed_seconds = secs;
        }
        if report.metadata.is_some() {
            self.job.metadata = report.metadata.clone();
        }

        // A backend-reported error is the only thing that fails a running
        // job; it wins over a completed flag in the same response.
        if let Some(message) = &report.error {
            self.job.phase = JobPhase::Failed;
            self.job.error = Some(message.clone());
            return;
        }

        // Monotonic: a response carrying a smaller (or absent) progress
        // value never moves the bar backwards.
        self.job.progress = self.job.progress.max(report.progress.min(100));

        if report.completed {
            self.job.phase = JobPhase::Completed;
            self.job.progress = 100;
            let frames = report.frames.clone().unwrap_or_default();
            self.gallery
                .load(FrameSet::new(self.job.video_name.clone(), frames));
        }
    }

    /// Dismiss a terminal job banner. Constructs a fresh Idle Job; the
    /// gallery keeps showing whatever it has.
    pub fn clear_job(&mut self) {
        if self.job.is_terminal() {
            self.job = Job::idle();
        }
    }

    // ── Config / listing ─────────────────────────────────────────────────────

    /// Fold /config into the option form. Absent fields keep their current
    /// values (which is also what happens when the fetch fails entirely).
    pub fn apply_config(&mut self, config: &ServerConfig) {
        if let Some(root) = &config.output_root {
            self.options.output_root = root.clone();
        }
        if let Some(q) = config.quality {
            self.options.quality = q.clamp(1, 31);
        }
        if let Some(format) = &config.output_format {
            self.options.output_format = format.clone();
        }
        if !config.supported_formats.is_empty() {
            self.supported_formats = config.supported_formats.clone();
        }
        self.max_upload_mb = config.max_upload_size.or(self.max_upload_mb);
    }

    /// Fold a /frames listing into the gallery: prefer the video matching
    /// `prefer` (normally the current job's video), else the first entry.
    /// The full listing is kept for the video picker.
    pub fn apply_listing(&mut self, videos: Vec<VideoFrames>, prefer: Option<&str>) {
        let chosen = prefer
            .and_then(|name| {
                // The server names frame directories by video stem.
                let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
                videos
                    .iter()
                    .find(|v| v.video_name == stem || v.video_name == name)
            })
            .or_else(|| videos.first());
        if let Some(v) = chosen {
            self.gallery
                .load(FrameSet::new(v.video_name.clone(), v.frames.clone()));
        }
        self.listing = videos;
    }

    /// Switch the gallery to another video from the stored listing.
    pub fn show_video(&mut self, video_name: &str) {
        if let Some(v) = self.listing.iter().find(|v| v.video_name == video_name) {
            self.gallery
                .load(FrameSet::new(v.video_name.clone(), v.frames.clone()));
        }
    }

    // ── Zip download ─────────────────────────────────────────────────────────

    pub fn begin_download(&mut self, dest_name: String) {
        self.download = Some(DownloadState { dest_name, ..Default::default() });
    }

    pub fn download_progress(&mut self, received: u64, total: Option<u64>) {
        if let Some(d) = &mut self.download {
            d.received = received;
            d.total = total.or(d.total);
        }
    }

    pub fn download_finished(&mut self) {
        if let Some(d) = &mut self.download {
            d.finished = true;
        }
    }

    /// Also covers single-frame save failures, which may arrive without a
    /// begin_download — the banner is created on demand.
    pub fn download_failed(&mut self, message: String) {
        let d = self.download.get_or_insert_with(Default::default);
        d.error = Some(message);
    }

    pub fn dismiss_download(&mut self) {
        self.download = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn status(json: &str) -> StatusReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn submit_without_file_is_rejected_before_any_network() {
        let mut s = SessionState::default();
        assert_eq!(s.begin_upload(None), None);
        assert_eq!(s.job.phase, JobPhase::Idle);
        assert!(s.form_error.is_some());
    }

    #[test]
    fn submit_with_empty_path_is_rejected() {
        let mut s = SessionState::default();
        assert_eq!(s.begin_process("   "), None);
        assert_eq!(s.job.phase, JobPhase::Idle);
        assert!(s.form_error.is_some());
    }

    #[test]
    fn accepted_submission_reaches_processing() {
        let mut s = SessionState::default();
        let id = s.begin_upload(Some(&PathBuf::from("/videos/a.mp4"))).unwrap();
        assert_eq!(s.job.phase, JobPhase::Submitting);
        assert_eq!(s.job.video_name, "a.mp4");

        s.submission_accepted(id, "a.mp4".into());
        assert_eq!(s.job.phase, JobPhase::Processing);
    }

    #[test]
    fn rejected_submission_fails_with_the_server_message() {
        let mut s = SessionState::default();
        let id = s.begin_process("/videos/a.mp4").unwrap();
        s.submission_rejected(id, "bad format".into());
        assert_eq!(s.job.phase, JobPhase::Failed);
        assert_eq!(s.job.error.as_deref(), Some("bad format"));
    }

    #[test]
    fn poll_progress_then_completion_loads_the_gallery() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());

        s.apply_status(id, &status(r#"{"is_processing": true, "progress": 40}"#));
        assert_eq!(s.job.phase, JobPhase::Processing);
        assert_eq!(s.job.progress, 40);

        s.apply_status(
            id,
            &status(r#"{"completed": true, "frames": ["f1.jpg", "f2.jpg"]}"#),
        );
        assert_eq!(s.job.phase, JobPhase::Completed);
        assert_eq!(s.job.progress, 100);
        assert_eq!(s.gallery.frame_count(), 2);
        assert_eq!(s.gallery.cursor(), None);
    }

    #[test]
    fn progress_never_decreases_while_processing() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());

        s.apply_status(id, &status(r#"{"is_processing": true, "progress": 40}"#));
        s.apply_status(id, &status(r#"{"is_processing": true, "progress": 25}"#));
        assert_eq!(s.job.progress, 40);

        s.apply_status(id, &status(r#"{"is_processing": true}"#));
        assert_eq!(s.job.progress, 40);
    }

    #[test]
    fn backend_error_fails_the_job_with_the_message_verbatim() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());

        s.apply_status(id, &status(r#"{"error": "ffmpeg exited with 1"}"#));
        assert_eq!(s.job.phase, JobPhase::Failed);
        assert_eq!(s.job.error.as_deref(), Some("ffmpeg exited with 1"));
    }

    #[test]
    fn stale_job_events_are_dropped_after_a_new_submit() {
        let mut s = SessionState::default();
        let first = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(first, "a.mp4".into());

        let second = s.begin_process("b.mp4").unwrap();
        assert_ne!(first, second);

        // Anything still in flight for the first job must not touch state.
        s.apply_status(first, &status(r#"{"completed": true, "frames": ["x.png"]}"#));
        assert_eq!(s.job.phase, JobPhase::Submitting);
        assert_eq!(s.gallery.frame_count(), 0);
    }

    #[test]
    fn terminal_phases_do_not_resurrect() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());
        s.apply_status(id, &status(r#"{"error": "boom"}"#));
        assert_eq!(s.job.phase, JobPhase::Failed);

        // Late events for the same id bounce off the terminal phase.
        s.apply_status(id, &status(r#"{"completed": true}"#));
        assert_eq!(s.job.phase, JobPhase::Failed);
        s.submission_accepted(id, "a.mp4".into());
        assert_eq!(s.job.phase, JobPhase::Failed);
    }

    #[test]
    fn error_is_set_iff_failed() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());
        assert!(s.job.error.is_none());

        s.apply_status(id, &status(r#"{"completed": true, "frames": []}"#));
        assert_eq!(s.job.phase, JobPhase::Completed);
        assert!(s.job.error.is_none());
    }

    #[test]
    fn new_submit_replaces_the_gallery_wholesale() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());
        s.apply_status(id, &status(r#"{"completed": true, "frames": ["f1.png"]}"#));
        assert_eq!(s.gallery.frame_count(), 1);

        s.begin_process("b.mp4").unwrap();
        assert!(s.gallery.is_empty());
        assert_eq!(s.gallery.selected_count(), 0);
    }

    #[test]
    fn clear_job_resets_only_terminal_jobs() {
        let mut s = SessionState::default();
        let id = s.begin_process("a.mp4").unwrap();
        s.submission_accepted(id, "a.mp4".into());

        s.clear_job();
        assert_eq!(s.job.phase, JobPhase::Processing);

        s.apply_status(id, &status(r#"{"error": "boom"}"#));
        s.clear_job();
        assert_eq!(s.job.phase, JobPhase::Idle);
        assert!(s.job.error.is_none());
    }

    #[test]
    fn config_fields_override_defaults_only_when_present() {
        let mut s = SessionState::default();
        let config: ServerConfig =
            serde_json::from_str(r#"{"quality": 5, "supported_formats": [".mp4"]}"#)
                .unwrap();
        s.apply_config(&config);
        assert_eq!(s.options.quality, 5);
        assert_eq!(s.options.output_format, "png"); // default kept
        assert_eq!(s.supported_formats, vec![".mp4".to_string()]);
    }

    #[test]
    fn listing_prefers_the_current_video_stem() {
        let mut s = SessionState::default();
        let videos: Vec<VideoFrames> = serde_json::from_str(
            r#"[{"video_name": "first", "frames": ["first/f.png"], "frame_count": 1},
                {"video_name": "second", "frames": ["second/f.png", "second/g.png"], "frame_count": 2}]"#,
        )
        .unwrap();
        s.apply_listing(videos, Some("second.mp4"));
        assert_eq!(s.gallery.frame_set().unwrap().video_name, "second");
        assert_eq!(s.gallery.frame_count(), 2);
        assert_eq!(s.listing.len(), 2);

        s.show_video("first");
        assert_eq!(s.gallery.frame_count(), 1);
    }
}
