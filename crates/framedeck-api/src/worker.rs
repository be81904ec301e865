// crates/framedeck-api/src/worker.rs
//
// ApiWorker: owns every background thread that talks to the backend.
// All public API that framedeck-ui calls lives here.
//
// Threading model: each operation spawns a short-lived thread; results come
// back on one bounded channel of ApiEvent, drained by the UI once per frame.
// The poll loop is the only long-lived thread, and at most one is live at a
// time — arming a new submission flips the previous loop's cancel flag
// before the new loop exists, so two pollers never interleave.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use framedeck_core::api_types::{ApiEvent, StatusReport};
use framedeck_core::helpers::frame_path::file_name;
use framedeck_core::state::ExtractionOptions;

use crate::client::{DownloadTarget, FrameServer};

/// Fixed delay between successive /status checks. Deliberately not a
/// backoff: the job is short-lived and local, and a missed tick costs a
/// second, not a retry storm.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Max frame fetches in flight at once. A completed job can hand the
/// gallery hundreds of paths; without a cap they would all open sockets in
/// the same frame.
const FETCH_CONCURRENCY: u32 = 4;

/// Min interval between DownloadProgress events while a zip streams.
const PROGRESS_EVERY: Duration = Duration::from_millis(250);

pub struct ApiWorker {
    /// Shared result channel: submissions, status, listings, frame images,
    /// download progress.
    pub rx: Receiver<ApiEvent>,
    tx: Sender<ApiEvent>,

    server: Arc<FrameServer>,

    /// Cancel flag of the active poll loop. Each submission takes the old
    /// flag out and flips it, then installs its own — the invariant is
    /// "old loop cancelled before new loop armed".
    poll_cancel: Mutex<Option<Arc<AtomicBool>>>,

    /// Limits concurrent frame fetch threads: (active_count, Condvar).
    fetch_sem: Arc<(Mutex<u32>, Condvar)>,

    shutdown: Arc<AtomicBool>,
}

impl ApiWorker {
    pub fn new(base_url: impl Into<String>) -> Self {
        let (tx, rx) = bounded(512);
        Self {
            rx,
            tx,
            server: Arc::new(FrameServer::new(base_url)),
            poll_cancel: Mutex::new(None),
            fetch_sem: Arc::new((Mutex::new(0), Condvar::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn base_url(&self) -> &str {
        self.server.base()
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(flag) = self.poll_cancel.lock().unwrap().take() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Flip the previous poll loop's cancel flag and install a fresh one.
    /// Called synchronously from the UI thread on every submission, so the
    /// ordering guarantee does not depend on thread scheduling.
    fn arm_poll_cancel(&self) -> Arc<AtomicBool> {
        let mut slot = self.poll_cancel.lock().unwrap();
        if let Some(old) = slot.take() {
            old.store(true, Ordering::Relaxed);
        }
        let fresh = Arc::new(AtomicBool::new(false));
        *slot = Some(Arc::clone(&fresh));
        fresh
    }

    // ── Config ───────────────────────────────────────────────────────────────

    /// Fetch /config in the background. Failure is logged and swallowed —
    /// the UI keeps its built-in defaults.
    pub fn fetch_config(&self) {
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        thread::spawn(move || match server.fetch_config() {
            Ok(config) => {
                let _ = tx.send(ApiEvent::ConfigFetched(config));
            }
            Err(e) => eprintln!("[api] /config fetch failed, keeping defaults: {e}"),
        });
    }

    // ── Submission ───────────────────────────────────────────────────────────

    /// Upload a local file and, on acceptance, start polling for `job`.
    pub fn submit_upload(&self, job: Uuid, file: PathBuf, options: ExtractionOptions) {
        let cancel = self.arm_poll_cancel();
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        let shutdown = Arc::clone(&self.shutdown);
        thread::spawn(move || {
            let bytes = match std::fs::read(&file) {
                Ok(bytes) => bytes,
                Err(e) => {
                    let _ = tx.send(ApiEvent::SubmitRejected {
                        job,
                        message: format!("cannot read {}: {e}", file.display()),
                    });
                    return;
                }
            };
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "video".into());

            match server.upload_video(&filename, &bytes, &options) {
                Ok(ack) => {
                    let _ = tx.send(ApiEvent::SubmitAccepted { job, filename: ack.filename });
                    poll_loop(&server, &tx, job, &cancel, &shutdown);
                }
                Err(e) => {
                    let _ = tx.send(ApiEvent::SubmitRejected { job, message: e.to_string() });
                }
            }
        });
    }

    /// Submit a server-local path and, on acceptance, start polling.
    pub fn submit_process(&self, job: Uuid, path: String, options: ExtractionOptions) {
        let cancel = self.arm_poll_cancel();
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        let shutdown = Arc::clone(&self.shutdown);
        thread::spawn(move || match server.process_path(&path, &options) {
            Ok(ack) => {
                let _ = tx.send(ApiEvent::SubmitAccepted { job, filename: ack.filename });
                poll_loop(&server, &tx, job, &cancel, &shutdown);
            }
            Err(e) => {
                let _ = tx.send(ApiEvent::SubmitRejected { job, message: e.to_string() });
            }
        });
    }

    // ── Frames ───────────────────────────────────────────────────────────────

    /// Re-query the /frames listing. Failure is logged and the gallery
    /// keeps what it has.
    pub fn refresh_frames(&self) {
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        thread::spawn(move || match server.list_frames(None) {
            Ok(videos) => {
                let _ = tx.send(ApiEvent::FramesListed { videos });
            }
            Err(e) => eprintln!("[api] /frames refresh failed: {e}"),
        });
    }

    /// Fetch and decode one frame image for the thumbnail grid or lightbox.
    /// Gated by the fetch semaphore; a failed fetch is cosmetic and comes
    /// back as FrameImageFailed.
    pub fn fetch_frame(&self, path: String) {
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        let shutdown = Arc::clone(&self.shutdown);
        let sem = Arc::clone(&self.fetch_sem);
        thread::spawn(move || {
            {
                let (lock, cvar) = &*sem;
                let mut count = lock.lock().unwrap();
                while *count >= FETCH_CONCURRENCY {
                    count = cvar.wait(count).unwrap();
                }
                *count += 1;
            }
            // RAII release guard — decrements count and wakes next waiter on drop
            struct SemGuard(Arc<(Mutex<u32>, Condvar)>);
            impl Drop for SemGuard {
                fn drop(&mut self) {
                    let (lock, cvar) = &*self.0;
                    *lock.lock().unwrap() -= 1;
                    cvar.notify_one();
                }
            }
            let _guard = SemGuard(sem);

            if shutdown.load(Ordering::Relaxed) {
                return;
            }
            match fetch_and_decode(&server, &path) {
                Ok((width, height, rgba)) => {
                    let _ = tx.send(ApiEvent::FrameImage { path, width, height, rgba });
                }
                Err(e) => {
                    eprintln!("[api] frame {path}: {e}");
                    let _ = tx.send(ApiEvent::FrameImageFailed { path });
                }
            }
        });
    }

    /// Save one frame's bytes to a user-chosen local file.
    pub fn save_frame(&self, path: String, dest: PathBuf) {
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        thread::spawn(move || {
            let result = server
                .fetch_frame(&path)
                .and_then(|bytes| std::fs::write(&dest, bytes).map_err(Into::into));
            match result {
                Ok(()) => {
                    let _ = tx.send(ApiEvent::FrameSaved { dest });
                }
                Err(e) => {
                    let _ = tx.send(ApiEvent::DownloadFailed {
                        message: format!("saving {}: {e}", file_name(&path)),
                    });
                }
            }
        });
    }

    // ── Zip download ─────────────────────────────────────────────────────────

    /// Stream a zip of `target` to `dest`, emitting throttled progress.
    pub fn download_zip(&self, target: DownloadTarget, dest: PathBuf) {
        let tx = self.tx.clone();
        let server = Arc::clone(&self.server);
        thread::spawn(move || {
            let mut last_report: Option<Instant> = None;
            let result = server.download_zip(&target, &dest, |received, total| {
                if last_report.map_or(true, |t| t.elapsed() >= PROGRESS_EVERY) {
                    last_report = Some(Instant::now());
                    let _ = tx.send(ApiEvent::DownloadProgress { received, total });
                }
            });
            match result {
                Ok(()) => {
                    let _ = tx.send(ApiEvent::DownloadFinished { dest });
                }
                Err(e) => {
                    let _ = tx.send(ApiEvent::DownloadFailed { message: e.to_string() });
                }
            }
        });
    }
}

// ── Poll loop ────────────────────────────────────────────────────────────────

/// True when this report ends the job — an explicit backend error or the
/// completed flag. Transport failures never end it; they are retried on the
/// next tick.
fn poll_is_terminal(report: &StatusReport) -> bool {
    report.error.is_some() || report.completed
}

/// The polling loop for one job. Checks the status immediately, then once
/// per POLL_INTERVAL, until the report is terminal or the flag is flipped.
fn poll_loop(
    server: &FrameServer,
    tx: &Sender<ApiEvent>,
    job: Uuid,
    cancel: &AtomicBool,
    shutdown: &AtomicBool,
) {
    loop {
        if cancel.load(Ordering::Relaxed) || shutdown.load(Ordering::Relaxed) {
            return;
        }
        match server.poll_status() {
            Ok(report) => {
                let terminal = poll_is_terminal(&report);
                if tx.send(ApiEvent::Status { job, report }).is_err() || terminal {
                    return;
                }
            }
            // Swallowed on purpose: only a backend-reported error fails a
            // job, never a dropped connection between ticks.
            Err(e) => eprintln!("[api] status poll failed (will retry): {e}"),
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn fetch_and_decode(
    server: &FrameServer,
    path: &str,
) -> anyhow::Result<(u32, u32, Vec<u8>)> {
    let bytes = server.fetch_frame(path)?;
    let decoded = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok((width, height, decoded.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(json: &str) -> StatusReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn poll_continues_while_processing() {
        assert!(!poll_is_terminal(&report(
            r#"{"is_processing": true, "progress": 40}"#
        )));
        assert!(!poll_is_terminal(&report("{}")));
    }

    #[test]
    fn poll_stops_on_completed_or_error() {
        assert!(poll_is_terminal(&report(r#"{"completed": true}"#)));
        assert!(poll_is_terminal(&report(r#"{"error": "boom"}"#)));
    }

    #[test]
    fn arming_a_new_poll_cancels_the_previous_one() {
        let worker = ApiWorker::new("http://127.0.0.1:5000");
        let first = worker.arm_poll_cancel();
        assert!(!first.load(Ordering::Relaxed));

        let second = worker.arm_poll_cancel();
        assert!(first.load(Ordering::Relaxed), "old loop must be cancelled");
        assert!(!second.load(Ordering::Relaxed));
    }

    #[test]
    fn shutdown_cancels_the_active_poll() {
        let worker = ApiWorker::new("http://127.0.0.1:5000");
        let flag = worker.arm_poll_cancel();
        worker.shutdown();
        assert!(flag.load(Ordering::Relaxed));
    }
}
