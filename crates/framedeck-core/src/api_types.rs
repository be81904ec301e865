// crates/framedeck-core/src/api_types.rs
//
// Types that flow across the channel between framedeck-api and framedeck-ui,
// plus the wire DTOs the backend serves. No egui, no ureq — just plain data.
//
// The backend makes no promise about which fields appear in a given /status
// response, so every DTO field is defaulted: any subset parses.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use uuid::Uuid;

/// Response body of `GET /config`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub output_root: Option<String>,
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default)]
    pub output_format: Option<String>,
    /// Server-side upload cap in megabytes.
    #[serde(default)]
    pub max_upload_size: Option<u64>,
    #[serde(default)]
    pub supported_formats: Vec<String>,
}

/// Success body of `POST /upload` and `POST /process`.
/// Error bodies (`{"error": ...}`) are classified before parsing reaches here.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadAck {
    pub filename: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status_endpoint: Option<String>,
}

/// One `GET /status` response. Polled once per second while a job runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReport {
    #[serde(default)]
    pub is_processing: bool,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub current_video: Option<String>,
    #[serde(default)]
    pub elapsed_seconds: Option<u64>,
    #[serde(default)]
    pub completed: bool,
    /// Set by the backend when extraction failed. This is the only signal
    /// that fails a job — transport errors during polling never do.
    #[serde(default)]
    pub error: Option<String>,
    /// Server-relative frame paths, present once extraction finished.
    #[serde(default)]
    pub frames: Option<Vec<String>>,
    #[serde(default)]
    pub frame_count: Option<usize>,
    /// Parsed video metadata (speaker, language, emotion, ...). Keys use
    /// underscores; the status panel prettifies them for display.
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// One element of the `GET /frames` listing (one extracted video).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoFrames {
    #[serde(default)]
    pub video_name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sample_frame: Option<String>,
    #[serde(default)]
    pub frame_count: usize,
    #[serde(default)]
    pub frames: Vec<String>,
}

/// Results sent from the ApiWorker background threads to the UI.
///
/// Job-scoped variants carry the Uuid of the Job they belong to; the ingest
/// step drops events whose id no longer matches the current Job, so a
/// superseded submission can never mutate its successor's state.
pub enum ApiEvent {
    ConfigFetched(ServerConfig),
    SubmitAccepted { job: Uuid, filename: String },
    SubmitRejected { job: Uuid, message: String },
    Status { job: Uuid, report: StatusReport },
    FramesListed { videos: Vec<VideoFrames> },
    /// A fetched and decoded frame image, ready for texture upload.
    FrameImage { path: String, width: u32, height: u32, rgba: Vec<u8> },
    /// Fetch or decode failed for one frame — cosmetic, the card shows a
    /// placeholder and nothing else changes.
    FrameImageFailed { path: String },
    /// A single frame was written to a user-chosen local file.
    FrameSaved { dest: PathBuf },
    DownloadProgress { received: u64, total: Option<u64> },
    DownloadFinished { dest: PathBuf },
    DownloadFailed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_with_every_field_absent() {
        let report: StatusReport = serde_json::from_str("{}").unwrap();
        assert!(!report.is_processing);
        assert!(!report.completed);
        assert_eq!(report.progress, 0);
        assert!(report.error.is_none());
        assert!(report.frames.is_none());
        assert!(report.metadata.is_none());
    }

    #[test]
    fn status_parses_mid_processing_shape() {
        let report: StatusReport = serde_json::from_str(
            r#"{"is_processing": true, "progress": 40, "current_video": "a.mp4",
                "elapsed_seconds": 7, "completed": false, "error": null}"#,
        )
        .unwrap();
        assert!(report.is_processing);
        assert_eq!(report.progress, 40);
        assert_eq!(report.current_video.as_deref(), Some("a.mp4"));
        assert_eq!(report.elapsed_seconds, Some(7));
    }

    #[test]
    fn status_parses_completed_shape_with_metadata() {
        let report: StatusReport = serde_json::from_str(
            r#"{"completed": true, "progress": 100,
                "frames": ["clip/frame_0001.png", "clip/frame_0002.png"],
                "frame_count": 2,
                "metadata": {"speaker_name": "Speaker One", "language_full": "English"}}"#,
        )
        .unwrap();
        assert!(report.completed);
        assert_eq!(report.frames.as_ref().unwrap().len(), 2);
        let meta = report.metadata.unwrap();
        assert_eq!(meta.get("speaker_name").unwrap(), "Speaker One");
    }

    #[test]
    fn frames_listing_parses() {
        let videos: Vec<VideoFrames> = serde_json::from_str(
            r#"[{"video_name": "clip", "path": "clip", "frame_count": 1,
                 "frames": ["clip/frame_0001.png"]}]"#,
        )
        .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_name, "clip");
        assert_eq!(videos[0].frames.len(), 1);
    }

    #[test]
    fn config_keeps_missing_fields_as_none() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"quality": 2}"#).unwrap();
        assert_eq!(config.quality, Some(2));
        assert!(config.output_root.is_none());
        assert!(config.supported_formats.is_empty());
    }
}
