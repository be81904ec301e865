// crates/framedeck-api/src/client.rs
//
// FrameServer: the one place that talks HTTP to the extraction backend.
// Blocking ureq calls — every caller is an ApiWorker background thread,
// never the UI thread.
//
// The agent is configured so non-2xx responses come back as responses, not
// transport errors: /upload and /process put their reason in a 4xx body
// and we want that message, not a bare status code.

use std::io::{Read, Write};
use std::path::Path;

use ureq::Agent;

use framedeck_core::api_types::{ServerConfig, StatusReport, UploadAck, VideoFrames};
use framedeck_core::helpers::frame_path::{frame_url, normalize};
use framedeck_core::state::ExtractionOptions;

use crate::error::ApiError;
use crate::multipart::MultipartForm;

/// What a zip download should contain.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadTarget {
    /// Every frame of one extracted video.
    Video(String),
    /// An explicit frame list (the multi-select path).
    Frames(Vec<String>),
}

pub struct FrameServer {
    base: String,
    agent: Agent,
}

impl FrameServer {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        // No per-request timeout: a hung request just delays the next poll
        // tick, which is acceptable for a short-lived local job.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self { base, agent }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    // ── Config ───────────────────────────────────────────────────────────────

    pub fn fetch_config(&self) -> Result<ServerConfig, ApiError> {
        let mut res = self.agent.get(self.url("/config")).call()?;
        let text = res.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&text)?)
    }

    // ── Submission ───────────────────────────────────────────────────────────

    /// POST the video file and extraction options to /upload.
    pub fn upload_video(
        &self,
        filename: &str,
        bytes: &[u8],
        options: &ExtractionOptions,
    ) -> Result<UploadAck, ApiError> {
        let mut form = MultipartForm::new();
        append_options(&mut form, options);
        form.file("video", filename, "application/octet-stream", bytes);
        self.submit(self.url("/upload"), form)
    }

    /// POST a server-local video path and extraction options to /process.
    pub fn process_path(
        &self,
        video_path: &str,
        options: &ExtractionOptions,
    ) -> Result<UploadAck, ApiError> {
        let mut form = MultipartForm::new();
        form.text("video_path", video_path);
        append_options(&mut form, options);
        self.submit(self.url("/process"), form)
    }

    fn submit(&self, url: String, form: MultipartForm) -> Result<UploadAck, ApiError> {
        let content_type = form.content_type();
        let body = form.finish();
        let mut res = self
            .agent
            .post(&url)
            .header("Content-Type", &content_type)
            .send(&body[..])?;
        let status = res.status().as_u16();
        let text = res.body_mut().read_to_string()?;
        classify_submit(status, &text)
    }

    // ── Status / frames ──────────────────────────────────────────────────────

    pub fn poll_status(&self) -> Result<StatusReport, ApiError> {
        let mut res = self.agent.get(self.url("/status")).call()?;
        let text = res.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET /frames, optionally filtered to one video.
    pub fn list_frames(&self, video: Option<&str>) -> Result<Vec<VideoFrames>, ApiError> {
        let mut res = self.agent.get(frames_url(&self.base, video)).call()?;
        let status = res.status().as_u16();
        let text = res.body_mut().read_to_string()?;
        if let Some(message) = error_message(&text) {
            return Err(ApiError::rejected(message));
        }
        if !(200..300).contains(&status) {
            return Err(ApiError::rejected(format!("server returned {status}")));
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// GET the raw image bytes of one frame.
    pub fn fetch_frame(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let mut res = self.agent.get(frame_url(&self.base, path)).call()?;
        if !res.status().is_success() {
            return Err(ApiError::rejected(format!(
                "frame fetch returned {}",
                res.status().as_u16()
            )));
        }
        Ok(res.body_mut().read_to_vec()?)
    }

    // ── Zip download ─────────────────────────────────────────────────────────

    /// Stream /download_frames to `dest`, reporting (received, total) after
    /// each chunk. The browser original delegated this to download
    /// navigation; a desktop client owns the byte loop itself.
    pub fn download_zip(
        &self,
        target: &DownloadTarget,
        dest: &Path,
        mut progress: impl FnMut(u64, Option<u64>),
    ) -> Result<(), ApiError> {
        let res = self.agent.get(zip_url(&self.base, target)).call()?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let text = res.into_body().read_to_string().unwrap_or_default();
            let message = error_message(&text)
                .unwrap_or_else(|| format!("server returned {status}"));
            return Err(ApiError::rejected(message));
        }

        let total = res
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        let mut file = std::fs::File::create(dest)?;
        let mut body = res.into_body();
        let mut reader = body.as_reader();
        let mut buf = [0u8; 65536];
        let mut received = 0u64;
        loop {
            let n = reader.read(&mut buf).map_err(ApiError::Io)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            received += n as u64;
            progress(received, total);
        }
        Ok(())
    }
}

fn append_options(form: &mut MultipartForm, options: &ExtractionOptions) {
    form.text("output_root", &options.output_root);
    form.text("quality", &options.quality.to_string());
    form.text("output_format", &options.output_format);
}

// ── URL builders ─────────────────────────────────────────────────────────────

/// /frames listing URL, with the optional video_path filter.
pub fn frames_url(base: &str, video: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match video {
        Some(video) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("video_path", video)
                .finish();
            format!("{base}/frames?{query}")
        }
        None => format!("{base}/frames"),
    }
}

/// /download_frames URL for either a whole video or an explicit frame list
/// (JSON-encoded, paths normalized the same way the image URLs are).
pub fn zip_url(base: &str, target: &DownloadTarget) -> String {
    let base = base.trim_end_matches('/');
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    match target {
        DownloadTarget::Video(video) => {
            query.append_pair("video_path", video);
        }
        DownloadTarget::Frames(frames) => {
            let frames: Vec<&str> = frames.iter().map(|f| normalize(f)).collect();
            // serde_json never fails on Vec<&str>
            query.append_pair("frames", &serde_json::to_string(&frames).unwrap());
        }
    }
    format!("{base}/download_frames?{}", query.finish())
}

// ── Response classification ──────────────────────────────────────────────────

/// The `error` field of a JSON body, if there is one.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

/// Normalize an /upload or /process response. A non-2xx status and an
/// `{error}` body are the same condition from the client's point of view:
/// the submission was rejected and the job must fail with that message.
fn classify_submit(status: u16, body: &str) -> Result<UploadAck, ApiError> {
    if let Some(message) = error_message(body) {
        return Err(ApiError::rejected(message));
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::rejected(format!("server returned {status}")));
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_upload_parses_the_ack() {
        let ack = classify_submit(
            200,
            r#"{"filename": "a.mp4", "message": "Video uploaded and processing started",
                "status_endpoint": "/status"}"#,
        )
        .unwrap();
        assert_eq!(ack.filename, "a.mp4");
        assert_eq!(ack.status_endpoint.as_deref(), Some("/status"));
    }

    #[test]
    fn error_body_rejects_even_on_2xx() {
        let err = classify_submit(200, r#"{"error": "bad format"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { message } if message == "bad format"));
    }

    #[test]
    fn busy_server_409_surfaces_its_message() {
        let err = classify_submit(
            409,
            r#"{"error": "Processing is already in progress"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Processing is already in progress");
    }

    #[test]
    fn non_2xx_without_json_body_reports_the_status() {
        let err = classify_submit(500, "<html>Internal Server Error</html>").unwrap_err();
        assert_eq!(err.to_string(), "server returned 500");
    }

    #[test]
    fn garbage_2xx_body_is_bad_body_not_rejected() {
        let err = classify_submit(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::BadBody(_)));
    }

    #[test]
    fn frames_url_filters_and_encodes() {
        assert_eq!(frames_url("http://host", None), "http://host/frames");
        assert_eq!(
            frames_url("http://host/", Some("my clip.mp4")),
            "http://host/frames?video_path=my+clip.mp4",
        );
    }

    #[test]
    fn zip_url_for_a_whole_video() {
        assert_eq!(
            zip_url("http://host", &DownloadTarget::Video("a.mp4".into())),
            "http://host/download_frames?video_path=a.mp4",
        );
    }

    #[test]
    fn zip_url_for_a_frame_list_normalizes_and_json_encodes() {
        let url = zip_url(
            "http://host",
            &DownloadTarget::Frames(vec!["/clip/f1.png".into(), "clip/f2.png".into()]),
        );
        let (_, query) = url.split_once("?frames=").unwrap();
        let decoded: String = url::form_urlencoded::parse(
            format!("frames={query}").as_bytes(),
        )
        .find(|(k, _)| k == "frames")
        .map(|(_, v)| v.into_owned())
        .unwrap();
        let frames: Vec<String> = serde_json::from_str(&decoded).unwrap();
        assert_eq!(frames, vec!["clip/f1.png", "clip/f2.png"]);
    }
}
