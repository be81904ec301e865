// crates/framedeck-core/src/commands.rs
//
// Every user action in FrameDeck is expressed as a ClientCommand.
// Modules emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use std::path::PathBuf;

use crate::state::ExtractionOptions;

#[derive(Debug, Clone)]
pub enum ClientCommand {
    // ── Submission ───────────────────────────────────────────────────────────
    /// Submit the chosen local file for upload. None means the user hit
    /// Extract without picking one — validation happens in the state layer
    /// so the no-file case never reaches the network.
    SubmitUpload { file: Option<PathBuf> },
    /// Submit a path that exists on the server's filesystem.
    SubmitServerPath { path: String },
    /// Dismiss a Completed/Failed banner and return the form to Idle.
    ClearJobStatus,

    // ── Gallery ──────────────────────────────────────────────────────────────
    /// Re-query /frames and rebuild the gallery, independent of any job.
    RefreshFrames,
    /// Switch the gallery to another video from the last /frames listing.
    ShowVideo(String),
    OpenPreview(usize),
    NextFrame,
    PreviousFrame,
    ClosePreview,
    ToggleSelect(String),
    SelectAll,
    DeselectAll,

    // ── Downloads ────────────────────────────────────────────────────────────
    /// Zip and save every frame of the current video. app.rs opens the
    /// save dialog and hands the destination to the worker.
    DownloadAllFrames,
    /// Zip and save only the selected frames.
    DownloadSelected,
    /// Save the frame currently open in the lightbox to a local file.
    SaveCurrentFrame,
    DismissDownload,
    /// Clear the "saved" confirmation toast.
    ClearSaveStatus,

    // ── Options ──────────────────────────────────────────────────────────────
    /// Replace the extraction option values with the form's current edits.
    SetOptions(ExtractionOptions),
}
