// crates/framedeck-core/src/gallery.rs
//
// Gallery model: the ordered frame list for one extracted video, the
// lightbox cursor into it, and the multi-select set for zip downloads.
//
// Ownership rules:
//   - the cursor and selection are valid only against the current FrameSet;
//     load() replaces the set wholesale and resets both
//   - navigation clamps at the bounds — never wraps, never errors

use std::collections::BTreeSet;

/// The extracted frames of one completed job. Immutable once loaded;
/// a new job replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet {
    pub video_name: String,
    /// Server-relative frame paths, in extraction order.
    pub frames: Vec<String>,
}

impl FrameSet {
    pub fn new(video_name: impl Into<String>, frames: Vec<String>) -> Self {
        Self { video_name: video_name.into(), frames }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    frame_set: Option<FrameSet>,
    /// Lightbox cursor. Some(i) means the preview is open on frame i;
    /// invariant: i < frame_count whenever Some.
    cursor: Option<usize>,
    /// Frame paths marked for a selective zip download.
    /// Always a subset of the current FrameSet's paths.
    selection: BTreeSet<String>,
}

impl Gallery {
    /// Replace the current FrameSet. Cursor and selection are cleared —
    /// both index into the old set and would be meaningless against the new.
    pub fn load(&mut self, frame_set: FrameSet) {
        self.frame_set = Some(frame_set);
        self.cursor = None;
        self.selection.clear();
    }

    /// Drop everything, as when a fresh job begins.
    pub fn clear(&mut self) {
        self.frame_set = None;
        self.cursor = None;
        self.selection.clear();
    }

    pub fn frame_set(&self) -> Option<&FrameSet> {
        self.frame_set.as_ref()
    }

    pub fn frames(&self) -> &[String] {
        self.frame_set.as_ref().map(|s| s.frames.as_slice()).unwrap_or(&[])
    }

    pub fn frame_count(&self) -> usize {
        self.frames().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    // ── Lightbox cursor ──────────────────────────────────────────────────────

    /// Open the preview on frame `index`. Out-of-bounds requests are ignored.
    pub fn open_preview(&mut self, index: usize) {
        if index < self.frame_count() {
            self.cursor = Some(index);
        }
    }

    pub fn close_preview(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Path of the frame under the cursor, if the preview is open.
    pub fn current_frame(&self) -> Option<&str> {
        self.cursor.and_then(|i| self.frames().get(i)).map(String::as_str)
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.frame_count())
    }

    /// Advance the cursor. No-op at the last frame.
    pub fn next(&mut self) {
        if self.has_next() {
            self.cursor = self.cursor.map(|i| i + 1);
        }
    }

    /// Step the cursor back. No-op at frame 0.
    pub fn previous(&mut self) {
        if self.has_previous() {
            self.cursor = self.cursor.map(|i| i - 1);
        }
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Toggle one frame in the selection. Paths outside the current
    /// FrameSet are ignored so the subset invariant holds.
    pub fn toggle_select(&mut self, path: &str) {
        if !self.frames().iter().any(|f| f == path) {
            return;
        }
        if !self.selection.remove(path) {
            self.selection.insert(path.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.frames().iter().cloned().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selection.contains(path)
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery_with(n: usize) -> Gallery {
        let frames = (1..=n).map(|i| format!("clip/frame_{i:04}.png")).collect();
        let mut g = Gallery::default();
        g.load(FrameSet::new("clip", frames));
        g
    }

    #[test]
    fn load_replaces_wholesale_and_resets_cursor_and_selection() {
        let mut g = gallery_with(3);
        g.open_preview(2);
        g.toggle_select("clip/frame_0001.png");

        g.load(FrameSet::new("other", vec!["other/frame_0001.png".into()]));

        assert_eq!(g.frame_count(), 1);
        assert_eq!(g.cursor(), None);
        assert_eq!(g.selected_count(), 0);
    }

    #[test]
    fn open_preview_rejects_out_of_bounds() {
        let mut g = gallery_with(2);
        g.open_preview(2);
        assert_eq!(g.cursor(), None);
        g.open_preview(1);
        assert_eq!(g.cursor(), Some(1));
    }

    #[test]
    fn next_clamps_at_last_frame() {
        let mut g = gallery_with(4);
        g.open_preview(1);
        // frame_count - 1 - i steps reach the end ...
        g.next();
        g.next();
        assert_eq!(g.cursor(), Some(3));
        // ... and further calls are no-ops.
        g.next();
        g.next();
        assert_eq!(g.cursor(), Some(3));
        assert!(!g.has_next());
    }

    #[test]
    fn previous_at_zero_is_noop() {
        let mut g = gallery_with(3);
        g.open_preview(0);
        g.previous();
        assert_eq!(g.cursor(), Some(0));
        assert!(!g.has_previous());
    }

    #[test]
    fn navigation_without_open_preview_is_noop() {
        let mut g = gallery_with(3);
        g.next();
        g.previous();
        assert_eq!(g.cursor(), None);
    }

    #[test]
    fn select_all_then_deselect_all() {
        let mut g = gallery_with(5);
        g.select_all();
        assert_eq!(g.selected_count(), 5);
        g.deselect_all();
        assert_eq!(g.selected_count(), 0);
    }

    #[test]
    fn toggle_select_is_a_toggle_and_ignores_unknown_paths() {
        let mut g = gallery_with(2);
        g.toggle_select("clip/frame_0001.png");
        assert!(g.is_selected("clip/frame_0001.png"));
        g.toggle_select("clip/frame_0001.png");
        assert!(!g.is_selected("clip/frame_0001.png"));

        g.toggle_select("not/in/the/set.png");
        assert_eq!(g.selected_count(), 0);
    }

    #[test]
    fn current_frame_follows_cursor() {
        let mut g = gallery_with(2);
        assert_eq!(g.current_frame(), None);
        g.open_preview(1);
        assert_eq!(g.current_frame(), Some("clip/frame_0002.png"));
    }
}
