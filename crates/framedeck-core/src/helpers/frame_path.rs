// crates/framedeck-core/src/helpers/frame_path.rs
//
// Frame path → URL composition, shared by the HTTP adapter and the UI.
//
// The backend is inconsistent about leading separators: /status may report
// "clip/frame_0001.png" while an older handler reports
// "/clip/frame_0001.png". Both must resolve to the same /frames/ URL, so
// every path→URL site goes through normalize() — there is no second place
// where this decision is made.

/// Strip a single leading `/` from a server-relative frame path.
///
/// Idempotent: applying it twice changes nothing.
///
/// ```
/// use framedeck_core::helpers::frame_path::normalize;
/// assert_eq!(normalize("clip/frame_0001.png"),  "clip/frame_0001.png");
/// assert_eq!(normalize("/clip/frame_0001.png"), "clip/frame_0001.png");
/// assert_eq!(normalize(normalize("/a/b")), normalize("/a/b"));
/// ```
pub fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Compose the image URL for a frame path against the server base URL.
///
/// ```
/// use framedeck_core::helpers::frame_path::frame_url;
/// assert_eq!(
///     frame_url("http://127.0.0.1:5000", "/clip/frame_0001.png"),
///     "http://127.0.0.1:5000/frames/clip/frame_0001.png",
/// );
/// ```
pub fn frame_url(base: &str, path: &str) -> String {
    format!("{}/frames/{}", base.trim_end_matches('/'), normalize(path))
}

/// Bare filename of a frame path — the default name for single-frame saves.
pub fn file_name(path: &str) -> &str {
    normalize(path).rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_exactly_one_leading_separator() {
        assert_eq!(normalize("a/b"), "a/b");
        assert_eq!(normalize("/a/b"), "a/b");
        // A double separator is the server's problem; we strip one.
        assert_eq!(normalize("//a/b"), "/a/b");
    }

    #[test]
    fn normalize_is_idempotent() {
        for p in ["a/b", "/a/b", "", "/"] {
            assert_eq!(normalize(normalize(p)), normalize(p));
        }
    }

    #[test]
    fn slashed_and_unslashed_paths_agree() {
        assert_eq!(normalize("/a/b"), normalize("a/b"));
        assert_eq!(
            frame_url("http://host", "/a/b.png"),
            frame_url("http://host", "a/b.png"),
        );
    }

    #[test]
    fn frame_url_tolerates_trailing_base_slash() {
        assert_eq!(
            frame_url("http://host/", "a/b.png"),
            "http://host/frames/a/b.png",
        );
    }

    #[test]
    fn file_name_takes_the_last_component() {
        assert_eq!(file_name("clip/frame_0001.png"), "frame_0001.png");
        assert_eq!(file_name("/clip/frame_0001.png"), "frame_0001.png");
        assert_eq!(file_name("frame.png"), "frame.png");
    }
}
