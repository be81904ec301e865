// crates/framedeck-ui/src/helpers/format.rs
//
// UI-layer string utilities that don't belong in framedeck-core.
//
// Elapsed-time formatting lives in framedeck_core::helpers::time — use that
// for anything involving seconds. This module holds utilities that are
// purely about rendering strings in the UI and have no meaning outside of
// a display context.

/// Render a metadata key for the status table: underscores become spaces.
///
/// The backend reports keys like `speaker_name` and `language_full`; the
/// table shows them as `speaker name` / `language full`.
pub fn prettify_key(key: &str) -> String {
    key.replace('_', " ")
}

/// Megabyte progress label for the zip download banner:
/// `"12.3 / 45 MB"`, or `"12.3 MB"` when the server sent no content-length.
pub fn mb_label(received: u64, total: Option<u64>) -> String {
    let mb = |b: u64| b as f64 / 1_000_000.0;
    match total {
        Some(total) => format!("{:.1} / {:.0} MB", mb(received), mb(total)),
        None => format!("{:.1} MB", mb(received)),
    }
}

/// Truncate `s` to at most `max` bytes without splitting a codepoint.
///
/// Used by the gallery cards and the lightbox title to keep video names
/// from overflowing their fixed-width slots. `max` is a byte count; for
/// ASCII names the two are equivalent.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    s.char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .map(|i| &s[..i])
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_with_spaces() {
        assert_eq!(prettify_key("speaker_name"), "speaker name");
        assert_eq!(prettify_key("plain"), "plain");
    }

    #[test]
    fn mb_label_with_and_without_total() {
        assert_eq!(mb_label(12_300_000, Some(45_000_000)), "12.3 / 45 MB");
        assert_eq!(mb_label(12_300_000, None), "12.3 MB");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello");
    }

    #[test]
    fn truncate_never_splits_a_codepoint() {
        let t = truncate("élan", 1);
        assert!(std::str::from_utf8(t.as_bytes()).is_ok());
    }
}
