// crates/framedeck-core/src/helpers/time.rs
//
// Shared elapsed-time formatting used by framedeck-ui.
// Canonical source for the minutes/seconds split shown in the status panel.

/// Decompose whole seconds into (minutes, seconds).
///
/// ```
/// use framedeck_core::helpers::time::elapsed_parts;
/// assert_eq!(elapsed_parts(0),   (0, 0));
/// assert_eq!(elapsed_parts(59),  (0, 59));
/// assert_eq!(elapsed_parts(207), (3, 27));
/// ```
pub fn elapsed_parts(secs: u64) -> (u64, u64) {
    (secs / 60, secs % 60)
}

/// Format elapsed seconds as `"3m 27s"` for the processing-time label.
///
/// ```
/// use framedeck_core::helpers::time::format_elapsed;
/// assert_eq!(format_elapsed(0),   "0m 0s");
/// assert_eq!(format_elapsed(207), "3m 27s");
/// ```
pub fn format_elapsed(secs: u64) -> String {
    let (m, s) = elapsed_parts(secs);
    format!("{m}m {s}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_at_a_full_minute() {
        assert_eq!(elapsed_parts(60), (1, 0));
        assert_eq!(format_elapsed(60), "1m 0s");
    }

    #[test]
    fn long_jobs_keep_counting_minutes() {
        assert_eq!(format_elapsed(3_725), "62m 5s");
    }
}
