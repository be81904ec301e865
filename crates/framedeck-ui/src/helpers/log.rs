// crates/framedeck-ui/src/helpers/log.rs
//
// Unified logging for the UI crate.
//
// In release builds with `windows_subsystem = "windows"` (double-click
// launch), there is no console attached, so `eprintln!` output is silently
// discarded. Log calls go to a temp file as well so they're visible
// regardless of launch mode.
//
// File: %TEMP%\framedeck.log — append-only, created on first write per session.
//
// Usage:
//   framedeck_log!("[app] zip saved → {}", dest.display());

use std::io::Write;

/// Write `msg` to stderr and the FrameDeck log file in the OS temp directory.
/// Never panics — file failures are silently ignored.
pub fn flog(msg: &str) {
    eprintln!("{msg}");
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("framedeck.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}

/// Convenience macro — formats like `eprintln!` but routes through `flog`.
#[macro_export]
macro_rules! framedeck_log {
    ($($arg:tt)*) => {
        $crate::helpers::log::flog(&format!($($arg)*))
    };
}
