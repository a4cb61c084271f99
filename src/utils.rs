//! Utility functions

use std::path::PathBuf;

use directories::ProjectDirs;

/// Per-user directories of the application
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "lyricsync", "Lyricsync")
}

/// Directory holding settings and offsets
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Format milliseconds as `mm:ss.xxx`
pub fn format_timestamp(time_ms: i64) -> String {
    let sign = if time_ms < 0 { "-" } else { "" };
    let time = time_ms.unsigned_abs();
    let ms = time % 1000;
    let sec = (time / 1000) % 60;
    let min = time / 60_000;
    format!("{}{:02}:{:02}.{:03}", sign, min, sec, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00.000");
        assert_eq!(format_timestamp(1120), "00:01.120");
        assert_eq!(format_timestamp(3_725_004), "62:05.004");
        assert_eq!(format_timestamp(-250), "-00:00.250");
    }
}
