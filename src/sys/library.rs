use std::fs;
use std::path::Path;

use crate::model::local::LocalTrack;

/// Collects the playable audio files in a folder, sorted the way the
/// player page lists them (by name, case-insensitive).
pub fn scan_audio_library(dir: &Path) -> Vec<LocalTrack> {
    let mut tracks = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let extension = path
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            if !LocalTrack::is_audio_extension(&extension) {
                continue;
            }
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            let size_bytes = path.metadata().map(|m| m.len()).unwrap_or(0);

            tracks.push(LocalTrack {
                name,
                path,
                size: format_size(size_bytes),
                extension,
            });
        }
    }

    tracks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    tracks
}

fn format_size(bytes: u64) -> String {
    let mb = bytes as f64 / 1024.0 / 1024.0;
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else {
        format!("{:.1} MB", mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("beluga-lib-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn scan_keeps_audio_and_sorts_by_name() {
        let dir = temp_dir("scan");
        fs::write(dir.join("Zebra.flac"), b"x").unwrap();
        fs::write(dir.join("alpha.mp3"), b"x").unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();
        fs::write(dir.join("clip.mp4"), b"x").unwrap();
        fs::create_dir_all(dir.join("inner.mp3")).unwrap();

        let tracks = scan_audio_library(&dir);
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha.mp3", "Zebra.flac"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_folder_scans_empty() {
        let dir = std::env::temp_dir().join("beluga-lib-definitely-absent");
        assert!(scan_audio_library(&dir).is_empty());
    }

    #[test]
    fn sizes_render_in_megabytes() {
        assert_eq!(format_size(0), "0.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }
}
