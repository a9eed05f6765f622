use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Child;

use crate::model::download::{DownloadRequest, Quality};

pub const DEFAULT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Hosts that throttle aggressively enough to warrant extra retries.
const RATE_LIMITED_HOSTS: &[&str] = &["x.com/", "twitter.com/"];

/// Turns the user's filename template into the one handed to yt-dlp.
///
/// Templates containing `%(...)s` placeholders pass through untouched
/// (apart from gaining an extension placeholder if missing). A literal
/// name is de-duplicated against the destination folder: `clip` becomes
/// `clip_1` if `clip.*` already exists, `clip_2` after `clip_1`, and so
/// on past the highest suffix found. The derived base name is returned
/// so the finished file can be located later.
///
/// The folder scan and the eventual file creation are not atomic; two
/// jobs prepared back to back can derive the same name.
pub fn build_filename_template(
    destination_folder: &Path,
    requested: &str,
) -> (String, Option<String>) {
    let requested = requested.trim();
    let mut template = if requested.is_empty() {
        DEFAULT_TEMPLATE.to_string()
    } else {
        requested.to_string()
    };
    let mut derived_base = None;

    if !template.contains("%(") {
        let base = Path::new(&template)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let base = if base.is_empty() {
            "video".to_string()
        } else {
            base
        };

        let suffix = next_suffix(destination_folder, &base);
        let named = format!("{}{}", base, suffix);
        template = format!("{}.%(ext)s", named);
        derived_base = Some(named);
    }

    if !template.contains("%(ext)") {
        template = format!("{}.%(ext)s", template);
    }

    (template, derived_base)
}

/// Scans for `base` and `base_<N>` stems and picks the next free suffix:
/// empty when nothing matches, `_1` when only the bare name exists,
/// otherwise one past the highest `N` seen.
fn next_suffix(folder: &Path, base: &str) -> String {
    let mut bare_exists = false;
    let mut max_n: Option<u32> = None;

    if let Ok(entries) = std::fs::read_dir(folder) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if stem == base {
                bare_exists = true;
            } else if let Some(rest) = stem.strip_prefix(base).and_then(|r| r.strip_prefix('_')) {
                if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(n) = rest.parse::<u32>() {
                        max_n = Some(max_n.map_or(n, |m| m.max(n)));
                    }
                }
            }
        }
    }

    match (bare_exists, max_n) {
        (false, None) => String::new(),
        (true, None) => "_1".to_string(),
        (_, Some(n)) => format!("_{}", n + 1),
    }
}

/// Builds the complete yt-dlp argument vector for one request, plus the
/// derived base name when the template was a literal.
///
/// Pure apart from the directory probe inside the template step; nothing
/// here fails, the arguments are handed to the spawn as-is.
pub fn build_arguments(request: &DownloadRequest) -> (Vec<String>, Option<String>) {
    let (template, derived_base) =
        build_filename_template(&request.destination_folder, &request.filename_template);
    let output_template = request.destination_folder.join(&template);

    let mut args = vec![
        "--newline".to_string(),
        "-o".to_string(),
        output_template.to_string_lossy().to_string(),
    ];

    let format_override = request.format_override.trim();
    if !format_override.is_empty() {
        args.push("-f".to_string());
        args.push(format_override.to_string());
    } else if request.audio_only {
        args.push("-f".to_string());
        args.push("ba/b".to_string());
    } else {
        let mut fmt = "bv*+ba/b".to_string();
        if request.quality == Quality::Worst {
            fmt = "bv*+ba/b[quality=lowest]".to_string();
        }
        if let Some(height) = request.resolution_cap.height() {
            fmt = format!("{}[height<={}]", fmt, height);
        }
        if let Some(tag) = request.codec_preference.vcodec_tag() {
            fmt = format!("{}[vcodec*={}]", fmt, tag);
        }
        args.push("-f".to_string());
        args.push(fmt);
    }

    if request.audio_only {
        args.push("--extract-audio".to_string());
        args.push("--audio-format".to_string());
        args.push(request.container.clone());
    } else {
        args.push("--merge-output-format".to_string());
        args.push(request.container.clone());
    }

    if request.is_playlist() {
        if let Some(limit) = request.playlist_limit {
            if limit > 0 {
                args.push("--playlist-end".to_string());
                args.push(limit.to_string());
            }
        }
    }

    if RATE_LIMITED_HOSTS.iter().any(|h| request.url.contains(h)) {
        for flag in [
            "--socket-timeout",
            "30",
            "--retries",
            "10",
            "--fragment-retries",
            "10",
            "--ignore-errors",
        ] {
            args.push(flag.to_string());
        }
    }

    args.push(request.url.clone());
    (args, derived_base)
}

/// Spawns yt-dlp with piped stdout/stderr. The destination folder is
/// created first so `-o` has somewhere to write.
pub async fn start_download(request: &DownloadRequest, args: &[String]) -> Result<Child> {
    if let Err(e) = tokio::fs::create_dir_all(&request.destination_folder).await {
        anyhow::bail!("Failed to create download dir: {}", e);
    }

    let mut cmd = tokio::process::Command::new("yt-dlp");
    cmd.args(args);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    log::info!("Starting download: {}", request.url);
    log::debug!("Download command: {:?}", cmd);

    let child = cmd.spawn().map_err(|e| {
        log::error!("Failed to spawn yt-dlp: {}", e);
        e
    })?;
    Ok(child)
}

/// Locates the file a finished job produced, for the preview pane.
///
/// When a literal base name was derived, only `<base>.mp4` counts; if it
/// is not there (different container, playlist output) there is nothing
/// to preview. Template downloads fall back to the newest `.mp4` in the
/// folder by modification time.
pub fn find_output_file(folder: &Path, derived_base: Option<&str>) -> Option<PathBuf> {
    if let Some(base) = derived_base {
        let candidate = folder.join(format!("{}.mp4", base));
        return candidate.exists().then_some(candidate);
    }

    let entries = std::fs::read_dir(folder).ok()?;
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_mp4 = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false);
        if !is_mp4 {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        match &newest {
            Some((best, _)) if *best >= modified => {}
            _ => newest = Some((modified, path)),
        }
    }
    newest.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::download::{CodecPreference, Quality, ResolutionCap};
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "beluga-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn request(url: &str, folder: &Path) -> DownloadRequest {
        DownloadRequest {
            url: url.to_string(),
            destination_folder: folder.to_path_buf(),
            filename_template: String::new(),
            quality: Quality::Best,
            resolution_cap: ResolutionCap::NoCap,
            codec_preference: CodecPreference::Any,
            audio_only: false,
            container: "mp4".to_string(),
            format_override: String::new(),
            playlist_limit: None,
        }
    }

    fn format_selector(args: &[String]) -> Option<String> {
        args.iter()
            .position(|a| a == "-f")
            .map(|i| args[i + 1].clone())
    }

    #[test]
    fn literal_template_in_empty_folder_keeps_bare_name() {
        let dir = temp_dir("bare");
        let (template, base) = build_filename_template(&dir, "video");
        assert_eq!(template, "video.%(ext)s");
        assert_eq!(base.as_deref(), Some("video"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn literal_template_steps_past_existing_suffixes() {
        let dir = temp_dir("suffix");
        fs::write(dir.join("video.mp4"), b"x").unwrap();
        fs::write(dir.join("video_1.mp4"), b"x").unwrap();
        let (template, base) = build_filename_template(&dir, "video");
        assert_eq!(template, "video_2.%(ext)s");
        assert_eq!(base.as_deref(), Some("video_2"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bare_name_alone_yields_first_suffix() {
        let dir = temp_dir("first");
        fs::write(dir.join("clip.mp4"), b"x").unwrap();
        let (template, base) = build_filename_template(&dir, "clip");
        assert_eq!(template, "clip_1.%(ext)s");
        assert_eq!(base.as_deref(), Some("clip_1"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unrelated_stems_do_not_force_a_suffix() {
        let dir = temp_dir("unrelated");
        fs::write(dir.join("clipboard.mp4"), b"x").unwrap();
        fs::write(dir.join("clip_two.mp4"), b"x").unwrap();
        let (_, base) = build_filename_template(&dir, "clip");
        assert_eq!(base.as_deref(), Some("clip"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn suffix_scan_ignores_extension() {
        let dir = temp_dir("exts");
        fs::write(dir.join("clip.webm"), b"x").unwrap();
        fs::write(dir.join("clip_3.mkv"), b"x").unwrap();
        let (_, base) = build_filename_template(&dir, "clip.mp4");
        assert_eq!(base.as_deref(), Some("clip_4"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn placeholder_template_passes_through() {
        let dir = temp_dir("placeholder");
        let (template, base) = build_filename_template(&dir, "%(title)s.%(ext)s");
        assert_eq!(template, "%(title)s.%(ext)s");
        assert_eq!(base, None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn extension_placeholder_is_appended_when_missing() {
        let dir = temp_dir("appendext");
        let (template, _) = build_filename_template(&dir, "%(title)s");
        assert_eq!(template, "%(title)s.%(ext)s");

        let (template, _) = build_filename_template(&dir, "");
        assert_eq!(template, DEFAULT_TEMPLATE);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn arguments_start_with_newline_and_output_flags() {
        let dir = temp_dir("argshape");
        let req = request("https://example.com/watch?v=a", &dir);
        let (args, _) = build_arguments(&req);
        assert_eq!(args[0], "--newline");
        assert_eq!(args[1], "-o");
        assert!(args[2].ends_with("%(title)s.%(ext)s"));
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/watch?v=a"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn format_override_supersedes_all_derived_selection() {
        let dir = temp_dir("override");
        let mut req = request("https://example.com/watch?v=a", &dir);
        req.format_override = "bestvideo".to_string();
        req.quality = Quality::Worst;
        req.resolution_cap = ResolutionCap::P720;
        req.codec_preference = CodecPreference::Hevc;
        req.audio_only = false;
        let (args, _) = build_arguments(&req);
        assert_eq!(format_selector(&args).as_deref(), Some("bestvideo"));
        assert!(!args.iter().any(|a| a.contains("height<=")));
        assert!(!args.iter().any(|a| a.contains("vcodec*=")));
        assert!(!args.iter().any(|a| a.contains("quality=lowest")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn derived_selector_stacks_quality_height_and_codec() {
        let dir = temp_dir("derived");
        let mut req = request("https://example.com/watch?v=a", &dir);
        req.quality = Quality::Worst;
        req.resolution_cap = ResolutionCap::P1080;
        req.codec_preference = CodecPreference::Av1;
        let (args, _) = build_arguments(&req);
        assert_eq!(
            format_selector(&args).as_deref(),
            Some("bv*+ba/b[quality=lowest][height<=1080][vcodec*=av01]")
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_selector_is_best_video_plus_audio() {
        let dir = temp_dir("default");
        let req = request("https://example.com/watch?v=a", &dir);
        let (args, _) = build_arguments(&req);
        assert_eq!(format_selector(&args).as_deref(), Some("bv*+ba/b"));
        assert!(args.contains(&"--merge-output-format".to_string()));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn audio_only_extracts_instead_of_merging() {
        let dir = temp_dir("audio");
        let mut req = request("https://example.com/watch?v=a", &dir);
        req.audio_only = true;
        req.container = "mp3".to_string();
        let (args, _) = build_arguments(&req);
        assert_eq!(format_selector(&args).as_deref(), Some("ba/b"));
        let extract = args.iter().position(|a| a == "--extract-audio");
        assert!(extract.is_some());
        let fmt_flag = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[fmt_flag + 1], "mp3");
        assert!(!args.contains(&"--merge-output-format".to_string()));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn playlist_limit_emits_playlist_end() {
        let dir = temp_dir("playlist");
        let mut req = request("https://www.youtube.com/watch?v=a&list=PL99", &dir);
        req.playlist_limit = Some(5);
        let (args, _) = build_arguments(&req);
        let pos = args.iter().position(|a| a == "--playlist-end").unwrap();
        assert_eq!(args[pos + 1], "5");

        // Zero means "all": no limit flag.
        req.playlist_limit = Some(0);
        let (args, _) = build_arguments(&req);
        assert!(!args.contains(&"--playlist-end".to_string()));

        // Non-playlist URLs never get the flag, limit or not.
        let mut req = request("https://www.youtube.com/watch?v=a", &dir);
        req.playlist_limit = Some(5);
        let (args, _) = build_arguments(&req);
        assert!(!args.contains(&"--playlist-end".to_string()));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rate_limited_hosts_get_robustness_flags() {
        let dir = temp_dir("ratelimit");
        let req = request("https://x.com/user/status/1", &dir);
        let (args, _) = build_arguments(&req);
        let pos = args.iter().position(|a| a == "--socket-timeout").unwrap();
        assert_eq!(args[pos + 1], "30");
        assert!(args.contains(&"--fragment-retries".to_string()));
        assert!(args.contains(&"--ignore-errors".to_string()));

        let req = request("https://example.com/watch?v=a", &dir);
        let (args, _) = build_arguments(&req);
        assert!(!args.contains(&"--socket-timeout".to_string()));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn derived_base_resolves_to_exact_mp4() {
        let dir = temp_dir("discover");
        fs::write(dir.join("clip_1.mp4"), b"x").unwrap();
        fs::write(dir.join("other.mp4"), b"x").unwrap();
        let found = find_output_file(&dir, Some("clip_1"));
        assert_eq!(found, Some(dir.join("clip_1.mp4")));

        // A derived base with no matching mp4 is a miss, not a fallback.
        let found = find_output_file(&dir, Some("clip_2"));
        assert_eq!(found, None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn without_derived_base_newest_mp4_wins() {
        let dir = temp_dir("newest");
        fs::write(dir.join("old.mp4"), b"x").unwrap();
        let old = fs::OpenOptions::new()
            .write(true)
            .open(dir.join("old.mp4"))
            .unwrap();
        let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        old.set_modified(past).unwrap();
        drop(old);
        fs::write(dir.join("new.mp4"), b"x").unwrap();
        fs::write(dir.join("ignored.mkv"), b"x").unwrap();
        let found = find_output_file(&dir, None);
        assert_eq!(found, Some(dir.join("new.mp4")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_folder_has_nothing_to_preview() {
        let dir = temp_dir("nothing");
        assert_eq!(find_output_file(&dir, None), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
