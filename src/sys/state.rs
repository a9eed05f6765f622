use directories::ProjectDirs;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Long-lived user preferences, written to a flat JSON file on exit and
/// read back on startup. Every field is optional in the file; anything
/// missing, unknown, or of the wrong type falls back to its default
/// without invalidating the rest.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppState {
    pub last_folder_path: String,
    pub last_page: String,
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<(u16, u16)>,
    pub filename_template: String,
    pub quality: String,
    pub resolution_cap: String,
    pub codec_preference: String,
    pub output_container: String,
    pub audio_only: bool,
    pub format_selector: String,
    pub volume: u8,
    pub muted: bool,
    pub playlist_enabled: bool,
    pub playlist_count: u32,
    pub audio_dir: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            last_folder_path: String::new(),
            last_page: "home".to_string(),
            theme: "Light".to_string(),
            window_size: None,
            filename_template: "%(title)s.%(ext)s".to_string(),
            quality: "Best".to_string(),
            resolution_cap: "No cap".to_string(),
            codec_preference: "Any".to_string(),
            output_container: "mp4".to_string(),
            audio_only: false,
            format_selector: String::new(),
            volume: 60,
            muted: false,
            playlist_enabled: false,
            playlist_count: 5,
            audio_dir: String::new(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "beluga", "beluga")
}

fn home_fallback() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".beluga")
}

pub fn state_path() -> PathBuf {
    project_dirs()
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_dir())
                .join("state.json")
        })
        .unwrap_or_else(|| home_fallback().join("state.json"))
}

/// Sentinel next to the app's data. Only its existence matters.
pub fn marker_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(".storage"))
        .unwrap_or_else(|| home_fallback().join(".storage"))
}

pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_dir())
                .join("beluga.log")
        })
        .unwrap_or_else(|| home_fallback().join("beluga.log"))
}

/// Where downloads land when the user has not picked a folder yet.
pub fn default_download_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|user_dirs| user_dirs.download_dir().map(|p| p.join("Beluga")))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .unwrap_or_else(|_| ".".to_string());
            Path::new(&home).join("Downloads").join("Beluga")
        })
}

impl AppState {
    pub fn load() -> Self {
        Self::load_from(&state_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(value) => Self::from_value(&value),
                Err(e) => {
                    log::warn!("State file is not valid JSON, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Field-by-field extraction. A wrong-typed field is skipped on its
    /// own; unknown keys are ignored.
    pub fn from_value(value: &Value) -> Self {
        let mut state = Self::default();
        let Some(map) = value.as_object() else {
            return state;
        };

        let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(s) = map.get("last_folder_path").and_then(&non_empty) {
            state.last_folder_path = s;
        }
        if let Some(s) = map.get("last_page").and_then(&non_empty) {
            state.last_page = s;
        }
        if let Some(s) = map.get("theme").and_then(&non_empty) {
            state.theme = s;
        }
        if let Some(size) = map.get("window_size").and_then(Value::as_array) {
            if let [w, h] = size.as_slice() {
                let w = w.as_u64().and_then(|v| u16::try_from(v).ok());
                let h = h.as_u64().and_then(|v| u16::try_from(v).ok());
                if let (Some(w), Some(h)) = (w, h) {
                    state.window_size = Some((w, h));
                }
            }
        }
        if let Some(s) = map.get("filename_template").and_then(&non_empty) {
            state.filename_template = s;
        }
        if let Some(s) = map.get("quality").and_then(&non_empty) {
            state.quality = s;
        }
        if let Some(s) = map.get("resolution_cap").and_then(&non_empty) {
            state.resolution_cap = s;
        }
        if let Some(s) = map.get("codec_preference").and_then(&non_empty) {
            state.codec_preference = s;
        }
        if let Some(s) = map.get("output_container").and_then(&non_empty) {
            state.output_container = s;
        }
        if let Some(b) = map.get("audio_only").and_then(Value::as_bool) {
            state.audio_only = b;
        }
        if let Some(s) = map.get("format_selector").and_then(Value::as_str) {
            state.format_selector = s.to_string();
        }
        if let Some(v) = map
            .get("volume")
            .and_then(Value::as_u64)
            .and_then(|v| u8::try_from(v).ok())
        {
            state.volume = v.min(100);
        }
        if let Some(b) = map.get("muted").and_then(Value::as_bool) {
            state.muted = b;
        }
        if let Some(b) = map.get("playlist_enabled").and_then(Value::as_bool) {
            state.playlist_enabled = b;
        }
        if let Some(n) = map
            .get("playlist_count")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
        {
            if n >= 1 {
                state.playlist_count = n;
            }
        }
        if let Some(s) = map.get("audio_dir").and_then(&non_empty) {
            state.audio_dir = s;
        }

        state
    }

    /// Best effort: persistence never surfaces errors to the user.
    pub fn save(&self) {
        if let Err(e) = self.save_to(&state_path()) {
            log::warn!("Failed to save state: {}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Creates the state file and storage marker on first run. Failures
    /// are logged and otherwise ignored, the app runs fine without them.
    pub fn ensure_storage(&self) {
        let state_path = state_path();
        if !state_path.exists() {
            if let Err(e) = self.save_to(&state_path) {
                log::warn!("Failed to seed state file: {}", e);
            }
        }
        let marker = marker_path();
        if !marker.exists() {
            let write = marker
                .parent()
                .map(fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|_| fs::write(&marker, "beluga"));
            if let Err(e) = write {
                log::warn!("Failed to create storage marker: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_volume_key_yields_default() {
        let state = AppState::from_value(&json!({ "theme": "Dark" }));
        assert_eq!(state.volume, 60);
        assert_eq!(state.theme, "Dark");
    }

    #[test]
    fn mismatched_fields_are_skipped_individually() {
        let state = AppState::from_value(&json!({
            "volume": "loud",
            "muted": "yes",
            "quality": 3,
            "playlist_count": -2,
            "window_size": [120, "tall"],
            "audio_only": true,
            "filename_template": "clip"
        }));
        assert_eq!(state.volume, 60);
        assert!(!state.muted);
        assert_eq!(state.quality, "Best");
        assert_eq!(state.playlist_count, 5);
        assert_eq!(state.window_size, None);
        // Well-typed neighbours still land.
        assert!(state.audio_only);
        assert_eq!(state.filename_template, "clip");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let state = AppState::from_value(&json!({
            "volume": 80,
            "wallpaper": "orca.png",
            "window_pos": [10, 20]
        }));
        assert_eq!(state.volume, 80);
        assert_eq!(state, {
            let mut expected = AppState::default();
            expected.volume = 80;
            expected
        });
    }

    #[test]
    fn non_object_json_falls_back_to_defaults() {
        assert_eq!(AppState::from_value(&json!([1, 2, 3])), AppState::default());
        assert_eq!(AppState::from_value(&json!("state")), AppState::default());
    }

    #[test]
    fn empty_strings_do_not_clobber_defaults() {
        let state = AppState::from_value(&json!({
            "quality": "",
            "output_container": "",
            "last_page": "player"
        }));
        assert_eq!(state.quality, "Best");
        assert_eq!(state.output_container, "mp4");
        assert_eq!(state.last_page, "player");
    }

    #[test]
    fn save_writes_two_space_indented_json() {
        let dir = std::env::temp_dir().join(format!("beluga-state-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("state.json");

        let mut state = AppState::default();
        state.volume = 35;
        state.theme = "Dark".to_string();
        state.window_size = Some((120, 40));
        state.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"volume\": 35"));

        let reloaded = AppState::load_from(&path);
        assert_eq!(reloaded, state);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_or_broken_file_loads_defaults() {
        let dir = std::env::temp_dir().join(format!("beluga-nostate-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(AppState::load_from(&dir.join("absent.json")), AppState::default());

        std::fs::create_dir_all(&dir).unwrap();
        let broken = dir.join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert_eq!(AppState::load_from(&broken), AppState::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
