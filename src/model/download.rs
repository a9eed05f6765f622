use std::path::PathBuf;

pub const MSG_COMPLETE: &str = "Download complete.";
pub const MSG_CANCELLED: &str = "Download cancelled.";
pub const MSG_FAILED_GENERIC: &str = "Download failed. Check the URL or yt-dlp output.";
pub const MSG_LAUNCH_FAILED: &str = "Failed to start yt-dlp. Is it installed and on PATH?";

pub const VIDEO_CONTAINERS: &[&str] = &["mp4", "mkv", "webm"];
pub const AUDIO_CONTAINERS: &[&str] = &["m4a", "mp3", "opus"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Best,
    Worst,
}

impl Quality {
    pub fn all() -> &'static [Self] {
        &[Self::Best, Self::Worst]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Best => "Best",
            Self::Worst => "Worst",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|q| q.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionCap {
    #[default]
    NoCap,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
}

impl ResolutionCap {
    pub fn all() -> &'static [Self] {
        &[
            Self::NoCap,
            Self::P480,
            Self::P720,
            Self::P1080,
            Self::P1440,
            Self::P2160,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoCap => "No cap",
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::P1440 => "1440p",
            Self::P2160 => "2160p",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.label() == label)
    }

    /// Maximum height in pixels, or None when uncapped.
    pub fn height(&self) -> Option<u32> {
        match self {
            Self::NoCap => None,
            Self::P480 => Some(480),
            Self::P720 => Some(720),
            Self::P1080 => Some(1080),
            Self::P1440 => Some(1440),
            Self::P2160 => Some(2160),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecPreference {
    #[default]
    Any,
    Av1,
    H264,
    Hevc,
}

impl CodecPreference {
    pub fn all() -> &'static [Self] {
        &[Self::Any, Self::Av1, Self::H264, Self::Hevc]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Av1 => "AV1",
            Self::H264 => "H.264",
            Self::Hevc => "HEVC",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }

    /// The vcodec substring yt-dlp uses for this codec family.
    pub fn vcodec_tag(&self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Av1 => Some("av01"),
            Self::H264 => Some("avc1"),
            Self::Hevc => Some("hev1"),
        }
    }
}

/// Everything needed to launch one download, captured from the form at
/// the moment the user hits start.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub destination_folder: PathBuf,
    pub filename_template: String,
    pub quality: Quality,
    pub resolution_cap: ResolutionCap,
    pub codec_preference: CodecPreference,
    pub audio_only: bool,
    pub container: String,
    /// Raw yt-dlp format selector. Non-empty means the user takes over
    /// format selection entirely.
    pub format_override: String,
    /// None when the playlist toggle is off. Some(0) means "all items".
    pub playlist_limit: Option<u32>,
}

impl DownloadRequest {
    pub fn is_playlist(&self) -> bool {
        self.url.contains("list=")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

/// Events the job runner sends back to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Started,
    Percent(u8),
    Status(String),
    PlaylistTotal(u32),
    Done {
        phase: JobPhase,
        message: String,
        preview: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for q in Quality::all() {
            assert_eq!(Quality::from_label(q.label()), Some(*q));
        }
        for r in ResolutionCap::all() {
            assert_eq!(ResolutionCap::from_label(r.label()), Some(*r));
        }
        for c in CodecPreference::all() {
            assert_eq!(CodecPreference::from_label(c.label()), Some(*c));
        }
    }

    #[test]
    fn playlist_detection_is_substring_based() {
        let mut req = DownloadRequest {
            url: "https://www.youtube.com/watch?v=abc&list=PL123".to_string(),
            destination_folder: PathBuf::from("/tmp"),
            filename_template: String::new(),
            quality: Quality::Best,
            resolution_cap: ResolutionCap::NoCap,
            codec_preference: CodecPreference::Any,
            audio_only: false,
            container: "mp4".to_string(),
            format_override: String::new(),
            playlist_limit: None,
        };
        assert!(req.is_playlist());
        req.url = "https://www.youtube.com/watch?v=abc".to_string();
        assert!(!req.is_playlist());
    }
}
