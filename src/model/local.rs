use std::path::PathBuf;

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "mp2", "mp1", "m4a", "m4b", "m4p", "aac", "wav", "flac", "ogg", "opus", "aiff", "aif",
    "aifc", "wma", "alac", "amr", "caf",
];

/// One entry in the player page's library list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTrack {
    pub name: String,
    pub path: PathBuf,
    pub size: String,
    pub extension: String,
}

impl LocalTrack {
    pub fn is_audio_extension(ext: &str) -> bool {
        AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
