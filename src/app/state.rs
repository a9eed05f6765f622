use std::path::Path;

use crate::model::download::{AUDIO_CONTAINERS, VIDEO_CONTAINERS};
use crate::model::{CodecPreference, DownloadRequest, Quality, ResolutionCap};
use crate::sys::state::AppState;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Page {
    Home,
    Download,
    Player,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Download => "Download",
            Page::Player => "Player",
        }
    }

    /// Key stored in the state file.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Download => "download",
            Page::Player => "player",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        match slug {
            "home" => Some(Page::Home),
            "download" => Some(Page::Download),
            "player" => Some(Page::Player),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Sent to the download worker to interrupt the job it is running.
#[derive(Debug)]
pub enum JobControl {
    Cancel,
}

/// Rows of the download form, in the order the cursor walks them.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadField {
    Url,
    Folder,
    Template,
    Quality,
    Resolution,
    Codec,
    AudioOnly,
    Container,
    FormatOverride,
    PlaylistToggle,
    PlaylistCount,
}

impl DownloadField {
    pub fn all() -> Vec<DownloadField> {
        vec![
            DownloadField::Url,
            DownloadField::Folder,
            DownloadField::Template,
            DownloadField::Quality,
            DownloadField::Resolution,
            DownloadField::Codec,
            DownloadField::AudioOnly,
            DownloadField::Container,
            DownloadField::FormatOverride,
            DownloadField::PlaylistToggle,
            DownloadField::PlaylistCount,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DownloadField::Url => "URL",
            DownloadField::Folder => "Folder",
            DownloadField::Template => "Filename template",
            DownloadField::Quality => "Quality",
            DownloadField::Resolution => "Resolution cap",
            DownloadField::Codec => "Codec",
            DownloadField::AudioOnly => "Audio only",
            DownloadField::Container => "Container",
            DownloadField::FormatOverride => "Format override",
            DownloadField::PlaylistToggle => "Playlist limit",
            DownloadField::PlaylistCount => "Playlist count",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            DownloadField::Url
                | DownloadField::Folder
                | DownloadField::Template
                | DownloadField::FormatOverride
        )
    }
}

/// Which text buffer the editing cursor currently lives in.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EditTarget {
    HomeUrl,
    Form(DownloadField),
    AudioDir,
}

/// Everything the download page collects before a job is submitted.
pub struct DownloadForm {
    pub url: String,
    pub folder: String,
    pub template: String,
    pub quality: Quality,
    pub resolution_cap: ResolutionCap,
    pub codec_preference: CodecPreference,
    pub audio_only: bool,
    pub container: String,
    pub format_override: String,
    pub playlist_enabled: bool,
    pub playlist_count: u32,
}

impl DownloadForm {
    pub fn from_state(state: &AppState) -> Self {
        let mut form = Self {
            url: String::new(),
            folder: state.last_folder_path.clone(),
            template: state.filename_template.clone(),
            quality: Quality::from_label(&state.quality).unwrap_or_default(),
            resolution_cap: ResolutionCap::from_label(&state.resolution_cap).unwrap_or_default(),
            codec_preference: CodecPreference::from_label(&state.codec_preference)
                .unwrap_or_default(),
            audio_only: state.audio_only,
            container: state.output_container.clone(),
            format_override: state.format_selector.clone(),
            playlist_enabled: state.playlist_enabled,
            playlist_count: state.playlist_count,
        };
        form.sync_container();
        form
    }

    pub fn apply_to_state(&self, state: &mut AppState) {
        state.last_folder_path = self.folder.trim().to_string();
        state.filename_template = self.template.trim().to_string();
        state.quality = self.quality.label().to_string();
        state.resolution_cap = self.resolution_cap.label().to_string();
        state.codec_preference = self.codec_preference.label().to_string();
        state.audio_only = self.audio_only;
        state.output_container = self.container.clone();
        state.format_selector = self.format_override.trim().to_string();
        state.playlist_enabled = self.playlist_enabled;
        state.playlist_count = self.playlist_count;
    }

    /// Container choices valid for the current audio/video mode.
    pub fn container_choices(&self) -> &'static [&'static str] {
        if self.audio_only {
            AUDIO_CONTAINERS
        } else {
            VIDEO_CONTAINERS
        }
    }

    /// Snap the container back to a valid choice after the mode flips.
    pub fn sync_container(&mut self) {
        let choices = self.container_choices();
        if !choices.iter().any(|c| *c == self.container) {
            self.container = choices[0].to_string();
        }
    }

    pub fn cycle_container(&mut self, forward: bool) {
        let choices = self.container_choices();
        let idx = choices
            .iter()
            .position(|c| *c == self.container)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % choices.len()
        } else {
            (idx + choices.len() - 1) % choices.len()
        };
        self.container = choices[next].to_string();
    }

    pub fn to_request(&self, folder: &Path) -> DownloadRequest {
        DownloadRequest {
            url: self.url.trim().to_string(),
            destination_folder: folder.to_path_buf(),
            filename_template: self.template.trim().to_string(),
            quality: self.quality,
            resolution_cap: self.resolution_cap,
            codec_preference: self.codec_preference,
            audio_only: self.audio_only,
            container: self.container.clone(),
            format_override: self.format_override.trim().to_string(),
            playlist_limit: self.playlist_enabled.then_some(self.playlist_count),
        }
    }
}
