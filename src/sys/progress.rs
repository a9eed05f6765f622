use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::download::MSG_FAILED_GENERIC;

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[download\]\s+(\d{1,3})\.\d+%").unwrap());
static TOTAL_OF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"of\s+(\d+)").unwrap());
static TOTAL_ITEMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Downloading\s+(\d+)\s+(?:videos|items)").unwrap());

/// One yt-dlp output line, classified.
///
/// The grammar matched here is a fixed contract, not an attempt to parse
/// everything yt-dlp can print:
/// - progress: `[download]` followed by a decimal percentage (the integer
///   part is kept, so 42.9% reads as 42)
/// - playlist totals: `of <N>` or `Downloading <N> videos|items`
///   (case-insensitive on the second form)
/// - status: lines mentioning `Destination:` or `Merging formats into`
///
/// Anything else is `Unrecognized` and only useful as a diagnostic of
/// last resort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Progress(u8),
    Status(String),
    PlaylistTotal(u32),
    Unrecognized,
}

/// Classifies a single output line. Returns None for blank lines.
///
/// A line with a decimal percentage is always a progress line, even when
/// it also carries an `of <size>` fragment; byte sizes must never be read
/// as playlist totals.
pub fn classify_line(line: &str) -> Option<LineEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = PERCENT_RE.captures(line) {
        if let Ok(value) = caps[1].parse::<u16>() {
            return Some(LineEvent::Progress(value.min(100) as u8));
        }
    }

    let total = TOTAL_OF_RE
        .captures(line)
        .or_else(|| TOTAL_ITEMS_RE.captures(line))
        .and_then(|caps| caps[1].parse::<u32>().ok());
    if let Some(total) = total {
        return Some(LineEvent::PlaylistTotal(total));
    }

    if trimmed.contains("Destination:") || trimmed.contains("Merging formats into") {
        return Some(LineEvent::Status(trimmed.to_string()));
    }

    Some(LineEvent::Unrecognized)
}

/// What the tracker wants surfaced to the user after seeing a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerSignal {
    Percent(u8),
    Status(String),
    Total(u32),
}

/// Per-job progress state. Created fresh for every download and thrown
/// away once the process exits.
#[derive(Debug)]
pub struct ProgressTracker {
    pub last_percent: u8,
    pub last_info_line: String,
    pub playlist_total: Option<u32>,
    pub playlist_requested: Option<u32>,
}

impl ProgressTracker {
    pub fn new(playlist_requested: Option<u32>) -> Self {
        Self {
            last_percent: 0,
            last_info_line: String::new(),
            playlist_total: None,
            playlist_requested,
        }
    }

    /// Feeds one output line through the classifier and updates state.
    /// Returned signals are the only things the caller should surface;
    /// everything else is silent bookkeeping.
    pub fn observe(&mut self, line: &str) -> Vec<TrackerSignal> {
        let mut signals = Vec::new();
        match classify_line(line) {
            None => {}
            Some(LineEvent::Progress(percent)) => {
                if percent != self.last_percent {
                    self.last_percent = percent;
                    signals.push(TrackerSignal::Percent(percent));
                }
            }
            Some(LineEvent::PlaylistTotal(total)) => {
                self.last_info_line = line.trim().to_string();
                if self.playlist_total.is_none() {
                    self.playlist_total = Some(total);
                    signals.push(TrackerSignal::Total(total));
                    if let Some(requested) = self.playlist_requested {
                        if requested > 0 && requested > total {
                            // The playlist is smaller than what was asked
                            // for; fall back to fetching everything.
                            self.playlist_requested = Some(0);
                            signals.push(TrackerSignal::Status(format!(
                                "Playlist has {} videos. Downloading all.",
                                total
                            )));
                        }
                    }
                }
            }
            Some(LineEvent::Status(text)) => {
                self.last_info_line = text.clone();
                signals.push(TrackerSignal::Status(text));
            }
            Some(LineEvent::Unrecognized) => {
                self.last_info_line = line.trim().to_string();
            }
        }
        signals
    }

    /// The message shown when the process exits non-zero.
    pub fn failure_detail(&self) -> String {
        if self.last_info_line.is_empty() {
            MSG_FAILED_GENERIC.to_string()
        } else {
            self.last_info_line.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(classify_line(""), None);
        assert_eq!(classify_line("   "), None);
        let mut tracker = ProgressTracker::new(None);
        tracker.last_info_line = "kept".to_string();
        assert!(tracker.observe("").is_empty());
        assert_eq!(tracker.last_info_line, "kept");
    }

    #[test]
    fn percent_is_truncated_not_rounded() {
        assert_eq!(
            classify_line("[download]  42.5% of 10.00MiB"),
            Some(LineEvent::Progress(42))
        );
        assert_eq!(
            classify_line("[download]  99.9% of ~4.30MiB at 2.50MiB/s ETA 00:01"),
            Some(LineEvent::Progress(99))
        );
        assert_eq!(
            classify_line("[download] 100.0% of 10.00MiB in 00:03"),
            Some(LineEvent::Progress(100))
        );
    }

    #[test]
    fn percent_line_leaves_info_line_alone() {
        let mut tracker = ProgressTracker::new(None);
        let signals = tracker.observe("[download]  42.5% of 10.00MiB");
        assert_eq!(signals, vec![TrackerSignal::Percent(42)]);
        assert_eq!(tracker.last_percent, 42);
        assert_eq!(tracker.last_info_line, "");
        // Byte sizes on progress lines are not playlist totals.
        assert_eq!(tracker.playlist_total, None);
    }

    #[test]
    fn unchanged_percent_is_not_resignalled() {
        let mut tracker = ProgressTracker::new(None);
        assert_eq!(
            tracker.observe("[download]  42.1% of 10.00MiB"),
            vec![TrackerSignal::Percent(42)]
        );
        assert!(tracker.observe("[download]  42.8% of 10.00MiB").is_empty());
        assert_eq!(tracker.last_percent, 42);
    }

    #[test]
    fn playlist_total_from_item_counter() {
        assert_eq!(
            classify_line("[download] Downloading item 2 of 25"),
            Some(LineEvent::PlaylistTotal(25))
        );
    }

    #[test]
    fn playlist_total_from_downloading_form_is_case_insensitive() {
        assert_eq!(
            classify_line("[youtube:tab] Playlist Mix: downloading 7 ITEMS"),
            Some(LineEvent::PlaylistTotal(7))
        );
        assert_eq!(
            classify_line("Downloading 3 videos"),
            Some(LineEvent::PlaylistTotal(3))
        );
    }

    #[test]
    fn requested_limit_above_total_resets_to_all() {
        let mut tracker = ProgressTracker::new(Some(5));
        let signals = tracker.observe("Downloading 3 videos");
        assert_eq!(tracker.playlist_total, Some(3));
        assert_eq!(tracker.playlist_requested, Some(0));
        assert!(signals.contains(&TrackerSignal::Total(3)));
        assert!(signals.iter().any(|s| matches!(
            s,
            TrackerSignal::Status(msg) if msg.contains('3')
        )));
    }

    #[test]
    fn requested_limit_within_total_is_kept() {
        let mut tracker = ProgressTracker::new(Some(5));
        tracker.observe("[download] Downloading item 1 of 12");
        assert_eq!(tracker.playlist_total, Some(12));
        assert_eq!(tracker.playlist_requested, Some(5));

        // A limit of 0 already means "all"; nothing to reset.
        let mut tracker = ProgressTracker::new(Some(0));
        let signals = tracker.observe("Downloading 3 videos");
        assert_eq!(tracker.playlist_requested, Some(0));
        assert_eq!(signals, vec![TrackerSignal::Total(3)]);
    }

    #[test]
    fn playlist_total_is_set_only_once() {
        let mut tracker = ProgressTracker::new(None);
        tracker.observe("[download] Downloading item 1 of 12");
        let signals = tracker.observe("[download] Downloading item 2 of 90");
        assert_eq!(tracker.playlist_total, Some(12));
        assert!(signals.is_empty());
        // The line still counts as bookkeeping.
        assert_eq!(tracker.last_info_line, "[download] Downloading item 2 of 90");
    }

    #[test]
    fn destination_and_merge_lines_become_status() {
        let mut tracker = ProgressTracker::new(None);
        let signals = tracker.observe("[download] Destination: /tmp/beluga/clip.mp4");
        assert_eq!(
            signals,
            vec![TrackerSignal::Status(
                "[download] Destination: /tmp/beluga/clip.mp4".to_string()
            )]
        );
        assert_eq!(tracker.last_info_line, "[download] Destination: /tmp/beluga/clip.mp4");

        let signals = tracker.observe("[Merger] Merging formats into \"clip.mp4\"");
        assert_eq!(
            signals,
            vec![TrackerSignal::Status(
                "[Merger] Merging formats into \"clip.mp4\"".to_string()
            )]
        );
    }

    #[test]
    fn unrecognized_lines_update_diagnostic_only() {
        let mut tracker = ProgressTracker::new(None);
        let signals = tracker.observe("ERROR: [youtube] abc: Video unavailable");
        assert!(signals.is_empty());
        assert_eq!(tracker.last_info_line, "ERROR: [youtube] abc: Video unavailable");
    }

    #[test]
    fn failure_detail_falls_back_to_generic_message() {
        let tracker = ProgressTracker::new(None);
        assert_eq!(tracker.failure_detail(), MSG_FAILED_GENERIC);

        let mut tracker = ProgressTracker::new(None);
        tracker.observe("ERROR: unable to download video data");
        assert_eq!(tracker.failure_detail(), "ERROR: unable to download video data");
    }
}
