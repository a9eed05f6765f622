use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::model::download::{MSG_CANCELLED, MSG_COMPLETE, MSG_LAUNCH_FAILED};
use crate::model::{DownloadRequest, JobEvent, JobPhase, LocalTrack};
use crate::sys::progress::{ProgressTracker, TrackerSignal};
use crate::sys::state::AppState;
use crate::sys::{download, library};
use crate::tui::components::theme::Theme;

use super::state::{DownloadField, DownloadForm, EditTarget, InputMode, JobControl, Page};

pub struct App {
    pub running: bool,
    pub page: Page,
    pub input_mode: InputMode,
    pub state: AppState,
    pub theme: Theme,
    // Download form
    pub form: DownloadForm,
    pub focus: DownloadField,
    pub editing: Option<EditTarget>,
    pub cursor_position: usize,
    // Home
    pub home_url: String,
    // Messages/Status
    pub status_message: Option<String>,
    pub status_is_error: bool,
    // Job state mirrored from worker events
    pub job_phase: JobPhase,
    pub job_pending: bool,
    pub job_percent: u8,
    pub playlist_total: Option<u32>,
    pub preview_path: Option<PathBuf>,
    // Async Communication
    pub job_tx: UnboundedSender<DownloadRequest>,
    pub job_event_rx: UnboundedReceiver<JobEvent>,
    pub job_control_tx: UnboundedSender<JobControl>,
    // Player
    pub mpv_available: bool,
    pub tracks: Vec<LocalTrack>,
    pub selected_track: Option<usize>,
    pub playback_process: Option<tokio::process::Child>,
    pub playback_cmd_tx: Option<UnboundedSender<String>>,
    pub playback_res_rx: UnboundedReceiver<String>,
    pub playback_title: Option<String>,
    pub playback_time: f64,
    pub playback_total: f64,
    pub is_paused: bool,
}

impl App {
    pub fn new(state: AppState, mpv_available: bool, initial_url: Option<String>) -> Self {
        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<DownloadRequest>();
        let (event_tx, job_event_rx) = mpsc::unbounded_channel::<JobEvent>();
        let (job_control_tx, mut control_rx) = mpsc::unbounded_channel::<JobControl>();

        // One worker, one job at a time. Cancels that arrive while the
        // worker sits idle are dropped here.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    req = job_rx.recv() => {
                        match req {
                            Some(request) => run_job(request, &event_tx, &mut control_rx).await,
                            None => break,
                        }
                    }
                    ctl = control_rx.recv() => {
                        match ctl {
                            Some(JobControl::Cancel) => {}
                            None => break,
                        }
                    }
                }
            }
        });

        let (_, playback_res_rx) = mpsc::unbounded_channel();

        let tracks = if state.audio_dir.is_empty() {
            Vec::new()
        } else {
            library::scan_audio_library(Path::new(&state.audio_dir))
        };
        let selected_track = if tracks.is_empty() { None } else { Some(0) };

        let mut page = Page::from_slug(&state.last_page).unwrap_or(Page::Home);
        if page == Page::Player && !mpv_available {
            page = Page::Home;
        }

        let mut form = DownloadForm::from_state(&state);
        if let Some(url) = initial_url {
            form.url = url;
            page = Page::Download;
        }

        let theme = Theme::from_name(&state.theme);

        Self {
            running: true,
            page,
            input_mode: InputMode::Normal,
            state,
            theme,
            form,
            focus: DownloadField::Url,
            editing: None,
            cursor_position: 0,
            home_url: String::new(),
            status_message: None,
            status_is_error: false,
            job_phase: JobPhase::Idle,
            job_pending: false,
            job_percent: 0,
            playlist_total: None,
            preview_path: None,
            job_tx,
            job_event_rx,
            job_control_tx,
            mpv_available,
            tracks,
            selected_track,
            playback_process: None,
            playback_cmd_tx: None,
            playback_res_rx,
            playback_title: None,
            playback_time: 0.0,
            playback_total: 0.0,
            is_paused: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback_process.is_some()
    }
}

/// Runs a single download to completion. The control channel is only
/// listened to here, so a cancel can never outlive the job it aimed at.
async fn run_job(
    request: DownloadRequest,
    event_tx: &UnboundedSender<JobEvent>,
    control_rx: &mut UnboundedReceiver<JobControl>,
) {
    let (args, derived_base) = download::build_arguments(&request);
    let playlist_requested = if request.is_playlist() {
        Some(request.playlist_limit.unwrap_or(0))
    } else {
        None
    };
    let mut tracker = ProgressTracker::new(playlist_requested);

    let mut child = match download::start_download(&request, &args).await {
        Ok(child) => child,
        Err(e) => {
            log::error!("Could not launch yt-dlp: {}", e);
            let _ = event_tx.send(JobEvent::Done {
                phase: JobPhase::Failed,
                message: MSG_LAUNCH_FAILED.to_string(),
                preview: None,
            });
            return;
        }
    };

    let _ = event_tx.send(JobEvent::Started);

    let stdout = child
        .stdout
        .take()
        .expect("child did not have a handle to stdout");
    let stderr = child
        .stderr
        .take()
        .expect("child did not have a handle to stderr");

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    loop {
        tokio::select! {
            Ok(Some(line)) = stdout_reader.next_line() => {
                forward_signals(&mut tracker, &line, event_tx);
            }
            Ok(Some(line)) = stderr_reader.next_line() => {
                forward_signals(&mut tracker, &line, event_tx);
            }
            ctl = control_rx.recv() => {
                // None means the app is gone; tear the child down either way.
                if matches!(ctl, Some(JobControl::Cancel) | None) {
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to kill yt-dlp: {}", e);
                    }
                    let _ = child.wait().await;
                    let _ = event_tx.send(JobEvent::Done {
                        phase: JobPhase::Cancelled,
                        message: MSG_CANCELLED.to_string(),
                        preview: None,
                    });
                    return;
                }
            }
            status = child.wait() => {
                let done = match status {
                    Ok(exit) if exit.success() => {
                        let preview = download::find_output_file(
                            &request.destination_folder,
                            derived_base.as_deref(),
                        );
                        JobEvent::Done {
                            phase: JobPhase::Succeeded,
                            message: MSG_COMPLETE.to_string(),
                            preview,
                        }
                    }
                    Ok(exit) => {
                        log::info!("yt-dlp exited with code {:?}", exit.code());
                        JobEvent::Done {
                            phase: JobPhase::Failed,
                            message: tracker.failure_detail(),
                            preview: None,
                        }
                    }
                    Err(e) => {
                        log::error!("Failed to wait for yt-dlp: {}", e);
                        JobEvent::Done {
                            phase: JobPhase::Failed,
                            message: tracker.failure_detail(),
                            preview: None,
                        }
                    }
                };
                let _ = event_tx.send(done);
                return;
            }
        }
    }
}

fn forward_signals(tracker: &mut ProgressTracker, line: &str, event_tx: &UnboundedSender<JobEvent>) {
    for signal in tracker.observe(line) {
        let event = match signal {
            TrackerSignal::Percent(p) => JobEvent::Percent(p),
            TrackerSignal::Status(s) => JobEvent::Status(s),
            TrackerSignal::Total(t) => JobEvent::PlaylistTotal(t),
        };
        let _ = event_tx.send(event);
    }
}
