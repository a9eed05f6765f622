use crate::model::{JobEvent, JobPhase};

use super::actions;
use super::App;

pub fn on_tick(app: &mut App) {
    // Drain worker events accumulated since the last tick.
    while let Ok(event) = app.job_event_rx.try_recv() {
        match event {
            JobEvent::Started => {
                app.job_phase = JobPhase::Running;
                app.job_pending = false;
            }
            JobEvent::Percent(p) => {
                app.job_percent = p;
            }
            JobEvent::Status(text) => {
                app.status_message = Some(text);
                app.status_is_error = false;
            }
            JobEvent::PlaylistTotal(total) => {
                app.playlist_total = Some(total);
            }
            JobEvent::Done {
                phase,
                message,
                preview,
            } => {
                app.job_phase = phase;
                app.job_pending = false;
                app.status_is_error = matches!(phase, JobPhase::Failed | JobPhase::Cancelled);
                app.status_message = Some(message);
                app.preview_path = preview;
                if phase == JobPhase::Succeeded {
                    actions::refresh_library(app);
                }
            }
        }
    }

    // Check if the playback process finished on its own.
    if let Some(ref mut child) = app.playback_process {
        if let Ok(Some(_)) = child.try_wait() {
            app.playback_process = None;
            app.playback_cmd_tx = None;
            app.playback_title = None;
            app.playback_time = 0.0;
            app.playback_total = 0.0;
            app.is_paused = false;
            app.status_message = Some("Stopped.".to_string());
        }
    }

    // Process IPC responses for progress tracking.
    while let Ok(msg) = app.playback_res_rx.try_recv() {
        if let Ok(val) = serde_json::from_str::<serde_json::Value>(&msg) {
            if let Some(t) = val["data"].as_f64() {
                if val["request_id"].as_u64() == Some(1) {
                    app.playback_time = t;
                } else if val["request_id"].as_u64() == Some(2) {
                    app.playback_total = t;
                }
            }
        }
    }

    // Trigger property requests if we are playing.
    if app.playback_cmd_tx.is_some() && !app.is_paused {
        actions::send_command(
            app,
            "{\"command\": [\"get_property\", \"time-pos\"], \"request_id\": 1}\n",
        );
        actions::send_command(
            app,
            "{\"command\": [\"get_property\", \"duration\"], \"request_id\": 2}\n",
        );
    }
}

pub fn move_track_selection(app: &mut App, delta: i32) {
    if app.tracks.is_empty() {
        app.selected_track = None;
        return;
    }
    let len = app.tracks.len();
    let current = app.selected_track.unwrap_or(0);
    let new_index = if delta > 0 {
        (current + delta as usize).min(len - 1)
    } else {
        current.saturating_sub(delta.unsigned_abs() as usize)
    };
    app.selected_track = Some(new_index);
}
