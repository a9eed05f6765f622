use std::path::{Path, PathBuf};

use crate::model::JobPhase;
use crate::sys::{library, mpv_ipc, player, state};
use crate::tui::components::theme::Theme;

use super::state::{DownloadField, EditTarget, InputMode, JobControl, Page};
use super::App;

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn edit_buffer_mut(app: &mut App, target: EditTarget) -> Option<&mut String> {
    match target {
        EditTarget::HomeUrl => Some(&mut app.home_url),
        EditTarget::AudioDir => Some(&mut app.state.audio_dir),
        EditTarget::Form(field) => match field {
            DownloadField::Url => Some(&mut app.form.url),
            DownloadField::Folder => Some(&mut app.form.folder),
            DownloadField::Template => Some(&mut app.form.template),
            DownloadField::FormatOverride => Some(&mut app.form.format_override),
            _ => None,
        },
    }
}

pub fn edit_buffer(app: &App, target: EditTarget) -> Option<&str> {
    match target {
        EditTarget::HomeUrl => Some(&app.home_url),
        EditTarget::AudioDir => Some(&app.state.audio_dir),
        EditTarget::Form(field) => match field {
            DownloadField::Url => Some(&app.form.url),
            DownloadField::Folder => Some(&app.form.folder),
            DownloadField::Template => Some(&app.form.template),
            DownloadField::FormatOverride => Some(&app.form.format_override),
            _ => None,
        },
    }
}

pub fn begin_edit(app: &mut App, target: EditTarget) {
    let Some(buf) = edit_buffer(app, target) else {
        return;
    };
    app.cursor_position = buf.chars().count();
    app.editing = Some(target);
    app.input_mode = InputMode::Editing;
}

/// Leaves editing mode and applies whatever the edited buffer now means.
pub fn end_edit(app: &mut App) {
    let Some(target) = app.editing.take() else {
        return;
    };
    app.input_mode = InputMode::Normal;
    if target == EditTarget::AudioDir {
        refresh_library(app);
    }
}

pub fn insert_text(app: &mut App, text: &str) {
    let Some(target) = app.editing else {
        return;
    };
    let cursor = app.cursor_position;
    let added = text.chars().count();
    let Some(buf) = edit_buffer_mut(app, target) else {
        return;
    };
    let at = byte_index(buf, cursor);
    buf.insert_str(at, text);
    app.cursor_position = cursor + added;
}

pub fn insert_char(app: &mut App, c: char) {
    let mut tmp = [0u8; 4];
    insert_text(app, c.encode_utf8(&mut tmp));
}

pub fn delete_char(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    if app.cursor_position == 0 {
        return;
    }
    let cursor = app.cursor_position - 1;
    let Some(buf) = edit_buffer_mut(app, target) else {
        return;
    };
    let at = byte_index(buf, cursor);
    buf.remove(at);
    app.cursor_position = cursor;
}

pub fn delete_forward(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    let cursor = app.cursor_position;
    let Some(buf) = edit_buffer_mut(app, target) else {
        return;
    };
    let at = byte_index(buf, cursor);
    if at < buf.len() {
        buf.remove(at);
    }
}

pub fn delete_word_backwards(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    let cursor = app.cursor_position;
    if cursor == 0 {
        return;
    }
    let Some(buf) = edit_buffer_mut(app, target) else {
        return;
    };
    let end = byte_index(buf, cursor);
    let before = &buf[..end];
    let trimmed_len = before.trim_end().len();
    let start = before[..trimmed_len]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let new_cursor = buf[..start].chars().count();
    buf.drain(start..end);
    app.cursor_position = new_cursor;
}

pub fn clear_to_start(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    let cursor = app.cursor_position;
    let Some(buf) = edit_buffer_mut(app, target) else {
        return;
    };
    let at = byte_index(buf, cursor);
    buf.drain(..at);
    app.cursor_position = 0;
}

pub fn clear_to_end(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    let cursor = app.cursor_position;
    let Some(buf) = edit_buffer_mut(app, target) else {
        return;
    };
    let at = byte_index(buf, cursor);
    buf.truncate(at);
}

pub fn cursor_to_start(app: &mut App) {
    app.cursor_position = 0;
}

pub fn cursor_to_end(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    if let Some(buf) = edit_buffer(app, target) {
        app.cursor_position = buf.chars().count();
    }
}

pub fn move_cursor_left(app: &mut App) {
    app.cursor_position = app.cursor_position.saturating_sub(1);
}

pub fn move_cursor_right(app: &mut App) {
    let Some(target) = app.editing else {
        return;
    };
    if let Some(buf) = edit_buffer(app, target) {
        let len = buf.chars().count();
        app.cursor_position = (app.cursor_position + 1).min(len);
    }
}

pub fn handle_paste(app: &mut App, text: String) {
    if app.editing.is_none() {
        // Pasting a URL is the main entrance; drop the user straight
        // into the right field.
        match app.page {
            Page::Home => begin_edit(app, EditTarget::HomeUrl),
            Page::Download if app.focus.is_text() => {
                begin_edit(app, EditTarget::Form(app.focus));
            }
            _ => return,
        }
    }
    insert_text(app, &text);
}

pub fn switch_page(app: &mut App, page: Page) {
    if page == Page::Player && !app.mpv_available {
        app.status_message =
            Some("mpv is not installed. The player page is unavailable.".to_string());
        app.status_is_error = true;
        return;
    }
    app.page = page;
    app.state.last_page = page.slug().to_string();
}

pub fn toggle_theme(app: &mut App) {
    app.theme = if app.theme.name == "Dark" {
        Theme::light()
    } else {
        Theme::dark()
    };
    app.state.theme = app.theme.name.to_string();
}

pub fn continue_from_home(app: &mut App) {
    let url = app.home_url.trim().to_string();
    if url.is_empty() {
        app.status_message = Some("Please paste a video URL.".to_string());
        app.status_is_error = true;
        return;
    }
    app.form.url = url;
    switch_page(app, Page::Download);
}

pub fn start_download(app: &mut App) {
    if app.job_phase == JobPhase::Running || app.job_pending {
        return;
    }
    if app.form.url.trim().is_empty() {
        app.status_message = Some("Please paste a video URL.".to_string());
        app.status_is_error = true;
        return;
    }

    let folder = if app.form.folder.trim().is_empty() {
        state::default_download_dir()
    } else {
        PathBuf::from(app.form.folder.trim())
    };
    let request = app.form.to_request(&folder);
    app.form.apply_to_state(&mut app.state);
    app.state.last_folder_path = folder.to_string_lossy().to_string();

    app.job_pending = true;
    app.job_percent = 0;
    app.playlist_total = None;
    app.preview_path = None;
    app.status_is_error = false;
    app.status_message = Some(format!("Saving to {}", folder.display()));
    let _ = app.job_tx.send(request);
}

/// A cancel only makes sense against a running job; anything else is a
/// no-op, including the idle state.
pub fn cancel_download(app: &mut App) {
    if app.job_phase != JobPhase::Running {
        return;
    }
    let _ = app.job_control_tx.send(JobControl::Cancel);
    app.status_message = Some("Cancelling...".to_string());
    app.status_is_error = false;
}

pub fn refresh_library(app: &mut App) {
    let dir = app.state.audio_dir.trim().to_string();
    if dir.is_empty() {
        app.tracks.clear();
        app.selected_track = None;
        return;
    }
    app.tracks = library::scan_audio_library(Path::new(&dir));
    if app.tracks.is_empty() {
        app.selected_track = None;
    } else {
        match app.selected_track {
            None => app.selected_track = Some(0),
            Some(idx) if idx >= app.tracks.len() => {
                app.selected_track = Some(app.tracks.len() - 1);
            }
            _ => {}
        }
    }
}

pub fn play_selected(app: &mut App) {
    let Some(track) = app.selected_track.and_then(|i| app.tracks.get(i)).cloned() else {
        return;
    };
    stop_playback(app);

    let socket = mpv_ipc::socket_path();
    match player::spawn_player(&track.path, &socket, app.state.volume, app.state.muted) {
        Ok(child) => {
            let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
            let (res_tx, res_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
            tokio::spawn(async move {
                if let Err(e) = mpv_ipc::run(socket, cmd_rx, res_tx).await {
                    log::warn!("mpv IPC bridge ended: {}", e);
                }
            });
            app.playback_process = Some(child);
            app.playback_cmd_tx = Some(cmd_tx);
            app.playback_res_rx = res_rx;
            app.playback_title = Some(track.name.clone());
            app.playback_time = 0.0;
            app.playback_total = 0.0;
            app.is_paused = false;
            app.status_message = Some(format!("Playing {}", track.name));
            app.status_is_error = false;
        }
        Err(e) => {
            app.status_message = Some(format!("Error playing audio: {}", e));
            app.status_is_error = true;
        }
    }
}

pub fn stop_playback(app: &mut App) {
    if let Some(mut child) = app.playback_process.take() {
        let _ = child.start_kill();
        app.status_message = Some("Stopped.".to_string());
        app.status_is_error = false;
    }
    app.playback_cmd_tx = None;
    app.playback_title = None;
    app.playback_time = 0.0;
    app.playback_total = 0.0;
    app.is_paused = false;
}

pub fn toggle_pause(app: &mut App) {
    if app.playback_cmd_tx.is_some() {
        app.is_paused = !app.is_paused;
        send_command(app, "{\"command\": [\"cycle\", \"pause\"]}\n");
        app.status_message = Some(if app.is_paused {
            "Paused".to_string()
        } else {
            "Resumed".to_string()
        });
        app.status_is_error = false;
    }
}

pub fn seek(app: &mut App, seconds: i32) {
    if app.playback_cmd_tx.is_some() {
        let cmd = format!("{{\"command\": [\"seek\", {}, \"relative\"]}}\n", seconds);
        send_command(app, &cmd);
        app.status_message = Some(format!("Seeked {}s", seconds));
        app.status_is_error = false;
    }
}

pub fn change_volume(app: &mut App, delta: i16) {
    let volume = (app.state.volume as i16 + delta).clamp(0, 100) as u8;
    app.state.volume = volume;
    let cmd = format!("{{\"command\": [\"set_property\", \"volume\", {}]}}\n", volume);
    send_command(app, &cmd);
    app.status_message = Some(format!("Volume {}%", volume));
    app.status_is_error = false;
}

pub fn toggle_mute(app: &mut App) {
    app.state.muted = !app.state.muted;
    let cmd = format!(
        "{{\"command\": [\"set_property\", \"mute\", {}]}}\n",
        app.state.muted
    );
    send_command(app, &cmd);
    app.status_message = Some(if app.state.muted {
        "Muted".to_string()
    } else {
        "Unmuted".to_string()
    });
    app.status_is_error = false;
}

pub fn send_command(app: &App, cmd: &str) {
    if let Some(tx) = &app.playback_cmd_tx {
        let mut command = cmd.to_string();
        if !command.ends_with('\n') {
            command.push('\n');
        }
        let _ = tx.send(command);
    }
}
