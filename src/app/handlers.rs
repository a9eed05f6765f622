use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{CodecPreference, Quality, ResolutionCap};

use super::actions;
use super::state::{DownloadField, EditTarget, InputMode, Page};
use super::updates;
use super::App;

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    let code = match app.input_mode {
        InputMode::Editing => key.code,
        InputMode::Normal => match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_lowercase().next().unwrap_or(c)),
            other => other,
        },
    };

    log::debug!("Key event: {:?}, input_mode: {:?}", code, app.input_mode);

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, code),
        InputMode::Editing => handle_editing_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            actions::switch_page(app, Page::Home);
            return;
        }
        KeyCode::Char('2') => {
            actions::switch_page(app, Page::Download);
            return;
        }
        KeyCode::Char('3') => {
            actions::switch_page(app, Page::Player);
            return;
        }
        KeyCode::Tab => {
            cycle_page(app);
            return;
        }
        KeyCode::Char('t') => {
            actions::toggle_theme(app);
            return;
        }
        _ => {}
    }

    match app.page {
        Page::Home => handle_home_key(app, code),
        Page::Download => handle_download_key(app, code),
        Page::Player => handle_player_key(app, code),
    }
}

fn handle_home_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('e') | KeyCode::Char('i') => {
            actions::begin_edit(app, EditTarget::HomeUrl);
        }
        KeyCode::Enter => {
            actions::continue_from_home(app);
        }
        _ => {}
    }
}

fn handle_download_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => move_focus(app, -1),
        KeyCode::Down | KeyCode::Char('j') => move_focus(app, 1),
        KeyCode::Left | KeyCode::Char('h') => adjust_field(app, false),
        KeyCode::Right | KeyCode::Char('l') => adjust_field(app, true),
        KeyCode::Enter | KeyCode::Char('e') => activate_field(app),
        KeyCode::Char(' ') => match app.focus {
            DownloadField::AudioOnly | DownloadField::PlaylistToggle => activate_field(app),
            _ => {}
        },
        KeyCode::Char('s') => actions::start_download(app),
        KeyCode::Char('c') => actions::cancel_download(app),
        _ => {}
    }
}

fn handle_player_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => updates::move_track_selection(app, -1),
        KeyCode::Down | KeyCode::Char('j') => updates::move_track_selection(app, 1),
        KeyCode::Enter => actions::play_selected(app),
        KeyCode::Char('p') | KeyCode::Char(' ') => actions::toggle_pause(app),
        KeyCode::Char('x') => actions::stop_playback(app),
        KeyCode::Left => actions::seek(app, -10),
        KeyCode::Right => actions::seek(app, 10),
        KeyCode::Char('[') => actions::seek(app, -30),
        KeyCode::Char(']') => actions::seek(app, 30),
        KeyCode::Char('+') | KeyCode::Char('=') => actions::change_volume(app, 5),
        KeyCode::Char('-') => actions::change_volume(app, -5),
        KeyCode::Char('m') => actions::toggle_mute(app),
        KeyCode::Char('r') => actions::refresh_library(app),
        KeyCode::Char('a') => actions::begin_edit(app, EditTarget::AudioDir),
        _ => {}
    }
}

fn handle_editing_key(app: &mut App, key: KeyEvent) {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            let target = app.editing;
            actions::end_edit(app);
            if target == Some(EditTarget::HomeUrl) {
                actions::continue_from_home(app);
            }
        }
        KeyCode::Esc => {
            actions::end_edit(app);
        }
        KeyCode::Char(c) => {
            if control {
                match c {
                    'u' => actions::clear_to_start(app),
                    'k' => actions::clear_to_end(app),
                    'w' | 'h' => actions::delete_word_backwards(app),
                    'a' => actions::cursor_to_start(app),
                    'e' => actions::cursor_to_end(app),
                    _ => {}
                }
            } else {
                actions::insert_char(app, c);
            }
        }
        KeyCode::Backspace => {
            if control {
                actions::delete_word_backwards(app);
            } else {
                actions::delete_char(app);
            }
        }
        KeyCode::Delete => actions::delete_forward(app),
        KeyCode::Left => actions::move_cursor_left(app),
        KeyCode::Right => actions::move_cursor_right(app),
        KeyCode::Home => actions::cursor_to_start(app),
        KeyCode::End => actions::cursor_to_end(app),
        _ => {}
    }
}

fn cycle_page(app: &mut App) {
    let next = match app.page {
        Page::Home => Page::Download,
        Page::Download => {
            if app.mpv_available {
                Page::Player
            } else {
                Page::Home
            }
        }
        Page::Player => Page::Home,
    };
    actions::switch_page(app, next);
}

fn move_focus(app: &mut App, delta: i32) {
    let fields = DownloadField::all();
    let current = fields.iter().position(|f| *f == app.focus).unwrap_or(0);
    let next = if delta > 0 {
        (current + 1).min(fields.len() - 1)
    } else {
        current.saturating_sub(1)
    };
    app.focus = fields[next];
}

/// Enter on a field: text fields open for editing, toggles flip, choice
/// fields step forward.
fn activate_field(app: &mut App) {
    match app.focus {
        field if field.is_text() => actions::begin_edit(app, EditTarget::Form(field)),
        DownloadField::AudioOnly => {
            app.form.audio_only = !app.form.audio_only;
            app.form.sync_container();
        }
        DownloadField::PlaylistToggle => {
            app.form.playlist_enabled = !app.form.playlist_enabled;
        }
        _ => adjust_field(app, true),
    }
}

fn adjust_field(app: &mut App, forward: bool) {
    match app.focus {
        DownloadField::Quality => {
            app.form.quality = cycle(Quality::all(), app.form.quality, forward);
        }
        DownloadField::Resolution => {
            app.form.resolution_cap = cycle(ResolutionCap::all(), app.form.resolution_cap, forward);
        }
        DownloadField::Codec => {
            app.form.codec_preference =
                cycle(CodecPreference::all(), app.form.codec_preference, forward);
        }
        DownloadField::Container => app.form.cycle_container(forward),
        DownloadField::AudioOnly => {
            app.form.audio_only = !app.form.audio_only;
            app.form.sync_container();
        }
        DownloadField::PlaylistToggle => {
            app.form.playlist_enabled = !app.form.playlist_enabled;
        }
        DownloadField::PlaylistCount => {
            let count = app.form.playlist_count;
            app.form.playlist_count = if forward {
                count.saturating_add(1).min(999)
            } else {
                count.saturating_sub(1).max(1)
            };
        }
        _ => {}
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::state::AppState;

    fn test_app() -> App {
        App::new(AppState::default(), true, None)
    }

    #[tokio::test]
    async fn editing_inserts_at_cursor() {
        let mut app = test_app();
        app.page = Page::Download;
        app.focus = DownloadField::Url;
        actions::begin_edit(&mut app, EditTarget::Form(DownloadField::Url));
        for c in "https://a.b/c".chars() {
            actions::insert_char(&mut app, c);
        }
        actions::move_cursor_left(&mut app);
        actions::move_cursor_left(&mut app);
        actions::insert_char(&mut app, 'x');
        assert_eq!(app.form.url, "https://a.b/x/c");
    }

    #[tokio::test]
    async fn backspace_and_word_delete_respect_cursor() {
        let mut app = test_app();
        actions::begin_edit(&mut app, EditTarget::HomeUrl);
        for c in "one two".chars() {
            actions::insert_char(&mut app, c);
        }
        actions::delete_char(&mut app);
        assert_eq!(app.home_url, "one tw");
        actions::delete_word_backwards(&mut app);
        assert_eq!(app.home_url, "one ");
        actions::delete_word_backwards(&mut app);
        assert_eq!(app.home_url, "");
    }

    #[tokio::test]
    async fn focus_stops_at_list_edges() {
        let mut app = test_app();
        app.page = Page::Download;
        assert_eq!(app.focus, DownloadField::Url);
        move_focus(&mut app, -1);
        assert_eq!(app.focus, DownloadField::Url);
        for _ in 0..30 {
            move_focus(&mut app, 1);
        }
        assert_eq!(app.focus, DownloadField::PlaylistCount);
    }

    #[tokio::test]
    async fn audio_toggle_keeps_container_valid() {
        let mut app = test_app();
        app.page = Page::Download;
        app.focus = DownloadField::AudioOnly;
        activate_field(&mut app);
        assert!(app.form.audio_only);
        assert_eq!(app.form.container, "m4a");
    }

    #[tokio::test]
    async fn playlist_count_stays_in_range() {
        let mut app = test_app();
        app.focus = DownloadField::PlaylistCount;
        app.form.playlist_count = 1;
        adjust_field(&mut app, false);
        assert_eq!(app.form.playlist_count, 1);
        adjust_field(&mut app, true);
        assert_eq!(app.form.playlist_count, 2);
    }

    #[tokio::test]
    async fn paste_on_home_page_lands_in_url_box() {
        let mut app = test_app();
        actions::handle_paste(&mut app, "https://example.com/v".to_string());
        assert_eq!(app.home_url, "https://example.com/v");
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[tokio::test]
    async fn cancel_without_a_running_job_does_nothing() {
        let mut app = test_app();
        app.page = Page::Download;
        handle_normal_key(&mut app, KeyCode::Char('c'));
        assert_eq!(app.job_phase, crate::model::JobPhase::Idle);
        assert_eq!(app.status_message, None);
    }
}
