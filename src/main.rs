mod app;
mod cli;
mod model;
mod sys;
mod tui;

use anyhow::Result;
use app::{App, actions, handlers, updates};
use clap::Parser;
use cli::Cli;
use crossterm::{
    event::{self, Event},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::process::exit;
use std::{
    io,
    time::{Duration, Instant},
};
use sys::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(sys::state::default_log_path);
    if let Err(e) = sys::logging::init_logger(log_path) {
        eprintln!("WARNING: could not open the log file: {}", e);
    }

    println!("Checking yt-dlp and mpv...");
    let tools = match sys::deps::probe() {
        Ok(tools) => tools,
        Err(e) => {
            eprintln!("{:#}", e);
            exit(1);
        }
    };
    println!("yt-dlp {}", tools.yt_dlp);
    if !tools.mpv {
        println!("mpv was not found on PATH; downloads still work, playback is disabled.");
    }

    let mut state = AppState::load();
    state.ensure_storage();
    if let Some(folder) = &cli.folder {
        state.last_folder_path = folder.display().to_string();
    }
    log::info!("Starting Beluga {}", env!("CARGO_PKG_VERSION"));

    // Bracketed paste makes pasted URLs arrive as one event instead of a key burst.
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(state, tools.mpv, cli.url.clone());

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::ui(f, &app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handlers::handle_key_event(&mut app, key),
                Event::Paste(text) => actions::handle_paste(&mut app, text),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            updates::on_tick(&mut app);
            last_tick = Instant::now();
        }

        if !app.running {
            break;
        }
    }

    // Remember the window size for the next session.
    if let Ok(size) = terminal.size() {
        app.state.window_size = Some((size.width, size.height));
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    actions::stop_playback(&mut app);
    app.state.last_page = app.page.slug().to_string();
    app.state.save();
    log::info!("Beluga shut down cleanly");

    Ok(())
}
