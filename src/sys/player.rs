use anyhow::Result;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Child;

/// Starts mpv on a local audio file, wired for JSON IPC control.
/// The TUI owns the terminal, so mpv gets no window and no stdio.
pub fn spawn_player(path: &Path, socket_path: &str, volume: u8, muted: bool) -> Result<Child> {
    let mut cmd = tokio::process::Command::new("mpv");
    cmd.arg("--no-video");
    cmd.arg("--really-quiet");
    cmd.arg(format!("--input-ipc-server={}", socket_path));
    cmd.arg(format!("--volume={}", volume));
    cmd.arg(format!("--mute={}", if muted { "yes" } else { "no" }));
    cmd.arg(path);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd.kill_on_drop(true);

    log::info!("Starting playback: {}", path.display());
    let child = cmd.spawn().map_err(|e| {
        log::error!("Failed to spawn mpv: {}", e);
        e
    })?;
    Ok(child)
}
