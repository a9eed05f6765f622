use anyhow::{Context, Result};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Socket path unique to this process, so two instances never share an
/// mpv.
pub fn socket_path() -> String {
    if cfg!(windows) {
        format!(r"\\.\pipe\beluga-mpv-{}", std::process::id())
    } else {
        format!("/tmp/beluga-mpv-{}.sock", std::process::id())
    }
}

/// Bridges the app and a running mpv: commands arriving on `commands`
/// are written to the IPC socket, every response line goes back on
/// `responses`. Returns once the command channel closes or mpv goes
/// away.
#[cfg(unix)]
pub async fn run(
    socket: String,
    mut commands: UnboundedReceiver<String>,
    responses: UnboundedSender<String>,
) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixStream;

    // mpv needs a moment to create the socket after spawning.
    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    let stream = UnixStream::connect(&socket)
        .await
        .with_context(|| format!("could not reach mpv at {}", socket))?;
    log::info!("Connected to mpv IPC socket: {}", socket);

    let (read_half, mut write_half) = stream.into_split();
    let pump = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if responses.send(line).is_err() {
                break;
            }
        }
    });

    while let Some(command) = commands.recv().await {
        if write_half.write_all(command.as_bytes()).await.is_err() {
            break;
        }
        let _ = write_half.flush().await;
    }

    pump.abort();
    let _ = tokio::fs::remove_file(&socket).await;
    Ok(())
}

#[cfg(not(unix))]
pub async fn run(
    socket: String,
    mut commands: UnboundedReceiver<String>,
    _responses: UnboundedSender<String>,
) -> Result<()> {
    log::warn!("mpv IPC is only wired up on unix; ignoring {}", socket);
    while commands.recv().await.is_some() {}
    Ok(())
}
