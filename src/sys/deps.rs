use std::process::Command;

use anyhow::{Context, Result, bail};

/// What the startup probe found. yt-dlp is required; a missing mpv only
/// disables the player page.
pub struct ExternalTools {
    pub yt_dlp: String,
    pub mpv: bool,
}

pub fn probe() -> Result<ExternalTools> {
    Ok(ExternalTools {
        yt_dlp: yt_dlp_version()?,
        mpv: mpv_present(),
    })
}

fn yt_dlp_version() -> Result<String> {
    let output = Command::new("yt-dlp")
        .arg("--version")
        .output()
        .context("yt-dlp is not runnable. Install it and make sure it is on PATH.")?;
    if !output.status.success() {
        bail!("yt-dlp --version exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn mpv_present() -> bool {
    Command::new("mpv")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
