use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "Beluga")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(help_template = "NAME:
   {name} - Terminal Video Downloader & Audio Player

USAGE:
   beluga [url] [global options]

VERSION:
   {version}

DESCRIPTION:
   {name} is a terminal front end for yt-dlp and mpv. Paste a video URL,
   tune quality, codec and container on the download form, and watch the
   progress bar fill. Finished audio lands in your library, playable
   without leaving the terminal.

   Controls:
     • Press 1/2/3 to switch between Home, Download and Player
     • Press e to edit the highlighted text box
     • Press s to start a download, c to cancel it
     • Press q to quit

GLOBAL OPTIONS:
{options}
")]
pub struct Cli {
    /// Video URL to preload into the download form
    pub url: Option<String>,

    /// Folder downloads are written to (overrides the saved one)
    #[arg(short = 'f', long = "folder", value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Write the log somewhere other than the default location
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// print the version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub show_version: Option<bool>,
}
