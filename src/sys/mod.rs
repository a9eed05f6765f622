pub mod deps;
pub mod download;
pub mod library;
pub mod logging;
pub mod mpv_ipc;
pub mod player;
pub mod progress;
pub mod state;
