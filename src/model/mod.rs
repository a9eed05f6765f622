pub mod download;
pub mod local;

pub use download::{
    CodecPreference, DownloadRequest, JobEvent, JobPhase, Quality, ResolutionCap,
};
pub use local::LocalTrack;
