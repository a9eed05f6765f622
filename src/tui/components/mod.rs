pub mod download;
pub mod home;
pub mod logo;
pub mod player;
pub mod status_bar;
pub mod theme;
pub mod widgets;
