mod app;
pub mod background;
pub mod config;
mod effects;
mod logging;
pub mod persistence;
mod ui;

pub use app::run_app;
