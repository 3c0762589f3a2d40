pub mod api;
pub mod app;
pub mod config;
pub mod effects;
pub mod errors;
pub mod import;
pub mod logging;
pub mod progress;
pub mod simulated;
pub mod state;
pub mod types;
pub mod ui;
