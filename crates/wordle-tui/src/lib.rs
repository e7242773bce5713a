pub mod app;
pub mod config;
pub mod logging;
pub mod net;
pub mod ui;
