pub mod app;
pub mod commands;
pub mod config;
pub mod logging;

pub use app::{Step, TrainerApp};
pub use config::TrainerConfig;
