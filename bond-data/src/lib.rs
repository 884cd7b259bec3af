pub mod files;
pub mod scenario;

pub use files::LocalDirectory;
pub use scenario::{ScenarioLoader, ScenarioLoaderError, ScenarioRow};
