pub mod config;
pub mod error;
pub mod logging;

pub mod navigation;
pub mod resolver;
pub mod scan;

pub use config::EngineConfig;
pub use error::Result;
