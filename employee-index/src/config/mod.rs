//! Configuration and dependency wiring.

mod dependencies;
pub mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
