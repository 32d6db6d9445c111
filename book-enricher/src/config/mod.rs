//! Configuration and dependency wiring for the book enricher.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::EnricherConfig;
