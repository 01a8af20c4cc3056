//! Configuration for the notes demo.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{DemoConfig, LogFormat};
