//! Export configuration: credentials from the environment, settings from an optional YAML file.

pub mod credentials;
pub mod loader;
pub mod modules;
pub mod settings;
