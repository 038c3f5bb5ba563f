//! User configuration (`bento.toml` in the data directory).

pub mod settings;

pub use settings::Settings;
