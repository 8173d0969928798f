//! Sandbox paths used by the plugin shim and the tracing setup.

pub mod paths;

pub use paths::{credentials_file, expand_tilde, get_data_dir};
