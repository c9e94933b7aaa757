// src/config/mod.rs
pub mod settings;

pub use settings::{
    listen_port, load_settings_default, load_settings_from, reddit_credentials_from_env, Settings,
};
