//! Runtime configuration resolved from the environment.
//!
//! - `TASKHERD_FILE` - path of the JSON data file, default `$HOME/.taskherd.json`
//! - `TASKHERD_LISTEN` - bind address for `serve`, default `127.0.0.1:8080`

use std::path::PathBuf;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the whole task collection.
    pub data_file: PathBuf,
    /// Address the web interface binds to.
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let data_file = std::env::var_os("TASKHERD_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".taskherd.json")
            });
        let listen_addr =
            std::env::var("TASKHERD_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        Self {
            data_file,
            listen_addr,
        }
    }
}
