use std::path::PathBuf;

use clap::Parser;

use crate::RouterOptions;

// Large enough for a base64 phone photo inside a JSON body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Pin server: stores reported photos and their locations on local disk.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Host name or IP address to bind
    #[arg(long, env = "PIN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PIN_PORT", default_value_t = 5001)]
    pub port: u16,

    /// JSON file holding the location records
    #[arg(long, env = "PIN_DATA_FILE", default_value = "data/pin_state.json")]
    pub data_file: PathBuf,

    /// Directory uploaded images are written to
    #[arg(long, env = "PIN_IMAGE_DIR", default_value = "data/images")]
    pub image_dir: PathBuf,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "PIN_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Verbose error bodies and debug-level logs
    #[arg(long, env = "PIN_DEBUG")]
    pub debug: bool,

    /// Allow cross-origin requests from any origin
    #[arg(long, env = "PIN_CORS")]
    pub cors: bool,
}

impl Config {
    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            debug: self.debug,
            cors: self.cors,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_development_setup() {
        let cfg = Config::parse_from(["cockpin_server"]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.data_file, PathBuf::from("data/pin_state.json"));
        assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(!cfg.debug);
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::parse_from([
            "cockpin_server",
            "--host",
            "localhost",
            "--port",
            "8080",
            "--image-dir",
            "/tmp/pins",
            "--max-body-bytes",
            "1024",
            "--debug",
        ]);
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.image_dir, PathBuf::from("/tmp/pins"));
        assert_eq!(cfg.log_level(), "debug");

        let opts = cfg.router_options();
        assert_eq!(opts.max_body_bytes, 1024);
        assert!(opts.debug);
    }
}
