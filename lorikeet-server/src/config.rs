//! Server configuration from CLI arguments.

use clap::Parser;
use lorikeet_asr::artifact::DEFAULT_MODEL_DIR;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lorikeet-server")]
#[command(about = "HTTP transcription server for Parakeet models")]
#[command(version)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = 8787)]
    pub port: u16,

    /// Directory containing the model snapshot
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_loopback() {
        let config = ServerConfig::parse_from(["lorikeet-server"]);

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8787");
        assert_eq!(config.model_dir, PathBuf::from(DEFAULT_MODEL_DIR));
    }

    #[test]
    fn parses_overrides() {
        let config = ServerConfig::parse_from([
            "lorikeet-server",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--model-dir",
            "/models/parakeet",
        ]);

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.model_dir, PathBuf::from("/models/parakeet"));
    }
}
