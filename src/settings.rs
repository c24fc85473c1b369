use config::{Config, Environment, File};
use serde::Deserialize;

use crate::{error::Error, result::Result};

#[derive(Debug, Deserialize)]
pub struct NodeSettings {
    pub node_id: u64,
    pub irc_port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_capacity")]
    pub max_connections: usize,
    #[serde(default = "default_capacity")]
    pub max_channels: usize,
    #[serde(default = "default_capacity")]
    pub max_channel_members: usize,
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_reply_queue_len")]
    pub reply_queue_len: usize,
    #[serde(default)]
    pub nodes: Vec<NodeSettings>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_capacity() -> usize {
    1024
}

fn default_max_name_len() -> usize {
    64
}

fn default_reply_queue_len() -> usize {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: default_host(),
            max_connections: default_capacity(),
            max_channels: default_capacity(),
            max_channel_members: default_capacity(),
            max_name_len: default_max_name_len(),
            reply_queue_len: default_reply_queue_len(),
            nodes: vec![],
        }
    }
}

impl Settings {
    /// Reads `path` (extension optional), then applies `SIRCD_*` overrides.
    pub fn new(path: &str) -> Result<Self> {
        let mut s = Config::new();
        s.merge(File::with_name(path))?;
        s.merge(Environment::with_prefix("SIRCD"))?;

        Ok(s.try_into()?)
    }

    /// The port this node listens on for clients.
    pub fn irc_port(&self, node_id: u64) -> Result<u16> {
        self.nodes
            .iter()
            .find(|n| n.node_id == node_id)
            .map(|n| n.irc_port)
            .ok_or(Error::InvalidNodeId { node_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_nodes() -> Settings {
        Settings {
            nodes: vec![
                NodeSettings {
                    node_id: 1,
                    irc_port: 20102,
                },
                NodeSettings {
                    node_id: 2,
                    irc_port: 20202,
                },
            ],
            ..Settings::default()
        }
    }

    #[test]
    fn irc_port_resolves_node() {
        assert_eq!(20202, with_nodes().irc_port(2).unwrap());
    }

    #[test]
    fn irc_port_unknown_node_errors() {
        let err = with_nodes().irc_port(7).unwrap_err();

        assert_eq!("Invalid NodeID 7", err.to_string());
    }

    #[test]
    fn new_reads_toml_file_with_defaults() {
        let path = std::env::temp_dir().join(format!("sircd-settings-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "max_connections = 16\n\n[[nodes]]\nnode_id = 1\nirc_port = 6667\n",
        )
        .unwrap();

        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(16, settings.max_connections);
        assert_eq!(64, settings.max_name_len);
        assert_eq!("0.0.0.0", settings.host);
        assert_eq!(6667, settings.irc_port(1).unwrap());
    }

    #[test]
    fn new_missing_file_errors() {
        let err = Settings::new("/nonexistent/sircd-settings").unwrap_err();

        assert!(matches!(err, Error::Settings(_)));
    }
}
