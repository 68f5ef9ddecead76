//
// SPDX-License-Identifier: MIT
//

//! Startup configuration: the CLI invocation plus the neighbor file. The
//! parser is a pure function of `(self id, default port, file contents)`,
//! so it is fully unit-testable without touching a filesystem or socket.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::ConfigError;
use crate::log::Event;
use crate::node::NodeId;

pub const DEFAULT_PORT: u16 = 6000;
pub const DEFAULT_CONFIG_FILE: &str = "roteadores.txt";

#[derive(Parser, Debug)]
#[command(name = "vectord", about = "Distance-vector routing daemon")]
pub struct Cli {
    /// This router's own node identifier (in practice its IP address).
    pub self_node_id: String,

    /// Listening UDP port; overridden by a `PORTA=` line in the config file.
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the neighbor configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Raise the tracing filter to `debug` for this crate.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub self_id: NodeId,
    pub port: u16,
    /// Direct neighbors discovered in the config file, each with the port
    /// to reach it on.
    pub neighbors: Vec<(NodeId, u16)>,
}

/// Loads neighbor configuration from `path`, starting from `default_port`
/// (normally the CLI-supplied port). A `PORTA=` line overrides the port
/// from that point in the file onward; neighbor lines seen before such an
/// override use the port in effect when they were read, matching the
/// reference implementation's sequential, non-retroactive behavior.
pub fn load(self_id: &NodeId, default_port: u16, path: &Path) -> Result<Config, ConfigError> {
    if self_id.as_str().is_empty() {
        return Err(ConfigError::EmptySelfId);
    }

    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut port = default_port;
    let mut neighbors = Vec::new();

    for raw_line in contents.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(value) = strip_key_prefix(line, "PORTA=") {
            match value.trim().parse::<u16>() {
                Ok(p) => {
                    port = p;
                    Event::ConfigPortOverride(p).log();
                }
                Err(_) => Event::ConfigBadLine(raw_line.trim()).log(),
            }
            continue;
        }

        if let Some((node, port_str)) = line.split_once(':') {
            let node = node.trim();
            if node.is_empty() || node == self_id.as_str() {
                continue;
            }
            match port_str.trim().parse::<u16>() {
                Ok(p) => neighbors.push((NodeId::new(node), p)),
                Err(_) => Event::ConfigBadLine(raw_line.trim()).log(),
            }
        } else if line != self_id.as_str() {
            neighbors.push((NodeId::new(line), port));
        }
    }

    Ok(Config {
        self_id: self_id.clone(),
        port,
        neighbors,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn strip_key_prefix<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    if line
        .get(..key.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(key))
    {
        Some(&line[key.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_reported_distinctly() {
        let err = load(&NodeId::new("A"), 6000, Path::new("/no/such/file")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn parses_neighbors_comments_and_port_override() {
        let file = write_config(
            "# leading comment\n\
             B\n\
             \n\
             C:7001 # inline comment\n\
             porta=7000\n\
             D\n\
             A\n",
        );
        let cfg = load(&NodeId::new("A"), 6000, file.path()).unwrap();
        assert_eq!(cfg.port, 7000);
        assert_eq!(
            cfg.neighbors,
            vec![
                (NodeId::new("B"), 6000),
                (NodeId::new("C"), 7001),
                (NodeId::new("D"), 7000),
            ]
        );
    }

    #[test]
    fn self_id_is_never_added_as_a_neighbor() {
        let file = write_config("A\nB\n");
        let cfg = load(&NodeId::new("A"), 6000, file.path()).unwrap();
        assert_eq!(cfg.neighbors, vec![(NodeId::new("B"), 6000)]);
    }

    #[test]
    fn malformed_port_is_skipped_not_fatal() {
        let file = write_config("PORTA=notanumber\nB\n");
        let cfg = load(&NodeId::new("A"), 6000, file.path()).unwrap();
        assert_eq!(cfg.port, 6000);
        assert_eq!(cfg.neighbors, vec![(NodeId::new("B"), 6000)]);
    }

    #[test]
    fn a_neighbor_line_starting_with_a_multibyte_char_boundary_mismatch_does_not_panic() {
        // "PORTA" (5 ASCII bytes) followed by a multibyte UTF-8 char lands
        // the `PORTA=` prefix check's byte index mid-character.
        let file = write_config("PORTA\u{c9}\n");
        let cfg = load(&NodeId::new("A"), 6000, file.path()).unwrap();
        assert_eq!(cfg.port, 6000);
        assert_eq!(cfg.neighbors, vec![(NodeId::new("PORTA\u{c9}"), 6000)]);
    }
}
