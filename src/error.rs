//
// SPDX-License-Identifier: MIT
//

//! Error taxonomy. Configuration errors are fatal at startup; I/O errors
//! are logged and absorbed by the layer that observes them (see §7 of the
//! design notes). Wire-level parse errors are not represented here at all:
//! per the codec's decoder contract they are dropped in place.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file {path} not found")]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("self node id must not be empty")]
    EmptySelfId,
}

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("failed to bind UDP socket on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve endpoint {endpoint}")]
    Resolve { endpoint: String },

    #[error("failed to send datagram to {endpoint}: {source}")]
    Send {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to receive datagram: {source}")]
    Recv {
        #[source]
        source: std::io::Error,
    },
}
