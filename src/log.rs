//
// SPDX-License-Identifier: MIT
//

//! Console output. Every loggable event in the daemon is a variant of
//! [`Event`], rendered through `tracing` with the category tag named in the
//! external-interfaces section of the design. Mirrors the teacher's
//! `debug.rs`/`error.rs` split between a small loggable-event enum and a
//! `log()` method, collapsed into a single enum since this daemon has only
//! one severity axis worth distinguishing (info vs. warn).

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::node::{Endpoint, NodeId};

/// Installs the global `tracing` subscriber. `RUST_LOG` controls verbosity
/// as usual; absent that, the daemon's own target logs at `debug` when
/// `verbose` is set and `info` otherwise, with third-party crates held to
/// `warn`.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        format!("{}=debug,warn", env!("CARGO_PKG_NAME"))
    } else {
        format!("{}=info,warn", env!("CARGO_PKG_NAME"))
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub enum Event<'a> {
    Init {
        self_id: &'a NodeId,
        port: u16,
        neighbors: &'a [NodeId],
    },
    ConfigPortOverride(u16),
    ConfigBadLine(&'a str),
    Announce {
        to: &'a NodeId,
    },
    NewRoute {
        dst: &'a NodeId,
        via: &'a NodeId,
        metric: u16,
    },
    RouteImproved {
        dst: &'a NodeId,
        via: &'a NodeId,
        old: u16,
        new: u16,
    },
    RouteRemoved {
        dst: &'a NodeId,
        via: &'a NodeId,
    },
    NeighborFailed {
        neighbor: &'a NodeId,
    },
    MessageReceived {
        src: &'a NodeId,
        body: &'a str,
    },
    MessageRelayed {
        src: &'a NodeId,
        dst: &'a NodeId,
        next_hop: &'a NodeId,
    },
    NoRoute {
        dst: &'a NodeId,
    },
    SendFailed {
        target: &'a Endpoint,
        error: &'a dyn std::fmt::Display,
    },
    RecvFailed {
        error: &'a dyn std::fmt::Display,
    },
    UnknownCommand(&'a str),
}

impl Event<'_> {
    pub fn log(&self) {
        match self {
            Event::Init {
                self_id,
                port,
                neighbors,
            } => {
                let names: Vec<&str> = neighbors.iter().map(NodeId::as_str).collect();
                info!(
                    "[INIT] router {self_id} listening on port {port}; neighbors: {}",
                    names.join(", ")
                );
            }
            Event::ConfigPortOverride(port) => {
                info!("[CONFIG] port configured: {port}");
            }
            Event::ConfigBadLine(line) => {
                warn!("[AVISO] invalid configuration line: {line}");
            }
            Event::Announce { to } => {
                info!("[ANÚNCIO] announced to {to}");
            }
            Event::NewRoute { dst, via, metric } => {
                info!("[NOVA ROTA] {dst} via {via} (metric: {metric})");
            }
            Event::RouteImproved { dst, via, old, new } => {
                info!("[ROTA MELHORADA] {dst}: {old} -> {new} via {via}");
            }
            Event::RouteRemoved { dst, via } => {
                info!("[ROTA REMOVIDA] {dst} (no longer advertised by {via})");
            }
            Event::NeighborFailed { neighbor } => {
                warn!("[FALHA DETECTADA] neighbor {neighbor} inactive (silent for 15s)");
            }
            Event::MessageReceived { src, body } => {
                info!("[MENSAGEM RECEBIDA] origin: {src} message: {body}");
            }
            Event::MessageRelayed { src, dst, next_hop } => {
                info!("[MENSAGEM ROTEADA] origin: {src} destination: {dst} next hop: {next_hop}");
            }
            Event::NoRoute { dst } => {
                warn!("[ERRO] no route to {dst}");
            }
            Event::SendFailed { target, error } => {
                warn!("[ERRO] failed to send to {target}: {error}");
            }
            Event::RecvFailed { error } => {
                warn!("[ERRO] failed to receive datagram: {error}");
            }
            Event::UnknownCommand(cmd) => {
                info!("unknown command: {cmd}");
            }
        }
    }
}
