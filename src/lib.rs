//
// SPDX-License-Identifier: MIT
//

//! A distance-vector routing daemon for an overlay network. Every node
//! maintains a routing table of (destination, metric, next hop), exchanges
//! partial vectors with direct neighbors over UDP, converges on shortest
//! paths, detects neighbor failures by silence timeout, and forwards
//! application text messages along the computed routes.

pub mod codec;
pub mod command;
pub mod config;
pub mod convergence;
pub mod daemon;
pub mod error;
pub mod forward;
pub mod io;
pub mod log;
pub mod neighbor;
pub mod network;
pub mod node;
pub mod receive;
pub mod route;
pub mod shared;
pub mod timer;

pub use shared::{Ctx, SharedCtx};
