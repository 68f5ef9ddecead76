//
// SPDX-License-Identifier: MIT
//

//! The single coarse mutual-exclusion domain covering the routing table and
//! the neighbor registry (see the concurrency model in the design notes).
//! Every task that touches routing state locks this, performs every read
//! and write that must appear atomic, computes the outbound `(endpoint,
//! bytes)` set, then releases the lock before any outbound I/O.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::neighbor::NeighborSet;
use crate::node::{Endpoint, NodeId};
use crate::route::RoutingTable;

pub struct Shared {
    pub table: RoutingTable,
    pub neighbors: NeighborSet,
}

impl Shared {
    pub fn new(self_id: NodeId) -> Self {
        Shared {
            table: RoutingTable::new(self_id),
            neighbors: NeighborSet::new(),
        }
    }

    /// The per-neighbor split-horizon vector messages that would need to go
    /// out right now, paired with the endpoint to send each to. Computed
    /// entirely under the caller's lock; the caller releases the lock
    /// before sending any of these.
    pub fn broadcast_set(&self) -> Vec<(Endpoint, Vec<u8>)> {
        self.neighbors
            .iter()
            .filter_map(|nbr| {
                let records = self.table.advertisable(&nbr.id);
                crate::codec::Message::Vector(records)
                    .encode()
                    .map(|bytes| (nbr.endpoint.clone(), bytes))
            })
            .collect()
    }
}

/// Shared handles threaded through every task: the daemon's own identity,
/// the UDP transport, the mutex-guarded routing state, and the cooperative
/// shutdown signal every task selects on at its suspension points.
pub struct Ctx {
    pub self_id: NodeId,
    pub net: crate::network::Net,
    pub shared: Mutex<Shared>,
    pub shutdown_tx: watch::Sender<bool>,
}

pub type SharedCtx = Arc<Ctx>;

impl Ctx {
    pub fn new(self_id: NodeId, net: crate::network::Net) -> SharedCtx {
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(Ctx {
            shared: Mutex::new(Shared::new(self_id.clone())),
            self_id,
            net,
            shutdown_tx,
        })
    }

    /// Broadcasts shutdown to every task observing `shutdown_rx`. Idempotent.
    pub fn shut_down(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }
}
