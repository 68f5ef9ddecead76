//
// SPDX-License-Identifier: MIT
//

//! The timer subsystem (see §4.4.4–§4.4.6 and the design notes): three
//! independent periodic duties, each its own Tokio task driven by
//! `tokio::time::interval`, selecting against the shared shutdown signal at
//! every tick so the daemon exits promptly.

use std::time::Duration;

use chrono::Utc;

use crate::codec::Message;
use crate::io;
use crate::log::Event;
use crate::node::Endpoint;
use crate::shared::Ctx;
use crate::SharedCtx;

pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);
pub const LIVENESS_SWEEP_INTERVAL: Duration = Duration::from_secs(5);
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(15);
pub const DISPLAY_INTERVAL: Duration = Duration::from_secs(30);
pub const INITIAL_JOIN_DELAY: Duration = Duration::from_secs(1);

/// Sends one join announce to every configured neighbor after a brief
/// settling delay, letting the receive loop arm first (§4.4.6).
pub async fn initial_join(ctx: SharedCtx) {
    tokio::select! {
        _ = tokio::time::sleep(INITIAL_JOIN_DELAY) => {}
        _ = wait_for_shutdown(&ctx) => return,
    }

    let outbox = announce_set(&ctx);
    io::send_all(&ctx, outbox).await;
}

/// Every `KEEPALIVE_INTERVAL`, sends a join announce to every neighbor and,
/// where the split-horizon vector for that neighbor is non-empty, one
/// vector advertisement too (§4.4.5).
pub async fn keepalive_loop(ctx: SharedCtx) {
    let mut tick = tokio::time::interval(KEEPALIVE_INTERVAL);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut shutdown = ctx.shutdown_rx();

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = shutdown.changed() => return,
        }
        if *shutdown.borrow() {
            return;
        }

        let mut outbox = announce_set(&ctx);
        outbox.extend(vector_set(&ctx));
        io::send_all(&ctx, outbox).await;
    }
}

/// Every `LIVENESS_SWEEP_INTERVAL`, declares dead any neighbor silent for
/// longer than `LIVENESS_TIMEOUT`, purges routes through it, and drops it
/// from the registry (§4.4.4). The resulting table change is not broadcast
/// immediately; it surfaces in the next keepalive.
pub async fn liveness_loop(ctx: SharedCtx) {
    let mut tick = tokio::time::interval(LIVENESS_SWEEP_INTERVAL);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut shutdown = ctx.shutdown_rx();

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = shutdown.changed() => return,
        }
        if *shutdown.borrow() {
            return;
        }

        let mut state = ctx.shared.lock().unwrap();
        let dead = state.neighbors.stale(LIVENESS_TIMEOUT, Utc::now());
        for neighbor in dead {
            state.table.purge_through(&neighbor);
            state.neighbors.drop(&neighbor);
            Event::NeighborFailed { neighbor: &neighbor }.log();
        }
    }
}

/// Every `DISPLAY_INTERVAL`, prints a timestamped dump of the routing
/// table.
pub async fn display_loop(ctx: SharedCtx) {
    let mut tick = tokio::time::interval(DISPLAY_INTERVAL);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut shutdown = ctx.shutdown_rx();

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = shutdown.changed() => return,
        }
        if *shutdown.borrow() {
            return;
        }
        print_table(&ctx);
    }
}

/// Snapshots and prints the routing table, shared by the display ticker and
/// the `tabela` command.
pub fn print_table(ctx: &Ctx) {
    let state = ctx.shared.lock().unwrap();
    println!("--- {} ---", Utc::now().format("%Y-%m-%d %H:%M:%S"));
    if state.table.is_empty() {
        println!("(no routes)");
    }
    for route in state.table.iter_sorted() {
        println!(
            "{:<20} metric={:<3} next_hop={}",
            route.destination.as_str(),
            route.metric,
            route.next_hop
        );
    }
}

fn announce_set(ctx: &Ctx) -> Vec<(Endpoint, Vec<u8>)> {
    let state = ctx.shared.lock().unwrap();
    let Some(bytes) = Message::Join(ctx.self_id.clone()).encode() else {
        return Vec::new();
    };
    state
        .neighbors
        .iter()
        .map(|nbr| {
            Event::Announce { to: &nbr.id }.log();
            (nbr.endpoint.clone(), bytes.clone())
        })
        .collect()
}

fn vector_set(ctx: &Ctx) -> Vec<(Endpoint, Vec<u8>)> {
    let state = ctx.shared.lock().unwrap();
    state.broadcast_set()
}

async fn wait_for_shutdown(ctx: &Ctx) {
    let mut rx = ctx.shutdown_rx();
    if *rx.borrow() {
        return;
    }
    let _ = rx.changed().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Net;
    use crate::node::{Endpoint as Ep, NodeId};

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    async fn ctx(self_id: &str) -> SharedCtx {
        let net = Net::bind(0).await.unwrap();
        Ctx::new(id(self_id), net)
    }

    #[tokio::test]
    async fn liveness_sweep_purges_and_drops_stale_neighbors() {
        let ctx = ctx("A").await;
        {
            let mut state = ctx.shared.lock().unwrap();
            state.neighbors.add(id("B"), Ep::new(id("B"), 6001));
            state.table.upsert(id("B"), 1, id("B"));
            state.table.upsert(id("C"), 2, id("B"));
            // Force staleness by back-dating last-heard via a future threshold.
        }
        let dead = {
            let state = ctx.shared.lock().unwrap();
            state
                .neighbors
                .stale(Duration::from_secs(0), Utc::now() + chrono::Duration::seconds(1))
        };
        assert_eq!(dead, vec![id("B")]);

        let mut state = ctx.shared.lock().unwrap();
        for neighbor in dead {
            state.table.purge_through(&neighbor);
            state.neighbors.drop(&neighbor);
        }
        assert!(state.table.is_empty());
        assert!(state.neighbors.is_empty());
    }

    #[tokio::test]
    async fn announce_set_covers_every_neighbor() {
        let ctx = ctx("A").await;
        {
            let mut state = ctx.shared.lock().unwrap();
            state.neighbors.add(id("B"), Ep::new(id("B"), 6001));
            state.neighbors.add(id("C"), Ep::new(id("C"), 6002));
        }
        assert_eq!(announce_set(&ctx).len(), 2);
    }
}
