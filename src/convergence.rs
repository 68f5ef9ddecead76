//
// SPDX-License-Identifier: MIT
//

//! Convergence logic: applies join announcements and vector advertisements
//! to the routing table, implements split-horizon on outbound traffic, and
//! decides when to broadcast. This is the heart of the daemon (see §4.4 of
//! the design notes).

use std::net::SocketAddr;

use crate::codec::Message;
use crate::io;
use crate::log::Event;
use crate::node::{Endpoint, NodeId};
use crate::shared::Ctx;

/// Processes a join announce from `sender`, observed arriving from
/// `from_addr`. A no-op if `sender` is the self node.
pub async fn handle_join(ctx: &Ctx, sender: NodeId, from_addr: SocketAddr) {
    if sender == ctx.self_id {
        return;
    }
    let endpoint = Endpoint::new(sender.clone(), from_addr.port());

    let (reply, broadcast) = {
        let mut state = ctx.shared.lock().unwrap();

        let newly_added = state.neighbors.add(sender.clone(), endpoint.clone());
        if !newly_added {
            state.neighbors.note_activity(&sender, endpoint.clone());
        }

        let changed = match state.table.lookup(&sender) {
            None => {
                state.table.upsert(sender.clone(), 1, sender.clone());
                Event::NewRoute {
                    dst: &sender,
                    via: &sender,
                    metric: 1,
                }
                .log();
                true
            }
            Some(route) if route.metric > 1 => {
                let old = route.metric;
                state.table.upsert(sender.clone(), 1, sender.clone());
                Event::RouteImproved {
                    dst: &sender,
                    via: &sender,
                    old,
                    new: 1,
                }
                .log();
                true
            }
            _ => false,
        };

        let reply = Message::Vector(state.table.advertisable(&sender)).encode();
        let broadcast = if changed {
            state.broadcast_set()
        } else {
            Vec::new()
        };
        (reply, broadcast)
    };

    if let Some(bytes) = reply {
        io::send_one(ctx, &endpoint, &bytes).await;
    }
    if !broadcast.is_empty() {
        io::send_all(ctx, broadcast).await;
    }
}

/// Processes a vector advertisement from `sender`, observed arriving from
/// `from_addr`. Datagrams from a node that is not (yet) a known neighbor
/// are dropped: accepting them would install routes whose next hop is not
/// a NeighborSet member, violating the table's core invariant. Only a join
/// announce can establish a new neighbor relationship.
pub async fn handle_vector(
    ctx: &Ctx,
    sender: NodeId,
    from_addr: SocketAddr,
    records: Vec<(NodeId, u16)>,
) {
    let broadcast = {
        let mut state = ctx.shared.lock().unwrap();
        if !state.neighbors.contains(&sender) {
            return;
        }
        state
            .neighbors
            .note_activity(&sender, Endpoint::new(sender.clone(), from_addr.port()));

        let mut changed = false;
        let advertised: std::collections::HashSet<&NodeId> =
            records.iter().map(|(dst, _)| dst).collect();

        for (dst, metric) in &records {
            if *dst == ctx.self_id {
                continue;
            }
            let candidate = metric.saturating_add(1);
            match state.table.lookup(dst) {
                None => {
                    state.table.upsert(dst.clone(), candidate, sender.clone());
                    Event::NewRoute {
                        dst,
                        via: &sender,
                        metric: candidate,
                    }
                    .log();
                    changed = true;
                }
                Some(route) => {
                    if candidate < route.metric {
                        let old = route.metric;
                        state.table.upsert(dst.clone(), candidate, sender.clone());
                        Event::RouteImproved {
                            dst,
                            via: &sender,
                            old,
                            new: candidate,
                        }
                        .log();
                        changed = true;
                    } else if route.next_hop == sender && candidate != route.metric {
                        // The link through our current next hop changed
                        // (possibly degraded): accept it anyway, or the
                        // route would freeze at a stale metric forever.
                        let old = route.metric;
                        state.table.upsert(dst.clone(), candidate, sender.clone());
                        Event::RouteImproved {
                            dst,
                            via: &sender,
                            old,
                            new: candidate,
                        }
                        .log();
                        changed = true;
                    }
                }
            }
        }

        let withdrawn: Vec<NodeId> = state
            .table
            .iter_sorted()
            .filter(|route| {
                route.next_hop == sender
                    && route.destination != sender
                    && !advertised.contains(&route.destination)
            })
            .map(|route| route.destination.clone())
            .collect();
        for dst in withdrawn {
            state.table.remove(&dst);
            Event::RouteRemoved { dst: &dst, via: &sender }.log();
            changed = true;
        }

        if changed {
            state.broadcast_set()
        } else {
            Vec::new()
        }
    };

    if !broadcast.is_empty() {
        io::send_all(ctx, broadcast).await;
    }
}
