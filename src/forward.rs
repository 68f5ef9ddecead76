//
// SPDX-License-Identifier: MIT
//

//! The forwarding plane (see §4.5 of the design notes): originates outgoing
//! text messages from the command shell and relays transit text messages
//! toward their next hop. No TTL is maintained; loop prevention relies
//! solely on correct convergence of the routing table.

use crate::codec::Message;
use crate::io;
use crate::log::Event;
use crate::node::{Endpoint, NodeId};
use crate::shared::Ctx;

/// Originates a text message from the command shell. Returns `false` and
/// logs a `[ERRO]` line if there is no route to `dst` yet.
pub async fn originate(ctx: &Ctx, dst: NodeId, body: String) -> bool {
    let next_hop_endpoint = {
        let state = ctx.shared.lock().unwrap();
        state.table.lookup(&dst).map(|route| {
            state
                .neighbors
                .get(&route.next_hop)
                .map(|nbr| nbr.endpoint.clone())
                .unwrap_or_else(|| Endpoint::new(route.next_hop.clone(), ctx.net.local_port()))
        })
    };

    let Some(endpoint) = next_hop_endpoint else {
        Event::NoRoute { dst: &dst }.log();
        return false;
    };

    let Some(bytes) = (Message::Text {
        src: ctx.self_id.clone(),
        dst,
        body,
    })
    .encode() else {
        return false;
    };
    io::send_one(ctx, &endpoint, &bytes).await;
    true
}

/// Handles a received text message. Delivers it locally if this node is the
/// destination, otherwise relays the exact original datagram bytes to the
/// next hop, dropping it (logged) when no route exists.
pub async fn handle_text(ctx: &Ctx, src: NodeId, dst: NodeId, body: String, raw: &[u8]) {
    if dst == ctx.self_id {
        Event::MessageReceived {
            src: &src,
            body: &body,
        }
        .log();
        return;
    }

    let relay = {
        let state = ctx.shared.lock().unwrap();
        state.table.lookup(&dst).map(|route| {
            let endpoint = state
                .neighbors
                .get(&route.next_hop)
                .map(|nbr| nbr.endpoint.clone())
                .unwrap_or_else(|| Endpoint::new(route.next_hop.clone(), ctx.net.local_port()));
            (route.next_hop.clone(), endpoint)
        })
    };

    match relay {
        Some((next_hop, endpoint)) => {
            Event::MessageRelayed {
                src: &src,
                dst: &dst,
                next_hop: &next_hop,
            }
            .log();
            io::send_one(ctx, &endpoint, raw).await;
        }
        None => Event::NoRoute { dst: &dst }.log(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Net;
    use crate::node::Endpoint as Ep;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    async fn ctx(self_id: &str) -> std::sync::Arc<Ctx> {
        let net = Net::bind(0).await.unwrap();
        Ctx::new(id(self_id), net)
    }

    #[tokio::test]
    async fn originate_with_no_route_reports_failure() {
        let ctx = ctx("A").await;
        assert!(!originate(&ctx, id("Z"), "hi".to_string()).await);
    }

    #[tokio::test]
    async fn originate_with_a_route_succeeds() {
        let ctx = ctx("A").await;
        {
            let mut state = ctx.shared.lock().unwrap();
            state.neighbors.add(id("B"), Ep::new(id("B"), 6001));
            state.table.upsert(id("B"), 1, id("B"));
        }
        assert!(originate(&ctx, id("B"), "hi".to_string()).await);
    }

    #[tokio::test]
    async fn text_addressed_to_self_is_delivered_not_relayed() {
        let ctx = ctx("A").await;
        handle_text(&ctx, id("Z"), id("A"), "hi".to_string(), b"!Z;A;hi").await;
        // No route table entries are touched; delivery is just a log line.
        assert!(ctx.shared.lock().unwrap().table.is_empty());
    }

    #[tokio::test]
    async fn text_with_no_route_is_dropped() {
        let ctx = ctx("A").await;
        handle_text(&ctx, id("Z"), id("Q"), "hi".to_string(), b"!Z;Q;hi").await;
    }
}
