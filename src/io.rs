//
// SPDX-License-Identifier: MIT
//

//! Outbound send helpers shared by the convergence and forwarding logic.
//! Both follow the same two-phase pattern: compute `(endpoint, bytes)`
//! under the lock, release, then call these to perform the actual I/O.

use crate::log::Event;
use crate::node::Endpoint;
use crate::shared::Ctx;

pub async fn send_one(ctx: &Ctx, endpoint: &Endpoint, bytes: &[u8]) {
    if let Err(error) = ctx.net.send(endpoint, bytes).await {
        Event::SendFailed {
            target: endpoint,
            error: &error,
        }
        .log();
    }
}

pub async fn send_all(ctx: &Ctx, outbox: Vec<(Endpoint, Vec<u8>)>) {
    for (endpoint, bytes) in outbox {
        send_one(ctx, &endpoint, &bytes).await;
    }
}
