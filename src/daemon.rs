//
// SPDX-License-Identifier: MIT
//

//! Wires the components together: binds the transport, seeds the routing
//! table and neighbor registry from configuration, and spawns the four
//! concurrent duties described in §5 (receive loop, three timers) alongside
//! the foreground command shell.

use crate::command;
use crate::config::Config;
use crate::error::NetError;
use crate::log::Event;
use crate::network::Net;
use crate::node::Endpoint;
use crate::receive;
use crate::shared::Ctx;
use crate::timer;

pub async fn run(config: Config) -> Result<(), NetError> {
    let net = Net::bind(config.port).await?;
    let ctx = Ctx::new(config.self_id.clone(), net);

    {
        let mut state = ctx.shared.lock().unwrap();
        for (neighbor, port) in &config.neighbors {
            state
                .neighbors
                .add(neighbor.clone(), Endpoint::new(neighbor.clone(), *port));
            state.table.upsert(neighbor.clone(), 1, neighbor.clone());
        }
    }

    let neighbor_ids: Vec<_> = config.neighbors.iter().map(|(n, _)| n.clone()).collect();
    Event::Init {
        self_id: &config.self_id,
        port: config.port,
        neighbors: &neighbor_ids,
    }
    .log();

    let receive_task = tokio::spawn(receive::run(ctx.clone()));
    let keepalive_task = tokio::spawn(timer::keepalive_loop(ctx.clone()));
    let liveness_task = tokio::spawn(timer::liveness_loop(ctx.clone()));
    let display_task = tokio::spawn(timer::display_loop(ctx.clone()));
    let initial_join_task = tokio::spawn(timer::initial_join(ctx.clone()));

    tokio::select! {
        _ = command::run(ctx.clone()) => {}
        _ = tokio::signal::ctrl_c() => {
            ctx.shut_down();
        }
    }

    ctx.shut_down();
    let _ = tokio::join!(
        receive_task,
        keepalive_task,
        liveness_task,
        display_task,
        initial_join_task,
    );
    Ok(())
}
