//
// SPDX-License-Identifier: MIT
//

use clap::Parser;
use tracing::error;

use vectord::config::{self, Cli};
use vectord::log;
use vectord::node::NodeId;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    log::init_tracing(cli.verbose);

    let self_id = NodeId::new(cli.self_node_id.clone());
    let cfg = match config::load(&self_id, cli.port, &cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("[ERRO] {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = vectord::daemon::run(cfg).await {
        error!("[ERRO] {err}");
        std::process::exit(1);
    }
}
