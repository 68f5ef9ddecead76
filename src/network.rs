//
// SPDX-License-Identifier: MIT
//

//! UDP transport. A thin wrapper around `tokio::net::UdpSocket` that bounds
//! the receive call so the receive loop can observe shutdown promptly (see
//! the concurrency model's suspension-point rule).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::{self, UdpSocket};

use crate::error::NetError;
use crate::node::Endpoint;

pub struct Net {
    socket: UdpSocket,
}

impl Net {
    pub async fn bind(port: u16) -> Result<Self, NetError> {
        Net::bind_addr(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)).await
    }

    /// Binds to a specific local address rather than all interfaces. Used
    /// by tests that run several nodes side by side on distinct loopback
    /// addresses; the daemon itself always binds via [`Net::bind`].
    pub async fn bind_addr(addr: SocketAddr) -> Result<Self, NetError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| NetError::Bind {
                port: addr.port(),
                source,
            })?;
        Ok(Net { socket })
    }

    pub async fn send(&self, endpoint: &Endpoint, bytes: &[u8]) -> Result<(), NetError> {
        let addr = resolve(endpoint).await?;
        self.socket
            .send_to(bytes, addr)
            .await
            .map(|_| ())
            .map_err(|source| NetError::Send {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// This daemon's own listening port, used as the implied port for a
    /// neighbor specification that omits one.
    pub fn local_port(&self) -> u16 {
        self.socket.local_addr().map(|addr| addr.port()).unwrap_or(0)
    }

    /// Waits up to `timeout` for an inbound datagram. Returns `Ok(None)` on
    /// timeout (the caller should re-check the shutdown signal and retry),
    /// not an error: timing out is the expected, frequent case.
    pub async fn recv_timeout(
        &self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, SocketAddr)>, NetError> {
        match tokio::time::timeout(timeout, self.socket.recv_from(buf)).await {
            Ok(Ok(result)) => Ok(Some(result)),
            Ok(Err(source)) => Err(NetError::Recv { source }),
            Err(_elapsed) => Ok(None),
        }
    }
}

async fn resolve(endpoint: &Endpoint) -> Result<SocketAddr, NetError> {
    net::lookup_host(endpoint.addr_str())
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| NetError::Resolve {
            endpoint: endpoint.to_string(),
        })
}
