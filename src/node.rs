//
// SPDX-License-Identifier: MIT
//

//! Node identity and addressing. A [`NodeId`] is opaque to the routing
//! engine (equality and hashing are all that is required of it), even
//! though in practice it is always an IP address literal.

use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId::new(id)
    }
}

/// The (NodeId, port) pair a datagram is actually sent to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: u16,
}

impl Endpoint {
    pub fn new(node: NodeId, port: u16) -> Self {
        Endpoint { node, port }
    }

    /// The `host:port` string handed to DNS/address resolution.
    pub fn addr_str(&self) -> String {
        format!("{}:{}", self.node.as_str(), self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.port)
    }
}
