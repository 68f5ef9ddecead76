//
// SPDX-License-Identifier: MIT
//

//! The neighbor registry: direct neighbors, their transport endpoint, and
//! the timestamp of the most recent message observed from each.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::node::{Endpoint, NodeId};

#[derive(Clone, Debug)]
pub struct Neighbor {
    pub id: NodeId,
    pub endpoint: Endpoint,
    pub last_heard: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct NeighborSet {
    neighbors: BTreeMap<NodeId, Neighbor>,
}

impl NeighborSet {
    pub fn new() -> Self {
        NeighborSet::default()
    }

    /// Inserts a new direct neighbor if unknown, initializing last-heard to
    /// now. Returns `true` if the neighbor was newly added.
    pub fn add(&mut self, id: NodeId, endpoint: Endpoint) -> bool {
        if self.neighbors.contains_key(&id) {
            return false;
        }
        self.neighbors.insert(
            id.clone(),
            Neighbor {
                id,
                endpoint,
                last_heard: Utc::now(),
            },
        );
        true
    }

    /// Refreshes last-heard for `id` to now; replaces the recorded endpoint
    /// if it differs from the observed one. A no-op if `id` is unknown.
    pub fn note_activity(&mut self, id: &NodeId, endpoint: Endpoint) {
        if let Some(nbr) = self.neighbors.get_mut(id) {
            nbr.last_heard = Utc::now();
            if nbr.endpoint != endpoint {
                nbr.endpoint = endpoint;
            }
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.neighbors.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Neighbor> {
        self.neighbors.get(id)
    }

    /// The neighbors whose last-heard timestamp is older than `threshold`.
    pub fn stale(&self, threshold: Duration, now: DateTime<Utc>) -> Vec<NodeId> {
        let threshold = chrono::Duration::from_std(threshold).unwrap_or(chrono::Duration::zero());
        self.neighbors
            .values()
            .filter(|nbr| now.signed_duration_since(nbr.last_heard) > threshold)
            .map(|nbr| nbr.id.clone())
            .collect()
    }

    pub fn drop(&mut self, id: &NodeId) -> Option<Neighbor> {
        self.neighbors.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.neighbors.values()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn ep(s: &str, port: u16) -> Endpoint {
        Endpoint::new(id(s), port)
    }

    #[test]
    fn add_only_inserts_once() {
        let mut set = NeighborSet::new();
        assert!(set.add(id("B"), ep("B", 6000)));
        assert!(!set.add(id("B"), ep("B", 7000)));
        assert_eq!(set.get(&id("B")).unwrap().endpoint.port, 6000);
    }

    #[test]
    fn note_activity_updates_endpoint_for_known_neighbor_only() {
        let mut set = NeighborSet::new();
        set.note_activity(&id("B"), ep("B", 9000));
        assert!(set.get(&id("B")).is_none());

        set.add(id("B"), ep("B", 6000));
        set.note_activity(&id("B"), ep("B", 9000));
        assert_eq!(set.get(&id("B")).unwrap().endpoint.port, 9000);
    }

    #[test]
    fn stale_reports_silent_neighbors() {
        let mut set = NeighborSet::new();
        set.add(id("B"), ep("B", 6000));
        let future = Utc::now() + chrono::Duration::seconds(20);
        let stale = set.stale(Duration::from_secs(15), future);
        assert_eq!(stale, vec![id("B")]);
        let soon = set.stale(Duration::from_secs(15), Utc::now());
        assert!(soon.is_empty());
    }
}
