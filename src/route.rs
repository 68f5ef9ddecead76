//
// SPDX-License-Identifier: MIT
//

//! The routing table: destination -> (metric, next hop, last update).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::node::NodeId;

#[derive(Clone, Debug)]
pub struct Route {
    pub destination: NodeId,
    pub metric: u16,
    pub next_hop: NodeId,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RoutingTable {
    self_id: NodeId,
    routes: BTreeMap<NodeId, Route>,
}

impl RoutingTable {
    pub fn new(self_id: NodeId) -> Self {
        RoutingTable {
            self_id,
            routes: BTreeMap::new(),
        }
    }

    /// Installs or replaces the route to `destination`. A no-op if
    /// `destination` is the self node: the self-node never appears as a
    /// destination.
    pub fn upsert(&mut self, destination: NodeId, metric: u16, next_hop: NodeId) {
        if destination == self.self_id {
            return;
        }
        debug_assert!(metric >= 1, "route metric must be at least 1");
        self.routes.insert(
            destination.clone(),
            Route {
                destination,
                metric,
                next_hop,
                updated_at: Utc::now(),
            },
        );
    }

    pub fn remove(&mut self, destination: &NodeId) -> Option<Route> {
        self.routes.remove(destination)
    }

    pub fn lookup(&self, destination: &NodeId) -> Option<&Route> {
        self.routes.get(destination)
    }

    /// The split-horizon outbound vector for the neighbor `exclude`: every
    /// route except those whose next hop is `exclude`, and never the
    /// self-NodeId.
    pub fn advertisable(&self, exclude: &NodeId) -> Vec<(NodeId, u16)> {
        self.routes
            .values()
            .filter(|route| &route.next_hop != exclude)
            .map(|route| (route.destination.clone(), route.metric))
            .collect()
    }

    /// Removes every route whose destination or next hop is `neighbor`,
    /// returning the destinations that were removed.
    pub fn purge_through(&mut self, neighbor: &NodeId) -> Vec<NodeId> {
        let doomed: Vec<NodeId> = self
            .routes
            .values()
            .filter(|route| &route.destination == neighbor || &route.next_hop == neighbor)
            .map(|route| route.destination.clone())
            .collect();
        for dst in &doomed {
            self.routes.remove(dst);
        }
        doomed
    }

    /// Routes ordered by destination NodeId ascending.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn upsert_ignores_self_destination() {
        let mut table = RoutingTable::new(id("A"));
        table.upsert(id("A"), 1, id("A"));
        assert!(table.lookup(&id("A")).is_none());
    }

    #[test]
    fn advertisable_applies_split_horizon_and_excludes_self() {
        let mut table = RoutingTable::new(id("A"));
        table.upsert(id("B"), 1, id("B"));
        table.upsert(id("D"), 3, id("B"));
        let to_b = table.advertisable(&id("B"));
        assert!(!to_b.iter().any(|(dst, _)| dst == &id("B")));
        assert!(!to_b.iter().any(|(dst, _)| dst == &id("D")));

        let to_c = table.advertisable(&id("C"));
        assert!(to_c.iter().any(|(dst, _)| dst == &id("D")));
    }

    #[test]
    fn purge_through_removes_destination_and_transit_routes() {
        let mut table = RoutingTable::new(id("A"));
        table.upsert(id("B"), 1, id("B"));
        table.upsert(id("C"), 2, id("B"));
        let removed = table.purge_through(&id("B"));
        assert_eq!(removed.len(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn iter_sorted_is_destination_ascending() {
        let mut table = RoutingTable::new(id("A"));
        table.upsert(id("C"), 2, id("B"));
        table.upsert(id("B"), 1, id("B"));
        let order: Vec<_> = table.iter_sorted().map(|r| r.destination.clone()).collect();
        assert_eq!(order, vec![id("B"), id("C")]);
    }
}
