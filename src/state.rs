//! Shared relay state: the connection registry and the group table.
//!
//! The `Hub` is the only shared mutable state in the daemon. Both maps live
//! behind a single coarse mutex so that every operation — including the
//! leave-then-join move performed by [`Hub::join`] — is one critical
//! section. Accessors hand out point-in-time snapshots, never live views,
//! so callers can iterate for a broadcast while other sessions mutate
//! membership. No I/O happens under the lock.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Identity of one live connection, assigned at registration.
pub type ConnId = u64;

/// Per-connection bookkeeping held by the registry.
struct Peer {
    /// Remote address, reported by `/members`.
    addr: SocketAddr,
    /// Outbound line queue feeding the connection's writer task.
    tx: mpsc::Sender<String>,
    /// The group this connection currently belongs to, if any.
    current_group: Option<String>,
}

#[derive(Default)]
struct HubState {
    /// All live connections.
    connections: HashMap<ConnId, Peer>,
    /// Group name to member set. Groups persist once created, even when
    /// emptied; there is no garbage collection of empty groups.
    groups: HashMap<String, HashSet<ConnId>>,
}

impl HubState {
    /// Remove `id` from its current group, if any. Group entries outlive
    /// their members.
    fn leave(&mut self, id: ConnId) {
        let Some(peer) = self.connections.get_mut(&id) else {
            return;
        };
        if let Some(group) = peer.current_group.take()
            && let Some(members) = self.groups.get_mut(&group)
        {
            members.remove(&id);
        }
    }
}

/// Process-wide registry and group table.
pub struct Hub {
    state: Mutex<HubState>,
    next_id: AtomicU64,
}

impl Hub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HubState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection and return its id.
    pub fn register(&self, addr: SocketAddr, tx: mpsc::Sender<String>) -> ConnId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.lock();
        state.connections.insert(
            id,
            Peer {
                addr,
                tx,
                current_group: None,
            },
        );
        id
    }

    /// Tear down a connection: leave its group and drop it from the registry.
    pub fn unregister(&self, id: ConnId) {
        let mut state = self.state.lock();
        state.leave(id);
        state.connections.remove(&id);
    }

    /// Create a group if it does not exist yet. Idempotent.
    pub fn ensure_group(&self, name: &str) {
        let mut state = self.state.lock();
        state.groups.entry(name.to_string()).or_default();
    }

    /// Move a connection into a group, creating the group if absent.
    ///
    /// Leaving the previous group and entering the new one happen in the
    /// same critical section, so a connection is never a member of two
    /// groups and never left behind as a stale broadcast target.
    pub fn join(&self, id: ConnId, name: &str) {
        let mut state = self.state.lock();
        if !state.connections.contains_key(&id) {
            return;
        }
        state.leave(id);
        state.groups.entry(name.to_string()).or_default().insert(id);
        if let Some(peer) = state.connections.get_mut(&id) {
            peer.current_group = Some(name.to_string());
        }
    }

    /// Remove a connection from its current group, if any.
    #[allow(dead_code)] // Part of the membership contract; no wire command maps to it yet
    pub fn leave(&self, id: ConnId) {
        self.state.lock().leave(id);
    }

    /// The group a connection currently belongs to.
    #[allow(dead_code)] // Exercised by tests; handlers use members_of for consistency
    pub fn current_group(&self, id: ConnId) -> Option<String> {
        self.state
            .lock()
            .connections
            .get(&id)
            .and_then(|p| p.current_group.clone())
    }

    /// Snapshot of a group's member addresses. `None` if the group does
    /// not exist.
    #[allow(dead_code)] // Exercised by tests; handlers use members_of for consistency
    pub fn members(&self, name: &str) -> Option<Vec<SocketAddr>> {
        let state = self.state.lock();
        let members = state.groups.get(name)?;
        Some(
            members
                .iter()
                .filter_map(|id| state.connections.get(id).map(|p| p.addr))
                .collect(),
        )
    }

    /// Snapshot of the caller's group name and member addresses, taken in
    /// one critical section. `None` when the caller is not in a group.
    pub fn members_of(&self, id: ConnId) -> Option<(String, Vec<SocketAddr>)> {
        let state = self.state.lock();
        let group = state.connections.get(&id)?.current_group.clone()?;
        let addrs = state
            .groups
            .get(&group)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| state.connections.get(m).map(|p| p.addr))
                    .collect()
            })
            .unwrap_or_default();
        Some((group, addrs))
    }

    /// Snapshot of outbound senders for every member of the caller's group
    /// except the caller itself. `None` when the caller is not in a group.
    pub fn broadcast_targets(&self, id: ConnId) -> Option<Vec<mpsc::Sender<String>>> {
        let state = self.state.lock();
        let group = state.connections.get(&id)?.current_group.as_deref()?;
        let members = state.groups.get(group)?;
        Some(
            members
                .iter()
                .filter(|m| **m != id)
                .filter_map(|m| state.connections.get(m).map(|p| p.tx.clone()))
                .collect(),
        )
    }

    /// Whether a group exists, empty or not.
    #[allow(dead_code)] // Exercised by tests
    pub fn group_exists(&self, name: &str) -> bool {
        self.state.lock().groups.contains_key(name)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
