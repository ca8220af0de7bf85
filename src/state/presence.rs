//! Presence table: last known online state of every tracked peer.
//!
//! The key set is fixed when the table is built from configuration. Poll
//! results only flip values; a nickname the server reports that is not being
//! tracked is ignored.

use std::collections::{BTreeMap, HashSet};

/// One peer's online state changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub peer: String,
    pub online: bool,
}

impl Transition {
    /// Human-readable form used in notifications (`alice is online`).
    pub fn describe(&self) -> String {
        let state = if self.online { "online" } else { "offline" };
        format!("{} is {}", self.peer, state)
    }
}

/// Nicknames reported online by one ISON reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollResult {
    online: HashSet<String>,
}

impl PollResult {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            online: names
                .into_iter()
                .map(Into::into)
                .filter(|n: &String| !n.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.online.contains(peer)
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }
}

/// Mapping of tracked nickname to last known online state.
#[derive(Debug, Clone, Default)]
pub struct PresenceTable {
    peers: BTreeMap<String, bool>,
}

impl PresenceTable {
    /// Build a table with every peer offline. Blank and duplicate names are
    /// collapsed so each peer has exactly one entry.
    pub fn new<I, S>(peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers = peers
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| (p, false))
            .collect();
        Self { peers }
    }

    /// Tracked nicknames, in a stable order.
    pub fn peer_names(&self) -> Vec<String> {
        self.peers.keys().cloned().collect()
    }

    /// Last known state of `peer`, or `None` if it is not tracked.
    #[cfg(test)]
    pub fn is_online(&self, peer: &str) -> Option<bool> {
        self.peers.get(peer).copied()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Apply one poll result, returning the peers whose state flipped.
    pub fn apply(&mut self, result: &PollResult) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for (peer, online) in self.peers.iter_mut() {
            let now_online = result.contains(peer);
            if now_online != *online {
                *online = now_online;
                transitions.push(Transition {
                    peer: peer.clone(),
                    online: now_online,
                });
            }
        }
        transitions
    }

    #[cfg(test)]
    pub(crate) fn with_states(states: &[(&str, bool)]) -> Self {
        Self {
            peers: states.iter().map(|(p, s)| (p.to_string(), *s)).collect(),
        }
    }
}
