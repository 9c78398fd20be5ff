//! Stable widget identity across full-tree rebuilds.
//!
//! Every build discards the previous node tree. A widget that wants to keep
//! focus across that boundary registers a [`WidgetKey`]; the reconciler
//! remembers the key of the focused node before the rebuild and hands focus
//! to whichever new node registers the same key.

use std::collections::HashMap;
use std::mem;

use crate::{FocusManager, NodeId, SceneGraph};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKey {
    Named(String),
    Index(u64),
    /// Position-derived key for widgets the caller did not name.
    Auto(u64),
}

impl From<&str> for WidgetKey {
    fn from(s: &str) -> Self {
        WidgetKey::Named(s.to_owned())
    }
}

impl From<String> for WidgetKey {
    fn from(s: String) -> Self {
        WidgetKey::Named(s)
    }
}

impl From<u64> for WidgetKey {
    fn from(n: u64) -> Self {
        WidgetKey::Index(n)
    }
}

/// Key → most recently registered node.
#[derive(Debug, Default)]
pub struct IdentityMap {
    by_key: HashMap<WidgetKey, NodeId>,
    by_node: HashMap<NodeId, WidgetKey>,
}

impl IdentityMap {
    /// Later registrations under the same key win.
    pub fn insert(&mut self, key: WidgetKey, node: NodeId) {
        if let Some(prev) = self.by_key.insert(key.clone(), node) {
            log::trace!("identity {key:?} re-registered: {prev:?} -> {node:?}");
            self.by_node.remove(&prev);
        }
        self.by_node.insert(node, key);
    }

    pub fn get(&self, key: &WidgetKey) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    pub fn key_of(&self, node: NodeId) -> Option<&WidgetKey> {
        self.by_node.get(&node)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
        self.by_node.clear();
    }
}

#[derive(Debug, Default)]
pub struct Reconciler {
    current: IdentityMap,
    remembered: Option<WidgetKey>,
    auto: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cycle. Looks up the focused node in the last cycle's map,
    /// then discards that map.
    pub fn begin_cycle(&mut self, focused: Option<NodeId>) {
        let previous = mem::take(&mut self.current);
        self.remembered = focused.and_then(|n| previous.key_of(n).cloned());
        self.auto = 0;
    }

    /// Next position-derived key in this cycle.
    pub fn next_auto(&mut self) -> WidgetKey {
        let k = WidgetKey::Auto(self.auto);
        self.auto += 1;
        k
    }

    pub fn register(&mut self, key: WidgetKey, node: NodeId) {
        if node.is_valid() {
            self.current.insert(key, node);
        }
    }

    pub fn remembered(&self) -> Option<&WidgetKey> {
        self.remembered.as_ref()
    }

    pub fn current(&self) -> &IdentityMap {
        &self.current
    }

    /// Finish a cycle: give focus to the node now registered under the
    /// remembered key, or drop focus.
    pub fn finish_cycle(
        &mut self,
        graph: &mut dyn SceneGraph,
        focus: &mut FocusManager,
    ) -> Option<NodeId> {
        let key = self.remembered.take()?;
        match self.current.get(&key) {
            Some(node) if focus.set_focus(graph, node) => {
                log::debug!("focus restored to {key:?} ({node:?})");
                Some(node)
            }
            _ => {
                log::debug!("focus dropped: {key:?} not rebuilt");
                focus.clear(graph);
                None
            }
        }
    }
}
