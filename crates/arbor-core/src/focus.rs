use crate::{NodeId, SceneGraph, store::is_effectively_visible};

/// Tracks which node holds keyboard focus.
#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<NodeId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to `node`, blurring the previous holder.
    ///
    /// Returns `false` (and leaves focus alone) when `node` is stale or not
    /// focusable.
    pub fn set_focus(&mut self, graph: &mut dyn SceneGraph, node: NodeId) -> bool {
        let focusable = graph.node(node).is_some_and(|n| n.is_focusable());
        if !focusable {
            log::debug!("set_focus: {node:?} is not focusable");
            return false;
        }
        if self.focused == Some(node) {
            return true;
        }
        self.blur_current(graph);
        self.focused = Some(node);
        if let Some(cb) = graph.callback(node) {
            cb.on_focus(graph, node);
        }
        true
    }

    pub fn clear(&mut self, graph: &mut dyn SceneGraph) {
        self.blur_current(graph);
    }

    /// Drop focus without notifying; for when the holder was destroyed.
    pub fn forget(&mut self) {
        self.focused = None;
    }

    fn blur_current(&mut self, graph: &mut dyn SceneGraph) {
        if let Some(prev) = self.focused.take()
            && let Some(cb) = graph.callback(prev)
        {
            cb.on_blur(graph, prev);
        }
    }

    /// Focusable, visible nodes ordered by `(tab_index, creation order)`.
    pub fn focus_chain(graph: &dyn SceneGraph) -> Vec<NodeId> {
        let mut chain: Vec<(i32, u64, NodeId)> = graph
            .node_ids()
            .into_iter()
            .filter_map(|id| {
                let n = graph.node(id)?;
                (n.is_focusable() && is_effectively_visible(graph, id))
                    .then_some((n.tab_index, n.order, id))
            })
            .collect();
        chain.sort_unstable_by_key(|(t, o, _)| (*t, *o));
        chain.into_iter().map(|(_, _, id)| id).collect()
    }

    pub fn focus_next(&mut self, graph: &mut dyn SceneGraph) -> Option<NodeId> {
        self.step(graph, 1)
    }

    pub fn focus_prev(&mut self, graph: &mut dyn SceneGraph) -> Option<NodeId> {
        self.step(graph, -1)
    }

    fn step(&mut self, graph: &mut dyn SceneGraph, dir: isize) -> Option<NodeId> {
        let chain = Self::focus_chain(graph);
        if chain.is_empty() {
            return None;
        }
        let len = chain.len() as isize;
        let next = match self.focused.and_then(|f| chain.iter().position(|c| *c == f)) {
            Some(i) => (i as isize + dir).rem_euclid(len),
            None if dir > 0 => 0,
            None => len - 1,
        };
        let target = chain[next as usize];
        self.set_focus(graph, target);
        Some(target)
    }
}
