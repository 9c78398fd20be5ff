use slotmap::SlotMap;

use crate::{
    DispatchError, InputEvent, Node, NodeId, Primitive, PrimitiveId, SceneGraph, Vec2,
};

struct PrimSlot {
    owner: NodeId,
    prim: Primitive,
}

/// In-memory scene graph.
#[derive(Default)]
pub struct NodeStore {
    nodes: SlotMap<NodeId, Node>,
    prims: SlotMap<PrimitiveId, PrimSlot>,
    roots: Vec<NodeId>,
    next_order: u64,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn primitive_count(&self) -> usize {
        self.prims.len()
    }

    /// Node that owns `prim`.
    pub fn owner(&self, prim: PrimitiveId) -> Option<NodeId> {
        self.prims.get(prim).map(|p| p.owner)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.prims.clear();
        self.roots.clear();
    }
}

impl SceneGraph for NodeStore {
    fn create_node(&mut self, parent: Option<NodeId>) -> NodeId {
        if let Some(p) = parent
            && !self.nodes.contains_key(p)
        {
            log::debug!("create_node: parent {p:?} is gone");
            return NodeId::default();
        }
        let order = self.next_order;
        self.next_order += 1;
        let id = self.nodes.insert(Node::new(parent, order));
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    fn add_primitive(&mut self, node: NodeId, prim: Primitive) -> PrimitiveId {
        if !self.nodes.contains_key(node) {
            log::debug!("add_primitive: node {node:?} is gone");
            return PrimitiveId::default();
        }
        let id = self.prims.insert(PrimSlot { owner: node, prim });
        if let Some(n) = self.nodes.get_mut(node) {
            n.primitives.push(id);
        }
        id
    }

    fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.prims.get(id).map(|p| &p.prim)
    }

    fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.prims.get_mut(id).map(|p| &mut p.prim)
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).map(|n| n.parent) else {
            return;
        };
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(cur) {
                for p in node.primitives {
                    self.prims.remove(p);
                }
                stack.extend(node.children);
            }
        }
    }

    fn roots(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<(u64, NodeId)> = self.nodes.iter().map(|(id, n)| (n.order, id)).collect();
        ids.sort_unstable_by_key(|(o, _)| *o);
        ids.into_iter().map(|(_, id)| id).collect()
    }
}

/// Deliver `ev` to `target`, bubbling to ancestors until one consumes it.
///
/// Hidden nodes are skipped. While bubbling, `local` is re-expressed in each
/// ancestor's space and `size` becomes the ancestor's measured size.
pub fn dispatch(
    graph: &mut dyn SceneGraph,
    target: NodeId,
    ev: &InputEvent,
) -> Result<bool, DispatchError> {
    if !graph.contains(target) {
        log::debug!("dispatch to stale node {target:?}");
        return Err(DispatchError::StaleNode { node: target });
    }

    let mut cur = Some(target);
    let mut ev = *ev;
    while let Some(id) = cur {
        let Some(node) = graph.node(id) else {
            break;
        };
        let visible = node.is_visible();
        let parent = node.parent;
        let position = node.position;
        let cb = node.callback.clone();

        if visible
            && let Some(cb) = cb
            && cb.on_event(graph, id, &ev)?
        {
            return Ok(true);
        }

        if let Some(p) = parent.and_then(|p| graph.node(p)) {
            ev.local = ev.local + position - p.scroll_offset;
            ev.size = p.measured;
        }
        cur = parent;
    }
    Ok(false)
}

/// Whether `node` and all its ancestors are visible.
pub fn is_effectively_visible(graph: &dyn SceneGraph, node: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(id) = cur {
        match graph.node(id) {
            Some(n) if n.is_visible() => cur = n.parent,
            _ => return false,
        }
    }
    true
}

/// Absolute origin of `node`, summing ancestor positions and scroll.
pub fn absolute_origin(graph: &dyn SceneGraph, node: NodeId) -> Vec2 {
    let mut at = Vec2::ZERO;
    let mut cur = graph.node(node);
    while let Some(n) = cur {
        at = at + n.position;
        cur = n.parent.and_then(|p| graph.node(p));
        if let Some(p) = cur {
            at = at - p.scroll_offset;
        }
    }
    at
}
