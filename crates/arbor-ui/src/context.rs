use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use arbor_core::*;
use arbor_text::TextMetrics;

use crate::config::{Clock, UiConfig};

/// Shared "build again" request. Callbacks hold a clone and raise it; the
/// runtime reads and clears it.
#[derive(Clone, Debug, Default)]
pub struct RebuildFlag(Rc<Cell<bool>>);

impl RebuildFlag {
    pub fn request(&self) {
        self.0.set(true);
    }
    pub fn is_requested(&self) -> bool {
        self.0.get()
    }
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Keyed widget state that survives rebuilds.
#[derive(Default)]
pub struct Memory {
    slots: HashMap<String, Rc<dyn Any>>,
}

impl Memory {
    pub fn remember<T: 'static>(&mut self, key: &str, init: impl FnOnce() -> T) -> Rc<T> {
        if let Some(existing) = self.slots.get(key)
            && let Ok(rc) = existing.clone().downcast::<T>()
        {
            return rc;
        }
        let rc = Rc::new(init());
        self.slots.insert(key.to_owned(), rc.clone());
        rc
    }

    pub fn forget(&mut self, key: &str) {
        self.slots.remove(key);
    }
}

/// Everything a widget constructor needs: where to attach, how to measure,
/// what things look like.
pub struct BuildCx<'a> {
    pub graph: &'a mut dyn SceneGraph,
    pub theme: &'a Theme,
    pub config: &'a UiConfig,
    pub metrics: Rc<dyn TextMetrics>,
    pub clock: Rc<dyn Clock>,
    pub rebuild: RebuildFlag,
    reconciler: &'a mut Reconciler,
    memory: &'a mut Memory,
    parents: Vec<NodeId>,
}

impl<'a> BuildCx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        graph: &'a mut dyn SceneGraph,
        theme: &'a Theme,
        config: &'a UiConfig,
        metrics: Rc<dyn TextMetrics>,
        clock: Rc<dyn Clock>,
        rebuild: RebuildFlag,
        reconciler: &'a mut Reconciler,
        memory: &'a mut Memory,
        root: NodeId,
    ) -> Self {
        Self {
            graph,
            theme,
            config,
            metrics,
            clock,
            rebuild,
            reconciler,
            memory,
            parents: vec![root],
        }
    }

    /// Node new widgets attach to.
    pub fn parent(&self) -> Option<NodeId> {
        self.parents.last().copied()
    }

    /// Create a node under the current parent. Null if the parent is gone.
    pub fn create_node(&mut self) -> NodeId {
        let parent = self.parent();
        self.graph.create_node(parent)
    }

    /// Create a child of `parent` without touching the parent stack.
    pub fn create_child(&mut self, parent: NodeId) -> NodeId {
        self.graph.create_node(Some(parent))
    }

    /// Run `f` with `node` as the attach point.
    pub fn within<R>(&mut self, node: NodeId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.parents.push(node);
        let r = f(self);
        self.parents.pop();
        r
    }

    pub fn text_style(&self, token: StyleToken) -> TextStyle {
        self.theme.text_style(token)
    }

    /// Register `node` under `key`, or under a position-derived key.
    pub fn identify(&mut self, key: Option<WidgetKey>, node: NodeId) {
        let key = key.unwrap_or_else(|| self.reconciler.next_auto());
        self.reconciler.register(key, node);
    }

    pub fn remember<T: 'static>(&mut self, key: &str, init: impl FnOnce() -> T) -> Rc<T> {
        self.memory.remember(key, init)
    }

    /// Apply a resolved size hint, seeding `measured` when both axes are known.
    pub fn set_size(&mut self, node: NodeId, spec: SizeSpec) {
        if let Some(n) = self.graph.node_mut(node) {
            n.size = spec;
            if let (Some(w), Some(h)) = (spec.width, spec.height) {
                n.measured = Size::new(w, h);
            }
        }
    }

    pub fn configure(&mut self, node: NodeId, f: impl FnOnce(&mut Node)) {
        if let Some(n) = self.graph.node_mut(node) {
            f(n);
        }
    }

    pub fn attach(&mut self, node: NodeId, cb: Rc<dyn NodeCallback>) {
        if !self.graph.set_callback(node, Some(cb)) {
            log::debug!("attach: node {node:?} is gone");
        }
    }
}
