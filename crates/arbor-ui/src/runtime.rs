use std::rc::Rc;

use arbor_core::*;
use arbor_text::TextMetrics;

use crate::config::{Clock, SystemClock, UiConfig};
use crate::context::{BuildCx, Memory, RebuildFlag};

/// Owns a retained graph and rebuilds it wholesale on [`Ui::build`].
///
/// Each build cycle:
///
/// 1. remembers the identity of the focused widget,
/// 2. drops the previous tree,
/// 3. runs the builder against a fresh root,
/// 4. hands focus to whatever registered under the remembered identity.
pub struct Ui {
    graph: NodeStore,
    theme: Theme,
    config: UiConfig,
    metrics: Rc<dyn TextMetrics>,
    clock: Rc<dyn Clock>,
    focus: FocusManager,
    reconciler: Reconciler,
    memory: Memory,
    rebuild: RebuildFlag,
    root: NodeId,
    viewport: Size,
}

impl Ui {
    pub fn new(metrics: Rc<dyn TextMetrics>) -> Self {
        Self {
            graph: NodeStore::new(),
            theme: Theme::default(),
            config: UiConfig::default(),
            metrics,
            clock: Rc::new(SystemClock),
            focus: FocusManager::new(),
            reconciler: Reconciler::new(),
            memory: Memory::default(),
            rebuild: RebuildFlag::default(),
            root: NodeId::default(),
            viewport: Size::new(1280.0, 800.0),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_viewport(mut self, size: Size) -> Self {
        self.viewport = size.sanitized();
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn graph(&self) -> &NodeStore {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut NodeStore {
        &mut self.graph
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    pub fn focus(&mut self, node: NodeId) -> bool {
        self.focus.set_focus(&mut self.graph, node)
    }

    pub fn blur(&mut self) {
        self.focus.clear(&mut self.graph);
    }

    /// Whether a callback asked for another build.
    pub fn needs_rebuild(&self) -> bool {
        self.rebuild.is_requested()
    }

    /// Run one build cycle.
    pub fn build<R>(&mut self, f: impl FnOnce(&mut BuildCx) -> R) -> R {
        self.reconciler.begin_cycle(self.focus.focused());
        if self.root.is_valid() {
            self.graph.remove_subtree(self.root);
        }
        // the holder went with the old tree
        self.focus.forget();
        self.rebuild.take();

        self.root = self.graph.create_node(None);
        let viewport = self.viewport;
        if let Some(n) = self.graph.node_mut(self.root) {
            n.size = SizeSpec::fixed(viewport.width, viewport.height);
            n.measured = viewport;
            n.layout = LayoutMode::Column;
        }

        let out = {
            let mut cx = BuildCx::new(
                &mut self.graph,
                &self.theme,
                &self.config,
                self.metrics.clone(),
                self.clock.clone(),
                self.rebuild.clone(),
                &mut self.reconciler,
                &mut self.memory,
                self.root,
            );
            f(&mut cx)
        };
        self.reconciler.finish_cycle(&mut self.graph, &mut self.focus);
        log::trace!(
            "build: {} nodes, {} identities",
            self.graph.len(),
            self.reconciler.current().len()
        );
        out
    }

    /// Route `ev` to `node`. A press focuses the nearest focusable node on
    /// the way up first.
    ///
    /// `Err(DispatchError::StaleNode)` means `node` went away with an earlier
    /// build; nothing ran and callers may treat it as a no-op.
    pub fn dispatch(&mut self, node: NodeId, ev: InputEvent) -> Result<bool, DispatchError> {
        if ev.kind == EventKind::PointerDown
            && ev.is_inside()
            && let Some(target) = self.focus_target(node)
        {
            self.focus.set_focus(&mut self.graph, target);
        }
        dispatch(&mut self.graph, node, &ev)
    }

    fn focus_target(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(id) = cur {
            let n = self.graph.node(id)?;
            if n.is_focusable() {
                return Some(id);
            }
            cur = n.parent;
        }
        None
    }

    /// Pointer event at `(x, y)` in `node`'s space, sized by its measured size.
    pub fn pointer(&mut self, node: NodeId, kind: EventKind, x: f32, y: f32) -> Result<bool, DispatchError> {
        let size = self.measured(node);
        let local = Vec2::new(x, y);
        let absolute = absolute_origin(&self.graph, node) + local;
        self.dispatch(node, InputEvent::pointer(kind, local, size).with_absolute(absolute))
    }

    /// Wheel event at `(x, y)` in `node`'s space.
    pub fn wheel(&mut self, node: NodeId, x: f32, y: f32, delta: Vec2) -> Result<bool, DispatchError> {
        let size = self.measured(node);
        self.dispatch(node, InputEvent::scroll(delta, Vec2::new(x, y), size))
    }

    /// Key event for `node`.
    pub fn key(&mut self, node: NodeId, key: Key) -> Result<bool, DispatchError> {
        let size = self.measured(node);
        self.dispatch(node, InputEvent::key(key, size))
    }

    /// Route a key press to the focused node. Tab and Shift+Tab move focus.
    pub fn dispatch_focused(&mut self, key: Key, modifiers: Modifiers) -> Result<bool, DispatchError> {
        if key == Key::Tab {
            let moved = if modifiers.shift {
                self.focus.focus_prev(&mut self.graph)
            } else {
                self.focus.focus_next(&mut self.graph)
            };
            return Ok(moved.is_some());
        }
        let Some(node) = self.focus.focused() else {
            return Ok(false);
        };
        let size = self.measured(node);
        dispatch(
            &mut self.graph,
            node,
            &InputEvent::key(key, size).with_modifiers(modifiers),
        )
    }

    fn measured(&self, node: NodeId) -> Size {
        self.graph.node(node).map(|n| n.measured).unwrap_or_default()
    }
}
