use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use arbor_text::{ApproxMetrics, TextMetrics};
use arbor_ui::tree_view::dump;
use arbor_ui::*;

fn ui_with(clock: Rc<ManualClock>) -> Ui {
    let _ = env_logger::builder().is_test(true).try_init();
    Ui::new(Rc::new(ApproxMetrics::default())).with_clock(clock)
}

fn pitch(ui: &Ui) -> f32 {
    let style = ui.theme().text_style(StyleToken::TreeLabel);
    ApproxMetrics::default().line_height(&style) + ui.config().tree_row_padding * 2.0
}

fn twelve_leaves() -> Vec<TreeNode> {
    let leaves = (0..12).map(|i| TreeNode::leaf(format!("item {i}"))).collect();
    vec![TreeNode::branch("root", leaves).expanded(true)]
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn keyboard_selection_scrolls_the_viewport() {
    let mut ui = ui_with(Rc::new(ManualClock::new()));
    let p = pitch(&ui);
    let selected: Rc<RefCell<Vec<usize>>> = Rc::default();
    let s = selected.clone();
    let h = ui.build(|cx| {
        TreeView(
            cx,
            TreeViewSpec::new(twelve_leaves())
                .selected(&[0])
                .size(SizeSpec::fixed(200.0, 4.0 * p))
                .on_select(move |info| s.borrow_mut().push(info.row)),
        )
    });
    let root = h.handle.root;
    assert_eq!(h.rows.len(), 13);

    for _ in 0..6 {
        assert_eq!(ui.key(root, Key::ArrowDown), Ok(true));
    }
    assert_eq!(*selected.borrow(), vec![1, 2, 3, 4, 5, 6]);
    assert!(close(h.state.offset(), 3.0 * p));
    let scrolled = ui.graph().node(root).map(|n| n.scroll_offset.y).unwrap_or_default();
    assert!(close(scrolled, 3.0 * p));

    ui.key(root, Key::PageDown).unwrap();
    assert_eq!(selected.borrow().last().copied(), Some(10));
    assert!(close(h.state.offset(), 7.0 * p));
    assert_eq!(h.state.selected().as_deref(), Some(&[0usize, 9][..]));

    ui.key(root, Key::Home).unwrap();
    assert_eq!(h.state.offset(), 0.0);
}

#[test]
fn left_and_right_walk_the_hierarchy() {
    let mut ui = ui_with(Rc::new(ManualClock::new()));
    let toggled: Rc<RefCell<Vec<(usize, bool)>>> = Rc::default();
    let t = toggled.clone();
    let h = ui.build(|cx| {
        TreeView(
            cx,
            TreeViewSpec::new(twelve_leaves())
                .selected(&[0])
                .size(SizeSpec::fixed(200.0, 600.0))
                .on_toggle(move |info| t.borrow_mut().push((info.row, info.expanded))),
        )
    });
    let root = h.handle.root;

    // expanded parent: Right moves to its last child
    ui.key(root, Key::ArrowRight).unwrap();
    assert_eq!(h.state.selected().as_deref(), Some(&[0usize, 11][..]));
    // leaf: Left moves to the parent
    ui.key(root, Key::ArrowLeft).unwrap();
    assert_eq!(h.state.selected().as_deref(), Some(&[0usize][..]));
    // expanded parent: Left collapses
    ui.key(root, Key::ArrowLeft).unwrap();
    assert_eq!(*toggled.borrow(), vec![(0, false)]);
    assert!(!h.state.is_expanded(&[0], true));
    assert!(ui.needs_rebuild());
}

#[test]
fn rows_render_as_an_outline() {
    let mut ui = ui_with(Rc::new(ManualClock::new()));
    let items = vec![
        TreeNode::branch(
            "src",
            vec![
                TreeNode::branch("widgets", vec![TreeNode::leaf("button.rs")]).expanded(true),
                TreeNode::branch("tree_view", vec![TreeNode::leaf("mod.rs")]),
                TreeNode::leaf("lib.rs"),
            ],
        )
        .expanded(true),
        TreeNode::leaf("Cargo.toml"),
    ];
    let h = ui.build(|cx| TreeView(cx, TreeViewSpec::new(items).selected(&[0, 2])));
    insta::assert_snapshot!(dump(&h.rows).trim_end(), @r"
    - src
      - widgets
        . button.rs
      + tree_view
      . lib.rs *
    . Cargo.toml
    ");
}

#[test]
fn double_press_on_a_leaf_activates_once() {
    let clock = Rc::new(ManualClock::new());
    let mut ui = ui_with(clock.clone());
    let p = pitch(&ui);
    let activated: Rc<RefCell<Vec<String>>> = Rc::default();
    let a = activated.clone();
    let h = ui.build(|cx| {
        TreeView(
            cx,
            TreeViewSpec::new(twelve_leaves())
                .size(SizeSpec::fixed(200.0, 600.0))
                .on_activate(move |info| a.borrow_mut().push(info.label.clone())),
        )
    });
    let root = h.handle.root;
    let y = p * 2.5;

    ui.pointer(root, EventKind::PointerDown, 120.0, y).unwrap();
    ui.pointer(root, EventKind::PointerUp, 120.0, y).unwrap();
    clock.advance(Duration::from_millis(100));
    ui.pointer(root, EventKind::PointerDown, 120.0, y).unwrap();
    ui.pointer(root, EventKind::PointerUp, 120.0, y).unwrap();
    assert_eq!(*activated.borrow(), vec!["item 1".to_string()]);

    // a third press starts a new sequence
    clock.advance(Duration::from_millis(50));
    ui.pointer(root, EventKind::PointerDown, 120.0, y).unwrap();
    assert_eq!(activated.borrow().len(), 1);

    // too slow
    clock.advance(Duration::from_secs(2));
    ui.pointer(root, EventKind::PointerDown, 120.0, y).unwrap();
    assert_eq!(activated.borrow().len(), 1);
}

#[test]
fn glyph_press_toggles_and_rebuild_shows_children() {
    let mut ui = ui_with(Rc::new(ManualClock::new()));
    let p = pitch(&ui);
    let state = Rc::new(TreeViewState::new());
    let toggles: Rc<RefCell<Vec<bool>>> = Rc::default();
    let items = || {
        vec![TreeNode::branch(
            "root",
            vec![TreeNode::leaf("a"), TreeNode::leaf("b")],
        )]
    };
    let build = |ui: &mut Ui| {
        let t = toggles.clone();
        let st = state.clone();
        ui.build(|cx| {
            TreeView(
                cx,
                TreeViewSpec::new(items())
                    .state(st)
                    .size(SizeSpec::fixed(200.0, 200.0))
                    .on_toggle(move |info| t.borrow_mut().push(info.expanded)),
            )
        })
    };

    let h = build(&mut ui);
    assert_eq!(h.rows.len(), 1);
    let geo = h.geometry;
    let x = geo.glyph_x(0) + geo.indent * 0.5;
    ui.pointer(h.handle.root, EventKind::PointerDown, x, p * 0.5).unwrap();

    assert_eq!(*toggles.borrow(), vec![true]);
    assert!(ui.needs_rebuild());
    let glyph = ui.graph().primitive(h.visuals[0].glyph).and_then(|g| g.text());
    assert_eq!(glyph, Some("▾"));

    let h = build(&mut ui);
    assert!(!ui.needs_rebuild());
    let labels: Vec<&str> = h.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["root", "a", "b"]);
}

#[test]
fn zero_height_rows_ignore_navigation_keys() {
    let _ = env_logger::builder().is_test(true).try_init();
    let theme = Theme::default();
    let label = Style {
        text: TextStyle::sized(0.0),
        ..theme.style(StyleToken::TreeLabel)
    };
    let config = UiConfig {
        tree_row_padding: 0.0,
        ..UiConfig::default()
    };
    let mut ui = Ui::new(Rc::new(ApproxMetrics::default()))
        .with_theme(theme.with_style(StyleToken::TreeLabel, label))
        .with_config(config);
    let leaves = (0..6).map(|i| TreeNode::leaf(format!("row {i}"))).collect();
    let h = ui.build(|cx| {
        TreeView(
            cx,
            TreeViewSpec::new(vec![TreeNode::branch("root", leaves).expanded(true)])
                .selected(&[0])
                .size(SizeSpec::fixed(200.0, 100.0)),
        )
    });
    assert_eq!(h.geometry.pitch, 0.0);

    let root = h.handle.root;
    for key in [Key::ArrowDown, Key::ArrowDown, Key::PageDown, Key::PageUp, Key::End] {
        assert_eq!(ui.key(root, key), Ok(false));
    }
    assert_eq!(h.state.selected().as_deref(), Some(&[0usize][..]));
    assert_eq!(h.state.offset(), 0.0);
}

/// Scene graph that records which primitives were written.
#[derive(Default)]
struct Recorder {
    inner: NodeStore,
    touched: Vec<PrimitiveId>,
}

impl SceneGraph for Recorder {
    fn create_node(&mut self, parent: Option<NodeId>) -> NodeId {
        self.inner.create_node(parent)
    }
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.node(id)
    }
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.inner.node_mut(id)
    }
    fn add_primitive(&mut self, node: NodeId, prim: Primitive) -> PrimitiveId {
        self.inner.add_primitive(node, prim)
    }
    fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.inner.primitive(id)
    }
    fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.touched.push(id);
        self.inner.primitive_mut(id)
    }
    fn remove_subtree(&mut self, id: NodeId) {
        self.inner.remove_subtree(id)
    }
    fn roots(&self) -> Vec<NodeId> {
        self.inner.roots()
    }
    fn node_ids(&self) -> Vec<NodeId> {
        self.inner.node_ids()
    }
}

#[test]
fn changing_selection_repaints_only_two_rows() {
    let _ = env_logger::builder().is_test(true).try_init();
    let theme = Theme::default();
    let config = UiConfig::default();
    let metrics = Rc::new(ApproxMetrics::default());
    let mut reconciler = Reconciler::new();
    let mut memory = Memory::default();
    let mut graph = Recorder::default();
    let top = graph.create_node(None);

    let p = metrics.line_height(&theme.text_style(StyleToken::TreeLabel)) + config.tree_row_padding * 2.0;
    let size = Size::new(240.0, 20.0 * p);
    let h = {
        let mut cx = BuildCx::new(
            &mut graph,
            &theme,
            &config,
            metrics.clone(),
            Rc::new(ManualClock::new()),
            RebuildFlag::default(),
            &mut reconciler,
            &mut memory,
            top,
        );
        TreeView(
            &mut cx,
            TreeViewSpec::new(twelve_leaves()).size(SizeSpec::fixed(size.width, size.height)),
        )
    };
    let root = h.handle.root;
    let Some(cb) = graph.callback(root) else {
        panic!("tree view has no callback");
    };
    let press = |row: usize| {
        InputEvent::pointer(EventKind::PointerDown, Vec2::new(150.0, (row as f32 + 0.5) * p), size)
    };

    cb.on_event(&mut graph, root, &press(3)).unwrap();
    graph.touched.clear();
    cb.on_event(&mut graph, root, &press(8)).unwrap();

    let rows = [h.visuals[3].node, h.visuals[8].node];
    assert!(!graph.touched.is_empty());
    for prim in &graph.touched {
        let owner = graph.inner.owner(*prim);
        assert!(
            owner.is_some_and(|o| rows.contains(&o)),
            "{prim:?} belongs to {owner:?}"
        );
    }
}
