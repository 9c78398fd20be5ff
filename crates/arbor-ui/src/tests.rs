#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use arbor_text::ApproxMetrics;

    use crate::*;

    fn ui() -> Ui {
        let _ = env_logger::builder().is_test(true).try_init();
        Ui::new(Rc::new(ApproxMetrics::default()))
    }

    fn prims_with(ui: &Ui, node: NodeId, token: StyleToken) -> Vec<PrimitiveId> {
        let g = ui.graph();
        g.node(node)
            .map(|n| {
                n.primitives
                    .iter()
                    .copied()
                    .filter(|p| g.primitive(*p).is_some_and(|p| p.style() == token))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_style(ui: &Ui, node: NodeId, token: StyleToken) -> bool {
        !prims_with(ui, node, token).is_empty()
    }

    fn click(ui: &mut Ui, node: NodeId, x: f32, y: f32) {
        ui.pointer(node, EventKind::PointerDown, x, y).unwrap();
        ui.pointer(node, EventKind::PointerUp, x, y).unwrap();
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let n = Rc::new(Cell::new(0));
        let c = n.clone();
        (n, move || c.set(c.get() + 1))
    }

    #[test]
    fn button_cancel_never_clicks() {
        let mut ui = ui();
        let (clicks, on_click) = counter();
        let b = ui.build(|cx| Button(cx, ButtonSpec::new("Save").on_click(on_click)));

        ui.pointer(b.root, EventKind::PointerDown, 10.0, 10.0).unwrap();
        assert!(has_style(&ui, b.root, StyleToken::ButtonPressed));
        ui.pointer(b.root, EventKind::PointerCancel, 10.0, 10.0).unwrap();
        assert_eq!(clicks.get(), 0);
        assert!(!has_style(&ui, b.root, StyleToken::ButtonPressed));
        assert!(has_style(&ui, b.root, StyleToken::Button));
        assert!(!has_style(&ui, b.root, StyleToken::ButtonHover));

        click(&mut ui, b.root, 10.0, 10.0);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn button_release_outside_does_not_click() {
        let mut ui = ui();
        let (clicks, on_click) = counter();
        let b = ui.build(|cx| Button(cx, ButtonSpec::new("Save").on_click(on_click)));

        ui.pointer(b.root, EventKind::PointerDown, 10.0, 10.0).unwrap();
        ui.pointer(b.root, EventKind::PointerDrag, 500.0, 10.0).unwrap();
        ui.pointer(b.root, EventKind::PointerUp, 500.0, 10.0).unwrap();
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn button_activates_from_keyboard() {
        let mut ui = ui();
        let (clicks, on_click) = counter();
        let b = ui.build(|cx| Button(cx, ButtonSpec::new("Go").on_click(on_click)));
        assert!(ui.focus(b.root));
        ui.dispatch_focused(Key::Enter, Modifiers::default()).unwrap();
        ui.dispatch_focused(Key::Space, Modifiers::default()).unwrap();
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn button_sizes_from_label() {
        let mut ui = ui();
        let (short, long) = ui.build(|cx| {
            (
                Button(cx, ButtonSpec::new("Ok")),
                Button(cx, ButtonSpec::new("Save changes and close")),
            )
        });
        let w = |h: WidgetHandle| ui.graph().node(h.root).map(|n| n.measured.width).unwrap_or(0.0);
        assert_eq!(w(short), 64.0);
        assert!(w(long) > 64.0);
    }

    #[test]
    fn disabled_and_hidden_widgets_get_no_callback() {
        let mut ui = ui();
        let (a, b) = ui.build(|cx| {
            (
                Button(cx, ButtonSpec::new("A").enabled(false)),
                Button(cx, ButtonSpec::new("B").visible(false)),
            )
        });
        assert!(ui.graph().callback(a.root).is_none());
        assert!(ui.graph().callback(b.root).is_none());
        assert!(has_style(&ui, a.root, StyleToken::ButtonDisabled));
        assert_eq!(ui.pointer(a.root, EventKind::PointerDown, 1.0, 1.0), Ok(false));
    }

    #[test]
    fn checkbox_cancel_returns_to_resting_box() {
        let mut ui = ui();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let c = ui.build(|cx| Checkbox(cx, CheckboxSpec::new(false, "Wrap").on_change(move |v| s.borrow_mut().push(v))));

        ui.pointer(c.root, EventKind::PointerDown, 5.0, 5.0).unwrap();
        ui.pointer(c.root, EventKind::PointerCancel, 5.0, 5.0).unwrap();
        assert!(seen.borrow().is_empty());
        assert!(has_style(&ui, c.root, StyleToken::CheckboxBox));
        assert!(!has_style(&ui, c.root, StyleToken::CheckboxBoxHover));
    }

    #[test]
    fn checkbox_toggles_on_click_and_space() {
        let mut ui = ui();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let c = ui.build(|cx| Checkbox(cx, CheckboxSpec::new(false, "Wrap").on_change(move |v| s.borrow_mut().push(v))));
        let mark = prims_with(&ui, c.root, StyleToken::CheckboxMark)[0];
        assert!(!ui.graph().primitive(mark).unwrap().is_visible());

        click(&mut ui, c.root, 5.0, 5.0);
        assert!(ui.graph().primitive(mark).unwrap().is_visible());
        ui.dispatch_focused(Key::Space, Modifiers::default()).unwrap();
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!ui.graph().primitive(mark).unwrap().is_visible());
    }

    #[test]
    fn toggle_defaults_to_track_size() {
        let mut ui = ui();
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let t = ui.build(|cx| Toggle(cx, ToggleSpec::new(false).on_change(move |v| s.set(Some(v)))));
        let n = ui.graph().node(t.root).unwrap();
        assert_eq!(n.measured, Size::new(40.0, 20.0));
        click(&mut ui, t.root, 30.0, 10.0);
        assert_eq!(seen.get(), Some(true));
        assert!(has_style(&ui, t.root, StyleToken::ToggleTrackOn));
    }

    #[test]
    fn dropdown_keyboard_choice() {
        let mut ui = ui();
        let chosen = Rc::new(Cell::new(None));
        let c = chosen.clone();
        let d = ui.build(|cx| Dropdown(cx, DropdownSpec::new(["Low", "Medium", "High"]).on_change(move |i| c.set(Some(i)))));
        let list = ui.graph().children(d.root)[0];
        assert!(!ui.graph().node(list).unwrap().is_visible());

        ui.focus(d.root);
        for k in [Key::ArrowDown, Key::ArrowDown, Key::ArrowDown, Key::Enter] {
            ui.dispatch_focused(k, Modifiers::default()).unwrap();
        }
        assert_eq!(chosen.get(), Some(1));
        assert!(!ui.graph().node(list).unwrap().is_visible());
        let label = ui
            .graph()
            .node(d.root)
            .unwrap()
            .primitives
            .iter()
            .filter_map(|p| ui.graph().primitive(*p).and_then(|p| p.text()))
            .any(|t| t == "Medium");
        assert!(label);
    }

    #[test]
    fn dropdown_pointer_choice_and_blur_closes() {
        let mut ui = ui();
        let chosen = Rc::new(Cell::new(None));
        let c = chosen.clone();
        let d = ui.build(|cx| Dropdown(cx, DropdownSpec::new(["a", "b", "c"]).on_change(move |i| c.set(Some(i)))));
        let list = ui.graph().children(d.root)[0];
        let trigger_h = ui.graph().node(d.root).unwrap().measured.height;
        let option_h = ui.graph().node(list).unwrap().measured.height / 3.0;

        click(&mut ui, d.root, 10.0, 10.0);
        assert!(ui.graph().node(list).unwrap().is_visible());
        click(&mut ui, d.root, 10.0, trigger_h + option_h * 2.5);
        assert_eq!(chosen.get(), Some(2));

        click(&mut ui, d.root, 10.0, 10.0);
        assert!(ui.graph().node(list).unwrap().is_visible());
        ui.blur();
        assert!(!ui.graph().node(list).unwrap().is_visible());
    }

    #[test]
    fn empty_dropdown_is_inert() {
        let mut ui = ui();
        let d = ui.build(|cx| Dropdown(cx, DropdownSpec::new(Vec::<String>::new()).placeholder("None")));
        assert!(d.is_valid());
        assert!(ui.graph().callback(d.root).is_none());
    }

    #[test]
    fn tabs_select_by_click_and_arrows() {
        let mut ui = ui();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let t = ui.build(|cx| Tabs(cx, TabsSpec::new(["One", "Two", "Three"]).on_change(move |i| s.borrow_mut().push(i))));
        let third = ui.graph().children(t.root)[2];
        let x = ui.graph().node(third).unwrap().position.x + 2.0;

        click(&mut ui, t.root, x, 4.0);
        ui.dispatch_focused(Key::ArrowLeft, Modifiers::default()).unwrap();
        ui.dispatch_focused(Key::Home, Modifiers::default()).unwrap();
        assert_eq!(*seen.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn table_selection_repaints_two_rows() {
        let mut ui = ui();
        let picked = Rc::new(RefCell::new(Vec::new()));
        let p = picked.clone();
        let rows: Vec<Vec<String>> = (0..4).map(|i| vec![format!("r{i}"), format!("{}", i * 10)]).collect();
        let t = ui.build(|cx| {
            Table(
                cx,
                TableSpec::new(vec![ColumnSpec::fixed("Name", 100.0), ColumnSpec::auto("Value")], rows)
                    .size(SizeSpec::new().width(300.0))
                    .on_select(move |info| p.borrow_mut().push(info.clone())),
            )
        });
        assert_eq!(t.column_widths, vec![100.0, 199.0]);

        let root = t.handle.root;
        let y = t.header_height + t.row_height * 1.5;
        click(&mut ui, root, 150.0, y);
        ui.dispatch_focused(Key::ArrowDown, Modifiers::default()).unwrap();

        let picked = picked.borrow();
        assert_eq!(picked.len(), 2);
        assert_eq!((picked[0].row, picked[0].column), (1, Some(1)));
        assert_eq!(picked[0].cells, vec!["r1".to_string(), "10".to_string()]);
        assert_eq!((picked[1].row, picked[1].column), (2, None));

        let row_nodes = &ui.graph().children(root)[1..];
        let selected: Vec<bool> = row_nodes
            .iter()
            .map(|r| has_style(&ui, *r, StyleToken::TableRowSelected))
            .collect();
        assert_eq!(selected, vec![false, false, true, false]);
    }

    #[test]
    fn text_field_edits_while_focused() {
        let mut ui = ui();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let submitted = Rc::new(RefCell::new(None));
        let (c, s) = (changes.clone(), submitted.clone());
        let f = ui.build(|cx| {
            TextField(
                cx,
                TextFieldSpec::new("")
                    .placeholder("Name")
                    .on_change(move |t| c.borrow_mut().push(t.to_string()))
                    .on_submit(move |t| *s.borrow_mut() = Some(t.to_string())),
            )
        });
        // press focuses the field
        click(&mut ui, f.handle.root, 20.0, 5.0);
        assert_eq!(ui.focused(), Some(f.handle.root));
        for k in [Key::Character('h'), Key::Character('é'), Key::Backspace, Key::Character('i'), Key::Enter] {
            ui.dispatch_focused(k, Modifiers::default()).unwrap();
        }
        assert_eq!(f.text(), "hi");
        assert_eq!(*changes.borrow(), vec!["h", "hé", "h", "hi"]);
        assert_eq!(submitted.borrow().as_deref(), Some("hi"));
        assert!(has_style(&ui, f.handle.root, StyleToken::FieldFocused));
    }

    #[test]
    fn progress_seeks_only_with_callback() {
        let mut ui = ui();
        let sought = Rc::new(Cell::new(None));
        let s = sought.clone();
        let (plain, seek) = ui.build(|cx| {
            (
                ProgressBar(cx, ProgressSpec::new(0.3)),
                ProgressBar(
                    cx,
                    ProgressSpec::new(20.0)
                        .range(0.0, 100.0)
                        .size(SizeSpec::fixed(200.0, 6.0))
                        .on_seek(move |v| s.set(Some(v))),
                ),
            )
        });
        assert!(ui.graph().callback(plain.root).is_none());
        click(&mut ui, seek.root, 150.0, 3.0);
        assert_eq!(sought.get(), Some(75.0));
    }

    #[test]
    fn slider_keyboard_steps_and_extremes() {
        let mut ui = ui();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let h = ui.build(|cx| {
            Slider(
                cx,
                SliderSpec::new(5.0)
                    .range(0.0, 10.0)
                    .step(1.0)
                    .on_change(move |v| s.borrow_mut().push(v)),
            )
        });
        ui.focus(h.handle.root);
        for k in [Key::ArrowRight, Key::ArrowDown, Key::ArrowDown, Key::End, Key::PageDown, Key::Home] {
            ui.dispatch_focused(k, Modifiers::default()).unwrap();
        }
        assert_eq!(*seen.borrow(), vec![6.0, 5.0, 4.0, 10.0, 0.0, 0.0]);
        assert_eq!(h.value(), 0.0);
    }

    #[test]
    fn tab_moves_focus_in_tab_order() {
        let mut ui = ui();
        let (a, b, c) = ui.build(|cx| {
            (
                Button(cx, ButtonSpec::new("a").tab_index(1)),
                Button(cx, ButtonSpec::new("b")),
                Button(cx, ButtonSpec::new("c")),
            )
        });
        let tab = |ui: &mut Ui, shift: bool| {
            ui.dispatch_focused(
                Key::Tab,
                Modifiers {
                    shift,
                    ..Modifiers::default()
                },
            )
            .unwrap();
            ui.focused()
        };
        assert_eq!(tab(&mut ui, false), Some(b.root));
        assert_eq!(tab(&mut ui, false), Some(c.root));
        assert_eq!(tab(&mut ui, false), Some(a.root));
        assert_eq!(tab(&mut ui, false), Some(b.root));
        assert_eq!(tab(&mut ui, true), Some(a.root));
    }

    #[test]
    fn focus_ring_follows_focus() {
        let mut ui = ui();
        let b = ui.build(|cx| Button(cx, ButtonSpec::new("x")));
        let ring = prims_with(&ui, b.root, StyleToken::FocusRing)[0];
        assert!(!ui.graph().primitive(ring).unwrap().is_visible());
        ui.focus(b.root);
        assert!(ui.graph().primitive(ring).unwrap().is_visible());
        ui.blur();
        assert!(!ui.graph().primitive(ring).unwrap().is_visible());
    }

    #[test]
    fn scroll_view_wheel_clamps_and_bubbles_at_the_end() {
        let mut ui = ui();
        let sv = ui.build(|cx| {
            ScrollView(cx, ScrollViewSpec::new().size(SizeSpec::fixed(120.0, 100.0)), |cx| {
                for i in 0..10 {
                    Text(cx, TextSpec::new(format!("line {i}")).size(SizeSpec::new().height(20.0)));
                }
            })
        });
        let vp = sv.handle.root;
        assert_eq!(sv.state.metrics().content(), 200.0);

        assert_eq!(ui.wheel(vp, 10.0, 10.0, Vec2::new(0.0, 30.0)), Ok(true));
        assert_eq!(sv.state.offset(), 30.0);
        assert_eq!(ui.graph().node(vp).unwrap().scroll_offset.y, 30.0);

        ui.wheel(vp, 10.0, 10.0, Vec2::new(0.0, 1000.0)).unwrap();
        assert_eq!(sv.state.offset(), 100.0);
        // nothing left to scroll: let a parent have it
        assert_eq!(ui.wheel(vp, 10.0, 10.0, Vec2::new(0.0, 5.0)), Ok(false));
    }

    #[test]
    fn scroll_view_thumb_drag_and_cancel() {
        let mut ui = ui();
        let sv = ui.build(|cx| {
            ScrollView(
                cx,
                ScrollViewSpec::new()
                    .size(SizeSpec::fixed(120.0, 100.0))
                    .content_height(400.0),
                |_| {},
            )
        });
        let vp = sv.handle.root;
        // thumb is 25 long at the top; max offset 300 over 75 of travel
        ui.pointer(vp, EventKind::PointerDown, 116.0, 10.0).unwrap();
        ui.pointer(vp, EventKind::PointerDrag, 116.0, 20.0).unwrap();
        assert_eq!(sv.state.offset(), 40.0);
        ui.pointer(vp, EventKind::PointerCancel, 116.0, 20.0).unwrap();
        assert_eq!(sv.state.offset(), 0.0);

        ui.pointer(vp, EventKind::PointerDown, 116.0, 10.0).unwrap();
        ui.pointer(vp, EventKind::PointerDrag, 116.0, 30.0).unwrap();
        ui.pointer(vp, EventKind::PointerUp, 116.0, 30.0).unwrap();
        assert_eq!(sv.state.offset(), 80.0);
    }

    #[test]
    fn stale_dispatch_reports_error() {
        let mut ui = ui();
        let b = ui.build(|cx| Button(cx, ButtonSpec::new("x")));
        ui.build(|_| {});
        assert_eq!(
            ui.pointer(b.root, EventKind::PointerDown, 1.0, 1.0),
            Err(DispatchError::StaleNode { node: b.root })
        );
    }

    #[test]
    fn remembered_state_survives_rebuilds() {
        let mut ui = ui();
        let first = ui.build(|cx| remember_scroll_state(cx, "log"));
        first.set_offset(12.0);
        let second = ui.build(|cx| remember_scroll_state(cx, "log"));
        assert!(Rc::ptr_eq(&first, &second));
    }
}
