use std::cell::RefCell;
use std::rc::Rc;

use arbor_text::ApproxMetrics;
use arbor_ui::*;

type Slot = Rc<RefCell<Option<Rc<dyn NodeCallback>>>>;

#[test]
fn callback_invoking_itself_is_suppressed_and_reported() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ui = Ui::new(Rc::new(ApproxMetrics::default()));

    let slot: Slot = Rc::default();
    let inner: Rc<RefCell<Vec<Result<bool, DispatchError>>>> = Rc::default();
    let (s, r) = (slot.clone(), inner.clone());
    let b = ui.build(|cx| {
        Button(
            cx,
            ButtonSpec::new("again").on_click(move || {
                let Some(cb) = s.borrow().clone() else {
                    return;
                };
                let mut scratch = NodeStore::new();
                let n = scratch.create_node(None);
                let ev = InputEvent::key(Key::Enter, Size::new(10.0, 10.0));
                r.borrow_mut().push(cb.on_event(&mut scratch, n, &ev));
            }),
        )
    });
    *slot.borrow_mut() = ui.graph().callback(b.root);

    assert_eq!(ui.key(b.root, Key::Enter), Ok(true));
    {
        let inner = inner.borrow();
        assert_eq!(inner.len(), 1);
        assert!(matches!(inner[0], Err(DispatchError::Reentrant { .. })));
    }

    // the guard is released once the outer call returns
    assert_eq!(ui.key(b.root, Key::Enter), Ok(true));
    assert_eq!(inner.borrow().len(), 2);
}
