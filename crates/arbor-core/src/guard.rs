use std::cell::Cell;

/// "Currently executing" flag for one callback.
///
/// [`enter`](Self::enter) hands out a token while the flag is clear; the
/// flag is released when the token drops, on every exit path.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    busy: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while a token from an outer call is still alive.
    pub fn enter(&self) -> Option<GuardToken<'_>> {
        if self.busy.replace(true) {
            None
        } else {
            Some(GuardToken { guard: self })
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

#[must_use]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_enter_is_refused_until_release() {
        let g = ReentrancyGuard::new();
        {
            let _outer = g.enter().expect("first entry");
            assert!(g.is_busy());
            assert!(g.enter().is_none());
        }
        assert!(!g.is_busy());
        assert!(g.enter().is_some());
    }

    #[test]
    fn released_on_unwind() {
        let g = ReentrancyGuard::new();
        let r = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _t = g.enter();
            panic!("boom");
        }));
        assert!(r.is_err());
        assert!(!g.is_busy());
    }
}
