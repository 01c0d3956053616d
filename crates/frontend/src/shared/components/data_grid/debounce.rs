//! Один отложенный вызов поиска на таблицу.

/// Holds at most one pending timer. Arming replaces the previous one;
/// dropping a `gloo_timers::callback::Timeout` cancels it.
#[derive(Debug)]
pub struct PendingTimer<T> {
    current: Option<T>,
}

impl<T> Default for PendingTimer<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> PendingTimer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, timer: T) {
        self.current = Some(timer);
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn is_armed(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_rearm_drops_previous_timer() {
        let dropped = Rc::new(Cell::new(0));
        let mut slot = PendingTimer::new();

        for _ in 0..5 {
            slot.arm(Tracked(dropped.clone()));
        }
        // one live timer, four cancelled
        assert_eq!(dropped.get(), 4);
        assert!(slot.is_armed());

        slot.cancel();
        assert_eq!(dropped.get(), 5);
        assert!(!slot.is_armed());
    }
}
