/// An explicitly connected, synchronous callback list.
///
/// Controls own one `Signal` per notification they raise. `emit` runs every
/// connected slot in connection order before returning, so listeners observe
/// the change inside the same update pass that caused it.
///
/// ```rust,ignore
/// let mut changed: Signal<i32> = Signal::new();
/// changed.connect(|index| log::info!("now {index}"));
/// changed.emit(&3);
/// ```
pub struct Signal<T> {
    slots: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn connect(&mut self, f: impl FnMut(&T) + 'static) {
        self.slots.push(Box::new(f));
    }

    pub fn emit(&mut self, value: &T) {
        for slot in &mut self.slots {
            slot(value);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn disconnect_all(&mut self) {
        self.slots.clear();
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn emit_runs_slots_in_connection_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<u32> = Signal::new();

        let a = log.clone();
        signal.connect(move |v| a.borrow_mut().push(format!("a{v}")));
        let b = log.clone();
        signal.connect(move |v| b.borrow_mut().push(format!("b{v}")));

        signal.emit(&7);
        assert_eq!(*log.borrow(), ["a7", "b7"]);
    }

    #[test]
    fn disconnected_signal_is_silent() {
        let hits = Rc::new(RefCell::new(0));
        let mut signal: Signal<()> = Signal::new();
        let h = hits.clone();
        signal.connect(move |_| *h.borrow_mut() += 1);
        signal.disconnect_all();
        signal.emit(&());
        assert_eq!(*hits.borrow(), 0);
        assert!(signal.is_empty());
    }
}
