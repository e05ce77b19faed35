//! AND-composed card filters.
//!
//! A [`CardFilter`] describes one filter control: the options it offers and
//! how an option matches a card. A [`FilterSet`] holds the predicate each
//! control currently contributes; a control left on "All" contributes none.

use std::rc::Rc;

/// A pure test on one card.
pub type Predicate<C> = Rc<dyn Fn(&C) -> bool>;

/// Dropdown entry that disables a filter.
pub const ALL: &str = "All";

/// One filter control's options and matching rule.
pub struct CardFilter<C> {
    label: String,
    options: Vec<String>,
    matches: Rc<dyn Fn(&C, &str) -> bool>,
}

impl<C> Clone for CardFilter<C> {
    fn clone(&self) -> Self {
        Self { label: self.label.clone(), options: self.options.clone(), matches: Rc::clone(&self.matches) }
    }
}

impl<C: 'static> CardFilter<C> {
    pub fn new<I, S>(label: impl Into<String>, options: I, matches: impl Fn(&C, &str) -> bool + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { label: label.into(), options: options.into_iter().map(Into::into).collect(), matches: Rc::new(matches) }
    }

    /// A filter over one text property of the cards; options are the distinct
    /// values of `key` in catalog order.
    pub fn by_key(label: impl Into<String>, cards: &[Rc<C>], key: impl Fn(&C) -> String + 'static) -> Self {
        let mut options: Vec<String> = Vec::new();
        for card in cards {
            let value = key(&**card);
            if !options.contains(&value) {
                options.push(value);
            }
        }
        Self { label: label.into(), options, matches: Rc::new(move |card: &C, option: &str| key(card) == option) }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// `"All"` followed by the options, as shown in the control.
    pub fn dropdown_items(&self) -> Vec<String> {
        std::iter::once(ALL.to_owned()).chain(self.options.iter().cloned()).collect()
    }

    /// The predicate for a control sitting at dropdown index `index`; `None`
    /// for "All", no selection, or an index past the options.
    pub fn predicate_for(&self, index: i32) -> Option<Predicate<C>> {
        let option = usize::try_from(index).ok().filter(|&i| i > 0).and_then(|i| self.options.get(i - 1))?.clone();
        let matches = Rc::clone(&self.matches);
        Some(Rc::new(move |card: &C| matches(card, option.as_str())))
    }
}

/// One optional predicate per filter control.
pub struct FilterSet<C> {
    slots: Vec<Option<Predicate<C>>>,
}

impl<C> FilterSet<C> {
    pub fn new(controls: usize) -> Self {
        Self { slots: (0..controls).map(|_| None).collect() }
    }

    /// Sets control `slot`'s predicate; slots past the end are ignored.
    pub fn set(&mut self, slot: usize, predicate: Option<Predicate<C>>) {
        match self.slots.get_mut(slot) {
            Some(s) => *s = predicate,
            None => log::warn!("filter set: slot {slot} out of range ({} controls)", self.slots.len()),
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// AND of every active predicate; `true` when none is active.
    pub fn matches(&self, card: &C) -> bool {
        self.slots.iter().flatten().all(|p| p(card))
    }

    /// The matching subset of `cards`, order preserved.
    pub fn apply(&self, cards: &[Rc<C>]) -> Vec<Rc<C>> {
        cards.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}
