//! Session state for one visualization: type filters, selection and hover.
//!
//! Mutators take `&self` so that listeners can read the state back while they
//! are being notified. A listener must not mutate the same state from inside
//! its callback; doing so notifies again, re-entrantly.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use super::types::{NodeId, NodeType};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
	next_id: u64,
	entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`ViewState::subscribe`].
///
/// Dropping it keeps the listener registered; call [`Subscription::unsubscribe`]
/// to remove it.
#[must_use = "dropping a Subscription does not unsubscribe"]
pub struct Subscription {
	id: u64,
	listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
	/// Removes exactly the listener this handle was created for.
	pub fn unsubscribe(self) {
		if let Some(listeners) = self.listeners.upgrade() {
			listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
		}
	}
}

/// Filters, selection and hover for one engine, plus its listeners.
#[derive(Default)]
pub struct ViewState {
	selected: RefCell<Option<NodeId>>,
	hovered: RefCell<Option<NodeId>>,
	filters: RefCell<BTreeSet<NodeType>>,
	listeners: Rc<RefCell<Listeners>>,
}

impl ViewState {
	/// No filters, nothing selected or hovered, no listeners.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `node_type` if absent, removes it if present.
	pub fn toggle_type_filter(&self, node_type: NodeType) {
		{
			let mut filters = self.filters.borrow_mut();
			if !filters.remove(&node_type) {
				filters.insert(node_type);
			}
		}
		self.notify();
	}

	/// Back to the empty set, which shows every type.
	pub fn clear_filters(&self) {
		self.filters.borrow_mut().clear();
		self.notify();
	}

	/// Replaces the selected id, then notifies.
	pub fn set_selected(&self, id: Option<NodeId>) {
		self.selected.replace(id);
		self.notify();
	}

	/// Replaces the hovered id, then notifies.
	pub fn set_hovered(&self, id: Option<NodeId>) {
		self.hovered.replace(id);
		self.notify();
	}

	/// Active filters, in [`NodeType`] declaration order.
	pub fn active_type_filters(&self) -> Vec<NodeType> {
		self.filters.borrow().iter().copied().collect()
	}

	/// Whether `node_type` is in the filter.
	pub fn is_type_active(&self, node_type: NodeType) -> bool {
		self.filters.borrow().contains(&node_type)
	}

	/// The selected id, if any.
	pub fn selected_node_id(&self) -> Option<NodeId> {
		self.selected.borrow().clone()
	}

	/// The hovered id, if any.
	pub fn hovered_node_id(&self) -> Option<NodeId> {
		self.hovered.borrow().clone()
	}

	/// Runs `f` with the current filter set borrowed.
	pub(crate) fn with_filters<R>(&self, f: impl FnOnce(&BTreeSet<NodeType>) -> R) -> R {
		f(&self.filters.borrow())
	}

	/// Registers `listener` to run after every mutator call, in subscription order.
	pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
		let mut listeners = self.listeners.borrow_mut();
		let id = listeners.next_id;
		listeners.next_id += 1;
		let listener: Listener = Rc::new(listener);
		listeners.entries.push((id, listener));
		Subscription {
			id,
			listeners: Rc::downgrade(&self.listeners),
		}
	}

	/// How many listeners are subscribed.
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().entries.len()
	}

	fn notify(&self) {
		// snapshot so a listener may subscribe or unsubscribe while we iterate
		let snapshot: Vec<Listener> = self
			.listeners
			.borrow()
			.entries
			.iter()
			.map(|(_, l)| Rc::clone(l))
			.collect();
		for listener in snapshot {
			listener();
		}
	}
}

impl std::fmt::Debug for ViewState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewState")
			.field("selected", &self.selected.borrow())
			.field("hovered", &self.hovered.borrow())
			.field("filters", &self.filters.borrow())
			.field("listeners", &self.listener_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	fn counter(state: &ViewState) -> (Rc<Cell<u32>>, Subscription) {
		let hits = Rc::new(Cell::new(0));
		let sub = state.subscribe({
			let hits = Rc::clone(&hits);
			move || hits.set(hits.get() + 1)
		});
		(hits, sub)
	}

	#[test]
	fn toggle_is_symmetric_difference() {
		let state = ViewState::new();
		state.toggle_type_filter(NodeType::Person);
		state.toggle_type_filter(NodeType::Company);
		assert_eq!(state.active_type_filters(), [NodeType::Person, NodeType::Company]);

		state.toggle_type_filter(NodeType::Person);
		assert_eq!(state.active_type_filters(), [NodeType::Company]);
		assert!(!state.is_type_active(NodeType::Person));

		state.clear_filters();
		assert!(state.active_type_filters().is_empty());
	}

	#[test]
	fn every_mutator_notifies_once() {
		let state = ViewState::new();
		let (hits, _sub) = counter(&state);

		state.toggle_type_filter(NodeType::Event);
		state.clear_filters();
		state.set_selected(Some("1".into()));
		state.set_hovered(Some("2".into()));
		assert_eq!(hits.get(), 4);

		// redundant sets still notify
		state.set_hovered(Some("2".into()));
		assert_eq!(hits.get(), 5);
		assert_eq!(state.hovered_node_id().as_deref(), Some("2"));
	}

	#[test]
	fn listeners_run_in_subscription_order() {
		let state = ViewState::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		let subs: Vec<_> = (0..3)
			.map(|i| {
				let log = Rc::clone(&log);
				state.subscribe(move || log.borrow_mut().push(i))
			})
			.collect();

		state.set_selected(None);
		assert_eq!(*log.borrow(), [0, 1, 2]);
		drop(subs);
	}

	#[test]
	fn unsubscribe_removes_only_that_listener() {
		let state = ViewState::new();
		let (first, first_sub) = counter(&state);
		let (second, _second_sub) = counter(&state);

		first_sub.unsubscribe();
		assert_eq!(state.listener_count(), 1);

		state.set_selected(Some("x".into()));
		assert_eq!(first.get(), 0);
		assert_eq!(second.get(), 1);
	}

	#[test]
	fn listener_can_read_state_while_notified() {
		let state = Rc::new(ViewState::new());
		let seen = Rc::new(RefCell::new(None));
		let _sub = state.subscribe({
			let state = Rc::downgrade(&state);
			let seen = Rc::clone(&seen);
			move || {
				if let Some(state) = state.upgrade() {
					*seen.borrow_mut() = state.selected_node_id();
				}
			}
		});

		state.set_selected(Some("C1".into()));
		assert_eq!(seen.borrow().as_deref(), Some("C1"));
	}

	#[test]
	fn unsubscribe_after_state_dropped_is_harmless() {
		let state = ViewState::new();
		let (_hits, sub) = counter(&state);
		drop(state);
		sub.unsubscribe();
	}
}
