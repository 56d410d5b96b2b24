//! Render adapters and side panels. None of these hold graph state of their
//! own; they read from a [`GraphViewEngine`] and mutate it only through its
//! mutators.

use leptos::prelude::*;

use crate::graph::GraphViewEngine;

pub mod details_panel;
pub mod filter_panel;
pub mod force_graph;

/// Shared, `Copy` handle to the engine owned by the mounting page.
pub type EngineHandle = StoredValue<GraphViewEngine, LocalStorage>;

/// A signal bumped on every engine notification, for panels to track.
///
/// The subscription is released when the calling owner is cleaned up.
pub fn track_revisions(engine: EngineHandle) -> RwSignal<u64> {
	let revision = RwSignal::new(0u64);
	let sub = engine.with_value(|e| e.subscribe(move || revision.update(|r| *r += 1)));
	let sub = StoredValue::new_local(Some(sub));
	on_cleanup(move || {
		if let Some(Some(sub)) = sub.try_update_value(Option::take) {
			sub.unsubscribe();
		}
	});
	revision
}
