use leptos::prelude::*;

use super::EngineHandle;
use super::force_graph::scale::type_color;

/// Checkbox per node type present in the data, plus a reset button.
///
/// No box ticked means no filtering.
#[component]
pub fn FilterPanel(engine: EngineHandle, #[prop(into)] revision: Signal<u64>) -> impl IntoView {
	let rows = engine
		.with_value(|e| e.node_types_available())
		.into_iter()
		.map(|ty| {
			let checked = move || {
				revision.track();
				engine.with_value(|e| e.is_type_active(ty))
			};
			view! {
				<label class="filter-row">
					<input
						type="checkbox"
						prop:checked=checked
						on:change=move |_| engine.with_value(|e| e.toggle_type_filter(ty))
					/>
					<span class="swatch" style=format!("background-color: {}", type_color(ty)) />
					<span class="filter-label">{ty.as_str()}</span>
				</label>
			}
		})
		.collect_view();

	let any_active = move || {
		revision.track();
		engine.with_value(|e| !e.active_type_filters().is_empty())
	};

	view! {
		<div class="panel filter-panel">
			<h3>"Filter by Type"</h3>
			{rows}
			<button
				class="clear-filters"
				prop:disabled=move || !any_active()
				on:click=move |_| engine.with_value(|e| e.clear_filters())
			>
				"Clear Filters"
			</button>
		</div>
	}
}
