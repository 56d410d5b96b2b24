use leptos::prelude::*;
use log::warn;

use crate::components::details_panel::NodeDetailsPanel;
use crate::components::filter_panel::FilterPanel;
use crate::components::force_graph::{ForceGraphCanvas, Layout};
use crate::components::track_revisions;
use crate::data::sample_dataset;
use crate::graph::GraphViewEngine;

/// Explorer page: canvas, type filters and the selected node's details.
#[component]
pub fn Home() -> impl IntoView {
	let dataset = sample_dataset();
	if let Err(err) = dataset.validate() {
		warn!("reference dataset: {err}");
	}

	let engine = StoredValue::new_local(GraphViewEngine::new(dataset));
	let revision = track_revisions(engine);
	let layout = RwSignal::new(Layout::Force);

	let hovered_label = move || {
		revision.track();
		engine.with_value(|e| {
			e.hovered_node_id()
				.and_then(|id| e.node_by_id(&id).map(|n| n.label.clone()))
		})
	};

	let layout_options = Layout::ALL
		.into_iter()
		.map(|option| {
			view! {
				<label class="layout-option">
					<input
						type="radio"
						name="layout"
						prop:checked=move || layout.get() == option
						on:change=move |_| layout.set(option)
					/>
					<span>{option.label()}</span>
				</label>
			}
		})
		.collect_view();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas engine=engine layout=layout fullscreen=true />
				<div class="graph-overlay">
					<h1>"Graph Explorer"</h1>
					<p class="subtitle">
						"Hover a node to focus its neighborhood. Click to inspect. Scroll to zoom."
					</p>
					<p class="hovered">{move || hovered_label().unwrap_or_default()}</p>
					<div class="layout-options">{layout_options}</div>
				</div>
				<div class="side-panels">
					<FilterPanel engine=engine revision=revision />
					<NodeDetailsPanel engine=engine revision=revision />
				</div>
			</div>
		</ErrorBoundary>
	}
}
