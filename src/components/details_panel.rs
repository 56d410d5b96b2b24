use leptos::prelude::*;

use super::EngineHandle;
use super::force_graph::scale::type_color;
use crate::graph::NodeDetails;

/// `(relationship, partner label)` for each listed relationship.
///
/// A self-loop names the selected node itself as its partner.
pub fn relationship_lines(details: &NodeDetails) -> Vec<(String, String)> {
	details
		.relationships
		.iter()
		.map(|edge| {
			let partner = details.partner_of(edge).unwrap_or(&details.node);
			(edge.relationship.clone(), partner.label.clone())
		})
		.collect()
}

/// Side panel for the selected node. Renders nothing without a selection.
#[component]
pub fn NodeDetailsPanel(engine: EngineHandle, #[prop(into)] revision: Signal<u64>) -> impl IntoView {
	let details = move || {
		revision.track();
		engine.with_value(|e| e.selected_node_details())
	};

	move || {
		details().map(|details| {
			let lines = relationship_lines(&details);
			let NodeDetails {
				node, connections, ..
			} = details;
			let connections = connections
				.into_iter()
				.map(|n| {
					view! {
						<li class="connection">
							<span class="swatch" style=format!("background-color: {}", type_color(n.node_type)) />
							<span class="connection-label">{n.label}</span>
							<span class="connection-type">{n.node_type.as_str()}</span>
						</li>
					}
				})
				.collect_view();
			let relationships = lines
				.into_iter()
				.map(|(rel, partner)| {
					view! {
						<li class="relationship">
							<span class="relationship-kind">{rel}</span>
							" with "
							{partner}
						</li>
					}
				})
				.collect_view();

			view! {
				<div class="panel details-panel">
					<div class="details-header">
						<h3>{node.label}</h3>
						<button
							class="close"
							aria-label="Close details"
							on:click=move |_| engine.with_value(|e| e.set_selected_node(None))
						>
							"×"
						</button>
					</div>
					<span class="type-badge" style=format!("background-color: {}", type_color(node.node_type))>
						{node.node_type.as_str()}
					</span>
					<h4>"Connections"</h4>
					<ul class="connections">{connections}</ul>
					<h4>"Relationships"</h4>
					<ul class="relationships">{relationships}</ul>
				</div>
			}
		})
	}
}
