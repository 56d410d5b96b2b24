use std::collections::HashSet;
use std::rc::Rc;

use log::debug;

use super::store::GraphStore;
use super::types::{Edge, GraphDataset, Node, NodeDetails, NodeId, NodeType};
use super::view_state::{Subscription, ViewState};

/// Query surface for renderers.
///
/// Everything is derived from the store and the current view state on each
/// call. An edge counts as visible only when both of its endpoints are, and
/// selection details and hover highlights are cut down to the visible set the
/// same way.
#[derive(Debug)]
pub struct GraphViewEngine {
	store: Rc<GraphStore>,
	state: ViewState,
}

impl GraphViewEngine {
	/// Builds an engine over its own store of `dataset`.
	pub fn new(dataset: GraphDataset) -> Self {
		Self::with_store(Rc::new(GraphStore::new(dataset)))
	}

	/// Builds an engine over a store that other engines may also be reading.
	pub fn with_store(store: Rc<GraphStore>) -> Self {
		debug!(
			"graph engine ready: {} nodes, {} edges",
			store.node_count(),
			store.edge_count()
		);
		Self {
			store,
			state: ViewState::new(),
		}
	}

	/// Nodes passing the type filter, in dataset order.
	pub fn visible_nodes(&self) -> Vec<&Node> {
		self.state.with_filters(|filters| {
			self.store
				.all_nodes()
				.iter()
				.filter(|n| filters.is_empty() || filters.contains(&n.node_type))
				.collect()
		})
	}

	/// Ids of [`visible_nodes`](Self::visible_nodes).
	pub fn visible_node_ids(&self) -> HashSet<&str> {
		self.visible_nodes().into_iter().map(|n| n.id.as_str()).collect()
	}

	/// Whether `id` resolves to a node that passes the type filter.
	pub fn is_node_visible(&self, id: &str) -> bool {
		self.store.node_by_id(id).is_some_and(|n| {
			self.state
				.with_filters(|filters| filters.is_empty() || filters.contains(&n.node_type))
		})
	}

	/// Edges whose endpoints are both visible, in dataset order.
	pub fn visible_edges(&self) -> Vec<&Edge> {
		let visible = self.visible_node_ids();
		self.store
			.all_edges()
			.iter()
			.filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
			.collect()
	}

	/// Details of the selected node, or `None` when nothing is selected or the
	/// selected id does not resolve.
	pub fn selected_node_details(&self) -> Option<NodeDetails> {
		let id = self.state.selected_node_id()?;
		let node = self.store.node_by_id(&id)?;
		let visible = self.visible_node_ids();

		let connections = self
			.store
			.connected_nodes(&id)
			.into_iter()
			.filter(|n| visible.contains(n.id.as_str()))
			.cloned()
			.collect();
		let relationships = self
			.store
			.relationships_of(&id)
			.filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
			.cloned()
			.collect();

		Some(NodeDetails {
			node: node.clone(),
			connections,
			relationships,
		})
	}

	/// Visible neighbors of the hovered node; empty when nothing is hovered.
	pub fn hovered_neighbor_ids(&self) -> HashSet<NodeId> {
		let Some(id) = self.state.hovered_node_id() else {
			return HashSet::new();
		};
		let visible = self.visible_node_ids();
		self.store
			.neighbor_ids(&id)
			.into_iter()
			.filter(|n| visible.contains(n))
			.map(str::to_owned)
			.collect()
	}

	/// Types present in the data, in first-seen order.
	pub fn node_types_available(&self) -> Vec<NodeType> {
		self.store.unique_types_present()
	}

	/// Looks up any node, visible or not.
	pub fn node_by_id(&self, id: &str) -> Option<&Node> {
		self.store.node_by_id(id)
	}

	/// Adds or removes `node_type` from the filter, then notifies.
	pub fn toggle_type_filter(&self, node_type: NodeType) {
		self.state.toggle_type_filter(node_type);
		debug!(
			"type filter {node_type} toggled, active: {:?}",
			self.state.active_type_filters()
		);
	}

	/// Empties the filter, then notifies.
	pub fn clear_filters(&self) {
		self.state.clear_filters();
		debug!("type filters cleared");
	}

	/// Replaces the selection, then notifies.
	pub fn set_selected_node(&self, id: Option<NodeId>) {
		self.state.set_selected(id);
	}

	/// Replaces the hovered node, then notifies.
	pub fn set_hovered_node(&self, id: Option<NodeId>) {
		self.state.set_hovered(id);
	}

	/// Active filters, in [`NodeType`] declaration order.
	pub fn active_type_filters(&self) -> Vec<NodeType> {
		self.state.active_type_filters()
	}

	/// Whether `node_type` is in the filter.
	pub fn is_type_active(&self, node_type: NodeType) -> bool {
		self.state.is_type_active(node_type)
	}

	/// The selected id, resolvable or not.
	pub fn selected_node_id(&self) -> Option<NodeId> {
		self.state.selected_node_id()
	}

	/// The hovered id, resolvable or not.
	pub fn hovered_node_id(&self) -> Option<NodeId> {
		self.state.hovered_node_id()
	}

	/// How many listeners are subscribed.
	pub fn listener_count(&self) -> usize {
		self.state.listener_count()
	}

	/// See [`ViewState::subscribe`].
	pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
		self.state.subscribe(listener)
	}
}
