use std::collections::HashSet;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::types::{Edge, GraphDataset, Node, NodeId, NodeType};

/// Problems [`GraphDataset::validate`] can report.
///
/// None of these stop a [`GraphStore`] from being built; they exist so the
/// caller can warn about suspicious input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
	/// A second node carries an id already taken.
	#[error("node id {0:?} appears more than once")]
	DuplicateNodeId(NodeId),
	/// An edge endpoint names no node.
	#[error("edge {index} ({from} -> {to}) references a missing node")]
	DanglingEdge {
		/// Position of the edge in the dataset.
		index: usize,
		/// The edge's source id.
		from: NodeId,
		/// The edge's target id.
		to: NodeId,
	},
}

impl GraphDataset {
	/// Reports the first duplicate id or dangling edge, in dataset order.
	pub fn validate(&self) -> Result<(), DatasetError> {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(DatasetError::DuplicateNodeId(node.id.clone()));
			}
		}
		for (index, edge) in self.edges.iter().enumerate() {
			if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
				return Err(DatasetError::DanglingEdge {
					index,
					from: edge.source.clone(),
					to: edge.target.clone(),
				});
			}
		}
		Ok(())
	}
}

/// Read-only holder of the canonical nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	// id -> position in `nodes`, first occurrence wins
	index: IndexMap<NodeId, usize>,
}

impl GraphStore {
	/// Takes ownership of `dataset`; never fails.
	pub fn new(dataset: GraphDataset) -> Self {
		let GraphDataset { nodes, edges } = dataset;
		let mut index = IndexMap::with_capacity(nodes.len());
		for (pos, node) in nodes.iter().enumerate() {
			if let Entry::Vacant(slot) = index.entry(node.id.clone()) {
				slot.insert(pos);
			}
		}
		Self { nodes, edges, index }
	}

	/// Every node, in dataset order.
	pub fn all_nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Every edge, in dataset order.
	pub fn all_edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Number of nodes, duplicates included.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// The first node with `id`.
	pub fn node_by_id(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&pos| &self.nodes[pos])
	}

	/// Nodes of `node_type`, in dataset order.
	pub fn nodes_by_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> + '_ {
		self.nodes.iter().filter(move |n| n.node_type == node_type)
	}

	/// Ids one undirected hop away from `id`, never including `id` itself.
	pub fn neighbor_ids(&self, id: &str) -> HashSet<&str> {
		self.edges
			.iter()
			.filter_map(|edge| edge.other_end(id))
			.filter(|&other| other != id)
			.collect()
	}

	/// Nodes one undirected hop away from `id`, in dataset order.
	///
	/// Neighbor ids that resolve to no node are dropped.
	pub fn connected_nodes(&self, id: &str) -> Vec<&Node> {
		let neighbors = self.neighbor_ids(id);
		if neighbors.is_empty() {
			return Vec::new();
		}
		self.index
			.iter()
			.filter(|(nid, _)| neighbors.contains(nid.as_str()))
			.map(|(_, &pos)| &self.nodes[pos])
			.collect()
	}

	/// Every edge touching `id`, in dataset order.
	pub fn relationships_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
		self.edges.iter().filter(move |edge| edge.touches(id))
	}

	/// Distinct types present in the data, in first-seen order.
	pub fn unique_types_present(&self) -> Vec<NodeType> {
		let mut seen = Vec::new();
		for node in &self.nodes {
			if !seen.contains(&node.node_type) {
				seen.push(node.node_type);
			}
		}
		seen
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> GraphDataset {
		GraphDataset {
			nodes: vec![
				Node::new("P1", "Alice", NodeType::Person),
				Node::new("C1", "TechCorp", NodeType::Company),
				Node::new("T1", "Rust", NodeType::Technology),
			],
			edges: vec![
				Edge::new("P1", "C1", "Works At"),
				Edge::new("C1", "T1", "Uses"),
			],
		}
	}

	#[test]
	fn lookups_preserve_dataset_order() {
		let store = GraphStore::new(sample());
		let ids: Vec<_> = store.all_nodes().iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["P1", "C1", "T1"]);
		assert_eq!(store.edge_count(), 2);
		assert_eq!(store.node_by_id("C1").map(|n| n.label.as_str()), Some("TechCorp"));
		assert!(store.node_by_id("X99").is_none());
	}

	#[test]
	fn adjacency_ignores_edge_direction() {
		let store = GraphStore::new(sample());
		let neighbors = store.neighbor_ids("C1");
		assert_eq!(neighbors, HashSet::from(["P1", "T1"]));

		let connected: Vec<_> = store.connected_nodes("C1").iter().map(|n| n.id.as_str()).collect();
		assert_eq!(connected, ["P1", "T1"]);

		let rels: Vec<_> = store.relationships_of("C1").map(|e| e.relationship.as_str()).collect();
		assert_eq!(rels, ["Works At", "Uses"]);
	}

	#[test]
	fn absent_ids_give_empty_results() {
		let store = GraphStore::new(sample());
		assert!(store.neighbor_ids("X99").is_empty());
		assert!(store.connected_nodes("X99").is_empty());
		assert_eq!(store.relationships_of("X99").count(), 0);
	}

	#[test]
	fn self_loop_is_not_its_own_neighbor() {
		let mut data = sample();
		data.edges.push(Edge::new("T1", "T1", "Depends On"));
		let store = GraphStore::new(data);
		assert_eq!(store.neighbor_ids("T1"), HashSet::from(["C1"]));
		assert_eq!(store.relationships_of("T1").count(), 2);
	}

	#[test]
	fn dangling_neighbors_do_not_resolve() {
		let mut data = sample();
		data.edges.push(Edge::new("P1", "GHOST", "Knows"));
		let store = GraphStore::new(data);
		assert!(store.neighbor_ids("P1").contains("GHOST"));
		let connected: Vec<_> = store.connected_nodes("P1").iter().map(|n| n.id.as_str()).collect();
		assert_eq!(connected, ["C1"]);
	}

	#[test]
	fn unique_types_follow_first_appearance() {
		let mut data = sample();
		data.nodes.insert(0, Node::new("T0", "Leptos", NodeType::Technology));
		data.nodes.push(Node::new("P2", "Bob", NodeType::Person));
		let store = GraphStore::new(data);
		assert_eq!(
			store.unique_types_present(),
			[NodeType::Technology, NodeType::Person, NodeType::Company]
		);
		assert_eq!(store.nodes_by_type(NodeType::Person).count(), 2);
	}

	#[test]
	fn duplicate_ids_resolve_to_first_occurrence() {
		let mut data = sample();
		data.nodes.push(Node::new("P1", "Impostor", NodeType::Investor));
		assert_eq!(data.validate(), Err(DatasetError::DuplicateNodeId("P1".into())));

		let store = GraphStore::new(data);
		assert_eq!(store.node_count(), 4);
		assert_eq!(store.node_by_id("P1").map(|n| n.label.as_str()), Some("Alice"));
	}

	#[test]
	fn validate_flags_dangling_edges() {
		assert_eq!(sample().validate(), Ok(()));

		let mut data = sample();
		data.edges.push(Edge::new("T1", "X99", "Uses"));
		assert_eq!(
			data.validate(),
			Err(DatasetError::DanglingEdge {
				index: 2,
				from: "T1".into(),
				to: "X99".into(),
			})
		);
	}
}
