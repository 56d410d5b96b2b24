use std::fmt;
use std::str::FromStr;

/// Stable node identifier as it appears in the dataset.
pub type NodeId = String;

/// The closed set of node categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeType {
	/// An individual.
	Person,
	/// A company or startup.
	Company,
	/// A language, framework or platform.
	Technology,
	/// A project people contribute to.
	Project,
	/// A club, group or forum.
	Community,
	/// A conference, hackathon or meetup.
	Event,
	/// A funding source.
	Investor,
}

impl NodeType {
	/// Every variant, in declaration order.
	pub const ALL: [Self; 7] = [
		Self::Person,
		Self::Company,
		Self::Technology,
		Self::Project,
		Self::Community,
		Self::Event,
		Self::Investor,
	];

	/// Display name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Person => "Person",
			Self::Company => "Company",
			Self::Technology => "Technology",
			Self::Project => "Project",
			Self::Community => "Community",
			Self::Event => "Event",
			Self::Investor => "Investor",
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a string names no known [`NodeType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type: {0:?}")]
pub struct ParseNodeTypeError(pub String);

impl FromStr for NodeType {
	type Err = ParseNodeTypeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|ty| ty.as_str() == s)
			.ok_or_else(|| ParseNodeTypeError(s.to_owned()))
	}
}

/// A typed, labeled vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	/// Unique key within a dataset.
	pub id: NodeId,
	/// Display text.
	pub label: String,
	/// Category used by the type filter.
	pub node_type: NodeType,
}

impl Node {
	/// Builds a node from borrowed or owned strings.
	pub fn new(id: impl Into<NodeId>, label: impl Into<String>, node_type: NodeType) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			node_type,
		}
	}
}

/// A relationship between two node ids.
///
/// Stored with a direction, but every adjacency query treats it as undirected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Id of the first endpoint.
	pub source: NodeId,
	/// Id of the second endpoint.
	pub target: NodeId,
	/// Free-form relationship type, e.g. "Works At".
	pub relationship: String,
}

impl Edge {
	/// Builds an edge from borrowed or owned strings.
	pub fn new(
		source: impl Into<NodeId>,
		target: impl Into<NodeId>,
		relationship: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship: relationship.into(),
		}
	}

	/// Whether `id` occupies either endpoint.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}

	/// The endpoint opposite `id`, or `None` if the edge does not touch it.
	/// For a self-loop this is `id` itself.
	pub fn other_end(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// The static input handed to the engine at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphDataset {
	/// Nodes in display order.
	pub nodes: Vec<Node>,
	/// Edges; endpoints are not checked.
	pub edges: Vec<Edge>,
}

/// Resolved neighborhood of the selected node, restricted to the visible set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetails {
	/// The selected node.
	pub node: Node,
	/// Visible neighbors, in dataset order.
	pub connections: Vec<Node>,
	/// Edges touching the node with both ends visible.
	pub relationships: Vec<Edge>,
}

impl NodeDetails {
	/// The node at the far end of `edge` from the selected node, if it is one
	/// of the listed connections.
	pub fn partner_of(&self, edge: &Edge) -> Option<&Node> {
		let other = edge.other_end(&self.node.id)?;
		self.connections.iter().find(|n| n.id == other)
	}
}
