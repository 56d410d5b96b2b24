use crate::graph::NodeId;

/// How node positions are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
	/// Free nodes driven by the force simulation.
	#[default]
	Force,
	/// Nodes pinned evenly around a circle, in visible order.
	Circular,
}

impl Layout {
	pub const ALL: [Self; 2] = [Self::Force, Self::Circular];

	pub fn label(self) -> &'static str {
		match self {
			Self::Force => "Force",
			Self::Circular => "Circular",
		}
	}
}

/// Per-node payload carried inside the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub color: &'static str,
}
