//! Color scale for node types and the handful of fixed canvas colors.

use crate::graph::NodeType;

pub const BACKGROUND: &str = "#1a1a2e";
pub const SELECTION_RING: &str = "#ffd54f";

/// RGB triple used for edges; alpha is applied per frame.
pub const EDGE_RGB: (u8, u8, u8) = (100, 180, 255);

pub fn type_color(node_type: NodeType) -> &'static str {
	match node_type {
		NodeType::Person => "#4CAF50",
		NodeType::Company => "#2196F3",
		NodeType::Technology => "#FF9800",
		NodeType::Project => "#9C27B0",
		NodeType::Community => "#F44336",
		NodeType::Event => "#795548",
		NodeType::Investor => "#607D8B",
	}
}

pub fn edge_rgba(alpha: f64) -> String {
	let (r, g, b) = EDGE_RGB;
	format!("rgba({r}, {g}, {b}, {alpha})")
}
