//! The reference dataset: people, the companies they work at, and the
//! technologies, projects, communities, events and investors around them.

use crate::graph::{Edge, GraphDataset, Node, NodeType};

const NODES: &[(&str, &str, NodeType)] = &[
	("1", "Alice", NodeType::Person),
	("2", "Bob", NodeType::Person),
	("3", "Charlie", NodeType::Person),
	("4", "Daisy", NodeType::Person),
	("5", "Eve", NodeType::Person),

	("6", "TechCorp", NodeType::Company),
	("7", "InnoSoft", NodeType::Company),
	("8", "DevLabs", NodeType::Company),
	("25", "Startup Y", NodeType::Company),

	("9", "React.js", NodeType::Technology),
	("10", "Node.js", NodeType::Technology),
	("11", "Python", NodeType::Technology),
	("12", "AWS", NodeType::Technology),
	("13", "Sigma.js", NodeType::Technology),
	("14", "React Flow", NodeType::Technology),

	("15", "Project Alpha", NodeType::Project),
	("16", "Project Beta", NodeType::Project),
	("26", "Project Gamma", NodeType::Project),

	("17", "Data Science Club", NodeType::Community),
	("18", "Open Source Group", NodeType::Community),
	("23", "AI Research Group", NodeType::Community),
	("24", "Machine Learning Forum", NodeType::Community),

	("19", "Conference A", NodeType::Event),
	("20", "Hackathon X", NodeType::Event),

	("21", "Investor A", NodeType::Investor),
	("22", "Investor B", NodeType::Investor),
];

const EDGES: &[(&str, &str, &str)] = &[
	("1", "6", "Works At"),
	("2", "6", "Works At"),
	("3", "7", "Works At"),
	("4", "8", "Works At"),
	("5", "25", "Works At"),

	("6", "9", "Uses"),
	("6", "12", "Uses"),
	("7", "10", "Uses"),
	("8", "11", "Uses"),
	("25", "9", "Uses"),
	("25", "14", "Uses"),

	("21", "6", "Funds"),
	("21", "7", "Funds"),
	("22", "8", "Funds"),
	("22", "25", "Funds"),

	("1", "15", "Contributes To"),
	("1", "16", "Contributes To"),
	("2", "15", "Contributes To"),
	("3", "26", "Contributes To"),

	("15", "9", "Uses"),
	("15", "10", "Uses"),
	("16", "12", "Uses"),
	("26", "11", "Uses"),

	("1", "17", "Member Of"),
	("2", "18", "Member Of"),
	("3", "23", "Member Of"),
	("4", "24", "Member Of"),
	("5", "23", "Member Of"),

	("6", "25", "Partnership With"),
	("7", "8", "Partnership With"),

	("5", "19", "Attended"),
	("1", "20", "Attended"),

	("9", "14", "Compatible With"),
	("13", "14", "Compatible With"),
];

/// A fresh copy of the reference dataset.
pub fn sample_dataset() -> GraphDataset {
	GraphDataset {
		nodes: NODES
			.iter()
			.map(|&(id, label, ty)| Node::new(id, label, ty))
			.collect(),
		edges: EDGES
			.iter()
			.map(|&(source, target, rel)| Edge::new(source, target, rel))
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reference_dataset_is_consistent() {
		let data = sample_dataset();
		assert_eq!(data.nodes.len(), 26);
		assert_eq!(data.edges.len(), 34);
		assert_eq!(data.validate(), Ok(()));
	}
}
