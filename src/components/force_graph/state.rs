use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;

use super::scale::type_color;
use super::types::{Layout, NodeInfo};
use crate::graph::{GraphViewEngine, NodeId, NodeType};

pub const NODE_RADIUS: f64 = 8.0;
pub const HIT_RADIUS: f64 = 14.0;
/// Screen-space distance a press may travel and still count as a click.
pub const CLICK_SLOP: f64 = 3.0;

const SEED_RADIUS: f64 = 120.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Drawable mirror of the engine's visible subgraph.
///
/// Each simulation edge carries its relationship label.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, String>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	layout: Layout,
	filters: Vec<NodeType>,
	id_to_idx: HashMap<NodeId, DefaultNodeIdx>,
	edge_count: usize,
}

fn simulation() -> ForceGraph<NodeInfo, String> {
	ForceGraph::new(SimulationParameters {
		force_charge: 400.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Position `i` of `n` evenly spaced points on a circle around the origin.
pub fn circle_position(i: usize, n: usize, radius: f64) -> (f32, f32) {
	let angle = (i as f64) * 2.0 * PI / n.max(1) as f64;
	((radius * angle.cos()) as f32, (radius * angle.sin()) as f32)
}

impl ForceGraphState {
	pub fn new(engine: &GraphViewEngine, width: f64, height: f64, layout: Layout) -> Self {
		let mut state = Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			layout,
			filters: engine.active_type_filters(),
			id_to_idx: HashMap::new(),
			edge_count: 0,
		};
		state.rebuild(engine);
		state.sync(engine);
		state
	}

	/// Pulls the latest visible set, hover and selection from the engine.
	///
	/// The simulation is only rebuilt when the type filters changed, so hover
	/// and selection updates keep every node where it is.
	pub fn sync(&mut self, engine: &GraphViewEngine) {
		let filters = engine.active_type_filters();
		if filters != self.filters {
			self.filters = filters;
			self.rebuild(engine);
		}

		let hovered = engine.hovered_node_id().and_then(|id| self.index_of(&id));
		let neighbors = engine
			.hovered_neighbor_ids()
			.iter()
			.filter_map(|id| self.index_of(id))
			.collect();
		self.set_hover(hovered, neighbors);

		self.selected = engine.selected_node_id().and_then(|id| self.index_of(&id));
	}

	fn rebuild(&mut self, engine: &GraphViewEngine) {
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let visible = engine.visible_nodes();
		let mut graph = simulation();
		let mut id_to_idx = HashMap::with_capacity(visible.len());
		for (i, node) in visible.iter().enumerate() {
			let (x, y, is_anchor) = match (self.layout, previous.get(&node.id)) {
				(Layout::Circular, _) => {
					let radius = SEED_RADIUS.max(self.width.min(self.height) * 0.35);
					let (x, y) = circle_position(i, visible.len(), radius);
					(x, y, true)
				}
				(Layout::Force, Some(&kept)) => kept,
				(Layout::Force, None) => {
					let (x, y) = circle_position(i, visible.len(), SEED_RADIUS);
					(x, y, false)
				}
			};
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: type_color(node.node_type),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		// the simulation keeps one undirected edge per node pair, so parallel
		// relationships share a label
		let mut pairs: IndexMap<_, (DefaultNodeIdx, DefaultNodeIdx, String)> = IndexMap::new();
		for edge in engine.visible_edges() {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
			{
				let key = if src <= tgt { (src, tgt) } else { (tgt, src) };
				match pairs.entry(key) {
					Entry::Occupied(mut slot) => {
						let (_, _, label) = slot.get_mut();
						label.push_str(", ");
						label.push_str(&edge.relationship);
					}
					Entry::Vacant(slot) => {
						slot.insert((src, tgt, edge.relationship.clone()));
					}
				}
			}
		}
		self.edge_count = pairs.len();
		for (src, tgt, label) in pairs.into_values() {
			graph.add_edge(src, tgt, EdgeData { user_data: label });
		}

		self.graph = graph;
		self.id_to_idx = id_to_idx;
		self.hover = HoverState::default();
		self.drag = DragState::default();
		self.selected = None;
		debug!("canvas rebuilt: {} nodes, {} edges", self.node_count(), self.edge_count());
	}

	/// Switches layout, re-seeding positions.
	pub fn set_layout(&mut self, layout: Layout, engine: &GraphViewEngine) {
		if self.layout == layout {
			return;
		}
		self.layout = layout;
		if layout == Layout::Force {
			self.graph.visit_nodes_mut(|node| node.data.is_anchor = false);
		}
		self.rebuild(engine);
		self.sync(engine);
	}

	pub fn layout(&self) -> Layout {
		self.layout
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	/// Drawn edges, after parallel relationships are merged.
	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	pub fn index_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.id_to_idx.get(id).copied()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let idx = self.node_at_position(sx, sy)?;
		self.node_id(idx)
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		self.id_to_idx
			.iter()
			.find(|&(_, &i)| i == idx)
			.map(|(id, _)| id.clone())
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, neighbors: HashSet<DefaultNodeIdx>) {
		if self.hover.node == node && self.hover.neighbors == neighbors {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		if node.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
		self.hover.node = node;
		self.hover.neighbors = if node.is_some() {
			neighbors
		} else {
			HashSet::new()
		};
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn is_selected(&self, idx: DefaultNodeIdx) -> bool {
		self.selected == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::sample_dataset;
	use crate::graph::{Edge, GraphDataset, Node};

	fn engine() -> GraphViewEngine {
		GraphViewEngine::new(sample_dataset())
	}

	fn positions(state: &ForceGraphState) -> HashMap<NodeId, (f32, f32)> {
		let mut out = HashMap::new();
		state.graph.visit_nodes(|node| {
			out.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		out
	}

	#[test]
	fn mirrors_visible_subgraph() {
		let engine = engine();
		let mut state = ForceGraphState::new(&engine, 800.0, 600.0, Layout::Force);
		assert_eq!(state.node_count(), 26);
		assert_eq!(state.edge_count(), 34);

		engine.toggle_type_filter(NodeType::Person);
		engine.toggle_type_filter(NodeType::Company);
		state.sync(&engine);
		assert_eq!(state.node_count(), 9);
		// five "Works At" plus the two company partnerships
		assert_eq!(state.edge_count(), 7);
		assert!(state.index_of("9").is_none());
	}

	fn edge_labels(state: &ForceGraphState) -> Vec<(NodeId, NodeId, String)> {
		let mut out = Vec::new();
		state.graph.visit_edges(|n1, n2, edge| {
			out.push((
				n1.data.user_data.id.clone(),
				n2.data.user_data.id.clone(),
				edge.user_data.clone(),
			));
		});
		out
	}

	#[test]
	fn edges_carry_their_own_relationship() {
		let engine = GraphViewEngine::new(GraphDataset {
			nodes: vec![
				Node::new("P1", "Alice", NodeType::Person),
				Node::new("C1", "TechCorp", NodeType::Company),
				Node::new("T1", "Rust", NodeType::Technology),
			],
			edges: vec![
				Edge::new("P1", "C1", "Works At"),
				Edge::new("C1", "T1", "Uses"),
				Edge::new("C1", "P1", "Founded By"),
			],
		});
		let state = ForceGraphState::new(&engine, 800.0, 600.0, Layout::Force);
		assert_eq!(state.edge_count(), 2);

		let mut labels = edge_labels(&state);
		labels.sort();
		assert_eq!(
			labels,
			[
				("C1".into(), "T1".into(), "Uses".into()),
				("P1".into(), "C1".into(), "Works At, Founded By".into()),
			]
		);
	}

	#[test]
	fn hover_maps_engine_neighbors_to_indices() {
		let engine = engine();
		let mut state = ForceGraphState::new(&engine, 800.0, 600.0, Layout::Force);

		engine.toggle_type_filter(NodeType::Company);
		engine.toggle_type_filter(NodeType::Investor);
		engine.set_hovered_node(Some("6".into()));
		state.sync(&engine);

		let hovered = state.index_of("6");
		assert_eq!(state.hover.node, hovered);
		let expected: HashSet<_> = ["25", "21"].iter().filter_map(|id| state.index_of(id)).collect();
		assert_eq!(state.hover.neighbors, expected);

		engine.set_hovered_node(None);
		state.sync(&engine);
		assert!(state.hover.node.is_none());
		assert_eq!(state.hover.prev_node, hovered);
		assert!(state.has_active_highlight());
	}

	#[test]
	fn hover_and_selection_do_not_move_nodes() {
		let engine = engine();
		let mut state = ForceGraphState::new(&engine, 800.0, 600.0, Layout::Force);
		let before = positions(&state);

		engine.set_selected_node(Some("1".into()));
		engine.set_hovered_node(Some("1".into()));
		state.sync(&engine);
		assert_eq!(positions(&state), before);
		assert_eq!(state.selected, state.index_of("1"));
		assert!(state.is_selected(state.index_of("1").unwrap()));
	}

	#[test]
	fn filtered_out_hover_lights_nothing() {
		let engine = engine();
		let mut state = ForceGraphState::new(&engine, 800.0, 600.0, Layout::Force);
		engine.toggle_type_filter(NodeType::Technology);
		engine.set_hovered_node(Some("1".into()));
		state.sync(&engine);
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn circular_layout_pins_nodes_on_a_ring() {
		let engine = engine();
		let state = ForceGraphState::new(&engine, 400.0, 400.0, Layout::Circular);
		state.graph.visit_nodes(|node| {
			assert!(node.data.is_anchor);
			let r = ((node.x() as f64).powi(2) + (node.y() as f64).powi(2)).sqrt();
			assert!((r - 140.0).abs() < 0.01, "radius {r}");
		});
	}

	#[test]
	fn circle_positions_are_evenly_spaced() {
		let (x, y) = circle_position(0, 4, 10.0);
		assert!((x - 10.0).abs() < 1e-4 && y.abs() < 1e-4);
		let (x, y) = circle_position(1, 4, 10.0);
		assert!(x.abs() < 1e-4 && (y - 10.0).abs() < 1e-4);
		// a lone node sits on the ring at angle zero
		assert_eq!(circle_position(0, 0, 5.0), (5.0, 0.0));
	}
}
