//! Graph view-state engine: the canonical graph plus filter, selection and
//! hover state, and the queries renderers draw from.

mod engine;
mod store;
mod types;
mod view_state;

pub use engine::GraphViewEngine;
pub use store::{DatasetError, GraphStore};
pub use types::{Edge, GraphDataset, Node, NodeDetails, NodeId, NodeType, ParseNodeTypeError};
pub use view_state::{Subscription, ViewState};
