//! The element model: the composed, in-memory form of a flow.

mod element;
mod flow;
mod naming;
mod service;
mod write_once;

pub use element::*;
pub use flow::{FlowDefinition, FlowState};
pub use naming::*;
pub use service::*;
pub use write_once::WriteOnce;

pub(crate) use flow::find_controller_index;
