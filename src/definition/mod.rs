//! Raw, textual definitions as they are written in flow and component files.
//!
//! These types only describe shape. Checks such as name legality, mandatory
//! package identifiers and the element type discriminator happen when they are
//! turned into the model types.

mod component;
mod flow;
mod node;

pub use component::*;
pub use flow::*;
pub use node::*;
