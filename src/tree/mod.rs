//! Tree projection of configuration documents for display surfaces

pub mod error;
pub mod filter;
pub mod projection;
pub mod registry;

pub use error::TreeError;
pub use filter::TypeFilter;
pub use projection::{Column, Parent, PresentationHint, TreeModel, TreeProjection};
pub use registry::{Handle, Node};
