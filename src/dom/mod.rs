pub mod document;
pub mod label;
pub mod locator;
pub mod sensitive;

pub use document::{Document, NodeId};
