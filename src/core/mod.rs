pub mod types;
pub mod error;
pub mod normalize;
pub mod resolve;
pub mod graph;
pub mod style;
pub mod build;
pub mod partnership;
pub mod reconcile;
