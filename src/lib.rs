//! Generation leveling and union-graph construction for genealogical tables.
//!
//! Rows of raw strings go in; out come a generation-indexed mapping of
//! individuals and unions, and a parents -> union -> children graph ready for
//! a layout engine.

pub mod core;
pub mod pipeline;
pub mod source;
pub mod config;
pub mod api;

pub use crate::core::error::LineageError;
pub use crate::core::graph::{RenderGraph, UnionGraph};
pub use crate::core::normalize::{Dataset, Entity, Individual, RawRow, Union};
pub use crate::core::resolve::{Generation, Generations};
pub use crate::pipeline::{FamilyTree, compute};
