//! # Game Rules
//!
//! The stat rules of Breaking Patterns: the three persistent resources, the
//! resolver that turns a choice into actual stat changes, and the ending
//! classifier. This crate knows nothing about dialogue content or the story
//! graph.

pub mod endings;
pub mod error;
pub mod ledger;
pub mod resolver;
pub mod stats;

pub use endings::*;
pub use error::*;
pub use ledger::*;
pub use resolver::*;
pub use stats::*;
