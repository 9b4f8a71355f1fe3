//! # Dialogue Core
//!
//! The narrative engine of Breaking Patterns. This crate owns the dialogue
//! graph and the turn loop, and leans on `game_rules` for every stat decision.
//!
//! ## Core Components
//!
//! - **content**: Dialogue nodes, side events and their JSON loading
//! - **gate**: Relationship-gated option filtering
//! - **deck**: Consumable side-event interruptions
//! - **relationship**: One-shot relationship threshold events
//! - **controller**: The state machine that sequences a choice
//! - **config**: TOML-loadable tuning for all of the above
//!
//! ## Design Philosophy
//!
//! - **Presentation-Agnostic**: The controller exposes state and reports, never draws
//! - **Reproducible**: All randomness flows through one injectable RNG
//! - **Content-Driven**: The story lives in data files, not in code

pub mod config;
pub mod content;
pub mod controller;
pub mod deck;
pub mod error;
pub mod gate;
pub mod relationship;

pub use config::*;
pub use content::*;
pub use controller::*;
pub use deck::*;
pub use error::*;
pub use gate::*;
pub use relationship::*;
