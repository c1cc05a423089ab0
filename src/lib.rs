//! Responsive box layout and window lifecycle for a terminal chat client
//!
//! The engine lives in [`layout`]: declarative box trees are arranged into
//! rectangles, and each named rectangle is reconciled with a persistent
//! surface that a [`component::Component`] renders into. The rest of the
//! crate is the demo client around it.

pub mod cli;
pub mod component;
pub mod config;
pub mod layout;
pub mod logging;
pub mod queue;
pub mod state;
pub mod tui;
