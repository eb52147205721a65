//! Shared utilities for the Wombat style engine.

pub mod warning;
