//! CLI infrastructure for the level-learning toolkit
//!
//! This module provides the command-line interface for training learners on
//! levels and for inspecting levels as the simulator sees them.

pub mod commands;
pub mod config;
pub mod output;
