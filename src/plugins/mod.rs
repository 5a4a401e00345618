//! Command sets and reference collaborators built on the core framework.

pub mod admin;
pub mod memory_world;
