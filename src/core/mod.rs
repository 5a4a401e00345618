//! Command framework primitives: roles, argument coercion, feedback, the
//! registry and the dispatcher, plus the world interfaces handlers consume.

pub mod coerce;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod output;
pub mod registry;
pub mod role;
pub mod time;
pub mod world;
