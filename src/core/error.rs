use crate::core::coerce::ParamType;
use std::io;
use thiserror::Error;

/// Startup failures. Fatal: the server must not come up with a half-built
/// role table or command registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Duplicate role: {0}")]
    DuplicateRole(String),
    #[error("Role hierarchy must contain at least one role")]
    EmptyRoleHierarchy,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Duplicate command: {0}")]
    DuplicateCommand(String),
    #[error("Invalid command name: {0:?}")]
    InvalidCommandName(String),
    #[error("Alias {alias} points at unregistered command {target}")]
    UnknownAliasTarget { alias: String, target: String },
    #[error("Role override names no registered command: {0}")]
    UnknownCommandOverride(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Failures of a single dispatch. These never escape the dispatcher; each one
/// is rendered (via `Display`) into an Alert for the invoking actor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("You do not have the correct permissions to use this command!")]
    PermissionDenied { command: String, role: String },
    #[error("Expected {expected} argument(s), got {actual}")]
    Arity { expected: usize, actual: usize },
    #[error("Argument {index} ({name}) must be of type {expected}, got '{raw}'")]
    ArgumentType {
        index: usize,
        name: String,
        expected: ParamType,
        raw: String,
    },
    #[error("No {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },
    #[error("Command failed: {0}")]
    Handler(String),
}

impl DispatchError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        DispatchError::NotFound {
            kind,
            name: name.into(),
        }
    }
}
