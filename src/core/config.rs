//! Startup configuration (`lunar.toml`).
//!
//! Supplies the role list, the roles the admin commands require, and seed data
//! for the in-memory world used by the operator console.

use crate::core::error::ConfigError;
use crate::core::role::RoleHierarchy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "lunar.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub roles: RolesConfig,
    pub commands: CommandsConfig,
    pub players: Vec<PlayerSeed>,
    pub items: Vec<ItemSeed>,
    pub npcs: Vec<NpcSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Lowest to highest privilege.
    pub order: Vec<String>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            order: vec!["Player".into(), "Moderator".into(), "Admin".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub default_role: String,
    pub required_roles: BTreeMap<String, String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            default_role: "Admin".into(),
            required_roles: BTreeMap::new(),
        }
    }
}

impl CommandsConfig {
    pub fn required_role(&self, command: &str) -> &str {
        self.required_roles
            .get(command)
            .map(String::as_str)
            .unwrap_or(&self.default_role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeed {
    pub name: String,
    pub role: String,
    #[serde(default = "default_map")]
    pub map: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_map() -> String {
    "default".to_string()
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSeed {
    pub name: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

fn default_max_stack() -> u32 {
    99
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSeed {
    pub name: String,
}

impl ServerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn role_hierarchy(&self) -> Result<RoleHierarchy, ConfigError> {
        RoleHierarchy::new(self.roles.order.iter().cloned())
    }
}

/// Load configuration from `path`. A missing file means defaults.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        return Ok(ServerConfig::default());
    }
    let content = fs::read_to_string(path)?;
    ServerConfig::from_toml_str(&content)
}
