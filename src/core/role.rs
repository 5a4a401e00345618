//! Ordered privilege scale.
//!
//! Roles are configured as a list from least to most privileged; each gets
//! the next rank. Authorization is a single rank comparison.

use crate::core::error::ConfigError;
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role {
    name: String,
    rank: u32,
}

impl Role {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// True when this role is at least as privileged as `required`.
    pub fn supersedes(&self, required: &Role) -> bool {
        self.rank >= required.rank
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    roles: Vec<Role>,
    by_name: FxHashMap<String, usize>,
}

impl RoleHierarchy {
    /// Build from role names ordered lowest to highest privilege.
    pub fn new<I, S>(ordered: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles = Vec::new();
        let mut by_name = FxHashMap::default();

        for (rank, name) in ordered.into_iter().enumerate() {
            let name = name.into();
            if by_name.contains_key(&name) {
                return Err(ConfigError::DuplicateRole(name));
            }
            by_name.insert(name.clone(), rank);
            roles.push(Role {
                name,
                rank: rank as u32,
            });
        }

        if roles.is_empty() {
            return Err(ConfigError::EmptyRoleHierarchy);
        }

        tracing::info!(
            roles = %roles.iter().map(Role::name).collect::<Vec<_>>().join(" < "),
            "role hierarchy built"
        );
        Ok(Self { roles, by_name })
    }

    pub fn resolve(&self, name: &str) -> Result<&Role, ConfigError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.roles[idx])
            .ok_or_else(|| ConfigError::UnknownRole(name.to_string()))
    }

    pub fn supersedes(&self, actor_role: &Role, required: &Role) -> bool {
        actor_role.supersedes(required)
    }

    /// Least privileged role.
    pub fn lowest(&self) -> &Role {
        &self.roles[0]
    }

    /// Most privileged role.
    pub fn highest(&self) -> &Role {
        &self.roles[self.roles.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }
}
