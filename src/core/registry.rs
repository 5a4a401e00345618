//! Command registry, built once at startup and read-only afterwards.
//!
//! Registration is fail-fast: a second command (or alias) with a taken name
//! is rejected and the first registration stays in place.

use crate::core::coerce::{Args, Param};
use crate::core::dispatch::CommandContext;
use crate::core::error::{ConfigError, DispatchError};
use crate::core::role::{Role, RoleHierarchy};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

pub type Handler =
    Box<dyn Fn(&mut CommandContext<'_>, &Args) -> Result<(), DispatchError> + Send + Sync>;

static COMMAND_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex"));

pub struct CommandDescriptor {
    name: String,
    required_role: Role,
    params: Vec<Param>,
    handler: Handler,
}

impl CommandDescriptor {
    pub fn new<F>(name: impl Into<String>, required_role: Role, params: Vec<Param>, handler: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &Args) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            required_role,
            params,
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_role(&self) -> &Role {
        &self.required_role
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) fn invoke(&self, ctx: &mut CommandContext<'_>, args: &Args) -> Result<(), DispatchError> {
        (self.handler)(ctx, args)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("required_role", &self.required_role)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: FxHashMap<String, CommandDescriptor>,
    aliases: FxHashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), ConfigError> {
        let name = descriptor.name.clone();
        self.claim_name(&name)?;
        tracing::info!(
            command = %name,
            required_role = %descriptor.required_role,
            params = descriptor.params.len(),
            "command registered"
        );
        self.commands.insert(name, descriptor);
        Ok(())
    }

    /// Resolve `required_role` by name, then register.
    pub fn register_command<F>(
        &mut self,
        roles: &RoleHierarchy,
        name: &str,
        required_role: &str,
        params: Vec<Param>,
        handler: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&mut CommandContext<'_>, &Args) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        let role = roles.resolve(required_role)?.clone();
        self.register(CommandDescriptor::new(name, role, params, handler))
    }

    /// Make `alias` dispatch to the already registered `target`.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> Result<(), ConfigError> {
        if !self.commands.contains_key(target) {
            return Err(ConfigError::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }
        self.claim_name(alias)?;
        tracing::info!(alias, target, "command alias registered");
        self.aliases.insert(alias.to_string(), target.to_string());
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, DispatchError> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.commands
            .get(canonical)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Canonical command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn aliases_of(&self, target: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, t)| t.as_str() == target)
            .map(|(a, _)| a.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    fn claim_name(&self, name: &str) -> Result<(), ConfigError> {
        if !COMMAND_NAME.is_match(name) {
            return Err(ConfigError::InvalidCommandName(name.to_string()));
        }
        if self.commands.contains_key(name) || self.aliases.contains_key(name) {
            return Err(ConfigError::DuplicateCommand(name.to_string()));
        }
        Ok(())
    }

    pub fn schema(&self) -> serde_json::Value {
        let commands: Vec<serde_json::Value> = self
            .names()
            .into_iter()
            .filter_map(|name| self.commands.get(name))
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "required_role": d.required_role.name(),
                    "parameters": d.params,
                    "aliases": self.aliases_of(&d.name),
                })
            })
            .collect();

        serde_json::json!({
            "name": "commands",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Administrative in-game commands",
            "commands": commands,
        })
    }
}
