//! Administrative command set: warping, speed, item/NPC spawning and
//! collision bounds.
//!
//! Every command goes through the dispatcher's authorize/coerce pipeline; the
//! handlers here only do the world mutation and the success feedback.

use crate::core::coerce::{Args, Param};
use crate::core::config::CommandsConfig;
use crate::core::dispatch::CommandContext;
use crate::core::error::{ConfigError, DispatchError};
use crate::core::registry::CommandRegistry;
use crate::core::role::RoleHierarchy;
use crate::core::world::{ItemCatalog, Item, NpcCatalog, NpcSpawner, PlayerDirectory, Rect, Vector};
use std::sync::Arc;

pub const WARP_TO: &str = "warpTo";
pub const WARP_TO_PLAYER: &str = "warpToPlayer";
pub const SET_SPEED: &str = "setSpeed";
pub const SPAWN_ITEM: &str = "spawnItem";
pub const SPAWN_NPC: &str = "spawnNPC";
pub const SET_COLLISION_BOUNDS: &str = "setCollisionBounds";

/// Legacy name the collision command was first shipped under.
pub const SET_COLLISION_ALIAS: &str = "setCollision";

/// Collaborators the admin handlers call out to.
#[derive(Clone)]
pub struct AdminServices {
    pub players: Arc<dyn PlayerDirectory>,
    pub items: Arc<dyn ItemCatalog>,
    pub npcs: Arc<dyn NpcCatalog>,
    pub spawner: Arc<dyn NpcSpawner>,
}

impl AdminServices {
    /// One object serving every role, e.g. `MemoryWorld`.
    pub fn from_world<W>(world: Arc<W>) -> Self
    where
        W: PlayerDirectory + ItemCatalog + NpcCatalog + NpcSpawner + 'static,
    {
        Self {
            players: world.clone(),
            items: world.clone(),
            npcs: world.clone(),
            spawner: world,
        }
    }
}

/// Largest coordinate magnitude an `f32` position holds without rounding.
pub const MAX_EXACT_COORD: u32 = 1 << 24;

fn exact_coord(value: i32) -> Result<f32, DispatchError> {
    if value.unsigned_abs() > MAX_EXACT_COORD {
        return Err(DispatchError::Handler(format!(
            "coordinate {} is outside +/-{}",
            value, MAX_EXACT_COORD
        )));
    }
    Ok(value as f32)
}

pub fn warp_to(ctx: &mut CommandContext<'_>, args: &Args) -> Result<(), DispatchError> {
    let (x, y): (i32, i32) = args.unpack()?;
    let target = Vector::new(exact_coord(x)?, exact_coord(y)?);
    ctx.actor_mut().warp_to(target);
    let landed = ctx.actor().position();
    ctx.announce(&format!("Warped to {}", landed));
    Ok(())
}

pub fn warp_to_player(
    players: &dyn PlayerDirectory,
    ctx: &mut CommandContext<'_>,
    args: &Args,
) -> Result<(), DispatchError> {
    let (name,): (String,) = args.unpack()?;
    let target = players
        .get_player_by_name(&name)
        .ok_or_else(|| DispatchError::not_found("player", &name))?;

    let actor = ctx.actor_mut();
    if *actor.map() != target.map {
        actor.join_map(target.map);
    }
    actor.warp_to(target.position);
    ctx.announce(&format!("Warped to {}", name));
    Ok(())
}

pub fn set_speed(ctx: &mut CommandContext<'_>, args: &Args) -> Result<(), DispatchError> {
    let (speed,): (f32,) = args.unpack()?;
    ctx.actor_mut().set_speed(speed);
    ctx.announce(&format!("Set speed to {}", speed));
    Ok(())
}

pub fn spawn_item(
    items: &dyn ItemCatalog,
    ctx: &mut CommandContext<'_>,
    args: &Args,
) -> Result<(), DispatchError> {
    let (item_name, amount): (String, i32) = args.unpack()?;
    let descriptor = items
        .get_item_descriptor(&item_name)
        .ok_or_else(|| DispatchError::not_found("item", &item_name))?;
    let amount = u32::try_from(amount)
        .ok()
        .filter(|a| *a > 0)
        .ok_or_else(|| DispatchError::Handler("amount must be positive".to_string()))?;
    if amount > descriptor.max_stack {
        return Err(DispatchError::Handler(format!(
            "{} stacks to at most {}",
            item_name, descriptor.max_stack
        )));
    }

    ctx.actor_mut().add_to_inventory(Item::new(descriptor), amount);
    ctx.info(&format!("Spawned {} x {}", amount, item_name));
    Ok(())
}

/// An unknown NPC name is a silent no-op: no entity, no feedback.
pub fn spawn_npc(
    npcs: &dyn NpcCatalog,
    spawner: &dyn NpcSpawner,
    ctx: &mut CommandContext<'_>,
    args: &Args,
) -> Result<(), DispatchError> {
    let (npc_name,): (String,) = args.unpack()?;
    match npcs.get_npc_descriptor(&npc_name) {
        Some(descriptor) => {
            let actor = ctx.actor();
            spawner.spawn_npc(descriptor, actor.map(), actor.position());
        }
        None => tracing::debug!(npc = %npc_name, "npc descriptor not found"),
    }
    Ok(())
}

pub fn set_collision_bounds(ctx: &mut CommandContext<'_>, args: &Args) -> Result<(), DispatchError> {
    let (left, top, width, height): (i32, i32, i32, i32) = args.unpack()?;
    let bounds = Rect::new(left, top, width, height);
    ctx.actor_mut().set_collision_bounds(bounds);
    ctx.announce(&format!("Set collision bounds to {}", bounds));
    Ok(())
}

/// Register the full admin set. Required roles come from `commands`
/// (default role plus per-command overrides).
pub fn register_admin_commands(
    registry: &mut CommandRegistry,
    roles: &RoleHierarchy,
    commands: &CommandsConfig,
    services: &AdminServices,
) -> Result<(), ConfigError> {
    registry.register_command(
        roles,
        WARP_TO,
        commands.required_role(WARP_TO),
        vec![Param::int("x"), Param::int("y")],
        warp_to,
    )?;

    let players = services.players.clone();
    registry.register_command(
        roles,
        WARP_TO_PLAYER,
        commands.required_role(WARP_TO_PLAYER),
        vec![Param::string("name")],
        move |ctx, args| warp_to_player(players.as_ref(), ctx, args),
    )?;

    registry.register_command(
        roles,
        SET_SPEED,
        commands.required_role(SET_SPEED),
        vec![Param::float("speed")],
        set_speed,
    )?;

    let items = services.items.clone();
    registry.register_command(
        roles,
        SPAWN_ITEM,
        commands.required_role(SPAWN_ITEM),
        vec![Param::string("itemName"), Param::int("amount")],
        move |ctx, args| spawn_item(items.as_ref(), ctx, args),
    )?;

    let npcs = services.npcs.clone();
    let spawner = services.spawner.clone();
    registry.register_command(
        roles,
        SPAWN_NPC,
        commands.required_role(SPAWN_NPC),
        vec![Param::string("npcName")],
        move |ctx, args| spawn_npc(npcs.as_ref(), spawner.as_ref(), ctx, args),
    )?;

    registry.register_command(
        roles,
        SET_COLLISION_BOUNDS,
        commands.required_role(SET_COLLISION_BOUNDS),
        vec![
            Param::int("left"),
            Param::int("top"),
            Param::int("width"),
            Param::int("height"),
        ],
        set_collision_bounds,
    )?;
    registry.register_alias(SET_COLLISION_ALIAS, SET_COLLISION_BOUNDS)?;

    // Overrides must name canonical commands, not aliases.
    let registered = registry.names();
    if let Some(stray) = commands
        .required_roles
        .keys()
        .find(|name| !registered.contains(&name.as_str()))
    {
        return Err(ConfigError::UnknownCommandOverride(stray.clone()));
    }

    Ok(())
}

/// Fresh registry holding only the admin set.
pub fn admin_registry(
    roles: &RoleHierarchy,
    commands: &CommandsConfig,
    services: &AdminServices,
) -> Result<CommandRegistry, ConfigError> {
    let mut registry = CommandRegistry::new();
    register_admin_commands(&mut registry, roles, commands, services)?;
    Ok(registry)
}
