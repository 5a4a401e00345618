//! In-memory world: a concrete `Actor` and every collaborator trait the admin
//! commands need. Backs the operator console and the tests.

use crate::core::config::ServerConfig;
use crate::core::error::ConfigError;
use crate::core::role::{Role, RoleHierarchy};
use crate::core::world::{
    Actor, Item, ItemCatalog, ItemDescriptor, MapId, NpcCatalog, NpcDescriptor, NpcSpawner,
    PlayerDirectory, PlayerLocation, Rect, Vector,
};
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySlot {
    pub item: Item,
    pub amount: u32,
}

#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    role: Role,
    map: MapId,
    position: Vector,
    speed: f32,
    collision_bounds: Rect,
    inventory: Vec<InventorySlot>,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, map: MapId) -> Self {
        Self {
            name: name.into(),
            role,
            map,
            position: Vector::default(),
            speed: 1.0,
            collision_bounds: Rect::new(0, 0, 32, 32),
            inventory: Vec::new(),
        }
    }

    pub fn at(mut self, position: Vector) -> Self {
        self.position = position;
        self
    }

    pub fn inventory(&self) -> &[InventorySlot] {
        &self.inventory
    }

    pub fn inventory_count(&self, item_name: &str) -> u32 {
        self.inventory
            .iter()
            .filter(|s| s.item.name() == item_name)
            .map(|s| s.amount)
            .sum()
    }
}

impl Actor for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &Role {
        &self.role
    }

    fn position(&self) -> Vector {
        self.position
    }

    fn map(&self) -> &MapId {
        &self.map
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn collision_bounds(&self) -> Rect {
        self.collision_bounds
    }

    fn warp_to(&mut self, position: Vector) {
        self.position = position;
    }

    fn join_map(&mut self, map: MapId) {
        self.map = map;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn add_to_inventory(&mut self, item: Item, amount: u32) {
        match self.inventory.iter_mut().find(|s| s.item == item) {
            Some(slot) => slot.amount = slot.amount.saturating_add(amount),
            None => self.inventory.push(InventorySlot { item, amount }),
        }
    }

    fn set_collision_bounds(&mut self, bounds: Rect) {
        self.collision_bounds = bounds;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedNpc {
    pub descriptor: NpcDescriptor,
    pub map: MapId,
    pub position: Vector,
}

/// Catalogs plus a location index of online players. Players themselves are
/// owned by the host; call [`MemoryWorld::track`] after each dispatch so the
/// index follows them.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    locations: Mutex<FxHashMap<String, PlayerLocation>>,
    items: FxHashMap<String, ItemDescriptor>,
    npcs: FxHashMap<String, NpcDescriptor>,
    spawned: Mutex<Vec<SpawnedNpc>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build catalogs and players from config. Player roles must exist in `roles`.
    pub fn from_config(
        config: &ServerConfig,
        roles: &RoleHierarchy,
    ) -> Result<(Self, Vec<Player>), ConfigError> {
        let mut world = Self::new();
        for item in &config.items {
            world.add_item(ItemDescriptor {
                name: item.name.clone(),
                max_stack: item.max_stack,
            });
        }
        for npc in &config.npcs {
            world.add_npc(NpcDescriptor {
                name: npc.name.clone(),
            });
        }

        let mut players = Vec::with_capacity(config.players.len());
        for seed in &config.players {
            let role = roles.resolve(&seed.role)?.clone();
            let mut player = Player::new(seed.name.clone(), role, MapId::new(seed.map.clone()))
                .at(Vector::new(seed.x, seed.y));
            player.set_speed(seed.speed);
            world.track(&player);
            players.push(player);
        }
        Ok((world, players))
    }

    pub fn add_item(&mut self, descriptor: ItemDescriptor) {
        self.items.insert(descriptor.name.clone(), descriptor);
    }

    pub fn add_npc(&mut self, descriptor: NpcDescriptor) {
        self.npcs.insert(descriptor.name.clone(), descriptor);
    }

    /// Record where an actor currently is.
    pub fn track(&self, actor: &dyn Actor) {
        lock(&self.locations).insert(
            actor.name().to_string(),
            PlayerLocation {
                map: actor.map().clone(),
                position: actor.position(),
            },
        );
    }

    pub fn untrack(&self, name: &str) {
        lock(&self.locations).remove(name);
    }

    pub fn spawned_npcs(&self) -> Vec<SpawnedNpc> {
        lock(&self.spawned).clone()
    }
}

impl PlayerDirectory for MemoryWorld {
    fn get_player_by_name(&self, name: &str) -> Option<PlayerLocation> {
        lock(&self.locations).get(name).cloned()
    }
}

impl ItemCatalog for MemoryWorld {
    fn get_item_descriptor(&self, name: &str) -> Option<ItemDescriptor> {
        self.items.get(name).cloned()
    }
}

impl NpcCatalog for MemoryWorld {
    fn get_npc_descriptor(&self, name: &str) -> Option<NpcDescriptor> {
        self.npcs.get(name).cloned()
    }
}

impl NpcSpawner for MemoryWorld {
    fn spawn_npc(&self, descriptor: NpcDescriptor, map: &MapId, position: Vector) {
        tracing::info!(npc = %descriptor.name, %map, %position, "npc spawned");
        lock(&self.spawned).push(SpawnedNpc {
            descriptor,
            map: map.clone(),
            position,
        });
    }
}
