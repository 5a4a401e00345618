//! Interfaces this crate consumes from the game world.
//!
//! Nothing here is implemented by the command core itself. The hosting server
//! supplies actors and the directories/catalogs; handlers reach them only
//! through these traits. The host is expected to serialize dispatches that can
//! touch the same actor or map.

use crate::core::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

/// Axis-aligned rectangle in map units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{X:{} Y:{} Width:{} Height:{}}}",
            self.left, self.top, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub String);

impl MapId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub name: String,
    pub max_stack: u32,
}

/// A concrete item created from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub descriptor: ItemDescriptor,
}

impl Item {
    pub fn new(descriptor: ItemDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDescriptor {
    pub name: String,
}

/// Where another player currently stands.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLocation {
    pub map: MapId,
    pub position: Vector,
}

/// An entity able to issue commands and be mutated by them.
pub trait Actor {
    fn name(&self) -> &str;
    fn role(&self) -> &Role;
    fn position(&self) -> Vector;
    fn map(&self) -> &MapId;
    fn speed(&self) -> f32;
    fn collision_bounds(&self) -> Rect;

    /// Move within the current map.
    fn warp_to(&mut self, position: Vector);
    fn join_map(&mut self, map: MapId);
    fn set_speed(&mut self, speed: f32);
    fn add_to_inventory(&mut self, item: Item, amount: u32);
    fn set_collision_bounds(&mut self, bounds: Rect);
}

pub trait PlayerDirectory: Send + Sync {
    fn get_player_by_name(&self, name: &str) -> Option<PlayerLocation>;
}

pub trait ItemCatalog: Send + Sync {
    fn get_item_descriptor(&self, name: &str) -> Option<ItemDescriptor>;
}

pub trait NpcCatalog: Send + Sync {
    fn get_npc_descriptor(&self, name: &str) -> Option<NpcDescriptor>;
}

pub trait NpcSpawner: Send + Sync {
    /// Create an NPC in `map` and place it at `position`.
    fn spawn_npc(&self, descriptor: NpcDescriptor, map: &MapId, position: Vector);
}
