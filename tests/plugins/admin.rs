use lunar_commands::core::config::CommandsConfig;
use lunar_commands::core::dispatch::{CommandDispatcher, Outcome};
use lunar_commands::core::error::DispatchError;
use lunar_commands::core::feedback::{FeedbackLog, Severity};
use lunar_commands::core::role::RoleHierarchy;
use lunar_commands::core::world::{Actor, ItemDescriptor, MapId, NpcDescriptor, Rect, Vector};
use lunar_commands::plugins::admin::{self, AdminServices, admin_registry};
use lunar_commands::plugins::memory_world::{MemoryWorld, Player};
use std::collections::BTreeMap;
use std::sync::Arc;

struct Fixture {
    roles: Arc<RoleHierarchy>,
    world: Arc<MemoryWorld>,
    feedback: Arc<FeedbackLog>,
    dispatcher: CommandDispatcher,
}

fn fixture_with(commands: CommandsConfig) -> Fixture {
    let roles = Arc::new(RoleHierarchy::new(["Player", "Moderator", "Admin"]).unwrap());
    let mut world = MemoryWorld::new();
    world.add_item(ItemDescriptor {
        name: "potion".into(),
        max_stack: 99,
    });
    world.add_npc(NpcDescriptor {
        name: "guard".into(),
    });
    let world = Arc::new(world);
    let services = AdminServices::from_world(world.clone());
    let registry = admin_registry(&roles, &commands, &services).unwrap();
    let feedback = Arc::new(FeedbackLog::new());
    let dispatcher = CommandDispatcher::new(roles.clone(), Arc::new(registry), feedback.clone());
    Fixture {
        roles,
        world,
        feedback,
        dispatcher,
    }
}

fn fixture() -> Fixture {
    fixture_with(CommandsConfig::default())
}

fn player(fx: &Fixture, name: &str, role: &str, map: &str, at: (f32, f32)) -> Player {
    let p = Player::new(name, fx.roles.resolve(role).unwrap().clone(), MapId::new(map))
        .at(Vector::new(at.0, at.1));
    fx.world.track(&p);
    p
}

fn last_text(fx: &Fixture) -> String {
    fx.feedback
        .messages()
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_default()
}

#[test]
fn admin_set_registers_six_commands_and_alias() {
    let fx = fixture();
    let registry = fx.dispatcher.registry();
    assert_eq!(
        registry.names(),
        vec![
            "setCollisionBounds",
            "setSpeed",
            "spawnItem",
            "spawnNPC",
            "warpTo",
            "warpToPlayer"
        ]
    );
    assert_eq!(
        registry.lookup(admin::SET_COLLISION_ALIAS).unwrap().name(),
        admin::SET_COLLISION_BOUNDS
    );
    for name in registry.names() {
        assert_eq!(registry.lookup(name).unwrap().required_role().name(), "Admin");
    }
}

#[test]
fn warp_to_player_joins_target_map() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));
    let _target = player(&fx, "bob", "Player", "dungeon", (7.0, 9.0));

    let outcome = fx.dispatcher.dispatch(&mut admin, "warpToPlayer", &["bob"]);

    assert!(outcome.is_completed());
    assert_eq!(admin.map(), &MapId::new("dungeon"));
    assert_eq!(admin.position(), Vector::new(7.0, 9.0));
    assert_eq!(last_text(&fx), "Warped to bob");
    assert_eq!(fx.feedback.with_severity(Severity::Announcement).len(), 1);
}

#[test]
fn warp_to_player_in_same_map_keeps_map() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));
    player(&fx, "bob", "Player", "town", (3.0, 4.0));

    assert!(fx.dispatcher.dispatch(&mut admin, "warpToPlayer", &["bob"]).is_completed());
    assert_eq!(admin.map(), &MapId::new("town"));
    assert_eq!(admin.position(), Vector::new(3.0, 4.0));
}

#[test]
fn warp_to_missing_player_is_not_found() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (1.0, 1.0));

    let outcome = fx.dispatcher.dispatch(&mut admin, "warpToPlayer", &["ghost"]);

    assert_eq!(
        outcome,
        Outcome::Failed(DispatchError::NotFound {
            kind: "player",
            name: "ghost".into()
        })
    );
    assert_eq!(admin.position(), Vector::new(1.0, 1.0));
    assert_eq!(admin.map(), &MapId::new("town"));
    assert_eq!(fx.feedback.with_severity(Severity::Alert).len(), 1);
}

#[test]
fn set_speed_updates_actor() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));

    assert!(fx.dispatcher.dispatch(&mut admin, "setSpeed", &["2.5"]).is_completed());
    assert_eq!(admin.speed(), 2.5);
    assert_eq!(last_text(&fx), "Set speed to 2.5");

    let bad = fx.dispatcher.dispatch(&mut admin, "setSpeed", &["warp9"]);
    assert!(matches!(bad.error(), Some(DispatchError::ArgumentType { index: 0, .. })));
    assert_eq!(admin.speed(), 2.5);
}

#[test]
fn spawn_item_adds_to_inventory() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));

    assert!(fx.dispatcher.dispatch(&mut admin, "spawnItem", &["potion", "3"]).is_completed());
    assert!(fx.dispatcher.dispatch(&mut admin, "spawnItem", &["potion", "2"]).is_completed());

    assert_eq!(admin.inventory_count("potion"), 5);
    assert_eq!(admin.inventory().len(), 1);
    assert_eq!(last_text(&fx), "Spawned 2 x potion");
    assert_eq!(fx.feedback.with_severity(Severity::Info).len(), 2);
}

#[test]
fn spawn_item_rejects_non_positive_amount() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));

    for amount in ["0", "-4"] {
        let outcome = fx.dispatcher.dispatch(&mut admin, "spawnItem", &["potion", amount]);
        assert!(matches!(outcome.error(), Some(DispatchError::Handler(_))));
    }
    assert!(admin.inventory().is_empty());
}

#[test]
fn spawn_item_caps_amount_at_max_stack() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));

    assert!(fx.dispatcher.dispatch(&mut admin, "spawnItem", &["potion", "99"]).is_completed());
    let over = fx.dispatcher.dispatch(&mut admin, "spawnItem", &["potion", "100"]);

    assert_eq!(
        over,
        Outcome::Failed(DispatchError::Handler("potion stacks to at most 99".into()))
    );
    assert_eq!(admin.inventory_count("potion"), 99);
    assert_eq!(
        fx.feedback.messages().last().map(|m| m.text.clone()),
        Some("Command failed: potion stacks to at most 99".to_string())
    );
}

#[test]
fn spawn_npc_places_npc_at_actor() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (4.0, 6.0));

    assert!(fx.dispatcher.dispatch(&mut admin, "spawnNPC", &["guard"]).is_completed());

    let spawned = fx.world.spawned_npcs();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].descriptor.name, "guard");
    assert_eq!(spawned[0].map, MapId::new("town"));
    assert_eq!(spawned[0].position, Vector::new(4.0, 6.0));
}

#[test]
fn spawn_unknown_npc_is_silent_no_op() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));

    let outcome = fx.dispatcher.dispatch(&mut admin, "spawnNPC", &["dragon"]);

    assert!(outcome.is_completed());
    assert!(fx.world.spawned_npcs().is_empty());
    assert!(fx.feedback.is_empty());
}

#[test]
fn set_collision_bounds_and_alias() {
    let fx = fixture();
    let mut admin = player(&fx, "root", "Admin", "town", (0.0, 0.0));

    let outcome = fx
        .dispatcher
        .dispatch(&mut admin, "setCollisionBounds", &["1", "2", "30", "40"]);
    assert!(outcome.is_completed());
    assert_eq!(admin.collision_bounds(), Rect::new(1, 2, 30, 40));
    assert_eq!(
        last_text(&fx),
        "Set collision bounds to {X:1 Y:2 Width:30 Height:40}"
    );

    assert!(fx
        .dispatcher
        .dispatch(&mut admin, "setCollision", &["0", "0", "16", "16"])
        .is_completed());
    assert_eq!(admin.collision_bounds(), Rect::new(0, 0, 16, 16));
}

#[test]
fn per_command_role_override_applies() {
    let mut overrides = BTreeMap::new();
    overrides.insert("spawnNPC".to_string(), "Moderator".to_string());
    let fx = fixture_with(CommandsConfig {
        default_role: "Admin".into(),
        required_roles: overrides,
    });
    let mut moderator = player(&fx, "mod", "Moderator", "town", (2.0, 2.0));

    assert!(fx.dispatcher.dispatch(&mut moderator, "spawnNPC", &["guard"]).is_completed());
    assert_eq!(fx.world.spawned_npcs().len(), 1);

    let denied = fx.dispatcher.dispatch(&mut moderator, "warpTo", &["0", "0"]);
    assert!(matches!(denied.error(), Some(DispatchError::PermissionDenied { .. })));
}

#[test]
fn registry_schema_lists_commands_with_params() {
    let fx = fixture();
    let schema = fx.dispatcher.registry().schema();
    let commands = schema["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 6);

    let bounds = commands
        .iter()
        .find(|c| c["name"] == "setCollisionBounds")
        .unwrap();
    assert_eq!(bounds["required_role"], "Admin");
    assert_eq!(bounds["aliases"], serde_json::json!(["setCollision"]));
    assert_eq!(bounds["parameters"][3]["name"], "height");
    assert_eq!(bounds["parameters"][3]["type"], "Int");

    let speed = commands.iter().find(|c| c["name"] == "setSpeed").unwrap();
    assert_eq!(speed["parameters"][0]["type"], "Float");
}
