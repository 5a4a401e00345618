use lunar_commands::core::coerce::{self, ArgValue, Args, Param, ParamType};
use lunar_commands::core::dispatch::{CommandContext, CommandDispatcher, Outcome};
use lunar_commands::core::error::{ConfigError, DispatchError};
use lunar_commands::core::feedback::{FeedbackChannel, FeedbackLog, Severity};
use lunar_commands::core::registry::{CommandDescriptor, CommandRegistry};
use lunar_commands::core::role::RoleHierarchy;
use lunar_commands::core::world::{Actor, MapId, Vector};
use lunar_commands::plugins::memory_world::Player;
use std::sync::Arc;

#[test]
fn hierarchy_supersedes_is_rank_order_for_every_pair() {
    let names = ["Guest", "Player", "Helper", "Moderator", "Admin", "Owner"];
    let roles = RoleHierarchy::new(names).unwrap();

    for (i, a) in names.iter().enumerate() {
        for (j, b) in names.iter().enumerate() {
            let ra = roles.resolve(a).unwrap();
            let rb = roles.resolve(b).unwrap();
            assert_eq!(roles.supersedes(ra, rb), i >= j, "{a} vs {b}");
        }
    }
}

#[test]
fn hierarchy_rejects_duplicates_and_unknown_lookups() {
    assert!(matches!(
        RoleHierarchy::new(["Admin", "Admin"]),
        Err(ConfigError::DuplicateRole(_))
    ));
    let roles = RoleHierarchy::new(["Player", "Admin"]).unwrap();
    assert!(matches!(roles.resolve("admin"), Err(ConfigError::UnknownRole(_))));
}

#[test]
fn coercion_produces_typed_values_in_order() {
    let schema = vec![Param::string("item"), Param::int("amount"), Param::float("scale")];
    let args = coerce::coerce(&["potion", "3", "0.5"], &schema).unwrap();
    assert_eq!(
        args.values(),
        &[
            ArgValue::String("potion".into()),
            ArgValue::Int(3),
            ArgValue::Float(0.5)
        ]
    );
    let (item, amount, scale): (String, i32, f32) = args.unpack().unwrap();
    assert_eq!((item.as_str(), amount, scale), ("potion", 3, 0.5));
}

#[test]
fn coercion_errors_carry_index_type_and_raw_text() {
    let schema = vec![Param::int("left"), Param::int("top")];

    let err = coerce::coerce(&["1", "2", "3"], &schema).unwrap_err();
    assert_eq!(err, DispatchError::Arity { expected: 2, actual: 3 });

    let err = coerce::coerce(&["1", "up"], &schema).unwrap_err();
    assert_eq!(
        err,
        DispatchError::ArgumentType {
            index: 1,
            name: "top".into(),
            expected: ParamType::Int,
            raw: "up".into()
        }
    );
    assert_eq!(err.to_string(), "Argument 1 (top) must be of type Int, got 'up'");
}

#[test]
fn feedback_log_records_in_order() {
    let log = FeedbackLog::new();
    log.send("alice", "one", Severity::Info);
    log.send("bob", "two", Severity::Alert);

    let msgs = log.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].actor, "alice");
    assert_eq!(msgs[1].severity, Severity::Alert);
    assert_eq!(log.with_severity(Severity::Alert).len(), 1);

    assert_eq!(log.drain().len(), 2);
    assert!(log.is_empty());
}

#[test]
fn handler_failure_becomes_alert_and_does_not_escape() {
    let roles = Arc::new(RoleHierarchy::new(["Player", "Admin"]).unwrap());
    let mut registry = CommandRegistry::new();
    let descriptor = CommandDescriptor::new(
        "explode",
        roles.resolve("Player").unwrap().clone(),
        vec![],
        |_: &mut CommandContext<'_>, _: &Args| Err(DispatchError::Handler("boom".into())),
    );
    registry.register(descriptor).unwrap();

    let feedback = Arc::new(FeedbackLog::new());
    let dispatcher = CommandDispatcher::new(roles.clone(), Arc::new(registry), feedback.clone());
    let mut p = Player::new("alice", roles.lowest().clone(), MapId::new("town"));

    let outcome = dispatcher.dispatch(&mut p, "explode", &[] as &[&str]);

    assert_eq!(outcome, Outcome::Failed(DispatchError::Handler("boom".into())));
    let msgs = feedback.messages();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].severity, Severity::Alert);
    assert_eq!(msgs[0].text, "Command failed: boom");
}

#[test]
fn handler_feedback_goes_to_invoking_actor() {
    let roles = Arc::new(RoleHierarchy::new(["Player"]).unwrap());
    let mut registry = CommandRegistry::new();
    registry
        .register_command(&roles, "whereami", "Player", vec![], |ctx, _| {
            let text = format!("{} @ {}", ctx.actor().map(), ctx.actor().position());
            ctx.info(&text);
            Ok(())
        })
        .unwrap();

    let feedback = Arc::new(FeedbackLog::new());
    let dispatcher = CommandDispatcher::new(roles.clone(), Arc::new(registry), feedback.clone());
    let mut p = Player::new("carol", roles.lowest().clone(), MapId::new("docks"))
        .at(Vector::new(3.0, 4.0));

    assert!(dispatcher.dispatch(&mut p, "whereami", &[] as &[&str]).is_completed());
    let msgs = feedback.messages();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].actor, p.name());
    assert_eq!(msgs[0].text, "docks @ 3:4");
    assert_eq!(msgs[0].severity, Severity::Info);
}

#[test]
fn duplicate_registration_keeps_only_first() {
    let roles = RoleHierarchy::new(["Player", "Admin"]).unwrap();
    let mut registry = CommandRegistry::new();
    registry
        .register_command(&roles, "warpTo", "Admin", vec![Param::int("x"), Param::int("y")], |_, _| Ok(()))
        .unwrap();

    let err = registry
        .register_command(&roles, "warpTo", "Player", vec![], |_, _| Ok(()))
        .unwrap_err();

    assert!(matches!(err, ConfigError::DuplicateCommand(ref name) if name == "warpTo"));
    assert_eq!(err.to_string(), "Duplicate command: warpTo");
    assert_eq!(registry.len(), 1);
    let kept = registry.lookup("warpTo").unwrap();
    assert_eq!(kept.required_role().name(), "Admin");
    assert_eq!(kept.params().len(), 2);
}
