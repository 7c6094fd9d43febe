mod common;

use common::{init_tracing, Harness, ScriptedPlanner, WORLD};
use gopher_bt::TreeId;
use gopher_deliveries::{DeliveryConfig, DeliveryState, Goal, GoalAccepted, SemanticLocation};

#[test]
fn full_delivery_visits_every_stop_then_drops_tree() {
    init_tracing();
    let mut h = Harness::standard();

    assert_eq!(h.cycle(), DeliveryState::Idle);
    assert_eq!(h.feedback(), "idling");

    assert_eq!(
        h.deliveries.submit_goal(Goal::new(["a", "b"])),
        Ok(GoalAccepted::Assigned)
    );

    assert_eq!(h.cycle(), DeliveryState::Travelling);
    assert!(h.deliveries.tree_replaced());
    assert_eq!(h.deliveries.current_tree_id(), Some(TreeId(1)));
    assert_eq!(h.feedback(), "moving to 'a'");
    assert!(h.deliveries.is_executing());

    assert_eq!(h.cycle(), DeliveryState::Waiting);
    assert!(!h.deliveries.tree_replaced());
    assert_eq!(h.feedback(), "remaining: b");

    // Stays at the gate until someone confirms.
    assert_eq!(h.cycle(), DeliveryState::Waiting);
    h.deliveries.press_go();

    assert_eq!(h.cycle(), DeliveryState::Travelling);
    assert_eq!(h.feedback(), "moving from 'a' to 'b'");

    assert_eq!(h.cycle(), DeliveryState::Waiting);
    assert_eq!(h.feedback(), "remaining: none");
    h.deliveries.press_go();

    assert_eq!(h.cycle(), DeliveryState::Idle);
    assert!(h.deliveries.succeeded_on_last_tick());
    assert!(!h.deliveries.is_executing());
    assert_eq!(h.feedback(), "idling");

    assert_eq!(h.cycle(), DeliveryState::Idle);
    assert!(h.deliveries.tree().is_none());
    assert!(h.deliveries.tree_replaced());
    assert_eq!(h.deliveries.previous_tree_id(), Some(TreeId(1)));
    assert!(!h.deliveries.succeeded_on_last_tick());
    assert_eq!(
        h.deliveries.planner().current_locations,
        vec![Some("b".to_string())]
    );

    assert_eq!(h.world.motion_log, vec!["unpark", "a", "a", "b", "b"]);
}

#[test]
fn gates_notify_display_topic() {
    let config = DeliveryConfig::from_yaml_str("topics:\n  display_notification: screen\n").unwrap();
    let mut h = Harness::with_config(ScriptedPlanner::new(&["a"]), config);

    h.deliveries.submit_goal(Goal::new(["a"])).unwrap();
    h.cycle();
    h.cycle();
    h.deliveries.press_go();
    h.cycle();

    let sent = h.sink.notifications();
    assert!(sent.iter().all(|(topic, _)| topic == "screen"));
    assert_eq!(
        h.sink.messages(),
        vec!["at location, waiting for button press", "go button was pressed"]
    );
}

#[test]
fn skip_confirmation_runs_straight_through() {
    let config = DeliveryConfig {
        dont_wait_for_humans: true,
        ..DeliveryConfig::default()
    };
    let mut h = Harness::with_config(ScriptedPlanner::new(&["a", "b"]), config);

    h.deliveries.submit_goal(Goal::new(["a", "b"])).unwrap();
    let mut states = Vec::new();
    for _ in 0..3 {
        states.push(h.cycle());
    }

    assert!(!states.contains(&DeliveryState::Waiting));
    assert!(h.deliveries.succeeded_on_last_tick());
    assert!(h.sink.notifications().is_empty());
}

#[test]
fn parking_behaviours_only_on_a_fresh_start() {
    let mut h = Harness::standard();

    h.deliveries.submit_goal(Goal::new(["a"])).unwrap();
    h.cycle();
    h.cycle();
    assert_eq!(h.cycle(), DeliveryState::Waiting);

    h.deliveries.submit_goal(Goal::new(["b"])).unwrap();
    h.cycle();

    let requests = h.deliveries.planner().requests.clone();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].include_parking_behaviours);
    assert!(!requests[1].include_parking_behaviours);
    assert_eq!(requests[0].world, WORLD);
}

#[test]
fn assume_initialised_skips_parking() {
    let mut h = Harness::standard();

    h.deliveries
        .submit_goal(Goal::new(["a"]).assume_initialised(true).with_doors(["d1"]))
        .unwrap();
    h.cycle();

    let requests = h.deliveries.planner().requests.clone();
    assert!(!requests[0].include_parking_behaviours);
    assert_eq!(requests[0].doors, vec!["d1"]);
    assert!(h.world.motion_log.iter().all(|m| m != "unpark"));
}

#[test]
fn unplannable_goal_keeps_existing_tree() {
    let mut h = Harness::new(ScriptedPlanner::new(&["a", "b", "x"]).unplannable("x"));

    h.deliveries.submit_goal(Goal::new(["a"])).unwrap();
    h.cycle();
    assert_eq!(h.cycle(), DeliveryState::Waiting);
    let id = h.deliveries.current_tree_id();

    assert_eq!(
        h.deliveries.submit_goal(Goal::new(["x"])),
        Ok(GoalAccepted::Preempting)
    );
    assert_eq!(h.cycle(), DeliveryState::Waiting);
    assert!(!h.deliveries.tree_replaced());
    assert_eq!(h.deliveries.current_tree_id(), id);
    assert_eq!(h.deliveries.locations(), ["a"]);
    assert!(!h.deliveries.handle().has_pending_goal());
}

#[test]
fn unplannable_goal_from_idle_stays_idle() {
    let mut h = Harness::new(ScriptedPlanner::new(&["x"]).unplannable("x"));

    h.deliveries.submit_goal(Goal::new(["x"])).unwrap();
    assert_eq!(h.cycle(), DeliveryState::Idle);
    assert!(h.deliveries.tree().is_none());
    assert_eq!(h.deliveries.planner().requests.len(), 1);
}

#[test]
fn preloaded_goal_starts_on_first_cycle() {
    let locations: Vec<SemanticLocation> = ["b", "a"]
        .iter()
        .map(|name| SemanticLocation {
            unique_name: name.to_string(),
            name: name.to_uppercase(),
            description: String::new(),
            pose: Default::default(),
            keyframe_id: 0,
        })
        .collect();

    let mut h = Harness::standard().preload(&locations);
    assert!(h.deliveries.handle().has_pending_goal());

    assert_eq!(h.cycle(), DeliveryState::Travelling);
    assert_eq!(h.deliveries.locations(), ["b", "a"]);
    assert_eq!(h.deliveries.ledger().remaining(), vec!["b", "a"]);
}

#[test]
fn skipped_tick_is_classified_invalid() {
    let mut h = Harness::standard();
    h.deliveries.submit_goal(Goal::new(["a"])).unwrap();
    h.cycle();

    h.deliveries.advance_cycle(WORLD);
    h.deliveries.classify_after_tick();
    assert_eq!(h.deliveries.state(), DeliveryState::Invalid);
    assert!(!h.deliveries.is_executing());
    assert_eq!(
        h.deliveries.submit_goal(Goal::new(["b"])),
        Err(gopher_deliveries::GoalRejected::AlreadyAssigned)
    );

    // A properly ordered cycle recovers the classification.
    assert_eq!(h.cycle(), DeliveryState::Waiting);
}

#[test]
fn idle_without_tree_ticks_nothing() {
    let mut h = Harness::standard();
    h.deliveries.advance_cycle(WORLD);
    assert_eq!(h.deliveries.tick(&Default::default(), &mut h.world), None);
    h.deliveries.classify_after_tick();
    assert_eq!(h.deliveries.state(), DeliveryState::Idle);
    assert!(h.deliveries.tree().is_none());
    assert!(!h.deliveries.succeeded_on_last_tick());
}
