//! Scripted delivery demo.
//!
//! Loads a small semantic map, submits a two-stop goal and plays the part of the
//! humans at each stop, pressing go one cycle after the robot starts waiting.
//!
//! Run:
//! `cargo run -p gopher-deliveries --example scripted_delivery`
//! (`RUST_LOG=debug` for notifications and state changes)

use std::sync::Arc;

use anyhow::Result;
use gopher_bt::{BtNode, BtStatus, TickContext};
use gopher_deliveries::semantics::parse_semantic_locations;
use gopher_deliveries::{
    Deliveries, DeliveryConfig, DeliveryState, Goal, GoalReply, LocationCatalog, PlanRequest,
    Planner, SemanticCatalog, TracingSink,
};
use tracing_subscriber::{fmt, EnvFilter};

const SEMANTICS: &str = r#"
semantic_locations:
  pharmacy:
    name: Pharmacy
    pose: {x: 4.0, y: -1.5, theta: 1.57}
  ward_3:
    name: Ward 3
    pose: {x: 12.0, y: 6.0, theta: 3.14}
  nurses_station:
    name: Nurses Station
    pose: {x: 8.5, y: 2.0, theta: 0.0}
"#;

#[derive(Debug, Default)]
struct Robot {
    odometer: u32,
}

/// Pretends to drive for a few cycles.
struct MoveTo {
    target: String,
    cycles: u32,
}

impl BtNode<Robot> for MoveTo {
    fn tick(&mut self, _ctx: &TickContext, robot: &mut Robot) -> BtStatus {
        robot.odometer += 1;
        self.cycles += 1;
        if self.cycles >= 3 {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn reset(&mut self) {
        self.cycles = 0;
    }

    fn name(&self) -> &str {
        &self.target
    }
}

struct MapPlanner {
    catalog: SemanticCatalog,
}

impl LocationCatalog for MapPlanner {
    fn check_locations(&self, locations: &[String]) -> bool {
        self.catalog.check_locations(locations)
    }

    fn unknown_locations(&self, locations: &[String]) -> Vec<String> {
        self.catalog.unknown_locations(locations)
    }
}

impl Planner<Robot> for MapPlanner {
    fn create_tree(&mut self, request: PlanRequest<'_>) -> Vec<Box<dyn BtNode<Robot>>> {
        let mut steps: Vec<Box<dyn BtNode<Robot>>> = Vec::new();
        for location in request.locations {
            let motion: Box<dyn BtNode<Robot>> = Box::new(MoveTo {
                target: format!("Move to {location}"),
                cycles: 0,
            });
            steps.push(Box::new(request.kit.travel_leg(location.as_str(), motion)));
            steps.push(Box::new(request.kit.waiting_gate(location.as_str())));
        }
        steps
    }

    fn set_current_location(&mut self, location: Option<String>) {
        tracing::info!(?location, "Robot parked");
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let locations = parse_semantic_locations(SEMANTICS)?;
    let planner = MapPlanner {
        catalog: SemanticCatalog::new(&locations),
    };
    let mut deliveries = Deliveries::new(planner, DeliveryConfig::default(), Arc::new(TracingSink));
    let handle = deliveries.handle();

    let rejected = GoalReply::from(handle.submit_goal(Goal::new(["pharmacy", "cafeteria"])));
    tracing::info!(code = ?rejected.code, message = %rejected.message, "First goal");

    let accepted = GoalReply::from(handle.submit_goal(Goal::new(["pharmacy", "ward_3"])));
    tracing::info!(code = ?accepted.code, message = %accepted.message, "Second goal");

    let mut robot = Robot::default();
    let mut ctx = TickContext::default();
    let mut waited = 0;
    for _ in 0..40 {
        let state = deliveries.cycle("hospital", &ctx, &mut robot);
        tracing::info!(
            tick = ctx.tick,
            state = %state,
            feedback = %deliveries.feedback_message(),
            "Cycle"
        );

        if state == DeliveryState::Waiting {
            waited += 1;
            if waited == 2 {
                handle.press_go();
                waited = 0;
            }
        }
        if state == DeliveryState::Idle && deliveries.tree().is_none() {
            break;
        }
        ctx = ctx.next();
    }

    tracing::info!(odometer = robot.odometer, "Delivery finished");
    Ok(())
}
