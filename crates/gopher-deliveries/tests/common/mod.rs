#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use gopher_bt::{BtNode, BtStatus, TickContext};
use gopher_deliveries::{
    Deliveries, DeliveryConfig, DeliveryState, LocationCatalog, PlanRequest, Planner,
    RecordingSink, SemanticLocation,
};

pub const WORLD: &str = "hospital";

/// Simulated robot: legs take a fixed number of ticks; legs to `fail` locations fail.
#[derive(Debug)]
pub struct SimWorld {
    pub fail: BTreeSet<String>,
    pub motion_log: Vec<String>,
    pub ticks_per_leg: u32,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self {
            fail: BTreeSet::new(),
            motion_log: Vec::new(),
            ticks_per_leg: 2,
        }
    }
}

pub struct Drive {
    target: String,
    elapsed: u32,
}

impl Drive {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            elapsed: 0,
        }
    }
}

impl BtNode<SimWorld> for Drive {
    fn tick(&mut self, _ctx: &TickContext, world: &mut SimWorld) -> BtStatus {
        world.motion_log.push(self.target.clone());
        if world.fail.contains(&self.target) {
            return BtStatus::Failure;
        }
        self.elapsed += 1;
        if self.elapsed >= world.ticks_per_leg {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0;
    }

    fn name(&self) -> &str {
        "Drive"
    }
}

/// Succeeds immediately; stands in for leaving the parking spot.
pub struct Unpark;

impl BtNode<SimWorld> for Unpark {
    fn tick(&mut self, _ctx: &TickContext, world: &mut SimWorld) -> BtStatus {
        world.motion_log.push("unpark".to_string());
        BtStatus::Success
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "Unpark"
    }
}

/// A step that is neither travel nor a gate, running for a fixed number of ticks.
pub struct Hold {
    label: &'static str,
    ticks: u32,
    elapsed: u32,
}

impl Hold {
    pub fn new(label: &'static str, ticks: u32) -> Self {
        Self {
            label,
            ticks,
            elapsed: 0,
        }
    }
}

impl BtNode<SimWorld> for Hold {
    fn tick(&mut self, _ctx: &TickContext, world: &mut SimWorld) -> BtStatus {
        world.motion_log.push(self.label.to_string());
        self.elapsed += 1;
        if self.elapsed >= self.ticks {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0;
    }

    fn name(&self) -> &str {
        self.label
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub world: String,
    pub locations: Vec<String>,
    pub include_parking_behaviours: bool,
    pub doors: Vec<String>,
}

/// Planner that emits `[Unpark?] (TravelLeg, WaitingGate)*` for known locations,
/// optionally with a door step between consecutive stops.
#[derive(Debug, Default)]
pub struct ScriptedPlanner {
    pub known: BTreeSet<String>,
    /// Goals touching any of these come back with no steps.
    pub unplannable: BTreeSet<String>,
    /// Ticks spent leaving the parking spot; `None` is instant.
    pub unpark_ticks: Option<u32>,
    /// Ticks spent at a door between stops; `None` plans no doors.
    pub door_ticks: Option<u32>,
    pub requests: Vec<RecordedRequest>,
    pub current_locations: Vec<Option<String>>,
}

impl ScriptedPlanner {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn unplannable(mut self, location: &str) -> Self {
        self.unplannable.insert(location.to_string());
        self
    }

    pub fn slow_unpark(mut self, ticks: u32) -> Self {
        self.unpark_ticks = Some(ticks);
        self
    }

    pub fn doors_between_stops(mut self, ticks: u32) -> Self {
        self.door_ticks = Some(ticks);
        self
    }
}

impl LocationCatalog for ScriptedPlanner {
    fn check_locations(&self, locations: &[String]) -> bool {
        locations.iter().all(|l| self.known.contains(l))
    }

    fn unknown_locations(&self, locations: &[String]) -> Vec<String> {
        locations
            .iter()
            .filter(|l| !self.known.contains(*l))
            .cloned()
            .collect()
    }
}

impl Planner<SimWorld> for ScriptedPlanner {
    fn create_tree(&mut self, request: PlanRequest<'_>) -> Vec<Box<dyn BtNode<SimWorld>>> {
        self.requests.push(RecordedRequest {
            world: request.world.to_string(),
            locations: request.locations.to_vec(),
            include_parking_behaviours: request.include_parking_behaviours,
            doors: request.doors.to_vec(),
        });

        if request.locations.iter().any(|l| self.unplannable.contains(l)) {
            return Vec::new();
        }

        let mut steps: Vec<Box<dyn BtNode<SimWorld>>> = Vec::new();
        if request.include_parking_behaviours {
            match self.unpark_ticks {
                Some(ticks) => steps.push(Box::new(Hold::new("unpark", ticks))),
                None => steps.push(Box::new(Unpark)),
            }
        }
        for (i, location) in request.locations.iter().enumerate() {
            if let (Some(ticks), true) = (self.door_ticks, i > 0) {
                steps.push(Box::new(Hold::new("door", ticks)));
            }
            let motion: Box<dyn BtNode<SimWorld>> = Box::new(Drive::new(location));
            steps.push(Box::new(request.kit.travel_leg(location.as_str(), motion)));
            steps.push(Box::new(request.kit.waiting_gate(location.as_str())));
        }
        steps
    }

    fn set_current_location(&mut self, location: Option<String>) {
        self.current_locations.push(location);
    }
}

/// A delivery stack plus simulated world, advanced one control cycle at a time.
pub struct Harness {
    pub deliveries: Deliveries<SimWorld, ScriptedPlanner>,
    pub world: SimWorld,
    pub sink: Arc<RecordingSink>,
    ctx: TickContext,
}

impl Harness {
    pub fn new(planner: ScriptedPlanner) -> Self {
        Self::with_config(planner, DeliveryConfig::default())
    }

    pub fn with_config(planner: ScriptedPlanner, config: DeliveryConfig) -> Self {
        let sink = Arc::new(RecordingSink::new());
        Self {
            deliveries: Deliveries::new(planner, config, sink.clone()),
            world: SimWorld::default(),
            sink,
            ctx: TickContext::default(),
        }
    }

    pub fn standard() -> Self {
        Self::new(ScriptedPlanner::new(&["a", "b", "c"]))
    }

    pub fn preload(mut self, locations: &[SemanticLocation]) -> Self {
        self.deliveries = self.deliveries.with_preloaded_goal(locations);
        self
    }

    pub fn cycle(&mut self) -> DeliveryState {
        let state = self.deliveries.cycle(WORLD, &self.ctx, &mut self.world);
        self.ctx = self.ctx.next();
        state
    }

    /// Cycle until the state is `target`, at most `limit` times.
    pub fn cycle_until(&mut self, target: DeliveryState, limit: usize) -> bool {
        for _ in 0..limit {
            if self.cycle() == target {
                return true;
            }
        }
        false
    }

    pub fn feedback(&self) -> String {
        self.deliveries.feedback_message()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
