//! The agent controller.
//!
//! [`AgentController`] owns the agent's per-episode and per-step state and
//! composes smoothing, observation, target selection, placement and reward
//! into the contract seen by a policy and a physics engine. The engine drives
//! it synchronously once per fixed time step:
//!
//! 1. [`AgentController::step`] applies the action before integration,
//! 2. the engine integrates and reports contacts through
//!    [`AgentController::on_nectar_contact`] and
//!    [`AgentController::on_boundary_contact`],
//! 3. [`AgentController::fixed_update`] replaces a depleted target,
//! 4. [`AgentController::collect_observation`] reads the settled state.
use crate::{
    act::FlowerAct,
    config::AgentConfig,
    error::AgentError,
    flower::{Flower, FlowerArea, FlowerId},
    heuristic::{heuristic_action, ManualInput},
    observation::{encode, FlowerObs},
    physics::{Contact, OverlapQuery, PhysicsWorld, RigidBody},
    placement::{PlacementMode, PlacementSampler},
    pose::{euler_to_quat, quat_to_pitch_yaw, wrap_degrees},
    reward::RewardShaper,
    smoothing::SmoothedAxis,
    target::select_nearest,
};
use glam::Vec3;
use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Lifecycle of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// No episode has been started.
    Uninitialized,

    /// An episode is running.
    Active,

    /// The training step cap was reached. A reset starts the next episode.
    Terminated,
}

/// Mutable state of the agent within an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Nearest flower with nectar, if any.
    pub target: Option<FlowerId>,

    /// Smoothed pitch intent.
    pub smooth_pitch: SmoothedAxis,

    /// Smoothed yaw intent.
    pub smooth_yaw: SmoothedAxis,

    /// Actions are ignored while frozen. Never set in training mode.
    pub frozen: bool,

    /// Nectar obtained in this episode.
    pub nectar_obtained: f32,

    /// Beak tip to target distance at the end of the last step.
    pub prev_distance_to_target: Option<f32>,

    /// Steps taken in this episode.
    pub step_count: usize,

    /// How the body was placed by the last successful reset.
    pub spawn_mode: Option<PlacementMode>,
}

impl AgentState {
    fn new(smoothing_rate: f32) -> Self {
        Self {
            target: None,
            smooth_pitch: SmoothedAxis::new(smoothing_rate),
            smooth_yaw: SmoothedAxis::new(smoothing_rate),
            frozen: false,
            nectar_obtained: 0.0,
            prev_distance_to_target: None,
            step_count: 0,
            spawn_mode: None,
        }
    }
}

/// Controls one agent body in a flower area.
pub struct AgentController<W, A> {
    config: AgentConfig,
    world: W,
    area: A,
    sampler: PlacementSampler,
    shaper: RewardShaper,
    rng: StdRng,
    state: AgentState,
    phase: EpisodePhase,
    step_cap: Option<usize>,
    /// Reward emitted since the last [`AgentController::take_reward`].
    reward: f32,
}

impl<W, A> AgentController<W, A>
where
    W: RigidBody + OverlapQuery,
    A: FlowerArea,
{
    /// Binds the controller to its physics body and flower area.
    ///
    /// The step cap is finite in training mode and unbounded otherwise.
    pub fn initialize(config: AgentConfig, world: W, area: A, seed: u64) -> Self {
        let step_cap = config.step_cap();
        info!(
            "Initialize agent, training_mode = {}, step cap = {:?}",
            config.training_mode, step_cap
        );
        Self {
            sampler: PlacementSampler::new(config.placement.clone()),
            shaper: RewardShaper::new(config.reward.clone()),
            state: AgentState::new(config.smoothing_rate),
            rng: StdRng::seed_from_u64(seed),
            phase: EpisodePhase::Uninitialized,
            reward: 0.0,
            step_cap,
            config,
            world,
            area,
        }
    }

    /// Reseeds the random number generator used for resets.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Starts a new episode.
    ///
    /// Refills the flowers when training, clears counters, velocity and
    /// smoothing state, moves the body to a collision-free spawn and selects
    /// the nearest flower. The frozen flag is kept.
    ///
    /// # Errors
    ///
    /// Fails when no collision-free spawn exists. The body is not moved then,
    /// and the controller ignores actions and contacts until a reset succeeds.
    /// The error is fatal: the arena cannot host the agent, so callers must
    /// stop rather than retry the reset in a loop.
    pub fn reset_episode(&mut self) -> Result<(), AgentError> {
        if self.config.training_mode {
            self.area.reset_flowers();
        }

        self.state.nectar_obtained = 0.0;
        self.state.step_count = 0;
        self.state.smooth_pitch.reset();
        self.state.smooth_yaw.reset();
        self.state.target = None;
        self.state.prev_distance_to_target = None;
        self.reward = 0.0;
        self.world.zero_velocity();

        let mode = self.placement_mode();
        let pose = match self.sampler.sample(
            mode,
            self.area.flowers(),
            &self.area.frame(),
            &self.world,
            &mut self.rng,
        ) {
            Ok(pose) => pose,
            Err(e) => {
                self.phase = EpisodePhase::Uninitialized;
                self.state.spawn_mode = None;
                return Err(e);
            }
        };
        self.world.set_pose(pose);
        self.state.spawn_mode = Some(mode);

        self.update_nearest_flower();
        self.state.prev_distance_to_target = self.distance_to_target();
        self.phase = EpisodePhase::Active;

        info!(
            "Episode begins, {:?} spawn at {:?}, target = {:?}",
            mode, pose.position, self.state.target
        );
        Ok(())
    }

    /// In front of a flower most of the time when training, always otherwise.
    fn placement_mode(&mut self) -> PlacementMode {
        if !self.config.training_mode {
            return PlacementMode::InFrontOfFlower;
        }
        let p = self.config.in_front_probability.clamp(0.0, 1.0);
        match self.rng.gen_bool(p) {
            true => PlacementMode::InFrontOfFlower,
            false => PlacementMode::FreeFloating,
        }
    }

    /// Applies an action to the body.
    ///
    /// Does nothing while frozen or outside an active episode.
    pub fn step(&mut self, act: &FlowerAct) {
        if self.state.frozen || self.phase != EpisodePhase::Active {
            return;
        }
        let act = act.clamped();
        let dt = self.config.fixed_delta_time;

        self.world
            .apply_force(act.movement() * self.config.move_force);

        let pitch_change = self.state.smooth_pitch.advance(act.pitch(), dt);
        let yaw_change = self.state.smooth_yaw.advance(act.yaw(), dt);

        let (pitch, yaw) = quat_to_pitch_yaw(self.world.orientation());
        let max_pitch = self.config.max_pitch_angle;
        let pitch = wrap_degrees(pitch + pitch_change * dt * self.config.pitch_speed)
            .clamp(-max_pitch, max_pitch);
        let yaw = wrap_degrees(yaw + yaw_change * dt * self.config.yaw_speed);
        self.world.set_orientation(euler_to_quat(pitch, yaw, 0.0));

        self.state.step_count += 1;
        trace!(
            "step {}: pitch = {:.2}, yaw = {:.2}",
            self.state.step_count,
            pitch,
            yaw
        );

        if let Some(cap) = self.step_cap {
            if self.state.step_count >= cap {
                info!(
                    "Episode ends at step cap {}, nectar obtained = {}",
                    cap, self.state.nectar_obtained
                );
                self.phase = EpisodePhase::Terminated;
            }
        }
    }

    /// Handles the beak touching the nectar collider of `flower`.
    ///
    /// Only a contact within the beak tip radius counts; a collision with any
    /// other part of the body is ignored, as is any contact before a reset
    /// succeeded. Returns the reward emitted, if any.
    pub fn on_nectar_contact(&mut self, flower: FlowerId, contact_point: Vec3) -> Option<f32> {
        if self.phase == EpisodePhase::Uninitialized {
            return None;
        }
        if self.beak_tip().distance(contact_point) >= self.config.beak_tip_radius {
            return None;
        }

        let received = self.area.feed(flower, self.config.nectar_per_contact);
        self.state.nectar_obtained += received;

        let mut reward = None;
        if self.config.training_mode && received > 0.0 {
            // Alignment with the current target; the fed flower stands in when
            // there is none.
            let up = self
                .target_flower()
                .or_else(|| self.area.flower(flower))
                .map(|f| f.up.normalize_or_zero())
                .unwrap_or(Vec3::ZERO);
            let alignment = self.world.pose().forward().dot(-up);
            let r = self.shaper.on_nectar_fed(received, alignment);
            self.reward += r;
            reward = Some(r);
        }

        let depleted = self.area.flower(flower).map_or(true, |f| !f.has_nectar());
        if depleted {
            debug!("{} is empty", flower);
            self.update_nearest_flower();
        }
        reward
    }

    /// Handles a collision with the arena boundary. Returns the reward emitted, if any.
    pub fn on_boundary_contact(&mut self) -> Option<f32> {
        if !self.config.training_mode || self.phase == EpisodePhase::Uninitialized {
            return None;
        }
        let r = self.shaper.on_boundary_collision();
        self.reward += r;
        Some(r)
    }

    /// Dispatches a contact reported by the physics engine.
    pub fn on_contact(&mut self, contact: &Contact) -> Option<f32> {
        match contact {
            Contact::Nectar { flower, point } => self.on_nectar_contact(*flower, *point),
            Contact::Boundary => self.on_boundary_contact(),
            Contact::Other => None,
        }
    }

    /// Per physics step housekeeping: replaces a depleted target.
    pub fn fixed_update(&mut self) {
        if let Some(target) = self.target_flower() {
            if !target.has_nectar() {
                self.update_nearest_flower();
            }
        }
        self.state.prev_distance_to_target = self.distance_to_target();
    }

    /// Stops applying actions and puts the body to sleep.
    ///
    /// # Panics
    ///
    /// In training mode.
    pub fn freeze(&mut self) {
        assert!(
            !self.config.training_mode,
            "Freeze/Unfreeze not supported in training"
        );
        self.state.frozen = true;
        self.world.sleep();
    }

    /// Resumes applying actions and wakes the body.
    ///
    /// # Panics
    ///
    /// In training mode.
    pub fn unfreeze(&mut self) {
        assert!(
            !self.config.training_mode,
            "Freeze/Unfreeze not supported in training"
        );
        self.state.frozen = false;
        self.world.wake();
    }

    /// Observation of the current state.
    pub fn collect_observation(&self) -> FlowerObs {
        encode(
            &self.world.pose(),
            self.beak_tip(),
            self.target_flower(),
            &self.area.frame(),
            self.area.diameter(),
        )
    }

    /// Action for the given pilot input.
    pub fn heuristic(&self, input: &ManualInput) -> FlowerAct {
        heuristic_action(input, &self.world.pose())
    }

    /// Returns and clears the reward emitted since the last call.
    pub fn take_reward(&mut self) -> f32 {
        std::mem::take(&mut self.reward)
    }

    fn update_nearest_flower(&mut self) {
        let nearest = select_nearest(self.area.flowers(), self.beak_tip());
        if nearest != self.state.target {
            debug!("Target {:?} -> {:?}", self.state.target, nearest);
        }
        self.state.target = nearest;
    }

    /// Position of the beak tip.
    pub fn beak_tip(&self) -> Vec3 {
        self.world.pose().beak_tip(self.config.beak_length)
    }

    /// The current target flower.
    pub fn target_flower(&self) -> Option<&Flower> {
        self.state.target.and_then(|id| self.area.flower(id))
    }

    /// Beak tip to target feeding point distance.
    pub fn distance_to_target(&self) -> Option<f32> {
        self.target_flower()
            .map(|f| f.center.distance(self.beak_tip()))
    }

    /// Identity of the current target.
    pub fn target(&self) -> Option<FlowerId> {
        self.state.target
    }

    /// Nectar obtained in this episode.
    pub fn nectar_obtained(&self) -> f32 {
        self.state.nectar_obtained
    }

    /// How the body was placed by the last successful reset.
    pub fn spawn_mode(&self) -> Option<PlacementMode> {
        self.state.spawn_mode
    }

    /// Whether actions are ignored.
    pub fn is_frozen(&self) -> bool {
        self.state.frozen
    }

    /// Whether the training step cap ended the episode.
    pub fn is_terminated(&self) -> bool {
        self.phase == EpisodePhase::Terminated
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Episode state.
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The physics body.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The physics body, mutably.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// The flower area.
    pub fn area(&self) -> &A {
        &self.area
    }

    /// The flower area, mutably.
    pub fn area_mut(&mut self) -> &mut A {
        &mut self.area
    }
}

impl<W, A> AgentController<W, A>
where
    W: PhysicsWorld,
    A: FlowerArea,
{
    /// Integrates the physics world by one fixed time step and returns its contacts.
    pub fn advance_physics(&mut self) -> Vec<Contact> {
        self.world
            .advance(self.config.fixed_delta_time, self.area.flowers())
    }
}
