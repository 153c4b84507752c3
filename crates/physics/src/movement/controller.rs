//! Actor movement controller.
//!
//! This is the main entry point for actor movement. Each tick the host calls
//! [`MovementController::crouch`] and then
//! [`MovementController::process_movement`]; the controller picks a regime
//! (ladder, water, ground, air), computes a new velocity and integrates the
//! origin through the collision world.

use glam::Vec3;

use crate::collision::{
    BodyId, CollisionError, CollisionQuery, ContentFlags, ImpulseSink, TraceResult,
};

use super::accelerate::{accelerate, accelerate_planar, air_accelerate, friction};
use super::actor::Controllable;
use super::config::{MovementConfig, DEFAULT_MAX_OVERLAPS};
use super::depenetrate::resolve_collisions;
use super::slide_move::{reflect, BlockedFlags};
use super::state::{MoveState, MoveType};

/// Longest distance the origin moves before overlaps are resolved again.
pub const MAX_SUBSTEP_DISTANCE: f32 = 0.2;

/// Length of the downward sweep that looks for ground.
pub const GROUND_PROBE_DISTANCE: f32 = 0.15;

/// Extra vertical speed when walking down a slope.
const DOWNHILL_BIAS: f32 = 1.2;

/// Diagnostics for one [`MovementController::process_movement`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// What the air reflect pass ran into.
    pub blocked: BlockedFlags,
    /// Number of integration substeps.
    pub substeps: u32,
    /// A ledge was climbed during integration.
    pub stepped: bool,
}

/// Per-actor movement controller.
///
/// Holds the transient state that has to survive between ticks (jump latch,
/// slide, crouch blend, last ground normal) plus a scratch buffer for overlap
/// queries. One controller drives exactly one actor.
///
/// # Example
///
/// ```ignore
/// let mut controller = MovementController::new(&config);
///
/// // Each tick:
/// controller.crouch(&mut actor, dt, &world)?;
/// controller.process_movement(&mut actor, &config, dt, &world, &mut impulses)?;
/// ```
#[derive(Debug, Clone)]
pub struct MovementController {
    pub(super) jumping: bool,

    /// The shape is currently the crouched one.
    pub(super) crouched: bool,
    pub(super) crouch_lerp: f32,
    pub(super) uncrouch_down: bool,

    pub(super) sliding: bool,
    pub(super) was_sliding: bool,
    pub(super) slide_direction: Vec3,
    pub(super) slide_speed: f32,

    /// Time left before another slide may start.
    pub(super) slide_delay: f32,

    pub(super) ground_normal: Vec3,
    pub(super) friction_mult: f32,

    pub(super) overlaps: Vec<BodyId>,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            jumping: false,
            crouched: false,
            crouch_lerp: 0.0,
            uncrouch_down: false,
            sliding: false,
            was_sliding: false,
            slide_direction: Vec3::Z,
            slide_speed: 0.0,
            slide_delay: 0.0,
            ground_normal: Vec3::Y,
            friction_mult: 1.0,
            overlaps: Vec::with_capacity(DEFAULT_MAX_OVERLAPS),
        }
    }
}

impl MovementController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            overlaps: Vec::with_capacity(config.max_overlaps),
            ..Default::default()
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    /// Whether the actor currently has its crouched shape.
    pub fn is_crouched(&self) -> bool {
        self.crouched
    }

    /// Crouch blend in [0, 1].
    pub fn crouch_lerp(&self) -> f32 {
        self.crouch_lerp
    }

    pub fn slide_speed(&self) -> f32 {
        self.slide_speed
    }

    /// Normal of the last surface the actor stood on.
    pub fn ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    /// Scale ground friction, e.g. for slippery surfaces. Acceleration is
    /// scaled too, but never above its base rate.
    pub fn set_friction_multiplier(&mut self, mult: f32) {
        self.friction_mult = mult.max(0.0);
    }

    /// Forget jump and slide state, e.g. after a teleport.
    pub fn reset_motion(&mut self) {
        self.jumping = false;
        self.sliding = false;
        self.was_sliding = false;
        self.slide_speed = 0.0;
        self.slide_delay = 0.0;
        self.ground_normal = Vec3::Y;
    }

    /// Run one movement tick.
    ///
    /// 1. Computes the regime velocity for the actor's move type
    /// 2. Clamps velocity to `max_velocity`
    /// 3. Moves the origin in substeps of at most [`MAX_SUBSTEP_DISTANCE`],
    ///    resolving overlaps after each one
    pub fn process_movement<A, Q>(
        &mut self,
        actor: &mut A,
        config: &MovementConfig,
        delta_time: f32,
        query: &Q,
        impulses: &mut dyn ImpulseSink,
    ) -> Result<MoveOutcome, CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let mut outcome = MoveOutcome::default();
        let move_type = actor.move_type();

        match move_type {
            MoveType::Walk => self.walk_movement(actor, config, delta_time, query, &mut outcome)?,
            MoveType::Noclip => self.noclip_movement(actor, config, delta_time),
            MoveType::None => {}
        }

        let state = actor.move_state_mut();
        state.velocity = state.velocity.clamp_length_max(config.max_velocity);

        if move_type == MoveType::Noclip {
            state.origin += state.velocity * delta_time;
        } else {
            self.integrate(actor, config, delta_time, query, impulses, &mut outcome)?;
        }

        let state = actor.move_state_mut();
        state.velocity = state.velocity.clamp_length_max(config.max_velocity);
        state.was_grounded = state.grounded;

        Ok(outcome)
    }

    // ========================================================================
    // Regimes
    // ========================================================================

    fn walk_movement<A, Q>(
        &mut self,
        actor: &mut A,
        config: &MovementConfig,
        delta_time: f32,
        query: &Q,
        outcome: &mut MoveOutcome,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let state = actor.move_state();
        if state.ladders_enabled && !state.climbing_ladder {
            let probe = state.velocity * (delta_time * 2.0).clamp(0.025, 0.25);
            self.ladder_check(actor, query, Vec3::new(1.0, 0.95, 1.0), probe)?;
        }

        let state = actor.move_state();
        if state.ladders_enabled && state.climbing_ladder {
            return self.ladder_physics(actor, delta_time, query);
        }
        if state.underwater {
            return self.underwater_physics(actor, config, delta_time, query);
        }

        if state.velocity.y <= 0.0 {
            self.jumping = false;
        }

        if actor.ground_object().is_none() {
            let base_velocity = actor.base_velocity();
            let state = actor.move_state_mut();
            state.velocity.y -= state.gravity_factor * config.gravity * delta_time;
            state.velocity.y += base_velocity.y * delta_time;
        }

        if self.check_grounded(actor, config, query)? {
            self.ground_movement(actor, config, delta_time);
        } else {
            self.air_movement(actor, config, delta_time, query, outcome)?;
        }

        Ok(())
    }

    fn air_movement<A, Q>(
        &mut self,
        actor: &mut A,
        config: &MovementConfig,
        delta_time: f32,
        query: &Q,
        outcome: &mut MoveOutcome,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.was_sliding = false;
        self.sliding = false;

        let forward = flat_dir(actor.forward());
        let right = flat_dir(actor.right());
        let shape = actor.shape();
        let state = actor.move_state_mut();

        let wish_velocity = forward * state.forward_move + right * state.side_move;
        let wish_dir = wish_velocity.normalize_or_zero();
        let mut wish_speed = wish_velocity.length();
        if config.clamp_air_speed && wish_speed > config.max_speed {
            wish_speed = config.max_speed;
        }

        state.velocity += air_accelerate(
            state.velocity,
            wish_dir,
            wish_speed,
            config.air_acceleration,
            config.air_cap,
            delta_time,
        );

        let result = reflect(query, &shape, state.origin, &mut state.velocity, delta_time)?;
        outcome.blocked |= result.blocked;
        Ok(())
    }

    fn ground_movement<A>(&mut self, actor: &mut A, config: &MovementConfig, delta_time: f32)
    where
        A: Controllable + ?Sized,
    {
        let right = actor.right();
        let state = actor.move_state_mut();
        let horizontal = flat(state.velocity);

        if !self.was_sliding {
            self.slide_direction = horizontal.normalize_or_zero();
            self.slide_speed = horizontal.length();
        }

        self.sliding = false;
        let can_slide = state.sliding_enabled && state.crouching && self.slide_delay <= 0.0;
        if can_slide && state.velocity.length() > config.minimum_slide_speed {
            if !self.was_sliding {
                self.slide_speed = (self.slide_speed * config.slide_speed_multiplier)
                    .clamp(config.minimum_slide_speed, config.maximum_slide_speed);
                log::debug!("slide started at {:.2}", self.slide_speed);
            }

            self.sliding = true;
            self.was_sliding = true;
            self.slide_movement(state, config, delta_time);
            return;
        }

        if self.slide_delay > 0.0 {
            self.slide_delay -= delta_time;
        }
        if self.was_sliding {
            log::debug!("slide ended");
            self.slide_delay = config.slide_delay;
        }
        self.was_sliding = false;

        let (fric, accel, decel) = if self.crouched {
            (config.crouch_friction, config.crouch_acceleration, config.crouch_deceleration)
        } else {
            (config.friction, config.acceleration, config.deceleration)
        };
        let speed = config.ground_speed(self.crouched, state.sprinting);

        if state.wish_jump {
            self.jump(state, config);
            return;
        }
        friction(&mut state.velocity, decel, fric * self.friction_mult, delta_time);

        let normal = self.ground_normal;
        let ground_forward = normal.cross(-right);
        let ground_right = normal.cross(ground_forward);

        let wish_dir = (ground_forward * state.forward_axis + ground_right * state.side_axis)
            .normalize_or_zero();
        let wish_speed = wish_dir.length() * speed;

        // Slope direction of the motion as it was before accelerating
        let along_slope = along_ground(normal, flat(state.velocity));

        state.velocity += accelerate_planar(
            state.velocity,
            wish_dir,
            wish_speed,
            accel * self.friction_mult.min(1.0),
            delta_time,
        );

        let horizontal = flat(state.velocity).clamp_length_max(config.max_velocity);
        let slope_speed = along_slope.normalize_or_zero().y * horizontal.length();
        let bias = if wish_dir.y < 0.0 { DOWNHILL_BIAS } else { 1.0 };
        state.velocity = Vec3::new(horizontal.x, slope_speed * bias, horizontal.z);
    }

    /// Free flight along the view basis, no gravity and no collision.
    fn noclip_movement<A>(&mut self, actor: &mut A, config: &MovementConfig, delta_time: f32)
    where
        A: Controllable + ?Sized,
    {
        self.jumping = false;
        self.sliding = false;
        actor.set_ground_object(None);

        let forward = actor.forward();
        let right = actor.right();
        let state = actor.move_state_mut();
        state.grounded = false;

        friction(&mut state.velocity, config.deceleration, config.friction, delta_time);

        let mut wish = forward * state.forward_axis + right * state.side_axis;
        if state.jump_held {
            wish += Vec3::Y;
        }
        if state.crouching {
            wish -= Vec3::Y;
        }

        let wish_dir = wish.normalize_or_zero();
        let wish_speed = config.ground_speed(false, state.sprinting) * wish.length().min(1.0);
        state.velocity += accelerate(
            state.velocity,
            wish_dir,
            wish_speed,
            config.acceleration,
            delta_time,
            1.0,
        );
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    pub(super) fn jump(&mut self, state: &mut MoveState, config: &MovementConfig) {
        if !config.auto_bhop {
            state.wish_jump = false;
        }

        state.velocity.y += config.jump_force;
        self.jumping = true;
    }

    /// Look for walkable ground under the actor and update the ground slot.
    ///
    /// A rising actor that just jumped never counts as grounded.
    pub(super) fn check_grounded<A, Q>(
        &mut self,
        actor: &mut A,
        config: &MovementConfig,
        query: &Q,
    ) -> Result<bool, CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let trace = trace_to_floor(actor, query)?;
        let move_type = actor.move_type();
        let was_on_ground = actor.ground_object().is_some();

        let state = actor.move_state_mut();
        state.surface_friction = 1.0;
        let moving_up = state.velocity.y > 0.0;

        let ground = trace
            .hit_body
            .filter(|_| trace.hit_walkable(state.slope_limit) && !(self.jumping && moving_up));

        match ground {
            Some(body) => {
                if !was_on_ground {
                    log::trace!("landed on {body} at {}", state.origin);
                }
                self.ground_normal = trace.plane_normal;
                state.velocity.y = 0.0;
                state.grounded = true;
                actor.set_ground_object(Some(body));
                Ok(true)
            }
            None => {
                if moving_up && move_type != MoveType::Noclip {
                    state.surface_friction = config.air_friction;
                }
                state.grounded = false;
                actor.set_ground_object(None);
                Ok(false)
            }
        }
    }

    fn integrate<A, Q>(
        &mut self,
        actor: &mut A,
        config: &MovementConfig,
        delta_time: f32,
        query: &Q,
        impulses: &mut dyn ImpulseSink,
        outcome: &mut MoveOutcome,
    ) -> Result<(), CollisionError>
    where
        A: Controllable + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let shape = actor.shape();
        let state = actor.move_state_mut();
        let overlaps = &mut self.overlaps;

        let frame_velocity = state.velocity * delta_time;
        let total = frame_velocity.length();

        if total == 0.0 {
            // Standing still, moving bodies may still push into us
            outcome.stepped |= resolve_collisions(
                query,
                impulses,
                &shape,
                state,
                1.0,
                delta_time,
                overlaps,
                config.max_overlaps,
            )?;
            return Ok(());
        }

        let mut left = total;
        while left > 0.0 {
            let amount = MAX_SUBSTEP_DISTANCE.min(left);
            left -= amount;

            let weight = amount / total;
            state.origin += frame_velocity * weight;
            outcome.substeps += 1;

            outcome.stepped |= resolve_collisions(
                query,
                impulses,
                &shape,
                state,
                weight,
                delta_time,
                overlaps,
                config.max_overlaps,
            )?;
            log::trace!("substep {} at {}", outcome.substeps, state.origin);
        }

        Ok(())
    }
}

/// Sweep the actor's shape a short way down.
pub(super) fn trace_to_floor<A, Q>(actor: &A, query: &Q) -> Result<TraceResult, CollisionError>
where
    A: Controllable + ?Sized,
    Q: CollisionQuery + ?Sized,
{
    let origin = actor.move_state().origin;
    query.trace_shape(
        &actor.shape(),
        origin,
        origin - Vec3::Y * GROUND_PROBE_DISTANCE,
        ContentFlags::GROUND,
        1.0,
    )
}

/// Direction along a surface with `normal` that follows the horizontal
/// `direction`. Its `y` is the slope's rise along that heading.
pub(super) fn along_ground(normal: Vec3, direction: Vec3) -> Vec3 {
    normal.cross(Vec3::new(-direction.z, 0.0, direction.x))
}

/// `v` with the vertical component removed.
pub(super) fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal unit direction of `v`, zero if `v` is vertical.
pub(super) fn flat_dir(v: Vec3) -> Vec3 {
    flat(v).normalize_or_zero()
}
