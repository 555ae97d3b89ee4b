use crate::body::Variant;
use crate::controls::Controls;
use crate::focus::{apply_frame_effects, derive_frame_effects, FrameEffects};
use crate::scene::{World, ATMOSPHERE_SPIN_COEFF, SUN_SPIN_COEFF};

pub(crate) const DEFAULT_ROTATION_RATE: f32 = 0.05;
pub(crate) const DEFAULT_REVOLUTION_RATE: f32 = 0.005;
pub(crate) const ROTATION_RANGE: (f32, f32) = (0.0, 1.0);
pub(crate) const REVOLUTION_RANGE: (f32, f32) = (0.0, 0.1);
/// Rings turn at this fraction of their planet's spin.
pub(crate) const RING_SPIN_FRACTION: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SimulationRate {
    pub(crate) rotation_rate: f32,
    pub(crate) revolution_rate: f32,
    pub(crate) slow_rate_multiplier: f32,
}

impl Default for SimulationRate {
    fn default() -> Self {
        Self {
            rotation_rate: DEFAULT_ROTATION_RATE,
            revolution_rate: DEFAULT_REVOLUTION_RATE,
            slow_rate_multiplier: 1.0,
        }
    }
}

impl SimulationRate {
    pub(crate) fn reset_speed(&mut self) {
        self.rotation_rate = DEFAULT_ROTATION_RATE;
        self.revolution_rate = DEFAULT_REVOLUTION_RATE;
    }

    fn spin_step(&self, coeff: f32) -> f32 {
        coeff * self.rotation_rate * self.slow_rate_multiplier
    }

    fn revolution_step(&self, coeff: f32) -> f32 {
        coeff * self.revolution_rate * self.slow_rate_multiplier
    }
}

/// Advances the sun and every body's spin by one frame. Only primaries
/// revolve: close-up stand-ins stay parked at phase 0 on +X, where the focus
/// camera aims.
pub(crate) fn advance_bodies(world: &mut World) {
    let rate = world.rate;

    world.sun.spin += rate.spin_step(SUN_SPIN_COEFF);
    world.sun.atmosphere.spin += rate.spin_step(ATMOSPHERE_SPIN_COEFF);

    for body in world.bodies_mut() {
        let spec = body.planet.spec();
        let spin = rate.spin_step(spec.spin_coeff);
        body.mesh.spin += spin;
        if let Some(ring) = body.ring.as_mut() {
            ring.spin += spin * RING_SPIN_FRACTION;
        }
        if body.variant == Variant::Primary {
            body.pivot.angle += rate.revolution_step(spec.revolution_coeff);
        }
    }
}

/// One tick of the simulation: derive focus effects, move bodies, then apply
/// visibility and camera motion. Rendering is left to the caller.
pub(crate) fn step_frame(world: &mut World, controls: &mut Controls) -> FrameEffects {
    let fx = derive_frame_effects(controls.focus, controls.pointer_held, controls.toggles);
    world.rate.slow_rate_multiplier = fx.slow_rate;
    advance_bodies(world);
    apply_frame_effects(world, &fx);
    if controls.focus.planet().is_none() {
        controls.orbit.update(&mut world.camera);
    }
    fx
}
