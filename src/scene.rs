use crate::body::{create_body, Body, Label, PlanetId, Variant, SCALE};
use crate::camera::Camera;
use crate::math::Vec3;
use crate::orbit::{create_orbit_path, OrbitPath};
use crate::sim::SimulationRate;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::FRAC_PI_2;

pub(crate) const STAR_CUBE_HALF: f32 = 1000.0;
pub(crate) const SUN_RADIUS: f32 = 10.0;
pub(crate) const SUN_SPIN_COEFF: f32 = 0.04;
pub(crate) const ATMOSPHERE_RADIUS: f32 = 10.5;
pub(crate) const ATMOSPHERE_SPIN_COEFF: f32 = -0.025;
pub(crate) const ATMOSPHERE_OPACITY: f32 = 0.35;
pub(crate) const SUN_TEXTURE: &str = "sun.jpg";

pub(crate) struct StarField {
    pub(crate) points: Vec<Vec3>,
}

impl StarField {
    pub(crate) fn generate(count: usize, rng: &mut StdRng) -> Self {
        let h = STAR_CUBE_HALF;
        let points = (0..count)
            .map(|_| Vec3::new(rng.gen_range(-h..h), rng.gen_range(-h..h), rng.gen_range(-h..h)))
            .collect();
        Self { points }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Atmosphere {
    pub(crate) radius: f32,
    pub(crate) spin: f32,
    pub(crate) opacity: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Sun {
    pub(crate) radius: f32,
    pub(crate) spin: f32,
    pub(crate) atmosphere: Atmosphere,
    pub(crate) label: Label,
    pub(crate) texture: &'static str,
}

impl Sun {
    fn new() -> Self {
        Self {
            radius: SUN_RADIUS,
            spin: 0.0,
            atmosphere: Atmosphere { radius: ATMOSPHERE_RADIUS, spin: 0.0, opacity: ATMOSPHERE_OPACITY },
            label: Label { text: "Sun".to_string(), visible: false },
            texture: SUN_TEXTURE,
        }
    }
}

/// Everything the frame step reads or writes.
pub(crate) struct World {
    pub(crate) stars: StarField,
    pub(crate) sun: Sun,
    pub(crate) primaries: [Body; 8],
    pub(crate) alts: [Body; 8],
    pub(crate) orbits: [OrbitPath; 8],
    pub(crate) camera: Camera,
    pub(crate) rate: SimulationRate,
}

impl World {
    pub(crate) fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.primaries.iter().chain(self.alts.iter())
    }

    pub(crate) fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.primaries.iter_mut().chain(self.alts.iter_mut())
    }

    pub(crate) fn primary(&self, p: PlanetId) -> &Body {
        &self.primaries[p.index()]
    }

    pub(crate) fn alt(&self, p: PlanetId) -> &Body {
        &self.alts[p.index()]
    }
}

pub(crate) struct SceneParams {
    pub(crate) star_count: usize,
    pub(crate) seed: u64,
    pub(crate) viewport_w: u32,
    pub(crate) viewport_h: u32,
}

pub(crate) fn assemble_world(params: &SceneParams) -> World {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let stars = StarField::generate(params.star_count, &mut rng);

    let orbits = PlanetId::ALL.map(|p| create_orbit_path(p, p.spec().distance_ratio * SCALE.distance));
    let mut primaries = PlanetId::ALL.map(|p| create_body(p, SCALE, Variant::Primary));
    let alts = PlanetId::ALL.map(|p| create_body(p, SCALE, Variant::AltCloseUp));

    for b in primaries.iter_mut() {
        b.pivot.angle = rng.gen_range(0..4) as f32 * FRAC_PI_2;
    }

    log::info!(
        "assembled world: {} stars, {} primary + {} alt bodies, {} orbit paths",
        stars.points.len(),
        primaries.len(),
        alts.len(),
        orbits.len()
    );

    World {
        stars,
        sun: Sun::new(),
        primaries,
        alts,
        orbits,
        camera: Camera::new(params.viewport_w, params.viewport_h),
        rate: SimulationRate::default(),
    }
}

#[cfg(test)]
pub(crate) fn test_world() -> World {
    assemble_world(&SceneParams { star_count: 64, seed: 7, viewport_w: 160, viewport_h: 96 })
}
