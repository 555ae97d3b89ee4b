use crate::body::PlanetId;
use crate::math::Vec3;
use std::f32::consts::TAU;

pub(crate) const ORBIT_SAMPLES: usize = 500;

#[derive(Clone, Debug)]
pub(crate) struct OrbitPath {
    pub(crate) planet: PlanetId,
    pub(crate) radius: f32,
    pub(crate) points: Vec<Vec3>,
    pub(crate) visible: bool,
}

/// Closed circle in the orbital (XZ) plane. Starts hidden.
pub(crate) fn create_orbit_path(planet: PlanetId, radius: f32) -> OrbitPath {
    let points = (0..ORBIT_SAMPLES)
        .map(|i| {
            let a = TAU * (i as f32) / (ORBIT_SAMPLES as f32);
            // sampled in XY, then laid flat into XZ
            Vec3::new(radius * a.cos(), 0.0, -radius * a.sin())
        })
        .collect();

    OrbitPath { planet, radius, points, visible: false }
}
