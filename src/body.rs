use crate::math::{deg, Vec3};
use crate::render::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum PlanetId {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl PlanetId {
    pub(crate) const ALL: [PlanetId; 8] = [
        PlanetId::Mercury,
        PlanetId::Venus,
        PlanetId::Earth,
        PlanetId::Mars,
        PlanetId::Jupiter,
        PlanetId::Saturn,
        PlanetId::Uranus,
        PlanetId::Neptune,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn spec(self) -> &'static PlanetSpec {
        &PLANETS[self.index()]
    }

    pub(crate) fn name(self) -> &'static str {
        self.spec().name
    }

    /// Lower-case key used by the focus selector and texture file names.
    pub(crate) fn key(self) -> &'static str {
        self.spec().key
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RingSpec {
    /// Multiples of the owning body's radius.
    pub(crate) inner: f32,
    pub(crate) outer: f32,
    pub(crate) texture: &'static str,
    pub(crate) color: Rgb,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PlanetSpec {
    pub(crate) name: &'static str,
    pub(crate) key: &'static str,
    pub(crate) radius_ratio: f32,
    pub(crate) distance_ratio: f32,
    pub(crate) spin_coeff: f32,
    pub(crate) revolution_coeff: f32,
    pub(crate) tilt_deg: f32,
    pub(crate) texture: &'static str,
    pub(crate) color: Rgb,
    pub(crate) ring: Option<RingSpec>,
}

// Spin is relative to Earth's day, revolution to Earth's year. Tilts are the
// IAU obliquities; Venus and Uranus spin retrograde through their tilt.
pub(crate) const PLANETS: [PlanetSpec; 8] = [
    PlanetSpec {
        name: "Mercury",
        key: "mercury",
        radius_ratio: 0.38,
        distance_ratio: 1.0,
        spin_coeff: 0.017,
        revolution_coeff: 4.15,
        tilt_deg: 0.03,
        texture: "mercury.jpg",
        color: Rgb { r: 150, g: 145, b: 140 },
        ring: None,
    },
    PlanetSpec {
        name: "Venus",
        key: "venus",
        radius_ratio: 0.95,
        distance_ratio: 1.9,
        spin_coeff: 0.004,
        revolution_coeff: 1.62,
        tilt_deg: 177.36,
        texture: "venus.jpg",
        color: Rgb { r: 230, g: 190, b: 120 },
        ring: None,
    },
    PlanetSpec {
        name: "Earth",
        key: "earth",
        radius_ratio: 1.0,
        distance_ratio: 2.6,
        spin_coeff: 1.0,
        revolution_coeff: 1.0,
        tilt_deg: 23.44,
        texture: "earth.jpg",
        color: Rgb { r: 70, g: 130, b: 210 },
        ring: None,
    },
    PlanetSpec {
        name: "Mars",
        key: "mars",
        radius_ratio: 0.53,
        distance_ratio: 4.0,
        spin_coeff: 0.97,
        revolution_coeff: 0.53,
        tilt_deg: 25.19,
        texture: "mars.jpg",
        color: Rgb { r: 200, g: 90, b: 50 },
        ring: None,
    },
    PlanetSpec {
        name: "Jupiter",
        key: "jupiter",
        radius_ratio: 4.0,
        distance_ratio: 5.5,
        spin_coeff: 2.41,
        revolution_coeff: 0.084,
        tilt_deg: 3.13,
        texture: "jupiter.jpg",
        color: Rgb { r: 200, g: 160, b: 120 },
        ring: None,
    },
    PlanetSpec {
        name: "Saturn",
        key: "saturn",
        radius_ratio: 3.4,
        distance_ratio: 7.2,
        spin_coeff: 2.24,
        revolution_coeff: 0.034,
        tilt_deg: 26.73,
        texture: "saturn.jpg",
        color: Rgb { r: 220, g: 195, b: 140 },
        ring: Some(RingSpec {
            inner: 1.2,
            outer: 2.3,
            texture: "saturn_ring.png",
            color: Rgb { r: 205, g: 185, b: 150 },
        }),
    },
    PlanetSpec {
        name: "Uranus",
        key: "uranus",
        radius_ratio: 2.0,
        distance_ratio: 8.4,
        spin_coeff: 1.39,
        revolution_coeff: 0.012,
        tilt_deg: 97.77,
        texture: "uranus.jpg",
        color: Rgb { r: 150, g: 215, b: 225 },
        ring: Some(RingSpec {
            inner: 1.4,
            outer: 2.0,
            texture: "uranus_ring.png",
            color: Rgb { r: 140, g: 170, b: 180 },
        }),
    },
    PlanetSpec {
        name: "Neptune",
        key: "neptune",
        radius_ratio: 1.95,
        distance_ratio: 9.9,
        spin_coeff: 1.49,
        revolution_coeff: 0.006,
        tilt_deg: 28.32,
        texture: "neptune.jpg",
        color: Rgb { r: 70, g: 110, b: 220 },
        ring: None,
    },
];

/// World units per unit of the table's ratios.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scale {
    pub(crate) radius: f32,
    pub(crate) distance: f32,
}

pub(crate) const SCALE: Scale = Scale { radius: 2.0, distance: 25.0 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Variant {
    Primary,
    AltCloseUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shading {
    /// Ambient plus a point light at the sun.
    Lit,
    Unlit,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Pivot {
    /// Revolution angle about +Y through the origin.
    pub(crate) angle: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Mesh {
    pub(crate) radius: f32,
    /// Position inside the pivot frame.
    pub(crate) offset: Vec3,
    pub(crate) tilt_axis: Vec3,
    pub(crate) spin: f32,
    pub(crate) visible: bool,
    pub(crate) shading: Shading,
    pub(crate) texture: &'static str,
    pub(crate) color: Rgb,
}

#[derive(Clone, Debug)]
pub(crate) struct Ring {
    pub(crate) inner: f32,
    pub(crate) outer: f32,
    pub(crate) spin: f32,
    pub(crate) texture: &'static str,
    pub(crate) color: Rgb,
}

#[derive(Clone, Debug)]
pub(crate) struct Label {
    pub(crate) text: String,
    pub(crate) visible: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub(crate) planet: PlanetId,
    pub(crate) variant: Variant,
    pub(crate) pivot: Pivot,
    pub(crate) mesh: Mesh,
    pub(crate) ring: Option<Ring>,
    pub(crate) label: Label,
    pub(crate) orbital_distance: f32,
}

impl Body {
    pub(crate) fn world_center(&self) -> Vec3 {
        self.mesh.offset.rot_y(self.pivot.angle)
    }

    /// Spin axis in world space (the pivot carries the tilt around with it).
    pub(crate) fn world_axis(&self) -> Vec3 {
        self.mesh.tilt_axis.rot_y(self.pivot.angle)
    }

    /// Maps a world-space direction into the mesh's texture frame.
    pub(crate) fn to_local_dir(&self, dir: Vec3) -> Vec3 {
        dir.rot_y(-self.pivot.angle)
            .rot_axis(self.mesh.tilt_axis, -self.mesh.spin)
    }
}

pub(crate) fn tilt_axis(tilt_deg: f32) -> Vec3 {
    let t = deg(tilt_deg);
    Vec3::new(t.sin(), t.cos(), 0.0)
}

pub(crate) fn create_body(planet: PlanetId, scale: Scale, variant: Variant) -> Body {
    let spec = planet.spec();
    let radius = spec.radius_ratio * scale.radius;
    let distance = spec.distance_ratio * scale.distance;
    let shading = match variant {
        Variant::Primary => Shading::Lit,
        Variant::AltCloseUp => Shading::Unlit,
    };

    Body {
        planet,
        variant,
        pivot: Pivot { angle: 0.0 },
        mesh: Mesh {
            radius,
            offset: Vec3::new(distance, 0.0, 0.0),
            tilt_axis: tilt_axis(spec.tilt_deg),
            spin: 0.0,
            visible: variant == Variant::Primary,
            shading,
            texture: spec.texture,
            color: spec.color,
        },
        ring: spec.ring.map(|r| Ring {
            inner: r.inner * radius,
            outer: r.outer * radius,
            spin: 0.0,
            texture: r.texture,
            color: r.color,
        }),
        label: Label { text: spec.name.to_string(), visible: false },
        orbital_distance: distance,
    }
}
