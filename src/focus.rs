//! Focus-view selection and the per-frame effects derived from it.
//!
//! Effects are recomputed from the current selection on every frame rather
//! than on transitions, so overlapping panel edits cannot leave a stale
//! visibility state behind.

use crate::body::{PlanetId, SCALE};
use crate::camera::GLIDE_FACTOR;
use crate::math::Vec3;
use crate::scene::World;

pub(crate) const NORMAL_RATE: f32 = 1.0;
pub(crate) const SLOW_RATE: f32 = 0.2;

/// Focus pose relative to the focused planet's orbital distance.
pub(crate) const FOCUS_OUTWARD: f32 = 1.2;
pub(crate) const FOCUS_HEIGHT: f32 = 2.0;
pub(crate) const FOCUS_DEPTH: f32 = 7.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum FocusSelection {
    #[default]
    Default,
    Planet(PlanetId),
}

impl FocusSelection {
    pub(crate) const CHOICES: [FocusSelection; 9] = [
        FocusSelection::Default,
        FocusSelection::Planet(PlanetId::Mercury),
        FocusSelection::Planet(PlanetId::Venus),
        FocusSelection::Planet(PlanetId::Earth),
        FocusSelection::Planet(PlanetId::Mars),
        FocusSelection::Planet(PlanetId::Jupiter),
        FocusSelection::Planet(PlanetId::Saturn),
        FocusSelection::Planet(PlanetId::Uranus),
        FocusSelection::Planet(PlanetId::Neptune),
    ];

    pub(crate) fn key(self) -> &'static str {
        match self {
            FocusSelection::Default => "default",
            FocusSelection::Planet(p) => p.key(),
        }
    }

    pub(crate) fn ordinal(self) -> usize {
        match self {
            FocusSelection::Default => 0,
            FocusSelection::Planet(p) => p.index() + 1,
        }
    }

    pub(crate) fn from_ordinal(i: usize) -> Option<Self> {
        Self::CHOICES.get(i).copied()
    }

    /// Next/previous choice, wrapping around the selector.
    pub(crate) fn cycle(self, step: i32) -> Self {
        let n = Self::CHOICES.len() as i32;
        let i = (self.ordinal() as i32 + step).rem_euclid(n) as usize;
        Self::CHOICES[i]
    }

    pub(crate) fn planet(self) -> Option<PlanetId> {
        match self {
            FocusSelection::Default => None,
            FocusSelection::Planet(p) => Some(p),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct LabelToggles {
    pub(crate) show_orbits: bool,
    pub(crate) show_names: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FrameEffects {
    pub(crate) primary_visible: [bool; 8],
    pub(crate) alt_visible: [bool; 8],
    pub(crate) primary_label: [bool; 8],
    pub(crate) alt_label: [bool; 8],
    pub(crate) orbit_visible: [bool; 8],
    pub(crate) sun_label: bool,
    pub(crate) camera_target: Vec3,
    pub(crate) camera_goal: Option<Vec3>,
    pub(crate) slow_rate: f32,
}

pub(crate) fn focus_target(p: PlanetId) -> Vec3 {
    Vec3::new(p.spec().distance_ratio * SCALE.distance, 0.0, 0.0)
}

pub(crate) fn focus_goal(p: PlanetId) -> Vec3 {
    let d = p.spec().distance_ratio * SCALE.distance;
    Vec3::new(FOCUS_OUTWARD * d, FOCUS_HEIGHT, FOCUS_DEPTH)
}

/// Pure derivation of everything the focus state and pointer hold decide.
///
/// While the pointer is held its overrides win: the sun label, every orbit
/// path and every primary label are shown, and with a focus active every alt
/// label is flagged too. Labels of hidden bodies are never drawn.
pub(crate) fn derive_frame_effects(
    focus: FocusSelection,
    pointer_held: bool,
    toggles: LabelToggles,
) -> FrameEffects {
    let names = toggles.show_names || pointer_held;
    let mut fx = FrameEffects {
        primary_visible: [true; 8],
        alt_visible: [false; 8],
        primary_label: [names; 8],
        alt_label: [false; 8],
        orbit_visible: [toggles.show_orbits || pointer_held; 8],
        sun_label: names,
        camera_target: Vec3::ZERO,
        camera_goal: None,
        slow_rate: if pointer_held { SLOW_RATE } else { NORMAL_RATE },
    };

    if let FocusSelection::Planet(p) = focus {
        let i = p.index();
        fx.slow_rate = SLOW_RATE;
        fx.primary_visible[i] = false;
        fx.alt_visible[i] = true;
        fx.primary_label[i] = false;
        if pointer_held {
            fx.alt_label = [true; 8];
        } else {
            fx.alt_label[i] = names;
        }
        fx.camera_target = focus_target(p);
        fx.camera_goal = Some(focus_goal(p));
    }

    fx
}

pub(crate) fn apply_frame_effects(world: &mut World, fx: &FrameEffects) {
    for p in PlanetId::ALL {
        let i = p.index();
        let primary = &mut world.primaries[i];
        primary.mesh.visible = fx.primary_visible[i];
        primary.label.visible = fx.primary_label[i];

        let alt = &mut world.alts[i];
        alt.mesh.visible = fx.alt_visible[i];
        alt.label.visible = fx.alt_label[i];

        world.orbits[i].visible = fx.orbit_visible[i];
    }
    world.sun.label.visible = fx.sun_label;
    world.rate.slow_rate_multiplier = fx.slow_rate;
    world.camera.target = fx.camera_target;
    if let Some(goal) = fx.camera_goal {
        world.camera.glide_toward(goal, GLIDE_FACTOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_world;
    use proptest::prelude::*;

    fn assert_pair_invariant(world: &World, focus: FocusSelection) {
        for p in PlanetId::ALL {
            let primary = world.primary(p).mesh.visible;
            let alt = world.alt(p).mesh.visible;
            assert!(primary != alt, "{p:?} primary={primary} alt={alt}");
            match focus {
                FocusSelection::Planet(f) if f == p => assert!(alt),
                _ => assert!(primary),
            }
        }
    }

    #[test]
    fn default_shows_every_primary_and_no_alt() {
        let fx = derive_frame_effects(FocusSelection::Default, false, LabelToggles::default());
        assert_eq!(fx.primary_visible, [true; 8]);
        assert_eq!(fx.alt_visible, [false; 8]);
        assert_eq!(fx.alt_label, [false; 8]);
        assert_eq!(fx.camera_target, Vec3::ZERO);
        assert_eq!(fx.camera_goal, None);
        assert_eq!(fx.slow_rate, NORMAL_RATE);
    }

    #[test]
    fn every_state_keeps_one_body_per_planet_visible() {
        for focus in FocusSelection::CHOICES {
            let mut world = test_world();
            let fx = derive_frame_effects(focus, false, LabelToggles::default());
            apply_frame_effects(&mut world, &fx);
            assert_pair_invariant(&world, focus);
        }
    }

    #[test]
    fn switching_between_planets_leaves_no_stale_visibility() {
        let mut world = test_world();
        let a = FocusSelection::Planet(PlanetId::Mars);
        let b = FocusSelection::Planet(PlanetId::Saturn);
        apply_frame_effects(&mut world, &derive_frame_effects(a, false, LabelToggles::default()));
        apply_frame_effects(&mut world, &derive_frame_effects(b, false, LabelToggles::default()));
        assert_pair_invariant(&world, b);
        assert!(world.primary(PlanetId::Mars).mesh.visible);
        assert!(!world.alt(PlanetId::Mars).mesh.visible);
    }

    #[test]
    fn focus_hides_own_primary_label_and_other_alt_labels() {
        let toggles = LabelToggles { show_orbits: false, show_names: true };
        let fx = derive_frame_effects(FocusSelection::Planet(PlanetId::Jupiter), false, toggles);
        let j = PlanetId::Jupiter.index();
        for i in 0..8 {
            assert_eq!(fx.primary_label[i], i != j);
            assert_eq!(fx.alt_label[i], i == j);
        }
    }

    #[test]
    fn focus_on_earth_targets_its_orbital_distance() {
        let mut world = test_world();
        let fx = derive_frame_effects(FocusSelection::Planet(PlanetId::Earth), false, LabelToggles::default());
        apply_frame_effects(&mut world, &fx);
        let earth = PlanetId::Earth;
        assert!(world.alt(earth).mesh.visible);
        assert!(!world.primary(earth).mesh.visible);
        for p in PlanetId::ALL.into_iter().filter(|p| *p != earth) {
            assert!(world.primary(p).mesh.visible);
            assert!(!world.alt(p).mesh.visible);
        }
        let d = world.primary(earth).orbital_distance;
        assert_eq!(world.camera.target, Vec3::new(d, 0.0, 0.0));
        assert_eq!(fx.camera_goal, Some(Vec3::new(1.2 * d, 2.0, 7.0)));
    }

    #[test]
    fn pointer_hold_reveals_everything_and_wins_over_focus() {
        let fx = derive_frame_effects(FocusSelection::Planet(PlanetId::Venus), true, LabelToggles::default());
        assert!(fx.sun_label);
        assert_eq!(fx.orbit_visible, [true; 8]);
        assert_eq!(fx.alt_label, [true; 8]);
        assert_eq!(fx.slow_rate, SLOW_RATE);

        let fx = derive_frame_effects(FocusSelection::Default, true, LabelToggles::default());
        assert_eq!(fx.primary_label, [true; 8]);
        assert_eq!(fx.alt_label, [false; 8]);
    }

    #[test]
    fn release_hides_forced_overlays() {
        let fx = derive_frame_effects(FocusSelection::Planet(PlanetId::Venus), false, LabelToggles::default());
        assert!(!fx.sun_label);
        assert_eq!(fx.orbit_visible, [false; 8]);
        assert_eq!(fx.primary_label, [false; 8]);
        assert_eq!(fx.alt_label, [false; 8]);
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(FocusSelection::Default.cycle(-1), FocusSelection::Planet(PlanetId::Neptune));
        assert_eq!(FocusSelection::Planet(PlanetId::Neptune).cycle(1), FocusSelection::Default);
        for (i, c) in FocusSelection::CHOICES.iter().enumerate() {
            assert_eq!(FocusSelection::from_ordinal(i), Some(*c));
        }
    }

    proptest! {
        #[test]
        fn slow_rate_is_normal_only_when_idle(ord in 0usize..9, held in any::<bool>(), orbits in any::<bool>(), names in any::<bool>()) {
            let focus = FocusSelection::CHOICES[ord];
            let fx = derive_frame_effects(focus, held, LabelToggles { show_orbits: orbits, show_names: names });
            let idle = focus == FocusSelection::Default && !held;
            prop_assert_eq!(fx.slow_rate, if idle { NORMAL_RATE } else { SLOW_RATE });
        }

        #[test]
        fn exactly_one_alt_visible_under_focus(ord in 1usize..9, held in any::<bool>()) {
            let focus = FocusSelection::CHOICES[ord];
            let fx = derive_frame_effects(focus, held, LabelToggles::default());
            prop_assert_eq!(fx.alt_visible.iter().filter(|v| **v).count(), 1);
            prop_assert_eq!(fx.primary_visible.iter().filter(|v| !**v).count(), 1);
            for i in 0..8 {
                prop_assert!(fx.primary_visible[i] != fx.alt_visible[i]);
            }
        }
    }
}
