use crate::camera::{OrbitControls, CAMERA_LIMIT};
use crate::focus::{FocusSelection, LabelToggles};
use crate::math::{clamp, Vec3};
use crate::panel::{PanelRow, PanelState};
use crate::scene::World;
use crate::sim::{REVOLUTION_RANGE, ROTATION_RANGE};

const ROTATION_STEP: f32 = 0.01;
const REVOLUTION_STEP: f32 = 0.001;
const CAMERA_STEP: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ControlAction {
    Quit,
    ToggleHelp,
    MoveCursor(i32),
    /// Adjust the row under the panel cursor.
    Nudge(i32),
    /// Press the row under the panel cursor.
    Activate,
    /// Move the cursor to a row and press it.
    Press(PanelRow),
    SelectFocus(FocusSelection),
    Orbit { azimuth: f32, polar: f32 },
    Dolly(f32),
    PointerDown,
    PointerUp,
}

/// Control-side state the frame step reads: the focus selection, the pointer
/// hold gesture, label toggles and the orbit controls.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Controls {
    pub(crate) focus: FocusSelection,
    pub(crate) pointer_held: bool,
    pub(crate) toggles: LabelToggles,
    pub(crate) orbit: OrbitControls,
}

fn stepped(v: f32, step: f32, dir: i32, range: (f32, f32)) -> f32 {
    let next = ((v + step * dir as f32) / step).round() * step;
    clamp(next, range.0, range.1)
}

impl Controls {
    pub(crate) fn in_focus_view(&self) -> bool {
        self.focus.planet().is_some()
    }

    /// Focus-selector callback. Leaving a focus view for `Default` restores
    /// the default camera once; every other effect is derived per frame.
    pub(crate) fn select_focus(&mut self, world: &mut World, next: FocusSelection) {
        let prev = self.focus;
        if prev == next {
            return;
        }
        self.focus = next;
        if next == FocusSelection::Default {
            world.camera.reset();
            world.rate.slow_rate_multiplier = 1.0;
            self.orbit.stop();
        }
        log::info!("focus {} -> {}", prev.key(), next.key());
    }

    pub(crate) fn set_camera_axis(&mut self, world: &mut World, row: PanelRow, dir: i32) {
        if self.in_focus_view() {
            return;
        }
        let p = world.camera.position;
        let bump = |v: f32| stepped(v, CAMERA_STEP, dir, (-CAMERA_LIMIT, CAMERA_LIMIT));
        world.camera.position = match row {
            PanelRow::CameraX => Vec3::new(bump(p.x), p.y, p.z),
            PanelRow::CameraY => Vec3::new(p.x, bump(p.y), p.z),
            PanelRow::CameraZ => Vec3::new(p.x, p.y, bump(p.z)),
            _ => p,
        };
    }

    fn nudge(&mut self, world: &mut World, row: PanelRow, dir: i32) {
        match row {
            PanelRow::RotationRate => {
                world.rate.rotation_rate = stepped(world.rate.rotation_rate, ROTATION_STEP, dir, ROTATION_RANGE);
            }
            PanelRow::RevolutionRate => {
                world.rate.revolution_rate =
                    stepped(world.rate.revolution_rate, REVOLUTION_STEP, dir, REVOLUTION_RANGE);
            }
            PanelRow::CameraX | PanelRow::CameraY | PanelRow::CameraZ => self.set_camera_axis(world, row, dir),
            PanelRow::Focus => self.select_focus(world, self.focus.cycle(dir)),
            PanelRow::ShowOrbits | PanelRow::ShowNames => self.press(world, row),
            PanelRow::ResetSpeed | PanelRow::ResetCamera => {}
        }
    }

    fn press(&mut self, world: &mut World, row: PanelRow) {
        match row {
            PanelRow::ResetSpeed => world.rate.reset_speed(),
            PanelRow::ResetCamera => {
                if !self.in_focus_view() {
                    world.camera.reset();
                    self.orbit.stop();
                }
            }
            PanelRow::Focus => self.select_focus(world, self.focus.cycle(1)),
            PanelRow::ShowOrbits => self.toggles.show_orbits = !self.toggles.show_orbits,
            PanelRow::ShowNames => self.toggles.show_names = !self.toggles.show_names,
            _ => {}
        }
    }

    /// Applies everything except `Quit` and `ToggleHelp`, which belong to the app.
    pub(crate) fn apply(&mut self, world: &mut World, panel: &mut PanelState, action: ControlAction) {
        match action {
            ControlAction::MoveCursor(step) => panel.move_cursor(step),
            ControlAction::Nudge(dir) => self.nudge(world, panel.selected(), dir),
            ControlAction::Activate => self.press(world, panel.selected()),
            ControlAction::Press(row) => {
                panel.select(row);
                self.press(world, row);
            }
            ControlAction::SelectFocus(f) => self.select_focus(world, f),
            ControlAction::Orbit { azimuth, polar } => {
                if !self.in_focus_view() {
                    self.orbit.nudge_orbit(azimuth, polar);
                }
            }
            ControlAction::Dolly(d) => {
                if !self.in_focus_view() {
                    self.orbit.nudge_dolly(d);
                }
            }
            ControlAction::PointerDown => self.pointer_held = true,
            ControlAction::PointerUp => self.pointer_held = false,
            ControlAction::Quit | ControlAction::ToggleHelp => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::PlanetId;
    use crate::camera::DEFAULT_CAMERA_POSITION;
    use crate::scene::test_world;
    use crate::sim::step_frame;

    #[test]
    fn reset_speed_round_trips_from_any_value() {
        let mut world = test_world();
        let mut controls = Controls::default();
        let mut panel = PanelState::default();
        for _ in 0..37 {
            controls.apply(&mut world, &mut panel, ControlAction::Nudge(1));
        }
        panel.select(PanelRow::RevolutionRate);
        for _ in 0..200 {
            controls.apply(&mut world, &mut panel, ControlAction::Nudge(1));
        }
        assert_eq!(world.rate.revolution_rate, 0.1);
        controls.apply(&mut world, &mut panel, ControlAction::Press(PanelRow::ResetSpeed));
        assert_eq!(world.rate.rotation_rate, 0.05);
        assert_eq!(world.rate.revolution_rate, 0.005);
    }

    #[test]
    fn rates_clamp_to_their_ranges() {
        let mut world = test_world();
        let mut controls = Controls::default();
        let mut panel = PanelState::default();
        for _ in 0..20 {
            controls.apply(&mut world, &mut panel, ControlAction::Nudge(-1));
        }
        assert_eq!(world.rate.rotation_rate, 0.0);
    }

    #[test]
    fn camera_edits_are_ignored_during_focus() {
        let mut world = test_world();
        let mut controls = Controls::default();
        let mut panel = PanelState::default();
        panel.select(PanelRow::CameraX);
        controls.apply(&mut world, &mut panel, ControlAction::Nudge(1));
        assert_eq!(world.camera.position.x, DEFAULT_CAMERA_POSITION.x + 5.0);

        controls.apply(&mut world, &mut panel, ControlAction::SelectFocus(FocusSelection::Planet(PlanetId::Mars)));
        let before = world.camera.position;
        controls.apply(&mut world, &mut panel, ControlAction::Nudge(1));
        assert_eq!(world.camera.position, before);
    }

    #[test]
    fn camera_axis_clamps_to_limit() {
        let mut world = test_world();
        let mut controls = Controls::default();
        for _ in 0..200 {
            controls.set_camera_axis(&mut world, PanelRow::CameraZ, 1);
        }
        assert_eq!(world.camera.position.z, CAMERA_LIMIT);
    }

    #[test]
    fn returning_to_default_resets_camera_once() {
        let mut world = test_world();
        let mut controls = Controls::default();
        let mut panel = PanelState::default();
        controls.apply(&mut world, &mut panel, ControlAction::SelectFocus(FocusSelection::Planet(PlanetId::Earth)));
        for _ in 0..30 {
            step_frame(&mut world, &mut controls);
        }
        assert_ne!(world.camera.position, DEFAULT_CAMERA_POSITION);

        controls.apply(&mut world, &mut panel, ControlAction::SelectFocus(FocusSelection::Default));
        assert_eq!(world.camera.position, DEFAULT_CAMERA_POSITION);
        assert_eq!(world.rate.slow_rate_multiplier, 1.0);

        // a later camera edit is not undone by the default state
        panel.select(PanelRow::CameraY);
        controls.apply(&mut world, &mut panel, ControlAction::Nudge(-1));
        step_frame(&mut world, &mut controls);
        assert_eq!(world.camera.position.y, DEFAULT_CAMERA_POSITION.y - 5.0);
    }

    #[test]
    fn pointer_hold_slows_and_release_restores() {
        let mut world = test_world();
        let mut controls = Controls::default();
        let mut panel = PanelState::default();
        controls.apply(&mut world, &mut panel, ControlAction::PointerDown);
        step_frame(&mut world, &mut controls);
        assert_eq!(world.rate.slow_rate_multiplier, 0.2);
        assert!(world.orbits.iter().all(|o| o.visible));
        assert!(world.sun.label.visible);

        controls.apply(&mut world, &mut panel, ControlAction::PointerUp);
        step_frame(&mut world, &mut controls);
        assert_eq!(world.rate.slow_rate_multiplier, 1.0);
        assert!(world.orbits.iter().all(|o| !o.visible));
        assert!(!world.sun.label.visible);
    }

    #[test]
    fn focus_selector_cycles_from_panel() {
        let mut world = test_world();
        let mut controls = Controls::default();
        let mut panel = PanelState::default();
        controls.apply(&mut world, &mut panel, ControlAction::Press(PanelRow::Focus));
        assert_eq!(controls.focus, FocusSelection::Planet(PlanetId::Mercury));
        controls.apply(&mut world, &mut panel, ControlAction::Nudge(-1));
        assert_eq!(controls.focus, FocusSelection::Default);
    }
}
