use crate::math::{clamp, deg, Vec3};

pub(crate) const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 120.0, 260.0);
pub(crate) const CAMERA_LIMIT: f32 = 300.0;
/// Per-frame blend toward the focus pose.
pub(crate) const GLIDE_FACTOR: f32 = 0.01;

const NEAR: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Camera {
    pub(crate) position: Vec3,
    pub(crate) target: Vec3,
    pub(crate) fov_y: f32,
    pub(crate) aspect: f32,
    pub(crate) viewport_w: u32,
    pub(crate) viewport_h: u32,
}

/// Screen-space result of a projection, in canvas pixels.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projected {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) depth: f32,
    /// Pixels per world unit at this depth.
    pub(crate) scale: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Basis {
    pub(crate) right: Vec3,
    pub(crate) up: Vec3,
    pub(crate) forward: Vec3,
}

impl Camera {
    pub(crate) fn new(viewport_w: u32, viewport_h: u32) -> Self {
        let mut cam = Self {
            position: DEFAULT_CAMERA_POSITION,
            target: Vec3::ZERO,
            fov_y: deg(50.0),
            aspect: 1.0,
            viewport_w: 1,
            viewport_h: 1,
        };
        cam.set_viewport(viewport_w, viewport_h);
        cam
    }

    pub(crate) fn set_viewport(&mut self, w: u32, h: u32) {
        self.viewport_w = w.max(1);
        self.viewport_h = h.max(1);
        self.aspect = self.viewport_w as f32 / self.viewport_h as f32;
    }

    pub(crate) fn reset(&mut self) {
        self.position = DEFAULT_CAMERA_POSITION;
        self.target = Vec3::ZERO;
    }

    pub(crate) fn basis(&self) -> Basis {
        let forward = self.target.sub(self.position).normalize();
        let world_up = if forward.y.abs() > 0.999 { Vec3::new(0.0, 0.0, -1.0) } else { Vec3::Y };
        let right = forward.cross(world_up).normalize();
        let up = right.cross(forward);
        Basis { right, up, forward }
    }

    pub(crate) fn focal(&self) -> f32 {
        (self.viewport_h as f32 * 0.5) / (self.fov_y * 0.5).tan()
    }

    pub(crate) fn project_with(&self, basis: &Basis, focal: f32, p: Vec3) -> Option<Projected> {
        let d = p.sub(self.position);
        let z = d.dot(basis.forward);
        if z < NEAR {
            return None;
        }
        let scale = focal / z;
        Some(Projected {
            x: self.viewport_w as f32 * 0.5 + d.dot(basis.right) * scale,
            y: self.viewport_h as f32 * 0.5 - d.dot(basis.up) * scale,
            depth: z,
            scale,
        })
    }

    pub(crate) fn project(&self, p: Vec3) -> Option<Projected> {
        self.project_with(&self.basis(), self.focal(), p)
    }

    /// Exponential-decay step toward `goal`; never lands exactly.
    pub(crate) fn glide_toward(&mut self, goal: Vec3, factor: f32) {
        self.position = self.position.lerp(goal, factor);
    }
}

/// Damped orbit/dolly around the camera target.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OrbitControls {
    pub(crate) azimuth_vel: f32,
    pub(crate) polar_vel: f32,
    pub(crate) dolly_vel: f32,
    pub(crate) damping: f32,
    pub(crate) min_distance: f32,
    pub(crate) max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            azimuth_vel: 0.0,
            polar_vel: 0.0,
            dolly_vel: 0.0,
            damping: 0.05,
            min_distance: 15.0,
            max_distance: 500.0,
        }
    }
}

impl OrbitControls {
    pub(crate) fn nudge_orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth_vel += d_azimuth;
        self.polar_vel += d_polar;
    }

    pub(crate) fn nudge_dolly(&mut self, d: f32) {
        self.dolly_vel += d;
    }

    pub(crate) fn stop(&mut self) {
        self.azimuth_vel = 0.0;
        self.polar_vel = 0.0;
        self.dolly_vel = 0.0;
    }

    pub(crate) fn is_moving(&self) -> bool {
        self.azimuth_vel.abs() > 1e-6 || self.polar_vel.abs() > 1e-6 || self.dolly_vel.abs() > 1e-6
    }

    pub(crate) fn update(&mut self, cam: &mut Camera) {
        if !self.is_moving() {
            self.stop();
            return;
        }
        let offset = cam.position.sub(cam.target);
        let r = offset.len().max(1e-3);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = clamp(offset.y / r, -1.0, 1.0).acos();

        theta += self.azimuth_vel;
        phi = clamp(phi + self.polar_vel, 0.05, std::f32::consts::PI - 0.05);
        let r = clamp(r * (1.0 + self.dolly_vel), self.min_distance, self.max_distance);

        let (sp, cp) = phi.sin_cos();
        let (st, ct) = theta.sin_cos();
        let next = cam.target.add(Vec3::new(r * sp * st, r * cp, r * sp * ct));
        cam.position = Vec3::new(
            clamp(next.x, -CAMERA_LIMIT, CAMERA_LIMIT),
            clamp(next.y, -CAMERA_LIMIT, CAMERA_LIMIT),
            clamp(next.z, -CAMERA_LIMIT, CAMERA_LIMIT),
        );

        let keep = 1.0 - self.damping;
        self.azimuth_vel *= keep;
        self.polar_vel *= keep;
        self.dolly_vel *= keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_viewport_center() {
        let cam = Camera::new(200, 100);
        let p = cam.project(cam.target).expect("target in front");
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let cam = Camera::new(200, 100);
        let behind = cam.position.add(cam.position.sub(cam.target));
        assert!(cam.project(behind).is_none());
    }

    #[test]
    fn resize_only_touches_aspect_and_viewport() {
        let mut cam = Camera::new(200, 100);
        let before = cam.position;
        cam.set_viewport(80, 160);
        assert_eq!(cam.aspect, 0.5);
        assert_eq!(cam.position, before);
    }

    #[test]
    fn glide_approaches_but_never_arrives() {
        let mut cam = Camera::new(10, 10);
        let goal = Vec3::new(78.0, 2.0, 7.0);
        let mut last = cam.position.sub(goal).len();
        for _ in 0..500 {
            cam.glide_toward(goal, GLIDE_FACTOR);
            let d = cam.position.sub(goal).len();
            assert!(d < last);
            last = d;
        }
        assert!(last > 0.0);
    }

    #[test]
    fn orbit_controls_damp_to_rest() {
        let mut cam = Camera::new(10, 10);
        let mut ctl = OrbitControls::default();
        ctl.nudge_orbit(0.05, 0.0);
        let r0 = cam.position.sub(cam.target).len();
        for _ in 0..400 {
            ctl.update(&mut cam);
        }
        assert!(ctl.azimuth_vel.abs() < 1e-6);
        let r1 = cam.position.sub(cam.target).len();
        assert!((r0 - r1).abs() < 1e-2);
    }
}
