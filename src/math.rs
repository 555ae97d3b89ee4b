use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub(crate) struct Vec3 {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) z: f32,
}

impl Vec3 {
    pub(crate) const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub(crate) const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub(crate) const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
    pub(crate) fn add(self, o: Vec3) -> Vec3 {
        Vec3 { x: self.x + o.x, y: self.y + o.y, z: self.z + o.z }
    }
    pub(crate) fn sub(self, o: Vec3) -> Vec3 {
        Vec3 { x: self.x - o.x, y: self.y - o.y, z: self.z - o.z }
    }
    pub(crate) fn scale(self, s: f32) -> Vec3 {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }
    pub(crate) fn dot(self, o: Vec3) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }
    pub(crate) fn cross(self, o: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * o.z - self.z * o.y,
            y: self.z * o.x - self.x * o.z,
            z: self.x * o.y - self.y * o.x,
        }
    }
    pub(crate) fn len(self) -> f32 {
        self.dot(self).sqrt()
    }
    pub(crate) fn normalize(self) -> Vec3 {
        let l = self.len().max(1e-6);
        self.scale(1.0 / l)
    }
    pub(crate) fn lerp(self, o: Vec3, t: f32) -> Vec3 {
        self.add(o.sub(self).scale(t))
    }

    /// Rotation about the world +Y axis, right-handed.
    pub(crate) fn rot_y(self, ang: f32) -> Vec3 {
        let (s, c) = ang.sin_cos();
        Vec3 { x: c * self.x + s * self.z, y: self.y, z: -s * self.x + c * self.z }
    }

    /// Rodrigues rotation about a unit `axis`.
    pub(crate) fn rot_axis(self, axis: Vec3, ang: f32) -> Vec3 {
        let (s, c) = ang.sin_cos();
        let k = axis;
        self.scale(c)
            .add(k.cross(self).scale(s))
            .add(k.scale(k.dot(self) * (1.0 - c)))
    }
}

pub(crate) fn clamp01(x: f32) -> f32 {
    x.max(0.0).min(1.0)
}
pub(crate) fn clamp(x: f32, a: f32, b: f32) -> f32 {
    x.max(a).min(b)
}
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
pub(crate) fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let aa = a as f32;
    let bb = b as f32;
    clamp(aa + (bb - aa) * t, 0.0, 255.0).round() as u8
}
pub(crate) fn deg(x: f32) -> f32 {
    x * PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.sub(b).len() < 1e-5
    }

    #[test]
    fn rot_y_quarter_turn_moves_x_to_minus_z() {
        let v = Vec3::new(1.0, 0.0, 0.0).rot_y(PI / 2.0);
        assert!(close(v, Vec3::new(0.0, 0.0, -1.0)), "{v:?}");
    }

    #[test]
    fn rot_axis_matches_rot_y_for_vertical_axis() {
        let v = Vec3::new(3.0, 1.0, -2.0);
        for ang in [0.1_f32, 1.0, 2.5, -0.7] {
            assert!(close(v.rot_axis(Vec3::Y, ang), v.rot_y(ang)));
        }
    }

    #[test]
    fn rot_axis_keeps_axis_fixed_and_length() {
        let axis = Vec3::new(deg(23.44).sin(), deg(23.44).cos(), 0.0);
        assert!(close(axis.rot_axis(axis, 1.3), axis));
        let v = Vec3::new(0.3, -4.0, 2.0);
        assert!((v.rot_axis(axis, 0.8).len() - v.len()).abs() < 1e-4);
    }
}
