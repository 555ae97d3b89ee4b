//! Rasterizes the world into the braille canvas.
//!
//! Spheres and rings are ray-cast per sub-pixel inside their projected bounds.
//! Opaque surfaces go first, then the translucent ones (atmosphere, rings)
//! far to near so they blend over whatever is already in front of them.

use crate::assets::TextureStore;
use crate::body::{Body, Ring, Shading};
use crate::camera::{Basis, Camera, Projected};
use crate::math::{clamp, clamp01, lerp, Vec3};
use crate::render::{mix_rgb, scale_rgb, Canvas, Rgb};
use crate::scene::{Sun, World};
use std::f32::consts::{PI, TAU};

const AMBIENT: f32 = 0.12;
/// Canvas area at which the whole star field is drawn.
const STAR_REFERENCE_PIXELS: f32 = 1920.0 * 1080.0;
const ORBIT_TINT: Rgb = Rgb { r: 70, g: 80, b: 110 };
const SUN_GLOW: Rgb = Rgb { r: 255, g: 150, b: 40 };
const SUN_CORE: Rgb = Rgb { r: 255, g: 225, b: 130 };
const SKY_DIM: f32 = 0.35;
const Z_AXIS: Vec3 = Vec3::new(0.0, 0.0, 1.0);

// -------------------- Noise (fallback surfaces) --------------------
fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn hash3(ix: i32, iy: i32, iz: i32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    h ^= (ix as u32).wrapping_mul(0x85eb_ca6b);
    h = hash_u32(h);
    h ^= (iy as u32).wrapping_mul(0xc2b2_ae35);
    h = hash_u32(h);
    h ^= (iz as u32).wrapping_mul(0x27d4_eb2f);
    hash_u32(h)
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn value_noise_3d(p: Vec3, seed: u32) -> f32 {
    let (ix, iy, iz) = (p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32);
    let sx = smoothstep(p.x - ix as f32);
    let sy = smoothstep(p.y - iy as f32);
    let sz = smoothstep(p.z - iz as f32);

    let v = |dx: i32, dy: i32, dz: i32| hash3(ix + dx, iy + dy, iz + dz, seed) as f32 / u32::MAX as f32;

    let x00 = lerp(v(0, 0, 0), v(1, 0, 0), sx);
    let x10 = lerp(v(0, 1, 0), v(1, 1, 0), sx);
    let x01 = lerp(v(0, 0, 1), v(1, 0, 1), sx);
    let x11 = lerp(v(0, 1, 1), v(1, 1, 1), sx);
    lerp(lerp(x00, x10, sy), lerp(x01, x11, sy), sz)
}

fn fbm_3d(p: Vec3, seed: u32, octaves: usize) -> f32 {
    let mut amp = 0.55;
    let mut freq = 1.0;
    let mut sum = 0.0;
    let mut norm = 0.0;
    for o in 0..octaves {
        let s = seed.wrapping_add((o as u32).wrapping_mul(0x9e37_79b9));
        sum += (value_noise_3d(p.scale(freq), s) * 2.0 - 1.0) * amp;
        norm += amp;
        amp *= 0.52;
        freq *= 2.03;
    }
    clamp01(0.5 + 0.5 * (sum / norm))
}

// -------------------- View --------------------
/// Camera snapshot sized to the canvas, shared by the scene, sky and labels.
pub(crate) struct View {
    cam: Camera,
    basis: Basis,
    focal: f32,
}

impl View {
    pub(crate) fn new(camera: &Camera, w: u32, h: u32) -> Self {
        let mut cam = *camera;
        cam.set_viewport(w, h);
        Self { basis: cam.basis(), focal: cam.focal(), cam }
    }

    pub(crate) fn project(&self, p: Vec3) -> Option<Projected> {
        self.cam.project_with(&self.basis, self.focal, p)
    }

    /// Unit ray through canvas position (px, py).
    pub(crate) fn ray(&self, px: f32, py: f32) -> Vec3 {
        let sx = px - self.cam.viewport_w as f32 * 0.5;
        let sy = self.cam.viewport_h as f32 * 0.5 - py;
        self.basis
            .forward
            .scale(self.focal)
            .add(self.basis.right.scale(sx))
            .add(self.basis.up.scale(sy))
            .normalize()
    }

    fn eye(&self) -> Vec3 {
        self.cam.position
    }

    /// Same depth measure as `project`, for a hit at distance `t` along `dir`.
    fn depth(&self, dir: Vec3, t: f32) -> f32 {
        t * dir.dot(self.basis.forward)
    }
}

fn screen_bounds(view: &View, canvas: &Canvas, center: Vec3, extent: f32) -> Option<(i32, i32, i32, i32)> {
    let p = view.project(center)?;
    let r = extent * p.scale * 1.5 + 2.0;
    let x0 = ((p.x - r).floor() as i32).max(0);
    let x1 = ((p.x + r).ceil() as i32).min(canvas.w as i32 - 1);
    let y0 = ((p.y - r).floor() as i32).max(0);
    let y1 = ((p.y + r).ceil() as i32).min(canvas.h as i32 - 1);
    (x0 <= x1 && y0 <= y1).then_some((x0, x1, y0, y1))
}

fn hit_sphere(eye: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = eye.sub(center);
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let t = if -b - s > 0.0 { -b - s } else { -b + s };
    (t > 0.0).then_some(t)
}

/// Calls `paint(canvas, x, y, depth, normal, hit)` for every sub-pixel the sphere covers.
fn raster_sphere(
    canvas: &mut Canvas,
    view: &View,
    center: Vec3,
    radius: f32,
    mut paint: impl FnMut(&mut Canvas, i32, i32, f32, Vec3, Vec3),
) {
    let Some((x0, x1, y0, y1)) = screen_bounds(view, canvas, center, radius) else { return };
    let eye = view.eye();
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dir = view.ray(px as f32 + 0.5, py as f32 + 0.5);
            let Some(t) = hit_sphere(eye, dir, center, radius) else { continue };
            let hit = eye.add(dir.scale(t));
            let n = hit.sub(center).scale(1.0 / radius);
            paint(canvas, px, py, view.depth(dir, t), n, hit);
        }
    }
}

/// Equirectangular (u, v) of a unit direction about pole `up` (`up.z` must be 0).
pub(crate) fn equirect(local: Vec3, up: Vec3) -> (f32, f32) {
    let east = up.cross(Z_AXIS);
    let lat = clamp(local.dot(up), -1.0, 1.0).asin();
    let lon = local.dot(Z_AXIS).atan2(local.dot(east));
    (0.5 + lon / TAU, 0.5 - lat / PI)
}

fn light_factor(shading: Shading, normal: Vec3, hit: Vec3) -> f32 {
    match shading {
        Shading::Unlit => 1.0,
        Shading::Lit => {
            let to_sun = Vec3::ZERO.sub(hit).normalize();
            AMBIENT + (1.0 - AMBIENT) * normal.dot(to_sun).max(0.0)
        }
    }
}

fn surface_color(body: &Body, store: &TextureStore, local: Vec3) -> Rgb {
    let up = body.mesh.tilt_axis;
    if let Some(tex) = store.get(body.mesh.texture) {
        let (u, v) = equirect(local, up);
        return tex.sample_rgb(u, v);
    }
    // gas giants get latitude bands
    let band = if body.planet.spec().radius_ratio > 1.5 { 5.0 } else { 1.0 };
    let east = up.cross(Z_AXIS);
    let p = Vec3::new(local.dot(east), local.dot(up) * band, local.dot(Z_AXIS)).scale(2.5);
    let n = fbm_3d(p, body.planet.index() as u32 + 1, 4);
    scale_rgb(body.mesh.color, 0.7 + 0.6 * n)
}

fn sun_color(sun: &Sun, store: &TextureStore, local: Vec3) -> Rgb {
    if let Some(tex) = store.get(sun.texture) {
        let (u, v) = equirect(local, Vec3::Y);
        return tex.sample_rgb(u, v);
    }
    mix_rgb(SUN_GLOW, SUN_CORE, fbm_3d(local.scale(3.0), 11, 4))
}

fn plane_basis(axis: Vec3) -> (Vec3, Vec3) {
    let reference = if axis.y.abs() < 0.9 { Vec3::Y } else { Vec3::new(1.0, 0.0, 0.0) };
    let e1 = axis.cross(reference).normalize();
    (e1, axis.cross(e1))
}

/// Ray/ring intersection: distance along `dir`, colour and coverage.
fn ring_sample(eye: Vec3, dir: Vec3, body: &Body, ring: &Ring, store: &TextureStore) -> Option<(f32, Rgb, f32)> {
    let axis = body.world_axis();
    let center = body.world_center();
    let denom = dir.dot(axis);
    if denom.abs() < 1e-5 {
        return None;
    }
    let t = center.sub(eye).dot(axis) / denom;
    if t <= 0.0 {
        return None;
    }
    let hit = eye.add(dir.scale(t));
    let rel = hit.sub(center);
    let r = rel.len();
    if r < ring.inner || r > ring.outer {
        return None;
    }
    let u = (r - ring.inner) / (ring.outer - ring.inner);

    let (rgb, alpha) = match store.get(ring.texture) {
        // ring textures are radial strips, so spin leaves them unchanged
        Some(tex) => {
            let [r, g, b, a] = tex.sample(u, 0.5);
            (Rgb { r, g, b }, a as f32 / 255.0)
        }
        None => {
            let (e1, e2) = plane_basis(axis);
            let ang = rel.dot(e2).atan2(rel.dot(e1)) - ring.spin;
            let n = fbm_3d(Vec3::new(u * 14.0, ang.cos() * 1.5, ang.sin() * 1.5), 97, 3);
            (scale_rgb(ring.color, 0.55 + 0.6 * n), 0.5 + 0.5 * n)
        }
    };
    let lit = match body.mesh.shading {
        Shading::Unlit => rgb,
        Shading::Lit => {
            let to_sun = Vec3::ZERO.sub(hit).normalize();
            scale_rgb(rgb, AMBIENT + (1.0 - AMBIENT) * axis.dot(to_sun).abs())
        }
    };
    Some((t, lit, alpha))
}

fn draw_ring(canvas: &mut Canvas, view: &View, store: &TextureStore, body: &Body, ring: &Ring) {
    let Some((x0, x1, y0, y1)) = screen_bounds(view, canvas, body.world_center(), ring.outer) else { return };
    let eye = view.eye();
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dir = view.ray(px as f32 + 0.5, py as f32 + 0.5);
            let Some((t, rgb, alpha)) = ring_sample(eye, dir, body, ring, store) else { continue };
            let depth = view.depth(dir, t);
            if alpha > 0.95 {
                canvas.plot(px, py, depth, rgb);
            } else if alpha > 0.05 {
                canvas.blend(px, py, depth, rgb, alpha);
            }
        }
    }
}

fn draw_stars(canvas: &mut Canvas, view: &View, world: &World) {
    let keep = clamp01((canvas.w * canvas.h) as f32 / STAR_REFERENCE_PIXELS);
    let threshold = (keep as f64 * u32::MAX as f64) as u32;
    for (i, p) in world.stars.points.iter().enumerate() {
        let h = hash_u32(i as u32);
        if h > threshold {
            continue;
        }
        let Some(s) = view.project(*p) else { continue };
        let b = 90 + (h % 140) as u8;
        canvas.plot(s.x.floor() as i32, s.y.floor() as i32, s.depth, Rgb { r: b, g: b, b: b.saturating_add(20) });
    }
}

fn draw_orbits(canvas: &mut Canvas, view: &View, world: &World) {
    for orbit in world.orbits.iter().filter(|o| o.visible) {
        let rgb = mix_rgb(ORBIT_TINT, orbit.planet.spec().color, 0.3);
        for p in &orbit.points {
            if let Some(s) = view.project(*p) {
                canvas.plot(s.x.floor() as i32, s.y.floor() as i32, s.depth, rgb);
            }
        }
    }
}

fn draw_sun(canvas: &mut Canvas, view: &View, store: &TextureStore, sun: &Sun) {
    raster_sphere(canvas, view, Vec3::ZERO, sun.radius, |c, x, y, depth, n, _| {
        c.plot(x, y, depth, sun_color(sun, store, n.rot_y(-sun.spin)));
    });
}

fn draw_atmosphere(canvas: &mut Canvas, view: &View, store: &TextureStore, sun: &Sun) {
    let shell = &sun.atmosphere;
    raster_sphere(canvas, view, Vec3::ZERO, shell.radius, |c, x, y, depth, n, _| {
        let rgb = mix_rgb(sun_color(sun, store, n.rot_y(-shell.spin)), SUN_GLOW, 0.5);
        c.blend(x, y, depth, rgb, shell.opacity);
    });
}

fn draw_body(canvas: &mut Canvas, view: &View, store: &TextureStore, body: &Body) {
    raster_sphere(canvas, view, body.world_center(), body.mesh.radius, |c, x, y, depth, n, hit| {
        let base = surface_color(body, store, body.to_local_dir(n));
        c.plot(x, y, depth, scale_rgb(base, light_factor(body.mesh.shading, n, hit)));
    });
}

/// Draws the whole scene and returns the view used, for labels and the sky.
pub(crate) fn render_world(world: &World, store: &TextureStore, canvas: &mut Canvas) -> View {
    canvas.clear();
    let view = View::new(&world.camera, canvas.w, canvas.h);

    draw_stars(canvas, &view, world);
    draw_orbits(canvas, &view, world);
    draw_sun(canvas, &view, store, &world.sun);
    for body in world.bodies().filter(|b| b.mesh.visible) {
        draw_body(canvas, &view, store, body);
    }

    draw_atmosphere(canvas, &view, store, &world.sun);
    let eye = view.eye();
    let mut ringed: Vec<&Body> = world.bodies().filter(|b| b.mesh.visible && b.ring.is_some()).collect();
    ringed.sort_by(|a, b| {
        let da = a.world_center().sub(eye).len();
        let db = b.world_center().sub(eye).len();
        db.total_cmp(&da)
    });
    for body in ringed {
        if let Some(ring) = &body.ring {
            draw_ring(canvas, &view, store, body, ring);
        }
    }
    view
}

/// Background colour behind terminal cell (cx, cy); black without a sky box.
pub(crate) fn sky_color(view: &View, store: &TextureStore, cx: u16, cy: u16) -> Rgb {
    if !store.has_sky() {
        return Rgb::BLACK;
    }
    let dir = view.ray(cx as f32 * 2.0 + 1.0, cy as f32 * 4.0 + 2.0);
    store.sample_sky(dir).map_or(Rgb::BLACK, |c| scale_rgb(c, SKY_DIM))
}
