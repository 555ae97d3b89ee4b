//! Texture loading on a background thread with counted progress.
//!
//! The frame loop never waits on assets: it drains whatever has arrived and
//! renders the rest with fallback colours. A failed load is logged and never
//! counts towards completion.

use crate::body::PLANETS;
use crate::math::Vec3;
use crate::render::Rgb;
use crate::scene::SUN_TEXTURE;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

const MAX_TEXTURE_SIDE: u32 = 512;

/// Cube-map faces in +x, -x, +y, -y, +z, -z order.
pub(crate) const SKY_FACES: [&str; 6] = [
    "skybox/px.jpg",
    "skybox/nx.jpg",
    "skybox/py.jpg",
    "skybox/ny.jpg",
    "skybox/pz.jpg",
    "skybox/nz.jpg",
];

#[derive(Clone, Debug)]
pub(crate) struct Texture {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) pixels: Vec<[u8; 4]>,
}

impl Texture {
    /// Nearest-neighbour lookup; `u` wraps, `v` clamps.
    pub(crate) fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let u = u.rem_euclid(1.0);
        let v = v.clamp(0.0, 1.0);
        let x = ((u * self.w as f32) as u32).min(self.w - 1);
        let y = ((v * self.h as f32) as u32).min(self.h - 1);
        self.pixels[(y * self.w + x) as usize]
    }

    pub(crate) fn sample_rgb(&self, u: f32, v: f32) -> Rgb {
        let [r, g, b, _] = self.sample(u, v);
        Rgb { r, g, b }
    }
}

pub(crate) fn load_texture(path: &Path) -> Result<Texture> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    let img = if img.width() > MAX_TEXTURE_SIDE || img.height() > MAX_TEXTURE_SIDE {
        img.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        anyhow::bail!("{} is empty", path.display());
    }
    let pixels = rgba.pixels().map(|p| p.0).collect();
    Ok(Texture { w, h, pixels })
}

/// Everything the renderer may sample. Missing entries fall back to flat colours.
#[derive(Default)]
pub(crate) struct TextureStore {
    textures: HashMap<String, Texture>,
    sky: [Option<Texture>; 6],
}

impl TextureStore {
    pub(crate) fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub(crate) fn insert(&mut self, name: &str, tex: Texture) {
        if let Some(i) = SKY_FACES.iter().position(|f| *f == name) {
            self.sky[i] = Some(tex);
        } else {
            self.textures.insert(name.to_string(), tex);
        }
    }

    pub(crate) fn has_sky(&self) -> bool {
        self.sky.iter().any(Option::is_some)
    }

    /// Cube-map lookup along a world direction.
    pub(crate) fn sample_sky(&self, dir: Vec3) -> Option<Rgb> {
        let (ax, ay, az) = (dir.x.abs(), dir.y.abs(), dir.z.abs());
        let (face, u, v) = if ax >= ay && ax >= az {
            if dir.x > 0.0 {
                (0, -dir.z / ax, -dir.y / ax)
            } else {
                (1, dir.z / ax, -dir.y / ax)
            }
        } else if ay >= az {
            if dir.y > 0.0 {
                (2, dir.x / ay, dir.z / ay)
            } else {
                (3, dir.x / ay, -dir.z / ay)
            }
        } else if dir.z > 0.0 {
            (4, dir.x / az, -dir.y / az)
        } else {
            (5, -dir.x / az, -dir.y / az)
        };
        let tex = self.sky[face].as_ref()?;
        let [r, g, b, _] = tex.sample((u + 1.0) * 0.5, (v + 1.0) * 0.5);
        Some(Rgb { r, g, b })
    }
}

/// Every asset file name the scene can use.
pub(crate) fn manifest() -> Vec<&'static str> {
    let mut names = vec![SUN_TEXTURE];
    for p in PLANETS.iter() {
        names.push(p.texture);
        if let Some(r) = p.ring {
            names.push(r.texture);
        }
    }
    names.extend(SKY_FACES);
    names
}

struct Loaded {
    name: &'static str,
    texture: Texture,
}

pub(crate) struct AssetLoader {
    rx: Receiver<Loaded>,
    loaded: usize,
    total: usize,
    completed: bool,
}

impl AssetLoader {
    pub(crate) fn spawn(dir: PathBuf) -> Self {
        let names = manifest();
        let total = names.len();
        let (tx, rx) = mpsc::channel();
        log::info!("loading {} assets from {}", total, dir.display());

        thread::spawn(move || {
            for name in names {
                match load_texture(&dir.join(name)) {
                    Ok(texture) => {
                        if tx.send(Loaded { name, texture }).is_err() {
                            return;
                        }
                    }
                    Err(e) => log::warn!("asset {name} unavailable: {e:#}"),
                }
            }
        });

        Self { rx, loaded: 0, total, completed: false }
    }

    pub(crate) fn progress(&self) -> (usize, usize) {
        (self.loaded, self.total)
    }

    /// Moves arrived textures into `store` without blocking.
    pub(crate) fn poll(
        &mut self,
        store: &mut TextureStore,
        mut on_progress: impl FnMut(usize, usize),
        on_complete: impl FnOnce(),
    ) {
        loop {
            match self.rx.try_recv() {
                Ok(Loaded { name, texture }) => {
                    store.insert(name, texture);
                    self.loaded += 1;
                    on_progress(self.loaded, self.total);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if !self.completed && self.loaded == self.total {
            self.completed = true;
            on_complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("solarscope-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn loads_and_samples_a_png() {
        let dir = temp_dir("png");
        let path = dir.join("stripe.png");
        let img = image::RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 { image::Rgba([255, 0, 0, 255]) } else { image::Rgba([0, 0, 255, 128]) }
        });
        img.save(&path).expect("write png");

        let tex = load_texture(&path).expect("load");
        assert_eq!((tex.w, tex.h), (4, 2));
        assert_eq!(tex.sample(0.1, 0.5), [255, 0, 0, 255]);
        assert_eq!(tex.sample(0.9, 0.5), [0, 0, 255, 128]);
        // u wraps
        assert_eq!(tex.sample(1.1, 0.5), [255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_is_an_error_not_a_panic() {
        let err = load_texture(Path::new("/nonexistent/solarscope/earth.jpg")).unwrap_err();
        assert!(format!("{err:#}").contains("earth.jpg"));
    }

    #[test]
    fn manifest_covers_every_body_and_sky_face() {
        let m = manifest();
        assert!(m.contains(&"sun.jpg"));
        assert!(m.contains(&"saturn_ring.png"));
        assert!(m.contains(&"uranus_ring.png"));
        assert_eq!(m.len(), 1 + 8 + 2 + 6);
    }

    #[test]
    fn missing_directory_never_completes() {
        let mut loader = AssetLoader::spawn(PathBuf::from("/nonexistent/solarscope"));
        let mut store = TextureStore::default();
        let mut completed = false;
        let deadline = Instant::now() + Duration::from_millis(200);
        while Instant::now() < deadline {
            loader.poll(&mut store, |_, _| {}, || completed = true);
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!completed);
        assert_eq!(loader.progress(), (0, manifest().len()));
        assert!(store.get("earth.jpg").is_none());
        assert!(!store.has_sky());
    }

    #[test]
    fn sky_faces_are_routed_to_the_cube_map() {
        let mut store = TextureStore::default();
        let tex = Texture { w: 1, h: 1, pixels: vec![[10, 20, 30, 255]] };
        store.insert("skybox/px.jpg", tex);
        assert!(store.has_sky());
        assert_eq!(store.sample_sky(Vec3::new(1.0, 0.1, 0.1)), Some(Rgb { r: 10, g: 20, b: 30 }));
        assert_eq!(store.sample_sky(Vec3::new(-1.0, 0.0, 0.0)), None);
    }
}
