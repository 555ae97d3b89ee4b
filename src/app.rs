use crate::assets::{AssetLoader, TextureStore};
use crate::config::Settings;
use crate::controls::{ControlAction, Controls};
use crate::hud::{draw_help, draw_labels, draw_panel, HudStatus};
use crate::input::{collect_input_nonblocking, InputMapper};
use crate::panel::{panel_rect, PanelState, Rect};
use crate::raster::{render_world, sky_color};
use crate::render::{canvas_to_cells, Canvas, Terminal};
use crate::scene::{assemble_world, SceneParams, World};
use crate::sim::step_frame;
use crossterm::style::Color;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    world: World,
    controls: Controls,
    panel: PanelState,
    mapper: InputMapper,
    loader: AssetLoader,
    store: TextureStore,
    assets_ready: bool,
    canvas: Canvas,
    term: Terminal,
    show_help: bool,
    should_quit: bool,
}

/// Scene area left of the panel, in cells.
fn scene_cols(cols: u16, rows: u16) -> u16 {
    panel_rect(cols, rows).x
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let canvas = Canvas::new(scene_cols(term.cols, term.rows) as u32 * 2, term.rows as u32 * 4);

        let world = assemble_world(&SceneParams {
            star_count: settings.star_count,
            seed: settings.seed,
            viewport_w: canvas.w,
            viewport_h: canvas.h,
        });
        let loader = AssetLoader::spawn(settings.texture_dir.clone());

        Ok(Self {
            settings,
            world,
            controls: Controls::default(),
            panel: PanelState::default(),
            mapper: InputMapper::default(),
            loader,
            store: TextureStore::default(),
            assets_ready: false,
            canvas,
            term,
            show_help: false,
            should_quit: false,
        })
    }

    fn on_resize(&mut self) {
        let (cols, rows) = (self.term.cols, self.term.rows);
        self.canvas = Canvas::new(scene_cols(cols, rows) as u32 * 2, rows as u32 * 4);
        self.world.camera.set_viewport(self.canvas.w, self.canvas.h);
        log::info!("resized to {cols}x{rows} cells, canvas {}x{}", self.canvas.w, self.canvas.h);
    }

    fn handle_action(&mut self, action: ControlAction) {
        match action {
            ControlAction::Quit => self.should_quit = true,
            ControlAction::ToggleHelp => self.show_help = !self.show_help,
            _ => self.controls.apply(&mut self.world, &mut self.panel, action),
        }
    }

    fn poll_assets(&mut self) {
        let ready = &mut self.assets_ready;
        self.loader.poll(
            &mut self.store,
            |loaded, total| log::info!("assets {loaded}/{total}"),
            || {
                *ready = true;
                log::info!("all assets loaded");
            },
        );
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(5, 120);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        log::info!("frame loop at {fps} fps");

        while !self.should_quit {
            let frame_start = Instant::now();
            if self.term.resize_if_needed()? {
                self.on_resize();
            }

            let panel = panel_rect(self.term.cols, self.term.rows);
            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = self.mapper.map(&ev, panel) {
                    self.handle_action(action);
                }
                if self.should_quit {
                    break;
                }
            }

            self.poll_assets();
            step_frame(&mut self.world, &mut self.controls);
            self.render_frame(panel)?;

            spin_sleep(frame_dt, frame_start);
        }
        Ok(())
    }

    fn render_frame(&mut self, panel: Rect) -> anyhow::Result<()> {
        let enable_color = self.settings.enable_color;
        let (cols, rows) = (self.term.cols, self.term.rows);
        self.term.cur.clear(Color::Black);

        let view = render_world(&self.world, &self.store, &mut self.canvas);
        let store = &self.store;
        canvas_to_cells(&self.canvas, &mut self.term.cur, panel.x, enable_color, |cx, cy| {
            sky_color(&view, store, cx, cy)
        });
        draw_labels(&mut self.term.cur, &view, &self.world, panel.x, enable_color);

        let (assets_loaded, assets_total) = self.loader.progress();
        let status = HudStatus { assets_loaded, assets_total, assets_ready: self.assets_ready };
        draw_panel(&mut self.term.cur, panel, &self.world, &self.controls, &self.panel, &status, enable_color);

        if self.show_help {
            draw_help(&mut self.term.cur, cols, rows, enable_color);
        }

        self.term.present()
    }
}

/// Runs until the user quits. The terminal is restored even when the loop fails.
pub(crate) fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    let result = app.run();
    let restored = app.term.end();
    if let Err(e) = &result {
        log::error!("frame loop failed: {e:#}");
    }
    result?;
    restored
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
