use crate::controls::Controls;
use crate::math::Vec3;
use crate::panel::{PanelLine, PanelRow, PanelState, Rect, LAYOUT};
use crate::raster::View;
use crate::render::{CellBuffer, Rgb};
use crate::scene::World;
use crossterm::style::Color;

const PANEL_BG: Rgb = Rgb { r: 12, g: 14, b: 24 };
const PANEL_FG: Rgb = Rgb { r: 190, g: 195, b: 210 };
const HEADER_FG: Rgb = Rgb { r: 120, g: 170, b: 255 };
const SELECTED_BG: Rgb = Rgb { r: 40, g: 55, b: 95 };
const DISABLED_FG: Rgb = Rgb { r: 90, g: 95, b: 110 };
const LABEL_FG: Rgb = Rgb { r: 235, g: 235, b: 210 };
/// Labels sit this many radii above the body centre.
const LABEL_LIFT: f32 = 1.3;

const HELP_LINES: [&str; 12] = [
    "Up/Down, Tab     move panel cursor",
    "Left/Right       adjust selected row",
    "Enter, Space     activate selected row",
    "0-8              focus default, mercury..neptune",
    "W A S D          orbit camera",
    "Z X, wheel       dolly camera",
    "hold left mouse  slow time, show orbits and names",
    "o / n            toggle orbits / names",
    "r / c            reset speed / camera",
    "",
    "h close help",
    "q, Esc quit",
];

/// What the status block shows besides the world itself.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HudStatus {
    pub(crate) assets_loaded: usize,
    pub(crate) assets_total: usize,
    pub(crate) assets_ready: bool,
}

#[derive(Clone, Copy)]
struct Ink {
    enable_color: bool,
}

impl Ink {
    fn fg(self, c: Rgb) -> Color {
        if self.enable_color { c.to_color() } else { Color::Reset }
    }
    fn bg(self, c: Rgb) -> Color {
        if self.enable_color { c.to_color() } else { Color::Black }
    }
}

fn fit(s: &str, w: usize) -> String {
    s.chars().take(w).collect()
}

/// Writes every visible label over the scene area (`cols` wide).
pub(crate) fn draw_labels(buf: &mut CellBuffer, view: &View, world: &World, cols: u16, enable_color: bool) {
    let fg = Ink { enable_color }.fg(LABEL_FG);
    let sun = std::iter::once((Vec3::ZERO, world.sun.radius, &world.sun.label));
    let bodies = world
        .bodies()
        .filter(|b| b.mesh.visible)
        .map(|b| (b.world_center(), b.mesh.radius, &b.label));

    for (center, radius, label) in sun.chain(bodies) {
        if !label.visible {
            continue;
        }
        let Some(p) = view.project(center.add(Vec3::Y.scale(radius * LABEL_LIFT))) else { continue };
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let col = (p.x / 2.0) as i32;
        let row = (p.y / 4.0) as i32;
        if row >= buf.h as i32 || col >= cols as i32 {
            continue;
        }
        let len = label.text.chars().count() as i32;
        let x0 = (col - len / 2).max(0);
        for (i, ch) in label.text.chars().enumerate() {
            let x = x0 + i as i32;
            if x >= cols as i32 {
                break;
            }
            let (x, y) = (x as u16, row as u16);
            if let Some(mut cell) = buf.get(x, y) {
                cell.ch = ch;
                cell.fg = fg;
                buf.set(x, y, cell);
            }
        }
    }
}

fn row_disabled(row: PanelRow, controls: &Controls) -> bool {
    controls.in_focus_view()
        && matches!(row, PanelRow::CameraX | PanelRow::CameraY | PanelRow::CameraZ | PanelRow::ResetCamera)
}

fn status_lines(world: &World, controls: &Controls, status: &HudStatus) -> Vec<(String, String)> {
    let assets = if status.assets_ready {
        "ready".to_string()
    } else {
        format!("{}/{}", status.assets_loaded, status.assets_total)
    };
    vec![
        ("focus".to_string(), controls.focus.key().to_string()),
        ("time".to_string(), format!("{:.1}x", world.rate.slow_rate_multiplier)),
        ("assets".to_string(), assets),
        ("pointer".to_string(), if controls.pointer_held { "held" } else { "free" }.to_string()),
    ]
}

pub(crate) fn draw_panel(
    buf: &mut CellBuffer,
    rect: Rect,
    world: &World,
    controls: &Controls,
    panel: &PanelState,
    status: &HudStatus,
    enable_color: bool,
) {
    if rect.w < 4 || rect.h < 3 {
        return;
    }
    let ink = Ink { enable_color };
    let bg = ink.bg(PANEL_BG);
    buf.fill_rect(rect.x, rect.y, rect.w, rect.h, bg);
    buf.box_draw(rect.x, rect.y, rect.w, rect.h, ink.fg(DISABLED_FG), bg);

    let inner = (rect.w - 2) as usize;
    let x = rect.x + 1;
    let bottom = rect.y + rect.h - 1;
    let mut y = rect.y + 1;

    for line in LAYOUT {
        if y >= bottom {
            return;
        }
        match line {
            PanelLine::Title => buf.write_str(x, y, &fit(" solarscope", inner), ink.fg(LABEL_FG), bg),
            PanelLine::Header(h) => buf.write_str(x, y, &fit(&format!(" {h}"), inner), ink.fg(HEADER_FG), bg),
            PanelLine::Row(row) => {
                let selected = panel.selected() == row;
                let marker = if selected { '>' } else { ' ' };
                let value = row.value_text(world, controls);
                let label_w = 14;
                let value_w = inner.saturating_sub(label_w + 3);
                let text = format!(" {marker} {:<label_w$}{value:>value_w$}", row.label());
                let fg = if row_disabled(row, controls) { DISABLED_FG } else { PANEL_FG };
                let row_bg = if selected { ink.bg(SELECTED_BG) } else { bg };
                buf.fill_rect(x, y, inner as u16, 1, row_bg);
                buf.write_str(x, y, &fit(&text, inner), ink.fg(fg), row_bg);
            }
            PanelLine::Blank => {}
        }
        y += 1;
    }

    for (key, value) in status_lines(world, controls, status) {
        if y >= bottom {
            return;
        }
        let value_w = inner.saturating_sub(12);
        let text = format!("   {key:<9}{value:>value_w$}");
        buf.write_str(x, y, &fit(&text, inner), ink.fg(PANEL_FG), bg);
        y += 1;
    }

    if bottom > y + 1 {
        buf.write_str(x, bottom - 1, &fit("   h help | q quit", inner), ink.fg(DISABLED_FG), bg);
    }
}

pub(crate) fn draw_help(buf: &mut CellBuffer, cols: u16, rows: u16, enable_color: bool) {
    let ink = Ink { enable_color };
    let bw = 58.min(cols.saturating_sub(4));
    let bh = (HELP_LINES.len() as u16 + 4).min(rows.saturating_sub(2));
    if bw < 4 || bh < 3 {
        return;
    }
    let x0 = (cols - bw) / 2;
    let y0 = (rows - bh) / 2;
    let bg = ink.bg(PANEL_BG);

    buf.fill_rect(x0, y0, bw, bh, bg);
    buf.box_draw(x0, y0, bw, bh, ink.fg(PANEL_FG), bg);
    buf.write_str(x0 + 2, y0 + 1, "Controls", ink.fg(HEADER_FG), bg);
    let inner = (bw - 4) as usize;
    for (i, line) in HELP_LINES.iter().enumerate() {
        let y = y0 + 3 + i as u16;
        if y >= y0 + bh - 1 {
            break;
        }
        buf.write_str(x0 + 2, y, &fit(line, inner), ink.fg(PANEL_FG), bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::PlanetId;
    use crate::focus::FocusSelection;
    use crate::panel::panel_rect;
    use crate::scene::test_world;

    fn row_text(buf: &CellBuffer, y: u16) -> String {
        (0..buf.w).filter_map(|x| buf.get(x, y)).map(|c| c.ch).collect()
    }

    #[test]
    fn panel_shows_rows_values_and_status() {
        let world = test_world();
        let controls = Controls::default();
        let panel = PanelState::default();
        let mut buf = CellBuffer::new(120, 40);
        let rect = panel_rect(120, 40);
        draw_panel(&mut buf, rect, &world, &controls, &panel, &HudStatus::default(), true);

        let text: Vec<String> = (0..40).map(|y| row_text(&buf, y)).collect();
        assert!(text[4].contains("> rotation"), "{}", text[4]);
        assert!(text[4].contains("0.05"));
        assert!(text[13].contains("< default >"));
        assert!(text.iter().any(|l| l.contains("assets") && l.contains("0/0")));
        assert!(text.iter().any(|l| l.contains("h help | q quit")));
    }

    #[test]
    fn labels_follow_visibility() {
        let mut world = test_world();
        let store = crate::assets::TextureStore::default();
        let mut canvas = crate::render::Canvas::new(world.camera.viewport_w, world.camera.viewport_h);
        let view = crate::raster::render_world(&world, &store, &mut canvas);
        let cols = (world.camera.viewport_w / 2) as u16;
        let rows = (world.camera.viewport_h / 4) as u16;

        let mut buf = CellBuffer::new(cols, rows);
        draw_labels(&mut buf, &view, &world, cols, true);
        assert!((0..rows).all(|y| !row_text(&buf, y).contains("Sun")));

        world.sun.label.visible = true;
        draw_labels(&mut buf, &view, &world, cols, true);
        assert!((0..rows).any(|y| row_text(&buf, y).contains("Sun")));

        // a flagged label on a hidden body never shows
        let mut buf = CellBuffer::new(cols, rows);
        let neptune = PlanetId::Neptune.index();
        world.alts[neptune].label.visible = true;
        draw_labels(&mut buf, &view, &world, cols, true);
        assert!((0..rows).all(|y| !row_text(&buf, y).contains("Neptune")));
    }

    #[test]
    fn camera_rows_grey_out_in_focus() {
        let mut controls = Controls::default();
        assert!(!row_disabled(PanelRow::CameraX, &controls));
        controls.focus = FocusSelection::Planet(PlanetId::Mars);
        assert!(row_disabled(PanelRow::CameraX, &controls));
        assert!(!row_disabled(PanelRow::RotationRate, &controls));
    }

    #[test]
    fn help_fits_small_terminals() {
        let mut buf = CellBuffer::new(20, 6);
        draw_help(&mut buf, 20, 6, false);
        let mut buf = CellBuffer::new(120, 40);
        draw_help(&mut buf, 120, 40, true);
        assert!((0..40).any(|y| row_text(&buf, y).contains("Controls")));
    }
}
