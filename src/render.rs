use crate::math::{clamp, clamp01, lerp_u8};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

pub(crate) const MIN_COLS: u16 = 60;
pub(crate) const MIN_ROWS: u16 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub(crate) fn to_color(self) -> Color {
        Color::Rgb { r: self.r, g: self.g, b: self.b }
    }
}

pub(crate) fn mix_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = clamp01(t);
    Rgb {
        r: lerp_u8(a.r, b.r, t),
        g: lerp_u8(a.g, b.g, t),
        b: lerp_u8(a.b, b.b, t),
    }
}

/// Brightness scale; values above 1 brighten up to white clip.
pub(crate) fn scale_rgb(a: Rgb, t: f32) -> Rgb {
    let t = t.max(0.0);
    Rgb {
        r: clamp((a.r as f32) * t, 0.0, 255.0) as u8,
        g: clamp((a.g as f32) * t, 0.0, 255.0) as u8,
        b: clamp((a.b as f32) * t, 0.0, 255.0) as u8,
    }
}

// -------------------- Cell buffer --------------------
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Cell {
    pub(crate) fn blank(bg: Color) -> Self {
        Self { ch: ' ', fg: Color::Reset, bg }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self { w, h, cells: vec![Cell::blank(Color::Black); (w as usize) * (h as usize)] }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell::blank(bg));
    }

    pub(crate) fn write_str(&mut self, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
        let mut xx = x;
        for ch in s.chars() {
            if xx >= self.w {
                break;
            }
            self.set(xx, y, Cell { ch, fg, bg });
            xx = xx.saturating_add(1);
        }
    }

    pub(crate) fn box_draw(&mut self, x0: u16, y0: u16, bw: u16, bh: u16, fg: Color, bg: Color) {
        if bw < 2 || bh < 2 {
            return;
        }
        let x1 = x0.saturating_add(bw - 1);
        let y1 = y0.saturating_add(bh - 1);

        for x in x0 + 1..x1 {
            self.set(x, y0, Cell { ch: '─', fg, bg });
            self.set(x, y1, Cell { ch: '─', fg, bg });
        }
        for y in y0 + 1..y1 {
            self.set(x0, y, Cell { ch: '│', fg, bg });
            self.set(x1, y, Cell { ch: '│', fg, bg });
        }
        self.set(x0, y0, Cell { ch: '┌', fg, bg });
        self.set(x1, y0, Cell { ch: '┐', fg, bg });
        self.set(x0, y1, Cell { ch: '└', fg, bg });
        self.set(x1, y1, Cell { ch: '┘', fg, bg });
    }

    pub(crate) fn fill_rect(&mut self, x0: u16, y0: u16, bw: u16, bh: u16, bg: Color) {
        for y in y0..y0.saturating_add(bh) {
            for x in x0..x0.saturating_add(bw) {
                self.set(x, y, Cell::blank(bg));
            }
        }
    }
}

// -------------------- Braille canvas (2x4 sub-pixels per cell) --------------------
#[derive(Clone, Copy, Debug)]
pub(crate) struct Pixel {
    pub(crate) rgb: Rgb,
    pub(crate) depth: f32,
    pub(crate) on: bool,
}

impl Pixel {
    const EMPTY: Pixel = Pixel { rgb: Rgb::BLACK, depth: f32::INFINITY, on: false };
}

pub(crate) struct Canvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl Canvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self { w, h, px: vec![Pixel::EMPTY; (w as usize) * (h as usize)] }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::EMPTY);
    }

    /// Depth-tested write.
    pub(crate) fn plot(&mut self, x: i32, y: i32, depth: f32, rgb: Rgb) {
        if x < 0 || y < 0 || x as u32 >= self.w || y as u32 >= self.h {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        let p = &mut self.px[i];
        if depth < p.depth {
            *p = Pixel { rgb, depth, on: true };
        }
    }

    /// Translucent write: blends over what is there, keeps the nearer depth.
    pub(crate) fn blend(&mut self, x: i32, y: i32, depth: f32, rgb: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.w || y as u32 >= self.h {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        let p = &mut self.px[i];
        if depth >= p.depth {
            return;
        }
        p.rgb = if p.on { mix_rgb(p.rgb, rgb, alpha) } else { scale_rgb(rgb, alpha) };
        p.on = true;
        p.depth = depth;
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        (x < self.w && y < self.h).then(|| self.px[self.idx(x, y)])
    }
}

fn braille_bit(dx: u32, dy: u32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Packs the canvas into braille cells. `bg_at` supplies a per-cell background.
pub(crate) fn canvas_to_cells(
    canvas: &Canvas,
    out: &mut CellBuffer,
    cols: u16,
    enable_color: bool,
    mut bg_at: impl FnMut(u16, u16) -> Rgb,
) {
    let rows = out.h;
    for cy in 0..rows {
        for cx in 0..cols.min(out.w) {
            let px0 = cx as u32 * 2;
            let py0 = cy as u32 * 4;

            let mut mask: u8 = 0;
            let mut sum_r: u32 = 0;
            let mut sum_g: u32 = 0;
            let mut sum_b: u32 = 0;
            let mut ink: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let Some(p) = canvas.get(px0 + dx, py0 + dy) else { continue };
                    if p.on {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.rgb.r as u32;
                        sum_g += p.rgb.g as u32;
                        sum_b += p.rgb.b as u32;
                        ink += 1;
                    }
                }
            }

            let bg = if enable_color { bg_at(cx, cy).to_color() } else { Color::Black };
            let fg = if enable_color && ink > 0 {
                Color::Rgb { r: (sum_r / ink) as u8, g: (sum_g / ink) as u8, b: (sum_b / ink) as u8 }
            } else {
                Color::White
            };
            let ch = if mask == 0 { ' ' } else { char::from_u32(0x2800 + mask as u32).unwrap_or(' ') };
            out.set(cx, cy, Cell { ch, fg, bg });
        }
    }
}

// -------------------- Terminal --------------------
pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let (cols, rows) = (cols.max(MIN_COLS), rows.max(MIN_ROWS));
        Ok(Self { out, cols, rows, prev: CellBuffer::new(cols, rows), cur: CellBuffer::new(cols, rows) })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Returns true when the surface changed size; buffers are reallocated.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        let (c, r) = (c.max(MIN_COLS), r.max(MIN_ROWS));
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        execute!(self.out, terminal::Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_respects_depth() {
        let mut c = Canvas::new(4, 4);
        c.plot(1, 1, 5.0, Rgb { r: 10, g: 0, b: 0 });
        c.plot(1, 1, 9.0, Rgb { r: 99, g: 0, b: 0 });
        assert_eq!(c.get(1, 1).map(|p| p.rgb.r), Some(10));
        c.plot(1, 1, 2.0, Rgb { r: 50, g: 0, b: 0 });
        assert_eq!(c.get(1, 1).map(|p| p.rgb.r), Some(50));
        // off-canvas writes are dropped
        c.plot(-1, 7, 1.0, Rgb::BLACK);
    }

    #[test]
    fn blend_mixes_over_existing_ink() {
        let mut c = Canvas::new(2, 2);
        c.plot(0, 0, 10.0, Rgb { r: 200, g: 0, b: 0 });
        c.blend(0, 0, 5.0, Rgb { r: 0, g: 0, b: 200 }, 0.5);
        let p = c.get(0, 0).expect("pixel");
        assert_eq!(p.rgb, Rgb { r: 100, g: 0, b: 100 });
        assert_eq!(p.depth, 5.0);
    }

    #[test]
    fn full_cell_becomes_full_braille_block() {
        let mut c = Canvas::new(2, 4);
        for y in 0..4 {
            for x in 0..2 {
                c.plot(x, y, 1.0, Rgb { r: 100, g: 100, b: 100 });
            }
        }
        let mut buf = CellBuffer::new(1, 1);
        canvas_to_cells(&c, &mut buf, 1, true, |_, _| Rgb::BLACK);
        let cell = buf.get(0, 0).expect("cell");
        assert_eq!(cell.ch, '\u{28FF}');
        assert_eq!(cell.fg, Color::Rgb { r: 100, g: 100, b: 100 });
    }

    #[test]
    fn empty_cell_is_blank() {
        let c = Canvas::new(2, 4);
        let mut buf = CellBuffer::new(1, 1);
        canvas_to_cells(&c, &mut buf, 1, false, |_, _| Rgb { r: 9, g: 9, b: 9 });
        assert_eq!(buf.get(0, 0).map(|c| c.ch), Some(' '));
        assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(Color::Black));
    }

    #[test]
    fn write_str_clips_at_edge() {
        let mut buf = CellBuffer::new(5, 1);
        buf.write_str(3, 0, "abc", Color::White, Color::Black);
        assert_eq!(buf.get(3, 0).map(|c| c.ch), Some('a'));
        assert_eq!(buf.get(4, 0).map(|c| c.ch), Some('b'));
    }
}
