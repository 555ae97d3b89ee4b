use crate::controls::Controls;
use crate::scene::World;

pub(crate) const PANEL_W: u16 = 34;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) w: u16,
    pub(crate) h: u16,
}

impl Rect {
    pub(crate) fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x.saturating_add(self.w) && row >= self.y && row < self.y.saturating_add(self.h)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PanelRow {
    RotationRate,
    RevolutionRate,
    ResetSpeed,
    CameraX,
    CameraY,
    CameraZ,
    ResetCamera,
    Focus,
    ShowOrbits,
    ShowNames,
}

impl PanelRow {
    pub(crate) const ALL: [PanelRow; 10] = [
        PanelRow::RotationRate,
        PanelRow::RevolutionRate,
        PanelRow::ResetSpeed,
        PanelRow::CameraX,
        PanelRow::CameraY,
        PanelRow::CameraZ,
        PanelRow::ResetCamera,
        PanelRow::Focus,
        PanelRow::ShowOrbits,
        PanelRow::ShowNames,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            PanelRow::RotationRate => "rotation",
            PanelRow::RevolutionRate => "revolution",
            PanelRow::ResetSpeed => "reset speed",
            PanelRow::CameraX => "x",
            PanelRow::CameraY => "y",
            PanelRow::CameraZ => "z",
            PanelRow::ResetCamera => "reset camera",
            PanelRow::Focus => "planet",
            PanelRow::ShowOrbits => "show orbits",
            PanelRow::ShowNames => "show names",
        }
    }

    pub(crate) fn value_text(self, world: &World, controls: &Controls) -> String {
        let on_off = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();
        let cam = world.camera.position;
        match self {
            PanelRow::RotationRate => format!("{:.2}", world.rate.rotation_rate),
            PanelRow::RevolutionRate => format!("{:.3}", world.rate.revolution_rate),
            PanelRow::ResetSpeed | PanelRow::ResetCamera => "<enter>".to_string(),
            PanelRow::CameraX => format!("{:.1}", cam.x),
            PanelRow::CameraY => format!("{:.1}", cam.y),
            PanelRow::CameraZ => format!("{:.1}", cam.z),
            PanelRow::Focus => format!("< {} >", controls.focus.key()),
            PanelRow::ShowOrbits => on_off(controls.toggles.show_orbits),
            PanelRow::ShowNames => on_off(controls.toggles.show_names),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PanelLine {
    Title,
    Header(&'static str),
    Row(PanelRow),
    Blank,
}

/// Vertical layout of the panel, one entry per terminal row below the top border.
pub(crate) const LAYOUT: [PanelLine; 18] = [
    PanelLine::Title,
    PanelLine::Blank,
    PanelLine::Header("Speed"),
    PanelLine::Row(PanelRow::RotationRate),
    PanelLine::Row(PanelRow::RevolutionRate),
    PanelLine::Row(PanelRow::ResetSpeed),
    PanelLine::Header("Camera"),
    PanelLine::Row(PanelRow::CameraX),
    PanelLine::Row(PanelRow::CameraY),
    PanelLine::Row(PanelRow::CameraZ),
    PanelLine::Row(PanelRow::ResetCamera),
    PanelLine::Header("Planet focus"),
    PanelLine::Row(PanelRow::Focus),
    PanelLine::Header("Labels"),
    PanelLine::Row(PanelRow::ShowOrbits),
    PanelLine::Row(PanelRow::ShowNames),
    PanelLine::Blank,
    PanelLine::Header("Status"),
];

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PanelState {
    pub(crate) cursor: usize,
}

impl PanelState {
    pub(crate) fn selected(&self) -> PanelRow {
        PanelRow::ALL[self.cursor % PanelRow::ALL.len()]
    }

    pub(crate) fn move_cursor(&mut self, step: i32) {
        let n = PanelRow::ALL.len() as i32;
        self.cursor = (self.cursor as i32 + step).rem_euclid(n) as usize;
    }

    pub(crate) fn select(&mut self, row: PanelRow) {
        if let Some(i) = PanelRow::ALL.iter().position(|r| *r == row) {
            self.cursor = i;
        }
    }
}

/// Right-hand column, full height.
pub(crate) fn panel_rect(cols: u16, rows: u16) -> Rect {
    let w = PANEL_W.min(cols / 2);
    Rect { x: cols.saturating_sub(w), y: 0, w, h: rows }
}

/// Panel row under a terminal cell, if any.
pub(crate) fn row_at(rect: Rect, col: u16, row: u16) -> Option<PanelRow> {
    if !rect.contains(col, row) || row <= rect.y {
        return None;
    }
    match LAYOUT.get((row - rect.y - 1) as usize) {
        Some(PanelLine::Row(r)) => Some(*r),
        _ => None,
    }
}
