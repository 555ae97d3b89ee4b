use crate::controls::ControlAction;
use crate::focus::FocusSelection;
use crate::panel::{row_at, PanelRow, Rect};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

const DRAG_AZIMUTH_PER_CELL: f32 = 0.004;
const DRAG_POLAR_PER_CELL: f32 = 0.008;
const KEY_ORBIT: f32 = 0.02;
const KEY_DOLLY: f32 = 0.02;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    Mouse { kind: MouseEventKind, col: u16, row: u16 },
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(InputEvent::Key { key: k.code, mods: k.modifiers });
                }
            }
            Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                out.push(InputEvent::Mouse { kind, col: column, row });
            }
            _ => {}
        }
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}

/// Turns raw terminal events into control actions. Keeps the drag origin so
/// pointer motion outside the panel can orbit the camera.
#[derive(Clone, Debug, Default)]
pub(crate) struct InputMapper {
    drag_from: Option<(u16, u16)>,
}

impl InputMapper {
    pub(crate) fn map(&mut self, ev: &InputEvent, panel: Rect) -> Option<ControlAction> {
        match *ev {
            InputEvent::Key { key, mods } => map_key(key, mods),
            InputEvent::Mouse { kind, col, row } => self.map_mouse(kind, col, row, panel),
        }
    }

    fn map_mouse(&mut self, kind: MouseEventKind, col: u16, row: u16, panel: Rect) -> Option<ControlAction> {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if panel.contains(col, row) {
                    return row_at(panel, col, row).map(ControlAction::Press);
                }
                self.drag_from = Some((col, row));
                Some(ControlAction::PointerDown)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x0, y0) = self.drag_from?;
                self.drag_from = Some((col, row));
                let dx = col as f32 - x0 as f32;
                let dy = row as f32 - y0 as f32;
                Some(ControlAction::Orbit {
                    azimuth: -dx * DRAG_AZIMUTH_PER_CELL,
                    polar: -dy * DRAG_POLAR_PER_CELL,
                })
            }
            // release always ends the gesture, wherever it happens
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_from = None;
                Some(ControlAction::PointerUp)
            }
            MouseEventKind::ScrollUp if !panel.contains(col, row) => Some(ControlAction::Dolly(-0.05)),
            MouseEventKind::ScrollDown if !panel.contains(col, row) => Some(ControlAction::Dolly(0.05)),
            _ => None,
        }
    }
}

pub(crate) fn map_key(key: KeyCode, mods: KeyModifiers) -> Option<ControlAction> {
    if matches!(key, KeyCode::Char('c') | KeyCode::Char('C')) && mods.contains(KeyModifiers::CONTROL) {
        return Some(ControlAction::Quit);
    }
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(ControlAction::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => Some(ControlAction::ToggleHelp),

        KeyCode::Up | KeyCode::BackTab => Some(ControlAction::MoveCursor(-1)),
        KeyCode::Down | KeyCode::Tab => Some(ControlAction::MoveCursor(1)),
        KeyCode::Left | KeyCode::Char('-') => Some(ControlAction::Nudge(-1)),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => Some(ControlAction::Nudge(1)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(ControlAction::Activate),

        KeyCode::Char(c @ '0'..='8') => {
            FocusSelection::from_ordinal(c as usize - '0' as usize).map(ControlAction::SelectFocus)
        }

        KeyCode::Char('o') | KeyCode::Char('O') => Some(ControlAction::Press(PanelRow::ShowOrbits)),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(ControlAction::Press(PanelRow::ShowNames)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(ControlAction::Press(PanelRow::ResetSpeed)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(ControlAction::Press(PanelRow::ResetCamera)),

        KeyCode::Char('a') | KeyCode::Char('A') => Some(ControlAction::Orbit { azimuth: -KEY_ORBIT, polar: 0.0 }),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(ControlAction::Orbit { azimuth: KEY_ORBIT, polar: 0.0 }),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(ControlAction::Orbit { azimuth: 0.0, polar: -KEY_ORBIT }),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(ControlAction::Orbit { azimuth: 0.0, polar: KEY_ORBIT }),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(ControlAction::Dolly(-KEY_DOLLY)),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(ControlAction::Dolly(KEY_DOLLY)),
        _ => None,
    }
}
