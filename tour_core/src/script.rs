// tour_core/src/script.rs
//! Pointer scripts: drive a session with text instead of a pointer device.

use std::str::FromStr;

use kurbo::{Point, Rect};

use crate::session::{EditorSession, GestureOutcome, PointerButton, PointerEvent};
use crate::{BlockType, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Press,
    Palette,
    Move,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    Applied(Option<GestureOutcome>),
    Incomplete,  // valid so far, but needs more tokens
    NotPointer,  // doesn't look like pointer syntax
}

fn lex(input: &str) -> Vec<String> {
    input.split_whitespace().map(|s| s.to_lowercase()).collect()
}

fn parse_verb(token: &str) -> Option<Verb> {
    match token {
        "press" | "down" => Some(Verb::Press),
        "palette" => Some(Verb::Palette),
        "move" => Some(Verb::Move),
        "release" | "up" => Some(Verb::Release),
        _ => None,
    }
}

/// First `count` tokens as numbers.
fn numbers(tokens: &[String], count: usize) -> std::result::Result<Vec<f64>, ApplyStatus> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let Some(t) = tokens.get(i) else {
            return Err(ApplyStatus::Incomplete);
        };
        let n = t.parse::<f64>().map_err(|_| ApplyStatus::NotPointer)?;
        out.push(n);
    }
    Ok(out)
}

// Grammar:
// press <x> <y> [primary|secondary|middle]
// palette <type> <x0> <y0> <x1> <y1> <x> <y>
// move <x> <y>
// release <x> <y>
pub fn try_apply_pointer_line(line: &str, session: &mut EditorSession) -> Result<ApplyStatus> {
    let tokens = lex(line);
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(ApplyStatus::NotPointer);
    };
    let Some(verb) = parse_verb(first) else {
        return Ok(ApplyStatus::NotPointer);
    };

    match verb {
        Verb::Palette => {
            let Some((kind, rest)) = rest.split_first() else {
                return Ok(ApplyStatus::Incomplete);
            };
            let Ok(block_type) = BlockType::from_str(kind) else {
                return Ok(ApplyStatus::NotPointer);
            };
            let n = match numbers(rest, 6) {
                Ok(n) if rest.len() == 6 => n,
                Ok(_) => return Ok(ApplyStatus::NotPointer),
                Err(status) => return Ok(status),
            };
            let template = Rect::new(n[0], n[1], n[2], n[3]);
            let event = PointerEvent::primary(Point::new(n[4], n[5]));
            session.begin_palette_drag(event, block_type, template)?;
            Ok(ApplyStatus::Applied(None))
        }
        Verb::Press => {
            let n = match numbers(rest, 2) {
                Ok(n) => n,
                Err(status) => return Ok(status),
            };
            let button = match &rest[2..] {
                [] => PointerButton::Primary,
                [b] => match PointerButton::from_str(b) {
                    Ok(b) => b,
                    Err(_) => return Ok(ApplyStatus::NotPointer),
                },
                _ => return Ok(ApplyStatus::NotPointer),
            };
            session.pointer_down(PointerEvent::new(Point::new(n[0], n[1]), button))?;
            Ok(ApplyStatus::Applied(None))
        }
        Verb::Move | Verb::Release => {
            let n = match numbers(rest, 2) {
                Ok(n) if rest.len() == 2 => n,
                Ok(_) => return Ok(ApplyStatus::NotPointer),
                Err(status) => return Ok(status),
            };
            let event = PointerEvent::primary(Point::new(n[0], n[1]));
            if verb == Verb::Move {
                session.pointer_move(event)?;
                Ok(ApplyStatus::Applied(None))
            } else {
                Ok(ApplyStatus::Applied(session.pointer_up(event)?))
            }
        }
    }
}

/// Run every line of a script. Blank lines and `#` comments are skipped.
pub fn run_script(script: &str, session: &mut EditorSession) -> Result<Vec<ApplyStatus>> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| try_apply_pointer_line(line, session))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CanvasLayout, Position, Tour};

    fn session() -> anyhow::Result<EditorSession> {
        let layout = CanvasLayout::new(Rect::new(100.0, 0.0, 500.0, 800.0), 8);
        Ok(EditorSession::new(Tour::new("Script"), layout)?)
    }

    #[test]
    fn palette_drop_script() -> anyhow::Result<()> {
        let mut s = session()?;
        let st = run_script(
            "palette text 0 0 80 40 10 10\n move 250 150\n release 250 150",
            &mut s,
        )?;
        assert_eq!(st.last(), Some(&ApplyStatus::Applied(Some(GestureOutcome::Created(0)))));
        assert_eq!(Position::from_block(&s.tour.blocks, 0)?, Position::cell(2, 2));
        Ok(())
    }

    #[test]
    fn far_away_pointer_does_not_break_a_drag() -> anyhow::Result<()> {
        let mut s = session()?;
        let st = run_script(
            "palette text 0 0 150 40 20 20\nmove 300 1e12\nrelease 300 1e12",
            &mut s,
        )?;
        assert_eq!(st.last(), Some(&ApplyStatus::Applied(Some(GestureOutcome::Cancelled))));
        assert_eq!(s.tour.blocks.block_count(), 0);
        assert!(s.is_idle());
        Ok(())
    }

    #[test]
    fn incomplete_move_is_incomplete() -> anyhow::Result<()> {
        let mut s = session()?;
        assert_eq!(try_apply_pointer_line("move 10", &mut s)?, ApplyStatus::Incomplete);
        assert_eq!(try_apply_pointer_line("palette", &mut s)?, ApplyStatus::Incomplete);
        Ok(())
    }

    #[test]
    fn non_pointer_lines_are_ignored() -> anyhow::Result<()> {
        let mut s = session()?;
        assert_eq!(try_apply_pointer_line("help", &mut s)?, ApplyStatus::NotPointer);
        assert_eq!(try_apply_pointer_line("move 1 2 3", &mut s)?, ApplyStatus::NotPointer);
        assert_eq!(try_apply_pointer_line("press 1 2 left", &mut s)?, ApplyStatus::NotPointer);
        assert_eq!(
            try_apply_pointer_line("palette castle 0 0 1 1 0 0", &mut s)?,
            ApplyStatus::NotPointer
        );
        Ok(())
    }

    #[test]
    fn secondary_press_only_selects() -> anyhow::Result<()> {
        let mut s = session()?;
        let id = s.insert_block(Position::cell(1, 1), crate::BlockType::Text)?;
        s.select(None)?;

        try_apply_pointer_line("press 150 50 secondary", &mut s)?;
        assert!(s.is_idle());
        assert_eq!(s.selection.current(), Some(id));
        Ok(())
    }
}
