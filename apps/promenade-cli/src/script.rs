//! Input scripts for the headless walk.
//!
//! One step per line: a repeat count followed by tokens. Movement keys and
//! `hold`/`captured` apply to every repeated frame; `jump`, `toggle`,
//! `look DX DY` and `scroll D` fire on the first frame only. `#` starts a
//! comment.
//!
//! ```text
//! 30 forward
//! 1 jump forward
//! 1 toggle
//! 10 look 4 0 captured
//! ```

use anyhow::{Context, Result, bail};
use glam::Vec2;
use promenade_input::InputFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub repeat: u32,
    pub held: InputFrame,
    pub first: InputFrame,
}

/// Parse a whole script.
pub fn parse(text: &str) -> Result<Vec<ScriptStep>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then_some((i + 1, line))
        })
        .map(|(n, line)| parse_line(line).with_context(|| format!("script line {n}: {line:?}")))
        .collect()
}

fn parse_line(line: &str) -> Result<ScriptStep> {
    let mut tokens = line.split_whitespace();
    let repeat: u32 = tokens
        .next()
        .context("missing repeat count")?
        .parse()
        .context("repeat count must be a non-negative integer")?;

    let mut held = InputFrame::default();
    let mut pulse = InputFrame::default();
    while let Some(token) = tokens.next() {
        match token {
            "forward" => held.forward = true,
            "back" => held.back = true,
            "left" => held.left = true,
            "right" => held.right = true,
            "hold" => held.look_held = true,
            "captured" => held.pointer_captured = true,
            "jump" => pulse.jump = true,
            "toggle" => pulse.view_toggles += 1,
            "look" => {
                let dx = number(tokens.next(), "look dx")?;
                let dy = number(tokens.next(), "look dy")?;
                pulse.pointer_delta += Vec2::new(dx, dy);
            }
            "scroll" => pulse.scroll_delta += number(tokens.next(), "scroll delta")?,
            other => bail!("unknown token {other:?}"),
        }
    }

    let first = InputFrame {
        jump: pulse.jump,
        view_toggles: pulse.view_toggles,
        pointer_delta: pulse.pointer_delta,
        scroll_delta: pulse.scroll_delta,
        ..held
    };
    Ok(ScriptStep {
        repeat,
        held,
        first,
    })
}

fn number(token: Option<&str>, what: &str) -> Result<f32> {
    let token = token.with_context(|| format!("missing {what}"))?;
    token
        .parse()
        .with_context(|| format!("{what} must be a number, got {token:?}"))
}

/// Expand steps into one input frame per simulated frame.
pub fn frames(steps: &[ScriptStep]) -> Vec<InputFrame> {
    let mut out = Vec::new();
    for step in steps {
        for i in 0..step.repeat {
            out.push(if i == 0 {
                step.first
            } else {
                step.held
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_fire_once_per_line() {
        let steps = parse("3 jump forward look 2 -1").unwrap();
        let frames = frames(&steps);
        assert_eq!(frames.len(), 3);
        assert!(frames[0].jump);
        assert_eq!(frames[0].pointer_delta, Vec2::new(2.0, -1.0));
        assert!(frames.iter().all(|f| f.forward));
        assert!(!frames[1].jump);
        assert_eq!(frames[2].pointer_delta, Vec2::ZERO);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let steps = parse("# walk\n\n2 left  # strafe\n1 toggle toggle\n").unwrap();
        assert_eq!(steps.len(), 2);
        assert!(steps[0].held.left);
        assert_eq!(steps[1].first.view_toggles, 2);
        assert_eq!(steps[1].held.view_toggles, 0);
    }

    #[test]
    fn bad_lines_report_their_number() {
        let err = parse("1 forward\n2 sideways").unwrap_err();
        assert!(format!("{err:#}").contains("script line 2"));
        assert!(parse("forward").is_err());
        assert!(parse("1 scroll").is_err());
    }

    #[test]
    fn zero_repeat_emits_nothing() {
        let steps = parse("0 jump").unwrap();
        assert!(frames(&steps).is_empty());
    }
}
