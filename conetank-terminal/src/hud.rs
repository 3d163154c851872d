/// Text overlay: title, input sliders, result line and key help
use conetank_core::{Parameter, TankInputs, TankProfile, TankSnapshot};
use crossterm::style::Color;

/// Width of the text slider bar, in cells.
const BAR_WIDTH: usize = 20;

pub const KEY_HELP: &str =
    "Up/Down=Select  Left/Right=Adjust  PgUp/PgDn=x10  WASD=Orbit  Space=Spin  P=Projection  :=Type  Q=Quit";

/// One line of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HudLine {
    pub text: String,
    pub color: Color,
}

impl HudLine {
    fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// What the overlay needs to know about the app.
pub struct HudState<'a> {
    pub profile: &'a TankProfile,
    pub inputs: &'a TankInputs,
    pub selected: Parameter,
    pub snapshot: &'a TankSnapshot,
    pub command: Option<&'a str>,
    pub status: Option<&'a str>,
    pub fps: f32,
}

/// `[#####-----]` style bar for a value inside `[min, max]`.
fn slider_bar(value: f64, min: f64, max: f64) -> String {
    let fraction = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Lines shown above the rendering.
pub fn top_lines(state: &HudState<'_>) -> Vec<HudLine> {
    let profile = state.profile;
    let mut lines = vec![HudLine::new(
        format!("{} | FPS: {:.1}", profile.title, state.fps),
        Color::Yellow,
    )];

    for parameter in Parameter::ALL {
        let (min, max) = state.inputs.bounds(parameter, profile);
        let value = state.inputs.get(parameter);
        let marker = if parameter == state.selected { '>' } else { ' ' };
        let text = format!(
            "{marker} {:<14} ({}) {:>9.2} {:<6} {} {:.2}..{:.2}",
            parameter.label(),
            parameter.symbol(),
            value,
            profile.length_unit,
            slider_bar(value, min, max),
            min,
            max,
        );
        let color = if parameter == state.selected {
            Color::White
        } else {
            Color::Grey
        };
        lines.push(HudLine::new(text, color));
    }

    let snapshot = state.snapshot;
    lines.push(HudLine::new(
        format!(
            "{} ({:.1}% full)",
            profile.volume_summary(snapshot.fill_height, snapshot.volume),
            snapshot.fill_ratio() * 100.0
        ),
        Color::Cyan,
    ));
    lines
}

/// Lines shown below the rendering.
pub fn bottom_lines(state: &HudState<'_>) -> Vec<HudLine> {
    let mut lines = Vec::with_capacity(2);
    match (state.command, state.status) {
        (Some(command), _) => lines.push(HudLine::new(format!(":{command}_"), Color::White)),
        (None, Some(status)) => lines.push(HudLine::new(status, Color::Red)),
        (None, None) => lines.push(HudLine::new("", Color::Reset)),
    }
    lines.push(HudLine::new(KEY_HELP, Color::DarkGrey));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use conetank_core::compute;

    fn with_state<T>(command: Option<&str>, status: Option<&str>, f: impl FnOnce(&HudState<'_>) -> T) -> T {
        let profile = TankProfile::slurry_tank();
        let inputs = TankInputs::from_profile(&profile);
        let snapshot = compute(&inputs.frustum().unwrap(), inputs.fill_height).unwrap();
        let state = HudState {
            profile: &profile,
            inputs: &inputs,
            selected: Parameter::FillHeight,
            snapshot: &snapshot,
            command,
            status,
            fps: 30.0,
        };
        f(&state)
    }

    #[test]
    fn test_slider_bar() {
        assert_eq!(slider_bar(0.0, 0.0, 10.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(slider_bar(10.0, 0.0, 10.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(slider_bar(5.0, 5.0, 5.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_top_lines_show_inputs_and_volume() {
        let lines = with_state(None, None, top_lines);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].text.starts_with("Slurry Tank Volume Calculator"));
        assert!(lines[4].text.starts_with("> Liquid Height"));
        assert!(lines[4].text.contains("0.00..200.00"));
        assert!(lines[5].text.contains("865.90 liters"));
        assert!(lines[5].text.contains("16.6% full"));
    }

    #[test]
    fn test_command_line_takes_precedence() {
        let lines = with_state(Some("h=5"), Some("old error"), bottom_lines);
        assert_eq!(lines[0].text, ":h=5_");
        let lines = with_state(None, Some("bad input"), bottom_lines);
        assert_eq!(lines[0].text, "bad input");
        assert_eq!(lines[0].color, Color::Red);
    }
}
