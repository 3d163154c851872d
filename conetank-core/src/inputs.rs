/// The four user-facing inputs, their dependent ranges, and text assignments
use log::warn;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0},
    combinator::{all_consuming, value},
    multi::many0,
    number::complete::double,
    sequence::{preceded, separated_pair, terminated},
    IResult,
};

use crate::error::{ensure_finite, Result, TankError};
use crate::frustum::Frustum;
use crate::profile::{SliderRange, TankProfile};

/// One of the calculator's scalar inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    TopRadius,
    BottomRadius,
    Height,
    FillHeight,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [
        Parameter::TopRadius,
        Parameter::BottomRadius,
        Parameter::Height,
        Parameter::FillHeight,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Parameter::TopRadius => "R",
            Parameter::BottomRadius => "r",
            Parameter::Height => "H",
            Parameter::FillHeight => "h",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Parameter::TopRadius => "Top Radius",
            Parameter::BottomRadius => "Bottom Radius",
            Parameter::Height => "Total Height",
            Parameter::FillHeight => "Liquid Height",
        }
    }

    fn index(self) -> usize {
        match self {
            Parameter::TopRadius => 0,
            Parameter::BottomRadius => 1,
            Parameter::Height => 2,
            Parameter::FillHeight => 3,
        }
    }

    /// Next parameter in display order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous parameter in display order, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn range(self, profile: &TankProfile) -> &SliderRange {
        match self {
            Parameter::TopRadius => &profile.top_radius,
            Parameter::BottomRadius => &profile.bottom_radius,
            Parameter::Height => &profile.height,
            Parameter::FillHeight => &profile.fill_height,
        }
    }
}

/// `name = value` as typed by a user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub parameter: Parameter,
    pub value: f64,
}

/// Current input values, kept inside their profile ranges.
///
/// The bottom radius never exceeds the top radius and the fill height
/// never exceeds the total height; shrinking either bound pulls the
/// dependent value down with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankInputs {
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub height: f64,
    pub fill_height: f64,
}

/// Clamp that tolerates an upper bound below the lower one.
fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    value.clamp(lo, hi.max(lo)) + 0.0
}

impl TankInputs {
    /// Start from the profile's default values.
    pub fn from_profile(profile: &TankProfile) -> Self {
        let mut inputs = Self {
            top_radius: profile.top_radius.default,
            bottom_radius: profile.bottom_radius.default,
            height: profile.height.default,
            fill_height: profile.fill_height.default,
        };
        inputs.reclamp(profile);
        inputs
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::TopRadius => self.top_radius,
            Parameter::BottomRadius => self.bottom_radius,
            Parameter::Height => self.height,
            Parameter::FillHeight => self.fill_height,
        }
    }

    /// Effective `(min, max)` of a parameter given the current values.
    pub fn bounds(&self, parameter: Parameter, profile: &TankProfile) -> (f64, f64) {
        let range = parameter.range(profile);
        let max = match parameter {
            Parameter::BottomRadius => range.max.min(self.top_radius),
            Parameter::FillHeight => range.max.min(self.height),
            Parameter::TopRadius | Parameter::Height => range.max,
        };
        (range.min, max.max(range.min))
    }

    /// Set a value, clamped into its effective range. Returns the value
    /// actually stored.
    pub fn set(&mut self, parameter: Parameter, value: f64, profile: &TankProfile) -> Result<f64> {
        let value = ensure_finite(parameter.label(), value).inspect_err(|err| {
            warn!("rejected input for {}: {}", parameter.symbol(), err);
        })?;
        let (lo, hi) = self.bounds(parameter, profile);
        let value = bounded(value, lo, hi);
        match parameter {
            Parameter::TopRadius => self.top_radius = value,
            Parameter::BottomRadius => self.bottom_radius = value,
            Parameter::Height => self.height = value,
            Parameter::FillHeight => self.fill_height = value,
        }
        self.reclamp(profile);
        Ok(self.get(parameter))
    }

    /// Move a value by `steps` profile steps.
    pub fn nudge(&mut self, parameter: Parameter, steps: i32, profile: &TankProfile) -> Result<f64> {
        let step = parameter.range(profile).step;
        self.set(parameter, self.get(parameter) + step * f64::from(steps), profile)
    }

    /// Apply assignments in order.
    pub fn apply(&mut self, assignments: &[Assignment], profile: &TankProfile) -> Result<()> {
        for assignment in assignments {
            self.set(assignment.parameter, assignment.value, profile)?;
        }
        Ok(())
    }

    pub fn frustum(&self) -> Result<Frustum> {
        Frustum::new(self.top_radius, self.bottom_radius, self.height)
    }

    fn reclamp(&mut self, profile: &TankProfile) {
        self.top_radius = profile.top_radius.clamp(self.top_radius);
        self.height = profile.height.clamp(self.height);
        let (lo, hi) = self.bounds(Parameter::BottomRadius, profile);
        self.bottom_radius = bounded(self.bottom_radius, lo, hi);
        let (lo, hi) = self.bounds(Parameter::FillHeight, profile);
        self.fill_height = bounded(self.fill_height, lo, hi);
    }
}

fn parameter(input: &str) -> IResult<&str, Parameter> {
    // Long names first: "height" must not be read as "h" + garbage.
    alt((
        value(Parameter::TopRadius, tag("top")),
        value(Parameter::BottomRadius, tag("bottom")),
        value(Parameter::Height, tag("height")),
        value(Parameter::FillHeight, tag("fill")),
        value(Parameter::TopRadius, tag("R")),
        value(Parameter::BottomRadius, tag("r")),
        value(Parameter::Height, tag("H")),
        value(Parameter::FillHeight, tag("h")),
    ))(input)
}

fn assignment(input: &str) -> IResult<&str, Assignment> {
    let (input, (parameter, value)) = separated_pair(
        parameter,
        preceded(multispace0, char('=')),
        preceded(multispace0, double),
    )(input)?;
    Ok((input, Assignment { parameter, value }))
}

fn separator(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(input)
}

fn assignments(input: &str) -> IResult<&str, Vec<Assignment>> {
    all_consuming(terminated(many0(preceded(separator, assignment)), separator))(input)
}

/// Parse `R=2.5 r=0.2, h = 1` style input.
///
/// Symbols are case sensitive (`R` top radius, `r` bottom radius, `H`
/// total height, `h` fill height); the long names `top`, `bottom`,
/// `height` and `fill` are accepted too. Empty input yields no
/// assignments.
pub fn parse_assignments(input: &str) -> Result<Vec<Assignment>> {
    match assignments(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(TankError::Parse(e.input.trim().to_string()))
        }
        Err(nom::Err::Incomplete(_)) => Err(TankError::Parse(input.trim().to_string())),
    }
}
