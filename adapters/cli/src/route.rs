use std::{num::ParseIntError, str::FromStr};

use claimfield_core::{Direction, DirectionKeys};
use thiserror::Error;

const LEG_DELIMITER: char = ',';

/// Scripted player input: a cyclic list of headings, each held for a number
/// of ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Route {
    legs: Vec<Leg>,
    period: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Leg {
    direction: Direction,
    ticks: u32,
}

impl Route {
    /// Keys held on `tick`, counting from zero and wrapping around the route.
    #[must_use]
    pub(crate) fn keys_at(&self, tick: u64) -> DirectionKeys {
        let mut offset = tick % self.period;
        for leg in &self.legs {
            let ticks = u64::from(leg.ticks);
            if offset < ticks {
                return DirectionKeys::holding(leg.direction);
            }
            offset -= ticks;
        }
        DirectionKeys::default()
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RouteError::Empty);
        }

        let legs = trimmed
            .split(LEG_DELIMITER)
            .map(parse_leg)
            .collect::<Result<Vec<_>, _>>()?;
        let period = legs.iter().map(|leg| u64::from(leg.ticks)).sum();

        Ok(Self { legs, period })
    }
}

fn parse_leg(leg: &str) -> Result<Leg, RouteError> {
    let leg = leg.trim();
    let mut characters = leg.chars();
    let direction = match characters.next().map(|heading| heading.to_ascii_uppercase()) {
        Some('N') => Direction::North,
        Some('S') => Direction::South,
        Some('W') => Direction::West,
        Some('E') => Direction::East,
        _ => return Err(RouteError::UnknownDirection(leg.to_owned())),
    };
    let ticks: u32 = characters
        .as_str()
        .parse()
        .map_err(|source| RouteError::InvalidLength {
            leg: leg.to_owned(),
            source,
        })?;
    if ticks == 0 {
        return Err(RouteError::ZeroLength(leg.to_owned()));
    }

    Ok(Leg { direction, ticks })
}

/// Errors raised while parsing a `--route` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RouteError {
    /// No legs were supplied.
    #[error("route must contain at least one leg such as `E30`")]
    Empty,
    /// The leg did not start with one of `N`, `S`, `W` or `E`.
    #[error("route leg `{0}` must start with N, S, W or E")]
    UnknownDirection(String),
    /// The tick count after the heading was not a number.
    #[error("route leg `{leg}` has an invalid tick count")]
    InvalidLength {
        /// Offending leg.
        leg: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// Legs must last at least one tick.
    #[error("route leg `{0}` must last at least one tick")]
    ZeroLength(String),
}
