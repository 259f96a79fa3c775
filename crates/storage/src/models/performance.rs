use std::fmt;

use thiserror::Error;

use super::discipline::{Discipline, DisciplineKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerformanceError {
    #[error("Performance is empty")]
    Empty,

    #[error("'{input}' is not a valid {expected} for {discipline}")]
    Malformed {
        input: String,
        discipline: Discipline,
        expected: &'static str,
    },

    #[error("{value} is outside the plausible range for {discipline}")]
    OutOfRange { value: String, discipline: Discipline },
}

/// A parsed performance, kept in integer units so comparisons and formatting
/// never go through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Time { hundredths: u32 },
    Mark { centimeters: u32 },
}

impl Performance {
    /// Parses a judge-entered performance for the given discipline.
    ///
    /// Timed disciplines accept `SS.hh` or `M:SS.hh`; measured ones accept
    /// metres as `M.cc`. A comma works as the decimal separator in both.
    pub fn parse(discipline: Discipline, raw: &str) -> Result<Self, PerformanceError> {
        let input = raw.trim().replace(',', ".");
        if input.is_empty() {
            return Err(PerformanceError::Empty);
        }

        let performance = match discipline.kind() {
            DisciplineKind::Timed => parse_time(&input).map(|hundredths| Self::Time { hundredths }),
            DisciplineKind::Measured => {
                parse_hundredths(&input).map(|centimeters| Self::Mark { centimeters })
            }
        }
        .ok_or_else(|| PerformanceError::Malformed {
            input: raw.trim().to_string(),
            discipline,
            expected: match discipline.kind() {
                DisciplineKind::Timed => "time",
                DisciplineKind::Measured => "distance",
            },
        })?;

        let (min, max) = discipline.plausible_range();
        if !(min..=max).contains(&performance.value()) {
            return Err(PerformanceError::OutOfRange {
                value: performance.to_string(),
                discipline,
            });
        }

        Ok(performance)
    }

    /// Hundredths of a second or centimetres.
    pub fn value(&self) -> u32 {
        match self {
            Self::Time { hundredths } => *hundredths,
            Self::Mark { centimeters } => *centimeters,
        }
    }

    pub fn is_valid_for(discipline: Discipline, raw: &str) -> bool {
        Self::parse(discipline, raw).is_ok()
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Time { hundredths } if hundredths >= 6_000 => {
                let minutes = hundredths / 6_000;
                let rest = hundredths % 6_000;
                write!(f, "{}:{:02}.{:02}", minutes, rest / 100, rest % 100)
            }
            Self::Time { hundredths } => write!(f, "{}.{:02}", hundredths / 100, hundredths % 100),
            Self::Mark { centimeters } => {
                write!(f, "{}.{:02}", centimeters / 100, centimeters % 100)
            }
        }
    }
}

fn parse_time(input: &str) -> Option<u32> {
    match input.split_once(':') {
        Some((minutes, seconds)) => {
            if minutes.is_empty() || !minutes.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let whole_seconds = seconds.split('.').next()?;
            if whole_seconds.len() != 2 {
                return None;
            }
            let seconds = parse_hundredths(seconds)?;
            if seconds >= 6_000 {
                return None;
            }
            let minutes: u32 = minutes.parse().ok()?;
            minutes.checked_mul(6_000)?.checked_add(seconds)
        }
        None => parse_hundredths(input),
    }
}

/// Parses `I` or `I.f` / `I.ff` into hundredths of the unit.
fn parse_hundredths(input: &str) -> Option<u32> {
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if input.contains('.') && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: u32 = whole.parse().ok()?;
    let fraction: u32 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u32>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(fraction)
}
