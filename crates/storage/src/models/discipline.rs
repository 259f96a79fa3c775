use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Returned when a stored or submitted code does not belong to a known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} code: {code}")]
pub struct UnknownCodeError {
    pub kind: &'static str,
    pub code: String,
}

impl UnknownCodeError {
    fn new(kind: &'static str, code: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "MEN" => Ok(Self::Male),
            "F" | "FEMALE" | "WOMEN" => Ok(Self::Female),
            _ => Err(UnknownCodeError::new("gender", s)),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = UnknownCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a discipline's performance is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisciplineKind {
    /// Running and hurdles, recorded as a time.
    Timed,
    /// Jumps and throws, recorded as a height or distance.
    Measured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Discipline {
    #[serde(rename = "100M")]
    Run100m,
    #[serde(rename = "200M")]
    Run200m,
    #[serde(rename = "400M")]
    Run400m,
    #[serde(rename = "600M")]
    Run600m,
    #[serde(rename = "800M")]
    Run800m,
    #[serde(rename = "1000M")]
    Run1000m,
    #[serde(rename = "1500M")]
    Run1500m,
    #[serde(rename = "60MH")]
    Hurdles60m,
    #[serde(rename = "80MH")]
    Hurdles80m,
    #[serde(rename = "100MH")]
    Hurdles100m,
    #[serde(rename = "110MH")]
    Hurdles110m,
    #[serde(rename = "HJ")]
    HighJump,
    #[serde(rename = "PV")]
    PoleVault,
    #[serde(rename = "LJ")]
    LongJump,
    #[serde(rename = "SP")]
    ShotPut,
    #[serde(rename = "DT")]
    DiscusThrow,
    #[serde(rename = "JT")]
    JavelinThrow,
}

impl Discipline {
    pub const ALL: [Discipline; 17] = [
        Self::Run100m,
        Self::Run200m,
        Self::Run400m,
        Self::Run600m,
        Self::Run800m,
        Self::Run1000m,
        Self::Run1500m,
        Self::Hurdles60m,
        Self::Hurdles80m,
        Self::Hurdles100m,
        Self::Hurdles110m,
        Self::HighJump,
        Self::PoleVault,
        Self::LongJump,
        Self::ShotPut,
        Self::DiscusThrow,
        Self::JavelinThrow,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Run100m => "100M",
            Self::Run200m => "200M",
            Self::Run400m => "400M",
            Self::Run600m => "600M",
            Self::Run800m => "800M",
            Self::Run1000m => "1000M",
            Self::Run1500m => "1500M",
            Self::Hurdles60m => "60MH",
            Self::Hurdles80m => "80MH",
            Self::Hurdles100m => "100MH",
            Self::Hurdles110m => "110MH",
            Self::HighJump => "HJ",
            Self::PoleVault => "PV",
            Self::LongJump => "LJ",
            Self::ShotPut => "SP",
            Self::DiscusThrow => "DT",
            Self::JavelinThrow => "JT",
        }
    }

    pub fn kind(&self) -> DisciplineKind {
        match self {
            Self::HighJump
            | Self::PoleVault
            | Self::LongJump
            | Self::ShotPut
            | Self::DiscusThrow
            | Self::JavelinThrow => DisciplineKind::Measured,
            _ => DisciplineKind::Timed,
        }
    }

    /// Whether a wind gauge reading is recorded for this discipline.
    pub fn is_wind_affected(&self) -> bool {
        matches!(
            self,
            Self::Run100m
                | Self::Run200m
                | Self::Hurdles80m
                | Self::Hurdles100m
                | Self::Hurdles110m
                | Self::LongJump
        )
    }

    /// Inclusive window of plausible performances, in hundredths of a second
    /// for timed disciplines and centimetres for measured ones.
    pub fn plausible_range(&self) -> (u32, u32) {
        match self {
            Self::Run100m => (900, 3_000),
            Self::Run200m => (1_800, 6_000),
            Self::Run400m => (4_000, 15_000),
            Self::Run600m => (7_000, 30_000),
            Self::Run800m => (9_500, 40_000),
            Self::Run1000m => (12_500, 48_000),
            Self::Run1500m => (20_000, 72_000),
            Self::Hurdles60m => (700, 2_000),
            Self::Hurdles80m => (900, 2_500),
            Self::Hurdles100m => (1_100, 3_000),
            Self::Hurdles110m => (1_200, 3_000),
            Self::HighJump => (50, 260),
            Self::PoleVault => (100, 650),
            Self::LongJump => (200, 950),
            Self::ShotPut => (200, 2_400),
            Self::DiscusThrow => (500, 8_000),
            Self::JavelinThrow => (500, 10_000),
        }
    }
}

impl FromStr for Discipline {
    type Err = UnknownCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|d| d.code() == normalized)
            .ok_or_else(|| UnknownCodeError::new("discipline", s))
    }
}

impl TryFrom<String> for Discipline {
    type Error = UnknownCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Decathlon,
    Heptathlon,
    PentathlonIndoor,
    PentathlonOutdoor,
    PentathlonU16Male,
    PentathlonU16Female,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        Self::Decathlon,
        Self::Heptathlon,
        Self::PentathlonIndoor,
        Self::PentathlonOutdoor,
        Self::PentathlonU16Male,
        Self::PentathlonU16Female,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decathlon => "DECATHLON",
            Self::Heptathlon => "HEPTATHLON",
            Self::PentathlonIndoor => "PENTATHLON_INDOOR",
            Self::PentathlonOutdoor => "PENTATHLON_OUTDOOR",
            Self::PentathlonU16Male => "PENTATHLON_U16_MALE",
            Self::PentathlonU16Female => "PENTATHLON_U16_FEMALE",
        }
    }

    /// Disciplines in competition order; the position is the result's day order.
    pub fn disciplines(&self) -> &'static [Discipline] {
        use Discipline::*;

        match self {
            Self::Decathlon => &[
                Run100m,
                LongJump,
                ShotPut,
                HighJump,
                Run400m,
                Hurdles110m,
                DiscusThrow,
                PoleVault,
                JavelinThrow,
                Run1500m,
            ],
            Self::Heptathlon => &[
                Hurdles100m,
                HighJump,
                ShotPut,
                Run200m,
                LongJump,
                JavelinThrow,
                Run800m,
            ],
            Self::PentathlonIndoor => &[Hurdles60m, HighJump, ShotPut, LongJump, Run800m],
            Self::PentathlonOutdoor => &[LongJump, JavelinThrow, Run200m, DiscusThrow, Run1500m],
            Self::PentathlonU16Male => &[Hurdles110m, LongJump, ShotPut, HighJump, Run1000m],
            Self::PentathlonU16Female => &[Hurdles80m, HighJump, ShotPut, LongJump, Run600m],
        }
    }

    pub fn includes(&self, discipline: Discipline) -> bool {
        self.disciplines().contains(&discipline)
    }

    /// The gender an event's programme is defined for, if it is gender specific.
    pub fn required_gender(&self) -> Option<Gender> {
        match self {
            Self::Decathlon | Self::PentathlonU16Male => Some(Gender::Male),
            Self::Heptathlon | Self::PentathlonIndoor | Self::PentathlonU16Female => {
                Some(Gender::Female)
            }
            Self::PentathlonOutdoor => None,
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownCodeError::new("event type", s))
    }
}

impl TryFrom<String> for EventType {
    type Error = UnknownCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
