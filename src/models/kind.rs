use serde::Serialize;
use strum::{AsRefStr, EnumString};

/// How an outcome participates in optimization.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Kind {
    Minimize,
    #[default]
    Info,
    Maximize,
}

impl Kind {
    pub const ALL: [Self; 3] = [Self::Minimize, Self::Info, Self::Maximize];

    /// Numeric direction: -1 to minimize, 1 to maximize, 0 for informational outcomes.
    pub fn direction(self) -> i8 {
        match self {
            Self::Minimize => -1,
            Self::Info => 0,
            Self::Maximize => 1,
        }
    }

    pub fn is_objective(self) -> bool {
        self != Self::Info
    }
}

/// The shape a row in an outcome table declares.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutcomeType {
    Scalar,
    TimeSeries,
}

impl OutcomeType {
    pub const ALL: [Self; 2] = [Self::Scalar, Self::TimeSeries];
}
