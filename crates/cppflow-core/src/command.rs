use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::FlowError;

/// Entries of the top-level menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopLevelChoice {
    /// Clean, configure, build and run tests.
    Debug,
}

impl TopLevelChoice {
    pub const ALL: [Self; 1] = [Self::Debug];

    pub fn index(self) -> usize {
        match self {
            Self::Debug => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
        }
    }

    /// Renders the `index: label` rows of the top-level menu.
    pub fn menu() -> String {
        Self::ALL
            .iter()
            .map(|choice| format!("{}: {}\n", choice.index(), choice.as_str()))
            .collect()
    }
}

impl Display for TopLevelChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopLevelChoice {
    type Err = FlowError;

    /// Blank input picks the default, `0`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "0" => Ok(Self::Debug),
            other => Err(FlowError::InvalidTopLevelChoice(other.to_string())),
        }
    }
}
