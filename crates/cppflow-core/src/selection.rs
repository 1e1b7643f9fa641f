use std::fmt::{Display, Formatter};
use std::num::IntErrorKind;

use crate::catalog::{TestCatalog, TestTarget};
use crate::constants::ALL_LABEL;
use crate::error::{FlowError, Result};

/// Which tests the test step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(TestTarget),
    All,
}

impl Selection {
    pub fn target(&self) -> Option<&TestTarget> {
        match self {
            Self::Single(target) => Some(target),
            Self::All => None,
        }
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(target) => write!(f, "{target}"),
            Self::All => f.write_str(ALL_LABEL),
        }
    }
}

/// Parses a menu answer. Blank input selects index 0; anything that is not a
/// non-negative integer is rejected. Integers too large for `usize` saturate,
/// which still means "all" to the catalog.
pub fn parse_index(input: &str) -> Result<usize> {
    let value = input.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<usize>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(usize::MAX),
        _ => Err(FlowError::InvalidSelection(value.to_string())),
    })
}

/// Renders `index: target` rows followed by the `N: All` row.
pub fn render_menu(catalog: &TestCatalog) -> String {
    let mut menu = String::new();
    for (index, target) in catalog.iter().enumerate() {
        menu.push_str(&format!("{index}: {target}\n"));
    }
    menu.push_str(&format!("{}: {ALL_LABEL}\n", catalog.len()));
    menu
}
