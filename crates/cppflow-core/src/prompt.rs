//! Console prompts.
//!
//! All console traffic goes through [`Prompt`], which is generic over its
//! reader and writer so sessions can be driven from memory in tests.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use crate::catalog::TestCatalog;
use crate::command::TopLevelChoice;
use crate::error::{FlowError, Result};
use crate::selection::{parse_index, render_menu, Selection};

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks for the top-level action. A `preset` answer is echoed instead of
    /// reading from the input.
    pub fn top_level(&mut self, preset: Option<&str>) -> Result<TopLevelChoice> {
        let menu = TopLevelChoice::menu();
        let answer = self.ask(&menu, "Selection (0): ", preset)?;
        TopLevelChoice::from_str(&answer)
    }

    /// Shows the catalog and asks which test to run.
    pub fn test_selection(
        &mut self,
        catalog: &TestCatalog,
        preset: Option<&str>,
    ) -> Result<Selection> {
        let menu = render_menu(catalog);
        let answer = self.ask(&menu, "Test (0): ", preset)?;
        let index = parse_index(&answer)?;
        Ok(catalog.select(index))
    }

    /// Writes free-form text, e.g. progress headers.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").map_err(FlowError::Console)
    }

    fn ask(&mut self, menu: &str, question: &str, preset: Option<&str>) -> Result<String> {
        write!(self.output, "{menu}{question}").map_err(FlowError::Console)?;

        let answer = match preset {
            Some(value) => {
                writeln!(self.output, "{value}").map_err(FlowError::Console)?;
                value.to_string()
            }
            None => {
                self.output.flush().map_err(FlowError::Console)?;
                let mut line = String::new();
                let read = self
                    .input
                    .read_line(&mut line)
                    .map_err(FlowError::Console)?;
                if read == 0 {
                    return Err(FlowError::Cancelled);
                }
                line
            }
        };

        debug!("prompt answer: {:?}", answer.trim());
        Ok(answer)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NamingConvention;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn catalog_with(names: &[&str]) -> (tempfile::TempDir, TestCatalog) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let catalog = TestCatalog::discover(dir.path(), &NamingConvention::default()).unwrap();
        (dir, catalog)
    }

    #[test]
    fn top_level_prints_menu_and_reads_answer() {
        let mut p = prompt("\n");
        assert_eq!(p.top_level(None).unwrap(), TopLevelChoice::Debug);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out, "0: Debug\nSelection (0): ");
    }

    #[test]
    fn top_level_rejects_unknown_answer() {
        let mut p = prompt("2\n");
        let err = p.top_level(None).expect_err("must fail");
        assert!(matches!(err, FlowError::InvalidTopLevelChoice(_)));
    }

    #[test]
    fn closed_input_cancels() {
        let mut p = prompt("");
        assert!(matches!(p.top_level(None), Err(FlowError::Cancelled)));
    }

    #[test]
    fn preset_answer_is_echoed_without_reading() {
        let mut p = prompt("");
        assert_eq!(p.top_level(Some("0")).unwrap(), TopLevelChoice::Debug);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.ends_with("Selection (0): 0\n"));
    }

    #[test]
    fn test_selection_defaults_to_first_target() {
        let (_dir, catalog) = catalog_with(&["vector_test.cpp"]);
        let mut p = prompt("\n");

        let selection = p.test_selection(&catalog, None).unwrap();
        assert_eq!(selection.target().map(|t| t.name()), Some("vector_test_unit"));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.starts_with("0: vector_test_unit\n1: All\n"));
    }

    #[test]
    fn test_selection_sentinel_row_runs_all() {
        let (_dir, catalog) = catalog_with(&["a.cpp", "b.cpp"]);
        let mut p = prompt("2\n");
        assert_eq!(p.test_selection(&catalog, None).unwrap(), Selection::All);
    }

    #[test]
    fn test_selection_surfaces_garbage() {
        let (_dir, catalog) = catalog_with(&["a.cpp"]);
        let mut p = prompt("first\n");
        let err = p.test_selection(&catalog, None).expect_err("must fail");
        assert!(matches!(err, FlowError::InvalidSelection(ref v) if v == "first"));
    }

    #[test]
    fn empty_catalog_blank_answer_runs_all() {
        let mut p = prompt("\n");
        let selection = p.test_selection(&TestCatalog::default(), None).unwrap();
        assert_eq!(selection, Selection::All);
    }
}
