use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::catalog::TestCatalog;
use crate::command::TopLevelChoice;
use crate::config::FlowConfig;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineReport};
use crate::prompt::Prompt;
use crate::runner::ProcessRunner;

/// Answers supplied up front instead of being read from the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct Answers<'a> {
    pub top_level: Option<&'a str>,
    pub test: Option<&'a str>,
}

/// One interactive run against the project rooted at `root`.
#[derive(Debug)]
pub struct Session<'a> {
    cfg: &'a FlowConfig,
    root: PathBuf,
}

impl<'a> Session<'a> {
    pub fn new(cfg: &'a FlowConfig, root: &Path) -> Self {
        Self {
            cfg,
            root: root.to_path_buf(),
        }
    }

    /// Asks for the top-level action and performs it. Nothing touches the
    /// filesystem or spawns a process until a valid action was chosen.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn run<R, W, P>(
        &self,
        prompt: &mut Prompt<R, W>,
        runner: &mut P,
        answers: Answers<'_>,
    ) -> Result<PipelineReport>
    where
        R: BufRead,
        W: Write,
        P: ProcessRunner,
    {
        match prompt.top_level(answers.top_level)? {
            TopLevelChoice::Debug => self.debug(prompt, runner, answers.test),
        }
    }

    fn debug<R, W, P>(
        &self,
        prompt: &mut Prompt<R, W>,
        runner: &mut P,
        preset: Option<&str>,
    ) -> Result<PipelineReport>
    where
        R: BufRead,
        W: Write,
        P: ProcessRunner,
    {
        prompt.say("0. Clean & Test")?;

        let test_dir = self.cfg.project.test_dir_in(&self.root);
        let catalog = TestCatalog::discover(&test_dir, &self.cfg.naming_convention())?;
        let selection = prompt.test_selection(&catalog, preset)?;
        info!(target: "cppflow", "selected tests: {selection}");

        Pipeline::from_config(self.cfg, &self.root).run(runner, &selection)
    }
}
