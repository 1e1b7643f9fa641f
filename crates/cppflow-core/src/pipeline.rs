//! The clean → configure → build → test pipeline.

use std::error::Error as _;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::config::{FlowConfig, ToolchainConfig};
use crate::error::{FlowError, Result};
use crate::runner::{Invocation, ProcessRunner};
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Clean,
    Configure,
    Build,
    Test,
}

impl Step {
    pub const ALL: [Self; 4] = [Self::Clean, Self::Configure, Self::Build, Self::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// The program ran and exited unsuccessfully; `None` means killed by a signal.
    Failed { code: Option<i32> },
    /// The program could not be started.
    NotLaunched { reason: String },
    /// Not attempted because an earlier program could not be started.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    /// `None` for the clean step, which runs in-process.
    pub invocation: Option<Invocation>,
}

/// Outcome of every step of one pipeline run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    steps: Vec<StepReport>,
}

impl PipelineReport {
    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    pub fn get(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|report| report.step == step)
    }

    pub fn status(&self, step: Step) -> Option<&StepStatus> {
        self.get(step).map(|report| &report.status)
    }

    /// True when every step ran and succeeded.
    pub fn success(&self) -> bool {
        !self.steps.is_empty()
            && self
                .steps
                .iter()
                .all(|report| report.status == StepStatus::Succeeded)
    }
}

/// Removes `path` if it exists and creates it again, empty.
pub fn ensure_empty_dir(path: &Path) -> Result<()> {
    let to_clean_error = |source| FlowError::Clean {
        path: path.to_path_buf(),
        source,
    };

    match std::fs::remove_dir_all(path) {
        Ok(()) => debug!("removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} absent, nothing to remove", path.display())
        }
        Err(e) => return Err(to_clean_error(e)),
    }

    std::fs::create_dir_all(path).map_err(to_clean_error)
}

/// Drives the external build system and test runner for one project.
#[derive(Debug, Clone)]
pub struct Pipeline {
    source_root: PathBuf,
    build_dir: PathBuf,
    toolchain: ToolchainConfig,
}

impl Pipeline {
    pub fn new(source_root: PathBuf, build_dir: PathBuf, toolchain: ToolchainConfig) -> Self {
        Self {
            source_root,
            build_dir,
            toolchain,
        }
    }

    /// Builds a pipeline for the project rooted at `root`.
    pub fn from_config(cfg: &FlowConfig, root: &Path) -> Self {
        Self::new(
            root.to_path_buf(),
            cfg.project.build_dir_in(root),
            cfg.toolchain.clone(),
        )
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn configure_invocation(&self) -> Invocation {
        Invocation::new(
            &self.toolchain.configure,
            [
                OsString::from("-S"),
                self.source_root.clone().into_os_string(),
                OsString::from("-B"),
                self.build_dir.clone().into_os_string(),
            ],
        )
    }

    pub fn build_invocation(&self) -> Invocation {
        let mut args = vec![
            OsString::from("--build"),
            self.build_dir.clone().into_os_string(),
        ];
        if let Some(config) = self.toolchain.build_config() {
            args.push(OsString::from("--config"));
            args.push(OsString::from(config));
        }
        Invocation::new(&self.toolchain.build, args)
    }

    /// The test runner matches `-R` as a regex, so the target name is escaped
    /// and anchored to select exactly one test.
    pub fn test_invocation(&self, selection: &Selection) -> Invocation {
        let mut args = vec!["-V".to_string()];
        if let Some(target) = selection.target() {
            args.push("-R".to_string());
            args.push(format!("^{}$", regex::escape(target.name())));
        }
        Invocation::new(&self.toolchain.test, args).in_dir(&self.build_dir)
    }

    /// Runs every step in order.
    ///
    /// A failed clean aborts with an error. A program exiting unsuccessfully is
    /// recorded and the next step still runs. A program that cannot be started
    /// ends the run; the remaining steps are reported as skipped.
    #[instrument(skip(self, runner), fields(build_dir = %self.build_dir.display()))]
    pub fn run<R: ProcessRunner>(
        &self,
        runner: &mut R,
        selection: &Selection,
    ) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        info!(target: "cppflow", "clean {}", self.build_dir.display());
        self.check_build_dir()?;
        ensure_empty_dir(&self.build_dir)?;
        report.steps.push(StepReport {
            step: Step::Clean,
            status: StepStatus::Succeeded,
            invocation: None,
        });

        let external = [
            (Step::Configure, self.configure_invocation()),
            (Step::Build, self.build_invocation()),
            (Step::Test, self.test_invocation(selection)),
        ];

        let mut launch_failed = false;
        for (step, invocation) in external {
            let status = if launch_failed {
                debug!("skip {step}: an earlier program could not be started");
                StepStatus::Skipped
            } else {
                info!(target: "cppflow", "{step}: {invocation}");
                match runner.run(&invocation) {
                    Ok(exit) if exit.success() => StepStatus::Succeeded,
                    Ok(exit) => {
                        warn!("{step} exited with {:?}, continuing", exit.code);
                        StepStatus::Failed { code: exit.code }
                    }
                    Err(source) => {
                        launch_failed = true;
                        let reason = describe_launch_error(&invocation.program, source);
                        warn!("{step}: {reason}");
                        StepStatus::NotLaunched { reason }
                    }
                }
            };

            report.steps.push(StepReport {
                step,
                status,
                invocation: Some(invocation),
            });
        }

        Ok(report)
    }
}

impl Pipeline {
    /// Refuses to clean anything that is not strictly below the source root.
    fn check_build_dir(&self) -> Result<()> {
        let below_root = self
            .build_dir
            .strip_prefix(&self.source_root)
            .map(|rel| {
                rel.components().next().is_some()
                    && rel.components().all(|c| matches!(c, Component::Normal(_)))
            })
            .unwrap_or(false);
        if below_root {
            return Ok(());
        }

        Err(FlowError::Clean {
            path: self.build_dir.clone(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "build directory must be below the project root '{}'",
                    self.source_root.display()
                ),
            ),
        })
    }
}

fn describe_launch_error(program: &str, source: io::Error) -> String {
    let err = FlowError::ProcessInvocation {
        program: program.to_string(),
        source,
    };
    match err.source() {
        Some(cause) => format!("{err}: {cause}"),
        None => err.to_string(),
    }
}
