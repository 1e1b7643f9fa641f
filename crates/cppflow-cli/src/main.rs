use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cppflow_core::constants::CONFIG_FILE;
use cppflow_core::{Answers, FlowConfig, FlowError, ProcessRunner, Prompt, Session};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod executor;
mod styles;
mod summary;

use styles as s;

/// Exit status for a run cancelled by the user (128 + SIGINT).
const EXIT_CANCELLED: u8 = 130;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Passed,
    /// At least one step did not succeed.
    Failed,
    Cancelled,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Passed => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
            Outcome::Cancelled => ExitCode::from(EXIT_CANCELLED),
        }
    }
}

/// The command-line interface for cppflow.
#[derive(Debug, Parser)]
#[command(name = "cpf")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(about = "Clean, build and test a CMake project, one test or all of them")]
#[command(
    long_about = "cppflow wipes the build directory, configures and builds the project with \
CMake, then runs CTest either for every test or for a single test target picked from the \
test sources (`test/<name>.cpp` registers `<name>_unit`).

Without arguments both menus are shown interactively. Blank answers pick entry 0."
)]
pub(crate) struct Cli {
    /// Top-level menu answer (0: Debug). Prompted for when omitted.
    choice: Option<String>,
    /// Test menu answer: a target index, or the last index for all tests.
    #[arg(long)]
    select: Option<String>,
    /// Path to the cppflow config file, relative to the project root.
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Project root containing CMakeLists.txt and the test directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    // Children share our process group and receive the signal themselves.
    ctrlc::set_handler(|| {
        eprintln!("\ninterrupted, exiting");
        std::process::exit(i32::from(EXIT_CANCELLED));
    })
    .context("failed to install interrupt handler")?;

    let stdin = io::stdin();
    let color = io::stdout().is_terminal();
    let outcome = execute(
        &cli,
        stdin.lock(),
        io::stdout(),
        &mut executor::SystemRunner,
        color,
    )?;
    Ok(outcome.into())
}

/// Runs one session against the configured project.
fn execute<R, W, P>(
    cli: &Cli,
    input: R,
    output: W,
    runner: &mut P,
    color: bool,
) -> Result<Outcome>
where
    R: BufRead,
    W: Write,
    P: ProcessRunner,
{
    let config_path = cli.root.join(&cli.config);
    let cfg = FlowConfig::load_from_file(&config_path)
        .with_context(|| format!("unable to load config '{}'", config_path.display()))?;

    let answers = Answers {
        top_level: cli.choice.as_deref(),
        test: cli.select.as_deref(),
    };
    let mut prompt = Prompt::new(input, output);

    match Session::new(&cfg, &cli.root).run(&mut prompt, runner, answers) {
        Ok(report) => {
            let mut output = prompt.into_output();
            write!(output, "{}", summary::render(&report, color))?;
            output.flush()?;
            if report.success() {
                Ok(Outcome::Passed)
            } else {
                Ok(Outcome::Failed)
            }
        }
        Err(FlowError::Cancelled) => {
            eprintln!("\ncancelled");
            Ok(Outcome::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cppflow_core::{Invocation, ProcessExit};
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeRunner {
        calls: Vec<Invocation>,
        code: i32,
    }

    impl ProcessRunner for FakeRunner {
        fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessExit> {
            self.calls.push(invocation.clone());
            Ok(ProcessExit {
                code: Some(self.code),
            })
        }
    }

    fn test_cli(root: &std::path::Path, args: &[&str]) -> Cli {
        let root = root.display().to_string();
        let mut argv = vec!["cpf", "--root", root.as_str()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments should parse")
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("test")).unwrap();
        fs::write(dir.path().join("test/vector_test.cpp"), "").unwrap();
        dir
    }

    fn run(cli: &Cli, input: &str, runner: &mut FakeRunner) -> (Result<Outcome>, String) {
        let mut out = Vec::new();
        let result = execute(cli, Cursor::new(input.to_string()), &mut out, runner, false);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["cpf"]).unwrap();
        assert_eq!(cli.choice, None);
        assert_eq!(cli.select, None);
        assert_eq!(cli.config, PathBuf::from("cppflow.toml"));
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn interactive_blank_answers_run_first_test() {
        let dir = project();
        let cli = test_cli(dir.path(), &[]);
        let mut runner = FakeRunner::default();

        let (result, out) = run(&cli, "\n\n", &mut runner);

        assert_eq!(result.unwrap(), Outcome::Passed);
        assert_eq!(
            runner.calls.last().unwrap().args,
            vec!["-V", "-R", "^vector_test_unit$"]
        );
        assert!(out.contains("  test       ok\n"));
    }

    #[test]
    fn failing_step_exits_with_failure() {
        let dir = project();
        let cli = test_cli(dir.path(), &["0", "--select", "1"]);
        let mut runner = FakeRunner {
            code: 8,
            ..Default::default()
        };

        let (result, out) = run(&cli, "", &mut runner);

        assert_eq!(result.unwrap(), Outcome::Failed);
        assert_eq!(runner.calls.len(), 3);
        assert!(out.contains("failed (exit 8)"));
    }

    #[test]
    fn invalid_choice_is_an_error() {
        let dir = project();
        let cli = test_cli(dir.path(), &["2"]);
        let mut runner = FakeRunner::default();

        let (result, _) = run(&cli, "", &mut runner);

        let err = result.expect_err("must fail");
        assert!(err.to_string().contains("invalid input '2'"));
        assert!(runner.calls.is_empty());
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn closed_input_is_a_cancel() {
        let dir = project();
        let cli = test_cli(dir.path(), &[]);
        let mut runner = FakeRunner::default();

        let (result, _) = run(&cli, "", &mut runner);
        assert_eq!(result.unwrap(), Outcome::Cancelled);
    }

    #[test]
    fn config_file_changes_layout() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("tests")).unwrap();
        fs::write(dir.path().join("tests/mat.cc"), "").unwrap();
        fs::write(
            dir.path().join("cppflow.toml"),
            "[project]\ntest_dir = \"tests\"\nbuild_dir = \"out\"\n\n[naming]\nextension = \".cc\"\nsuffix = \"_test\"\n",
        )
        .unwrap();
        let cli = test_cli(dir.path(), &["0", "--select", "0"]);
        let mut runner = FakeRunner::default();

        let (result, _) = run(&cli, "", &mut runner);

        assert_eq!(result.unwrap(), Outcome::Passed);
        assert!(dir.path().join("out").is_dir());
        assert_eq!(runner.calls.last().unwrap().args, vec!["-V", "-R", "^mat_test$"]);
    }

    #[test]
    fn build_dir_at_project_root_is_refused() {
        let dir = project();
        fs::write(dir.path().join("CMakeLists.txt"), "project(demo)").unwrap();
        fs::write(dir.path().join("cppflow.toml"), "[project]\nbuild_dir = \"\"\n").unwrap();
        let cli = test_cli(dir.path(), &["0", "--select", "0"]);
        let mut runner = FakeRunner::default();

        let (result, _) = run(&cli, "", &mut runner);

        let err = result.expect_err("must fail");
        assert!(format!("{err:#}").contains("build_dir"));
        assert!(runner.calls.is_empty());
        assert!(dir.path().join("CMakeLists.txt").exists());
        assert!(dir.path().join("test/vector_test.cpp").exists());
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = project();
        fs::write(dir.path().join("cppflow.toml"), "[project\n").unwrap();
        let cli = test_cli(dir.path(), &["0"]);
        let mut runner = FakeRunner::default();

        let (result, _) = run(&cli, "", &mut runner);
        let err = result.expect_err("must fail");
        assert!(err.to_string().contains("unable to load config"));
    }
}
