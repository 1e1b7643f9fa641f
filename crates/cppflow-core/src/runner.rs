use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

/// One external program launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The executable program (e.g., "cmake", "ctest").
    pub program: String,
    /// The arguments to pass to the program. Paths are kept as OS strings.
    pub args: Vec<OsString>,
    /// Working directory; the caller's when `None`.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The command for display; non-UTF-8 arguments are shown lossily.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())?;
        if let Some(cwd) = &self.cwd {
            write!(f, " (in {})", cwd.display())?;
        }
        Ok(())
    }
}

/// How a finished process exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

/// Launches external programs and waits for them.
///
/// Implementations block until the child exits. An `Err` means the program
/// could not be started at all.
pub trait ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessExit>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &mut T {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessExit> {
        (**self).run(invocation)
    }
}
