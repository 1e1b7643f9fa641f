use std::io;
use std::process::Command;

use cppflow_core::{Invocation, ProcessExit, ProcessRunner};
use tracing::{debug, instrument};

/// Runs programs on the host with the console inherited, so build and test
/// output streams straight to the user.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    #[instrument(skip(self), fields(command = %invocation.command_line()))]
    fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessExit> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        let status = command.status()?;
        debug!("'{}' exited with {}", invocation.program, status);
        Ok(ProcessExit {
            code: status.code(),
        })
    }
}
