use std::io;
use std::process::{Command, Stdio};

use super::{ExitOutcome, ProcessRunner};

/// Runs actions as child processes without a shell.
///
/// The environment is inherited; stdout and stderr are discarded because
/// stdout belongs to the picker protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, argv: &[String]) -> io::Result<ExitOutcome> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(ExitOutcome::Success)
        } else {
            Ok(ExitOutcome::Failed(status.code()))
        }
    }
}
