//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::errors::ToolError;
use crate::process::CommandRunner;

/// A [`CommandRunner`] answering from a fixed script keyed by the full
/// command line (`program arg1 arg2 ...`).
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, Result<String, i32>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `stdout`.
    pub fn respond(mut self, command: &str, stdout: &str) -> Self {
        self.responses.insert(command.to_string(), Ok(stdout.to_string()));
        self
    }

    /// Fail `command` with `exit_code`.
    pub fn fail(mut self, command: &str, exit_code: i32) -> Self {
        self.responses.insert(command.to_string(), Err(exit_code));
        self
    }

    /// Every command line issued so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> Result<String, ToolError> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());

        match self.responses.get(&line) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(code)) => Err(ToolError::CommandFailed {
                program: program.to_string(),
                exit_code: *code,
                stderr: format!("scripted failure for '{}'", line),
            }),
            None => Err(ToolError::CommandFailed {
                program: program.to_string(),
                exit_code: 127,
                stderr: format!("unscripted command '{}'", line),
            }),
        }
    }
}
