#![allow(dead_code)]

#[path = "../../src/fixtures.rs"]
mod fixtures;

pub use fixtures::*;
use std::{
    io::Write as _,
    process::{Command, Stdio},
    str, thread,
};

/// Utility type for building an `ethwallet` command for integration tests.
pub struct Ethwallet {
    command: Command,
    stdin: Option<Vec<u8>>,
}

impl Ethwallet {
    /// Create a new `ethwallet` command builder using the Ganache mnemonic.
    pub fn new(subcommand: &str, args: &[&str]) -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_ethwallet"));
        command
            .env_clear()
            .env("MNEMONIC", fixtures::GANACHE_MNEMONIC)
            .arg(subcommand)
            .args(args);
        Self {
            command,
            stdin: None,
        }
    }

    /// Sets an environment variable for the command.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env(key, value);
        self
    }

    /// Removes an environment variable for the command.
    pub fn env_remove(mut self, key: &str) -> Self {
        self.command.env_remove(key);
        self
    }

    /// Sets the standard input to be used for the command.
    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(data.into());
        self
    }

    /// Executes the command and returns the standard output on success and
    /// standard error on failure.
    pub fn execute(mut self) -> Result<String, String> {
        self.command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut process = self.command.spawn().unwrap();

        let data = self.stdin.unwrap_or_default();
        let mut stdin = process.stdin.take().unwrap();
        let input = thread::spawn(move || {
            // The command may exit without reading its input.
            let _ = stdin.write_all(&data);
        });

        let output = process.wait_with_output().unwrap();
        input.join().unwrap();

        if output.status.success() {
            Ok(string_from_utf8(output.stdout))
        } else {
            Err(string_from_utf8(output.stderr))
        }
    }
}

/// Builds and executes an `ethwallet` command, panicking on failure.
pub fn exec(subcommand: &str, args: &[&str]) -> String {
    Ethwallet::new(subcommand, args).execute().unwrap()
}

/// Builds and executes an `ethwallet` command.
pub fn try_exec(subcommand: &str, args: &[&str]) -> Result<String, String> {
    Ethwallet::new(subcommand, args).execute()
}

fn string_from_utf8(bytes: Vec<u8>) -> String {
    str::from_utf8(&bytes).unwrap().trim().to_string()
}
