//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, Command, LayoutCommand, OutputFormat, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_dataset(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn layout(path: PathBuf) -> LayoutCommand {
    LayoutCommand {
        path,
        category: None,
        width: 300.0,
        height: 100.0,
        padding: 4.0,
        format: OutputFormat::Text,
    }
}

pub(super) fn run_expecting_error(command: LayoutCommand, panic_msg: &str) -> CliError {
    match run_cli(Cli {
        command: Command::Layout(command),
    }) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
