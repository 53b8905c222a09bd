//! Support library for the dendrograph CLI binary.
//!
//! Re-exports the CLI and logging modules so doctests and integration tests
//! can exercise the layout pipeline without forking a subprocess.

pub mod cli;
pub mod logging;
