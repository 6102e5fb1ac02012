//! Card stack library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod replay;

#[cfg(test)]
pub mod test_support;

/// How replay snapshots are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Indented JSON
    Pretty,
}
