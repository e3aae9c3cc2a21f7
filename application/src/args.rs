//! [`Args`] definitions.

use clap::Parser;

/// GraphQL server of the materials, suppliers and purchasing ERP.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    ///
    /// Missing file is not an error: defaults and `CONF.*` environment
    /// variables are used then.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses [`Args`] of the current process.
    ///
    /// # Errors
    ///
    /// If the command line arguments are invalid.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
