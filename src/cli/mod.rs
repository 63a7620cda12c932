pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BatchArgs, CliArgs, Commands, ConvertArgs, EnvelopeArgs, VersionsArgs};
pub use output::{OutputFormat, OutputFormatter};
