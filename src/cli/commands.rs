use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::convert::Kind;
use crate::model::Edition;

/// Minecraft Java/Bedrock data conversion
#[derive(Parser, Debug)]
#[command(
    name = "crocon",
    about = "Convert Minecraft data between Java and Bedrock editions",
    version,
    author,
    long_about = "crocon converts Minecraft data structures (blocks, items, entities, \
                  biomes, block entities) between the Java and Bedrock editions, \
                  honoring per-version mapping tables on both sides. Payloads are JSON \
                  on the command line and NBT on the FFI wire."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (debug logging)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Path to a TOML config profile"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Convert a single data structure",
        long_about = "Converts one JSON payload between editions.\n\n\
                      Examples:\n  \
                      crocon convert block '{\"id\": \"minecraft:stone\"}'\n  \
                      crocon convert block --input block.json --format yaml\n  \
                      crocon convert item '{\"id\": \"minecraft:melon_slice\", \"Count\": 3}'\n  \
                      crocon convert biome '{\"id\": 1}' --from-edition bedrock --to-edition java\n  \
                      crocon convert block-entity --input chest.json --from-version 1.18.2"
    )]
    Convert(ConvertArgs),

    #[command(
        about = "Convert a JSONL file of requests",
        long_about = "Runs one conversion per line of a JSONL file. Each line is an object \
                      with \"kind\", optional edition/version fields and the \"data\" \
                      payload.\n\n\
                      Examples:\n  \
                      crocon batch requests.jsonl\n  \
                      crocon batch requests.jsonl --fail-fast --format json"
    )]
    Batch(BatchArgs),

    #[command(
        about = "Run a raw Base64 envelope through the wire path",
        long_about = "Feeds a Base64/NBT envelope through the exact conversion path the \
                      C ABI uses and prints the Base64 response. The wire-format \
                      debugging tool.\n\n\
                      Examples:\n  \
                      crocon envelope block CgAA...\n  \
                      cat envelope.b64 | crocon envelope item"
    )]
    Envelope(EnvelopeArgs),

    #[command(
        about = "List supported game versions",
        long_about = "Lists the versions the shipped mapping tables cover.\n\n\
                      Examples:\n  \
                      crocon versions\n  \
                      crocon versions --edition bedrock --format json"
    )]
    Versions(VersionsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    #[arg(value_enum, help = "What the payload describes")]
    pub kind: KindArg,

    #[arg(
        value_name = "JSON",
        help = "JSON payload (omit to read --input or stdin)"
    )]
    pub payload: Option<String>,

    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        conflicts_with = "payload",
        help = "Read the JSON payload from a file"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "java", help = "Source edition")]
    pub from_edition: EditionArg,

    #[arg(long, value_enum, default_value = "bedrock", help = "Target edition")]
    pub to_edition: EditionArg,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Source game version (defaults to the configured edition default)"
    )]
    pub from_version: Option<String>,

    #[arg(
        long,
        value_name = "VERSION",
        help = "Target game version (defaults to the configured edition default)"
    )]
    pub to_version: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    #[arg(value_name = "FILE", help = "JSONL file, one request object per line")]
    pub file: PathBuf,

    #[arg(long, help = "Stop at the first failing line")]
    pub fail_fast: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct EnvelopeArgs {
    #[arg(value_enum, help = "What the envelope's data describes")]
    pub kind: KindArg,

    #[arg(value_name = "BASE64", help = "Base64 envelope (omit to read stdin)")]
    pub payload: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct VersionsArgs {
    #[arg(long, value_enum, help = "Restrict to one edition")]
    pub edition: Option<EditionArg>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Block,
    Item,
    Entity,
    Biome,
    BlockEntity,
}

impl From<KindArg> for Kind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Block => Kind::Block,
            KindArg::Item => Kind::Item,
            KindArg::Entity => Kind::Entity,
            KindArg::Biome => Kind::Biome,
            KindArg::BlockEntity => Kind::BlockEntity,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditionArg {
    Java,
    Bedrock,
}

impl From<EditionArg> for Edition {
    fn from(arg: EditionArg) -> Self {
        match arg {
            EditionArg::Java => Edition::Java,
            EditionArg::Bedrock => Edition::Bedrock,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
