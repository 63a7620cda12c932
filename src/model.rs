//! Editions, namespaced identifiers and typed conversion requests

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::nbt::{Compound, Tag};

/// A Minecraft edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    Java,
    Bedrock,
}

impl Edition {
    pub fn name(&self) -> &'static str {
        match self {
            Edition::Java => "java",
            Edition::Bedrock => "bedrock",
        }
    }

    /// Capitalized form used in error messages ("Java", "Bedrock").
    pub fn display_name(&self) -> &'static str {
        match self {
            Edition::Java => "Java",
            Edition::Bedrock => "Bedrock",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("Unknown edition: {0}")]
pub struct UnknownEdition(pub String);

impl FromStr for Edition {
    type Err = UnknownEdition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(Edition::Java),
            "bedrock" => Ok(Edition::Bedrock),
            _ => Err(UnknownEdition(s.to_string())),
        }
    }
}

/// A block state value: editions store these as strings, bools or ints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Int(i32),
    String(String),
}

impl StateValue {
    /// The NBT encoding used by both editions for state values.
    pub fn to_nbt(&self) -> Tag {
        match self {
            StateValue::Bool(b) => Tag::Byte(*b as i8),
            StateValue::Int(i) => Tag::Int(*i),
            StateValue::String(s) => Tag::String(s.clone()),
        }
    }

    /// Read a state value back out of a tag. Bytes decode as bools, the
    /// wider integral kinds as ints.
    pub fn from_nbt(tag: &Tag) -> Option<StateValue> {
        match tag {
            Tag::Byte(b) => Some(StateValue::Bool(*b != 0)),
            Tag::Short(v) => Some(StateValue::Int(*v as i32)),
            Tag::Int(v) => Some(StateValue::Int(*v)),
            Tag::Long(v) => Some(StateValue::Int(*v as i32)),
            Tag::String(s) => Some(StateValue::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Bool(b) => write!(f, "{}", b),
            StateValue::Int(i) => write!(f, "{}", i),
            StateValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::String(s.to_string())
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<i32> for StateValue {
    fn from(i: i32) -> Self {
        StateValue::Int(i)
    }
}

/// Sorted state map. BTreeMap keeps comparisons and output deterministic.
pub type States = BTreeMap<String, StateValue>;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9_.\-]+:)?[a-z0-9_.\-/]+$").expect("identifier regex is valid")
});

#[derive(Debug, Error)]
#[error("Invalid identifier: {0}")]
pub struct InvalidIdentifier(pub String);

/// A namespaced identifier plus its state map, e.g.
/// `minecraft:stone_brick_stairs[facing=north, half=top]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    id: String,
    states: States,
}

impl Identifier {
    /// Parse an identifier string. A missing namespace defaults to
    /// `minecraft:`; the shape is validated against the vanilla charset.
    pub fn parse(id: &str, states: States) -> Result<Identifier, InvalidIdentifier> {
        if !IDENTIFIER_RE.is_match(id) {
            return Err(InvalidIdentifier(id.to_string()));
        }
        let id = if id.contains(':') {
            id.to_string()
        } else {
            format!("minecraft:{}", id)
        };
        Ok(Identifier { id, states })
    }

    /// Construct without validation, for ids already known to the mapping
    /// tables.
    pub fn new(id: impl Into<String>, states: States) -> Identifier {
        Identifier {
            id: id.into(),
            states,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The path part, without the namespace.
    pub fn path(&self) -> &str {
        self.id.split_once(':').map(|(_, p)| p).unwrap_or(&self.id)
    }

    pub fn states(&self) -> &States {
        &self.states
    }

    pub fn into_states(self) -> States {
        self.states
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)?;
        if !self.states.is_empty() {
            let rendered: Vec<String> = self
                .states
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "[{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}

/// Common parameters shared by every conversion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Source game version string, e.g. "1.20.4"
    #[serde(default = "default_java_version")]
    pub from_version: String,
    /// Target game version string, e.g. "1.20.80"
    #[serde(default = "default_bedrock_version")]
    pub to_version: String,
    pub from_edition: Edition,
    pub to_edition: Edition,
}

fn default_java_version() -> String {
    "1.20.4".to_string()
}

fn default_bedrock_version() -> String {
    "1.20.80".to_string()
}

impl Default for ConversionRequest {
    fn default() -> Self {
        ConversionRequest {
            from_version: default_java_version(),
            to_version: default_bedrock_version(),
            from_edition: Edition::Java,
            to_edition: Edition::Bedrock,
        }
    }
}

/// A block payload: identifier plus state properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(default, skip_serializing_if = "States::is_empty")]
    pub states: States,
}

#[derive(Debug, Clone)]
pub struct BlockRequest {
    pub common: ConversionRequest,
    pub block: Block,
}

/// Item stacks, entities and block entities travel as free-form NBT.
#[derive(Debug, Clone)]
pub struct ItemRequest {
    pub common: ConversionRequest,
    pub item: Compound,
}

#[derive(Debug, Clone)]
pub struct EntityRequest {
    pub common: ConversionRequest,
    pub entity: Compound,
}

#[derive(Debug, Clone)]
pub struct BlockEntityRequest {
    pub common: ConversionRequest,
    pub block_entity: Compound,
}

/// Biome input: `{name}` on the Java side, `{id}` on the Bedrock side.
#[derive(Debug, Clone)]
pub struct BiomeRequest {
    pub common: ConversionRequest,
    pub data: Compound,
}

/// Biome output, shaped by the target edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BiomeOutput {
    Name { name: String },
    Id { id: i32 },
}
