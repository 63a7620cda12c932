//! Per-edition resolvers over the intermediate model
//!
//! A [`ResolverSet`] is built for one (edition, version) pair and resolves
//! edition data to and from the intermediate (Java-flavored) model: blocks,
//! item stacks, entities, biomes and block entities. Construction indexes
//! the mapping tables; after that a resolver is immutable and shared behind
//! an `Arc` in the version cache.

pub mod translators;

pub(crate) mod text;

mod biome;
mod block;
mod block_entity;
mod entity;
mod item;

pub use block::IntermediateBlock;
pub use block_entity::IntermediateBlockEntity;
pub use entity::IntermediateEntity;
pub use item::{Enchantment, IntermediateItem};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::mappings::Mappings;
use crate::model::Edition;
use crate::versions::GameVersion;

/// Similarity floor for "did you mean" hints on unknown identifiers.
const SUGGESTION_THRESHOLD: f64 = 0.88;

/// Tag integers arrive widened to i64; narrow by clamping so hand-written
/// out-of-range input saturates instead of wrapping.
pub(crate) fn clamp_i8(value: i64, field: &'static str) -> i8 {
    if i8::try_from(value).is_err() {
        tracing::warn!(field, value, "Clamping out-of-range integer");
    }
    value.clamp(i8::MIN as i64, i8::MAX as i64) as i8
}

pub(crate) fn clamp_i16(value: i64, field: &'static str) -> i16 {
    if i16::try_from(value).is_err() {
        tracing::warn!(field, value, "Clamping out-of-range integer");
    }
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

pub(crate) fn clamp_i32(value: i64, field: &'static str) -> i32 {
    if i32::try_from(value).is_err() {
        tracing::warn!(field, value, "Clamping out-of-range integer");
    }
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// An optional nearest-name hint rendered into unknown-identifier errors.
#[derive(Debug, Clone, Default)]
pub struct Suggestion(pub Option<String>);

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(name) => write!(f, " (did you mean '{}'?)", name),
            None => Ok(()),
        }
    }
}

/// Errors produced while resolving edition data through the intermediate
/// model. The message text is part of the wire contract and is asserted by
/// consumers; change it deliberately.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Unknown or invalid {edition} block ID: {id}{suggestion}")]
    UnknownBlock {
        edition: &'static str,
        id: String,
        suggestion: Suggestion,
    },

    #[error("Failed to convert block from {from} to {to}: {id}")]
    BlockWriteFailed {
        from: &'static str,
        to: &'static str,
        id: String,
    },

    #[error("Failed to parse {edition} item NBT for ID: {id}")]
    ItemParse { edition: &'static str, id: String },

    #[error("Java 1.20.5+ item components are not supported")]
    UnsupportedComponents,

    #[error("Unknown or invalid {edition} item ID: {id}{suggestion}")]
    UnknownItem {
        edition: &'static str,
        id: String,
        suggestion: Suggestion,
    },

    #[error("Failed to convert item to {to} format for ID: {id}")]
    ItemWriteFailed { to: &'static str, id: String },

    #[error("Failed to parse {edition} entity NBT. ID: {id}")]
    EntityParse { edition: &'static str, id: String },

    #[error("Entity type '{id}' has no {to} counterpart")]
    EntityNoCounterpart { id: String, to: &'static str },

    #[error("Failed to convert entity to {to} format")]
    EntityWriteFailed { to: &'static str },

    #[error("Input data for Java biome conversion must contain a 'name' field.")]
    MissingBiomeName,

    #[error("Input data for Bedrock biome conversion must contain an 'id' field.")]
    MissingBiomeId,

    #[error("Unknown or invalid Java biome name: {name}")]
    UnknownBiomeName { name: String },

    #[error("Unknown or invalid Bedrock biome ID: {id}")]
    UnknownBiomeId { id: i64 },

    #[error("Failed to convert biome to Java name: {biome}")]
    BiomeToJavaFailed { biome: String },

    #[error("Failed to convert biome to Bedrock ID: {biome}")]
    BiomeToBedrockFailed { biome: String },

    #[error("Failed to parse {edition} block entity NBT. ID: {id}")]
    BlockEntityParse { edition: &'static str, id: String },

    #[error("Failed to convert block entity to {to} format")]
    BlockEntityWriteFailed { to: &'static str },
}

/// Resolvers for one (edition, version) pair.
pub struct ResolverSet {
    edition: Edition,
    version: GameVersion,
    mappings: Arc<Mappings>,

    // (record index, variant index) candidates per edition block id
    block_by_id: HashMap<String, Vec<(usize, usize)>>,
    block_by_intermediate: HashMap<String, usize>,

    item_by_id: HashMap<String, Vec<(usize, usize)>>,
    item_by_intermediate: HashMap<String, usize>,

    entity_by_id: HashMap<String, usize>,
    entity_by_intermediate: HashMap<String, usize>,

    biome_by_java_name: HashMap<String, usize>,
    biome_by_bedrock_id: HashMap<i32, usize>,

    block_entity_by_id: HashMap<String, usize>,
    block_entity_by_intermediate: HashMap<String, usize>,

    enchantment_by_java: HashMap<String, i16>,
    enchantment_by_bedrock: HashMap<i16, String>,
}

impl fmt::Debug for ResolverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverSet")
            .field("edition", &self.edition)
            .field("version", &self.version)
            .finish()
    }
}

impl ResolverSet {
    pub fn new(edition: Edition, version: GameVersion, mappings: Arc<Mappings>) -> ResolverSet {
        let mut block_by_id: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        let mut block_by_intermediate = HashMap::new();
        for (r, record) in mappings.blocks.iter().enumerate() {
            block_by_intermediate.insert(record.intermediate.clone(), r);
            for (v, variant) in record.variants(edition).iter().enumerate() {
                block_by_id.entry(variant.id.clone()).or_default().push((r, v));
            }
        }

        let mut item_by_id: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        let mut item_by_intermediate = HashMap::new();
        for (r, record) in mappings.items.iter().enumerate() {
            item_by_intermediate.insert(record.intermediate.clone(), r);
            for (v, variant) in record.variants(edition).iter().enumerate() {
                item_by_id.entry(variant.id.clone()).or_default().push((r, v));
            }
        }

        let mut entity_by_id = HashMap::new();
        let mut entity_by_intermediate = HashMap::new();
        for (r, record) in mappings.entities.iter().enumerate() {
            entity_by_intermediate.insert(record.intermediate.clone(), r);
            let edition_id = match edition {
                Edition::Java => &record.java,
                Edition::Bedrock => &record.bedrock,
            };
            if let Some(id) = edition_id {
                entity_by_id.insert(id.clone(), r);
            }
        }

        let mut biome_by_java_name = HashMap::new();
        let mut biome_by_bedrock_id = HashMap::new();
        for (r, record) in mappings.biomes.iter().enumerate() {
            biome_by_java_name.insert(record.java.clone(), r);
            biome_by_bedrock_id.insert(record.bedrock_id, r);
        }

        let mut block_entity_by_id = HashMap::new();
        let mut block_entity_by_intermediate = HashMap::new();
        for (r, record) in mappings.block_entities.iter().enumerate() {
            block_entity_by_intermediate.insert(record.intermediate.clone(), r);
            let edition_id = match edition {
                Edition::Java => &record.java,
                Edition::Bedrock => &record.bedrock,
            };
            block_entity_by_id.insert(edition_id.clone(), r);
        }

        let mut enchantment_by_java = HashMap::new();
        let mut enchantment_by_bedrock = HashMap::new();
        for record in &mappings.enchantments {
            enchantment_by_java.insert(record.java.clone(), record.bedrock_id);
            enchantment_by_bedrock.insert(record.bedrock_id, record.java.clone());
        }

        ResolverSet {
            edition,
            version,
            mappings,
            block_by_id,
            block_by_intermediate,
            item_by_id,
            item_by_intermediate,
            entity_by_id,
            entity_by_intermediate,
            biome_by_java_name,
            biome_by_bedrock_id,
            block_entity_by_id,
            block_entity_by_intermediate,
            enchantment_by_java,
            enchantment_by_bedrock,
        }
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    /// Best Jaro-Winkler match above the threshold among `candidates`.
    fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a String>) -> Suggestion {
        let mut best: Option<(f64, &str)> = None;
        for candidate in candidates {
            let score = strsim::jaro_winkler(input, candidate);
            if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(b, _)| score > b) {
                best = Some((score, candidate));
            }
        }
        Suggestion(best.map(|(_, name)| name.to_string()))
    }

    pub(crate) fn suggest_block_id(&self, input: &str) -> Suggestion {
        Self::suggest(input, self.block_by_id.keys())
    }

    pub(crate) fn suggest_item_id(&self, input: &str) -> Suggestion {
        Self::suggest(input, self.item_by_id.keys())
    }
}
