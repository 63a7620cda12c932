//! Versioned mapping data
//!
//! The mapping tables ship as JSON embedded in the crate and are parsed once
//! per resolver construction. Block records name an intermediate block and,
//! per edition, one or more variants; variants carry version gates
//! (`since`/`until`) expressing real renames and flattenings, discriminating
//! fixed states (`set`), implied intermediate states (`when`) and the name of
//! a code-backed state translator.
//!
//! Validation happens at load: bad version strings, unknown translator
//! names and duplicate edition ids inside overlapping version ranges are
//! construction errors rather than latent panics.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{Edition, StateValue};
use crate::resolve::translators;
use crate::versions::GameVersion;

const BLOCKS_JSON: &str = include_str!("data/blocks.json");
const BIOMES_JSON: &str = include_str!("data/biomes.json");
const ITEMS_JSON: &str = include_str!("data/items.json");
const ENTITIES_JSON: &str = include_str!("data/entities.json");
const BLOCK_ENTITIES_JSON: &str = include_str!("data/block_entities.json");
const ENCHANTMENTS_JSON: &str = include_str!("data/enchantments.json");

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Failed to parse {dataset} mapping data: {source}")]
    Parse {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid version gate '{value}' in {dataset} record '{record}'")]
    BadVersion {
        dataset: &'static str,
        record: String,
        value: String,
    },

    #[error("Unknown state translator '{name}' in block record '{record}'")]
    UnknownTranslator { record: String, name: String },

    #[error(
        "Duplicate {edition} id '{id}' with overlapping version ranges in block mapping data"
    )]
    DuplicateVariant { edition: Edition, id: String },
}

/// An inclusive-from, exclusive-to version window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VersionGate {
    pub since: Option<GameVersion>,
    pub until: Option<GameVersion>,
}

impl VersionGate {
    pub fn contains(&self, version: GameVersion) -> bool {
        if let Some(since) = self.since {
            if version < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if version >= until {
                return false;
            }
        }
        true
    }

    pub fn overlaps(&self, other: &VersionGate) -> bool {
        let starts_before_other_ends = match (self.since, other.until) {
            (Some(since), Some(until)) => since < until,
            _ => true,
        };
        let other_starts_before_self_ends = match (other.since, self.until) {
            (Some(since), Some(until)) => since < until,
            _ => true,
        };
        starts_before_other_ends && other_starts_before_self_ends
    }
}

fn parse_gate(
    dataset: &'static str,
    record: &str,
    since: &Option<String>,
    until: &Option<String>,
) -> Result<VersionGate, MappingError> {
    let parse = |value: &Option<String>| -> Result<Option<GameVersion>, MappingError> {
        match value {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| MappingError::BadVersion {
                    dataset,
                    record: record.to_string(),
                    value: s.clone(),
                }),
        }
    };
    Ok(VersionGate {
        since: parse(since)?,
        until: parse(until)?,
    })
}

// Raw serde shapes; the typed tables below are built from these at load.

#[derive(Debug, Deserialize)]
struct RawBlockVariant {
    id: String,
    #[serde(default)]
    since: Option<String>,
    #[serde(default)]
    until: Option<String>,
    #[serde(default)]
    when: BTreeMap<String, StateValue>,
    #[serde(default)]
    set: BTreeMap<String, StateValue>,
    #[serde(default)]
    states: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBlockRecord {
    intermediate: String,
    #[serde(default)]
    java: Vec<RawBlockVariant>,
    #[serde(default)]
    bedrock: Vec<RawBlockVariant>,
}

/// One edition-side block variant, gates parsed and translator verified.
#[derive(Debug, Clone)]
pub struct BlockVariant {
    pub id: String,
    pub gate: VersionGate,
    /// Intermediate states that select this variant when writing and are
    /// implied when reading.
    pub when: BTreeMap<String, StateValue>,
    /// Fixed edition-side states emitted when writing and used as
    /// discriminators (then stripped) when reading.
    pub set: BTreeMap<String, StateValue>,
    /// Registered state translator; `None` is passthrough.
    pub translator: Option<&'static translators::Translator>,
}

#[derive(Debug, Clone)]
pub struct BlockRecord {
    pub intermediate: String,
    pub java: Vec<BlockVariant>,
    pub bedrock: Vec<BlockVariant>,
}

impl BlockRecord {
    pub fn variants(&self, edition: Edition) -> &[BlockVariant] {
        match edition {
            Edition::Java => &self.java,
            Edition::Bedrock => &self.bedrock,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBiomeRecord {
    intermediate: String,
    java: String,
    bedrock_id: i32,
    #[serde(default)]
    java_since: Option<String>,
    #[serde(default)]
    bedrock_since: Option<String>,
}

/// Biomes added mid-stream carry per-edition `since` gates; the editions
/// number their releases differently.
#[derive(Debug, Clone)]
pub struct BiomeRecord {
    pub intermediate: String,
    pub java: String,
    pub bedrock_id: i32,
    pub java_gate: VersionGate,
    pub bedrock_gate: VersionGate,
}

impl BiomeRecord {
    pub fn gate(&self, edition: Edition) -> &VersionGate {
        match edition {
            Edition::Java => &self.java_gate,
            Edition::Bedrock => &self.bedrock_gate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawItemVariant {
    id: String,
    #[serde(default)]
    since: Option<String>,
    #[serde(default)]
    until: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItemRecord {
    intermediate: String,
    java: Vec<RawItemVariant>,
    bedrock: Vec<RawItemVariant>,
    #[serde(default)]
    block_item: bool,
}

#[derive(Debug, Clone)]
pub struct ItemVariant {
    pub id: String,
    pub gate: VersionGate,
}

#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub intermediate: String,
    pub java: Vec<ItemVariant>,
    pub bedrock: Vec<ItemVariant>,
    /// Block-items fall through to the block table when absent here.
    pub block_item: bool,
}

impl ItemRecord {
    pub fn variants(&self, edition: Edition) -> &[ItemVariant] {
        match edition {
            Edition::Java => &self.java,
            Edition::Bedrock => &self.bedrock,
        }
    }
}

/// Entity type pair; a missing side means the type has no counterpart in
/// that edition.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    pub intermediate: String,
    #[serde(default)]
    pub java: Option<String>,
    #[serde(default)]
    pub bedrock: Option<String>,
}

/// Block entity id pair: Java namespaced id, Bedrock PascalCase id.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockEntityRecord {
    pub intermediate: String,
    pub java: String,
    pub bedrock: String,
    /// Containers hold an `Items` list that converts recursively.
    #[serde(default)]
    pub container: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnchantmentRecord {
    pub java: String,
    pub bedrock_id: i16,
}

/// All mapping tables, parsed and validated.
#[derive(Debug)]
pub struct Mappings {
    pub blocks: Vec<BlockRecord>,
    pub biomes: Vec<BiomeRecord>,
    pub items: Vec<ItemRecord>,
    pub entities: Vec<EntityRecord>,
    pub block_entities: Vec<BlockEntityRecord>,
    pub enchantments: Vec<EnchantmentRecord>,
}

impl Mappings {
    /// Parse and validate the embedded datasets.
    pub fn load() -> Result<Mappings, MappingError> {
        let raw_blocks: Vec<RawBlockRecord> =
            serde_json::from_str(BLOCKS_JSON).map_err(|source| MappingError::Parse {
                dataset: "blocks",
                source,
            })?;
        let raw_biomes: Vec<RawBiomeRecord> =
            serde_json::from_str(BIOMES_JSON).map_err(|source| MappingError::Parse {
                dataset: "biomes",
                source,
            })?;
        let raw_items: Vec<RawItemRecord> =
            serde_json::from_str(ITEMS_JSON).map_err(|source| MappingError::Parse {
                dataset: "items",
                source,
            })?;
        let entities: Vec<EntityRecord> =
            serde_json::from_str(ENTITIES_JSON).map_err(|source| MappingError::Parse {
                dataset: "entities",
                source,
            })?;
        let block_entities: Vec<BlockEntityRecord> = serde_json::from_str(BLOCK_ENTITIES_JSON)
            .map_err(|source| MappingError::Parse {
                dataset: "block_entities",
                source,
            })?;
        let enchantments: Vec<EnchantmentRecord> = serde_json::from_str(ENCHANTMENTS_JSON)
            .map_err(|source| MappingError::Parse {
                dataset: "enchantments",
                source,
            })?;

        let mut blocks = Vec::with_capacity(raw_blocks.len());
        for raw in raw_blocks {
            blocks.push(BlockRecord {
                java: build_variants("blocks", &raw.intermediate, raw.java)?,
                bedrock: build_variants("blocks", &raw.intermediate, raw.bedrock)?,
                intermediate: raw.intermediate,
            });
        }
        validate_block_uniqueness(&blocks)?;

        let mut biomes = Vec::with_capacity(raw_biomes.len());
        for raw in raw_biomes {
            let java_gate = parse_gate("biomes", &raw.intermediate, &raw.java_since, &None)?;
            let bedrock_gate =
                parse_gate("biomes", &raw.intermediate, &raw.bedrock_since, &None)?;
            biomes.push(BiomeRecord {
                intermediate: raw.intermediate,
                java: raw.java,
                bedrock_id: raw.bedrock_id,
                java_gate,
                bedrock_gate,
            });
        }

        let mut items = Vec::with_capacity(raw_items.len());
        for raw in raw_items {
            let build = |variants: Vec<RawItemVariant>,
                         record: &str|
             -> Result<Vec<ItemVariant>, MappingError> {
                variants
                    .into_iter()
                    .map(|v| {
                        Ok(ItemVariant {
                            gate: parse_gate("items", record, &v.since, &v.until)?,
                            id: v.id,
                        })
                    })
                    .collect()
            };
            items.push(ItemRecord {
                java: build(raw.java, &raw.intermediate)?,
                bedrock: build(raw.bedrock, &raw.intermediate)?,
                intermediate: raw.intermediate,
                block_item: raw.block_item,
            });
        }

        Ok(Mappings {
            blocks,
            biomes,
            items,
            entities,
            block_entities,
            enchantments,
        })
    }
}

fn build_variants(
    dataset: &'static str,
    record: &str,
    raw: Vec<RawBlockVariant>,
) -> Result<Vec<BlockVariant>, MappingError> {
    raw.into_iter()
        .map(|v| {
            let gate = parse_gate(dataset, record, &v.since, &v.until)?;
            let translator = match v.states {
                None => None,
                Some(name) => Some(translators::get(&name).ok_or_else(|| {
                    MappingError::UnknownTranslator {
                        record: record.to_string(),
                        name,
                    }
                })?),
            };
            Ok(BlockVariant {
                id: v.id,
                gate,
                when: v.when,
                set: v.set,
                translator,
            })
        })
        .collect()
}

/// Two variants with the same edition id, overlapping gates and identical
/// `set` discriminators would make reads ambiguous.
fn validate_block_uniqueness(blocks: &[BlockRecord]) -> Result<(), MappingError> {
    for edition in [Edition::Java, Edition::Bedrock] {
        let mut seen: Vec<&BlockVariant> = Vec::new();
        for record in blocks {
            for variant in record.variants(edition) {
                for earlier in &seen {
                    if earlier.id == variant.id
                        && earlier.gate.overlaps(&variant.gate)
                        && earlier.set == variant.set
                    {
                        return Err(MappingError::DuplicateVariant {
                            edition,
                            id: variant.id.clone(),
                        });
                    }
                }
                seen.push(variant);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_datasets_load_and_validate() {
        let mappings = Mappings::load().expect("embedded mapping data is valid");
        assert!(!mappings.blocks.is_empty());
        assert!(!mappings.biomes.is_empty());
        assert!(!mappings.items.is_empty());
        assert!(!mappings.entities.is_empty());
        assert!(!mappings.block_entities.is_empty());
        assert!(!mappings.enchantments.is_empty());
    }

    #[test]
    fn test_gate_contains() {
        let gate = VersionGate {
            since: Some(GameVersion::new(1, 19, 80)),
            until: Some(GameVersion::new(1, 21, 40)),
        };
        assert!(!gate.contains(GameVersion::new(1, 19, 70)));
        assert!(gate.contains(GameVersion::new(1, 19, 80)));
        assert!(gate.contains(GameVersion::new(1, 20, 80)));
        // until is exclusive
        assert!(!gate.contains(GameVersion::new(1, 21, 40)));
    }

    #[test]
    fn test_open_gate_contains_everything() {
        let gate = VersionGate::default();
        assert!(gate.contains(GameVersion::new(1, 0, 0)));
        assert!(gate.contains(GameVersion::new(1, 21, 120)));
    }

    #[test]
    fn test_gate_overlap() {
        let early = VersionGate {
            since: None,
            until: Some(GameVersion::new(1, 20, 70)),
        };
        let late = VersionGate {
            since: Some(GameVersion::new(1, 20, 70)),
            until: None,
        };
        assert!(!early.overlaps(&late));
        assert!(early.overlaps(&VersionGate::default()));
        assert!(late.overlaps(&VersionGate::default()));
    }

    #[test]
    fn test_duplicate_detection() {
        let variant = |id: &str, since: Option<GameVersion>| BlockVariant {
            id: id.to_string(),
            gate: VersionGate { since, until: None },
            when: BTreeMap::new(),
            set: BTreeMap::new(),
            translator: None,
        };
        let blocks = vec![
            BlockRecord {
                intermediate: "a".into(),
                java: vec![variant("minecraft:x", None)],
                bedrock: vec![],
            },
            BlockRecord {
                intermediate: "b".into(),
                java: vec![variant("minecraft:x", Some(GameVersion::new(1, 20, 0)))],
                bedrock: vec![],
            },
        ];
        assert!(matches!(
            validate_block_uniqueness(&blocks),
            Err(MappingError::DuplicateVariant { .. })
        ));
    }
}
