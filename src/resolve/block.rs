//! Block identifier resolution
//!
//! Reading maps an edition identifier onto the intermediate block: the
//! canonical (Java-flavored) name plus canonical states. Writing picks the
//! edition variant whose version gate contains the resolver version and
//! whose `when` states match the intermediate states.
//!
//! An unknown identifier reads as AIR — the conversion layer decides
//! whether that is an error, matching the air-check semantics of the
//! original service.

use crate::mappings::BlockVariant;
use crate::model::{Identifier, States};

use super::ResolverSet;

pub const AIR: &str = "air";

/// The canonical block: intermediate name plus canonical states.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateBlock {
    pub name: String,
    pub states: States,
}

impl IntermediateBlock {
    pub fn air() -> IntermediateBlock {
        IntermediateBlock {
            name: AIR.to_string(),
            states: States::new(),
        }
    }

    pub fn is_air(&self) -> bool {
        self.name == AIR
    }
}

impl ResolverSet {
    /// Resolve an edition identifier to the intermediate block. Unknown
    /// identifiers resolve to AIR.
    pub fn read_block(&self, input: &Identifier) -> IntermediateBlock {
        let Some(candidates) = self.block_by_id.get(input.id()) else {
            return IntermediateBlock::air();
        };

        // Among gate-matching variants whose fixed `set` states all match
        // the input, the one with the most discriminators wins.
        let mut best: Option<(usize, &BlockVariant)> = None;
        for &(r, v) in candidates {
            let variant = &self.mappings.blocks[r].variants(self.edition)[v];
            if !variant.gate.contains(self.version) {
                continue;
            }
            let discriminators_match = variant
                .set
                .iter()
                .all(|(key, want)| input.states().get(key) == Some(want));
            if !discriminators_match {
                continue;
            }
            if best.map_or(true, |(_, b)| variant.set.len() > b.set.len()) {
                best = Some((r, variant));
            }
        }

        let Some((r, variant)) = best else {
            return IntermediateBlock::air();
        };

        let mut states: States = input
            .states()
            .iter()
            .filter(|(key, _)| !variant.set.contains_key(*key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(translator) = variant.translator {
            states = (translator.read)(&states);
        }
        for (key, value) in &variant.when {
            states.insert(key.clone(), value.clone());
        }

        IntermediateBlock {
            name: self.mappings.blocks[r].intermediate.clone(),
            states,
        }
    }

    /// Render an intermediate block as an edition identifier, or `None`
    /// when no variant of this edition+version can express it.
    pub fn write_block(&self, block: &IntermediateBlock) -> Option<Identifier> {
        let r = *self.block_by_intermediate.get(&block.name)?;
        let variants = self.mappings.blocks[r].variants(self.edition);

        let in_gate = |variant: &&BlockVariant| variant.gate.contains(self.version);
        // Strict pass requires every `when` state to be present and equal;
        // the lenient pass lets absent states match, so records keep their
        // first listed variant as the default.
        let matched = variants
            .iter()
            .filter(in_gate)
            .find(|variant| {
                variant
                    .when
                    .iter()
                    .all(|(key, want)| block.states.get(key) == Some(want))
            })
            .or_else(|| {
                variants.iter().filter(in_gate).find(|variant| {
                    variant.when.iter().all(|(key, want)| {
                        block.states.get(key).map_or(true, |have| have == want)
                    })
                })
            })?;

        let mut states: States = block
            .states
            .iter()
            .filter(|(key, _)| !matched.when.contains_key(*key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(translator) = matched.translator {
            states = (translator.write)(&states);
        }
        for (key, value) in &matched.set {
            states.insert(key.clone(), value.clone());
        }

        Some(Identifier::new(matched.id.clone(), states))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::Mappings;
    use crate::model::{Edition, StateValue};
    use crate::versions::GameVersion;
    use std::sync::Arc;

    fn resolver(edition: Edition, version: GameVersion) -> ResolverSet {
        let mappings = Arc::new(Mappings::load().unwrap());
        ResolverSet::new(edition, version, mappings)
    }

    fn states(pairs: &[(&str, StateValue)]) -> States {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_passthrough_block() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let block = java.read_block(&Identifier::new("minecraft:stone", States::new()));
        assert_eq!(block.name, "stone");
        assert!(!block.is_air());

        let out = java.write_block(&block).unwrap();
        assert_eq!(out.id(), "minecraft:stone");
        assert!(out.states().is_empty());
    }

    #[test]
    fn test_unknown_block_reads_as_air() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let block = java.read_block(&Identifier::new("minecraft:not_a_block", States::new()));
        assert!(block.is_air());
    }

    #[test]
    fn test_version_gated_flattening_both_sides() {
        let modern = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));
        let legacy = resolver(Edition::Bedrock, GameVersion::new(1, 20, 0));

        let block = IntermediateBlock {
            name: "mossy_stone_bricks".to_string(),
            states: States::new(),
        };

        let out = modern.write_block(&block).unwrap();
        assert_eq!(out.id(), "minecraft:mossy_stone_bricks");
        assert!(out.states().is_empty());

        let out = legacy.write_block(&block).unwrap();
        assert_eq!(out.id(), "minecraft:stonebrick");
        assert_eq!(
            out.states().get("stone_brick_type"),
            Some(&StateValue::String("mossy".into()))
        );
    }

    #[test]
    fn test_set_discriminators_select_the_record_on_read() {
        let legacy = resolver(Edition::Bedrock, GameVersion::new(1, 20, 0));
        let input = Identifier::new(
            "minecraft:stonebrick",
            states(&[("stone_brick_type", "mossy".into())]),
        );
        let block = legacy.read_block(&input);
        assert_eq!(block.name, "mossy_stone_bricks");
        // the discriminator is stripped from intermediate states
        assert!(block.states.is_empty());
    }

    #[test]
    fn test_when_variants_split_on_write_and_merge_on_read() {
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let lit = IntermediateBlock {
            name: "furnace".to_string(),
            states: states(&[
                ("lit", StateValue::Bool(true)),
                ("facing", "north".into()),
            ]),
        };
        let out = bedrock.write_block(&lit).unwrap();
        assert_eq!(out.id(), "minecraft:lit_furnace");
        assert_eq!(out.states().get("direction"), Some(&StateValue::Int(2)));
        assert!(!out.states().contains_key("lit"));

        let back = bedrock.read_block(&out);
        assert_eq!(back.name, "furnace");
        assert_eq!(back.states.get("lit"), Some(&StateValue::Bool(true)));
        assert_eq!(back.states.get("facing"), Some(&"north".into()));
    }

    #[test]
    fn test_when_default_applies_when_state_absent() {
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));
        let block = IntermediateBlock {
            name: "redstone_lamp".to_string(),
            states: States::new(),
        };
        let out = bedrock.write_block(&block).unwrap();
        assert_eq!(out.id(), "minecraft:redstone_lamp");
    }

    #[test]
    fn test_stair_translator_roundtrip_through_bedrock() {
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));
        let block = IntermediateBlock {
            name: "stone_brick_stairs".to_string(),
            states: states(&[("facing", "west".into()), ("half", "top".into())]),
        };
        let out = bedrock.write_block(&block).unwrap();
        assert_eq!(out.id(), "minecraft:stone_brick_stairs");
        assert_eq!(
            out.states().get("weirdo_direction"),
            Some(&StateValue::Int(1))
        );
        assert_eq!(
            out.states().get("upside_down_bit"),
            Some(&StateValue::Bool(true))
        );

        assert_eq!(bedrock.read_block(&out), block);
    }

    #[test]
    fn test_snow_layer_translator() {
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));
        let block = IntermediateBlock {
            name: "snow".to_string(),
            states: states(&[("layers", StateValue::Int(3))]),
        };
        let out = bedrock.write_block(&block).unwrap();
        assert_eq!(out.id(), "minecraft:snow_layer");
        assert_eq!(out.states().get("height"), Some(&StateValue::Int(2)));
        assert_eq!(bedrock.read_block(&out), block);
    }

    #[test]
    fn test_read_write_identity_same_version() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        for id in ["minecraft:stone", "minecraft:grass_block", "minecraft:oak_planks"] {
            let input = Identifier::new(id, States::new());
            let out = java.write_block(&java.read_block(&input)).unwrap();
            assert_eq!(out.id(), id);
        }
    }

    #[test]
    fn test_suggestion_for_near_miss() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let suggestion = java.suggest_block_id("minecraft:stonee");
        assert_eq!(suggestion.0.as_deref(), Some("minecraft:stone"));

        let none = java.suggest_block_id("minecraft:zzzzzzz");
        assert!(none.0.is_none());
    }
}
