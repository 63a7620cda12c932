//! Block entity resolution
//!
//! Java names block entities with namespaced ids (`minecraft:mob_spawner`),
//! Bedrock with PascalCase ids (`MobSpawner`). Coordinates pass through;
//! container contents (`Items`, each entry an item stack plus a `Slot`
//! byte) convert recursively through the item resolver.
//!
//! Unknown ids fall back to the chest record only when the compound
//! structurally looks like a container; anything else is an error.

use tracing::warn;

use crate::model::Edition;
use crate::nbt::{Compound, Tag};

use super::item::IntermediateItem;
use super::{clamp_i32, clamp_i8, text, ResolveError, ResolverSet};

/// The canonical block entity.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateBlockEntity {
    /// Intermediate block entity name.
    pub type_name: String,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
    /// Container slots: (slot index, stack).
    pub items: Vec<(i8, IntermediateItem)>,
    /// Custom name as plain text.
    pub custom_name: Option<String>,
    /// Fields carried through unchanged.
    pub extra: Compound,
}

impl ResolverSet {
    /// Parse an edition block entity into the intermediate model.
    pub fn read_block_entity(
        &self,
        data: &Compound,
    ) -> Result<IntermediateBlockEntity, ResolveError> {
        let parse_error = |id: &str| ResolveError::BlockEntityParse {
            edition: self.edition.display_name(),
            id: id.to_string(),
        };
        let id = data.get_str("id").ok_or_else(|| parse_error("unknown"))?;

        let type_name = match self.block_entity_by_id.get(id) {
            Some(&r) => self.mappings.block_entities[r].intermediate.clone(),
            // Container-shaped unknowns degrade to a chest; the rest fail.
            None if data.get_list("Items").is_some() => {
                warn!(id, "Unknown block entity id, treating as chest");
                "chest".to_string()
            }
            None => return Err(parse_error(id)),
        };

        let mut items = Vec::new();
        if let Some(entries) = data.get_list("Items") {
            for entry in entries {
                let Some(entry) = entry.as_compound() else {
                    continue;
                };
                let slot = clamp_i8(entry.int_or("Slot", 0), "Slot");
                let mut stack = entry.clone();
                stack.remove("Slot");
                items.push((slot, self.read_item(&stack)?));
            }
        }

        let custom_name = data.get_str("CustomName").map(|name| match self.edition {
            Edition::Java => text::java_to_plain(name),
            Edition::Bedrock => name.to_string(),
        });

        let claimed = ["id", "x", "y", "z", "Items", "CustomName"];
        let extra: Compound = data
            .iter()
            .filter(|(field, _)| !claimed.contains(field))
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect();

        Ok(IntermediateBlockEntity {
            type_name,
            x: data.get_int("x").map(|v| clamp_i32(v, "x")),
            y: data.get_int("y").map(|v| clamp_i32(v, "y")),
            z: data.get_int("z").map(|v| clamp_i32(v, "z")),
            items,
            custom_name,
            extra,
        })
    }

    /// Render an intermediate block entity as edition NBT.
    pub fn write_block_entity(
        &self,
        block_entity: &IntermediateBlockEntity,
    ) -> Result<Compound, ResolveError> {
        let r = self
            .block_entity_by_intermediate
            .get(&block_entity.type_name)
            .copied()
            .ok_or(ResolveError::BlockEntityWriteFailed {
                to: self.edition.display_name(),
            })?;
        let record = &self.mappings.block_entities[r];
        let id = match self.edition {
            Edition::Java => &record.java,
            Edition::Bedrock => &record.bedrock,
        };

        let mut out = Compound::new();
        out.put("id", id.clone());
        if let Some(x) = block_entity.x {
            out.put("x", Tag::Int(x));
        }
        if let Some(y) = block_entity.y {
            out.put("y", Tag::Int(y));
        }
        if let Some(z) = block_entity.z {
            out.put("z", Tag::Int(z));
        }

        if !block_entity.items.is_empty() {
            let mut entries = Vec::new();
            for (slot, stack) in &block_entity.items {
                let Some(mut entry) = self.write_item(stack) else {
                    warn!(name = %stack.name, "Dropping container slot without an item mapping");
                    continue;
                };
                entry.put("Slot", Tag::Byte(*slot));
                entries.push(Tag::Compound(entry));
            }
            out.put("Items", entries);
        }

        if let Some(name) = &block_entity.custom_name {
            let rendered = match self.edition {
                Edition::Java => text::plain_to_java(name),
                Edition::Bedrock => name.clone(),
            };
            out.put("CustomName", rendered);
        }
        for (field, value) in block_entity.extra.iter() {
            out.put(field.to_string(), value.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::Mappings;
    use crate::versions::GameVersion;
    use std::sync::Arc;

    fn resolver(edition: Edition, version: GameVersion) -> ResolverSet {
        ResolverSet::new(edition, version, Arc::new(Mappings::load().unwrap()))
    }

    fn java_chest() -> Compound {
        let mut stack = Compound::new();
        stack.put("Slot", Tag::Byte(3));
        stack.put("id", "minecraft:bread");
        stack.put("Count", Tag::Byte(12));

        let mut data = Compound::new();
        data.put("id", "minecraft:chest");
        data.put("x", Tag::Int(10));
        data.put("y", Tag::Int(64));
        data.put("z", Tag::Int(-4));
        data.put("Items", vec![Tag::Compound(stack)]);
        data.put("CustomName", r#"{"text":"Loot"}"#);
        data.put("Lock", "secret");
        data
    }

    #[test]
    fn test_id_casing_table() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let mut data = Compound::new();
        data.put("id", "minecraft:mob_spawner");
        let be = java.read_block_entity(&data).unwrap();
        assert_eq!(be.type_name, "mob_spawner");

        let out = bedrock.write_block_entity(&be).unwrap();
        assert_eq!(out.get_str("id"), Some("MobSpawner"));

        let back = bedrock.read_block_entity(&out).unwrap();
        let java_out = java.write_block_entity(&back).unwrap();
        assert_eq!(java_out.get_str("id"), Some("minecraft:mob_spawner"));
    }

    #[test]
    fn test_container_contents_convert_recursively() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let be = java.read_block_entity(&java_chest()).unwrap();
        assert_eq!(be.items.len(), 1);
        assert_eq!(be.items[0].0, 3);
        assert_eq!(be.items[0].1.name, "bread");

        let out = bedrock.write_block_entity(&be).unwrap();
        assert_eq!(out.get_str("id"), Some("Chest"));
        assert_eq!(out.get_int("x"), Some(10));

        let entries = out.get_list("Items").unwrap();
        let entry = entries[0].as_compound().unwrap();
        assert_eq!(entry.get_str("Name"), Some("minecraft:bread"));
        assert_eq!(entry.get_int("Count"), Some(12));
        assert_eq!(entry.get_int("Slot"), Some(3));
    }

    #[test]
    fn test_custom_name_and_passthrough() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let be = java.read_block_entity(&java_chest()).unwrap();
        assert_eq!(be.custom_name.as_deref(), Some("Loot"));

        let out = bedrock.write_block_entity(&be).unwrap();
        assert_eq!(out.get_str("CustomName"), Some("Loot"));
        assert_eq!(out.get_str("Lock"), Some("secret"));
    }

    #[test]
    fn test_unknown_container_falls_back_to_chest() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));

        let mut data = Compound::new();
        data.put("id", "minecraft:mystery_box");
        data.put("Items", Tag::List(vec![]));
        let be = java.read_block_entity(&data).unwrap();
        assert_eq!(be.type_name, "chest");
    }

    #[test]
    fn test_unknown_non_container_is_an_error() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));

        let mut data = Compound::new();
        data.put("id", "minecraft:mystery_box");
        let err = java.read_block_entity(&data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse Java block entity NBT. ID: minecraft:mystery_box"
        );
    }
}
