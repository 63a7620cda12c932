//! Item stack resolution
//!
//! Java stacks: `{id, Count, tag: {Damage, Enchantments: [{id: string,
//! lvl}], display: {Name: json}}}`. Bedrock stacks: `{Name, Count, Damage,
//! tag: {ench: [{id: short, lvl: short}], display: {Name: plain}}}`.
//! Enchantments cross the editions through the numeric id table;
//! intermediate enchantment names are the Java ones. Java 1.20.5+
//! component-format stacks are rejected with a typed error.

use tracing::warn;

use crate::model::Edition;
use crate::nbt::{Compound, Tag};

use super::{clamp_i16, clamp_i32, clamp_i8, text, ResolveError, ResolverSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Enchantment {
    /// Intermediate (Java) enchantment id, e.g. `minecraft:sharpness`.
    pub name: String,
    pub level: i16,
}

/// The canonical item stack.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateItem {
    /// Intermediate item (or block) name.
    pub name: String,
    pub count: i8,
    pub damage: Option<i32>,
    pub enchantments: Vec<Enchantment>,
    /// Display name as plain text.
    pub display_name: Option<String>,
}

impl ResolverSet {
    /// Parse an edition item stack into the intermediate model.
    pub fn read_item(&self, data: &Compound) -> Result<IntermediateItem, ResolveError> {
        match self.edition {
            Edition::Java => self.read_java_item(data),
            Edition::Bedrock => self.read_bedrock_item(data),
        }
    }

    fn read_java_item(&self, data: &Compound) -> Result<IntermediateItem, ResolveError> {
        if data.contains("components") {
            return Err(ResolveError::UnsupportedComponents);
        }
        let id = data.get_str("id").ok_or_else(|| ResolveError::ItemParse {
            edition: self.edition.display_name(),
            id: "unknown".to_string(),
        })?;
        let name = self.item_id_to_intermediate(id)?;
        let count = clamp_i8(data.int_or("Count", 1), "Count");

        let mut damage = None;
        let mut enchantments = Vec::new();
        let mut display_name = None;
        if let Some(tag) = data.get_compound("tag") {
            damage = tag.get_int("Damage").map(|d| clamp_i32(d, "Damage"));
            if let Some(entries) = tag.get_list("Enchantments") {
                for entry in entries {
                    let Some(entry) = entry.as_compound() else {
                        continue;
                    };
                    let Some(ench_id) = entry.get_str("id") else {
                        continue;
                    };
                    if !self.enchantment_by_java.contains_key(ench_id) {
                        warn!(id = ench_id, "Dropping unknown Java enchantment");
                        continue;
                    }
                    enchantments.push(Enchantment {
                        name: ench_id.to_string(),
                        level: clamp_i16(entry.int_or("lvl", 1), "lvl"),
                    });
                }
            }
            if let Some(display) = tag.get_compound("display") {
                display_name = display.get_str("Name").map(text::java_to_plain);
            }
        }

        Ok(IntermediateItem {
            name,
            count,
            damage,
            enchantments,
            display_name,
        })
    }

    fn read_bedrock_item(&self, data: &Compound) -> Result<IntermediateItem, ResolveError> {
        let id = data.get_str("Name").ok_or_else(|| ResolveError::ItemParse {
            edition: self.edition.display_name(),
            id: "unknown".to_string(),
        })?;
        let name = self.item_id_to_intermediate(id)?;
        let count = clamp_i8(data.int_or("Count", 1), "Count");
        let damage = data.get_int("Damage").map(|d| clamp_i32(d, "Damage"));

        let mut enchantments = Vec::new();
        let mut display_name = None;
        if let Some(tag) = data.get_compound("tag") {
            if let Some(entries) = tag.get_list("ench") {
                for entry in entries {
                    let Some(entry) = entry.as_compound() else {
                        continue;
                    };
                    let Some(ench_id) = entry.get_int("id") else {
                        continue;
                    };
                    let Some(java_name) = self.enchantment_by_bedrock.get(&(ench_id as i16))
                    else {
                        warn!(id = ench_id, "Dropping unknown Bedrock enchantment id");
                        continue;
                    };
                    enchantments.push(Enchantment {
                        name: java_name.clone(),
                        level: clamp_i16(entry.int_or("lvl", 1), "lvl"),
                    });
                }
            }
            if let Some(display) = tag.get_compound("display") {
                display_name = display.get_str("Name").map(str::to_string);
            }
        }

        Ok(IntermediateItem {
            name,
            count,
            damage,
            enchantments,
            display_name,
        })
    }

    /// Item table first, then the block table for block-items.
    fn item_id_to_intermediate(&self, id: &str) -> Result<String, ResolveError> {
        if let Some(candidates) = self.item_by_id.get(id) {
            for &(r, v) in candidates {
                let record = &self.mappings.items[r];
                if record.variants(self.edition)[v].gate.contains(self.version) {
                    return Ok(record.intermediate.clone());
                }
            }
        }
        if let Some(candidates) = self.block_by_id.get(id) {
            for &(r, v) in candidates {
                let record = &self.mappings.blocks[r];
                if record.variants(self.edition)[v].gate.contains(self.version) {
                    return Ok(record.intermediate.clone());
                }
            }
        }
        Err(ResolveError::UnknownItem {
            edition: self.edition.display_name(),
            id: id.to_string(),
            suggestion: self.suggest_item_id(id),
        })
    }

    /// Render an intermediate item as an edition stack, or `None` when the
    /// intermediate has no id in this edition+version.
    pub fn write_item(&self, item: &IntermediateItem) -> Option<Compound> {
        let id = self.intermediate_to_item_id(&item.name)?;
        let mut out = Compound::new();

        match self.edition {
            Edition::Java => {
                out.put("id", id);
                out.put("Count", Tag::Byte(item.count));

                let mut tag = Compound::new();
                if let Some(damage) = item.damage {
                    tag.put("Damage", Tag::Int(damage));
                }
                if !item.enchantments.is_empty() {
                    let entries: Vec<Tag> = item
                        .enchantments
                        .iter()
                        .map(|ench| {
                            let mut entry = Compound::new();
                            entry.put("id", ench.name.clone());
                            entry.put("lvl", Tag::Short(ench.level));
                            Tag::Compound(entry)
                        })
                        .collect();
                    tag.put("Enchantments", entries);
                }
                if let Some(name) = &item.display_name {
                    let mut display = Compound::new();
                    display.put("Name", text::plain_to_java(name));
                    tag.put("display", display);
                }
                if !tag.is_empty() {
                    out.put("tag", tag);
                }
            }
            Edition::Bedrock => {
                out.put("Name", id);
                out.put("Count", Tag::Byte(item.count));
                if let Some(damage) = item.damage {
                    out.put("Damage", Tag::Short(clamp_i16(damage as i64, "Damage")));
                }

                let mut tag = Compound::new();
                if !item.enchantments.is_empty() {
                    let mut entries = Vec::new();
                    for ench in &item.enchantments {
                        let Some(bedrock_id) = self.enchantment_by_java.get(&ench.name) else {
                            warn!(name = %ench.name, "Dropping enchantment without a Bedrock id");
                            continue;
                        };
                        let mut entry = Compound::new();
                        entry.put("id", Tag::Short(*bedrock_id));
                        entry.put("lvl", Tag::Short(ench.level));
                        entries.push(Tag::Compound(entry));
                    }
                    if !entries.is_empty() {
                        tag.put("ench", entries);
                    }
                }
                if let Some(name) = &item.display_name {
                    let mut display = Compound::new();
                    display.put("Name", name.clone());
                    tag.put("display", display);
                }
                if !tag.is_empty() {
                    out.put("tag", tag);
                }
            }
        }

        Some(out)
    }

    /// Item table first; block-item records and unlisted block intermediates
    /// take their id from the block table so version gates apply once.
    fn intermediate_to_item_id(&self, name: &str) -> Option<String> {
        if let Some(&r) = self.item_by_intermediate.get(name) {
            let record = &self.mappings.items[r];
            if !record.block_item {
                return record
                    .variants(self.edition)
                    .iter()
                    .find(|v| v.gate.contains(self.version))
                    .map(|v| v.id.clone());
            }
        }
        if self.block_by_intermediate.contains_key(name) {
            let block = super::IntermediateBlock {
                name: name.to_string(),
                states: Default::default(),
            };
            return self.write_block(&block).map(|id| id.id().to_string());
        }
        self.item_by_intermediate.get(name).and_then(|&r| {
            self.mappings.items[r]
                .variants(self.edition)
                .iter()
                .find(|v| v.gate.contains(self.version))
                .map(|v| v.id.clone())
        })
    }
}
