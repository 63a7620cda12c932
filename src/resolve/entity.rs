//! Entity resolution
//!
//! The type field is `id` on the Java side and `identifier` on Bedrock.
//! Positions and motion are double lists in Java and float lists in
//! Bedrock; rotation is a float pair in both. Custom names cross as
//! JSON text (Java) versus plain strings (Bedrock). Unclaimed fields pass
//! through untouched.

use crate::model::Edition;
use crate::nbt::{Compound, Tag};

use super::{text, ResolveError, ResolverSet};

/// The canonical entity.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateEntity {
    /// Intermediate entity type name.
    pub type_name: String,
    pub pos: Option<[f64; 3]>,
    pub motion: Option<[f64; 3]>,
    pub rotation: Option<[f32; 2]>,
    /// Custom name as plain text.
    pub custom_name: Option<String>,
    /// Fields carried through unchanged.
    pub extra: Compound,
}

impl ResolverSet {
    fn entity_type_key(&self) -> &'static str {
        match self.edition {
            Edition::Java => "id",
            Edition::Bedrock => "identifier",
        }
    }

    /// Parse an edition entity into the intermediate model.
    pub fn read_entity(&self, data: &Compound) -> Result<IntermediateEntity, ResolveError> {
        let key = self.entity_type_key();
        let parse_error = |id: &str| ResolveError::EntityParse {
            edition: self.edition.display_name(),
            id: id.to_string(),
        };

        let id = data.get_str(key).ok_or_else(|| parse_error("unknown"))?;
        let r = *self.entity_by_id.get(id).ok_or_else(|| parse_error(id))?;
        let type_name = self.mappings.entities[r].intermediate.clone();

        let pos = read_vec3(data.get_list("Pos"));
        let motion = read_vec3(data.get_list("Motion"));
        let rotation = read_rotation(data.get_list("Rotation"));
        let custom_name = data.get_str("CustomName").map(|name| match self.edition {
            Edition::Java => text::java_to_plain(name),
            Edition::Bedrock => name.to_string(),
        });

        let claimed = [key, "Pos", "Motion", "Rotation", "CustomName"];
        let extra: Compound = data
            .iter()
            .filter(|(field, _)| !claimed.contains(field))
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect();

        Ok(IntermediateEntity {
            type_name,
            pos,
            motion,
            rotation,
            custom_name,
            extra,
        })
    }

    /// Render an intermediate entity as edition NBT. Entity types without a
    /// counterpart in this edition are a typed error.
    pub fn write_entity(&self, entity: &IntermediateEntity) -> Result<Compound, ResolveError> {
        let r = self
            .entity_by_intermediate
            .get(&entity.type_name)
            .copied()
            .ok_or_else(|| ResolveError::EntityNoCounterpart {
                id: entity.type_name.clone(),
                to: self.edition.display_name(),
            })?;
        let record = &self.mappings.entities[r];
        let id = match self.edition {
            Edition::Java => record.java.as_ref(),
            Edition::Bedrock => record.bedrock.as_ref(),
        }
        .ok_or_else(|| ResolveError::EntityNoCounterpart {
            id: entity.type_name.clone(),
            to: self.edition.display_name(),
        })?;

        let mut out = Compound::new();
        out.put(self.entity_type_key(), id.clone());
        if let Some(pos) = entity.pos {
            out.put("Pos", write_vec3(self.edition, pos));
        }
        if let Some(motion) = entity.motion {
            out.put("Motion", write_vec3(self.edition, motion));
        }
        if let Some([yaw, pitch]) = entity.rotation {
            out.put(
                "Rotation",
                Tag::List(vec![Tag::Float(yaw), Tag::Float(pitch)]),
            );
        }
        if let Some(name) = &entity.custom_name {
            let rendered = match self.edition {
                Edition::Java => text::plain_to_java(name),
                Edition::Bedrock => name.clone(),
            };
            out.put("CustomName", rendered);
        }
        for (field, value) in entity.extra.iter() {
            out.put(field.to_string(), value.clone());
        }
        Ok(out)
    }
}

fn read_vec3(list: Option<&[Tag]>) -> Option<[f64; 3]> {
    let list = list?;
    if list.len() != 3 {
        return None;
    }
    let component = |tag: &Tag| match tag {
        Tag::Double(v) => Some(*v),
        Tag::Float(v) => Some(*v as f64),
        _ => None,
    };
    Some([
        component(&list[0])?,
        component(&list[1])?,
        component(&list[2])?,
    ])
}

fn write_vec3(edition: Edition, values: [f64; 3]) -> Tag {
    match edition {
        Edition::Java => Tag::List(values.iter().map(|v| Tag::Double(*v)).collect()),
        Edition::Bedrock => Tag::List(values.iter().map(|v| Tag::Float(*v as f32)).collect()),
    }
}

fn read_rotation(list: Option<&[Tag]>) -> Option<[f32; 2]> {
    let list = list?;
    if list.len() != 2 {
        return None;
    }
    let component = |tag: &Tag| match tag {
        Tag::Float(v) => Some(*v),
        Tag::Double(v) => Some(*v as f32),
        _ => None,
    };
    Some([component(&list[0])?, component(&list[1])?])
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

    fn java_entity(id: &str) -> Compound {
        let mut data = Compound::new();
        data.put("id", id);
        data.put(
            "Pos",
            Tag::List(vec![
                Tag::Double(1.5),
                Tag::Double(64.0),
                Tag::Double(-7.25),
            ]),
        );
        data.put(
            "Motion",
            Tag::List(vec![Tag::Double(0.0), Tag::Double(-0.08), Tag::Double(0.0)]),
        );
        data.put(
            "Rotation",
            Tag::List(vec![Tag::Float(90.0), Tag::Float(0.0)]),
        );
        data.put("CustomName", r#"{"text":"Bessie"}"#);
        data.put("Health", Tag::Float(10.0));
        data
    }

    #[test]
    fn test_exception_table_java_to_bedrock() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let entity = java.read_entity(&java_entity("minecraft:zombified_piglin")).unwrap();
        assert_eq!(entity.type_name, "zombified_piglin");

        let out = bedrock.write_entity(&entity).unwrap();
        assert_eq!(out.get_str("identifier"), Some("minecraft:zombie_pigman"));
    }

    #[test]
    fn test_exception_table_bedrock_to_java() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let mut data = Compound::new();
        data.put("identifier", "minecraft:xp_orb");
        let entity = bedrock.read_entity(&data).unwrap();
        let out = java.write_entity(&entity).unwrap();
        assert_eq!(out.get_str("id"), Some("minecraft:experience_orb"));
    }

    #[test]
    fn test_pos_becomes_float_list_in_bedrock() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let entity = java.read_entity(&java_entity("minecraft:cow")).unwrap();
        let out = bedrock.write_entity(&entity).unwrap();

        let pos = out.get_list("Pos").unwrap();
        assert_eq!(pos[0], Tag::Float(1.5));
        assert_eq!(pos[2], Tag::Float(-7.25));
        // rotation stays a float pair
        let rotation = out.get_list("Rotation").unwrap();
        assert_eq!(rotation[0], Tag::Float(90.0));
    }

    #[test]
    fn test_custom_name_json_to_plain_and_back() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let entity = java.read_entity(&java_entity("minecraft:cow")).unwrap();
        assert_eq!(entity.custom_name.as_deref(), Some("Bessie"));

        let out = bedrock.write_entity(&entity).unwrap();
        assert_eq!(out.get_str("CustomName"), Some("Bessie"));

        let back = bedrock.read_entity(&out).unwrap();
        let java_out = java.write_entity(&back).unwrap();
        assert_eq!(
            java_out.get_str("CustomName"),
            Some(r#"{"text":"Bessie"}"#)
        );
    }

    #[test]
    fn test_unclaimed_fields_pass_through() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let entity = java.read_entity(&java_entity("minecraft:cow")).unwrap();
        let out = bedrock.write_entity(&entity).unwrap();
        assert_eq!(out.get("Health"), Some(&Tag::Float(10.0)));
    }

    #[test]
    fn test_unknown_type_is_a_parse_error() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let err = java.read_entity(&java_entity("minecraft:not_a_mob")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse Java entity NBT. ID: minecraft:not_a_mob"
        );
    }

    #[test]
    fn test_missing_type_field_names_the_edition_key() {
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));
        let err = bedrock.read_entity(&Compound::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse Bedrock entity NBT. ID: unknown"
        );
    }

    #[test]
    fn test_java_only_entity_has_no_bedrock_counterpart() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let entity = java.read_entity(&java_entity("minecraft:item_frame")).unwrap();
        let err = bedrock.write_entity(&entity).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity type 'item_frame' has no Bedrock counterpart"
        );
    }
}
