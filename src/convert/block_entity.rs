//! Block entity conversion
//!
//! Direction-restricted like entities. Both directions return a block
//! entity compound: id, coordinates, recursively converted container
//! contents and passthrough fields.

use crate::cache::ResolverCache;
use crate::model::Edition;
use crate::nbt::Compound;

use super::{require_cross_edition, ConvertError};

pub fn convert_block_entity(
    cache: &ResolverCache,
    from: Edition,
    to: Edition,
    data: &Compound,
) -> Result<Compound, ConvertError> {
    require_cross_edition(from, to)?;
    let block_entity = cache.resolver(from).read_block_entity(data)?;
    Ok(cache.resolver(to).write_block_entity(&block_entity)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache;
    use crate::nbt::Tag;

    fn default_cache() -> std::sync::Arc<ResolverCache> {
        cache::get_or_create("1.20.4", "1.20.80").unwrap()
    }

    #[test]
    fn test_chest_with_items_java_to_bedrock() {
        let cache = default_cache();
        let mut stack = Compound::new();
        stack.put("Slot", Tag::Byte(0));
        stack.put("id", "minecraft:diamond");
        stack.put("Count", Tag::Byte(3));
        let mut data = Compound::new();
        data.put("id", "minecraft:chest");
        data.put("x", Tag::Int(1));
        data.put("y", Tag::Int(2));
        data.put("z", Tag::Int(3));
        data.put("Items", vec![Tag::Compound(stack)]);

        let out =
            convert_block_entity(&cache, Edition::Java, Edition::Bedrock, &data).unwrap();
        assert_eq!(out.get_str("id"), Some("Chest"));
        assert_eq!(out.get_int("y"), Some(2));
        let entry = out.get_list("Items").unwrap()[0].as_compound().unwrap();
        assert_eq!(entry.get_str("Name"), Some("minecraft:diamond"));
        assert_eq!(entry.get_int("Slot"), Some(0));
    }

    #[test]
    fn test_bedrock_to_java_returns_block_entity_shape() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("id", "MobSpawner");
        data.put("x", Tag::Int(0));
        data.put("y", Tag::Int(0));
        data.put("z", Tag::Int(0));

        let out =
            convert_block_entity(&cache, Edition::Bedrock, Edition::Java, &data).unwrap();
        assert_eq!(out.get_str("id"), Some("minecraft:mob_spawner"));
        assert!(out.get_compound("tag").is_none());
    }

    #[test]
    fn test_same_edition_is_unsupported() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("id", "minecraft:chest");
        let err =
            convert_block_entity(&cache, Edition::Bedrock, Edition::Bedrock, &data).unwrap_err();
        assert_eq!(
            err.message(),
            "Unsupported conversion direction: bedrock to bedrock"
        );
    }
}
