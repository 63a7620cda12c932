//! Entity conversion
//!
//! Entities only convert across editions; same-edition requests fail
//! with the unsupported-direction error.

use crate::cache::ResolverCache;
use crate::model::Edition;
use crate::nbt::Compound;
use crate::resolve::ResolveError;

use super::{require_cross_edition, ConvertError};

pub fn convert_entity(
    cache: &ResolverCache,
    from: Edition,
    to: Edition,
    data: &Compound,
) -> Result<Compound, ConvertError> {
    require_cross_edition(from, to)?;
    let entity = cache.resolver(from).read_entity(data)?;
    let out = cache.resolver(to).write_entity(&entity)?;
    if out.is_empty() {
        return Err(ResolveError::EntityWriteFailed {
            to: to.display_name(),
        }
        .into());
    }
    Ok(out)
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
    fn test_exception_table_and_positions() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("id", "minecraft:zombified_piglin");
        data.put(
            "Pos",
            Tag::List(vec![
                Tag::Double(1.5),
                Tag::Double(64.0),
                Tag::Double(-3.5),
            ]),
        );

        let out = convert_entity(&cache, Edition::Java, Edition::Bedrock, &data).unwrap();
        assert_eq!(out.get_str("identifier"), Some("minecraft:zombie_pigman"));
        let pos = out.get_list("Pos").unwrap();
        assert_eq!(pos[0], Tag::Float(1.5));
    }

    #[test]
    fn test_same_edition_is_unsupported() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("id", "minecraft:creeper");
        let err = convert_entity(&cache, Edition::Java, Edition::Java, &data).unwrap_err();
        assert_eq!(
            err.message(),
            "Unsupported conversion direction: java to java"
        );
    }

    #[test]
    fn test_missing_type_field_names_the_edition_key() {
        let cache = default_cache();
        let err = convert_entity(&cache, Edition::Bedrock, Edition::Java, &Compound::new())
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Failed to parse Bedrock entity NBT. ID: unknown"
        );
    }

    #[test]
    fn test_java_only_type_has_no_counterpart() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("id", "minecraft:item_frame");
        let err = convert_entity(&cache, Edition::Java, Edition::Bedrock, &data).unwrap_err();
        assert_eq!(
            err.message(),
            "Entity type 'item_frame' has no Bedrock counterpart"
        );
    }
}
