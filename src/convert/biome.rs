//! Biome conversion
//!
//! Java biomes travel as `{name}`, Bedrock biomes as `{id}`; the output
//! shape follows the target edition.

use crate::cache::ResolverCache;
use crate::model::{BiomeOutput, Edition};
use crate::nbt::{Compound, Tag};
use crate::resolve::ResolveError;

use super::ConvertError;

pub fn convert_biome(
    cache: &ResolverCache,
    from: Edition,
    to: Edition,
    data: &Compound,
) -> Result<Compound, ConvertError> {
    let source = cache.resolver(from);
    let record = match from {
        Edition::Java => {
            let name = data
                .get_str("name")
                .filter(|name| !name.is_empty())
                .ok_or(ResolveError::MissingBiomeName)?;
            source.read_biome_name(name)?
        }
        Edition::Bedrock => {
            let id = data.get_int("id").ok_or(ResolveError::MissingBiomeId)?;
            source.read_biome_id(id as i32)?
        }
    };

    let mut out = Compound::new();
    match cache.resolver(to).write_biome(record)? {
        BiomeOutput::Name { name } => out.put("name", name),
        BiomeOutput::Id { id } => out.put("id", Tag::Int(id)),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache;

    fn default_cache() -> std::sync::Arc<ResolverCache> {
        cache::get_or_create("1.20.4", "1.20.80").unwrap()
    }

    #[test]
    fn test_name_to_id_and_back() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("name", "minecraft:plains");

        let bedrock = convert_biome(&cache, Edition::Java, Edition::Bedrock, &data).unwrap();
        let id = bedrock.get_int("id").unwrap();

        let java = convert_biome(&cache, Edition::Bedrock, Edition::Java, &bedrock).unwrap();
        assert_eq!(java.get_str("name"), Some("minecraft:plains"));
        assert_eq!(bedrock.get("id"), Some(&Tag::Int(id as i32)));
    }

    #[test]
    fn test_missing_name_message() {
        let cache = default_cache();
        let err =
            convert_biome(&cache, Edition::Java, Edition::Bedrock, &Compound::new()).unwrap_err();
        assert_eq!(
            err.message(),
            "Input data for Java biome conversion must contain a 'name' field."
        );
    }

    #[test]
    fn test_empty_name_message() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("name", "");
        let err = convert_biome(&cache, Edition::Java, Edition::Bedrock, &data).unwrap_err();
        assert_eq!(
            err.message(),
            "Input data for Java biome conversion must contain a 'name' field."
        );
    }

    #[test]
    fn test_missing_id_message() {
        let cache = default_cache();
        let err = convert_biome(&cache, Edition::Bedrock, Edition::Java, &Compound::new())
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Input data for Bedrock biome conversion must contain an 'id' field."
        );
    }

    #[test]
    fn test_unknown_name_message() {
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("name", "minecraft:nope");
        let err = convert_biome(&cache, Edition::Java, Edition::Bedrock, &data).unwrap_err();
        assert_eq!(
            err.message(),
            "Unknown or invalid Java biome name: minecraft:nope"
        );
    }

    #[test]
    fn test_gated_biome_below_the_gate() {
        // pale_garden does not exist at Java 1.20.4
        let cache = default_cache();
        let mut data = Compound::new();
        data.put("name", "minecraft:pale_garden");
        assert!(convert_biome(&cache, Edition::Java, Edition::Bedrock, &data).is_err());

        // at 1.21.4 / 1.21.40 it converts
        let cache = cache::get_or_create("1.21.4", "1.21.40").unwrap();
        let out = convert_biome(&cache, Edition::Java, Edition::Bedrock, &data).unwrap();
        assert_eq!(out.get_int("id"), Some(193));
    }
}
