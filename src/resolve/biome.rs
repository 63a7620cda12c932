//! Biome resolution
//!
//! Java names biomes (`minecraft:plains`), Bedrock numbers them. Both map
//! through the intermediate biome name. Version gates cover biomes added
//! mid-stream: a gated biome does not exist below its `since` version in
//! either edition.

use crate::mappings::BiomeRecord;
use crate::model::{BiomeOutput, Edition};

use super::{ResolveError, ResolverSet};

impl ResolverSet {
    /// Resolve a Java biome name to the mapping record.
    pub fn read_biome_name(&self, name: &str) -> Result<&BiomeRecord, ResolveError> {
        self.biome_by_java_name
            .get(name)
            .map(|&r| &self.mappings.biomes[r])
            .filter(|record| record.gate(self.edition).contains(self.version))
            .ok_or_else(|| ResolveError::UnknownBiomeName {
                name: name.to_string(),
            })
    }

    /// Resolve a Bedrock biome id to the mapping record.
    pub fn read_biome_id(&self, id: i32) -> Result<&BiomeRecord, ResolveError> {
        self.biome_by_bedrock_id
            .get(&id)
            .map(|&r| &self.mappings.biomes[r])
            .filter(|record| record.gate(self.edition).contains(self.version))
            .ok_or(ResolveError::UnknownBiomeId { id: id as i64 })
    }

    /// Render a biome record for this edition. Fails when the biome does
    /// not exist at this resolver's version.
    pub fn write_biome(&self, record: &BiomeRecord) -> Result<BiomeOutput, ResolveError> {
        if !record.gate(self.edition).contains(self.version) {
            return Err(match self.edition {
                Edition::Java => ResolveError::BiomeToJavaFailed {
                    biome: record.intermediate.clone(),
                },
                Edition::Bedrock => ResolveError::BiomeToBedrockFailed {
                    biome: record.intermediate.clone(),
                },
            });
        }
        Ok(match self.edition {
            Edition::Java => BiomeOutput::Name {
                name: record.java.clone(),
            },
            Edition::Bedrock => BiomeOutput::Id {
                id: record.bedrock_id,
            },
        })
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

    #[test]
    fn test_name_to_id() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let record = java.read_biome_name("minecraft:plains").unwrap();
        assert_eq!(
            bedrock.write_biome(record).unwrap(),
            BiomeOutput::Id { id: 1 }
        );
    }

    #[test]
    fn test_id_to_name() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let record = bedrock.read_biome_id(37).unwrap();
        assert_eq!(
            java.write_biome(record).unwrap(),
            BiomeOutput::Name {
                name: "minecraft:badlands".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_name_and_id() {
        let java = resolver(Edition::Java, GameVersion::new(1, 20, 4));
        let bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 20, 80));

        let err = java.read_biome_name("minecraft:candy_land").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown or invalid Java biome name: minecraft:candy_land"
        );

        let err = bedrock.read_biome_id(9999).unwrap_err();
        assert_eq!(err.to_string(), "Unknown or invalid Bedrock biome ID: 9999");
    }

    #[test]
    fn test_gated_biome_below_and_at_gate() {
        // pale_garden gates at 1.21.40
        let old_bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 21, 0));
        let new_bedrock = resolver(Edition::Bedrock, GameVersion::new(1, 21, 40));
        let java = resolver(Edition::Java, GameVersion::new(1, 21, 10));

        assert!(old_bedrock.read_biome_id(193).is_err());

        let record = new_bedrock.read_biome_id(193).unwrap();
        assert_eq!(record.intermediate, "pale_garden");

        let record = java.read_biome_name("minecraft:pale_garden").unwrap();
        let err = old_bedrock.write_biome(record).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to convert biome to Bedrock ID: pale_garden"
        );
    }
}
