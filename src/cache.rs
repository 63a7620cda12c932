//! Resolver cache keyed by (Java, Bedrock) version pair
//!
//! Building a [`ResolverSet`] parses and indexes every mapping table, so
//! built pairs are cached process-wide and shared behind `Arc`. Both
//! edition resolvers of a pair share one parsed table set.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;
use uuid::Uuid;

use crate::mappings::{MappingError, Mappings};
use crate::model::Edition;
use crate::resolve::ResolverSet;
use crate::versions::{self, GameVersion};

static CACHE: Lazy<DashMap<(GameVersion, GameVersion), Arc<ResolverCache>>> =
    Lazy::new(DashMap::new);

/// Resolvers for one (Java version, Bedrock version) pair.
pub struct ResolverCache {
    java_version: GameVersion,
    bedrock_version: GameVersion,
    session: Uuid,
    java: ResolverSet,
    bedrock: ResolverSet,
}

impl ResolverCache {
    fn build(
        java_version: GameVersion,
        bedrock_version: GameVersion,
    ) -> Result<ResolverCache, MappingError> {
        let mappings = Arc::new(Mappings::load()?);
        let session = Uuid::new_v4();
        debug!(%java_version, %bedrock_version, %session, "Building resolver cache");
        Ok(ResolverCache {
            java_version,
            bedrock_version,
            session,
            java: ResolverSet::new(Edition::Java, java_version, mappings.clone()),
            bedrock: ResolverSet::new(Edition::Bedrock, bedrock_version, mappings),
        })
    }

    pub fn java_version(&self) -> GameVersion {
        self.java_version
    }

    pub fn bedrock_version(&self) -> GameVersion {
        self.bedrock_version
    }

    /// Identifies this cache instance in logs.
    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn resolver(&self, edition: Edition) -> &ResolverSet {
        match edition {
            Edition::Java => &self.java,
            Edition::Bedrock => &self.bedrock,
        }
    }
}

/// Fetch or build the cache for a requested version pair. The requested
/// strings go through nearest-match resolution first, so requests that
/// resolve to the same supported pair share one cache entry.
pub fn get_or_create(java: &str, bedrock: &str) -> Result<Arc<ResolverCache>, MappingError> {
    let java_version = versions::nearest(Edition::Java, java);
    let bedrock_version = versions::nearest(Edition::Bedrock, bedrock);
    if let Some(cached) = CACHE.get(&(java_version, bedrock_version)) {
        return Ok(cached.clone());
    }
    let built = Arc::new(ResolverCache::build(java_version, bedrock_version)?);
    let entry = CACHE
        .entry((java_version, bedrock_version))
        .or_insert(built);
    Ok(entry.clone())
}

/// Build the default version pair ahead of the first conversion.
pub fn prewarm() -> Result<(), MappingError> {
    get_or_create(
        &versions::DEFAULT_JAVA.to_string(),
        &versions::DEFAULT_BEDROCK.to_string(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_resolved_pair_shares_an_entry() {
        let a = get_or_create("1.20.4", "1.20.80").unwrap();
        // 1.20.5 resolves down to 1.20.4.
        let b = get_or_create("1.20.5", "1.20.80").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.java_version(), GameVersion::new(1, 20, 4));
    }

    #[test]
    fn test_distinct_pairs_get_distinct_caches() {
        let a = get_or_create("1.20.4", "1.20.80").unwrap();
        let b = get_or_create("1.18.2", "1.20.80").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(a.session(), b.session());
    }

    #[test]
    fn test_prewarm_builds_the_default_pair() {
        prewarm().unwrap();
        let cached = get_or_create("1.21.10", "1.21.120").unwrap();
        assert_eq!(cached.java_version(), versions::DEFAULT_JAVA);
        assert_eq!(cached.bedrock_version(), versions::DEFAULT_BEDROCK);
    }

    #[test]
    fn test_resolver_editions() {
        let cached = get_or_create("1.20.4", "1.20.80").unwrap();
        assert_eq!(cached.resolver(Edition::Java).edition(), Edition::Java);
        assert_eq!(
            cached.resolver(Edition::Bedrock).edition(),
            Edition::Bedrock
        );
    }
}
