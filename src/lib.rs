//! crocon - Minecraft Java/Bedrock data conversion
//!
//! This library converts Minecraft data structures between the Java and
//! Bedrock editions: blocks (with state translation), item stacks,
//! entities, biomes and block entities, honoring per-version mapping
//! tables on both sides.
//!
//! # Core Concepts
//!
//! - **Intermediate model**: every conversion reads edition data into a
//!   canonical, Java-flavored form and writes it back out for the target
//!   edition; no pairwise edition-to-edition tables exist
//! - **Resolvers**: per-(edition, version) lookup structures built from
//!   the embedded mapping data and cached process-wide
//! - **Envelope**: the Base64/NBT wire format used by the C ABI; Rust
//!   callers skip it and use [`Converter`] directly
//!
//! # Example Usage
//!
//! ```
//! use crocon::{Block, BlockRequest, ConversionRequest, Converter};
//!
//! let converter = Converter::new();
//! let result = converter.convert_block(&BlockRequest {
//!     common: ConversionRequest::default(),
//!     block: Block {
//!         id: "minecraft:stone".to_string(),
//!         states: Default::default(),
//!     },
//! })?;
//! assert_eq!(result.id, "minecraft:stone");
//! # Ok::<(), crocon::ConvertError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`nbt`]: tag model, binary codec (both endiannesses) and JSON bridge
//! - [`mappings`]: embedded mapping tables and their schema
//! - [`resolve`]: per-edition resolvers over the intermediate model
//! - [`convert`]: the five conversions
//! - [`envelope`] / [`ffi`]: the wire format and the C ABI over it

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod convert;
pub mod envelope;
pub mod ffi;
pub mod mappings;
pub mod model;
pub mod nbt;
pub mod resolve;
pub mod versions;

// Re-export key types for convenient access
pub use api::Converter;
pub use config::{ConfigError, CroconConfig};
pub use convert::{ConvertError, Kind};
pub use model::{
    BiomeOutput, BiomeRequest, Block, BlockEntityRequest, BlockRequest, ConversionRequest,
    Edition, EntityRequest, Identifier, ItemRequest, StateValue, States,
};
pub use nbt::{Compound, NbtError, Tag};
pub use versions::GameVersion;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_crocon() {
        assert_eq!(NAME, "crocon");
    }
}
