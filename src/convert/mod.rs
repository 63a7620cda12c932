//! The five conversions
//!
//! Each conversion takes a resolver cache, a direction and the request
//! `data` compound, and produces the result compound that becomes the
//! envelope's `data`. Blocks, items and biomes accept any edition pair
//! (same-edition normalizes); entities and block entities only convert
//! across editions.

mod biome;
mod block;
mod block_entity;
mod entity;
mod item;

pub use biome::convert_biome;
pub use block::convert_block;
pub use block_entity::convert_block_entity;
pub use entity::convert_entity;
pub use item::convert_item;

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cache::ResolverCache;
use crate::mappings::MappingError;
use crate::model::Edition;
use crate::nbt::{Compound, NbtError};
use crate::resolve::ResolveError;

/// Which of the five conversions a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Block,
    Item,
    Entity,
    Biome,
    BlockEntity,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::Block,
        Kind::Item,
        Kind::Entity,
        Kind::Biome,
        Kind::BlockEntity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Block => "block",
            Kind::Item => "item",
            Kind::Entity => "entity",
            Kind::Biome => "biome",
            Kind::BlockEntity => "block_entity",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("Unknown conversion kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(Kind::Block),
            "item" => Ok(Kind::Item),
            "entity" => Ok(Kind::Entity),
            "biome" => Ok(Kind::Biome),
            "block_entity" | "block-entity" => Ok(Kind::BlockEntity),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// Errors surfaced by a conversion. The envelope layer renders these into
/// the `{success:0, error, stackTrace}` response; `message` text is part
/// of the wire contract.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Unsupported conversion direction: {from} to {to}")]
    UnsupportedDirection { from: Edition, to: Edition },

    #[error("Missing 'data' field in input NBT")]
    MissingData,

    #[error(transparent)]
    Edition(#[from] crate::model::UnknownEdition),

    #[error(transparent)]
    Nbt(#[from] NbtError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Failed to decode Base64 input: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl ConvertError {
    /// The top-level message, as placed in the response `error` field.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The rendered error chain, as placed in the response `stackTrace`
    /// field.
    pub fn stack_trace(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = StdError::source(self);
        while let Some(err) = source {
            rendered.push_str("\nCaused by: ");
            rendered.push_str(&err.to_string());
            source = err.source();
        }
        rendered
    }
}

/// Dispatch a conversion by kind.
pub fn convert(
    kind: Kind,
    cache: &ResolverCache,
    from: Edition,
    to: Edition,
    data: &Compound,
) -> Result<Compound, ConvertError> {
    match kind {
        Kind::Block => convert_block(cache, from, to, data),
        Kind::Item => convert_item(cache, from, to, data),
        Kind::Entity => convert_entity(cache, from, to, data),
        Kind::Biome => convert_biome(cache, from, to, data),
        Kind::BlockEntity => convert_block_entity(cache, from, to, data),
    }
}

/// Entities and block entities only convert across editions.
fn require_cross_edition(from: Edition, to: Edition) -> Result<(), ConvertError> {
    if from == to {
        return Err(ConvertError::UnsupportedDirection { from, to });
    }
    Ok(())
}
