//! Typed Rust client API
//!
//! [`Converter`] is the in-process entry point: typed requests in, typed
//! results out, no Base64 wire framing. The CLI and embedding Rust code
//! use it; C callers go through [`crate::ffi`] instead.

use std::sync::Arc;

use crate::cache::{self, ResolverCache};
use crate::convert::{self, ConvertError};
use crate::envelope;
use crate::model::{
    BiomeOutput, BiomeRequest, Block, BlockEntityRequest, BlockRequest, ConversionRequest,
    EntityRequest, ItemRequest, StateValue,
};
use crate::nbt::{Compound, Tag};

/// A stateless conversion client. Construction is free; resolver caches
/// are shared process-wide, so `Converter` values can be created ad hoc.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter;

impl Converter {
    pub fn new() -> Converter {
        Converter
    }

    pub fn convert_block(&self, request: &BlockRequest) -> Result<Block, ConvertError> {
        let mut data = Compound::new();
        data.put("id", request.block.id.clone());
        if !request.block.states.is_empty() {
            let mut states = Compound::new();
            for (key, value) in &request.block.states {
                states.put(key.clone(), value.to_nbt());
            }
            data.put("states", states);
        }

        let (cache, common) = self.prepare(&request.common)?;
        let out = convert::convert_block(&cache, common.from_edition, common.to_edition, &data)?;

        let mut states = crate::model::States::new();
        if let Some(raw) = out.get_compound("states") {
            for (key, tag) in raw.iter() {
                if let Some(value) = StateValue::from_nbt(tag) {
                    states.insert(key.to_string(), value);
                }
            }
        }
        Ok(Block {
            id: out.get_str("id").unwrap_or_default().to_string(),
            states,
        })
    }

    pub fn convert_item(&self, request: &ItemRequest) -> Result<Compound, ConvertError> {
        let (cache, common) = self.prepare(&request.common)?;
        convert::convert_item(&cache, common.from_edition, common.to_edition, &request.item)
    }

    pub fn convert_entity(&self, request: &EntityRequest) -> Result<Compound, ConvertError> {
        let (cache, common) = self.prepare(&request.common)?;
        convert::convert_entity(
            &cache,
            common.from_edition,
            common.to_edition,
            &request.entity,
        )
    }

    pub fn convert_biome(&self, request: &BiomeRequest) -> Result<BiomeOutput, ConvertError> {
        let (cache, common) = self.prepare(&request.common)?;
        let out = convert::convert_biome(
            &cache,
            common.from_edition,
            common.to_edition,
            &request.data,
        )?;
        Ok(match out.get("id") {
            Some(Tag::Int(id)) => BiomeOutput::Id { id: *id },
            _ => BiomeOutput::Name {
                name: out.get_str("name").unwrap_or_default().to_string(),
            },
        })
    }

    pub fn convert_block_entity(
        &self,
        request: &BlockEntityRequest,
    ) -> Result<Compound, ConvertError> {
        let (cache, common) = self.prepare(&request.common)?;
        convert::convert_block_entity(
            &cache,
            common.from_edition,
            common.to_edition,
            &request.block_entity,
        )
    }

    fn prepare<'a>(
        &self,
        common: &'a ConversionRequest,
    ) -> Result<(Arc<ResolverCache>, &'a ConversionRequest), ConvertError> {
        let (java, bedrock) = envelope::assign_versions(
            common.from_edition,
            common.to_edition,
            &common.from_version,
            &common.to_version,
        );
        Ok((cache::get_or_create(&java, &bedrock)?, common))
    }
}
