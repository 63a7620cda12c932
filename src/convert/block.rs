//! Block conversion
//!
//! Reads `{id, states?}` through the source resolver into the
//! intermediate block, then writes it back out through the target
//! resolver. Same-edition pairs are allowed and act as normalization.
//!
//! Unknown identifiers resolve to air on read; that is only accepted
//! when the requested id itself names an air block, otherwise the
//! conversion fails with a suggestion.

use tracing::warn;

use crate::cache::ResolverCache;
use crate::model::{Edition, Identifier, StateValue, States};
use crate::nbt::{Compound, Tag};
use crate::resolve::ResolveError;

use super::ConvertError;

pub fn convert_block(
    cache: &ResolverCache,
    from: Edition,
    to: Edition,
    data: &Compound,
) -> Result<Compound, ConvertError> {
    let id = data.get_str("id").unwrap_or_default();
    let unknown = |id: &str| ResolveError::UnknownBlock {
        edition: from.display_name(),
        id: id.to_string(),
        suggestion: cache.resolver(from).suggest_block_id(id),
    };

    let mut states = States::new();
    if let Some(raw) = data.get_compound("states") {
        for (key, tag) in raw.iter() {
            match StateValue::from_nbt(tag) {
                Some(value) => {
                    states.insert(key.to_string(), value);
                }
                None => warn!(key, "Dropping non-scalar block state"),
            }
        }
    }

    let input = Identifier::parse(id, states).map_err(|_| unknown(id))?;
    let block = cache.resolver(from).read_block(&input);
    if block.is_air() && !input.id().contains("air") {
        return Err(unknown(input.id()).into());
    }

    let output = cache
        .resolver(to)
        .write_block(&block)
        .ok_or_else(|| ResolveError::BlockWriteFailed {
            from: from.display_name(),
            to: to.display_name(),
            id: block.name.clone(),
        })?;

    let mut out = Compound::new();
    out.put("id", output.id());
    if !output.states().is_empty() {
        let mut rendered = Compound::new();
        for (key, value) in output.states() {
            rendered.put(key.clone(), value.to_nbt());
        }
        out.put("states", rendered);
    }
    Ok(out)
}
