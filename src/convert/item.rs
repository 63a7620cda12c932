//! Item stack conversion

use crate::cache::ResolverCache;
use crate::model::Edition;
use crate::nbt::Compound;
use crate::resolve::ResolveError;

use super::ConvertError;

pub fn convert_item(
    cache: &ResolverCache,
    from: Edition,
    to: Edition,
    data: &Compound,
) -> Result<Compound, ConvertError> {
    let item = cache.resolver(from).read_item(data)?;
    cache
        .resolver(to)
        .write_item(&item)
        .ok_or_else(|| {
            ConvertError::from(ResolveError::ItemWriteFailed {
                to: to.display_name(),
                id: item.name.clone(),
            })
        })
}
