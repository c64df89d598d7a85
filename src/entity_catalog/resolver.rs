//! Process-wide metadata cache
//!
//! Metadata is derived from [`Entity::describe`] the first time a type is used and
//! shared afterwards. Two threads racing on first use may both derive it; the first
//! insert wins and both get the same `Arc`.

use super::entity::Entity;
use super::errors::MetadataError;
use super::metadata::EntityMetadata;
use lazy_static::lazy_static;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref METADATA_CACHE: RwLock<HashMap<TypeId, Arc<EntityMetadata>>> =
        RwLock::new(HashMap::new());
}

pub fn resolve<T: Entity>() -> Result<Arc<EntityMetadata>, MetadataError> {
    let type_id = TypeId::of::<T>();
    {
        let cache = METADATA_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(metadata) = cache.get(&type_id) {
            return Ok(Arc::clone(metadata));
        }
    }

    let metadata = Arc::new(EntityMetadata::from_descriptor(&T::describe())?);
    log::debug!(
        "Resolved metadata for {}: tables {:?}, {} columns",
        metadata.entity_name,
        metadata.table_name_candidates,
        metadata.columns.len()
    );

    let mut cache = METADATA_CACHE.write().unwrap_or_else(|e| e.into_inner());
    Ok(Arc::clone(cache.entry(type_id).or_insert(metadata)))
}
