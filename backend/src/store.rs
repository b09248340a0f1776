use chrono::Utc;
use parking_lot::Mutex;

use crate::error::PropertyError;
use crate::models::{
    NewProperty, Property, PropertyPage, PropertyPatch, PropertyQuery, PropertyResponse,
    PropertyStatus,
};

/// Ids come in as path segments. Anything that is not a plain unsigned
/// integer matches no record.
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

struct StoreState {
    properties: Vec<Property>,
    next_id: u64,
}

/// In-memory property collection.
///
/// The records and the id counter live behind one lock, so every operation
/// runs as a single critical section. Ids are never reused, deleted ones
/// included. Every method hands back owned copies.
pub struct PropertyStore {
    state: Mutex<StoreState>,
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                properties: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn create(&self, input: NewProperty) -> Result<Property, PropertyError> {
        let mut state = self.state.lock();
        let id = state.next_id;
        let property = input.into_property(id, Utc::now())?;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| PropertyError::Internal("property id space exhausted".to_string()))?;
        state.properties.push(property.clone());
        log::debug!("Stored property {}", id);
        Ok(property)
    }

    /// Snapshot of every record in insertion order, optionally only those
    /// with the given status.
    pub fn list(&self, status: Option<PropertyStatus>) -> Vec<PropertyResponse> {
        let state = self.state.lock();
        state
            .properties
            .iter()
            .filter(|property| status.map_or(true, |s| property.status == Some(s)))
            .map(Property::to_response)
            .collect()
    }

    /// Filters first, then cuts the `offset..offset + limit` window.
    /// `total` is the filtered count before the window is applied.
    /// A missing or zero limit means "everything from offset".
    pub fn list_page(&self, query: &PropertyQuery) -> PropertyPage {
        let properties = self.list(query.status);
        let total = properties.len();
        let limit = query.limit.filter(|limit| *limit > 0);
        let offset = query.offset.unwrap_or(0);

        let properties = properties
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        PropertyPage {
            properties,
            total,
            limit: limit.unwrap_or(total),
            offset,
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<Property> {
        let id = parse_id(id)?;
        let state = self.state.lock();
        state.properties.iter().find(|p| p.id == id).cloned()
    }

    /// Validates the patch before touching anything, then merges it.
    /// `updated_at` moves forward even when no field changed.
    pub fn update(&self, id: &str, patch: PropertyPatch) -> Result<Property, PropertyError> {
        let id = parse_id(id).ok_or(PropertyError::NotFound)?;
        let mut state = self.state.lock();
        let property = state
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PropertyError::NotFound)?;

        let report = patch.validate();
        if !report.is_valid {
            return Err(report.into());
        }

        patch.apply(property);
        property.updated_at = Utc::now().max(property.updated_at);
        log::debug!("Updated property {}", id);
        Ok(property.clone())
    }

    pub fn delete(&self, id: &str) -> Result<Property, PropertyError> {
        let id = parse_id(id).ok_or(PropertyError::NotFound)?;
        let mut state = self.state.lock();
        let index = state
            .properties
            .iter()
            .position(|p| p.id == id)
            .ok_or(PropertyError::NotFound)?;
        let removed = state.properties.remove(index);
        log::debug!("Deleted property {}", id);
        Ok(removed)
    }
}
