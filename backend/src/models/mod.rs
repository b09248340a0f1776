use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const PRICE_INVALID: &str = "Price must be a positive number";
pub const USER_ID_REQUIRED: &str = "UserId is required";
pub const USER_NAME_REQUIRED: &str = "UserName is required";

/// Listing state of a property. Anything outside this set is rejected when
/// the request is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Pending,
    Sold,
}

/// A stored listing. Only the store holds these; callers get clones.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: u64,
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub address: String,
    pub price: f64,
    pub note: Option<String>,
    pub status: Option<PropertyStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// External representation of the record. Every field is passed through;
    /// this is the place to drop anything that should not leave the service.
    pub fn to_response(&self) -> PropertyResponse {
        PropertyResponse {
            id: self.id,
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            title: self.title.clone(),
            address: self.address.clone(),
            price: self.price,
            note: self.note.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// Whole prices go out as integers, so `100` comes back as `100`, not `100.0`.
fn serialize_price<S>(price: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if price.fract() == 0.0 && price.abs() <= EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: u64,
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub address: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Required fields are optional here so a missing one is
/// reported by `validate` together with every other problem.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub price: Option<Value>,
    pub note: Option<String>,
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn message(&self) -> String {
        self.errors.join(", ")
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Positive finite number, or `None` for anything else (strings, null, zero...).
pub fn validate_price(value: &Value) -> Option<f64> {
    value.as_f64().filter(|price| price.is_finite() && *price > 0.0)
}

impl NewProperty {
    /// Checks the payload shape and returns every rule it breaks.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();

        if is_blank(self.title.as_deref()) {
            errors.push(TITLE_REQUIRED.to_string());
        }
        if is_blank(self.address.as_deref()) {
            errors.push(ADDRESS_REQUIRED.to_string());
        }
        if self.price.as_ref().and_then(validate_price).is_none() {
            errors.push(PRICE_INVALID.to_string());
        }
        if is_blank(self.user_id.as_deref()) {
            errors.push(USER_ID_REQUIRED.to_string());
        }
        if is_blank(self.user_name.as_deref()) {
            errors.push(USER_NAME_REQUIRED.to_string());
        }

        ValidationReport::from_errors(errors)
    }

    pub fn into_property(self, id: u64, now: DateTime<Utc>) -> Result<Property, ValidationReport> {
        let report = self.validate();
        let price = self.price.as_ref().and_then(validate_price);
        match (self.user_id, self.user_name, self.title, self.address, price) {
            (Some(user_id), Some(user_name), Some(title), Some(address), Some(price))
                if report.is_valid =>
            {
                Ok(Property {
                    id,
                    user_id,
                    user_name,
                    title,
                    address,
                    price,
                    note: self.note,
                    status: self.status,
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(report),
        }
    }
}

// An explicit `null` must count as "present": `Some(None)` rather than `None`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn blanked(field: &Option<Option<String>>) -> bool {
    matches!(field, Some(value) if is_blank(value.as_deref()))
}

/// Update payload. Keys that are absent leave the stored field alone; a key
/// sent as `null` clears `note`/`status` and is rejected for required fields.
/// `id`, `createdAt` and `updatedAt` are not part of it and are ignored if sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub user_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub note: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<PropertyStatus>>,
}

impl PropertyPatch {
    /// Same rules as creation, applied only to the keys the patch carries.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();

        if blanked(&self.title) {
            errors.push(TITLE_REQUIRED.to_string());
        }
        if blanked(&self.address) {
            errors.push(ADDRESS_REQUIRED.to_string());
        }
        if let Some(price) = &self.price {
            if validate_price(price).is_none() {
                errors.push(PRICE_INVALID.to_string());
            }
        }
        if blanked(&self.user_id) {
            errors.push(USER_ID_REQUIRED.to_string());
        }
        if blanked(&self.user_name) {
            errors.push(USER_NAME_REQUIRED.to_string());
        }

        ValidationReport::from_errors(errors)
    }

    /// Shallow merge onto `property`. Call only after `validate` passed.
    pub fn apply(self, property: &mut Property) {
        if let Some(Some(user_id)) = self.user_id {
            property.user_id = user_id;
        }
        if let Some(Some(user_name)) = self.user_name {
            property.user_name = user_name;
        }
        if let Some(Some(title)) = self.title {
            property.title = title;
        }
        if let Some(Some(address)) = self.address {
            property.address = address;
        }
        if let Some(price) = self.price.as_ref().and_then(validate_price) {
            property.price = price;
        }
        if let Some(note) = self.note {
            property.note = note;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
    }
}

/// Query string of the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyQuery {
    pub status: Option<PropertyStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyPage {
    pub properties: Vec<PropertyResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}
