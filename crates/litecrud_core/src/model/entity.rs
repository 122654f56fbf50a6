//! Entity capability and collection binding resolution.
//!
//! # Responsibility
//! - Bind an entity type to its named collection at compile time.
//! - Expose identifier access without runtime reflection.
//! - Validate a binding before any store call uses it.
//!
//! # Invariants
//! - `EntityId` 0 means "not yet assigned"; the store picks the next id.
//! - A collection name starts with a letter or `_` and only contains
//!   `[A-Za-z0-9_-]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static COLLECTION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid collection name regex"));

/// Primary key type shared by every entity.
pub type EntityId = i64;

/// Identifier value meaning "let the store assign one".
pub const UNASSIGNED_ID: EntityId = 0;

/// Capability implemented by every type stored in a collection.
///
/// The whole record is persisted as one JSON document, so the type only
/// needs serde support plus access to its primary key.
///
/// ```
/// use litecrud_core::{Entity, EntityId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Customer {
///     id: EntityId,
///     name: String,
/// }
///
/// impl Entity for Customer {
///     const COLLECTION: &'static str = "customers";
///
///     fn id(&self) -> EntityId {
///         self.id
///     }
///
///     fn set_id(&mut self, id: EntityId) {
///         self.id = id;
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned {
    /// Name of the collection holding documents of this type.
    const COLLECTION: &'static str;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);
}

/// Validated collection name for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionName(&'static str);

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Display for CollectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Error raised when an entity type cannot be bound to a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The type declares an empty collection name.
    MissingBinding { type_name: &'static str },
    /// The declared collection name is not usable as a store key.
    InvalidCollectionName {
        type_name: &'static str,
        name: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBinding { type_name } => {
                write!(f, "entity `{type_name}` has no collection binding")
            }
            Self::InvalidCollectionName { type_name, name } => write!(
                f,
                "entity `{type_name}` declares invalid collection name `{name}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolves the collection bound to `T`.
///
/// # Errors
/// - `MissingBinding` when `T::COLLECTION` is empty or blank.
/// - `InvalidCollectionName` when it fails the naming rule.
pub fn resolve_collection<T: Entity>() -> Result<CollectionName, ConfigError> {
    let type_name = std::any::type_name::<T>();
    let name = T::COLLECTION;

    if name.trim().is_empty() {
        return Err(ConfigError::MissingBinding { type_name });
    }
    if !COLLECTION_NAME_RE.is_match(name) {
        return Err(ConfigError::InvalidCollectionName { type_name, name });
    }

    Ok(CollectionName(name))
}
