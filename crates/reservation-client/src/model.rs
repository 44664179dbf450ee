//! Values exchanged with the upstream reservation service.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One reservation as reported by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reservation {
    pub name: String,
}

impl Reservation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A collection returned by the upstream, wrapped the way hypermedia APIs wrap it.
///
/// Accepts the plain `{"content": [...]}` shape as well as the HAL shape
/// `{"_embedded": {"reservations": [...]}}`. A missing or `null` collection
/// decodes as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resources<T> {
    content: Vec<T>,
}

impl<T> Resources<T> {
    pub fn new(content: Vec<T>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl<T> Default for Resources<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
        }
    }
}

impl<T> FromIterator<T> for Resources<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Resources<Reservation> {
    /// Projects the collection to reservation names, keeping upstream order.
    pub fn names(&self) -> Vec<String> {
        self.content.iter().map(|r| r.name.clone()).collect()
    }
}

#[derive(Deserialize)]
struct WireResources<T> {
    content: Option<Vec<T>>,
    #[serde(rename = "_embedded")]
    embedded: Option<BTreeMap<String, Vec<T>>>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Resources<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireResources::<T>::deserialize(deserializer)?;
        let content = match (wire.content, wire.embedded) {
            (Some(content), _) => content,
            (None, Some(embedded)) => embedded.into_values().flatten().collect(),
            (None, None) => Vec::new(),
        };
        Ok(Self { content })
    }
}
