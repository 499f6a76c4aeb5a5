//! Representation of the entity producing telemetry.
//!
//! The aggregation core never inspects a [`Resource`]; it is captured at
//! processor construction and carried into every summary record unchanged.

use std::collections::BTreeMap;

use crate::common::{Key, KeyValue, Value};

/// An immutable representation of the entity producing telemetry as attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resource {
    attrs: BTreeMap<Key, Value>,
}

impl Resource {
    /// Create a new `Resource` from key value pairs.
    ///
    /// Values are de-duplicated by key; the last value provided for a key
    /// wins.
    pub fn new<T: IntoIterator<Item = KeyValue>>(kvs: T) -> Self {
        let mut attrs = BTreeMap::new();
        for kv in kvs {
            attrs.insert(kv.key, kv.value);
        }
        Resource { attrs }
    }

    /// Create an empty resource.
    pub fn empty() -> Self {
        Resource::default()
    }

    /// Returns the number of attributes for this resource.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if the resource contains no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// An iterator over the resource attributes, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.attrs.iter()
    }

    /// Retrieve the value for the given key, if present.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.attrs.get(key)
    }
}
