use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::common::{Key, KeyValue, Value};

/// The set of key-value attributes identifying one timeseries within an
/// instrument.
///
/// Construction sorts the attributes by key and removes duplicate keys,
/// keeping the value provided last, so two sets built from re-ordered inputs
/// compare and hash equal. The hash is computed once up front; `Hash` only
/// replays the cached value.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct AttributeSet(Vec<KeyValue>, u64);

impl From<&[KeyValue]> for AttributeSet {
    fn from(values: &[KeyValue]) -> Self {
        let mut vec = Vec::from_iter(values.iter().cloned());
        vec.sort_by(|a, b| a.key.cmp(&b.key));

        // we cannot use vec.dedup_by because it will remove last duplicate not first
        if vec.len() > 1 {
            let mut i = vec.len() - 1;
            while i != 0 {
                if vec[i - 1].key == vec[i].key {
                    vec.remove(i - 1);
                }
                i -= 1;
            }
        }

        let hash = calculate_hash(&vec);
        AttributeSet(vec, hash)
    }
}

fn calculate_hash(values: &[KeyValue]) -> u64 {
    let mut hasher = FxHasher::default();
    values.iter().fold(&mut hasher, |hasher, item| {
        item.hash(hasher);
        hasher
    });
    hasher.finish()
}

impl AttributeSet {
    /// Returns the number of attributes in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set contains no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over key value pairs in the set.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.0.iter().map(|kv| (&kv.key, &kv.value))
    }

    /// Copy the attributes into a plain vector, ordered by key.
    pub fn to_vec(&self) -> Vec<KeyValue> {
        self.0.clone()
    }
}

impl Hash for AttributeSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn attributes_are_sorted_by_key() {
        let set = AttributeSet::from(&[KeyValue::new("b", 2), KeyValue::new("a", 1)][..]);
        let keys: Vec<_> = set.iter().map(|(k, _)| k.as_str().to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn last_duplicate_wins() {
        let set = AttributeSet::from(
            &[
                KeyValue::new("a", 1),
                KeyValue::new("b", 1),
                KeyValue::new("a", 2),
            ][..],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().find(|(k, _)| k.as_str() == "a").map(|(_, v)| v),
            Some(&Value::I64(2))
        );
    }

    #[test]
    fn reordered_inputs_are_interchangeable_map_keys() {
        let a = AttributeSet::from(&[KeyValue::new("a", 1), KeyValue::new("b", 2)][..]);
        let b = AttributeSet::from(&[KeyValue::new("b", 2), KeyValue::new("a", 1)][..]);
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, 1);
        map.insert(b, 2);
        assert_eq!(map.len(), 1);
    }
}
