use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used when joining multiple values for display.
pub const DISPLAY_SEPARATOR: &str = ", ";

/// An append-ordered collection of names, each carrying one or more values.
///
/// Used for headers, query params, cookies and form fields. `order` holds
/// every name exactly once and always matches the key set of `values`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedKeyValueSet {
    order: Vec<String>,
    values: HashMap<String, Vec<String>>,
}

impl OrderedKeyValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to `name`'s value list, inserting `name` at the end of
    /// the order when it is new.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.get_mut(&name) {
            Some(list) => list.push(value),
            None => {
                self.order.push(name.clone());
                self.values.insert(name, vec![value]);
            }
        }
    }

    /// Set `name` to exactly one value, keeping its position if it exists.
    pub fn replace(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.get_mut(&name) {
            Some(list) => *list = vec![value],
            None => {
                self.order.push(name.clone());
                self.values.insert(name, vec![value]);
            }
        }
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|list| list.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Remove `name` and all its values. Returns whether anything was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        if self.values.remove(name).is_none() {
            return false;
        }
        self.order.retain(|n| n != name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.values[name].as_slice()))
    }

    /// `(name, joined values)` pairs in insertion order.
    pub fn values(&self, separator: &str) -> Vec<(String, String)> {
        self.iter()
            .map(|(name, list)| (name.to_string(), list.join(separator)))
            .collect()
    }

    /// Encode as `application/x-www-form-urlencoded`, one pair per value.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, list) in self.iter() {
            for value in list {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }

    /// Parse an URL-encoded string (a raw query or a form body).
    pub fn parse_encoded(input: &str) -> Self {
        let mut set = Self::new();
        for (name, value) in url::form_urlencoded::parse(input.as_bytes()) {
            set.set(name.into_owned(), value.into_owned());
        }
        set
    }
}

impl Serialize for OrderedKeyValueSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (name, list) in self.iter() {
            map.serialize_entry(name, list)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedKeyValueSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = OrderedKeyValueSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of names to lists of strings")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(OrderedKeyValueSet::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = OrderedKeyValueSet::new();
                while let Some((name, list)) = access.next_entry::<String, Vec<String>>()? {
                    for value in list {
                        set.set(name.clone(), value);
                    }
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(SetVisitor)
    }
}
