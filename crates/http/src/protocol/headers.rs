//! Case-insensitive header field storage.
//!
//! Field names are normalized to lowercase on every access. Setting a name
//! that is already present combines the values into a comma separated list,
//! following the list semantics of
//! [RFC 9110 Section 5.3](https://www.rfc-editor.org/rfc/rfc9110#section-5.3).

use std::collections::HashMap;
use std::collections::hash_map;

/// A set of header fields keyed by lowercase field name.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The headers every plain response starts with: `Connection: close`
    /// plus the body's content type and length.
    pub fn default_response(content_type: &str, content_length: usize) -> Self {
        let mut headers = Self::new();
        headers.set("Connection", "close");
        headers.set("Content-Type", content_type);
        headers.set("Content-Length", content_length.to_string());
        headers
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Sets `name` to `value`, appending as `"<old>, <new>"` when the field
    /// already exists.
    pub fn set<V: Into<String>>(&mut self, name: &str, value: V) {
        let value = value.into();
        match self.fields.entry(name.to_ascii_lowercase()) {
            hash_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    /// Sets `name` to `value`, discarding any previous value.
    pub fn replace<V: Into<String>>(&mut self, name: &str, value: V) -> Option<String> {
        self.fields.insert(name.to_ascii_lowercase(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.fields.iter() }
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl<N: AsRef<str>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.set(name.as_ref(), value);
        }
    }
}

/// Iterator over `(name, value)` pairs of a [`Headers`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
