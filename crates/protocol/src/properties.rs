use core::borrow::Borrow;
use core::fmt;
use core::iter::Map;
use core::mem;
use std::collections::btree_map;

use alloc::string::String;
use alloc::vec::Vec;

use std::collections::BTreeMap;

use crate::Prop;
use crate::error::ErrorKind;
use crate::Error;

/// Collection of properties.
#[derive(Default)]
pub struct Properties {
    properties: BTreeMap<String, String>,
    modified: bool,
}

impl Properties {
    /// Create a new empty collection of properties.
    pub const fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
            modified: false,
        }
    }

    /// Test if the properties collection has been modified.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Take the modification state of the properties.
    pub fn take_modified(&mut self) -> bool {
        mem::take(&mut self.modified)
    }

    /// Get the number of properties in the collection.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Iterate over the properties in the collection.
    pub fn iter(&self) -> impl Iterator<Item = (&Prop, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (Prop::new(k.as_str()), v.as_str()))
    }

    /// Insert a property into the collection.
    pub fn insert(&mut self, key: impl AsRef<Prop>, value: impl AsRef<str>) -> bool {
        let key = key.as_ref().as_str();
        let value = value.as_ref();

        let old = self
            .properties
            .insert(String::from(key), String::from(value));

        let Some(old) = old else {
            self.modified = true;
            return true;
        };

        if old == value {
            return false;
        }

        self.modified = true;
        true
    }

    /// Remove and return a property by its key.
    pub fn remove<K>(&mut self, key: &K) -> Option<String>
    where
        K: ?Sized + Ord,
        String: Borrow<K>,
    {
        let value = self.properties.remove(key);
        self.modified |= value.is_some();
        value
    }

    /// Get the value of a property by its key.
    pub fn get<K>(&self, key: &K) -> Option<&str>
    where
        K: ?Sized + Ord,
        String: Borrow<K>,
    {
        self.properties.get(key).map(|s| s.as_str())
    }

    /// Extend this collection of properties with another.
    ///
    /// Returns `true` if any properties were added or modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use protocol::Properties;
    ///
    /// let mut props = Properties::new();
    /// props.insert("key1", "value1");
    ///
    /// let mut other = Properties::new();
    /// other.insert("key2", "value2");
    ///
    /// assert!(props.extend(&other));
    /// assert_eq!(props.len(), 2);
    /// assert_eq!(props.get("key1"), Some("value1"));
    /// assert_eq!(props.get("key2"), Some("value2"));
    ///
    /// assert!(!props.extend(&other));
    ///
    /// let mut another = Properties::new();
    /// another.insert("key1", "new_value1");
    ///
    /// assert!(props.extend(&another));
    /// assert_eq!(props.len(), 2);
    /// assert_eq!(props.get("key1"), Some("new_value1"));
    /// assert_eq!(props.get("key2"), Some("value2"));
    /// ```
    pub fn extend<K, V>(&mut self, iter: impl IntoIterator<Item = (K, V)>) -> bool
    where
        K: AsRef<Prop>,
        V: AsRef<str>,
    {
        let mut modified = false;

        for (key, value) in iter {
            modified |= self.insert(key, value);
        }

        modified
    }

    /// Encode this collection as a tagged dictionary variant (spec.md §4.12,
    /// §8): a magic tag, a key count, then `(key_len, key, value_len,
    /// value)` tuples in key order. All lengths are little-endian `u32`.
    ///
    /// This is the same "count-then-pairs" shape
    /// `crates/client/src/client.rs`'s `client_update_properties` builds by
    /// hand for the wire, generalized into a reusable encode/decode pair
    /// that doesn't depend on the wire pod format.
    ///
    /// # Examples
    ///
    /// ```
    /// use protocol::Properties;
    ///
    /// let mut props = Properties::new();
    /// props.insert("node.name", "sink");
    /// props.insert("media.type", "Audio");
    ///
    /// let bytes = props.to_variant();
    /// let decoded = Properties::from_variant(&bytes).unwrap();
    ///
    /// assert_eq!(decoded.get("node.name"), Some("sink"));
    /// assert_eq!(decoded.get("media.type"), Some("Audio"));
    /// assert_eq!(decoded.len(), props.len());
    /// ```
    pub fn to_variant(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MAGIC.len() + 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&(self.properties.len() as u32).to_le_bytes());

        for (key, value) in &self.properties {
            out.extend_from_slice(&(key.len() as u32).to_le_bytes());
            out.extend_from_slice(key.as_bytes());
            out.extend_from_slice(&(value.len() as u32).to_le_bytes());
            out.extend_from_slice(value.as_bytes());
        }

        out
    }

    /// Decode a variant produced by [`Self::to_variant`].
    ///
    /// `properties_from_variant(properties_to_variant(p)) == p` for every
    /// `p`, per spec.md §8's round-trip law.
    pub fn from_variant(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes);

        if cursor.take(MAGIC.len())? != MAGIC {
            return Err(ErrorKind::InvalidVariant.into());
        }

        let count = cursor.take_u32()?;
        let mut properties = Properties::new();

        for _ in 0..count {
            let key_len = cursor.take_u32()? as usize;
            let key = cursor.take_str(key_len)?;
            let value_len = cursor.take_u32()? as usize;
            let value = cursor.take_str(value_len)?;
            properties.insert(key, value);
        }

        if !cursor.is_empty() {
            return Err(ErrorKind::InvalidVariant.into());
        }

        properties.modified = false;
        Ok(properties)
    }
}

const MAGIC: &[u8; 4] = b"PR01";

struct Cursor<'a> {
    rest: &'a [u8],
}

impl<'a> Cursor<'a> {
    #[inline]
    fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.rest.len() < len {
            return Err(ErrorKind::InvalidVariant.into());
        }

        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Ok(head)
    }

    fn take_u32(&mut self) -> Result<u32, Error> {
        let bytes = self.take(4)?;
        let array: [u8; 4] = bytes.try_into().map_err(|_| Error::from(ErrorKind::InvalidVariant))?;
        Ok(u32::from_le_bytes(array))
    }

    fn take_str(&mut self, len: usize) -> Result<&'a str, Error> {
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes).map_err(|_| ErrorKind::InvalidVariant.into())
    }
}

impl fmt::Debug for Properties {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.properties.fmt(f)
    }
}

/// The iterator produced by iterating over a borrowed [`Properties`].
pub type Iter<'a> =
    Map<btree_map::Iter<'a, String, String>, fn((&'a String, &'a String)) -> (&'a Prop, &'a str)>;

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a Prop, &'a str);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.properties
            .iter()
            .map(|(k, v)| (Prop::new(k.as_str()), v.as_str()))
    }
}
