//! NBT (Named Binary Tag) tag model and binary codec
//!
//! NBT is the serialization format used by both Minecraft editions and is the
//! wire format of every conversion payload in this crate. The Java edition
//! encodes multi-byte values big-endian, Bedrock little-endian; the codec in
//! [`codec`] supports both. [`json`] bridges tag trees to `serde_json` values
//! for the CLI surface.

pub mod codec;
pub mod json;

pub use codec::{read_be, read_le, write_be, write_le};

use thiserror::Error;

/// Maximum nesting depth accepted by the decoder.
pub const MAX_DEPTH: usize = 512;

/// Errors produced by the NBT codec.
#[derive(Debug, Error)]
pub enum NbtError {
    /// Input ended before the encoded value was complete
    #[error("Unexpected end of NBT input")]
    UnexpectedEof,

    /// A tag id byte that does not name any NBT tag kind
    #[error("Unknown NBT tag id: {0}")]
    UnknownTagId(u8),

    /// The document root must be a compound tag
    #[error("Expected compound tag at NBT root, found tag id {0}")]
    InvalidRoot(u8),

    /// Nesting exceeded [`MAX_DEPTH`]
    #[error("NBT nesting depth exceeds limit of {MAX_DEPTH}")]
    DepthLimit,

    /// A length prefix was negative
    #[error("Negative NBT length prefix: {0}")]
    NegativeLength(i32),

    /// A string payload was not valid UTF-8
    #[error("Invalid UTF-8 in NBT string: {0}")]
    InvalidString(#[from] std::string::FromUtf8Error),

    /// A string exceeded the u16 length prefix on encode
    #[error("NBT string of {len} bytes exceeds the 65535-byte limit")]
    StringTooLong { len: usize },

    /// A list mixed tags of different kinds
    #[error("NBT list elements must share one tag kind, found {found} in a list of {expected}")]
    MixedList {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single NBT tag value.
///
/// The twelve payload-carrying tag kinds; `TAG_End` exists only as a
/// terminator inside the binary encoding and never as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Binary tag id of this kind.
    pub fn id(&self) -> u8 {
        match self {
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }

    /// Human-readable kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "Byte",
            Tag::Short(_) => "Short",
            Tag::Int(_) => "Int",
            Tag::Long(_) => "Long",
            Tag::Float(_) => "Float",
            Tag::Double(_) => "Double",
            Tag::ByteArray(_) => "ByteArray",
            Tag::String(_) => "String",
            Tag::List(_) => "List",
            Tag::Compound(_) => "Compound",
            Tag::IntArray(_) => "IntArray",
            Tag::LongArray(_) => "LongArray",
        }
    }

    /// Integer value of this tag widened to i64, for the numeric tag kinds.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Byte(v) => Some(*v as i64),
            Tag::Short(v) => Some(*v as i64),
            Tag::Int(v) => Some(*v as i64),
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::String(s.to_string())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::String(s)
    }
}

impl From<i8> for Tag {
    fn from(v: i8) -> Self {
        Tag::Byte(v)
    }
}

impl From<i16> for Tag {
    fn from(v: i16) -> Self {
        Tag::Short(v)
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<i64> for Tag {
    fn from(v: i64) -> Self {
        Tag::Long(v)
    }
}

impl From<f32> for Tag {
    fn from(v: f32) -> Self {
        Tag::Float(v)
    }
}

impl From<f64> for Tag {
    fn from(v: f64) -> Self {
        Tag::Double(v)
    }
}

impl From<Compound> for Tag {
    fn from(c: Compound) -> Self {
        Tag::Compound(c)
    }
}

impl From<Vec<Tag>> for Tag {
    fn from(v: Vec<Tag>) -> Self {
        Tag::List(v)
    }
}

/// A string-keyed tag map that preserves insertion order.
///
/// Minecraft compounds are small (a handful of keys), so lookups scan the
/// backing vector rather than paying for a hash map. `put` replaces an
/// existing key in place, keeping its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace a value under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Tag>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Tag::as_str)
    }

    /// String value under `key`, or `default` when absent or not a string.
    pub fn string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    /// Integer value under `key`, widened from any integral tag kind.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Tag::as_i64)
    }

    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.get(key).and_then(Tag::as_compound)
    }

    pub fn get_list(&self, key: &str) -> Option<&[Tag]> {
        match self.get(key) {
            Some(Tag::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a str, &'a Tag);
    type IntoIter = std::vec::IntoIter<(&'a str, &'a Tag)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for (k, v) in iter {
            compound.put(k, v);
        }
        compound
    }
}
