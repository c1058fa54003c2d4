//! # Codeword - Barcode Symbology Translation Engine
//!
//! Converts printable message strings into the sequences of integer
//! ordinals a barcode symbology's symbol table consumes.
//!
//! ## Features
//!
//! - **Direct character maps** built from alphabet strings with offsets
//!   and skip characters
//! - **Code 128 escape grammar** with the stateful code set A/B/C shift
//!   mechanism and caret-escaped non-printables
//! - **Lazy, single-pass translation** driven by a growable lookahead queue
//! - **Three error policies**: raise, ignore (default), or replace with a
//!   caller-chosen unit
//!
//! ## Quick Start
//!
//! ```rust
//! use codeword::{digits, Codeword, ErrorPolicy, TranslateChars};
//!
//! let mut translation = digits();
//! let codewords: codeword::Result<Vec<Codeword>> = translation
//!     .translate("0123", ErrorPolicy::Raise)
//!     .collect();
//!
//! assert_eq!(
//!     codewords.unwrap(),
//!     vec![
//!         Codeword::Ordinal(0),
//!         Codeword::Ordinal(1),
//!         Codeword::Ordinal(2),
//!         Codeword::Ordinal(3),
//!     ]
//! );
//! ```

#![deny(missing_docs)]

use std::collections::HashMap;
use std::fmt;
use std::str::Chars;

pub mod code128;

pub use code128::{cap_escape, Code128Translation, CodeSet};

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during translation
///
/// All variants are data-level failures and are filtered through the
/// caller-selected [`ErrorPolicy`]. Positions count characters from the
/// start of the message and refer to the first character of the
/// unresolved unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Queued characters do not form any entry in the active table or map
    UnknownUnit {
        /// The unresolved queue contents
        unit: String,
        /// Character position where the unit starts
        position: usize,
    },
    /// A `^`-prefixed sequence whose remainder is not a valid escape code
    MalformedEscape {
        /// The offending sequence, including the leading caret
        sequence: String,
        /// Character position of the caret
        position: usize,
    },
    /// The queue grew past the maximum unit length before resolving
    StructuralOverflow {
        /// The oversized queue contents
        unit: String,
        /// Maximum unit length the map accepts
        max_chars: usize,
        /// Character position where the unit starts
        position: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownUnit { unit, position } => {
                write!(
                    f,
                    "'{}' at position {} is not in the active code table",
                    unit, position
                )
            }
            Error::MalformedEscape { sequence, position } => {
                write!(
                    f,
                    "'{}' at position {} is not allowed for an escape sequence",
                    sequence, position
                )
            }
            Error::StructuralOverflow {
                unit,
                max_chars,
                position,
            } => {
                write!(
                    f,
                    "unable to translate '{}' at position {}: unit exceeds {} character(s)",
                    unit, position, max_chars
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// A single translated output unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codeword {
    /// A symbology codeword ordinal
    Ordinal(u16),
    /// Placeholder emitted for an alphabet's skip character
    ///
    /// The driver passes this through unfiltered; callers decide whether
    /// to drop it downstream.
    Skip,
}

impl Codeword {
    /// Get the ordinal value, or `None` for [`Codeword::Skip`]
    #[inline]
    pub fn ordinal(self) -> Option<u16> {
        match self {
            Codeword::Ordinal(value) => Some(value),
            Codeword::Skip => None,
        }
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codeword::Ordinal(value) => write!(f, "{}", value),
            Codeword::Skip => f.write_str("-"),
        }
    }
}

impl serde::Serialize for Codeword {
    /// Serializes as the plain ordinal number, with `Skip` as null
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.ordinal().serialize(serializer)
    }
}

/// Caller-selected strategy for unresolvable queued input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Propagate the failure immediately and halt the sequence
    Raise,
    /// Silently drop the offending unit and resume
    #[default]
    Ignore,
    /// Substitute the given unit into the output and resume
    ///
    /// The payload is echoed verbatim for every unresolved unit.
    Replace(Codeword),
}

/// Reason a resolver rejected the queued unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// No entry for the queued unit in the active table or map
    UnknownUnit,
    /// Invalid or out-of-range escape sequence
    MalformedEscape,
    /// The queue outgrew the maximum unit length
    StructuralOverflow {
        /// The maximum the map accepts
        max_chars: usize,
    },
}

/// Outcome of a single resolver step over the lookahead queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// More lookahead is needed before the unit can resolve
    Pending,
    /// The queued unit resolved; the driver clears the queue and emits
    Resolved(Codeword),
    /// The queued unit can never resolve; the error policy decides
    Unresolvable(Unresolved),
}

/// Immutable character-to-ordinal map backing direct lookup translation
///
/// Keys are short unit strings, one character long for the usual
/// fixed-width maps. Values are [`Codeword`]s, so alphabet placeholders
/// can map to [`Codeword::Skip`] instead of an ordinal.
#[derive(Debug, Clone, Default)]
pub struct CharacterMap {
    entries: HashMap<String, Codeword>,
}

impl CharacterMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from an ordered alphabet
    ///
    /// The *n*-th character of `alphabet` maps to `offset + n`. The `skip`
    /// character, wherever it appears, maps to [`Codeword::Skip`] instead.
    /// Duplicate alphabet characters silently keep the last-assigned
    /// ordinal.
    ///
    /// ```rust
    /// use codeword::{CharacterMap, Codeword};
    ///
    /// let map = CharacterMap::from_alphabet("0*1*2*3*4", 100, Some('*'));
    /// assert_eq!(map.get("0"), Some(Codeword::Ordinal(100)));
    /// assert_eq!(map.get("4"), Some(Codeword::Ordinal(108)));
    /// assert_eq!(map.get("*"), Some(Codeword::Skip));
    /// ```
    pub fn from_alphabet(alphabet: &str, offset: u16, skip: Option<char>) -> Self {
        let mut entries = HashMap::with_capacity(alphabet.len());
        for (index, ch) in alphabet.chars().enumerate() {
            let value = if Some(ch) == skip {
                Codeword::Skip
            } else {
                Codeword::Ordinal(offset + index as u16)
            };
            entries.insert(ch.to_string(), value);
        }
        Self { entries }
    }

    /// Insert a unit, replacing any previous entry for the same key
    pub fn insert(&mut self, unit: impl Into<String>, value: Codeword) {
        self.entries.insert(unit.into(), value);
    }

    /// Merge another map on top of this one; its entries take precedence
    pub fn merge(&mut self, other: CharacterMap) {
        self.entries.extend(other.entries);
    }

    /// Look up a queued unit
    #[inline]
    pub fn get(&self, unit: &str) -> Option<Codeword> {
        self.entries.get(unit).copied()
    }

    /// Whether the map has an entry for `unit`
    #[inline]
    pub fn contains(&self, unit: &str) -> bool {
        self.entries.contains_key(unit)
    }

    /// Number of units in the map
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-unit resolver for a translation strategy
///
/// `translate_chars` is required, so a strategy without concrete
/// resolution logic fails to compile instead of failing mid-stream.
/// The provided [`translate`](TranslateChars::translate) driver feeds the
/// resolver one character of lookahead at a time and applies the error
/// policy to anything it rejects.
pub trait TranslateChars {
    /// Resolve the current lookahead queue
    ///
    /// The driver guarantees `queue` is non-empty and grows by exactly one
    /// character between calls until the unit resolves or is rejected.
    fn translate_chars(&mut self, queue: &[char]) -> Resolution;

    /// Reset per-session state
    ///
    /// The default does nothing; stateful resolvers override this.
    /// Calling it twice in a row is equivalent to calling it once.
    fn reset(&mut self) {}

    /// Translate a message into a lazy sequence of codewords
    ///
    /// The resolver is reset first, so every call starts a fresh session.
    /// No codeword is computed until the returned iterator is polled.
    fn translate<'t, 'm>(
        &'t mut self,
        message: &'m str,
        policy: ErrorPolicy,
    ) -> Translation<'t, 'm, Self>
    where
        Self: Sized,
    {
        self.reset();
        Translation {
            resolver: self,
            input: message.chars(),
            queue: Vec::new(),
            policy,
            consumed: 0,
            done: false,
        }
    }
}

/// Lazy translation session over a message
///
/// Created by [`TranslateChars::translate`]. Yields one
/// [`Result<Codeword>`](Result) per resolved unit; every emitted codeword
/// corresponds to a contiguous, non-overlapping run of input characters.
/// Under [`ErrorPolicy::Raise`] the first failure is yielded as `Err` and
/// the iterator fuses, leaving the offending unit in
/// [`pending`](Translation::pending).
#[derive(Debug)]
pub struct Translation<'t, 'm, T> {
    resolver: &'t mut T,
    input: Chars<'m>,
    queue: Vec<char>,
    policy: ErrorPolicy,
    consumed: usize,
    done: bool,
}

impl<T: TranslateChars> Translation<'_, '_, T> {
    /// Characters queued but not yet resolved
    ///
    /// After a raised failure the offending unit stays here for
    /// inspection.
    pub fn pending(&self) -> &[char] {
        &self.queue
    }

    /// Clear the queue and the resolver's session state mid-stream
    ///
    /// Forces a fresh mode without restarting the input position.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.resolver.reset();
        self.done = false;
    }

    fn failure(&self, reason: Unresolved) -> Error {
        let unit: String = self.queue.iter().collect();
        let position = self.consumed - self.queue.len();
        match reason {
            Unresolved::UnknownUnit => Error::UnknownUnit { unit, position },
            Unresolved::MalformedEscape => Error::MalformedEscape {
                sequence: unit,
                position,
            },
            Unresolved::StructuralOverflow { max_chars } => Error::StructuralOverflow {
                unit,
                max_chars,
                position,
            },
        }
    }
}

impl<T: TranslateChars> Iterator for Translation<'_, '_, T> {
    type Item = Result<Codeword>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for ch in self.input.by_ref() {
            self.queue.push(ch);
            self.consumed += 1;
            match self.resolver.translate_chars(&self.queue) {
                Resolution::Pending => continue,
                Resolution::Resolved(codeword) => {
                    self.queue.clear();
                    return Some(Ok(codeword));
                }
                Resolution::Unresolvable(reason) => match self.policy {
                    ErrorPolicy::Raise => {
                        // Queue retained so callers can inspect the unit.
                        self.done = true;
                        return Some(Err(self.failure(reason)));
                    }
                    ErrorPolicy::Ignore => self.queue.clear(),
                    ErrorPolicy::Replace(unit) => {
                        self.queue.clear();
                        return Some(Ok(unit));
                    }
                },
            }
        }
        // Trailing characters that never resolved are discarded; resolvers
        // decide per-character whether pending state is legal.
        None
    }
}

/// Direct fixed-width lookup through a [`CharacterMap`]
///
/// ```rust
/// use codeword::{CharacterMap, Codeword, ErrorPolicy, MapTranslation, TranslateChars};
///
/// let mut translation =
///     MapTranslation::new(CharacterMap::from_alphabet("+0123456789", 0, None));
/// let codewords: Vec<_> = translation
///     .translate("1234xx", ErrorPolicy::Ignore)
///     .map(|c| c.unwrap())
///     .collect();
///
/// // Unknown characters are dropped under the default policy.
/// assert_eq!(
///     codewords,
///     vec![
///         Codeword::Ordinal(2),
///         Codeword::Ordinal(3),
///         Codeword::Ordinal(4),
///         Codeword::Ordinal(5),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MapTranslation {
    map: CharacterMap,
    min_chars: usize,
    max_chars: usize,
}

impl MapTranslation {
    /// Single-character units over the given map
    pub fn new(map: CharacterMap) -> Self {
        Self::with_limits(map, 1, 1)
    }

    /// Units between `min_chars` and `max_chars` characters long
    pub fn with_limits(map: CharacterMap, min_chars: usize, max_chars: usize) -> Self {
        Self {
            map,
            min_chars,
            max_chars,
        }
    }

    /// Merge a supplemental map; its keys override the base map
    pub fn extend(&mut self, extra: CharacterMap) {
        self.map.merge(extra);
    }

    /// The map backing this translation
    pub fn map(&self) -> &CharacterMap {
        &self.map
    }
}

impl TranslateChars for MapTranslation {
    fn translate_chars(&mut self, queue: &[char]) -> Resolution {
        if queue.len() < self.min_chars {
            return Resolution::Pending;
        }
        if queue.len() > self.max_chars {
            // The queue has grown past any valid unit; this is structural,
            // not a missing-character error.
            return Resolution::Unresolvable(Unresolved::StructuralOverflow {
                max_chars: self.max_chars,
            });
        }
        let unit: String = queue.iter().collect();
        match self.map.get(&unit) {
            Some(codeword) => Resolution::Resolved(codeword),
            None => Resolution::Unresolvable(Unresolved::UnknownUnit),
        }
    }
}

/// Ready-made translation for plain decimal digit messages
///
/// Each digit maps to its own value: `'0'` to 0 through `'9'` to 9.
pub fn digits() -> MapTranslation {
    MapTranslation::new(CharacterMap::from_alphabet("0123456789", 0, None))
}
