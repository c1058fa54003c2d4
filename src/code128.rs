//! Code 128 translation with the three-code-set escape grammar
//!
//! Code 128 interleaves three code sets: A covers uppercase, symbols and
//! control characters, B covers the full printable ASCII range, and C packs
//! pairs of decimal digits into single codewords. The active set is selected
//! in-band by caret-escaped shift codewords; this module interprets that
//! grammar one queued character at a time.

use crate::{Codeword, Resolution, TranslateChars, Unresolved};

/// Ordinal emitted for an escaped literal caret (`^^`)
///
/// 62 is the position of `^` within the region tables A and B share.
const CARET_ORDINAL: u16 = 62;

/// Lowest escape value that resolves; smaller values keep accumulating
const ESCAPE_MIN: u32 = 96;

/// Highest valid escape value
const ESCAPE_MAX: u32 = 107;

/// One of the three Code 128 code sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSet {
    /// ASCII 32-95 followed by the wrapped control range 0-31
    A,
    /// ASCII 32-127
    B,
    /// Digit pairs packed into a single 00-99 codeword
    C,
}

impl CodeSet {
    /// Position of `ch` within this code set's character table, if present
    ///
    /// Code set C has no character table and always returns `None`.
    pub fn index_of(self, ch: char) -> Option<u16> {
        let code = ch as u32;
        match self {
            CodeSet::A => match code {
                32..=95 => Some((code - 32) as u16),
                // Control characters wrap in after the printable block.
                0..=31 => Some((code + 64) as u16),
                _ => None,
            },
            CodeSet::B => match code {
                32..=127 => Some((code - 32) as u16),
                _ => None,
            },
            CodeSet::C => None,
        }
    }
}

/// Converts messages to Code 128 ordinals, accepting caret-escaped
/// non-printables
///
/// The escape grammar drives a persistent code-set mode: `^99`/`^105`
/// select C, `^100`/`^104` select B, `^101`/`^103` select A, and the
/// remaining values in 96..=107 resolve without a mode change. Plain
/// characters resolve through the table of whichever set is active.
///
/// ```rust
/// use codeword::{Code128Translation, Codeword, ErrorPolicy, TranslateChars};
///
/// let mut translation = Code128Translation::new();
/// let codewords: codeword::Result<Vec<Codeword>> = translation
///     .translate("^105^102123456^100A1", ErrorPolicy::Raise)
///     .collect();
///
/// let ordinals: Vec<u16> = codewords
///     .unwrap()
///     .into_iter()
///     .filter_map(|c| c.ordinal())
///     .collect();
/// assert_eq!(ordinals, vec![105, 102, 12, 34, 56, 100, 33, 17]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Code128Translation {
    code: Option<CodeSet>,
}

impl Code128Translation {
    /// Create a translation with no code set selected
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active code set, if any
    pub fn code(&self) -> Option<CodeSet> {
        self.code
    }

    fn resolve_escape(&mut self, queue: &[char]) -> Resolution {
        if queue.len() == 1 {
            // Escape introduced, awaiting the escaped payload.
            return Resolution::Pending;
        }
        if queue[1] == '^' {
            return Resolution::Resolved(Codeword::Ordinal(CARET_ORDINAL));
        }
        let escaped: String = queue[1..].iter().collect();
        if !escaped.chars().all(|c| c.is_ascii_digit()) {
            return Resolution::Unresolvable(Unresolved::MalformedEscape);
        }
        // Digit runs too long for u32 only arrive through direct resolver
        // calls; the driver resolves or rejects an escape within three
        // digits. They are beyond the valid range regardless.
        let Ok(value) = escaped.parse::<u32>() else {
            return Resolution::Unresolvable(Unresolved::MalformedEscape);
        };
        if value < ESCAPE_MIN {
            // Short numeric escapes keep accumulating. One- and two-digit
            // values below 96 never resolve on their own; they only appear
            // as prefixes of longer escapes. Characterized behavior.
            return Resolution::Pending;
        }
        if value > ESCAPE_MAX {
            return Resolution::Unresolvable(Unresolved::MalformedEscape);
        }
        match value {
            99 | 105 => self.code = Some(CodeSet::C),
            100 | 104 => self.code = Some(CodeSet::B),
            101 | 103 => self.code = Some(CodeSet::A),
            // 96-98, 102, 106 and 107 resolve without a mode change.
            _ => {}
        }
        Resolution::Resolved(Codeword::Ordinal(value as u16))
    }

    fn resolve_plain(&mut self, queue: &[char]) -> Resolution {
        match self.code {
            Some(code @ (CodeSet::A | CodeSet::B)) => match code.index_of(queue[0]) {
                Some(ordinal) => Resolution::Resolved(Codeword::Ordinal(ordinal)),
                None => Resolution::Unresolvable(Unresolved::UnknownUnit),
            },
            Some(CodeSet::C) => {
                if queue.len() < 2 {
                    return Resolution::Pending;
                }
                match (queue[0].to_digit(10), queue[1].to_digit(10)) {
                    (Some(high), Some(low)) => {
                        Resolution::Resolved(Codeword::Ordinal((high * 10 + low) as u16))
                    }
                    // A pair containing a non-digit has no code C entry.
                    _ => Resolution::Unresolvable(Unresolved::UnknownUnit),
                }
            }
            // No plain character resolves before a code set is selected.
            None => Resolution::Unresolvable(Unresolved::UnknownUnit),
        }
    }
}

impl TranslateChars for Code128Translation {
    fn translate_chars(&mut self, queue: &[char]) -> Resolution {
        match queue.first() {
            Some('^') => self.resolve_escape(queue),
            Some(_) => self.resolve_plain(queue),
            None => Resolution::Pending,
        }
    }

    fn reset(&mut self) {
        self.code = None;
    }
}

/// Render a string in the caret-escaped printable form used as shorthand
/// input notation
///
/// Printable characters pass through unchanged; every other character
/// becomes `^` followed by its decimal code point value.
///
/// ```rust
/// use codeword::cap_escape;
///
/// assert_eq!(cap_escape("abcdef"), "abcdef");
/// assert_eq!(cap_escape("\x01\x02\x03"), "^1^2^3");
/// ```
pub fn cap_escape(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for ch in message.chars() {
        if is_printable(ch) {
            escaped.push(ch);
        } else {
            escaped.push('^');
            escaped.push_str(&(ch as u32).to_string());
        }
    }
    escaped
}

// ASCII graphics plus the whitespace the shorthand keeps verbatim.
fn is_printable(ch: char) -> bool {
    ch.is_ascii_graphic() || matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ErrorPolicy};

    fn raise_all(translation: &mut Code128Translation, message: &str) -> Vec<u16> {
        translation
            .translate(message, ErrorPolicy::Raise)
            .map(|c| c.unwrap().ordinal().unwrap())
            .collect()
    }

    #[test]
    fn test_code_set_a_table() {
        assert_eq!(CodeSet::A.index_of(' '), Some(0));
        assert_eq!(CodeSet::A.index_of('A'), Some(33));
        assert_eq!(CodeSet::A.index_of('Z'), Some(58));
        assert_eq!(CodeSet::A.index_of('_'), Some(63));
        assert_eq!(CodeSet::A.index_of('\0'), Some(64));
        assert_eq!(CodeSet::A.index_of('\x1f'), Some(95));
        // Lowercase is outside code set A.
        assert_eq!(CodeSet::A.index_of('a'), None);
        assert_eq!(CodeSet::A.index_of('\u{80}'), None);
    }

    #[test]
    fn test_code_set_b_table() {
        assert_eq!(CodeSet::B.index_of(' '), Some(0));
        assert_eq!(CodeSet::B.index_of('`'), Some(64));
        assert_eq!(CodeSet::B.index_of('a'), Some(65));
        assert_eq!(CodeSet::B.index_of('\x7f'), Some(95));
        // Control characters are outside code set B.
        assert_eq!(CodeSet::B.index_of('\0'), None);
    }

    #[test]
    fn test_code_set_c_has_no_table() {
        assert_eq!(CodeSet::C.index_of('0'), None);
    }

    #[test]
    fn test_literal_caret() {
        let mut translation = Code128Translation::new();
        assert_eq!(raise_all(&mut translation, "^^"), vec![62]);
    }

    #[test]
    fn test_code_set_a_session() {
        let mut translation = Code128Translation::new();
        assert_eq!(
            raise_all(&mut translation, "^103AZ_^^_\x00\x01\x02"),
            vec![103, 33, 58, 63, 62, 63, 64, 65, 66]
        );
        assert_eq!(translation.code(), Some(CodeSet::A));
    }

    #[test]
    fn test_code_set_b_session() {
        let mut translation = Code128Translation::new();
        assert_eq!(
            raise_all(&mut translation, "^104AZ_^^_\x60ab"),
            vec![104, 33, 58, 63, 62, 63, 64, 65, 66]
        );
        assert_eq!(translation.code(), Some(CodeSet::B));
    }

    #[test]
    fn test_function_codes_leave_mode_unchanged() {
        let mut translation = Code128Translation::new();
        assert_eq!(raise_all(&mut translation, "^105^102^"), vec![105, 102]);
        assert_eq!(translation.code(), Some(CodeSet::C));
    }

    #[test]
    fn test_code_set_c_digit_pairs() {
        let mut translation = Code128Translation::new();
        assert_eq!(
            raise_all(&mut translation, "^105^102123456^100A1"),
            vec![105, 102, 12, 34, 56, 100, 33, 17]
        );
        // Each translate call starts fresh, so the result is reproducible.
        assert_eq!(
            raise_all(&mut translation, "^105^102123456^100A1"),
            vec![105, 102, 12, 34, 56, 100, 33, 17]
        );
    }

    #[test]
    fn test_mode_shift_to_c() {
        let mut translation = Code128Translation::new();
        assert_eq!(raise_all(&mut translation, "^99"), vec![99]);
        assert_eq!(translation.code(), Some(CodeSet::C));
    }

    #[test]
    fn test_escape_above_range_is_malformed() {
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("^200", ErrorPolicy::Raise);
        assert_eq!(
            session.next(),
            Some(Err(Error::MalformedEscape {
                sequence: "^200".to_string(),
                position: 0,
            }))
        );
        assert_eq!(session.next(), None);
    }

    #[test]
    fn test_escape_overflowing_digits_is_malformed() {
        // Reachable only through direct resolver calls; the driver never
        // queues more than three escape digits.
        let mut translation = Code128Translation::new();
        let queue: Vec<char> = "^99999999999".chars().collect();
        assert_eq!(
            translation.translate_chars(&queue),
            Resolution::Unresolvable(Unresolved::MalformedEscape)
        );
    }

    #[test]
    fn test_long_digit_run_resolves_at_first_valid_escape() {
        // The escape resolves as soon as its value reaches the valid
        // range, so a long digit run becomes ^99 plus code C pairs, with
        // the odd trailing digit discarded.
        let mut translation = Code128Translation::new();
        assert_eq!(
            raise_all(&mut translation, "^99999999999"),
            vec![99, 99, 99, 99, 99]
        );
        assert_eq!(translation.code(), Some(CodeSet::C));
    }

    #[test]
    fn test_non_digit_escape_is_malformed() {
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("^105^X", ErrorPolicy::Raise);
        assert_eq!(session.next(), Some(Ok(Codeword::Ordinal(105))));
        assert_eq!(
            session.next(),
            Some(Err(Error::MalformedEscape {
                sequence: "^X".to_string(),
                position: 4,
            }))
        );
    }

    #[test]
    fn test_malformed_escape_ignored_by_default() {
        let mut translation = Code128Translation::new();
        let codewords: Vec<_> = translation
            .translate("^105^X^102", ErrorPolicy::default())
            .map(|c| c.unwrap().ordinal().unwrap())
            .collect();
        assert_eq!(codewords, vec![105, 102]);
    }

    #[test]
    fn test_short_escape_stays_pending() {
        // Characterized behavior: escape values below 96 never resolve on
        // their own, so a message consisting of one is silently discarded.
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("^95", ErrorPolicy::Raise);
        assert_eq!(session.next(), None);
        assert_eq!(session.pending(), &['^', '9', '5']);
    }

    #[test]
    fn test_trailing_escape_discarded() {
        let mut translation = Code128Translation::new();
        assert_eq!(raise_all(&mut translation, "^104a^"), vec![104, 65]);
    }

    #[test]
    fn test_plain_char_without_code_set() {
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("A", ErrorPolicy::Raise);
        assert_eq!(
            session.next(),
            Some(Err(Error::UnknownUnit {
                unit: "A".to_string(),
                position: 0,
            }))
        );
    }

    #[test]
    fn test_char_outside_active_table() {
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("^103a", ErrorPolicy::Raise);
        assert_eq!(session.next(), Some(Ok(Codeword::Ordinal(103))));
        assert_eq!(
            session.next(),
            Some(Err(Error::UnknownUnit {
                unit: "a".to_string(),
                position: 4,
            }))
        );
    }

    #[test]
    fn test_non_digit_in_code_c_pair() {
        // Open grammar point, decided here: a pending code C pair with a
        // non-digit second character fails as an unknown unit.
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("^991x", ErrorPolicy::Raise);
        assert_eq!(session.next(), Some(Ok(Codeword::Ordinal(99))));
        assert_eq!(
            session.next(),
            Some(Err(Error::UnknownUnit {
                unit: "1x".to_string(),
                position: 3,
            }))
        );
    }

    #[test]
    fn test_mode_persists_across_resolver_calls() {
        let mut translation = Code128Translation::new();
        assert_eq!(translation.code(), None);
        assert_eq!(translation.translate_chars(&['^']), Resolution::Pending);
        assert_eq!(
            translation.translate_chars(&['^', '^']),
            Resolution::Resolved(Codeword::Ordinal(62))
        );
        assert_eq!(
            translation.translate_chars(&['^', '1', '0', '1']),
            Resolution::Resolved(Codeword::Ordinal(101))
        );
        assert_eq!(translation.code(), Some(CodeSet::A));
        assert_eq!(
            translation.translate_chars(&['Z']),
            Resolution::Resolved(Codeword::Ordinal(58))
        );
        assert_eq!(
            translation.translate_chars(&['^', '1', '0', '4']),
            Resolution::Resolved(Codeword::Ordinal(104))
        );
        assert_eq!(translation.code(), Some(CodeSet::B));
        assert_eq!(
            translation.translate_chars(&['^', '9', '9']),
            Resolution::Resolved(Codeword::Ordinal(99))
        );
        assert_eq!(translation.code(), Some(CodeSet::C));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut translation = Code128Translation::new();
        translation.translate_chars(&['^', '9', '9']);
        assert_eq!(translation.code(), Some(CodeSet::C));
        translation.reset();
        assert_eq!(translation.code(), None);
        translation.reset();
        assert_eq!(translation.code(), None);
    }

    #[test]
    fn test_session_reset_forces_fresh_mode() {
        let mut translation = Code128Translation::new();
        let mut session = translation.translate("^101AA", ErrorPolicy::Raise);
        assert_eq!(session.next(), Some(Ok(Codeword::Ordinal(101))));
        assert_eq!(session.next(), Some(Ok(Codeword::Ordinal(33))));
        session.reset();
        // The remaining input now arrives with no code set selected.
        assert!(matches!(
            session.next(),
            Some(Err(Error::UnknownUnit { .. }))
        ));
    }

    #[test]
    fn test_cap_escape_printables_unchanged() {
        assert_eq!(cap_escape("abcdef"), "abcdef");
        assert_eq!(cap_escape("A Z\t\n"), "A Z\t\n");
    }

    #[test]
    fn test_cap_escape_non_printables() {
        let message = "\x01\x02\x03\x08\x10\x18HPX\u{80}\u{88}\u{90}\u{a0}";
        assert_eq!(cap_escape(message), "^1^2^3^8^16^24HPX^128^136^144^160");
    }
}
