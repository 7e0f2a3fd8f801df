use std::collections::HashMap;

use crate::{ParseErr, codec::EncodeErr, util::parse_hex_u16};

/// Bidirectional mapping between 8-bit symbol codes and display fragments.
///
/// A fragment may be empty, a single character, or several characters (the
/// tables ship multi-character entries for things like ellipses and control
/// glyphs). Code `0x00` is the reserved terminator; it may carry a fragment
/// but the decoder never renders it.
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    fragments: HashMap<u8, String>,
    codes: HashMap<String, u8>,
    // longest fragment, in chars, bounding the tokenizer's lookahead
    longest: usize,
}

impl SymbolMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u8, S)>,
        S: Into<String>,
    {
        let mut fragments = HashMap::new();
        let mut codes = HashMap::new();
        for (code, fragment) in entries {
            let fragment = fragment.into();
            if !fragment.is_empty() {
                // last mapping wins
                codes.insert(fragment.clone(), code);
            }
            fragments.insert(code, fragment);
        }
        let longest = codes.keys().map(|f| f.chars().count()).max().unwrap_or(0);
        Self {
            fragments,
            codes,
            longest,
        }
    }

    /// Load a map from the driver's hex-keyed form, e.g. `("0x21", "!")`.
    pub fn from_hex_entries<I, K, V>(entries: I) -> Result<Self, ParseErr>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, fragment)| {
                let code = parse_hex_u16(key.as_ref())?;
                let code = u8::try_from(code).map_err(|_| ParseErr::CodeRange(code))?;
                Ok((code, fragment.into()))
            })
            .collect::<Result<Vec<_>, ParseErr>>()?;
        Ok(Self::new(entries))
    }

    /// Display fragment for `code`, if one is mapped.
    pub fn fragment(&self, code: u8) -> Option<&str> {
        self.fragments.get(&code).map(String::as_str)
    }

    /// Symbol code whose fragment is exactly `fragment`.
    pub fn code(&self, fragment: &str) -> Option<u8> {
        self.codes.get(fragment).copied()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Split `text` into symbol codes by greedy longest match against the
    /// mapped fragments.
    ///
    /// Fails with [`EncodeErr::UnknownSymbol`] at the first position where no
    /// fragment matches, naming the offending character.
    pub fn tokenize(&self, text: &str) -> Result<Vec<u8>, EncodeErr> {
        let mut codes = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let Some((code, len)) = self.longest_match(rest) else {
                let unit = rest.chars().next().map(String::from).unwrap_or_default();
                return Err(EncodeErr::UnknownSymbol(unit));
            };
            codes.push(code);
            rest = &rest[len..];
        }
        Ok(codes)
    }

    fn longest_match(&self, rest: &str) -> Option<(u8, usize)> {
        let ends: Vec<usize> = rest
            .char_indices()
            .map(|(idx, ch)| idx + ch.len_utf8())
            .take(self.longest)
            .collect();
        ends.iter()
            .rev()
            .find_map(|&end| self.codes.get(&rest[..end]).map(|&code| (code, end)))
    }
}
