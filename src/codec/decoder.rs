use bitvec::{order::Lsb0, view::BitView};

use crate::{
    NodeId, SymbolMap,
    codec::DecodeErr,
    node::TERMINATOR,
    table::CodeRead,
};

/// What to do with a terminal code that has no fragment in the [`SymbolMap`].
///
/// Shipped tables are sometimes sparse and a terminal can legitimately lack
/// a display fragment, so dropping such codes is the default. Dropping can
/// also silently lose text; [`UnmappedCodes::Fail`] makes that loud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmappedCodes {
    /// Drop the symbol and keep decoding.
    #[default]
    Skip,
    /// Fail with [`DecodeErr::UnmappedCode`].
    Fail,
}

/// Decodes one bit-packed string by repeated trie descent.
///
/// The table and symbol map are borrowed, immutable configuration; a decoder
/// can be reused across any number of inputs, and distinct decoders sharing
/// the same table are safe to run in parallel.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a, T> {
    table: &'a T,
    symbols: &'a SymbolMap,
    unmapped: UnmappedCodes,
}

/// One decoded string plus exactly how much of the input it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// Bits consumed, terminator included.
    pub bits_read: usize,
}

impl Decoded {
    /// Bytes consumed, counting a trailing partially-filled byte.
    pub fn bytes_read(&self) -> usize {
        self.bits_read.div_ceil(8)
    }
}

impl<'a, T: CodeRead> Decoder<'a, T> {
    pub fn new(table: &'a T, symbols: &'a SymbolMap) -> Self {
        Self {
            table,
            symbols,
            unmapped: UnmappedCodes::default(),
        }
    }

    pub fn with_unmapped(mut self, unmapped: UnmappedCodes) -> Self {
        self.unmapped = unmapped;
        self
    }

    /// Decode one string from the front of `bytes`.
    ///
    /// Bits are read least-significant first. The walk descends from the root
    /// once per symbol and stops at the terminator code; only bits belonging
    /// to the string are consumed, so callers may hand over an entire
    /// container tail. Running out of bits before the terminator fails with
    /// [`DecodeErr::Truncated`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded, DecodeErr> {
        let bits = bytes.view_bits::<Lsb0>();
        let mut cursor = 0;
        let mut text = String::new();

        loop {
            let mut node = NodeId::ROOT;
            let code = loop {
                let bit = *bits.get(cursor).ok_or(DecodeErr::Truncated)?;
                cursor += 1;
                let next = self.table.child(node, bit)?;
                match next.terminal() {
                    Some(code) => break code,
                    None => node = next,
                }
            };

            if code == TERMINATOR {
                return Ok(Decoded {
                    text,
                    bits_read: cursor,
                });
            }

            match self.symbols.fragment(code) {
                Some(fragment) => text.push_str(fragment),
                None => {
                    if self.unmapped == UnmappedCodes::Fail {
                        return Err(DecodeErr::UnmappedCode { code });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        CodeTable,
        testutil::{mksymbols, mktable},
    };

    #[test]
    fn decodes_single_symbol() {
        let (table, symbols) = (mktable(), mksymbols());
        let decoder = Decoder::new(&table, &symbols);
        // 'A' = bits 0,0 then terminator 1,0 -> 0b0100
        let decoded = decoder.decode(&[0b0100]).unwrap();
        assert_eq!(decoded.text, "A");
        assert_eq!(decoded.bits_read, 4);
        assert_eq!(decoded.bytes_read(), 1);
    }

    #[test]
    fn ignores_trailing_bytes_after_terminator() {
        let (table, symbols) = (mktable(), mksymbols());
        let decoder = Decoder::new(&table, &symbols);
        let decoded = decoder.decode(&[0b0100, 0xFF, 0xFF]).unwrap();
        assert_eq!(decoded.text, "A");
        assert_eq!(decoded.bytes_read(), 1);
    }

    #[test]
    fn empty_string_is_just_the_terminator() {
        let (table, symbols) = (mktable(), mksymbols());
        let decoded = Decoder::new(&table, &symbols).decode(&[0b01]).unwrap();
        assert_eq!(decoded.text, "");
        assert_eq!(decoded.bits_read, 2);
    }

    #[test]
    fn terminator_never_renders() {
        // map the terminator to a visible fragment; it still must not show up
        let table = mktable();
        let symbols = SymbolMap::new([(0x00, "<END>"), (0x41, "A")]);
        let decoded = Decoder::new(&table, &symbols).decode(&[0b0100]).unwrap();
        assert_eq!(decoded.text, "A");
    }

    #[test]
    fn truncated_input() {
        let (table, symbols) = (mktable(), mksymbols());
        let decoder = Decoder::new(&table, &symbols);
        assert_matches!(decoder.decode(&[]), Err(DecodeErr::Truncated));
        // 'A' but no terminator: 0b00 padded with zeros keeps resolving 'A'
        // until the byte runs dry
        assert_matches!(decoder.decode(&[0b0000]), Err(DecodeErr::Truncated));
    }

    #[test]
    fn unmapped_codes_skip_or_fail() {
        let (table, symbols) = (mktable(), mksymbols());
        // 0x7F = bits 1,1,1,1 then terminator 1,0 -> 0b011111
        let bytes = [0b01_1111];
        let lenient = Decoder::new(&table, &symbols);
        assert_eq!(lenient.decode(&bytes).unwrap().text, "");

        let strict = lenient.with_unmapped(UnmappedCodes::Fail);
        assert_matches!(
            strict.decode(&bytes),
            Err(DecodeErr::UnmappedCode { code: 0x7F })
        );
    }

    #[test]
    fn descent_into_missing_slot_errors() {
        let symbols = mksymbols();
        let table = CodeTable::new([0x0101, 0x0000]);
        let decoder = Decoder::new(&table, &symbols);
        assert_matches!(
            decoder.decode(&[0b0]),
            Err(DecodeErr::NodeRange { slot: 2, .. })
        );
    }
}
