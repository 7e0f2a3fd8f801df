use bitvec::{order::Lsb0, vec::BitVec};

use crate::{
    CodeTable, NodeId, SymbolMap,
    codec::EncodeErr,
    node::TERMINATOR,
};

/// Encodes plaintext back into the bit-packed trie format.
///
/// The inverse of the decoder's descent: for every symbol code the root-to-
/// leaf path is rebuilt by ascending the trie through the table's parent
/// index, reversed into root-first order, and packed least-significant bit
/// first. The bit cursor carries across symbols, so consecutive codes share
/// bytes; only the final byte of a string may be partially filled, and its
/// dead bits are left zero.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    table: &'a CodeTable,
    symbols: &'a SymbolMap,
}

impl<'a> Encoder<'a> {
    pub fn new(table: &'a CodeTable, symbols: &'a SymbolMap) -> Self {
        Self { table, symbols }
    }

    /// Encode `text`, appending the terminator symbol so the result is
    /// self-terminating for any decoder sharing the table.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodeErr> {
        let mut bits = BitVec::<u8, Lsb0>::new();
        for code in self.symbols.tokenize(text)? {
            self.push_code(u16::from(code), &mut bits)?;
        }
        self.push_code(u16::from(TERMINATOR), &mut bits)?;
        bits.set_uninitialized(false);
        Ok(bits.into_vec())
    }

    /// Ascend from `code` to the root, collecting the path leaf-first.
    fn push_code(&self, code: u16, bits: &mut BitVec<u8, Lsb0>) -> Result<(), EncodeErr> {
        let mut path = Vec::new();
        let mut cursor = NodeId::new(code);
        while cursor != NodeId::ROOT {
            // a path longer than the table can only mean a cycle
            if path.len() > self.table.nodes().len() {
                return Err(EncodeErr::UnreachableCode { code });
            }
            let (parent, bit) = self
                .table
                .parent_of(cursor.get())
                .ok_or(EncodeErr::UnreachableCode { code })?;
            path.push(bit);
            cursor = parent;
        }
        bits.extend(path.into_iter().rev());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        Decoder,
        table::CodeRead,
        testutil::{mksymbols, mktable},
    };

    #[test]
    fn encodes_single_symbol() {
        let (table, symbols) = (mktable(), mksymbols());
        let encoder = Encoder::new(&table, &symbols);
        // 'A' = bits 0,0 then terminator 1,0
        assert_eq!(encoder.encode("A").unwrap(), vec![0b0100]);
    }

    #[test]
    fn empty_string_still_terminates() {
        let (table, symbols) = (mktable(), mksymbols());
        let encoder = Encoder::new(&table, &symbols);
        assert_eq!(encoder.encode("").unwrap(), vec![0b01]);
    }

    #[test]
    fn bit_cursor_carries_across_symbols() {
        let (table, symbols) = (mktable(), mksymbols());
        let encoder = Encoder::new(&table, &symbols);
        // three 'A's (2 bits each) plus the terminator fill one byte exactly
        let bytes = encoder.encode("AAA").unwrap();
        assert_eq!(bytes, vec![0b0100_0000]);
    }

    #[test]
    fn partial_final_byte_is_zero_padded() {
        let (table, symbols) = (mktable(), mksymbols());
        let encoder = Encoder::new(&table, &symbols);
        // 'B' = 0,1,0 + terminator 1,0 = 5 bits -> one byte, top bits zero
        let bytes = encoder.encode("B").unwrap();
        assert_eq!(bytes, vec![0b0_1010]);
    }

    #[test]
    fn unknown_display_unit() {
        let (table, symbols) = (mktable(), mksymbols());
        let encoder = Encoder::new(&table, &symbols);
        assert_matches!(encoder.encode("A?"), Err(EncodeErr::UnknownSymbol(unit)) if unit == "?");
    }

    #[test]
    fn code_missing_from_table() {
        let table = mktable();
        let symbols = SymbolMap::new([(0x5A, "Z")]);
        let encoder = Encoder::new(&table, &symbols);
        assert_matches!(
            encoder.encode("Z"),
            Err(EncodeErr::UnreachableCode { code: 0x5A })
        );
    }

    #[test]
    fn cyclic_table_is_detected() {
        // 0x101 and 0x102 point at each other, so the chain above 0x41
        // never reaches the root
        let table = CodeTable::new([0xFE, 0xFF, 0x102, 0x41, 0x101, 0xFD]);
        let symbols = SymbolMap::new([(0x41, "A")]);
        let encoder = Encoder::new(&table, &symbols);
        assert_matches!(
            encoder.encode("A"),
            Err(EncodeErr::UnreachableCode { code: 0x41 })
        );
    }

    #[test]
    fn round_trips_through_the_decoder() {
        let (table, symbols) = (mktable(), mksymbols());
        let encoder = Encoder::new(&table, &symbols);
        let decoder = Decoder::new(&table, &symbols);
        for text in ["", "A", "AB", "B!B", "A B...", "... ...", "!!!!!!!!"] {
            let bytes = encoder.encode(text).unwrap();
            let decoded = decoder.decode(&bytes).unwrap();
            assert_eq!(decoded.text, text, "{text:?}");
            assert_eq!(decoded.bytes_read(), bytes.len(), "{text:?}");
        }
    }

    #[test]
    fn matches_brute_force_parent_scan() {
        // the parent index must agree with an exhaustive scan over the
        // table's values
        let (table, symbols) = (mktable(), mksymbols());
        let brute_force = |mut code: u16| -> Vec<bool> {
            let mut path = Vec::new();
            while code != NodeId::ROOT.get() {
                let candidate = table
                    .nodes()
                    .iter()
                    .copied()
                    .filter(|&value| NodeId::new(value).is_internal())
                    .find(|&value| {
                        let node = NodeId::new(value);
                        table.slot(node.child_slot(false)) == Some(code)
                            || table.slot(node.child_slot(true)) == Some(code)
                    });
                let candidate = candidate.unwrap_or(NodeId::ROOT.get());
                let node = NodeId::new(candidate);
                path.push(table.slot(node.child_slot(true)) == Some(code));
                code = candidate;
            }
            path.reverse();
            path
        };
        let encoder = Encoder::new(&table, &symbols);
        for code in [0x41u16, 0x42, 0x21, 0x20, 0x85, 0x00] {
            let mut bits = BitVec::<u8, Lsb0>::new();
            encoder.push_code(code, &mut bits).unwrap();
            let expected = brute_force(code);
            assert_eq!(bits.iter().by_vals().collect::<Vec<_>>(), expected, "{code:#04x}");
        }
    }
}
