use rand::{Rng, RngExt, SeedableRng, rngs::StdRng};

use crate::{CodeTable, SymbolMap};

/// A small hand-laid trie covering the shapes the codec has to handle:
/// terminals at different depths, the terminator, a multi-character
/// fragment, and a code with no fragment at all.
///
/// ```text
/// 0x100 ─0→ 0x101 ─0→ 'A'
///   │          └─1→ 0x103 ─0→ 'B'
///   │                   └─1→ '!'
///   └─1→ 0x102 ─0→ 0x00 (terminator)
///            └─1→ 0x104 ─0→ ' '
///                     └─1→ 0x105 ─0→ 0x85 ("...")
///                              └─1→ 0x7F (unmapped)
/// ```
pub fn mktable() -> CodeTable {
    CodeTable::new([
        0x0101, 0x0102, // root
        0x0041, 0x0103, // 0x101
        0x0000, 0x0104, // 0x102
        0x0042, 0x0021, // 0x103
        0x0020, 0x0105, // 0x104
        0x0085, 0x007F, // 0x105
    ])
}

/// The symbol map paired with [`mktable`]. Code `0x7F` is deliberately
/// absent so tests can exercise the unmapped-code paths.
pub fn mksymbols() -> SymbolMap {
    SymbolMap::new([
        (0x41, "A"),
        (0x42, "B"),
        (0x21, "!"),
        (0x20, " "),
        (0x85, "..."),
    ])
}

/// Fragments of [`mksymbols`] that participate in encoding.
pub const FRAGMENTS: [&str; 5] = ["A", "B", "!", " ", "..."];

/// Seeded generator of encodable strings over [`FRAGMENTS`].
pub struct TextGen {
    rng: StdRng,
}

impl TextGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A string built from `units` random fragments.
    pub fn string(&mut self, units: usize) -> String {
        (0..units)
            .map(|_| FRAGMENTS[self.rng.random_range(0..FRAGMENTS.len())])
            .collect()
    }

    /// A batch of strings with up to `max_units` fragments each.
    pub fn batch(&mut self, count: usize, max_units: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                let units = self.rng.random_range(0..=max_units);
                self.string(units)
            })
            .collect()
    }
}
