use std::{fmt::Debug, iter::FusedIterator, ops::Deref};

use bytes::{BufMut, Bytes, BytesMut};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, U32, Unaligned};

use crate::{
    CodeTable, SymbolMap,
    codec::{DecodeErr, EncodeErr, decoder::Decoder, encoder::Encoder},
    table::{CodeRead, CodeTableRef},
};

/// The fixed front of every container: one offset pointing at the per-string
/// offset table. The code table fills the gap between the two.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct Header {
    offset_base: U32<LittleEndian>,
}

impl Header {
    const SIZE: usize = size_of::<Self>();
}

static_assertions::assert_eq_size!(Header, u32);

/// Zero-copy reader over an encoded GPNT container.
///
/// Wraps any byte buffer and resolves strings on demand; nothing is
/// deserialized up front beyond validating the framing. The string count is
/// never stored in the format; it falls out of the gap between the offset
/// table's base and the first string's data (see [`string_count`]).
///
/// [`string_count`]: Self::string_count
#[derive(Clone)]
pub struct GpntRef<B> {
    data: B,
}

/// One string pulled out of a container: the decoded text and the exact
/// encoded bytes it occupied, trailing partial byte included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedString<'a> {
    pub text: String,
    pub encoded: &'a [u8],
}

impl<B> GpntRef<B> {
    #[inline]
    pub fn inner(&self) -> &B {
        &self.data
    }

    #[inline]
    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: Deref<Target = [u8]>> GpntRef<B> {
    /// Wrap `data`, validating only the framing: the header must be
    /// readable, the offset-table base must land inside the buffer, and the
    /// region between them must hold whole 16-bit table entries.
    pub fn from_bytes(data: B) -> Result<Self, DecodeErr> {
        let header = data.get(..Header::SIZE).ok_or(DecodeErr::Length)?;
        let base = Header::ref_from_bytes(header)?.offset_base.get() as usize;
        if base < Header::SIZE || base > data.len() || (base - Header::SIZE) % 2 != 0 {
            return Err(DecodeErr::Validity);
        }
        Ok(Self { data })
    }

    fn offset_base(&self) -> usize {
        // framing was validated by from_bytes
        let header = Header::ref_from_bytes(&self.data[..Header::SIZE]).unwrap();
        header.offset_base.get() as usize
    }

    /// The code trie embedded between the header and the offset table.
    pub fn code_table(&self) -> CodeTableRef<'_> {
        let region = &self.data[Header::SIZE..self.offset_base()];
        // region length is even per from_bytes, and [U16] has no alignment
        CodeTableRef::new(<[U16<LittleEndian>]>::ref_from_bytes(region).unwrap())
    }

    /// Number of strings in the container.
    ///
    /// The first entry of the offset table points just past the table
    /// itself, so the distance between the base and that entry is exactly
    /// four bytes per string. A buffer too small to hold a first entry
    /// holds no strings.
    pub fn string_count(&self) -> usize {
        let base = self.offset_base();
        match read_u32(&self.data, base) {
            Ok(first) => (first as usize).saturating_sub(base) / 4,
            Err(_) => 0,
        }
    }

    /// Absolute byte offset of string `id`'s encoded data.
    pub fn string_offset(&self, id: usize) -> Result<u32, DecodeErr> {
        let count = self.string_count();
        if id >= count {
            return Err(DecodeErr::IndexOutOfRange { id, count });
        }
        read_u32(&self.data, self.offset_base() + id * 4)
    }

    /// Decode string `id`, returning the text and the encoded slice it
    /// occupied.
    ///
    /// Out-of-range ids yield an empty result rather than an error, so the
    /// reader can be probed safely. Unmapped symbol codes are dropped;
    /// decode through [`Decoder`] directly for the strict alternative.
    pub fn fetch_string(
        &self,
        id: usize,
        symbols: &SymbolMap,
    ) -> Result<FetchedString<'_>, DecodeErr> {
        if id >= self.string_count() {
            return Ok(FetchedString::default());
        }
        let offset = self.string_offset(id)? as usize;
        let tail = self.data.get(offset..).ok_or(DecodeErr::Length)?;
        let table = self.code_table();
        let decoded = Decoder::new(&table, symbols).decode(tail)?;
        Ok(FetchedString {
            encoded: &tail[..decoded.bytes_read()],
            text: decoded.text,
        })
    }

    /// Iterate every string in id order.
    pub fn strings<'a>(&'a self, symbols: &'a SymbolMap) -> Strings<'a, B> {
        Strings {
            source: self,
            symbols,
            next: 0,
            count: self.string_count(),
        }
    }
}

impl<B: Deref<Target = [u8]>> Debug for GpntRef<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpntRef")
            .field("code_table_len", &self.code_table().len())
            .field("string_count", &self.string_count())
            .finish()
    }
}

/// Iterator over a container's strings, yielded in id order.
#[must_use]
pub struct Strings<'a, B> {
    source: &'a GpntRef<B>,
    symbols: &'a SymbolMap,
    next: usize,
    count: usize,
}

impl<'a, B: Deref<Target = [u8]>> Iterator for Strings<'a, B> {
    type Item = Result<FetchedString<'a>, DecodeErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let item = self.source.fetch_string(self.next, self.symbols);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<B: Deref<Target = [u8]>> ExactSizeIterator for Strings<'_, B> {}
impl<B: Deref<Target = [u8]>> FusedIterator for Strings<'_, B> {}

/// Builds a container from plaintext strings and a code trie.
///
/// Every string is encoded independently and the whole buffer is laid out in
/// one pass. The first string that fails to encode aborts the build; no
/// partially consistent container is ever produced.
#[derive(Debug, Clone, Copy)]
pub struct GpntBuilder<'a> {
    table: &'a CodeTable,
    symbols: &'a SymbolMap,
}

impl<'a> GpntBuilder<'a> {
    pub fn new(table: &'a CodeTable, symbols: &'a SymbolMap) -> Self {
        Self { table, symbols }
    }

    pub fn build<S: AsRef<str>>(&self, strings: &[S]) -> Result<Bytes, EncodeErr> {
        let encoder = Encoder::new(self.table, self.symbols);
        let blobs = strings
            .iter()
            .map(|text| encoder.encode(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let base = Header::SIZE + self.table.nodes().len() * 2;
        let data_start = base + blobs.len() * 4;
        let total = data_start + blobs.iter().map(Vec::len).sum::<usize>();

        let mut buf = BytesMut::with_capacity(total);
        buf.put_u32_le(base as u32);
        for &node in self.table.nodes() {
            buf.put_u16_le(node);
        }
        let mut offset = data_start;
        for blob in &blobs {
            buf.put_u32_le(offset as u32);
            offset += blob.len();
        }
        for blob in &blobs {
            buf.put_slice(blob);
        }
        debug_assert_eq!(buf.len(), total);
        Ok(buf.freeze())
    }
}

fn read_u32(data: &[u8], at: usize) -> Result<u32, DecodeErr> {
    let bytes = data.get(at..at + 4).ok_or(DecodeErr::Length)?;
    Ok(U32::<LittleEndian>::read_from_bytes(bytes)?.get())
}
