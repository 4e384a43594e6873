use std::io::{Read, Write};

use super::CodeTable;
use crate::error::{Error, Result};
use crate::packing::BitPacker;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub symbols: usize,
    pub payload_bits: usize,
    pub bytes_written: usize,
}

impl EncodeStats {
    /// Encoded size relative to one byte per symbol.
    pub fn ratio(&self) -> f64 {
        self.bytes_written as f64 / self.symbols.max(1) as f64
    }
}

pub struct Encoder<'t> {
    codes: &'t CodeTable,
}

impl<'t> Encoder<'t> {
    pub fn new(codes: &'t CodeTable) -> Self {
        Self { codes }
    }

    /// Encode a whole message into packed bytes, returning them with the
    /// number of payload bits.
    pub fn encode_symbols(&self, symbols: &[Symbol]) -> Result<(Vec<u8>, usize)> {
        let payload_bits = self.codes.encoded_len(symbols)?;
        let mut packer = BitPacker::new(payload_bits);
        for &s in symbols {
            let code = self.codes.get(s).ok_or(Error::MissingCode(s))?;
            packer.push_bits(code.bits().iter().copied());
        }
        Ok((packer.finish(), payload_bits))
    }

    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode_symbols(&to_symbols(bytes)?)?.0)
    }
}

fn to_symbols(bytes: &[u8]) -> Result<Vec<Symbol>> {
    bytes.iter().map(|&b| Symbol::try_from(b)).collect()
}

/// Encode the whole of `source` and write the packed bytes to `destination`.
///
/// Nothing is written unless every symbol of the source could be encoded.
pub fn encode(
    mut source: impl Read,
    codes: &CodeTable,
    mut destination: impl Write,
) -> Result<EncodeStats> {
    let mut input = Vec::new();
    source.read_to_end(&mut input)?;

    let symbols = to_symbols(&input)?;
    let (encoded, payload_bits) = Encoder::new(codes).encode_symbols(&symbols)?;

    destination.write_all(&encoded)?;
    destination.flush()?;

    let stats = EncodeStats {
        symbols: symbols.len(),
        payload_bits,
        bytes_written: encoded.len(),
    };
    tracing::info!(
        symbols = stats.symbols,
        bits = stats.payload_bits,
        bytes = stats.bytes_written,
        ratio = stats.ratio(),
        "encoded"
    );
    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::characters::test::{sym, table_of};
    use crate::encoding::build_code_table;
    use crate::tree::build_tree;

    #[test]
    fn test_encode_abracadabra() {
        let codes = build_code_table(&build_tree(&table_of("abracadabra")));
        let mut out = Vec::new();
        let stats = encode(&b"abracadabra"[..], &codes, &mut out).unwrap();

        assert_eq!(out, vec![0b1011_0111, 0b0100_0101, 0b0110_1110]);
        assert_eq!(stats.symbols, 11);
        assert_eq!(stats.payload_bits, 23);
        assert_eq!(stats.bytes_written, 3);
    }

    #[test]
    fn test_encode_single_symbol() {
        let codes = build_code_table(&build_tree(&table_of("aaaa")));
        let mut out = Vec::new();
        encode(&b"aaaa"[..], &codes, &mut out).unwrap();
        assert_eq!(out, vec![0b0001_1111]);
    }

    #[test]
    fn test_missing_code_writes_nothing() {
        let codes = build_code_table(&build_tree(&table_of("abc")));
        let mut out = Vec::new();
        let result = encode(&b"abcz"[..], &codes, &mut out);
        assert!(matches!(result, Err(Error::MissingCode(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_encoder_reports_missing_code() {
        let codes = build_code_table(&build_tree(&table_of("ab")));
        let encoder = Encoder::new(&codes);
        assert!(matches!(
            encoder.encode_symbols(&[sym('a'), sym('q')]),
            Err(Error::MissingCode(s)) if s == sym('q')
        ));
        let (bytes, bits) = encoder.encode_symbols(&[sym('a'), sym('b')]).unwrap();
        assert_eq!((bytes, bits), (vec![0b0000_0101], 2));
    }

    #[test]
    fn test_out_of_domain_writes_nothing() {
        let codes = build_code_table(&build_tree(&table_of("abc")));
        let mut out = Vec::new();
        let result = encode(&[b'a', 0xff][..], &codes, &mut out);
        assert!(matches!(result, Err(Error::SymbolOutOfRange(0xff))));
        assert!(out.is_empty());
    }
}
