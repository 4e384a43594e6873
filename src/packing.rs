//! Packing of bit sequences into bytes.
//!
//! A packed stream starts with `padding - 1` zero bits and a single one bit,
//! where `padding = 8 - len % 8`, so the total length is a multiple of 8 and
//! the first one bit marks where the payload begins. Bits are packed most
//! significant first.

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct BitPacker {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl BitPacker {
    /// Start a stream that will carry `payload_len` bits.
    pub fn new(payload_len: usize) -> Self {
        let padding = 8 - payload_len % 8;
        let mut packer = BitPacker {
            bytes: Vec::with_capacity((payload_len + padding) / 8),
            bit_count: 0,
        };
        for _ in 0..padding - 1 {
            packer.push_bit(false);
        }
        packer.push_bit(true);
        packer
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bytes.len() {
            self.bytes.push(0);
        }

        if bit {
            self.bytes[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn push_bits(&mut self, bits: impl IntoIterator<Item = bool>) {
        bits.into_iter().for_each(|b| self.push_bit(b));
    }

    pub fn finish(self) -> Vec<u8> {
        debug_assert_eq!(self.bit_count % 8, 0, "payload length did not match");
        self.bytes
    }
}

pub fn pack(bits: &[bool]) -> Vec<u8> {
    let mut packer = BitPacker::new(bits.len());
    packer.push_bits(bits.iter().copied());
    packer.finish()
}

/// Pack a string of '0' and '1' characters.
pub fn pack_str(bitstring: &str) -> Result<Vec<u8>> {
    let bits = parse_bits(bitstring)?;
    Ok(pack(&bits))
}

pub fn parse_bits(bitstring: &str) -> Result<Vec<bool>> {
    bitstring
        .chars()
        .enumerate()
        .map(|(position, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            found => Err(Error::InvalidBitstring { position, found }),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unpacked {
    pub bits: Vec<bool>,
    /// No sentinel was found in the first byte; that byte was dropped whole.
    pub corrupt_padding: bool,
}

pub fn unpack(bytes: &[u8]) -> Unpacked {
    let mut bits: Vec<bool> = bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect();

    if bits.is_empty() {
        return Unpacked {
            bits,
            corrupt_padding: false,
        };
    }

    match bits[..8].iter().position(|&b| b) {
        Some(sentinel) => {
            bits.drain(..=sentinel);
            Unpacked {
                bits,
                corrupt_padding: false,
            }
        }
        None => {
            tracing::warn!("no padding sentinel in first byte, dropping it");
            bits.drain(..8);
            Unpacked {
                bits,
                corrupt_padding: true,
            }
        }
    }
}
