use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::packing::unpack;
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub bytes_read: usize,
    pub payload_bits: usize,
    pub symbols: usize,
    pub corrupt_padding: bool,
}

/// Walks the tree one bit at a time, yielding a symbol at every leaf.
pub struct DecodingIter<'t, It> {
    tree: &'t HuffmanTree,
    current: NodeId,
    pending: usize,
    incoming: It,
}

impl<'t, It> DecodingIter<'t, It> {
    pub fn new(tree: &'t HuffmanTree, incoming: It) -> Self {
        Self {
            tree,
            current: tree.root(),
            pending: 0,
            incoming,
        }
    }
}

impl<'t, It> Iterator for DecodingIter<'t, It>
where
    It: Iterator<Item = bool>,
{
    type Item = Result<Symbol>;
    fn next(&mut self) -> Option<Self::Item> {
        if let Node::Leaf(sf) = self.tree.root_node() {
            return self.incoming.next().map(|_| Ok(sf.symbol));
        }

        while let Some(bit) = self.incoming.next() {
            let Node::Internal { left, right, .. } = self.tree.node(self.current) else {
                unreachable!("traversal always rests on an internal node");
            };
            let next = if bit { *right } else { *left };

            match self.tree.node(next) {
                Node::Leaf(sf) => {
                    self.current = self.tree.root();
                    self.pending = 0;
                    return Some(Ok(sf.symbol));
                }
                Node::Internal { .. } => {
                    self.current = next;
                    self.pending += 1;
                }
            }
        }

        if self.pending == 0 {
            None
        } else {
            let pending_bits = std::mem::take(&mut self.pending);
            Some(Err(Error::TruncatedCode { pending_bits }))
        }
    }
}

pub struct Decoder<'t> {
    tree: &'t HuffmanTree,
}

impl<'t> Decoder<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Self { tree }
    }

    pub fn decode_bits<It: Iterator<Item = bool>>(&self, bits: It) -> DecodingIter<'t, It> {
        DecodingIter::new(self.tree, bits)
    }

    pub fn decode_to_vec(&self, bits: &[bool]) -> Result<Vec<u8>> {
        self.decode_bits(bits.iter().copied())
            .map(|s| s.map(u8::from))
            .collect()
    }
}

/// Decode the packed bytes of `encoded` with `tree` and write the text to
/// `destination`.
///
/// Output is only written once the whole input decoded cleanly.
pub fn decode(
    mut encoded: impl Read,
    tree: &HuffmanTree,
    mut destination: impl Write,
) -> Result<DecodeStats> {
    let mut bytes = Vec::new();
    encoded.read_to_end(&mut bytes)?;

    let unpacked = unpack(&bytes);
    let decoded = Decoder::new(tree).decode_to_vec(&unpacked.bits)?;

    destination.write_all(&decoded)?;
    destination.flush()?;

    let stats = DecodeStats {
        bytes_read: bytes.len(),
        payload_bits: unpacked.bits.len(),
        symbols: decoded.len(),
        corrupt_padding: unpacked.corrupt_padding,
    };
    tracing::info!(
        bytes = stats.bytes_read,
        bits = stats.payload_bits,
        symbols = stats.symbols,
        "decoded"
    );
    Ok(stats)
}
