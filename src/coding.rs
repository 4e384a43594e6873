use std::io::{Read, Write};

use crate::characters::{FrequencyTable, build_frequency_table};
use crate::encoding::{CodeTable, DecodeStats, EncodeStats, decode, encode};
use crate::error::Result;
use crate::tree::HuffmanTree;

/// Everything derived from one source: its frequency table, the tree built
/// from it and the resulting codes.
///
/// Encoding and decoding must use the same tree, so a decoder either rebuilds
/// the session from the original source or from its saved [`FrequencyTable`].
#[derive(Debug, Clone)]
pub struct HuffmanCoding {
    table: FrequencyTable,
    tree: HuffmanTree,
    codes: CodeTable,
}

impl HuffmanCoding {
    pub fn from_reader(source: impl Read) -> Result<Self> {
        Ok(Self::from_table(build_frequency_table(source)?))
    }

    pub fn from_table(table: FrequencyTable) -> Self {
        let tree = HuffmanTree::build(&table);
        let codes = CodeTable::build(&tree);
        Self { table, tree, codes }
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn encode(&self, source: impl Read, destination: impl Write) -> Result<EncodeStats> {
        encode(source, &self.codes, destination)
    }

    pub fn decode(&self, encoded: impl Read, destination: impl Write) -> Result<DecodeStats> {
        decode(encoded, &self.tree, destination)
    }
}
