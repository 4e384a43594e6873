mod characters;
pub mod cli;
mod coding;
mod encoding;
mod error;
pub mod logging;
mod packing;
mod symbol;
mod tree;

pub use characters::{CharacterCounter, FrequencyTable, SymbolFrequency, build_frequency_table};
pub use coding::HuffmanCoding;
pub use encoding::{
    Code, CodeTable, DecodeStats, EncodeStats, build_code_table, decode,
    decoder::{Decoder, DecodingIter},
    encode,
    encoder::Encoder,
};
pub use error::{Error, Result};
pub use packing::{BitPacker, Unpacked, pack, pack_str, unpack};
pub use symbol::{DOMAIN_SIZE, Seq, Symbol, SymbolMap};
pub use tree::{HuffmanTree, Node, NodeId, build_tree};
