use std::str::FromStr;

use serde::ser::SerializeMap;

use crate::error::Error;
use crate::packing::parse_bits;
use crate::symbol::{Symbol, SymbolMap};
use crate::tree::{HuffmanTree, Node};

/// Path from the root to a leaf: `false` goes left, `true` goes right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn join(&self, tail: bool) -> Self {
        let mut v = self.0.clone();
        v.push(tail);
        Self(v)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.0.iter() {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_bits(s)?))
    }
}

/// Code for every leaf symbol of a tree; symbols not in the tree have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: SymbolMap<Option<Code>>,
}

impl CodeTable {
    pub fn build(tree: &HuffmanTree) -> Self {
        let mut codes = SymbolMap::new(None);

        if let Node::Leaf(sf) = tree.root_node() {
            codes[sf.symbol] = Some(Code::empty().join(false));
            return Self { codes };
        }

        let mut stack = vec![(tree.root(), Code::empty())];
        while let Some((id, prefix)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf(sf) => {
                    debug_assert!(
                        codes[sf.symbol].is_none(),
                        "code for symbol {:?} is already set",
                        sf.symbol
                    );
                    codes[sf.symbol] = Some(prefix);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((*right, prefix.join(true)));
                    stack.push((*left, prefix.join(false)));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        self.codes
            .iter()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Total number of bits needed to encode `symbols`.
    pub fn encoded_len(&self, symbols: &[Symbol]) -> Result<usize, Error> {
        symbols.iter().try_fold(0, |acc, &s| {
            self.get(s)
                .map(|c| acc + c.len())
                .ok_or(Error::MissingCode(s))
        })
    }
}

impl serde::Serialize for CodeTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (symbol, code) in self.iter() {
            map.serialize_entry(&symbol, &code.to_string())?;
        }
        map.end()
    }
}

pub fn build_code_table(tree: &HuffmanTree) -> CodeTable {
    CodeTable::build(tree)
}

pub mod decoder;
pub mod encoder;

pub use decoder::{DecodeStats, decode};
pub use encoder::{EncodeStats, encode};

#[cfg(test)]
mod test {
    use super::*;
    use crate::characters::test::{sym, table_of};
    use crate::tree::build_tree;

    fn codes_of(text: &str) -> CodeTable {
        build_code_table(&build_tree(&table_of(text)))
    }

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn assert_prefix_free(table: &CodeTable) {
        for (a, ca) in table.iter() {
            for (b, cb) in table.iter() {
                if a != b {
                    assert!(!ca.is_prefix_of(cb), "{:?}={} prefixes {:?}={}", a, ca, b, cb);
                }
            }
        }
    }

    #[test]
    fn test_abracadabra_codes() {
        let table = codes_of("abracadabra");
        let expected = [
            ('a', "0"),
            ('b', "110"),
            ('c', "100"),
            ('d', "101"),
            ('r', "111"),
        ];
        assert_eq!(table.len(), expected.len());
        for (c, e) in expected {
            assert_eq!(table.get(sym(c)), Some(&code(e)));
        }
        assert_eq!(table.get(sym('z')), None);

        let a = table.get(sym('a')).unwrap().len();
        assert!(a <= table.get(sym('c')).unwrap().len());
        assert!(a <= table.get(sym('d')).unwrap().len());
    }

    #[test]
    fn test_codes_are_prefix_free() {
        for text in [
            "abracadabra",
            "hello world",
            "aaaa",
            "The Quick Brown Fox Jumps Over The Lazy Dog 0123456789!?",
        ] {
            let table = codes_of(text);
            assert!(table.iter().all(|(_, c)| !c.is_empty()));
            assert_prefix_free(&table);
        }
    }

    #[test]
    fn test_one_code_per_leaf() {
        for text in ["abracadabra", "mississippi", "zz"] {
            let freq = table_of(text);
            let codes = build_code_table(&build_tree(&freq));
            assert_eq!(codes.len(), freq.len());
            assert!(freq.entries().iter().all(|e| codes.get(e.symbol).is_some()));
        }
    }

    #[test]
    fn test_single_symbol_codes() {
        let table = codes_of("aaaa");
        assert_eq!(table.get(sym('a')), Some(&code("1")));
        assert_eq!(table.get(sym('b')), Some(&code("0")));
    }

    #[test]
    fn test_rebuilt_codes_identical() {
        let text = "a man a plan a canal panama";
        assert_eq!(codes_of(text), codes_of(text));
    }

    #[test]
    fn test_encoded_len_beats_fixed_width() {
        let text = "abracadabra";
        let table = codes_of(text);
        let symbols: Vec<_> = text.chars().map(sym).collect();
        let bits = table.encoded_len(&symbols).unwrap();
        assert_eq!(bits, 23);
        assert!(bits <= 8 * symbols.len());

        assert!(matches!(
            table.encoded_len(&[sym('z')]),
            Err(Error::MissingCode(_))
        ));
    }

    #[test]
    fn test_code_parse_and_display() {
        assert_eq!(code("0110").to_string(), "0110");
        assert!(matches!(
            "012".parse::<Code>(),
            Err(Error::InvalidBitstring { position: 2, .. })
        ));
    }

    #[test]
    fn test_serialize_code_table() {
        let json = serde_json::to_string(&codes_of("aaaa")).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"0"}"#);
    }
}
