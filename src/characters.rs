use std::cmp::Ordering;
use std::io::Read;

use crate::error::{Error, Result};
use crate::symbol::{Symbol, SymbolMap};

/// A leaf of the coding tree: a symbol and its share of the source.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SymbolFrequency {
    pub symbol: Symbol,
    pub probability: f64,
}

impl SymbolFrequency {
    pub fn new(symbol: Symbol, probability: f64) -> Self {
        Self {
            symbol,
            probability,
        }
    }

    /// Probability ascending, then symbol ordinal ascending.
    pub fn order(&self, other: &Self) -> Ordering {
        self.probability
            .total_cmp(&other.probability)
            .then(self.symbol.cmp(&other.symbol))
    }
}

/// Leaf entries sorted by [`SymbolFrequency::order`], one per symbol that
/// occurs in the source.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<SymbolFrequency>", into = "Vec<SymbolFrequency>")]
pub struct FrequencyTable {
    entries: Vec<SymbolFrequency>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[SymbolFrequency] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn probability_sum(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    fn sorted(mut entries: Vec<SymbolFrequency>) -> Self {
        entries.sort_by(SymbolFrequency::order);
        Self { entries }
    }
}

impl TryFrom<Vec<SymbolFrequency>> for FrequencyTable {
    type Error = Error;
    fn try_from(entries: Vec<SymbolFrequency>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidTable("no entries".to_string()));
        }
        if let Some(e) = entries
            .iter()
            .find(|e| !e.probability.is_finite() || e.probability < 0.0)
        {
            return Err(Error::InvalidTable(format!(
                "symbol {:?} has probability {}",
                e.symbol, e.probability
            )));
        }
        let mut seen = SymbolMap::new(false);
        for e in entries.iter() {
            if std::mem::replace(&mut seen[e.symbol], true) {
                return Err(Error::InvalidTable(format!(
                    "symbol {:?} listed twice",
                    e.symbol
                )));
            }
        }
        Ok(Self::sorted(entries))
    }
}

impl From<FrequencyTable> for Vec<SymbolFrequency> {
    fn from(value: FrequencyTable) -> Self {
        value.entries
    }
}

pub struct CharacterCounter {
    counts: SymbolMap<usize>,
    total: usize,
}

impl CharacterCounter {
    pub fn empty() -> Self {
        Self {
            counts: SymbolMap::new(0),
            total: 0,
        }
    }

    pub fn count_one(&mut self, s: Symbol) {
        self.counts[s] += 1;
        self.total += 1;
    }

    pub fn count(&mut self, it: impl Iterator<Item = Symbol>) -> &mut Self {
        it.for_each(|s| self.count_one(s));
        self
    }

    /// Count every byte of `reader`, rejecting bytes outside the domain.
    pub fn count_reader(&mut self, mut reader: impl Read) -> Result<&mut Self> {
        let mut buf = vec![0; 512];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => return Ok(self),
                Ok(n) => {
                    for &b in &buf[..n] {
                        self.count_one(Symbol::try_from(b)?);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn finish(&self) -> Result<FrequencyTable> {
        if self.total == 0 {
            return Err(Error::EmptySource);
        }

        let mut entries: Vec<_> = self
            .counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(s, c)| SymbolFrequency::new(s, *c as f64 / self.total as f64))
            .collect();

        // A lone symbol still needs a sibling, otherwise its code would be empty.
        if let &[only] = entries.as_slice() {
            let partner = only.symbol.succ_wrapping();
            tracing::debug!(symbol = ?only.symbol, ?partner, "adding zero-probability partner symbol");
            entries.push(SymbolFrequency::new(partner, 0.0));
        }

        Ok(FrequencyTable::sorted(entries))
    }
}

pub fn build_frequency_table(source: impl Read) -> Result<FrequencyTable> {
    let mut counter = CharacterCounter::empty();
    counter.count_reader(source)?;
    let table = counter.finish()?;
    tracing::debug!(
        characters = counter.total(),
        distinct = table.len(),
        "built frequency table"
    );
    Ok(table)
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    pub fn sym(c: char) -> Symbol {
        Symbol::try_from(c).unwrap()
    }

    pub fn table_of(text: &str) -> FrequencyTable {
        build_frequency_table(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_abracadabra_frequencies() {
        let table = table_of("abracadabra");
        let got: Vec<_> = table
            .entries()
            .iter()
            .map(|e| (char::from(e.symbol), e.probability))
            .collect();

        let expected = [
            ('c', 1.0 / 11.0),
            ('d', 1.0 / 11.0),
            ('b', 2.0 / 11.0),
            ('r', 2.0 / 11.0),
            ('a', 5.0 / 11.0),
        ];
        assert_eq!(got.len(), expected.len());
        for ((c, p), (ec, ep)) in got.into_iter().zip(expected) {
            assert_eq!(c, ec);
            assert!(approx(p, ep));
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        for text in ["abracadabra", "the quick brown fox\njumps over\tthe lazy dog", "zz"] {
            assert!(approx(table_of(text).probability_sum(), 1.0));
        }
    }

    #[test]
    fn test_equal_counts_sorted_by_ordinal() {
        let table = table_of("dcbaabcd");
        let order: String = table.entries().iter().map(|e| char::from(e.symbol)).collect();
        assert_eq!(order, "abcd");
    }

    #[test]
    fn test_single_symbol_gets_partner() {
        let table = table_of("aaaa");
        assert_eq!(
            table.entries(),
            &[
                SymbolFrequency::new(sym('b'), 0.0),
                SymbolFrequency::new(sym('a'), 1.0),
            ]
        );
    }

    #[test]
    fn test_single_last_symbol_partner_wraps() {
        let del = Symbol::MAX;
        let mut counter = CharacterCounter::empty();
        let table = counter.count(std::iter::repeat_n(del, 3)).finish().unwrap();
        assert_eq!(
            table.entries(),
            &[
                SymbolFrequency::new(Symbol::zero(), 0.0),
                SymbolFrequency::new(del, 1.0),
            ]
        );
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(
            build_frequency_table(&b""[..]),
            Err(Error::EmptySource)
        ));
    }

    #[test]
    fn test_non_ascii_source() {
        assert!(matches!(
            build_frequency_table("naïve".as_bytes()),
            Err(Error::SymbolOutOfRange(_))
        ));
    }

    #[test]
    fn test_table_json_round_trip() {
        let table = table_of("mississippi");
        let json = serde_json::to_string(&table).unwrap();
        let parsed: FrequencyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_table_json_is_resorted_and_validated() {
        let parsed: FrequencyTable = serde_json::from_str(
            r#"[{"symbol":"x","probability":0.75},{"symbol":"y","probability":0.25}]"#,
        )
        .unwrap();
        assert_eq!(parsed.entries()[0].symbol, sym('y'));

        assert!(serde_json::from_str::<FrequencyTable>("[]").is_err());
        assert!(
            serde_json::from_str::<FrequencyTable>(
                r#"[{"symbol":"x","probability":0.5},{"symbol":"x","probability":0.5}]"#
            )
            .is_err()
        );
    }
}
