use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use crate::error::Error;

/// Number of slots in the symbol domain (7-bit ASCII)
pub const DOMAIN_SIZE: usize = 128;

pub trait Seq: Sized {
    fn succ(&self) -> Option<Self>;
}

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub struct Symbol(u8);

impl Symbol {
    pub const MAX: Symbol = Symbol((DOMAIN_SIZE - 1) as u8);

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn ordinal(self) -> usize {
        self.0.into()
    }

    /// Successor in the domain, wrapping from the last slot back to slot 0.
    pub fn succ_wrapping(self) -> Self {
        self.succ().unwrap_or_else(Self::zero)
    }
}

impl Seq for Symbol {
    fn succ(&self) -> Option<Self> {
        if *self == Self::MAX {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as usize) < DOMAIN_SIZE {
            Ok(Self(value))
        } else {
            Err(Error::SymbolOutOfRange(value))
        }
    }
}

impl TryFrom<char> for Symbol {
    type Error = Error;
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(b) => Symbol::try_from(b),
            Err(_) => Err(Error::SymbolOutOfRange(u8::MAX)),
        }
    }
}

impl From<Symbol> for char {
    fn from(value: Symbol) -> Self {
        value.0 as char
    }
}

impl From<Symbol> for u8 {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0 as char)
    }
}

pub struct SymbolIter {
    now: Option<Symbol>,
}

impl SymbolIter {
    pub fn begin_zero() -> Self {
        Self {
            now: Some(Symbol::zero()),
        }
    }
}

impl Iterator for SymbolIter {
    type Item = Symbol;
    fn next(&mut self) -> Option<Self::Item> {
        let r = self.now;
        self.now = r?.succ();
        r
    }
}

/// Dense map with one slot per symbol of the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMap<T>(Vec<T>);

impl<T> SymbolMap<T> {
    pub fn new(t: T) -> Self
    where
        T: Clone,
    {
        Self(vec![t; DOMAIN_SIZE])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &T)> {
        SymbolIter::begin_zero().zip(self.0.iter())
    }
}

impl<T> Index<Symbol> for SymbolMap<T> {
    type Output = T;
    fn index(&self, index: Symbol) -> &Self::Output {
        &self.0[index.ordinal()]
    }
}

impl<T> IndexMut<Symbol> for SymbolMap<T> {
    fn index_mut(&mut self, index: Symbol) -> &mut Self::Output {
        &mut self.0[index.ordinal()]
    }
}
