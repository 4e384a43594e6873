use crate::symbol::Symbol;

#[derive(Debug)]
pub enum Error {
    /// The source contained no characters, so no frequency table can be built
    EmptySource,
    /// A bit-string contained something other than '0' or '1'
    InvalidBitstring { position: usize, found: char },
    /// A byte outside the 128-symbol domain
    SymbolOutOfRange(u8),
    /// The code table has no entry for a symbol that appears in the source
    MissingCode(Symbol),
    /// Encoded bits ran out in the middle of a code
    TruncatedCode { pending_bits: usize },
    /// A deserialized frequency table violates its invariants
    InvalidTable(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Error::*;
        match self {
            EmptySource => write!(f, "source is empty, cannot build frequency table"),
            InvalidBitstring { position, found } => write!(
                f,
                "invalid character {:?} at position {} in bitstring",
                found, position
            ),
            SymbolOutOfRange(b) => write!(f, "byte {:#04x} is outside the symbol domain", b),
            MissingCode(s) => write!(f, "no code assigned to symbol {:?}", s),
            TruncatedCode { pending_bits } => write!(
                f,
                "encoded data ends in the middle of a code ({} dangling bits)",
                pending_bits
            ),
            InvalidTable(m) => write!(f, "invalid frequency table: {}", m),
            Io(e) => write!(f, "i/o failure: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
