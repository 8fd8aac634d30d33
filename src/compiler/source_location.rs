use std::fmt;

/// Character offset into the expression source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLocation(usize);

impl SourceLocation {
    pub fn new(offset: usize) -> SourceLocation {
        SourceLocation(offset)
    }

    pub fn offset(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.0)
    }
}
