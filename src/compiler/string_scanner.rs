use std::str::Chars;

use super::source_location::SourceLocation;

pub struct StringScanner<'l> {
    iterator: Chars<'l>,
    current: Option<char>,
    offset: usize,
    eof: bool,
}

impl<'l> StringScanner<'l> {
    pub fn from_input(input: &'l str) -> StringScanner<'l> {
        StringScanner {
            iterator: input.chars(),
            current: None,
            offset: 0,
            eof: false,
        }
    }

    pub fn peek(&mut self) -> Option<char> {
        if self.current.is_none() {
            self.current = self.collect_next();
        }

        self.current
    }

    pub fn next(&mut self) -> Option<char> {
        if self.current.is_none() {
            self.current = self.collect_next();
        }

        let c = self.current.take()?;
        self.offset += 1;
        Some(c)
    }

    /// Consume the next char only when it equals `expected`.
    pub fn next_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.offset)
    }

    fn collect_next(&mut self) -> Option<char> {
        if self.eof {
            return None;
        }

        match self.iterator.next() {
            Some(val) => Some(val),
            None => {
                self.eof = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::compiler::source_location::SourceLocation;

    use super::StringScanner;

    #[test]
    fn string_scanner_location() {
        let mut scanner = StringScanner::from_input("ab + 1");

        assert_eq!(scanner.location(), SourceLocation::new(0));

        let c = scanner.peek().unwrap();
        assert_eq!(c, 'a');
        assert_eq!(scanner.location(), SourceLocation::new(0));

        let _ = scanner.next().unwrap();
        assert_eq!(scanner.location(), SourceLocation::new(1));
    }

    #[test]
    fn string_scanner_next_if() {
        let mut scanner = StringScanner::from_input("==");

        assert!(scanner.next_if('='));
        assert!(!scanner.next_if('!'));
        assert!(scanner.next_if('='));
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.location(), SourceLocation::new(2));
    }

    #[test]
    fn string_scanner_counts_chars_not_bytes() {
        let mut scanner = StringScanner::from_input("é1");

        scanner.next();
        assert_eq!(scanner.location(), SourceLocation::new(1));
        assert_eq!(scanner.next(), Some('1'));
    }
}
