// Parsing for the concrete formula syntax:
//
//   formula := VAR | '~' formula | '(' formula '->' formula ')'
//
// where VAR is a single ASCII uppercase letter. Whitespace is allowed
// between tokens. Implications are always fully parenthesized, so the
// grammar needs no precedence rules.

use std::error::Error;
use std::fmt;

use crate::formula::Formula;

/// An error from parsing a formula, with the byte offset where it occurred.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    message: String,
    offset: usize,
}

impl ParseError {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset into the input where the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (byte {})", self.message, self.offset)
    }
}

impl Error for ParseError {}

/// Parses a complete formula. The entire input must be consumed; trailing
/// content after a well-formed formula is an error.
pub fn parse_formula(source: &str) -> Result<Formula, ParseError> {
    let mut parser = FormulaParser::new(source);
    let formula = parser.formula()?;
    parser.skip_whitespace();
    match parser.peek_char() {
        Some(ch) => Err(parser.error(format!("unexpected trailing input starting at '{}'", ch))),
        None => Ok(formula),
    }
}

struct FormulaParser<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(source: &'a str) -> FormulaParser<'a> {
        FormulaParser { source, index: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.index += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.bump_char();
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            offset: self.index,
        }
    }

    fn formula(&mut self) -> Result<Formula, ParseError> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Err(self.error("unexpected end of input".to_string())),
            Some(ch) if ch.is_ascii_uppercase() => {
                self.bump_char();
                Ok(Formula::var(ch.to_string()))
            }
            Some('~') => {
                self.bump_char();
                Ok(Formula::not(self.formula()?))
            }
            Some('(') => {
                self.bump_char();
                let antecedent = self.formula()?;
                self.expect_arrow()?;
                let consequent = self.formula()?;
                self.skip_whitespace();
                match self.bump_char() {
                    Some(')') => Ok(Formula::implies(antecedent, consequent)),
                    _ => Err(self.error("expected ')'".to_string())),
                }
            }
            Some(ch) => Err(self.error(format!("unexpected character '{}'", ch))),
        }
    }

    fn expect_arrow(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.peek_char() == Some('-') {
            self.bump_char();
            if self.peek_char() == Some('>') {
                self.bump_char();
                return Ok(());
            }
        }
        Err(self.error("expected '->'".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_parses(source: &str, expected: &str) {
        let formula = parse_formula(source).unwrap();
        assert_eq!(formula.to_string(), expected);
    }

    fn check_rejects(source: &str) {
        assert!(
            parse_formula(source).is_err(),
            "expected parse failure for {:?}",
            source
        );
    }

    #[test]
    fn test_parse_variables() {
        check_parses("A", "A");
        check_parses("  Z ", "Z");
    }

    #[test]
    fn test_parse_negations() {
        check_parses("~A", "~A");
        check_parses("~~A", "~~A");
        check_parses("~(A -> B)", "~(A -> B)");
    }

    #[test]
    fn test_parse_implications() {
        check_parses("(A->B)", "(A -> B)");
        check_parses("( A -> B )", "(A -> B)");
        check_parses("(A -> (B -> A))", "(A -> (B -> A))");
        check_parses("((A -> B) -> ~C)", "((A -> B) -> ~C)");
    }

    #[test]
    fn test_parse_round_trips_display() {
        let sources = ["A", "~~B", "((A -> ~B) -> (C -> A))", "~(~A -> B)"];
        for source in sources {
            let formula = parse_formula(source).unwrap();
            assert_eq!(parse_formula(&formula.to_string()).unwrap(), formula);
        }
    }

    #[test]
    fn test_reject_bad_variables() {
        // Variables must be single uppercase ASCII letters.
        check_rejects("a");
        check_rejects("AB");
        check_rejects("1");
        check_rejects("");
    }

    #[test]
    fn test_reject_missing_structure() {
        check_rejects("(A -> B");
        check_rejects("A -> B");
        check_rejects("(A B)");
        check_rejects("(A ->)");
        check_rejects("~");
        check_rejects("()");
        check_rejects("(A - B)");
    }

    #[test]
    fn test_reject_trailing_input() {
        check_rejects("A B");
        check_rejects("(A -> B))");
        check_rejects("~A~");
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_formula("(A -> b)").unwrap_err();
        assert_eq!(err.offset(), 6);
        let err = parse_formula("(A -> B").unwrap_err();
        assert_eq!(err.offset(), 7);
    }
}
