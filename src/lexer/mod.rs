use miette::Result;

use crate::assembler::Reporter;
use crate::error;
use crate::lexer::cursor::Cursor;
use crate::span::Span;
use crate::MAX_NAME_LEN;

pub mod cursor;

/// Token over the assembly source. Payload text is recovered by slicing the
/// span; names are case-folded at point of use, not here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Identifier declaration, trailing `:` consumed. Span covers the name.
    Label,
    /// Mnemonic or identifier reference.
    Name,
    /// Hex literal. Must start with a digit, so `FF` is a `Name`.
    Number(u16),
    /// `#` word directive.
    Sharp,
    /// `@` text directive. Span covers the raw run up to the newline.
    At,
    Newline,
    Eof,
}

/// Test if a character is considered to be whitespace. Newline is not; it
/// delimits statements and becomes a real token.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Test if a character can continue an identifier.
fn is_name(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Tokenize the whole source up front; both assembler passes consume the
/// returned list. Lexical errors are reported and their text dropped, so the
/// output contains only well-formed tokens. Errors out only when the
/// reporter's cap is exceeded.
pub fn tokenize(src: &str, reporter: &mut Reporter) -> Result<Vec<Token>> {
    let mut cursor = Cursor::new(src);
    let mut toks = Vec::new();
    let mut pos = 0usize;
    let mut line = 1u32;

    while let Some(first) = cursor.bump() {
        let start = pos;
        let kind = match first {
            c if is_whitespace(c) => {
                cursor.take_while(is_whitespace);
                None
            }
            ';' => {
                cursor.take_while(|c| c != '\n');
                None
            }
            '\n' => Some((TokenKind::Newline, Span::new(start, 1))),
            c if c.is_ascii_alphabetic() => {
                cursor.take_while(is_name);
                let len = cursor.pos_in_token();
                if len > MAX_NAME_LEN {
                    reporter.report(error::lex_name_too_long(Span::new(start, len), src))?;
                    None
                } else if cursor.first() == ':' {
                    cursor.bump();
                    Some((TokenKind::Label, Span::new(start, len)))
                } else {
                    Some((TokenKind::Name, Span::new(start, len)))
                }
            }
            c if c.is_ascii_digit() => {
                cursor.take_while(|c| c.is_ascii_hexdigit());
                if cursor.first().is_ascii_alphanumeric() {
                    cursor.take_while(is_name);
                    let span = Span::new(start, cursor.pos_in_token());
                    reporter.report(error::lex_bad_literal(span, src))?;
                    None
                } else {
                    let span = Span::new(start, cursor.pos_in_token());
                    match u16::from_str_radix(span.slice(src), 16) {
                        Ok(val) => Some((TokenKind::Number(val), span)),
                        Err(_) => {
                            reporter.report(error::lex_number_too_large(span, src))?;
                            None
                        }
                    }
                }
            }
            '#' => Some((TokenKind::Sharp, Span::new(start, 1))),
            '@' => {
                // Raw character run between '@' and the newline, verbatim.
                cursor.take_while(|c| c != '\n');
                let len = cursor.pos_in_token() - 1;
                Some((TokenKind::At, Span::new(start + 1, len)))
            }
            // Operand punctuation, treated as a separator.
            '[' | ']' => None,
            c => {
                reporter.report(error::lex_invalid_char(Span::new(start, c.len_utf8()), src))?;
                None
            }
        };

        if let Some((kind, span)) = kind {
            toks.push(Token { kind, span, line });
        }
        if first == '\n' {
            line += 1;
        }
        pos += cursor.pos_in_token();
        cursor.reset_pos();
    }

    toks.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(src.len(), 0),
        line,
    });
    Ok(toks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<TokenKind> {
        let mut reporter = Reporter::new();
        tokenize(src, &mut reporter)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn label_then_name() {
        assert_eq!(
            lex("loop: bra"),
            vec![TokenKind::Label, TokenKind::Name, TokenKind::Eof]
        );
    }

    #[test]
    fn hex_literal_value() {
        assert_eq!(lex("1f")[0], TokenKind::Number(0x1f));
        assert_eq!(lex("0041")[0], TokenKind::Number(0x41));
    }

    #[test]
    fn letter_first_is_a_name() {
        // Hex literals must start with a digit.
        assert_eq!(lex("ff")[0], TokenKind::Name);
        assert_eq!(lex("0ff")[0], TokenKind::Number(0xff));
    }

    #[test]
    fn oversize_number_reported() {
        let mut reporter = Reporter::new();
        let toks = tokenize("12345", &mut reporter).unwrap();
        assert_eq!(reporter.count(), 1);
        assert_eq!(toks[0].kind, TokenKind::Eof);
    }

    #[test]
    fn at_captures_raw_text() {
        let mut reporter = Reporter::new();
        let src = "@Hello, World!\nhalt\n";
        let toks = tokenize(src, &mut reporter).unwrap();
        assert_eq!(toks[0].kind, TokenKind::At);
        assert_eq!(toks[0].span.slice(src), "Hello, World!");
        assert_eq!(toks[1].kind, TokenKind::Newline);
    }

    #[test]
    fn comments_and_blanks_skipped() {
        assert_eq!(
            lex("; a comment\n\n"),
            vec![TokenKind::Newline, TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn brackets_are_separators() {
        let kinds = lex("pushi 10[2]");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name,
                TokenKind::Number(0x10),
                TokenKind::Number(0x2),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn invalid_char_reported_and_skipped() {
        let mut reporter = Reporter::new();
        let toks = tokenize("add $ sub", &mut reporter).unwrap();
        assert_eq!(reporter.count(), 1);
        assert_eq!(toks.len(), 3); // add, sub, eof
    }

    #[test]
    fn lines_tracked() {
        let mut reporter = Reporter::new();
        let toks = tokenize("add\nsub\n", &mut reporter).unwrap();
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[2].line, 2);
    }
}
