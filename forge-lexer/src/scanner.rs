use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{LexError, LexResult};
use crate::operator::operator_info;
use crate::token::{Token, TokenKind};

/// Hand-rolled scanner over a `Peekable<CharIndices>`, one token per call. `tokenize`
/// drains the whole source into a vector ending in `Eof`.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_non_newline_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c == ' ' || c == '\t' || c == '\r' => {
                    self.advance();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if let Some((_, '/')) = lookahead.peek().copied() {
                        self.advance();
                        self.advance();
                        while let Some(c) = self.peek_char() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_non_newline_whitespace_and_comments();

        let (line, column) = (self.line, self.column);
        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, "", line, column));
        };

        if ch == '\n' {
            self.advance();
            return Ok(Token::new(TokenKind::Newline, "\n", line, column));
        }
        if ch == '"' || ch == '\'' {
            return self.scan_string(ch, line, column);
        }
        if ch.is_ascii_digit() || (ch == '.' && self.peeks_digit_after_dot()) {
            return self.scan_number(line, column);
        }
        if ch.is_alphabetic() || ch == '_' {
            return Ok(self.scan_identifier(line, column));
        }
        self.scan_operator(line, column)
    }

    fn peeks_digit_after_dot(&self) -> bool {
        let mut iter = self.chars.clone();
        iter.next();
        matches!(iter.peek(), Some((_, c)) if c.is_ascii_digit())
    }

    fn scan_identifier(&mut self, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = TokenKind::keyword_for(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, line, column)
    }

    fn scan_number(&mut self, line: usize, column: usize) -> LexResult<Token> {
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' {
                if seen_dot {
                    return Err(LexError::malformed_number(self.line, self.column));
                }
                seen_dot = true;
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek_char() == Some('f') {
            text.push('f');
            self.advance();
        }
        Ok(Token::new(TokenKind::Number, text, line, column))
    }

    /// The lexeme retains the delimiting quotes, so that re-lexing it reproduces the
    /// same token (the round-trip invariant). Callers that need the string's value
    /// strip the first and last character.
    fn scan_string(&mut self, quote: char, line: usize, column: usize) -> LexResult<Token> {
        let mut text = String::new();
        text.push(quote);
        self.advance(); // opening quote
        loop {
            match self.peek_char() {
                None => return Err(LexError::unterminated_string(line, column)),
                Some(c) if c == quote => {
                    text.push(c);
                    self.advance();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::StringLit, text, line, column))
    }

    fn scan_operator(&mut self, line: usize, column: usize) -> LexResult<Token> {
        let ch = self.advance().expect("checked by caller");
        let Some(info) = operator_info(ch) else {
            return Err(LexError::unexpected_byte(ch, line, column));
        };

        for compound in info.compounds {
            if self.peek_char() == Some(compound.next_char) {
                self.advance();
                let lexeme: String = [ch, compound.next_char].iter().collect();
                return Ok(Token::new(compound.kind, lexeme, line, column));
            }
        }
        Ok(Token::new(info.single, ch.to_string(), line, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_number_operator_identifier() {
        let tokens = Lexer::new("3 + 4.5f * x").tokenize().unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].lexeme, "3");
        assert_eq!(tokens[2].lexeme, "4.5f");
        assert_eq!(tokens[4].lexeme, "x");
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(kinds("IF"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("While"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("if"), vec![TokenKind::If, TokenKind::Eof]);
    }

    #[test]
    fn maybe_some_none_accept_both_their_capitalized_and_lowercase_spellings() {
        assert_eq!(kinds("Maybe"), vec![TokenKind::Maybe, TokenKind::Eof]);
        assert_eq!(kinds("maybe"), vec![TokenKind::Maybe, TokenKind::Eof]);
        assert_eq!(kinds("Some"), vec![TokenKind::Some, TokenKind::Eof]);
        assert_eq!(kinds("None"), vec![TokenKind::None, TokenKind::Eof]);
        assert_eq!(kinds("SOME"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn newline_is_a_token() {
        assert_eq!(
            kinds("a\nb"),
            vec![
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn line_comment_consumes_to_end_of_line_without_emitting() {
        assert_eq!(
            kinds("a // comment\nb"),
            vec![
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn compound_operators_are_preferred_over_single_char() {
        assert_eq!(kinds(":="), vec![TokenKind::ColonEqual, TokenKind::Eof]);
        assert_eq!(kinds("->"), vec![TokenKind::Arrow, TokenKind::Eof]);
        assert_eq!(kinds("=="), vec![TokenKind::EqualEqual, TokenKind::Eof]);
        assert_eq!(kinds("&&"), vec![TokenKind::AndAnd, TokenKind::Eof]);
        assert_eq!(kinds(":"), vec![TokenKind::Colon, TokenKind::Eof]);
    }

    #[test]
    fn strings_do_not_process_escapes() {
        let tokens = Lexer::new(r#""a\nb""#).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].lexeme, r#""a\nb""#);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::new("\"abc").tokenize().is_err());
    }

    #[test]
    fn second_dot_in_number_is_an_error() {
        assert!(Lexer::new("1.2.3").tokenize().is_err());
    }

    #[test]
    fn unknown_byte_is_a_fatal_error() {
        assert!(Lexer::new("@").tokenize().is_err());
    }

    #[test]
    fn every_emitted_lexeme_relexes_to_a_single_token_of_the_same_kind() {
        for src in ["3", "4.5f", "x", "if", "\"hi\"", "+=", ":=", "->", "=="] {
            let tokens = Lexer::new(src).tokenize().unwrap();
            assert_eq!(tokens.len(), 2, "expected one token + eof for {src:?}");
            assert_eq!(tokens[0].kind, Lexer::new(&tokens[0].lexeme.clone()).tokenize().unwrap()[0].kind);
        }
    }
}
