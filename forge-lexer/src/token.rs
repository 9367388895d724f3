use serde::{Deserialize, Serialize};

/// Every token kind the lexer can produce. Payload (the literal text, the identifier
/// name) lives on `Token::lexeme`, not embedded in the variant — keeps this a plain
/// fieldless enum so keyword lookup and compound-operator resolution are table lookups
/// rather than match arms that also have to reconstruct a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    Number,
    StringLit,
    True,
    False,
    Null,
    Identifier,

    // Keywords
    If,
    Else,
    While,
    For,
    Def,
    Return,
    Class,
    SelfKw,
    Move,
    Defer,
    Extern,
    Unique,
    Shared,
    Weak,
    New,
    Maybe,
    Some,
    None,
    Mut,

    // Primitive type keywords
    IntType,
    FloatType,
    DoubleType,
    BoolType,
    StrType,
    VoidType,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    EqualEqual,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
    Bang,
    Amp,
    Pipe,
    Caret,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    Colon,
    ColonEqual,
    Arrow,
    Dot,
    Comma,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Structural
    Newline,
    Eof,
}

impl TokenKind {
    /// Looks an identifier up against the fixed keyword table. Case-sensitive:
    /// `Maybe`/`Some`/`None` keep their capitalized keying alongside the lowercase
    /// keywords, matching the distinct spellings the tokenizer recognized.
    pub fn keyword_for(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "def" => TokenKind::Def,
            "return" => TokenKind::Return,
            "class" => TokenKind::Class,
            "self" => TokenKind::SelfKw,
            "move" => TokenKind::Move,
            "defer" => TokenKind::Defer,
            "extern" => TokenKind::Extern,
            "unique" => TokenKind::Unique,
            "shared" => TokenKind::Shared,
            "weak" => TokenKind::Weak,
            "new" => TokenKind::New,
            "maybe" => TokenKind::Maybe,
            "some" => TokenKind::Some,
            "none" => TokenKind::None,
            "Maybe" => TokenKind::Maybe,
            "Some" => TokenKind::Some,
            "None" => TokenKind::None,
            "mut" => TokenKind::Mut,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "int" => TokenKind::IntType,
            "float" => TokenKind::FloatType,
            "double" => TokenKind::DoubleType,
            "bool" => TokenKind::BoolType,
            "str" => TokenKind::StrType,
            "void" => TokenKind::VoidType,
            _ => return std::option::Option::None,
        })
    }
}

/// A token with its kind, source text, and position. `lexeme` is an owned string: the
/// token outlives the source buffer it was scanned from once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn to_source_location(&self, file: &str) -> forge_diagnostics::SourceLocation {
        forge_diagnostics::SourceLocation::new(file, self.line, self.column, self.lexeme.len())
    }

    /// For `StringLit`, the quoted lexeme with its delimiters stripped. The lexeme
    /// keeps its quotes so that re-lexing it reproduces the same token.
    pub fn string_value(&self) -> &str {
        debug_assert_eq!(self.kind, TokenKind::StringLit);
        &self.lexeme[1..self.lexeme.len() - 1]
    }
}
