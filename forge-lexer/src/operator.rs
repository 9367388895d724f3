use crate::token::TokenKind;

/// A two-character extension of a single-char operator: the char that must follow,
/// and the kind the pair promotes to.
pub struct CompoundOp {
    pub next_char: char,
    pub kind: TokenKind,
}

/// Everything the lexer needs to know about the operators starting with one
/// particular first character: its lone-character kind, plus the compounds it may
/// extend into. A per-character operator table rather than a flat cascade of
/// `if`/`else` on two-character lookahead.
pub struct OperatorInfo {
    pub single: TokenKind,
    pub compounds: &'static [CompoundOp],
}

macro_rules! compounds {
    ($(($ch:expr, $kind:expr)),* $(,)?) => {
        &[$(CompoundOp { next_char: $ch, kind: $kind }),*]
    };
}

/// Table-driven operator lookup keyed by first character. `//` is handled specially by
/// the lexer before this table is consulted (it starts a comment, not a token).
pub fn operator_info(first: char) -> Option<OperatorInfo> {
    use TokenKind::*;
    Some(match first {
        '+' => OperatorInfo {
            single: Plus,
            compounds: compounds![('=', PlusEq)],
        },
        '-' => OperatorInfo {
            single: Minus,
            compounds: compounds![('>', Arrow), ('=', MinusEq)],
        },
        '*' => OperatorInfo {
            single: Star,
            compounds: compounds![('=', StarEq)],
        },
        '/' => OperatorInfo {
            single: Slash,
            compounds: compounds![('=', SlashEq)],
        },
        '=' => OperatorInfo {
            single: Assign,
            compounds: compounds![('=', EqualEqual)],
        },
        ':' => OperatorInfo {
            single: Colon,
            compounds: compounds![('=', ColonEqual)],
        },
        '!' => OperatorInfo {
            single: Bang,
            compounds: compounds![('=', NotEqual)],
        },
        '>' => OperatorInfo {
            single: Greater,
            compounds: compounds![('=', GreaterEqual)],
        },
        '<' => OperatorInfo {
            single: Less,
            compounds: compounds![('=', LessEqual)],
        },
        '&' => OperatorInfo {
            single: Amp,
            compounds: compounds![('&', AndAnd)],
        },
        '|' => OperatorInfo {
            single: Pipe,
            compounds: compounds![('|', OrOr)],
        },
        '^' => OperatorInfo {
            single: Caret,
            compounds: &[],
        },
        '.' => OperatorInfo {
            single: Dot,
            compounds: &[],
        },
        ',' => OperatorInfo {
            single: Comma,
            compounds: &[],
        },
        '(' => OperatorInfo {
            single: LParen,
            compounds: &[],
        },
        ')' => OperatorInfo {
            single: RParen,
            compounds: &[],
        },
        '[' => OperatorInfo {
            single: LBracket,
            compounds: &[],
        },
        ']' => OperatorInfo {
            single: RBracket,
            compounds: &[],
        },
        '{' => OperatorInfo {
            single: LBrace,
            compounds: &[],
        },
        '}' => OperatorInfo {
            single: RBrace,
            compounds: &[],
        },
        _ => return std::option::Option::None,
    })
}
