//! Line-oriented lexer.
//!
//! Each call turns one physical line into tokens. Nothing is carried from one
//! line to the next, so a token never spans a line break.

use crate::token::{Keyword, Symbol, Token};

/// Compound delimiters, tried in order before single punctuation.
/// Longer spellings sharing a prefix come first.
const OPERATORS: &[(&str, Symbol)] = &[
    ("?/=", Symbol::MatchNotEqual),
    ("?<=", Symbol::MatchLessEqual),
    ("?>=", Symbol::MatchGreaterEqual),
    ("??", Symbol::Condition),
    ("?=", Symbol::MatchEqual),
    ("?<", Symbol::MatchLess),
    ("?>", Symbol::MatchGreater),
    ("=>", Symbol::Arrow),
    ("<=", Symbol::LessEqual),
    (">=", Symbol::GreaterEqual),
    (":=", Symbol::VarAssign),
    ("<<", Symbol::DoubleLess),
    (">>", Symbol::DoubleGreater),
    ("<>", Symbol::Box),
    ("/=", Symbol::NotEqual),
    ("**", Symbol::Power),
];

/// Tokenize a single line of source text.
///
/// A trailing `--` comment and the line terminator are removed first.
pub fn tokenize_line(line: &str, line_number: usize) -> Vec<Token> {
    let code = strip_comment(line);
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = code[pos..].chars().next() {
        let rest = &code[pos..];

        if c.is_whitespace() || c.is_control() {
            pos += c.len_utf8();
            continue;
        }

        if c.is_alphabetic() {
            let len = word_len(rest);
            let text = &rest[..len];
            let upper = text.to_uppercase();
            let token = match Keyword::from_upper(&upper) {
                Some(kw) => Token::new(Symbol::Keyword(kw), upper, line_number),
                None => Token::new(Symbol::Identifier, text, line_number),
            };
            tokens.push(token);
            pos += len;
            continue;
        }

        if c.is_ascii_digit() {
            let len = number_len(rest);
            tokens.push(Token::new(Symbol::Number, &rest[..len], line_number));
            pos += len;
            continue;
        }

        if let Some((op, symbol)) = OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
            tokens.push(Token::new(*symbol, *op, line_number));
            pos += op.len();
            continue;
        }

        if c.is_ascii_punctuation() {
            tokens.push(Token::new(Symbol::Delimiter(c), c.to_string(), line_number));
        }
        pos += c.len_utf8();
    }

    tokens
}

fn strip_comment(line: &str) -> &str {
    let code = match line.find("--") {
        Some(idx) => &line[..idx],
        None => line,
    };
    code.trim_end_matches(['\n', '\r'])
}

fn word_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(s.len(), |(idx, _)| idx)
}

fn digits_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '_'))
        .map_or(s.len(), |(idx, _)| idx)
}

/// Length of the numeric literal at the start of `s`: decimal digits, an
/// optional fraction or `base#digits#` part, and an optional exponent.
fn number_len(s: &str) -> usize {
    let mut len = digits_len(s);

    let rest = &s[len..];
    if let Some(based) = rest.strip_prefix('#') {
        let body = based
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
            .map_or(based.len(), |(idx, _)| idx);
        if based[body..].starts_with('#') {
            len += body + 2;
        }
    } else if let Some(fraction) = rest.strip_prefix('.') {
        let digits = digits_len(fraction);
        if digits > 0 {
            len += 1 + digits;
        }
    }

    let rest = &s[len..];
    if let Some(exp) = rest.strip_prefix(['e', 'E']) {
        let sign = usize::from(exp.starts_with(['+', '-']));
        let digits = digits_len(&exp[sign..]);
        if digits > 0 {
            len += 1 + sign + digits;
        }
    }

    len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(line: &str) -> Vec<Symbol> {
        tokenize_line(line, 1).into_iter().map(|t| t.symbol).collect()
    }

    fn texts(line: &str) -> Vec<String> {
        tokenize_line(line, 1).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn comment_only_line_is_empty() {
        assert!(tokenize_line("-- nothing to see here", 1).is_empty());
        assert!(tokenize_line("   --", 1).is_empty());
        assert!(tokenize_line("\r\n", 1).is_empty());
    }

    #[test]
    fn trailing_comment_is_stripped() {
        assert_eq!(texts("end foo; -- end of foo"), vec!["END", "foo", ";"]);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        for spelling in ["ENTITY", "Entity", "entity", "eNtItY"] {
            let tokens = tokenize_line(spelling, 7);
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].symbol, Symbol::Keyword(Keyword::Entity));
            assert_eq!(tokens[0].text, "ENTITY");
            assert_eq!(tokens[0].line_number, 7);
        }
    }

    #[test]
    fn identifiers_keep_their_spelling() {
        let tokens = tokenize_line("my_Adder_2", 1);
        assert_eq!(tokens[0].symbol, Symbol::Identifier);
        assert_eq!(tokens[0].text, "my_Adder_2");
        assert_eq!(tokens[0].name(), "MY_ADDER_2");
    }

    #[test]
    fn entity_header() {
        assert_eq!(
            symbols("entity foo is"),
            vec![
                Symbol::Keyword(Keyword::Entity),
                Symbol::Identifier,
                Symbol::Keyword(Keyword::Is),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(texts("16#FF_00# 2#1010.1#E3"), vec!["16#FF_00#", "2#1010.1#E3"]);
        assert_eq!(texts("1.5e-3 1_000 42E2"), vec!["1.5e-3", "1_000", "42E2"]);
        assert_eq!(
            symbols("7 downto 0"),
            vec![
                Symbol::Number,
                Symbol::Keyword(Keyword::Downto),
                Symbol::Number
            ]
        );
    }

    #[test]
    fn number_without_exponent_digits_stops_early() {
        assert_eq!(texts("3e"), vec!["3", "e"]);
    }

    #[test]
    fn compound_delimiters() {
        assert_eq!(
            symbols("a => b <= c := d /= e ** f <> g"),
            vec![
                Symbol::Identifier,
                Symbol::Arrow,
                Symbol::Identifier,
                Symbol::LessEqual,
                Symbol::Identifier,
                Symbol::VarAssign,
                Symbol::Identifier,
                Symbol::NotEqual,
                Symbol::Identifier,
                Symbol::Power,
                Symbol::Identifier,
                Symbol::Box,
                Symbol::Identifier,
            ]
        );
    }

    #[test]
    fn matching_operators_prefer_longest() {
        assert_eq!(
            symbols("?/= ?<= ?< ?? ?= << >>"),
            vec![
                Symbol::MatchNotEqual,
                Symbol::MatchLessEqual,
                Symbol::MatchLess,
                Symbol::Condition,
                Symbol::MatchEqual,
                Symbol::DoubleLess,
                Symbol::DoubleGreater,
            ]
        );
    }

    #[test]
    fn punctuation_is_one_token_each() {
        assert_eq!(
            symbols("(a.b);"),
            vec![
                Symbol::Delimiter('('),
                Symbol::Identifier,
                Symbol::Delimiter('.'),
                Symbol::Identifier,
                Symbol::Delimiter(')'),
                Symbol::Delimiter(';'),
            ]
        );
    }

    #[test]
    fn unrecognized_characters_are_dropped() {
        assert_eq!(texts("a \u{FFFD} b"), vec!["a", "b"]);
    }
}
