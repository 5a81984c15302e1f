//! Recovery of instantiation statements from an architecture's token stream.
//!
//! Every `port map (` or `generic map (` is a candidate. The tokens right
//! before `PORT`/`GENERIC` are matched against a fixed table of header
//! shapes, longest first, and the first match produces one [`Instance`].

use crate::token::{Keyword, Symbol, Token};
use crate::unit::{Instance, InstanceTarget};

/// Longest header shape, in tokens.
const MAX_HEADER_LEN: usize = 9;

#[derive(Debug, Clone, Copy)]
enum Pat {
    Ident,
    Kw(Keyword),
    Delim(char),
}

impl Pat {
    fn matches(&self, token: &Token) -> bool {
        match self {
            Pat::Ident => token.symbol == Symbol::Identifier,
            Pat::Kw(kw) => token.is_keyword(*kw),
            Pat::Delim(c) => token.is_delimiter(*c),
        }
    }
}

struct InstanceRule {
    name: &'static str,
    pattern: &'static [Pat],
    build: fn(&[Token]) -> Instance,
}

use Pat::{Delim, Ident, Kw};

/// Header shapes in priority order. Keep longer patterns first so a short
/// shape never claims the tail of a longer valid header.
const RULES: &[InstanceRule] = &[
    InstanceRule {
        name: "entity-library-architecture",
        pattern: &[
            Ident,
            Delim(':'),
            Kw(Keyword::Entity),
            Ident,
            Delim('.'),
            Ident,
            Delim('('),
            Ident,
            Delim(')'),
        ],
        build: |t| entity(&t[0], Some(&t[3]), &t[5], Some(&t[7])),
    },
    InstanceRule {
        name: "entity-architecture",
        pattern: &[
            Ident,
            Delim(':'),
            Kw(Keyword::Entity),
            Ident,
            Delim('('),
            Ident,
            Delim(')'),
        ],
        build: |t| entity(&t[0], None, &t[3], Some(&t[5])),
    },
    InstanceRule {
        name: "selected-library-package-component",
        pattern: &[
            Ident,
            Delim(':'),
            Ident,
            Delim('.'),
            Ident,
            Delim('.'),
            Ident,
        ],
        build: |t| component(&t[0], Some(&t[2]), &t[6]),
    },
    InstanceRule {
        name: "entity-library",
        pattern: &[
            Ident,
            Delim(':'),
            Kw(Keyword::Entity),
            Ident,
            Delim('.'),
            Ident,
        ],
        build: |t| entity(&t[0], Some(&t[3]), &t[5], None),
    },
    InstanceRule {
        name: "component-library",
        pattern: &[
            Ident,
            Delim(':'),
            Kw(Keyword::Component),
            Ident,
            Delim('.'),
            Ident,
        ],
        build: |t| component(&t[0], Some(&t[3]), &t[5]),
    },
    InstanceRule {
        name: "selected-library-component",
        pattern: &[Ident, Delim(':'), Ident, Delim('.'), Ident],
        build: |t| component(&t[0], Some(&t[2]), &t[4]),
    },
    InstanceRule {
        name: "entity",
        pattern: &[Ident, Delim(':'), Kw(Keyword::Entity), Ident],
        build: |t| entity(&t[0], None, &t[3], None),
    },
    InstanceRule {
        name: "component",
        pattern: &[Ident, Delim(':'), Kw(Keyword::Component), Ident],
        build: |t| component(&t[0], None, &t[3]),
    },
    InstanceRule {
        name: "bare-component",
        pattern: &[Ident, Delim(':'), Ident],
        build: |t| component(&t[0], None, &t[2]),
    },
];

fn entity(label: &Token, library: Option<&Token>, name: &Token, arch: Option<&Token>) -> Instance {
    Instance {
        label: label.name(),
        library: library.map(Token::name),
        target: InstanceTarget::Entity {
            name: name.name(),
            architecture: arch.map(Token::name),
        },
    }
}

fn component(label: &Token, library: Option<&Token>, name: &Token) -> Instance {
    Instance {
        label: label.name(),
        library: library.map(Token::name),
        target: InstanceTarget::Component { name: name.name() },
    }
}

/// Outcome of matching the tokens that precede a `map (`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMatch {
    Instance(Instance),
    NoMatch,
}

/// Match the tokens immediately preceding `PORT`/`GENERIC` against the
/// header table. Only the tail of `header` is considered.
pub fn match_header(header: &[Token]) -> HeaderMatch {
    for rule in RULES {
        let len = rule.pattern.len();
        if header.len() < len {
            continue;
        }
        let tail = &header[header.len() - len..];
        if rule.pattern.iter().zip(tail).all(|(pat, tok)| pat.matches(tok)) {
            tracing::trace!(rule = rule.name, label = %tail[0].text, "instance header");
            return HeaderMatch::Instance((rule.build)(tail));
        }
    }
    HeaderMatch::NoMatch
}

/// Find every instantiation in an architecture's token stream.
pub fn extract_instances(tokens: &[Token]) -> Vec<Instance> {
    let mut instances = Vec::new();
    for (i, window) in tokens.windows(3).enumerate() {
        let opens_map = (window[0].is_keyword(Keyword::Port)
            || window[0].is_keyword(Keyword::Generic))
            && window[1].is_keyword(Keyword::Map)
            && window[2].is_delimiter('(');
        if !opens_map {
            continue;
        }
        let header = &tokens[i.saturating_sub(MAX_HEADER_LEN)..i];
        if let HeaderMatch::Instance(instance) = match_header(header) {
            instances.push(instance);
        }
    }
    instances
}
