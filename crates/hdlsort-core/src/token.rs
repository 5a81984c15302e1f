//! Token vocabulary produced by the line lexer.

use std::fmt;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// A reserved word of the hardware description language.
        ///
        /// Matching is case-insensitive; [`Keyword::from_upper`] expects the
        /// upper-cased spelling.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Look up an upper-cased word in the reserved-word vocabulary.
            pub fn from_upper(word: &str) -> Option<Self> {
                match word {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// The upper-cased spelling of this keyword.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    Abs => "ABS",
    Access => "ACCESS",
    After => "AFTER",
    Alias => "ALIAS",
    All => "ALL",
    And => "AND",
    Architecture => "ARCHITECTURE",
    Array => "ARRAY",
    Assert => "ASSERT",
    Assume => "ASSUME",
    AssumeGuarantee => "ASSUME_GUARANTEE",
    Attribute => "ATTRIBUTE",
    Begin => "BEGIN",
    Block => "BLOCK",
    Body => "BODY",
    Buffer => "BUFFER",
    Bus => "BUS",
    Case => "CASE",
    Component => "COMPONENT",
    Configuration => "CONFIGURATION",
    Constant => "CONSTANT",
    Context => "CONTEXT",
    Cover => "COVER",
    Default => "DEFAULT",
    Disconnect => "DISCONNECT",
    Downto => "DOWNTO",
    Else => "ELSE",
    Elsif => "ELSIF",
    End => "END",
    Entity => "ENTITY",
    Exit => "EXIT",
    Fairness => "FAIRNESS",
    File => "FILE",
    For => "FOR",
    Force => "FORCE",
    Function => "FUNCTION",
    Generate => "GENERATE",
    Generic => "GENERIC",
    Group => "GROUP",
    Guarded => "GUARDED",
    If => "IF",
    Impure => "IMPURE",
    In => "IN",
    Inertial => "INERTIAL",
    Inout => "INOUT",
    Is => "IS",
    Label => "LABEL",
    Library => "LIBRARY",
    Linkage => "LINKAGE",
    Literal => "LITERAL",
    Loop => "LOOP",
    Map => "MAP",
    Mod => "MOD",
    Nand => "NAND",
    New => "NEW",
    Next => "NEXT",
    Nor => "NOR",
    Not => "NOT",
    Null => "NULL",
    Of => "OF",
    On => "ON",
    Open => "OPEN",
    Or => "OR",
    Others => "OTHERS",
    Out => "OUT",
    Package => "PACKAGE",
    Parameter => "PARAMETER",
    Port => "PORT",
    Postponed => "POSTPONED",
    Procedure => "PROCEDURE",
    Process => "PROCESS",
    Property => "PROPERTY",
    Protected => "PROTECTED",
    Pure => "PURE",
    Range => "RANGE",
    Record => "RECORD",
    Register => "REGISTER",
    Reject => "REJECT",
    Release => "RELEASE",
    Rem => "REM",
    Report => "REPORT",
    Restrict => "RESTRICT",
    RestrictGuarantee => "RESTRICT_GUARANTEE",
    Return => "RETURN",
    Rol => "ROL",
    Ror => "ROR",
    Select => "SELECT",
    Sequence => "SEQUENCE",
    Severity => "SEVERITY",
    Shared => "SHARED",
    Signal => "SIGNAL",
    Sla => "SLA",
    Sll => "SLL",
    Sra => "SRA",
    Srl => "SRL",
    Strong => "STRONG",
    Subtype => "SUBTYPE",
    Then => "THEN",
    To => "TO",
    Transport => "TRANSPORT",
    Type => "TYPE",
    Unaffected => "UNAFFECTED",
    Units => "UNITS",
    Until => "UNTIL",
    Use => "USE",
    Variable => "VARIABLE",
    Vmode => "VMODE",
    Vprop => "VPROP",
    Vunit => "VUNIT",
    Wait => "WAIT",
    When => "WHEN",
    While => "WHILE",
    With => "WITH",
    Xnor => "XNOR",
    Xor => "XOR",
}

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Keyword(Keyword),
    Identifier,
    Number,
    /// `=>`
    Arrow,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `:=`
    VarAssign,
    /// `<<`
    DoubleLess,
    /// `>>`
    DoubleGreater,
    /// `<>`
    Box,
    /// `/=`
    NotEqual,
    /// `**`
    Power,
    /// `??`
    Condition,
    /// `?=`
    MatchEqual,
    /// `?/=`
    MatchNotEqual,
    /// `?<`
    MatchLess,
    /// `?<=`
    MatchLessEqual,
    /// `?>`
    MatchGreater,
    /// `?>=`
    MatchGreaterEqual,
    /// Any other single punctuation character.
    Delimiter(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Keyword(kw) => f.write_str(kw.as_str()),
            Symbol::Identifier => f.write_str("IDENTIFIER"),
            Symbol::Number => f.write_str("NUMBER"),
            Symbol::Arrow => f.write_str("=>"),
            Symbol::LessEqual => f.write_str("<="),
            Symbol::GreaterEqual => f.write_str(">="),
            Symbol::VarAssign => f.write_str(":="),
            Symbol::DoubleLess => f.write_str("<<"),
            Symbol::DoubleGreater => f.write_str(">>"),
            Symbol::Box => f.write_str("<>"),
            Symbol::NotEqual => f.write_str("/="),
            Symbol::Power => f.write_str("**"),
            Symbol::Condition => f.write_str("??"),
            Symbol::MatchEqual => f.write_str("?="),
            Symbol::MatchNotEqual => f.write_str("?/="),
            Symbol::MatchLess => f.write_str("?<"),
            Symbol::MatchLessEqual => f.write_str("?<="),
            Symbol::MatchGreater => f.write_str("?>"),
            Symbol::MatchGreaterEqual => f.write_str("?>="),
            Symbol::Delimiter(c) => write!(f, "{c}"),
        }
    }
}

/// A single lexeme with the line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol: Symbol,
    /// Source text. Keywords carry their upper-cased spelling.
    pub text: String,
    pub line_number: usize,
}

impl Token {
    pub fn new(symbol: Symbol, text: impl Into<String>, line_number: usize) -> Self {
        Self {
            symbol,
            text: text.into(),
            line_number,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.symbol == Symbol::Keyword(keyword)
    }

    pub fn is_identifier(&self) -> bool {
        self.symbol == Symbol::Identifier
    }

    pub fn is_delimiter(&self, c: char) -> bool {
        self.symbol == Symbol::Delimiter(c)
    }

    /// Upper-cased text, the canonical form of a name.
    pub fn name(&self) -> String {
        self.text.to_ascii_uppercase()
    }
}
