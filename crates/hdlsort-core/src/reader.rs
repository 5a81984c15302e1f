//! Design-unit extraction.
//!
//! A small state machine walks a file line by line. While no unit is open,
//! `library` and `use` clauses are accumulated and the line is checked for a
//! unit header. Once a unit is open, every line is appended to its token
//! buffer until one of the accepted `end` forms shows up at the tail.

use std::path::Path;

use hdlsort_util::errors::HdlSortResult;

use crate::instance::extract_instances;
use crate::lexer::tokenize_line;
use crate::token::{Keyword, Symbol, Token};
use crate::unit::{resolve_work, LibraryUnit, UnitKind, UseClause};

/// Units found in one file.
#[derive(Debug, Default)]
pub struct FileUnits {
    /// Completed units, in source order.
    pub units: Vec<LibraryUnit>,
    /// A unit still open at end of input. It is not part of `units`.
    pub unterminated: Option<LibraryUnit>,
}

/// A unit whose `end` has not been seen yet.
struct OpenUnit {
    unit: LibraryUnit,
    /// Name accepted after `end`: the architecture name for architectures.
    closing_name: String,
    /// `package p is new ...;` ends at its first semicolon.
    instantiated: bool,
    tokens: Vec<Token>,
}

impl OpenUnit {
    fn closing_keywords(&self) -> &'static [Keyword] {
        match self.unit.kind {
            UnitKind::Entity => &[Keyword::Entity],
            UnitKind::Architecture { .. } => &[Keyword::Architecture],
            UnitKind::Package => &[Keyword::Package],
            UnitKind::PackageBody => &[Keyword::Package, Keyword::Body],
        }
    }

    fn is_closing_name(&self, token: &Token) -> bool {
        token.is_identifier() && token.name() == self.closing_name
    }

    /// Whether the words between `end` and `;` close this unit.
    ///
    /// A bare `end;` only closes units that cannot hold subprogram bodies.
    fn accepts_end(&self, words: &[Token]) -> bool {
        if words.is_empty() {
            return matches!(self.unit.kind, UnitKind::Entity | UnitKind::Package);
        }
        if let [name] = words {
            if self.is_closing_name(name) {
                return true;
            }
        }
        let keywords = self.closing_keywords();
        if words.len() < keywords.len()
            || !keywords.iter().zip(words).all(|(kw, t)| t.is_keyword(*kw))
        {
            return false;
        }
        match &words[keywords.len()..] {
            [] => true,
            [name] => self.is_closing_name(name),
            _ => false,
        }
    }

    /// Inspect the last few tokens for an accepted `end` form.
    fn is_closed(&self) -> bool {
        let n = self.tokens.len();
        if n == 0 || !self.tokens[n - 1].is_delimiter(';') {
            return false;
        }
        if self.instantiated {
            return true;
        }
        // Longest form: END PACKAGE BODY name ;
        let tail = &self.tokens[n.saturating_sub(5)..n - 1];
        (1..=tail.len()).any(|len| {
            let form = &tail[tail.len() - len..];
            form[0].is_keyword(Keyword::End) && self.accepts_end(&form[1..])
        })
    }
}

/// A recognized unit header.
struct Header {
    kind: UnitKind,
    name: String,
    closing_name: String,
    instantiated: bool,
}

/// What the leading tokens of a line (or the remainder of one) hold.
enum Clause {
    Library(Vec<String>, usize),
    Use(Vec<UseClause>, usize),
    Open(Header),
    Unrecognized,
}

/// Line-by-line extractor for one source file.
pub struct UnitExtractor {
    file_name: String,
    library_name: String,
    line_number: usize,
    libraries: Vec<String>,
    uses: Vec<UseClause>,
    open: Option<OpenUnit>,
    units: Vec<LibraryUnit>,
}

impl UnitExtractor {
    pub fn new(file_name: impl Into<String>, library_name: &str) -> Self {
        Self {
            file_name: file_name.into(),
            library_name: library_name.to_ascii_uppercase(),
            line_number: 0,
            libraries: Vec::new(),
            uses: Vec::new(),
            open: None,
            units: Vec::new(),
        }
    }

    /// Feed the next physical line of the file.
    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;
        let tokens = tokenize_line(line, self.line_number);

        if self.open.is_some() {
            self.append(tokens);
            return;
        }

        let mut rest: &[Token] = &tokens;
        while !rest.is_empty() {
            match classify(rest) {
                Clause::Library(names, consumed) => {
                    self.libraries.extend(names);
                    rest = &rest[consumed..];
                }
                Clause::Use(clauses, consumed) => {
                    self.uses.extend(clauses);
                    rest = &rest[consumed..];
                }
                Clause::Open(header) => {
                    self.open_unit(header);
                    self.append(rest.to_vec());
                    break;
                }
                Clause::Unrecognized => break,
            }
        }
    }

    /// Finish the file and hand back what was found.
    pub fn finish(self) -> FileUnits {
        let unterminated = self.open.map(|mut open| {
            open.unit.end_line = self.line_number;
            tracing::debug!(
                file = %self.file_name,
                unit = %open.unit,
                line = open.unit.begin_line,
                "unit not terminated before end of file"
            );
            open.unit
        });
        FileUnits {
            units: self.units,
            unterminated,
        }
    }

    fn open_unit(&mut self, header: Header) {
        match &header.kind {
            UnitKind::Architecture { .. } | UnitKind::PackageBody => {
                self.uses
                    .push(UseClause::new(self.library_name.clone(), Some(header.name.clone())));
            }
            _ => {}
        }
        let unit = LibraryUnit::new(
            header.kind,
            &header.name,
            &self.library_name,
            &self.file_name,
            self.line_number,
            &self.libraries,
            &self.uses,
        );
        self.open = Some(OpenUnit {
            unit,
            closing_name: header.closing_name,
            instantiated: header.instantiated,
            tokens: Vec::new(),
        });
    }

    fn append(&mut self, tokens: Vec<Token>) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        open.tokens.extend(tokens);
        if !open.is_closed() {
            return;
        }
        if let Some(open) = self.open.take() {
            self.close_unit(open);
        }
    }

    fn close_unit(&mut self, open: OpenUnit) {
        let mut unit = open.unit;
        unit.end_line = self.line_number;
        if let UnitKind::Architecture { instances, .. } = &mut unit.kind {
            *instances = extract_instances(&open.tokens);
            for instance in instances.iter_mut() {
                if let Some(lib) = instance.library.as_mut() {
                    *lib = resolve_work(lib, &self.library_name);
                }
            }
        }
        tracing::debug!(
            file = %self.file_name,
            unit = %unit,
            begin = unit.begin_line,
            end = unit.end_line,
            "extracted unit"
        );
        self.units.push(unit);
        self.libraries.clear();
        self.uses.clear();
    }
}

/// Extract every design unit from `text`.
pub fn extract_units(text: &str, file_name: &str, library_name: &str) -> FileUnits {
    let mut extractor = UnitExtractor::new(file_name, library_name);
    for line in text.lines() {
        extractor.feed_line(line);
    }
    extractor.finish()
}

/// Read `path` (decoding permissively) and extract its design units.
pub fn read_file(path: &Path, library_name: &str) -> HdlSortResult<FileUnits> {
    tracing::debug!(path = %path.display(), library = library_name, "analyze file");
    let text = hdlsort_util::fs::read_source(path)?;
    Ok(extract_units(
        &text,
        &path.to_string_lossy(),
        library_name,
    ))
}

fn classify(tokens: &[Token]) -> Clause {
    if let Some((names, consumed)) = library_clause(tokens) {
        return Clause::Library(names, consumed);
    }
    if let Some((clauses, consumed)) = use_clause(tokens) {
        return Clause::Use(clauses, consumed);
    }
    match unit_header(tokens) {
        Some(header) => Clause::Open(header),
        None => Clause::Unrecognized,
    }
}

/// `library a, b;`
fn library_clause(tokens: &[Token]) -> Option<(Vec<String>, usize)> {
    if !tokens.first()?.is_keyword(Keyword::Library) {
        return None;
    }
    let mut names = Vec::new();
    let mut pos = 1;
    loop {
        let name = tokens.get(pos).filter(|t| t.is_identifier())?;
        names.push(name.name());
        let sep = tokens.get(pos + 1)?;
        pos += 2;
        if sep.is_delimiter(';') {
            return Some((names, pos));
        }
        if !sep.is_delimiter(',') {
            return None;
        }
    }
}

/// `use a.b.c;`, `use a.b.all;`, `use a.b;` or `use a.all;`, possibly
/// several separated by commas.
fn use_clause(tokens: &[Token]) -> Option<(Vec<UseClause>, usize)> {
    if !tokens.first()?.is_keyword(Keyword::Use) {
        return None;
    }
    let mut clauses = Vec::new();
    let mut pos = 1;
    loop {
        let (clause, len) = selected_name(&tokens[pos..])?;
        clauses.push(clause);
        let sep = tokens.get(pos + len)?;
        pos += len + 1;
        if sep.is_delimiter(';') {
            return Some((clauses, pos));
        }
        if !sep.is_delimiter(',') {
            return None;
        }
    }
}

fn selected_name(tokens: &[Token]) -> Option<(UseClause, usize)> {
    let is_suffix = |t: &Token| t.is_identifier() || t.is_keyword(Keyword::All);
    match tokens {
        [lib, dot, all, ..] if lib.is_identifier() && dot.is_delimiter('.') && all.is_keyword(Keyword::All) => {
            Some((UseClause::new(lib.name(), None), 3))
        }
        [lib, dot1, unit, dot2, item, ..]
            if lib.is_identifier()
                && dot1.is_delimiter('.')
                && unit.is_identifier()
                && dot2.is_delimiter('.')
                && is_suffix(item) =>
        {
            Some((UseClause::new(lib.name(), Some(unit.name())), 5))
        }
        [lib, dot, unit, ..] if lib.is_identifier() && dot.is_delimiter('.') && unit.is_identifier() => {
            Some((UseClause::new(lib.name(), Some(unit.name())), 3))
        }
        _ => None,
    }
}

fn unit_header(tokens: &[Token]) -> Option<Header> {
    let is = |t: &Token, kw: Keyword| t.is_keyword(kw);
    let ident = |t: &Token| t.symbol == Symbol::Identifier;
    match tokens {
        [e, name, i, ..] if is(e, Keyword::Entity) && ident(name) && is(i, Keyword::Is) => {
            Some(Header {
                kind: UnitKind::Entity,
                name: name.name(),
                closing_name: name.name(),
                instantiated: false,
            })
        }
        [a, arch, o, entity, i, ..]
            if is(a, Keyword::Architecture)
                && ident(arch)
                && is(o, Keyword::Of)
                && ident(entity)
                && is(i, Keyword::Is) =>
        {
            Some(Header {
                kind: UnitKind::Architecture {
                    arch_name: arch.name(),
                    instances: Vec::new(),
                },
                name: entity.name(),
                closing_name: arch.name(),
                instantiated: false,
            })
        }
        [p, name, i, rest @ ..] if is(p, Keyword::Package) && ident(name) && is(i, Keyword::Is) => {
            Some(Header {
                kind: UnitKind::Package,
                name: name.name(),
                closing_name: name.name(),
                instantiated: rest.first().is_some_and(|t| t.is_keyword(Keyword::New)),
            })
        }
        [p, b, name, i, ..]
            if is(p, Keyword::Package) && is(b, Keyword::Body) && ident(name) && is(i, Keyword::Is) =>
        {
            Some(Header {
                kind: UnitKind::PackageBody,
                name: name.name(),
                closing_name: name.name(),
                instantiated: false,
            })
        }
        _ => None,
    }
}
