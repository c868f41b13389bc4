//!
//! # Directive Reading Module
//!
//! Facilities for reading pin-placement directives from file or string.
//! Includes the core Lexer and Parser.
//!

// Standard Lib Imports
use std::io::Read;
use std::path::Path;
use std::str::{Chars, FromStr};

// Crates.io Imports
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Local imports
use super::data::*;

/// Parse directive content from file `fname`
pub fn parse_file(fname: impl AsRef<Path>) -> PinResult<PinConfig> {
    let mut file = std::fs::File::open(fname)?;
    let mut src = String::new();
    file.read_to_string(&mut src)?;
    parse_str(&src)
}
/// Parse directive content `src` from string.
/// Deprecation warnings are logged, and otherwise discarded.
pub fn parse_str(src: &str) -> PinResult<PinConfig> {
    let parsed = PinParser::new(src).parse()?;
    Ok(parsed.config)
}

/// # Directive Lexer
///
/// Breaks input string into an iteration of [Token]s.
///
/// At each position the lexer tries, in order, an annotation, a direction, and a virtual pin,
/// each taking the longest match available, and falls back to a bare name running up to the
/// next whitespace. Sigils may be separated from their content by whitespace, e.g. `# N`,
/// `$ 3`, and `@min_distance = 2`. Adjacent tokens need no separation: `#N@bit_major` is
/// a direction followed by an annotation.
///
pub struct PinLexer<'src> {
    /// Source string
    src: &'src str,
    /// Source-string character iterator
    chars: Chars<'src>,
    /// Peekable next character
    next_char: Option<char>,
    /// Peekable next Token
    next_tok: Option<Token>,
    /// Start (byte) index of the active lexeme
    start: usize,
    /// Line number at the start of the active lexeme
    start_line: usize,
    /// Active (byte) index
    pos: usize,
    /// Active line number
    line: usize,
}
/// Saved [PinLexer] position, for abandoning a partial match
#[derive(Clone)]
struct Checkpoint<'src> {
    chars: Chars<'src>,
    next_char: Option<char>,
    pos: usize,
    line: usize,
}
impl<'src> PinLexer<'src> {
    pub(crate) fn new(src: &'src str) -> Self {
        let mut chars = src.chars();
        let next_char = chars.next();
        let mut lex = Self {
            src,
            chars,
            next_char,
            next_tok: None,
            start: 0,
            start_line: 1,
            pos: 0,
            line: 1,
        };
        // Read the first token into our `next_tok` field
        lex.next_tok = lex.lex_one();
        lex
    }
    /// Get and return our next character, updating our position along the way
    fn next_char(&mut self) -> Option<char> {
        let c = self.next_char?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        self.next_char = self.chars.next();
        Some(c)
    }
    fn peek_char(&self) -> &Option<char> {
        &self.next_char
    }
    /// Get an immutable reference to our next [Token], without advancing
    #[inline(always)]
    fn peek_token(&self) -> &Option<Token> {
        &self.next_tok
    }
    /// Get and return our next token, updating internal state along the way
    fn next_token(&mut self) -> Option<Token> {
        self.next_tok?;
        let mut tok = self.lex_one();
        std::mem::swap(&mut tok, &mut self.next_tok);
        tok
    }
    fn checkpoint(&self) -> Checkpoint<'src> {
        Checkpoint {
            chars: self.chars.clone(),
            next_char: self.next_char,
            pos: self.pos,
            line: self.line,
        }
    }
    fn restore(&mut self, cp: Checkpoint<'src>) {
        self.chars = cp.chars;
        self.next_char = cp.next_char;
        self.pos = cp.pos;
        self.line = cp.line;
    }
    /// Accept a character if it meets predicate-function `f`
    fn accept(&mut self, f: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(ch) if f(*ch) => {
                self.next_char();
                true
            }
            _ => false,
        }
    }
    /// Accept a single-character match
    fn accept_char(&mut self, c: char) -> bool {
        self.accept(|a| a == c)
    }
    /// Accept a run of characters meeting `f`. Returns `None` if the run is empty.
    fn accept_run(&mut self, f: impl Fn(char) -> bool) -> Option<Span> {
        let start = self.pos;
        while self.accept(&f) {
            continue;
        }
        match self.pos > start {
            true => Some(Span { start, stop: self.pos }),
            false => None,
        }
    }
    fn skip_whitespace(&mut self) {
        while self.accept(char::is_whitespace) {
            continue;
        }
    }
    /// Emit a [Token] of [TokenType] `ttype` over the active lexeme
    fn emit(&mut self, ttype: TokenType) -> Token {
        let loc = SourceLocation {
            start: self.start,
            stop: self.pos,
            line: self.start_line,
        };
        self.start = self.pos;
        Token { loc, ttype }
    }
    /// Lex the next [Token], skipping any leading whitespace.
    fn lex_one(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let sigil = (*self.peek_char())?;
        self.start = self.pos;
        self.start_line = self.line;
        let cp = self.checkpoint();
        let ttype = match sigil {
            '@' => self.lex_annotation(),
            '#' => self.lex_direction(),
            '$' => self.lex_virtual_pin(),
            _ => None,
        };
        let ttype = match ttype {
            Some(t) => t,
            None => {
                // No sigil-rule matched. Back up and take a bare name.
                self.restore(cp);
                self.lex_name()
            }
        };
        Some(self.emit(ttype))
    }
    /// Lex `@ name [= value]`
    fn lex_annotation(&mut self) -> Option<TokenType> {
        self.next_char(); // The '@'
        self.skip_whitespace();
        let name = self.accept_run(is_word_char)?;
        // The value is optional. If it does not fully match, leave it for the next token.
        let cp = self.checkpoint();
        self.skip_whitespace();
        let value = match self.accept_char('=') {
            true => {
                self.skip_whitespace();
                self.lex_number()
            }
            false => None,
        };
        if value.is_none() {
            self.restore(cp);
        }
        Some(TokenType::Annotation { name, value })
    }
    /// Lex a non-negative number: digits, optionally followed by a fractional part
    fn lex_number(&mut self) -> Option<Span> {
        let int = self.accept_run(|c| c.is_ascii_digit())?;
        let cp = self.checkpoint();
        if !(self.accept_char('.') && self.accept_run(|c| c.is_ascii_digit()).is_some()) {
            self.restore(cp);
        }
        Some(Span {
            start: int.start,
            stop: self.pos,
        })
    }
    /// Lex `# dir`, where `dir` is `BUS_SORT` or one of `[NEWS]R?`
    fn lex_direction(&mut self) -> Option<TokenType> {
        const BUS_SORT: &str = "BUS_SORT";
        self.next_char(); // The '#'
        self.skip_whitespace();
        if self.src[self.pos..].starts_with(BUS_SORT) {
            for _ in 0..BUS_SORT.len() {
                self.next_char();
            }
            return Some(TokenType::Direction(DirToken::BusSort));
        }
        let dir = match *self.peek_char() {
            Some('N') => Dir::N,
            Some('E') => Dir::E,
            Some('W') => Dir::W,
            Some('S') => Dir::S,
            _ => return None,
        };
        self.next_char();
        let reverse = self.accept_char('R');
        Some(TokenType::Direction(dir.token(reverse)))
    }
    /// Lex `$ count`
    fn lex_virtual_pin(&mut self) -> Option<TokenType> {
        self.next_char(); // The '$'
        self.skip_whitespace();
        let count = self.accept_run(|c| c.is_ascii_digit())?;
        Some(TokenType::VirtualPin { count })
    }
    /// Lex a bare name, up to the next whitespace
    fn lex_name(&mut self) -> TokenType {
        self.accept_run(|c| !c.is_whitespace());
        TokenType::Name
    }
}
/// Iterator protocol for [PinLexer]
/// Not used during parsing, but handy for testing.
impl<'s> Iterator for PinLexer<'s> {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
/// Annotation-name characters
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
/// Byte range of a token component in the source string
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    start: usize,
    stop: usize,
}
impl Span {
    pub(crate) fn substr<'src>(&self, src: &'src str) -> &'src str {
        &src[self.start..self.stop]
    }
}
/// Location of a [Token] in the source string
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Start byte index (inclusive)
    start: usize,
    /// End byte index (exclusive)
    stop: usize,
    /// Line number
    line: usize,
}
/// Lexer Token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Source Location
    loc: SourceLocation,
    /// Token Type
    ttype: TokenType,
}
impl Token {
    /// Return a sub-string of input-string `src` over our locations
    pub(crate) fn substr<'src>(&self, src: &'src str) -> &'src str {
        &src[self.loc.start..self.loc.stop]
    }
}
/// Token Types Enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    /// `@name` or `@name=value`
    Annotation { name: Span, value: Option<Span> },
    /// `#N`, `#SR`, `#BUS_SORT`, etc.
    Direction(DirToken),
    /// `$<count>`
    VirtualPin { count: Span },
    /// Everything else: pin names and patterns
    Name,
}
/// Parser Error Types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinParseErrorType {
    /// Value-required annotation without a value
    MissingValue,
    /// Value supplied to a standalone annotation
    UnexpectedValue,
    /// Annotation name not recognized
    UnknownAnnotation,
    /// Malformed or out-of-range value
    InvalidValue,
    /// Pin or virtual pin before any direction
    NoCurrentSide,
}
/// Parse Session
/// Defaults held over the course of a parser run, applied to newly created [Side]s.
#[derive(Debug, Default)]
struct PinParseSession {
    sort_mode: SortMode,
    min_distance: Option<PinDecimal>,
}
/// # Directive Parser
///
/// Transforms input string of lifetime 'src into a [PinConfig],
/// interpreting each [Token] as it arrives from the [PinLexer].
pub struct PinParser<'src> {
    /// Source string
    src: &'src str,
    /// Lexer
    lex: PinLexer<'src>,
    /// Session defaults
    session: PinParseSession,
    /// Sides created thus far, indexed by [Dir::index]
    sides: [Option<Side>; 4],
    /// Most recently selected side
    current: Option<Dir>,
    /// Diagnostics
    warnings: Vec<Deprecation>,
}
impl<'src> PinParser<'src> {
    /// Construct a [PinParser] of input-text `src`
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            lex: PinLexer::new(src),
            session: PinParseSession::default(),
            sides: Default::default(),
            current: None,
            warnings: Vec::new(),
        }
    }
    /// Parse the full input, producing a [Parsed] result
    pub fn parse(mut self) -> PinResult<Parsed> {
        while let Some(tok) = self.lex.peek_token() {
            let tok = *tok;
            match tok.ttype {
                TokenType::Annotation { name, value } => self.parse_annotation(name, value)?,
                TokenType::Direction(d) => self.parse_direction(&tok, d),
                TokenType::VirtualPin { count } => self.parse_virtual_pin(count)?,
                TokenType::Name => self.parse_name(&tok)?,
            }
            self.lex.next_token();
        }
        Ok(self.finish())
    }
    /// Get a mutable reference to the currently selected [Side], if there is one
    fn current_side(&mut self) -> Option<&mut Side> {
        let dir = self.current?;
        self.sides[dir.index()].as_mut()
    }
    /// Parse an `@name[=value]` annotation
    fn parse_annotation(&mut self, name: Span, value: Option<Span>) -> PinResult<()> {
        let name = name.substr(self.src);
        let value = value.map(|v| v.substr(self.src));
        let annotation = match Annotation::from_str(name) {
            Some(a) => a,
            None => {
                let msg = format!("unknown annotation `{}`", name);
                return self.fail_msg(PinParseErrorType::UnknownAnnotation, msg);
            }
        };
        let value = match (annotation.takes_value(), value) {
            (true, None) => {
                let msg = format!("annotation `{}` requires a value", name);
                return self.fail_msg(PinParseErrorType::MissingValue, msg);
            }
            (false, Some(_)) => {
                let msg = format!("annotation `{}` does not take a value", name);
                return self.fail_msg(PinParseErrorType::UnexpectedValue, msg);
            }
            (_, value) => value.unwrap_or_default(),
        };
        match annotation {
            Annotation::MinDistance => {
                let dist = self.parse_distance(value)?;
                match self.current_side() {
                    Some(side) => side.min_distance = Some(dist),
                    None => self.session.min_distance = Some(dist),
                }
            }
            Annotation::BusMajor => self.set_sort_mode(SortMode::BusMajor),
            Annotation::BitMajor => self.set_sort_mode(SortMode::BitMajor),
        }
        Ok(())
    }
    /// Parse a spacing value. The lexer only admits unsigned decimals,
    /// leaving precision overflow as the sole failure.
    fn parse_distance(&self, txt: &str) -> PinResult<PinDecimal> {
        match PinDecimal::from_str(txt) {
            Ok(d) => Ok(d),
            Err(e) => self.fail_msg(
                PinParseErrorType::InvalidValue,
                format!("invalid min_distance `{}`: {}", txt, e),
            ),
        }
    }
    /// Set the sort mode of the current side, or the session default if none is selected
    fn set_sort_mode(&mut self, mode: SortMode) {
        match self.current_side() {
            Some(side) => side.sort_mode = mode,
            None => self.session.sort_mode = mode,
        }
    }
    /// Parse a `#` direction token, selecting and potentially creating a [Side]
    fn parse_direction(&mut self, tok: &Token, dirtok: DirToken) {
        let (dir, reverse) = match dirtok.side() {
            Some(s) => s,
            None => {
                // Legacy spelling of a global `@bit_major`
                let deprecation = Deprecation {
                    token: tok.substr(self.src).to_string(),
                    line: tok.loc.line,
                    replacement: "@bit_major",
                };
                warn!("{}", deprecation);
                self.warnings.push(deprecation);
                self.session.sort_mode = SortMode::BitMajor;
                return;
            }
        };
        let session = &self.session;
        self.sides[dir.index()].get_or_insert_with(|| {
            debug!("Creating side {} (reversed: {})", dir, reverse);
            let mut side = Side::new(session.sort_mode, session.min_distance);
            side.reverse_result = reverse;
            side
        });
        self.current = Some(dir);
    }
    /// Parse a `$<count>` virtual pin
    fn parse_virtual_pin(&mut self, count: Span) -> PinResult<()> {
        let txt = count.substr(self.src);
        let count = match txt.parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                let msg = format!("virtual pin count must be a positive integer, got `{}`", txt);
                return self.fail_msg(PinParseErrorType::InvalidValue, msg);
            }
        };
        match self.current_side() {
            Some(side) => side.pins.push(PinEntry::Virtual(count)),
            None => self.fail_msg(
                PinParseErrorType::NoCurrentSide,
                "virtual pin declared before any direction",
            )?,
        }
        Ok(())
    }
    /// Parse a bare pin name or pattern
    fn parse_name(&mut self, tok: &Token) -> PinResult<()> {
        let txt = tok.substr(self.src);
        match self.current_side() {
            Some(side) => side.pins.push(PinEntry::Name(txt.to_string())),
            None => self.fail_msg(
                PinParseErrorType::NoCurrentSide,
                "pin identifier declared before any direction",
            )?,
        }
        Ok(())
    }
    /// Complete parsing, filling in any never-selected sides from the final session defaults
    fn finish(self) -> Parsed {
        let Self {
            mut sides,
            session,
            warnings,
            ..
        } = self;
        let mut config = PinConfig::default();
        for dir in Dir::ALL {
            config[*dir] = sides[dir.index()]
                .take()
                .unwrap_or_else(|| Side::new(session.sort_mode, session.min_distance));
        }
        Parsed { config, warnings }
    }
    /// Error-Generation Helper
    fn fail_msg<T>(&self, tp: PinParseErrorType, msg: impl Into<String>) -> PinResult<T> {
        Err(PinError::Parse {
            tp,
            msg: Some(msg.into()),
            state: self.state(),
        })
    }
    /// Extract the state of the parser. Generally for error reporting.
    fn state(&self) -> ParserState {
        const MAX_EXCERPT_CHARS: usize = 40;
        let (token, start, line_num) = match self.lex.next_tok {
            Some(t) => (t.substr(self.src).to_string(), t.loc.start, t.loc.line),
            None => ("EOF".to_string(), self.src.len(), self.lex.line),
        };
        let excerpt = self.src[start..]
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(MAX_EXCERPT_CHARS)
            .collect();
        ParserState {
            token,
            excerpt,
            line_num,
            pos: start,
        }
    }
}
/// State of the parser, generally exposed when providing error info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserState {
    /// Offending token
    pub token: String,
    /// Unconsumed input on the offending line, starting at `token`
    pub excerpt: String,
    /// Line number
    pub line_num: usize,
    /// Byte offset of `token`
    pub pos: usize,
}
