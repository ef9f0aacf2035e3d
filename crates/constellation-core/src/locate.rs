//! Locating HEX color declarations and their generated blocks.
//!
//! # Design
//!
//! The stylesheet is never re-serialized. Instead, the `cssparser` tokenizer
//! (the same one Firefox uses) walks the text once and every finding is
//! recorded as a byte span into the original string. The rewriter later splices
//! new text into those spans and copies everything else verbatim.
//!
//! A *color declaration* is `name: value` terminated by `;` or by the end of its
//! block, where the value is exactly one hash token, optionally followed by
//! `!important`:
//!
//! ```css
//! :root {
//!     --bg: #1A1A1A;              /* located */
//!     color: #fff !important;     /* located */
//!     border: 1px solid #ccc;     /* skipped: more than one value token */
//!     --anchor: #main;            /* skipped: not color-shaped */
//! }
//! ```
//!
//! A hash whose text is made only of hex digits is *color-shaped*; if it fails
//! to parse (`#12345`), the whole pass fails rather than silently skipping it.
//!
//! Generated blocks (see [`crate::marker`]) are recognized at statement
//! position. Their content is never located, so derived hex values such as
//! `--bg-hover` are not derived again. A block belongs to the color
//! declaration it immediately follows (only whitespace in between); any other
//! block is orphaned and left alone.

use std::ops::Range;

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};

use crate::color::ColorValue;
use crate::error::{line_col, Result, TransformError};
use crate::marker::{classify_comment, Marker, MarkerComment};

/// A generated block following a color declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBlock {
    /// From the end of the owning declaration to the end of the closing marker.
    pub span: Range<usize>,
    /// The opening marker, or `None` if it could not be read.
    pub marker: Option<Marker>,
}

/// One located HEX color declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDeclaration {
    /// Property or custom-property name as written (`--bg`, `color`).
    pub property: String,
    /// 1-based line of the property name.
    pub line: usize,
    /// Span of the HEX literal, `#` included.
    pub hex_span: Range<usize>,
    /// The parsed literal.
    pub color: ColorValue,
    /// Byte offset just past the declaration (past the `;` when present).
    pub end: usize,
    /// Whether the declaration ends with `;`.
    pub terminated: bool,
    /// Whether the value carries `!important`.
    pub important: bool,
    /// Leading whitespace of the declaration's line.
    pub indent: String,
    /// The generated block owned by this declaration, if any.
    pub block: Option<GeneratedBlock>,
}

impl ColorDeclaration {
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }

    /// The HEX literal exactly as authored.
    pub fn literal<'s>(&self, source: &'s str) -> &'s str {
        &source[self.hex_span.clone()]
    }
}

/// Everything the locator found in one stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    /// Color declarations in source order.
    pub declarations: Vec<ColorDeclaration>,
    /// Generated blocks not attached to any color declaration.
    pub orphaned_blocks: usize,
}

/// Scans a stylesheet for HEX color declarations and generated blocks.
///
/// # Errors
///
/// - [`TransformError::MalformedStylesheet`] for unbalanced or unterminated
///   structure, including a generated block without its closing marker.
/// - [`TransformError::InvalidColorFormat`] for a color-shaped HEX value that
///   does not parse.
pub fn locate(source: &str) -> Result<Located> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);

    let mut scanner = Scanner {
        source,
        located: Located::default(),
    };
    scanner.walk_rules(&mut parser)?;

    log::debug!(
        "located {} color declaration(s), {} orphaned block(s)",
        scanner.located.declarations.len(),
        scanner.located.orphaned_blocks
    );
    Ok(scanner.located)
}

// ─── Scanner ────────────────────────────────────────────────────────────────

struct Scanner<'s> {
    source: &'s str,
    located: Located,
}

/// How the content of a nested block is scanned.
#[derive(Clone, Copy)]
enum Nested {
    /// `{ ... }`: rules and declarations.
    Rules,
    /// `( ... )`, `[ ... ]`, `fn( ... )`: structure checks only.
    Skim,
}

/// Where the walker is inside the current statement.
enum Statement {
    Start,
    AfterName { name: String, name_start: usize },
    Value(PendingDeclaration),
    Other,
}

struct PendingDeclaration {
    property: String,
    name_start: usize,
    hex: Option<Range<usize>>,
    significant: usize,
    bang: bool,
    important: bool,
    value_end: usize,
}

impl PendingDeclaration {
    fn new(property: String, name_start: usize, value_start: usize) -> Self {
        Self {
            property,
            name_start,
            hex: None,
            significant: 0,
            bang: false,
            important: false,
            value_end: value_start,
        }
    }

    fn push(&mut self, token: &Token<'_>, span: Range<usize>) {
        self.value_end = span.end;
        match token {
            Token::Delim('!') if !self.bang => self.bang = true,
            Token::Ident(name) if self.bang && name.eq_ignore_ascii_case("important") => {
                self.bang = false;
                self.important = true;
            }
            Token::Hash(_) | Token::IDHash(_) if self.significant == 0 && !self.bang => {
                self.hex = Some(span);
                self.significant += 1;
            }
            _ => {
                self.bang = false;
                self.significant += 1;
            }
        }
    }

    /// The HEX span when the value is a lone hash token.
    fn lone_hash(&self) -> Option<Range<usize>> {
        if self.significant == 1 && !self.bang {
            self.hex.clone()
        } else {
            None
        }
    }
}

/// A generated block whose closing marker has not been seen yet.
struct OpenBlock {
    start: usize,
    marker: Option<Marker>,
    owner: Option<usize>,
}

impl Scanner<'_> {
    fn walk_rules<'i>(&mut self, input: &mut Parser<'i, '_>) -> Result<()> {
        let mut statement = Statement::Start;
        let mut open: Option<OpenBlock> = None;

        loop {
            let start_pos = input.position();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            let start = start_pos.byte_index();
            let end = input.position().byte_index();

            match token {
                Token::WhiteSpace(_) => {}
                Token::Comment(body) => {
                    self.check_comment(input, start_pos)?;
                    if matches!(statement, Statement::Start) {
                        self.marker_comment(&body, start, end, &mut open)?;
                    }
                }
                Token::CurlyBracketBlock => {
                    // Whatever came before was a rule prelude, not a declaration
                    statement = Statement::Start;
                    self.nested(input, start_pos, Nested::Rules, '}')?;
                }
                Token::Semicolon => {
                    if let Statement::Value(pending) = statement {
                        self.finish(pending, end, true, open.is_some())?;
                    }
                    statement = Statement::Start;
                }
                Token::CloseCurlyBracket => {
                    return Err(TransformError::malformed(self.source, start, "unexpected '}'"));
                }
                other => {
                    let nested_close = self.check_token(input, start_pos, &other)?;
                    statement = match statement {
                        Statement::Start => match &other {
                            Token::Ident(name) => Statement::AfterName {
                                name: name.to_string(),
                                name_start: start,
                            },
                            _ => Statement::Other,
                        },
                        Statement::AfterName { name, name_start } => match &other {
                            Token::Colon => {
                                Statement::Value(PendingDeclaration::new(name, name_start, end))
                            }
                            _ => Statement::Other,
                        },
                        Statement::Value(mut pending) => {
                            pending.push(&other, start..end);
                            Statement::Value(pending)
                        }
                        Statement::Other => Statement::Other,
                    };
                    if let Some(close) = nested_close {
                        self.nested(input, start_pos, Nested::Skim, close)?;
                        if let Statement::Value(pending) = &mut statement {
                            pending.value_end = input.position().byte_index();
                        }
                    }
                }
            }
        }

        if let Statement::Value(pending) = statement {
            let end = pending.value_end;
            self.finish(pending, end, false, open.is_some())?;
        }
        if let Some(block) = open {
            return Err(TransformError::malformed(
                self.source,
                block.start,
                "generated block is missing its closing marker",
            ));
        }
        Ok(())
    }

    fn skim<'i>(&mut self, input: &mut Parser<'i, '_>) -> Result<()> {
        loop {
            let start_pos = input.position();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => return Ok(()),
            };
            match token {
                Token::Comment(_) => self.check_comment(input, start_pos)?,
                Token::CurlyBracketBlock => self.nested(input, start_pos, Nested::Skim, '}')?,
                Token::CloseCurlyBracket => {
                    return Err(TransformError::malformed(
                        self.source,
                        start_pos.byte_index(),
                        "unexpected '}'",
                    ));
                }
                other => {
                    if let Some(close) = self.check_token(input, start_pos, &other)? {
                        self.nested(input, start_pos, Nested::Skim, close)?;
                    }
                }
            }
        }
    }

    /// Walks a nested block and verifies that it was closed.
    fn nested<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        start_pos: SourcePosition,
        kind: Nested,
        close: char,
    ) -> Result<()> {
        let walked = input.parse_nested_block(|nested| {
            let result = match kind {
                Nested::Rules => self.walk_rules(nested),
                Nested::Skim => self.skim(nested),
            };
            // An early error leaves tokens behind; the block must be exhausted
            while nested.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, ParseError<'i, ()>>(result)
        });
        let start = start_pos.byte_index();
        walked.map_err(|_| TransformError::malformed(self.source, start, "unreadable block"))??;

        let consumed = input.slice_from(start_pos);
        if consumed.len() < 2 || !ends_unescaped(consumed, close) {
            return Err(TransformError::malformed(
                self.source,
                start,
                format!("unterminated '{}' block", opener_for(close)),
            ));
        }
        Ok(())
    }

    /// Rejects broken tokens and reports which closer a block token expects.
    fn check_token<'i>(
        &self,
        input: &Parser<'i, '_>,
        start_pos: SourcePosition,
        token: &Token<'i>,
    ) -> Result<Option<char>> {
        let start = start_pos.byte_index();
        match token {
            Token::BadString(_) => Err(TransformError::malformed(
                self.source,
                start,
                "unterminated string",
            )),
            Token::BadUrl(_) => Err(TransformError::malformed(self.source, start, "malformed url()")),
            Token::QuotedString(_) => {
                let text = input.slice_from(start_pos);
                let quote = text.chars().next();
                if text.len() < 2 || !quote.is_some_and(|q| ends_unescaped(text, q)) {
                    return Err(TransformError::malformed(
                        self.source,
                        start,
                        "unterminated string",
                    ));
                }
                Ok(None)
            }
            Token::UnquotedUrl(_) => {
                if !ends_unescaped(input.slice_from(start_pos), ')') {
                    return Err(TransformError::malformed(self.source, start, "unterminated url()"));
                }
                Ok(None)
            }
            Token::Function(_) | Token::ParenthesisBlock => Ok(Some(')')),
            Token::SquareBracketBlock => Ok(Some(']')),
            _ => Ok(None),
        }
    }

    fn check_comment(&self, input: &Parser<'_, '_>, start_pos: SourcePosition) -> Result<()> {
        let text = input.slice_from(start_pos);
        if text.len() < 4 || !text.ends_with("*/") {
            return Err(TransformError::malformed(
                self.source,
                start_pos.byte_index(),
                "unterminated comment",
            ));
        }
        Ok(())
    }

    fn marker_comment(
        &mut self,
        body: &str,
        start: usize,
        end: usize,
        open: &mut Option<OpenBlock>,
    ) -> Result<()> {
        match classify_comment(body) {
            None => {}
            Some(MarkerComment::Open(marker)) => {
                if open.is_some() {
                    return Err(TransformError::malformed(
                        self.source,
                        start,
                        "generated block opened inside another generated block",
                    ));
                }
                *open = Some(OpenBlock {
                    start,
                    marker,
                    owner: self.adjacent_declaration(start),
                });
            }
            Some(MarkerComment::Close) => match open.take() {
                Some(block) => self.close_block(block, end),
                None => {
                    log::warn!(
                        "ignoring closing marker without an opening marker at line {}",
                        line_col(self.source, start).0
                    );
                }
            },
        }
        Ok(())
    }

    /// The last color declaration if only whitespace separates it from `offset`.
    fn adjacent_declaration(&self, offset: usize) -> Option<usize> {
        let index = self.located.declarations.len().checked_sub(1)?;
        let decl = &self.located.declarations[index];
        let gap = self.source.get(decl.end..offset)?;
        (decl.block.is_none() && gap.chars().all(char::is_whitespace)).then_some(index)
    }

    fn close_block(&mut self, block: OpenBlock, end: usize) {
        match block.owner {
            Some(index) => {
                let decl = &mut self.located.declarations[index];
                decl.block = Some(GeneratedBlock {
                    span: decl.end..end,
                    marker: block.marker,
                });
            }
            None => {
                self.located.orphaned_blocks += 1;
                log::warn!(
                    "generated block at line {} does not follow a color declaration; leaving it untouched",
                    line_col(self.source, block.start).0
                );
            }
        }
    }

    fn finish(
        &mut self,
        pending: PendingDeclaration,
        end: usize,
        terminated: bool,
        inside_generated: bool,
    ) -> Result<()> {
        if inside_generated {
            return Ok(());
        }
        let Some(hex_span) = pending.lone_hash() else {
            return Ok(());
        };
        let literal = &self.source[hex_span.clone()];
        if !is_color_shaped(literal) {
            return Ok(());
        }

        let line = line_col(self.source, pending.name_start).0;
        let color = ColorValue::parse_hex(literal).map_err(|e| e.at_line(line))?;

        self.located.declarations.push(ColorDeclaration {
            property: pending.property,
            line,
            hex_span,
            color,
            end,
            terminated,
            important: pending.important,
            indent: line_indent(self.source, pending.name_start).to_string(),
            block: None,
        });
        Ok(())
    }
}

/// `#` followed only by hex digits (any count).
fn is_color_shaped(literal: &str) -> bool {
    literal
        .strip_prefix('#')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[line_start..offset];
    let width = line.len() - line.trim_start().len();
    &line[..width]
}

/// Whether `text` ends with `close` that is not escaped by a backslash.
fn ends_unescaped(text: &str, close: char) -> bool {
    let Some(body) = text.strip_suffix(close) else {
        return false;
    };
    let backslashes = body.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 0
}

fn opener_for(close: char) -> char {
    match close {
        '}' => '{',
        ']' => '[',
        _ => '(',
    }
}
