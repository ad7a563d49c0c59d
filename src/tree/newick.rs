//! Newick reader.
//!
//! Handles the common dialect: nested parentheses, plain or single-quoted
//! labels, `[...]` comments, and `:length` annotations. Branch lengths are
//! validated but not kept, since only the topology and the leaf labels feed
//! the distribution computation.

use std::num::ParseFloatError;

use thiserror::Error;

use super::{NodeId, Tree};

/// Errors raised while parsing Newick input.
#[derive(Debug, Error)]
pub enum NewickError {
    #[error("empty Newick input")]
    Empty,
    #[error("'(' without a matching ')'")]
    UnclosedBracket,
    #[error("')' without a matching '(' at byte {at}")]
    UnexpectedClose { at: usize },
    #[error("unexpected {found:?} at byte {at}")]
    Unexpected { found: char, at: usize },
    #[error("unterminated quoted label starting at byte {at}")]
    UnterminatedQuote { at: usize },
    #[error("unterminated [comment] starting at byte {at}")]
    UnterminatedComment { at: usize },
    #[error("missing ';' at the end of the tree")]
    MissingSemicolon,
    #[error("trailing input after ';' at byte {at}")]
    TrailingInput { at: usize },
    #[error("invalid branch length")]
    InvalidLength(#[from] ParseFloatError),
    #[error("could not read tree file")]
    Io(#[from] std::io::Error),
}

/// Parse a single Newick tree, consuming the whole input.
pub(super) fn parse(input: &str) -> Result<Tree, NewickError> {
    let mut scanner = Scanner::new(input);
    let mut tree = Tree::new();
    // Open internal nodes, innermost last. `current` is the node any label
    // or branch length applies to; `None` means the next token starts one.
    let mut parents: Vec<NodeId> = Vec::new();
    let mut current: Option<NodeId> = None;
    let mut finished = false;

    loop {
        scanner.skip_filler()?;
        let Some(byte) = scanner.peek() else { break };
        match byte {
            b'(' => {
                if current.is_some() || (parents.is_empty() && tree.node_count() > 0) {
                    return Err(NewickError::Unexpected {
                        found: '(',
                        at: scanner.pos,
                    });
                }
                scanner.bump();
                let id = tree.add_node(parents.last().copied());
                parents.push(id);
            }
            b',' => {
                if parents.is_empty() {
                    return Err(NewickError::Unexpected {
                        found: ',',
                        at: scanner.pos,
                    });
                }
                scanner.bump();
                ensure_current(&mut tree, &parents, &mut current);
                current = None;
            }
            b')' => {
                if parents.is_empty() {
                    return Err(NewickError::UnexpectedClose { at: scanner.pos });
                }
                scanner.bump();
                ensure_current(&mut tree, &parents, &mut current);
                current = parents.pop();
            }
            b':' => {
                scanner.bump();
                ensure_current(&mut tree, &parents, &mut current);
                scanner.branch_length()?;
            }
            b';' => {
                if !parents.is_empty() {
                    return Err(NewickError::UnclosedBracket);
                }
                scanner.bump();
                finished = true;
                break;
            }
            _ => {
                let label = scanner.label()?;
                let id = ensure_current(&mut tree, &parents, &mut current);
                if !label.is_empty() {
                    tree.set_name(id, label);
                }
            }
        }
    }

    if tree.node_count() == 0 {
        return Err(NewickError::Empty);
    }
    if !finished {
        if !parents.is_empty() {
            return Err(NewickError::UnclosedBracket);
        }
        return Err(NewickError::MissingSemicolon);
    }
    scanner.skip_filler()?;
    if !scanner.at_end() {
        return Err(NewickError::TrailingInput { at: scanner.pos });
    }
    Ok(tree)
}

/// Node the upcoming label or length belongs to, created on demand so bare
/// leaves like the `B` in `(A,B)` get a node without a dedicated token.
fn ensure_current(tree: &mut Tree, parents: &[NodeId], current: &mut Option<NodeId>) -> NodeId {
    match *current {
        Some(id) => id,
        None => {
            let id = tree.add_node(parents.last().copied());
            *current = Some(id);
            id
        }
    }
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Skip whitespace and `[...]` comments.
    fn skip_filler(&mut self) -> Result<(), NewickError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.bump(),
                Some(b'[') => {
                    let start = self.pos;
                    self.bump();
                    loop {
                        match self.peek() {
                            Some(b']') => {
                                self.bump();
                                break;
                            }
                            Some(_) => self.bump(),
                            None => {
                                return Err(NewickError::UnterminatedComment { at: start })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Read a label: either `'...'` with `''` as an escaped quote, or a
    /// plain run up to the next structural character.
    fn label(&mut self) -> Result<String, NewickError> {
        if self.peek() == Some(b'\'') {
            let start = self.pos;
            self.bump();
            let mut raw = Vec::new();
            loop {
                match self.peek() {
                    Some(b'\'') => {
                        self.bump();
                        if self.peek() == Some(b'\'') {
                            self.bump();
                            raw.push(b'\'');
                        } else {
                            break;
                        }
                    }
                    Some(b) => {
                        self.bump();
                        raw.push(b);
                    }
                    None => return Err(NewickError::UnterminatedQuote { at: start }),
                }
            }
            Ok(String::from_utf8_lossy(&raw).into_owned())
        } else {
            let start = self.pos;
            while let Some(b) = self.peek() {
                if b.is_ascii_whitespace()
                    || matches!(b, b'(' | b')' | b',' | b':' | b';' | b'[' | b'\'')
                {
                    break;
                }
                self.bump();
            }
            Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
        }
    }

    /// Parse and range-check a branch length; the value itself is not kept.
    fn branch_length(&mut self) -> Result<(), NewickError> {
        self.skip_filler()?;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                self.bump();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        text.parse::<f64>()?;
        Ok(())
    }
}
