//! Reader for the plain-text matching case format.
//!
//! ```text
//! <num_cases>
//! <n> <m> <num_edges>        (once per case)
//! <left> <right>             (num_edges times)
//! ```
//!
//! Answer files hold one matching size per line.  Blank lines are ignored
//! in both.
use std::str::{Lines, SplitWhitespace};

use crate::matching::BipartiteMatching;

/// Errors produced while reading case or answer files.  Line numbers are
/// 1-based.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A record ended before all of its fields were read.
    #[error("line {line}: missing {expected}")]
    MissingToken { line: usize, expected: &'static str },
    /// A field is not a non-negative integer.
    #[error("line {line}: invalid integer {token:?}")]
    InvalidInteger { line: usize, token: String },
    /// An edge names a node outside its side of the case.
    #[error("line {line}: {side} index {index} out of range 0..{size}")]
    IndexOutOfRange {
        line: usize,
        side: &'static str,
        index: usize,
        size: usize,
    },
    /// Extra tokens on a record line, or records after the last case.
    #[error("line {line}: unexpected trailing data {token:?}")]
    TrailingData { line: usize, token: String },
}

/// One bipartite matching instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchingCase {
    pub num_left: usize,
    pub num_right: usize,
    pub edges: Vec<(usize, usize)>,
}

impl MatchingCase {
    pub fn to_problem(&self) -> BipartiteMatching {
        let mut problem = BipartiteMatching::new(self.num_left, self.num_right);
        for &(left, right) in &self.edges {
            problem.add_edge(left, right);
        }
        problem
    }
}

struct Record<'a> {
    line: usize,
    tokens: SplitWhitespace<'a>,
}

impl Record<'_> {
    fn int(&mut self, expected: &'static str) -> Result<usize, ParseError> {
        let line = self.line;
        let token = self
            .tokens
            .next()
            .ok_or(ParseError::MissingToken { line, expected })?;
        token.parse().map_err(|_| ParseError::InvalidInteger {
            line,
            token: token.to_owned(),
        })
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(token) => Err(ParseError::TrailingData {
                line: self.line,
                token: token.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

struct Reader<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    last_line: usize,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_nonblank(&mut self) -> Option<Record<'a>> {
        for (index, text) in self.lines.by_ref() {
            self.last_line = index + 1;
            if !text.trim().is_empty() {
                return Some(Record {
                    line: index + 1,
                    tokens: text.split_whitespace(),
                });
            }
        }
        None
    }

    fn record(&mut self, expected: &'static str) -> Result<Record<'a>, ParseError> {
        self.next_nonblank().ok_or(ParseError::MissingToken {
            line: self.last_line + 1,
            expected,
        })
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.next_nonblank() {
            Some(mut record) => Err(ParseError::TrailingData {
                line: record.line,
                token: record.tokens.next().unwrap_or_default().to_owned(),
            }),
            None => Ok(()),
        }
    }
}

fn check_index(line: usize, side: &'static str, index: usize, size: usize) -> Result<usize, ParseError> {
    if index < size {
        Ok(index)
    } else {
        Err(ParseError::IndexOutOfRange {
            line,
            side,
            index,
            size,
        })
    }
}

/// Parses a case file.
pub fn parse_cases(text: &str) -> Result<Vec<MatchingCase>, ParseError> {
    let mut reader = Reader::new(text);
    let mut header = reader.record("case count")?;
    let num_cases = header.int("case count")?;
    header.finish()?;

    let mut cases = Vec::with_capacity(num_cases.min(1024));
    for _ in 0..num_cases {
        let mut header = reader.record("case header")?;
        let num_left = header.int("left node count")?;
        let num_right = header.int("right node count")?;
        let num_edges = header.int("edge count")?;
        header.finish()?;

        let mut edges = Vec::with_capacity(num_edges.min(1 << 16));
        for _ in 0..num_edges {
            let mut record = reader.record("edge")?;
            let line = record.line;
            let left = check_index(line, "left", record.int("left index")?, num_left)?;
            let right = check_index(line, "right", record.int("right index")?, num_right)?;
            record.finish()?;
            edges.push((left, right));
        }
        cases.push(MatchingCase {
            num_left,
            num_right,
            edges,
        });
    }
    reader.finish()?;
    Ok(cases)
}

/// Parses an answer file: one expected matching size per line.
pub fn parse_answers(text: &str) -> Result<Vec<usize>, ParseError> {
    let mut reader = Reader::new(text);
    let mut answers = Vec::new();
    while let Some(mut record) = reader.next_nonblank() {
        answers.push(record.int("answer")?);
        record.finish()?;
    }
    Ok(answers)
}
