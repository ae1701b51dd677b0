// src/cmvn.rs
//
// Reader for the Kaldi-nnet style `am.mvn` artifact. Only two blocks matter:
//
//   <AddShift> 560 560
//   <LearnRateCoef> 0 [ -8.31 -8.60 ... ]
//   <Rescale> 560 560
//   <LearnRateCoef> 0 [ 0.155 0.154 ... ]
//
// Everything else in the file (<Nnet>, <Splice>, ...) is skipped.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{CmvnError, PayloadFault};

const ADD_SHIFT_TAG: &str = "<AddShift>";
const RESCALE_TAG: &str = "<Rescale>";
const LEARN_RATE_COEF: &str = "<LearnRateCoef>";

// Marker, coefficient and opening bracket come before the values.
const LEADING_TOKENS: usize = 3;
// Closing bracket.
const TRAILING_TOKENS: usize = 1;

/// The two statistic blocks the artifact can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    /// `<AddShift>`, the negative mean.
    AddShift,
    /// `<Rescale>`, the inverse standard deviation.
    Rescale,
}

impl Block {
    pub fn from_tag(token: &str) -> Option<Self> {
        match token {
            ADD_SHIFT_TAG => Some(Block::AddShift),
            RESCALE_TAG => Some(Block::Rescale),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Block::AddShift => ADD_SHIFT_TAG,
            Block::Rescale => RESCALE_TAG,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raw statistics as found in the file.
///
/// A block that never appeared is left empty. Whether both vectors are present
/// and of equal length is for the caller to check, see [`crate::normalizer::Cmvn`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CmvnStats {
    pub neg_mean: Vec<f64>,
    pub inv_std: Vec<f64>,
}

impl CmvnStats {
    pub fn get(&self, block: Block) -> &[f64] {
        match block {
            Block::AddShift => &self.neg_mean,
            Block::Rescale => &self.inv_std,
        }
    }

    fn slot_mut(&mut self, block: Block) -> &mut Vec<f64> {
        match block {
            Block::AddShift => &mut self.neg_mean,
            Block::Rescale => &mut self.inv_std,
        }
    }

    /// Both blocks present with matching lengths.
    pub fn is_complete(&self) -> bool {
        !self.neg_mean.is_empty() && self.neg_mean.len() == self.inv_std.len()
    }
}

enum ScanState<'a> {
    SeekTag,
    ExpectCoefLine(Block),
    Extract {
        block: Block,
        line: usize,
        tokens: Vec<&'a str>,
    },
}

/// Stateless scanner over the text of one artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmvnParser;

impl CmvnParser {
    pub fn new() -> Self {
        CmvnParser
    }

    pub fn parse(&self, content: &str) -> Result<CmvnStats, CmvnError> {
        let mut stats = CmvnStats::default();
        let mut seen = [false; 2];
        let mut lines = content.lines().enumerate().peekable();
        let mut state = ScanState::SeekTag;

        loop {
            state = match state {
                ScanState::SeekTag => match lines.next() {
                    None => break,
                    Some((_, line)) => match first_token(line).and_then(Block::from_tag) {
                        Some(block) => ScanState::ExpectCoefLine(block),
                        None => ScanState::SeekTag,
                    },
                },
                ScanState::ExpectCoefLine(block) => {
                    match lines.next_if(|(_, line)| first_token(line) == Some(LEARN_RATE_COEF)) {
                        Some((index, line)) => ScanState::Extract {
                            block,
                            line: index + 1,
                            tokens: line.split_whitespace().collect(),
                        },
                        // The line after the tag is left for SeekTag to look at.
                        None => {
                            match lines.peek() {
                                None => warn!("{} is the last line, ignoring it", block),
                                Some((index, _)) => warn!(
                                    "{} not followed by {} (line {}), ignoring it",
                                    block,
                                    LEARN_RATE_COEF,
                                    index + 1
                                ),
                            }
                            ScanState::SeekTag
                        }
                    }
                }
                ScanState::Extract { block, line, tokens } => {
                    let values = extract_payload(&tokens, line)?;
                    debug!("{}: {} values from line {}", block, values.len(), line);

                    let seen_before = &mut seen[block as usize];
                    if *seen_before {
                        warn!("duplicate {} block on line {}, keeping the later one", block, line);
                    }
                    *seen_before = true;
                    *stats.slot_mut(block) = values;
                    ScanState::SeekTag
                }
            };
        }

        Ok(stats)
    }
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Converts `tokens[3 .. len - 1]` of a `<LearnRateCoef>` line. `line` is only
/// used for error reporting.
fn extract_payload(tokens: &[&str], line: usize) -> Result<Vec<f64>, CmvnError> {
    if tokens.len() < LEADING_TOKENS + TRAILING_TOKENS {
        return Err(CmvnError::MalformedPayload {
            line,
            fault: PayloadFault::TooFewTokens { found: tokens.len() },
        });
    }

    let end = tokens.len() - TRAILING_TOKENS;
    tokens[LEADING_TOKENS..end]
        .iter()
        .enumerate()
        .map(|(offset, token)| {
            token.parse::<f64>().map_err(|_| CmvnError::MalformedPayload {
                line,
                fault: PayloadFault::InvalidNumber {
                    position: LEADING_TOKENS + offset,
                    token: (*token).to_string(),
                },
            })
        })
        .collect()
}

pub fn parse_cmvn(content: &str) -> Result<CmvnStats, CmvnError> {
    CmvnParser::new().parse(content)
}

/// Reads `path` as UTF-8 and parses it.
pub fn load_cmvn(path: impl AsRef<Path>) -> Result<CmvnStats, CmvnError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CmvnError::io(path, e))?;
    debug!("read {} bytes from {}", content.len(), path.display());
    CmvnParser::new().parse(&content)
}
