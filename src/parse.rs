//! Configuration file parser.
//!
//! # Grammar
//!
//! ```text
//! <line>      := <stock> | <process> | <optimize> | <comment> | <blank>
//! <stock>     := <name> ":" <int>
//! <process>   := <name> ":" "(" <items>? ")" ":" "(" <items>? ")" ":" <int>
//! <items>     := <item> (";" <item>)*
//! <item>      := <name> ":" <int>
//! <optimize>  := "optimize" ":" "(" <name> (";" <name>)* ")"
//! <comment>   := "#" .*
//! ```
//!
//! Sections appear in the order stocks → processes → optimize; the
//! parser switches sections implicitly on the first line matching the
//! next section's shape. Names match `[^:#\s]+`, `optimize` is
//! case-insensitive, and a process's result list may be omitted
//! entirely (`name:(needs)::delay`).

use thiserror::Error;

use crate::models::{RawConfig, RawItem, RawProcess};

/// Syntactic configuration errors. Every variant names the offending line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Line fits neither the stock nor the process shape.
    #[error("expected stock or process at line {line}: '{content}'")]
    ExpectedStockOrProcess {
        /// 1-based line number.
        line: usize,
        /// Offending line content, trimmed.
        content: String,
    },
    /// Line fits neither the process nor the optimize shape.
    #[error("expected process or optimize at line {line}: '{content}'")]
    ExpectedProcessOrOptimize {
        /// 1-based line number.
        line: usize,
        /// Offending line content, trimmed.
        content: String,
    },
    /// Content after the optimize section that is not another optimize line.
    #[error("unexpected content after optimize at line {line}: '{content}'")]
    UnexpectedAfterOptimize {
        /// 1-based line number.
        line: usize,
        /// Offending line content, trimmed.
        content: String,
    },
    /// Malformed process line (bad parentheses, name, or delay).
    #[error("malformed process at line {line}: '{content}'")]
    MalformedProcess {
        /// 1-based line number.
        line: usize,
        /// Offending line content, trimmed.
        content: String,
    },
    /// Malformed `name:qty` item inside a process line.
    #[error("bad item at line {line}: '{token}'")]
    BadItem {
        /// 1-based line number.
        line: usize,
        /// Offending item token, trimmed.
        token: String,
    },
    /// The file ended without an optimize section.
    #[error("missing optimize section")]
    MissingOptimize,
}

/// Which section the line scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Stocks,
    Processes,
    Optimize,
}

/// Parses a full configuration file.
///
/// Returns the name-based [`RawConfig`]; semantic checks (duplicate
/// process names, unknown optimize items) belong to the analyzer.
pub fn parse_config(input: &str) -> Result<RawConfig, ParseError> {
    let mut cfg = RawConfig::default();
    let mut section = Section::Stocks;

    for (idx, raw_line) in input.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match section {
            Section::Stocks => {
                if let Some(stock) = try_parse_stock(line) {
                    cfg.initial_stocks.push(stock);
                } else if try_parse_optimize(line).is_none() && line.contains('(') {
                    section = Section::Processes;
                    cfg.processes.push(parse_process(line, lineno)?);
                } else {
                    return Err(ParseError::ExpectedStockOrProcess {
                        line: lineno,
                        content: line.to_string(),
                    });
                }
            }
            Section::Processes => {
                // A full optimize line wins over the process shape; a
                // process may still be *named* `optimize...`.
                if let Some(keys) = try_parse_optimize(line) {
                    section = Section::Optimize;
                    cfg.optimize_keys.extend(keys);
                } else if line.contains('(') {
                    cfg.processes.push(parse_process(line, lineno)?);
                } else {
                    return Err(ParseError::ExpectedProcessOrOptimize {
                        line: lineno,
                        content: line.to_string(),
                    });
                }
            }
            Section::Optimize => {
                if let Some(keys) = try_parse_optimize(line) {
                    cfg.optimize_keys.extend(keys);
                } else {
                    return Err(ParseError::UnexpectedAfterOptimize {
                        line: lineno,
                        content: line.to_string(),
                    });
                }
            }
        }
    }

    if cfg.optimize_keys.is_empty() {
        return Err(ParseError::MissingOptimize);
    }

    Ok(cfg)
}

/// Whether `name` matches `[^:#\s]+`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c != ':' && c != '#' && !c.is_whitespace())
}

/// Parses a nonnegative decimal integer (`\d+`).
fn parse_uint(token: &str) -> Option<i64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Tries the stock shape `name ":" int` (no parentheses, single colon).
fn try_parse_stock(line: &str) -> Option<RawItem> {
    let (name, qty) = line.split_once(':')?;
    let name = name.trim();
    let qty = qty.trim();
    if !is_valid_name(name) {
        return None;
    }
    Some(RawItem::new(name, parse_uint(qty)?))
}

/// Parses a process line.
fn parse_process(line: &str, lineno: usize) -> Result<RawProcess, ParseError> {
    let malformed = || ParseError::MalformedProcess {
        line: lineno,
        content: line.to_string(),
    };

    let (name, rest) = line.split_once(':').ok_or_else(malformed)?;
    let name = name.trim();
    if !is_valid_name(name) {
        return Err(malformed());
    }

    let (needs_src, rest) = take_paren_group(rest).ok_or_else(malformed)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').ok_or_else(malformed)?;

    // The result group may be omitted: `name:(needs)::delay`.
    let (results_src, rest) = match take_paren_group(rest) {
        Some((group, after)) => {
            let after = after.trim_start();
            (group, after.strip_prefix(':').ok_or_else(malformed)?)
        }
        None => ("", rest),
    };

    let delay = parse_uint(rest.trim()).ok_or_else(malformed)?;

    Ok(RawProcess {
        name: name.to_string(),
        needs: parse_item_list(needs_src, lineno)?,
        results: parse_item_list(results_src, lineno)?,
        delay,
    })
}

/// Consumes a leading `( ... )` group, returning its contents and the
/// remainder after the closing parenthesis.
fn take_paren_group(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let inner = s.strip_prefix('(')?;
    let close = inner.find(')')?;
    Some((&inner[..close], &inner[close + 1..]))
}

/// Parses a `;`-separated item list; empty input yields an empty list.
fn parse_item_list(src: &str, lineno: usize) -> Result<Vec<RawItem>, ParseError> {
    let mut items = Vec::new();
    for token in src.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let bad = || ParseError::BadItem {
            line: lineno,
            token: token.to_string(),
        };
        let (name, qty) = token.split_once(':').ok_or_else(bad)?;
        let name = name.trim();
        if !is_valid_name(name) {
            return Err(bad());
        }
        let qty = parse_uint(qty.trim()).ok_or_else(bad)?;
        items.push(RawItem::new(name, qty));
    }
    Ok(items)
}

/// Tries the optimize shape `optimize ":" "(" name (";" name)* ")"`.
fn try_parse_optimize(line: &str) -> Option<Vec<String>> {
    let lower = line.to_ascii_lowercase();
    if !lower.starts_with("optimize") {
        return None;
    }
    let rest = line["optimize".len()..].trim_start();
    let rest = rest.strip_prefix(':')?;
    let (group, after) = take_paren_group(rest)?;
    if !after.trim().is_empty() {
        return None;
    }
    let keys: Vec<String> = group
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if keys.is_empty() {
        return None;
    }
    Some(keys)
}
