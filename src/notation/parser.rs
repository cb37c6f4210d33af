//! Einsum notation parser.
//!
//! Turns strings like `"ij,jk->ik"` into canonical per-operand terms, with
//! ellipsis expansion and implicit-output inference already resolved.

use hashbrown::HashMap;

use super::subscript::Subscript;
use crate::error::{EinsumError, EinsumResult};

/// Parses an expression into input subscripts and an optional explicit output.
///
/// # Grammar
///
/// ```text
/// einsum      ::= inputs '->' output | inputs
/// inputs      ::= subscript (',' subscript)*
/// subscript   ::= (index | '...')*
/// index       ::= [a-zA-Z]
/// ```
pub fn parse_expression(expression: &str) -> EinsumResult<(Vec<Subscript>, Option<Subscript>)> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(EinsumError::parse("empty expression"));
    }

    let (inputs_str, output_str) = match expression.find("->") {
        Some(pos) => (&expression[..pos], Some(&expression[pos + 2..])),
        None => (expression, None),
    };

    let mut inputs = Vec::new();
    for part in inputs_str.split(',') {
        inputs.push(parse_subscript(part.trim())?);
    }

    let output = match output_str {
        Some(s) => Some(parse_subscript(s.trim())?),
        None => None,
    };

    Ok((inputs, output))
}

fn parse_subscript(s: &str) -> EinsumResult<Subscript> {
    let mut subscript = Subscript::new();
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if chars.next() != Some('.') || chars.next() != Some('.') {
                    return Err(EinsumError::parse("incomplete ellipsis, expected '...'"));
                }
                if subscript.has_ellipsis() {
                    return Err(EinsumError::parse("multiple ellipses in subscript"));
                }
                subscript.push_ellipsis();
            }
            'a'..='z' | 'A'..='Z' => subscript.push_named(c),
            ' ' | '\t' => continue,
            _ => {
                return Err(EinsumError::parse(format!(
                    "invalid character '{}' in subscript",
                    c
                )));
            }
        }
    }

    Ok(subscript)
}

/// Canonicalizes an expression against the ranks of the concrete operands.
///
/// Expands every ellipsis to fresh labels (right-aligned against the widest
/// operand), infers the output term when none is given, and returns plain
/// per-operand term strings plus the output term. The result is what the
/// path search and plan builder consume; per-label size agreement is
/// re-validated later when the dimension table is built.
pub fn canonicalize(expression: &str, ranks: &[usize]) -> EinsumResult<(Vec<String>, String)> {
    let (inputs, output) = parse_expression(expression)?;

    if inputs.len() != ranks.len() {
        return Err(EinsumError::parse(format!(
            "expression has {} operand terms but {} operands were supplied",
            inputs.len(),
            ranks.len()
        )));
    }

    // Width of each operand's ellipsis, and the widest across all operands.
    let mut widths = Vec::with_capacity(inputs.len());
    let mut max_width = 0usize;
    for (num, (sub, &rank)) in inputs.iter().zip(ranks).enumerate() {
        let explicit = sub.explicit_count();
        let width = if sub.has_ellipsis() {
            rank.checked_sub(explicit).ok_or(EinsumError::DimensionMismatch {
                term: sub.to_string(),
                operand: num,
                expected: explicit,
                got: rank,
            })?
        } else {
            0
        };
        max_width = max_width.max(width);
        widths.push(width);
    }

    let broadcast = broadcast_labels(&inputs, output.as_ref(), max_width)?;

    let terms: Vec<String> = inputs
        .iter()
        .zip(&widths)
        .map(|(sub, &w)| sub.expand_ellipsis(&broadcast, w))
        .collect();

    let output_term = match output {
        Some(out) => {
            if max_width > 0 && !out.has_ellipsis() {
                return Err(EinsumError::parse(
                    "operands have ellipsis dimensions but the output does not",
                ));
            }
            let expanded = out.expand_ellipsis(&broadcast, max_width);
            validate_output(&expanded, &terms)?;
            expanded
        }
        None => implicit_output(&inputs, &broadcast),
    };

    Ok((terms, output_term))
}

/// Picks `count` fresh labels for ellipsis dimensions from the unused part
/// of the `[A-Za-z]` pool.
fn broadcast_labels(
    inputs: &[Subscript],
    output: Option<&Subscript>,
    count: usize,
) -> EinsumResult<Vec<char>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut used: hashbrown::HashSet<char> = inputs.iter().flat_map(|s| s.named_indices()).collect();
    if let Some(out) = output {
        used.extend(out.named_indices());
    }

    let pool = ('A'..='Z').chain('a'..='z');
    let labels: Vec<char> = pool.filter(|c| !used.contains(c)).take(count).collect();
    if labels.len() < count {
        return Err(EinsumError::parse(
            "too many distinct indices to expand ellipsis",
        ));
    }
    Ok(labels)
}

fn validate_output(output_term: &str, terms: &[String]) -> EinsumResult<()> {
    let mut seen = hashbrown::HashSet::new();
    for c in output_term.chars() {
        if !seen.insert(c) {
            return Err(EinsumError::parse(format!(
                "index '{}' appears more than once in the output",
                c
            )));
        }
        if !terms.iter().any(|t| t.contains(c)) {
            return Err(EinsumError::OutputIndexNotInInputs { index: c });
        }
    }
    Ok(())
}

/// Implicit output per the numpy convention: the ellipsis dimensions first,
/// then every label appearing exactly once across all inputs, sorted.
fn implicit_output(inputs: &[Subscript], broadcast: &[char]) -> String {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for sub in inputs {
        for c in sub.named_indices() {
            *counts.entry(c).or_insert(0) += 1;
        }
    }

    let mut singles: Vec<char> = counts
        .iter()
        .filter(|&(_, &n)| n == 1)
        .map(|(&c, _)| c)
        .collect();
    singles.sort_unstable();

    broadcast.iter().chain(singles.iter()).collect()
}
