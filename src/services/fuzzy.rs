//! Token-based fuzzy string scoring on a 0–100 scale.
//!
//! Scores are built from an indel ratio (`2 * LCS / (len_a + len_b)`) and the
//! usual token sort / token set / partial variants, combined the way a
//! weighted ratio does: the partial variants only kick in when the strings
//! differ noticeably in length, and are scaled down when they do.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;

/// Lowercases, replaces anything non-alphanumeric with a space and collapses whitespace
pub fn process(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Similarity of two whole strings
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best ratio of the shorter string against any equally long window of the longer one
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.is_empty() {
        return 0.0;
    }
    if shorter.len() == longer.len() {
        return ratio_chars(&shorter, &longer);
    }

    let mut best = 0.0f64;
    for window in longer.windows(shorter.len()) {
        best = best.max(ratio_chars(&shorter, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Ratio after sorting each string's tokens, so word order does not matter
pub fn token_sort_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let (a, b) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

/// Ratio over the shared tokens plus each side's leftovers
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&str>| set.join(" ");
    let intersection = join(tokens_a.intersection(&tokens_b).copied().collect());
    let only_a = join(tokens_a.difference(&tokens_b).copied().collect());
    let only_b = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_a = format!("{} {}", intersection, only_a).trim().to_string();
    let combined_b = format!("{} {}", intersection, only_b).trim().to_string();

    [
        ratio(&intersection, &combined_a),
        ratio(&intersection, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Combined score of two already-processed strings, rounded to 0–100
///
/// Partial token-set scoring is left out: with it, a single shared word such
/// as "show" is enough to clear any reasonable threshold.
pub fn weighted_ratio_processed(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(a, b);
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if len_ratio < 1.5 {
        base.max(token_sort_ratio(a, b, false) * UNBASE_SCALE)
            .max(token_set_ratio(a, b) * UNBASE_SCALE)
    } else {
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        base.max(partial_ratio(a, b) * partial_scale)
            .max(token_sort_ratio(a, b, true) * UNBASE_SCALE * partial_scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// Combined score of two raw strings, rounded to 0–100
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    weighted_ratio_processed(&process(a), &process(b))
}
