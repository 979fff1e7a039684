//! Sequence similarity ratio over characters.
//!
//! Ratcliff/Obershelp "gestalt" matching: find the longest common block,
//! recurse on both sides of it, and score `2 * matched / total`. Characters
//! that are very common in a long second sequence ("popular" characters) are
//! not used to seed a block, which keeps long snippets from scoring high on
//! spaces and vowels alone.

use std::collections::{HashMap, HashSet};

/// The second sequence must be at least this long before popular characters are dropped.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity of `a` and `b` in `[0, 1]`; two empty strings score 1.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = Matcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each non-popular character in `b`.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(c, _)| *c)
                .collect();
            b2j.retain(|c, _| !popular.contains(c));
        }

        Self { a, b, b2j }
    }

    /// Total length of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular characters never seed a block but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi
            && best_j + best_k < bhi
            && self.a[best_i + best_k] == self.b[best_j + best_k]
        {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ratio(a: &str, b: &str, expected: f64) {
        let actual = similarity_ratio(a, b);
        assert!(
            (actual - expected).abs() < 1e-9,
            "ratio({a:?}, {b:?}) = {actual}, expected {expected}"
        );
    }

    #[test]
    fn test_identical_and_empty() {
        assert_ratio("acme", "acme", 1.0);
        assert_ratio("", "", 1.0);
        assert_ratio("acme", "", 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // "abcd" vs "bcde": one block "bcd" of 3, 2*3/8
        assert_ratio("abcd", "bcde", 0.75);
        // blocks "a", "b" after the longest "a"/"b" split, 2*2/6
        assert_ratio("abc", "acb", 2.0 * 2.0 / 6.0);
    }

    #[test]
    fn test_near_miss_company_names() {
        let ratio = similarity_ratio("clover meadow", "clover meadows");
        assert!(ratio > 0.95);
        assert!(similarity_ratio("acme", "zenith") < 0.25);
    }

    #[test]
    fn test_popular_characters_do_not_seed_blocks() {
        // 'x' appears far more than 1% of a 300-char sequence, so it never
        // anchors a block; the only match is the edge extension at position 0.
        let b = "x".repeat(300);
        assert_ratio("x", &b, 2.0 / 301.0);
        // Below the length threshold the same character matches.
        assert_ratio("x", "xx", 2.0 / 3.0);
    }
}
