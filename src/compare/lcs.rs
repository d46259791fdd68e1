//! Longest common subsequence over arbitrary sequences.
//!
//! Used to seed node matches, to align children when detecting reorders,
//! and to compare token and character sequences for distances.

/// One step of a sequence edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceEdit {
    /// `old[old_index]` corresponds to `new[new_index]`
    Match { old_index: usize, new_index: usize },
    Insert { new_index: usize },
    Delete { old_index: usize },
}

/// Compute the LCS of two sequences.
/// Returns index pairs into `old` and `new`, both ascending.
pub fn compute<T, U>(old: &[T], new: &[U], eq: impl Fn(&T, &U) -> bool) -> Vec<(usize, usize)> {
    if old.is_empty() || new.is_empty() {
        return Vec::new();
    }

    // Build LCS table
    let m = old.len();
    let n = new.len();
    let mut dp = vec![vec![0u32; n + 1]; m + 1];

    for (i, old_elem) in old.iter().enumerate() {
        for (j, new_elem) in new.iter().enumerate() {
            dp[i + 1][j + 1] = if eq(old_elem, new_elem) {
                dp[i][j] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    // Backtrack to find LCS
    let mut result = Vec::with_capacity(dp[m][n] as usize);
    let mut i = m;
    let mut j = n;
    while i > 0 && j > 0 {
        if eq(&old[i - 1], &new[j - 1]) && dp[i][j] == dp[i - 1][j - 1] + 1 {
            result.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] >= dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    result.reverse();
    result
}

/// Length of the LCS, computed with a single rolling row
pub fn length<T, U>(old: &[T], new: &[U], eq: impl Fn(&T, &U) -> bool) -> usize {
    if old.is_empty() || new.is_empty() {
        return 0;
    }
    let mut prev = vec![0u32; new.len() + 1];
    let mut row = vec![0u32; new.len() + 1];
    for old_elem in old {
        for (j, new_elem) in new.iter().enumerate() {
            row[j + 1] = if eq(old_elem, new_elem) {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[new.len()] as usize
}

/// `1 - lcs / max(len)`; 0 when both sequences are empty
pub fn distance<T, U>(old: &[T], new: &[U], eq: impl Fn(&T, &U) -> bool) -> f64 {
    let max = old.len().max(new.len());
    if max == 0 {
        return 0.0;
    }
    1.0 - length(old, new, eq) as f64 / max as f64
}

/// Edit script transforming `old` into `new`, in sequence order.
/// Deletes come before inserts between two matched elements.
pub fn edits<T, U>(old: &[T], new: &[U], eq: impl Fn(&T, &U) -> bool) -> Vec<SequenceEdit> {
    let pairs = compute(old, new, eq);
    let mut result = Vec::with_capacity(old.len() + new.len());
    let mut old_index = 0;
    let mut new_index = 0;
    for (matched_old, matched_new) in pairs.into_iter().chain(std::iter::once((old.len(), new.len()))) {
        while old_index < matched_old {
            result.push(SequenceEdit::Delete { old_index });
            old_index += 1;
        }
        while new_index < matched_new {
            result.push(SequenceEdit::Insert { new_index });
            new_index += 1;
        }
        if matched_old < old.len() && matched_new < new.len() {
            result.push(SequenceEdit::Match {
                old_index: matched_old,
                new_index: matched_new,
            });
            old_index += 1;
            new_index += 1;
        }
    }
    result
}

/// Character distance between two names
pub fn string_distance(old: &str, new: &str) -> f64 {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();
    distance(&old, &new, |a, b| a == b)
}
