//! Approximate matching of user-typed channel names.
//!
//! A candidate matches when every character of the query appears in it, in
//! order, ignoring case ("spotfy" matches "Spotify Music"). Matches are ranked
//! by Levenshtein distance to the query; equal distances keep catalog order,
//! so the lowest original index wins a tie.

/// One matching candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    /// Position of the candidate in the input slice.
    pub index: usize,
    /// Levenshtein distance between the lowercased query and candidate.
    pub distance: usize,
}

/// Returns true if `needle` is a subsequence of `haystack`.
fn is_subsequence(needle: &[char], haystack: &[char]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|c| rest.any(|h| h == c))
}

/// Levenshtein distance over chars, two-row table.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn fold(s: &str) -> Vec<char> {
    s.to_lowercase().chars().collect()
}

/// Ranks every matching candidate, best first.
pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<Rank> {
    let query = fold(query);
    let mut ranks: Vec<Rank> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let candidate = fold(candidate.as_ref());
            is_subsequence(&query, &candidate).then(|| Rank {
                index,
                distance: levenshtein(&query, &candidate),
            })
        })
        .collect();

    // Stable: ties stay in catalog order.
    ranks.sort_by_key(|r| r.distance);
    ranks
}

/// Returns the index of the best matching candidate, or `None`.
pub fn resolve<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<usize> {
    rank(query, candidates).first().map(|r| r.index)
}
