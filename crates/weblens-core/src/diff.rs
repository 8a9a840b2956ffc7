//! Line-based diff between two snapshot contents.
//!
//! Lines keep their terminating `\n`, so joining chunk values gives back the
//! original text exactly. The edit script is the Myers O(ND) shortest edit
//! over line tokens, computed after stripping the common prefix and suffix.
//!
//! The search is capped at `MAX_EDIT_COST` edits. A middle region that
//! needs more is reported as one removed chunk followed by one added chunk.
//! Memory stays O(cost²) however much of a page was rewritten.

use serde::{Deserialize, Serialize};

/// Largest edit distance searched for before giving up on a minimal script.
const MAX_EDIT_COST: usize = 1024;

/// A contiguous run of lines that were added, removed or left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChunk {
    pub value: String,
    pub added: bool,
    pub removed: bool,
    /// Number of lines in `value`.
    pub count: usize,
}

impl DiffChunk {
    fn new(kind: ChunkKind, lines: &[&str]) -> Self {
        Self {
            value: lines.concat(),
            added: kind == ChunkKind::Added,
            removed: kind == ChunkKind::Removed,
            count: lines.len(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !self.added && !self.removed
    }
}

/// Line totals over a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn from_chunks(chunks: &[DiffChunk]) -> Self {
        chunks.iter().fold(Self::default(), |mut stats, chunk| {
            if chunk.added {
                stats.added += chunk.count;
            } else if chunk.removed {
                stats.removed += chunk.count;
            } else {
                stats.unchanged += chunk.count;
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkKind {
    Unchanged,
    Removed,
    Added,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Keep,
    Delete,
    Insert,
}

/// Split text into lines, each keeping its trailing `\n`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Diff `older` against `newer` line by line.
///
/// Identical inputs produce a single unchanged chunk holding the whole text,
/// even when both are empty. Otherwise no chunk is empty, and inside every
/// changed region the removed lines come before the added ones.
pub fn diff_lines(older: &str, newer: &str) -> Vec<DiffChunk> {
    diff_lines_bounded(older, newer, MAX_EDIT_COST)
}

fn diff_lines_bounded(older: &str, newer: &str, max_cost: usize) -> Vec<DiffChunk> {
    if older == newer {
        return vec![DiffChunk {
            value: newer.to_string(),
            added: false,
            removed: false,
            count: split_lines(newer).len(),
        }];
    }

    let old_lines = split_lines(older);
    let new_lines = split_lines(newer);

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];

    let mut builder = ChunkBuilder::default();
    builder.keep(&old_lines[..prefix]);

    let Some(edits) = shortest_edit(old_mid, new_mid, max_cost) else {
        for &line in old_mid {
            builder.remove(line);
        }
        for &line in new_mid {
            builder.add(line);
        }
        builder.keep(&old_lines[old_lines.len() - suffix..]);
        return builder.finish();
    };

    let (mut x, mut y) = (0, 0);
    for edit in edits {
        match edit {
            Edit::Keep => {
                builder.keep(&old_mid[x..x + 1]);
                x += 1;
                y += 1;
            }
            Edit::Delete => {
                builder.remove(old_mid[x]);
                x += 1;
            }
            Edit::Insert => {
                builder.add(new_mid[y]);
                y += 1;
            }
        }
    }

    builder.keep(&old_lines[old_lines.len() - suffix..]);
    builder.finish()
}

/// Groups edits into chunks, holding back each changed region until the next
/// unchanged line so removals can be emitted ahead of additions.
#[derive(Default)]
struct ChunkBuilder<'a> {
    chunks: Vec<DiffChunk>,
    unchanged: Vec<&'a str>,
    removed: Vec<&'a str>,
    added: Vec<&'a str>,
}

impl<'a> ChunkBuilder<'a> {
    fn keep(&mut self, lines: &[&'a str]) {
        if lines.is_empty() {
            return;
        }
        self.flush_changes();
        self.unchanged.extend_from_slice(lines);
    }

    fn remove(&mut self, line: &'a str) {
        self.flush_unchanged();
        self.removed.push(line);
    }

    fn add(&mut self, line: &'a str) {
        self.flush_unchanged();
        self.added.push(line);
    }

    fn flush_unchanged(&mut self) {
        if !self.unchanged.is_empty() {
            self.chunks
                .push(DiffChunk::new(ChunkKind::Unchanged, &self.unchanged));
            self.unchanged.clear();
        }
    }

    fn flush_changes(&mut self) {
        if !self.removed.is_empty() {
            self.chunks.push(DiffChunk::new(ChunkKind::Removed, &self.removed));
            self.removed.clear();
        }
        if !self.added.is_empty() {
            self.chunks.push(DiffChunk::new(ChunkKind::Added, &self.added));
            self.added.clear();
        }
    }

    fn finish(mut self) -> Vec<DiffChunk> {
        self.flush_unchanged();
        self.flush_changes();
        self.chunks
    }
}

/// Myers' greedy shortest edit script, recovered by walking the saved
/// frontier of each round backwards.
///
/// Round `d` only reaches diagonals `-d..=d`, so just that window (plus one
/// diagonal either side) is saved. Returns `None` when more than `max_cost`
/// edits are needed.
fn shortest_edit(old: &[&str], new: &[&str], max_cost: usize) -> Option<Vec<Edit>> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    if n + m == 0 {
        return Some(Vec::new());
    }

    let limit = (n + m).min(max_cost as isize);
    let offset = limit + 1;
    let idx = |k: isize| (k + offset) as usize;
    let mut v = vec![0isize; (2 * limit + 3) as usize];
    let mut trace: Vec<Vec<isize>> = Vec::new();
    let mut reached = false;

    'search: for d in 0..=limit {
        trace.push(v[idx(-d - 1)..=idx(d + 1)].to_vec());
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
                v[idx(k + 1)]
            } else {
                v[idx(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx(k)] = x;
            if x >= n && y >= m {
                reached = true;
                break 'search;
            }
            k += 2;
        }
    }
    if !reached {
        return None;
    }

    let mut edits = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, frontier) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let at = |k: isize| frontier[(k + d + 1) as usize];
        let k = x - y;
        let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = at(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            edits.push(Edit::Keep);
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                edits.push(Edit::Insert);
            } else {
                edits.push(Edit::Delete);
            }
        }
        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    Some(edits)
}

/// Render chunks as unified-style text: `+` added, `-` removed, ` ` kept.
pub fn render_text(chunks: &[DiffChunk]) -> String {
    let mut output = String::new();
    for chunk in chunks {
        let marker = if chunk.added {
            '+'
        } else if chunk.removed {
            '-'
        } else {
            ' '
        };
        for line in split_lines(&chunk.value) {
            output.push(marker);
            output.push_str(line);
            if !line.ends_with('\n') {
                output.push('\n');
            }
        }
    }
    output
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
