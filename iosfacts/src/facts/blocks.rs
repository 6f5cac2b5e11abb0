//! Splitting multi-interface output into per-interface blocks.

use indexmap::IndexMap;

/// Split `show interfaces`-style output into blocks keyed by interface name.
///
/// A line starting in column zero opens a block keyed by its first token.
/// Indented lines are appended to the open block, trimmed of their leading
/// whitespace and separated by `\n`. Blank lines are dropped without
/// closing the block. Indented lines before the first key line are
/// discarded. A repeated key replaces the earlier block. `\r\n` line
/// endings are accepted.
pub fn parse_blocks(data: &str) -> IndexMap<String, String> {
    let mut blocks: IndexMap<String, String> = IndexMap::new();
    let mut current: Option<String> = None;

    for line in data.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(block) = current.as_ref().and_then(|key| blocks.get_mut(key)) {
                block.push('\n');
                block.push_str(line.trim_start());
            }
            continue;
        }

        if let Some(key) = line.split_whitespace().next() {
            blocks.insert(key.to_string(), line.to_string());
            current = Some(key.to_string());
        }
    }

    blocks
}
