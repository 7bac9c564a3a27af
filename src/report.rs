//! Depth-first CSV-like report of a size tree.

use crate::tree::TreeNode;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Stdout, Write};

/// First line of every report.
pub const HEADER: &str = "#size,depth,name";

/// Name given to the synthetic depth-0 record for the scan root.
pub const ROOT_NAME: &str = "{TOP}";

/// Options for [`write_report`].
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Omit records deeper than this. Sizes are unaffected.
    pub max_depth: Option<usize>,
}

/// One directory in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub size: u64,
    pub depth: usize,
    pub name: Cow<'a, str>,
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.size, self.depth, escape_control(&self.name))
    }
}

/// Escape control characters so a record always stays on one line.
fn escape_control(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Walk `root` in pre-order, yielding the root as `{TOP}` at depth 0
/// followed by every descendant directory, siblings sorted by name.
///
/// The iterator is lazy; clone it or call `dump` again to start over.
pub fn dump(root: &TreeNode) -> Records<'_> {
    Records {
        stack: vec![(0, Cow::Borrowed(ROOT_NAME), root)],
    }
}

/// Iterator returned by [`dump`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    stack: Vec<(usize, Cow<'a, str>, &'a TreeNode)>,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, name, node) = self.stack.pop()?;
        // Reversed so the smallest name is popped first
        for (child_name, child) in node.children.iter().rev() {
            self.stack.push((depth + 1, child_name.to_string_lossy(), child));
        }
        Some(Record {
            size: node.size,
            depth,
            name,
        })
    }
}

/// Write the header and all records within the depth limit to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    root: &TreeNode,
    config: &ReportConfig,
) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for record in dump(root) {
        if config.max_depth.is_some_and(|max| record.depth > max) {
            continue;
        }
        writeln!(out, "{record}")?;
    }
    out.flush()
}

/// Create a BufWriter wrapping stdout with a generous buffer.
pub fn buffered_stdout() -> io::BufWriter<Stdout> {
    io::BufWriter::with_capacity(64 * 1024, io::stdout())
}
