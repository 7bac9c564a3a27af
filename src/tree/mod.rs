//! Directory size tree: data model and construction.

mod error;
pub(crate) mod walk;

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

pub use error::{ScanError, ScanIssue};
pub use walk::Scanner;

/// Aggregated size of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Bytes of direct non-directory entries plus the sizes of all child
    /// directories. The directory's own entry size is not counted.
    pub size: u64,
    /// Child directories keyed by basename, ordered by name.
    pub children: BTreeMap<OsString, TreeNode>,
}

impl TreeNode {
    /// Look up a direct child directory by name.
    pub fn child(&self, name: impl AsRef<OsStr>) -> Option<&TreeNode> {
        self.children.get(name.as_ref())
    }

    /// Bytes contributed by direct non-directory entries only.
    pub fn files_size(&self) -> u64 {
        let nested: u64 = self.children.values().map(|c| c.size).sum();
        self.size.saturating_sub(nested)
    }

    /// Number of directories in this subtree, including this one.
    pub fn dir_count(&self) -> usize {
        1 + self.children.values().map(TreeNode::dir_count).sum::<usize>()
    }
}

/// Result of a scan that reached the end of the tree.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub root: TreeNode,
    /// Recoverable problems met along the way, in traversal order.
    pub issues: Vec<ScanIssue>,
}

impl ScanOutcome {
    /// True when every directory and entry could be read.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}
