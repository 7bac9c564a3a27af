use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{ScanError, ScanIssue, ScanOutcome, TreeNode};

/// Builds a [`TreeNode`] for a directory and everything below it.
///
/// The walk never follows symbolic links and never touches the process
/// working directory, so independent scanners can run side by side.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    cancel: Option<Arc<AtomicBool>>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the scan with [`ScanError::Cancelled`] once `flag` is set.
    /// The flag is polled before every directory entry.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scan `root` and aggregate sizes bottom-up.
    ///
    /// Unreadable subdirectories and entries are recorded in
    /// [`ScanOutcome::issues`] and count as zero bytes. Only a missing,
    /// non-directory or unlistable root fails the whole scan.
    pub fn build(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        let meta = fs::metadata(root).map_err(|source| ScanError::InvalidRoot {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ScanError::InvalidRoot {
                path: root.to_path_buf(),
                source: io::Error::other("Not a directory"),
            });
        }

        debug!(path = %root.display(), "descend");
        let mut fold = Fold::new(root);

        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
        for entry_result in walker {
            self.check_cancelled()?;
            match entry_result {
                Ok(entry) => {
                    let depth = entry.depth();
                    // Root is already on the stack
                    if depth == 0 {
                        continue;
                    }
                    fold.unwind_to(depth);

                    // Symlinks report their own file type here, so they
                    // are never descended into.
                    if entry.file_type().is_dir() {
                        debug!(path = %entry.path().display(), "descend");
                        fold.enter(depth, entry.file_name().to_os_string(), entry.path());
                        continue;
                    }

                    // Not following links, so this is lstat.
                    match entry.metadata() {
                        Ok(meta) => fold.current().node.size += meta.len(),
                        Err(error) => fold.record(ScanIssue::EntryStatFailure {
                            path: entry.path().to_path_buf(),
                            error,
                        }),
                    }
                }
                Err(err) => fold.absorb(err),
            }
        }

        fold.finish()
    }

    fn check_cancelled(&self) -> Result<(), ScanError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(ScanError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// A directory whose entries are still being accumulated.
struct Frame {
    depth: usize,
    name: OsString,
    path: PathBuf,
    node: TreeNode,
    unreadable: Option<walkdir::Error>,
}

impl Frame {
    fn new(depth: usize, name: OsString, path: &Path) -> Self {
        Self {
            depth,
            name,
            path: path.to_path_buf(),
            node: TreeNode::default(),
            unreadable: None,
        }
    }
}

/// Folds the pre-order walk into a tree. `open` holds the chain of
/// directories from just below the root down to the one being listed;
/// leaving a directory adds its total to its parent.
struct Fold {
    root: Frame,
    open: Vec<Frame>,
    issues: Vec<ScanIssue>,
}

impl Fold {
    fn new(root: &Path) -> Self {
        Self {
            root: Frame::new(0, OsString::new(), root),
            open: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut Frame {
        match self.open.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    fn enter(&mut self, depth: usize, name: OsString, path: &Path) {
        self.open.push(Frame::new(depth, name, path));
    }

    /// Close every open directory at `depth` or deeper.
    fn unwind_to(&mut self, depth: usize) {
        while self.open.last().is_some_and(|f| f.depth >= depth) {
            if let Some(frame) = self.open.pop() {
                self.close(frame);
            }
        }
    }

    fn close(&mut self, frame: Frame) {
        let node = match frame.unreadable {
            Some(error) => {
                self.record(ScanIssue::SubdirUnreadable {
                    path: frame.path,
                    error,
                });
                TreeNode::default()
            }
            None => frame.node,
        };
        let parent = self.current();
        parent.node.size += node.size;
        parent.node.children.insert(frame.name, node);
    }

    /// Attribute a walk error to the directory or entry it concerns.
    fn absorb(&mut self, err: walkdir::Error) {
        let depth = err.depth();

        // Opening a directory failed: the error carries that directory's
        // own depth and path, and it is still the innermost open frame.
        self.unwind_to(depth + 1);
        let current = self.current();
        if current.depth == depth && err.path() == Some(current.path.as_path()) {
            self.mark_unreadable(err);
            return;
        }

        self.unwind_to(depth);
        match err.path() {
            // Listing broke off midway; partial totals are discarded.
            None => self.mark_unreadable(err),
            Some(path) => {
                let path = path.to_path_buf();
                self.record(ScanIssue::EntryStatFailure { path, error: err });
            }
        }
    }

    /// Flag the innermost open directory. The first error is reported when
    /// the directory closes; any later one is recorded right away.
    fn mark_unreadable(&mut self, err: walkdir::Error) {
        let current = self.current();
        if current.unreadable.is_none() {
            current.unreadable = Some(err);
            return;
        }
        let path = current.path.clone();
        self.record(ScanIssue::SubdirUnreadable { path, error: err });
    }

    fn record(&mut self, issue: ScanIssue) {
        warn!("{issue}");
        self.issues.push(issue);
    }

    fn finish(mut self) -> Result<ScanOutcome, ScanError> {
        self.unwind_to(1);
        let Frame {
            path,
            node,
            unreadable,
            ..
        } = self.root;
        if let Some(source) = unreadable {
            return Err(ScanError::RootUnreadable { path, source });
        }
        Ok(ScanOutcome {
            root: node,
            issues: self.issues,
        })
    }
}
