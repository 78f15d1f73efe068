//! Filesystem traversal and tree assembly.
//!
//! One scan is a synchronous depth-first walk. Every directory entry is
//! classified before it is materialized: hidden directories are dropped
//! unconditionally, everything else is checked against the scan root's
//! compiled `.gitignore`. Pruned entries are expressed as a `None` return
//! collected away by the parent, never as an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::ignore_file::load_gitignore;
use super::pattern::PatternSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One node of the produced tree. The root's `name` is an absolute path,
/// descendant names are base names. File leaves serialize without a
/// `children` field.
#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    fn file(name: String) -> Self {
        TreeNode {
            name,
            kind: NodeKind::File,
            children: None,
        }
    }

    fn directory(name: String, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name,
            kind: NodeKind::Directory,
            children: Some(children),
        }
    }
}

/// Per-scan constants: the fixed base for relative-path computation and the
/// compiled ignore patterns, if any. The base never changes across recursion
/// levels, so gitignore matching is always relative to the top of the scan.
pub struct ScanContext {
    base: PathBuf,
    patterns: Option<PatternSet>,
}

impl ScanContext {
    pub fn new(base: impl Into<PathBuf>, patterns: Option<PatternSet>) -> Self {
        ScanContext {
            base: base.into(),
            patterns,
        }
    }
}

/// Decide whether `path` is excluded from the tree. Hidden directories are
/// excluded before any pattern is consulted; files only ever fall to the
/// pattern check. The scan root itself is never passed here.
pub fn should_ignore(path: &Path, ctx: &ScanContext) -> bool {
    let is_dir = path.is_dir();

    if is_dir {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            return true;
        }
    }

    if let Some(patterns) = &ctx.patterns {
        let Ok(relative) = path.strip_prefix(&ctx.base) else {
            return false;
        };
        let mut candidate = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if is_dir {
            candidate.push('/');
        }
        return patterns.matches(&candidate, is_dir);
    }

    false
}

/// Build the tree rooted at `path`. Classification is skipped only for the
/// root call: the scan root is supplied by the caller, not discovered during
/// the walk, so it is always included even if hidden or matched by a
/// pattern. Returns `None` when a non-root `path` is excluded.
pub fn build_tree(path: &Path, ctx: &ScanContext, is_root: bool) -> Option<TreeNode> {
    if !is_root && should_ignore(path, ctx) {
        return None;
    }

    let name = if is_root {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        absolute.to_string_lossy().into_owned()
    } else {
        path.file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .into_owned()
    };

    if path.is_file() {
        return Some(TreeNode::file(name));
    }

    // Anything that is not a plain file is listed as a directory. A listing
    // failure (permission denied, entry vanished mid-walk) degrades to an
    // empty directory rather than aborting the scan.
    let mut entries: Vec<_> = match fs::read_dir(path) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.file_name()).collect(),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "unreadable directory");
            Vec::new()
        }
    };
    entries.sort();

    let mut children = Vec::new();
    for entry in entries {
        let child_path = path.join(&entry);
        if let Some(child) = build_tree(&child_path, ctx, false) {
            children.push(child);
        }
    }

    Some(TreeNode::directory(name, children))
}

/// Scan `directory` and return the JSON text of the tree, or the structured
/// "directory not found" object when the path does not exist. This is the
/// only place that distinguishes the two outcomes; every failure inside the
/// walk degrades locally instead.
pub fn scan_directory(directory: &str) -> String {
    let path = Path::new(directory);
    if !path.exists() {
        return to_json(&serde_json::json!({"error": "directory not found"}));
    }

    let patterns = load_gitignore(path);
    let ctx = ScanContext::new(path, patterns);
    let tree = build_tree(path, &ctx, true);
    to_json(&tree)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
