use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use derive_more::Display;

use crate::ext::RelativeKeyExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    Directory,
    File,
}

/// One filesystem node discovered while walking a tree.
///
/// Identity is the relative key alone: two entries from different trees
/// are the same node when their keys are equal, whatever their kind.
#[derive(Debug, Clone)]
pub struct Entry {
    base_path: PathBuf,
    absolute_path: PathBuf,
    relative: PathBuf,
    relative_key: Vec<u8>,
    relative_display: String,
    kind: EntryKind,
}

impl Entry {
    pub fn new(base_path: &Path, absolute_path: PathBuf, kind: EntryKind) -> Self {
        let relative = absolute_path
            .strip_prefix(base_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| absolute_path.clone());
        let relative_key = relative.to_relative_key();
        let relative_display = relative.to_relative_display();

        Self {
            base_path: base_path.to_path_buf(),
            absolute_path,
            relative,
            relative_key,
            relative_display,
            kind,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Printable key such as `\sub\d.txt`. Matching and ordering use the
    /// raw bytes behind it.
    pub fn relative_path(&self) -> &str {
        &self.relative_display
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// The path this entry would have under another root.
    pub fn located_under(&self, root: &Path) -> PathBuf {
        self.relative.rebase_onto(root)
    }

    /// Native relative paths of every ancestor directory, outermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Path> {
        let mut ancestors = self
            .relative
            .ancestors()
            .skip(1)
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .collect::<Vec<_>>();
        ancestors.reverse();
        ancestors.into_iter()
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.relative_key == other.relative_key
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.relative_key.cmp(&other.relative_key)
    }
}

/// Renders the manifest form, e.g. `File: \c.txt`.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.relative_display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(relative: &str, kind: EntryKind) -> Entry {
        let base = Path::new("/trees/source");
        Entry::new(base, base.join(relative), kind)
    }

    #[test]
    fn test_relative_path_is_computed_against_base() {
        let entry = entry("sub/d.txt", EntryKind::File);

        assert_eq!(entry.relative_path(), "\\sub\\d.txt");
        assert_eq!(entry.base_path(), Path::new("/trees/source"));
        assert_eq!(entry.absolute_path(), Path::new("/trees/source/sub/d.txt"));
    }

    #[test]
    fn test_equality_ignores_kind() {
        let file = entry("shared", EntryKind::File);
        let directory = entry("shared", EntryKind::Directory);

        assert_eq!(file, directory);
        assert_eq!(file.cmp(&directory), Ordering::Equal);
    }

    #[test]
    fn test_entries_from_different_roots_match_by_relative_path() {
        let source = Entry::new(
            Path::new("/a"),
            PathBuf::from("/a/x/y.txt"),
            EntryKind::File,
        );
        let target = Entry::new(
            Path::new("/b/c"),
            PathBuf::from("/b/c/x/y.txt"),
            EntryKind::File,
        );

        assert_eq!(source, target);
    }

    #[test]
    fn test_ordering_is_by_relative_key_bytes() {
        let mut entries = vec![
            entry("b.txt", EntryKind::File),
            entry("a/z.txt", EntryKind::File),
            entry("a", EntryKind::Directory),
            entry("a.txt", EntryKind::File),
        ];
        entries.sort();

        let keys = entries.iter().map(Entry::relative_path).collect::<Vec<_>>();
        assert_eq!(keys, vec!["\\a", "\\a.txt", "\\a\\z.txt", "\\b.txt"]);
    }

    #[test]
    fn test_located_under_other_root() {
        let entry = entry("sub/d.txt", EntryKind::File);

        assert_eq!(
            entry.located_under(Path::new("/out")),
            Path::new("/out/sub/d.txt")
        );
    }

    #[test]
    fn test_ancestors_outermost_first() {
        let entry = entry("one/two/three.txt", EntryKind::File);

        let ancestors = entry.ancestors().collect::<Vec<_>>();
        assert_eq!(ancestors, vec![Path::new("one"), Path::new("one/two")]);
    }

    #[test]
    fn test_top_level_entry_has_no_ancestors() {
        assert_eq!(entry("a.txt", EntryKind::File).ancestors().count(), 0);
    }

    #[test]
    fn test_display_is_manifest_line() {
        assert_eq!(entry("c.txt", EntryKind::File).to_string(), "File: \\c.txt");
        assert_eq!(
            entry("gone", EntryKind::Directory).to_string(),
            "Directory: \\gone"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_names_that_render_alike_stay_distinct() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let base = Path::new("/trees/source");
        let first = Entry::new(
            base,
            base.join(OsStr::from_bytes(b"bad\xff")),
            EntryKind::File,
        );
        let second = Entry::new(
            base,
            base.join(OsStr::from_bytes(b"bad\xfe")),
            EntryKind::File,
        );

        assert_eq!(first.relative_path(), second.relative_path());
        assert_ne!(first, second);
        assert_eq!(second.cmp(&first), Ordering::Less);
    }
}
