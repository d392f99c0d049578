use std::path::{Path, PathBuf};

use crate::filesystem::Entry;

/// One tree's entries, sorted by relative path.
#[derive(Debug, Clone)]
pub struct Inventory {
    root: PathBuf,
    entries: Vec<Entry>,
    unreadable: Vec<PathBuf>,
}

impl Inventory {
    pub fn new(root: &Path, mut entries: Vec<Entry>, unreadable: Vec<PathBuf>) -> Self {
        entries.sort();
        Self {
            root: root.to_path_buf(),
            entries,
            unreadable,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Directories that could not be listed and were treated as empty.
    pub fn unreadable(&self) -> &[PathBuf] {
        &self.unreadable
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::EntryKind;

    #[test]
    fn test_new_sorts_entries() {
        let root = Path::new("/tree");
        let entries = ["z.txt", "sub/a.txt", "a.txt", "sub"]
            .into_iter()
            .map(|relative| Entry::new(root, root.join(relative), EntryKind::File))
            .collect();

        let inventory = Inventory::new(root, entries, Vec::new());

        assert!(inventory.entries().is_sorted());
        assert_eq!(inventory.len(), 4);
        assert!(!inventory.is_empty());
        assert_eq!(inventory.entries()[0].relative_path(), "\\a.txt");
        assert_eq!(inventory.root(), root);
    }

    #[test]
    fn test_empty_inventory() {
        let inventory = Inventory::new(Path::new("/nowhere"), Vec::new(), Vec::new());

        assert!(inventory.is_empty());
        assert_eq!(inventory.len(), 0);
        assert!(inventory.unreadable().is_empty());
    }
}
