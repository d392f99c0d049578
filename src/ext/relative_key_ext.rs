use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Separator used when rendering a relative path as a comparison key.
const KEY_SEPARATOR: char = '\\';

fn normal_names(relative: &Path) -> impl Iterator<Item = &OsStr> {
    relative.components().filter_map(|component| match component {
        Component::Normal(name) => Some(name),
        _ => None,
    })
}

/// Renders a path relative to a walk root as a `\`-separated key with a
/// leading separator, e.g. `sub/d.txt` becomes `\sub\d.txt`.
///
/// The key keeps the raw bytes of every name, so distinct names never share
/// a key even when they are not valid UTF-8. The rendering is the same on
/// every platform, so two trees compare and sort identically no matter where
/// they were walked.
pub fn relative_key(relative: &Path) -> Vec<u8> {
    normal_names(relative).fold(Vec::new(), |mut key, name| {
        key.push(KEY_SEPARATOR as u8);
        key.extend_from_slice(name.as_encoded_bytes());
        key
    })
}

/// Printable form of [`relative_key`]; names that are not UTF-8 are
/// rendered lossily.
pub fn relative_display(relative: &Path) -> String {
    normal_names(relative).fold(String::new(), |mut rendered, name| {
        rendered.push(KEY_SEPARATOR);
        rendered.push_str(&name.to_string_lossy());
        rendered
    })
}

pub trait RelativeKeyExt {
    fn to_relative_key(&self) -> Vec<u8>;

    fn to_relative_display(&self) -> String;

    /// Joins every normal component of `self` onto `root`.
    fn rebase_onto(&self, root: &Path) -> PathBuf;
}

impl RelativeKeyExt for Path {
    fn to_relative_key(&self) -> Vec<u8> {
        relative_key(self)
    }

    fn to_relative_display(&self) -> String {
        relative_display(self)
    }

    fn rebase_onto(&self, root: &Path) -> PathBuf {
        normal_names(self).fold(root.to_path_buf(), |mut path, name| {
            path.push(name);
            path
        })
    }
}

impl RelativeKeyExt for PathBuf {
    fn to_relative_key(&self) -> Vec<u8> {
        relative_key(self)
    }

    fn to_relative_display(&self) -> String {
        relative_display(self)
    }

    fn rebase_onto(&self, root: &Path) -> PathBuf {
        self.as_path().rebase_onto(root)
    }
}
