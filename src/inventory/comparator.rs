use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::filesystem::Entry;
use crate::inventory::Inventory;

/// Where a key was found during a merge scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merged<'a, T> {
    LeftOnly(&'a T),
    RightOnly(&'a T),
    Both(&'a T, &'a T),
}

/// Single forward scan over two sorted slices, in key order.
///
/// Both slices must be sorted; the scan never looks back, so unsorted input
/// gives meaningless results rather than a panic in release builds.
#[derive(Debug, Clone)]
pub struct MergeIter<'a, T> {
    left: &'a [T],
    right: &'a [T],
}

impl<'a, T: Ord> MergeIter<'a, T> {
    pub fn new(left: &'a [T], right: &'a [T]) -> Self {
        debug_assert!(left.is_sorted(), "left input of merge scan is not sorted");
        debug_assert!(right.is_sorted(), "right input of merge scan is not sorted");
        Self { left, right }
    }
}

impl<'a, T: Ord> Iterator for MergeIter<'a, T> {
    type Item = Merged<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.left.split_first(), self.right.split_first()) {
            (None, None) => None,
            (Some((left, rest)), None) => {
                self.left = rest;
                Some(Merged::LeftOnly(left))
            }
            (None, Some((right, rest))) => {
                self.right = rest;
                Some(Merged::RightOnly(right))
            }
            (Some((left, left_rest)), Some((right, right_rest))) => match left.cmp(right) {
                Ordering::Less => {
                    self.left = left_rest;
                    Some(Merged::LeftOnly(left))
                }
                Ordering::Greater => {
                    self.right = right_rest;
                    Some(Merged::RightOnly(right))
                }
                Ordering::Equal => {
                    self.left = left_rest;
                    self.right = right_rest;
                    Some(Merged::Both(left, right))
                }
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower = self.left.len().max(self.right.len());
        (lower, Some(self.left.len() + self.right.len()))
    }
}

impl<T: Ord> FusedIterator for MergeIter<'_, T> {}

/// Elements of `a` whose key also appears in `b`, in `a`'s order.
pub fn intersection<'a, T: Ord>(a: &'a [T], b: &'a [T]) -> Vec<&'a T> {
    MergeIter::new(a, b)
        .filter_map(|merged| match merged {
            Merged::Both(left, _) => Some(left),
            _ => None,
        })
        .collect()
}

/// Elements of `a` whose key does not appear in `b`.
pub fn difference<'a, T: Ord>(a: &'a [T], b: &'a [T]) -> Vec<&'a T> {
    MergeIter::new(a, b)
        .filter_map(|merged| match merged {
            Merged::LeftOnly(left) => Some(left),
            _ => None,
        })
        .collect()
}

/// Classification of a target inventory against a source inventory.
#[derive(Debug, Default)]
pub struct Comparison<'a> {
    /// Target-side entries whose relative path also exists in the source.
    pub common: Vec<&'a Entry>,
    /// Present in the target only.
    pub added: Vec<&'a Entry>,
    /// Present in the source only.
    pub removed: Vec<&'a Entry>,
}

impl<'a> Comparison<'a> {
    pub fn of(target: &'a Inventory, source: &'a Inventory) -> Self {
        Self {
            common: intersection(target.entries(), source.entries()),
            added: difference(target.entries(), source.entries()),
            removed: difference(source.entries(), target.entries()),
        }
    }
}
