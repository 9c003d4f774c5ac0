//! Set algebra over insertion-ordered sets
//!
//! All operations borrow their inputs and return a fresh set. Results keep the
//! iteration order of the left operand, so anything rendered from them is
//! stable between runs.

use indexmap::IndexSet;
use std::hash::Hash;

/// Elements of `a` that are not in `b`.
pub fn subtract<T: Hash + Eq + Clone>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    a.iter().filter(|item| !b.contains(*item)).cloned().collect()
}

/// Elements of `a` followed by the elements of `b` not already in `a`.
pub fn union<T: Hash + Eq + Clone>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    let mut result = a.clone();
    result.extend(b.iter().cloned());
    result
}

/// Elements present in both `a` and `b`, in `a`'s order.
pub fn intersect<T: Hash + Eq + Clone>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    a.iter().filter(|item| b.contains(*item)).cloned().collect()
}
