//! Render order for a page's elements.
//!
//! Elements are drawn in ascending `zIndex`; elements sharing a `zIndex`
//! keep the order in which they were inserted. The order is derived on every
//! read and never persisted as a separate sequence.

use crate::{Element, ElementSpec};

/// Anything stacked on a page by `zIndex`.
pub trait Stacked {
    fn z_index(&self) -> i64;
}

impl Stacked for Element {
    fn z_index(&self) -> i64 {
        self.z_index
    }
}

impl Stacked for ElementSpec {
    fn z_index(&self) -> i64 {
        self.z_index
    }
}

impl<T: Stacked + ?Sized> Stacked for &T {
    fn z_index(&self) -> i64 {
        (**self).z_index()
    }
}

/// Sorts `items` into render order in place.
///
/// `items` must already be in insertion order; the sort is stable, so ties
/// on `zIndex` keep that order.
pub fn sort_for_render<T: Stacked>(items: &mut [T]) {
    items.sort_by_key(Stacked::z_index);
}

/// Returns `items` in render order.
#[must_use]
pub fn render_order<T: Stacked>(mut items: Vec<T>) -> Vec<T> {
    sort_for_render(&mut items);
    items
}

/// Returns true if `items` are already in render order.
#[must_use]
pub fn is_render_ordered<T: Stacked>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0].z_index() <= pair[1].z_index())
}
