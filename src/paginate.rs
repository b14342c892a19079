//! Splits the date-sorted post list into front page listings.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// One page of a paginated listing. Page numbers are 1-indexed; `0` in
/// `prev`/`next` means there is no such page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'p, T> {
    pub num: usize,
    pub total: usize,
    pub prev: usize,
    pub next: usize,
    pub items: &'p [T],
}

/// `ceil(len / page_size)`.
pub fn num_pages(len: usize, page_size: NonZeroUsize) -> usize {
    let size = page_size.get();
    len / size + usize::from(len % size != 0)
}

/// Partitions `items` into consecutive pages of `page_size`. Page `i` holds
/// `items[(i-1)*n .. min(i*n, len)]`, so the pages concatenated in order are
/// exactly `items`. An empty list has no pages.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize) -> Vec<Chunk<'_, T>> {
    let total = num_pages(items.len(), page_size);
    items
        .chunks(page_size.get())
        .enumerate()
        .map(|(i, items)| {
            let num = i + 1;
            Chunk {
                num,
                total,
                prev: num - 1,
                next: if num == total { 0 } else { num + 1 },
                items,
            }
        })
        .collect()
}

/// Where listing page `num` is written: the site root for page 1, a
/// numbered subdirectory otherwise.
pub fn page_dir(root: &Path, num: usize) -> PathBuf {
    match num {
        0 | 1 => root.to_owned(),
        _ => root.join(num.to_string()),
    }
}
