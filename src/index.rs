//! Tag and category indices: mappings from a lower-cased label to the posts
//! carrying it. An [`Index`] is built once from the date-sorted post list and
//! only read afterwards, by the tags/categories generators and the sitemap.

use crate::post::Post;
use crate::util::sort_desc_by_key;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Component, Path};
use tracing::warn;

/// Maps a lower-cased label to the posts carrying it. Within a bucket,
/// posts keep the order of the list the index was built from.
#[derive(Debug, Default)]
pub struct Index<'a> {
    buckets: HashMap<String, Vec<&'a Post>>,
}

/// One bucket of an [`Index`], borrowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label<'i, 'a> {
    pub name: &'i str,
    pub posts: &'i [&'a Post],
}

impl<'i, 'a> Label<'i, 'a> {
    pub fn count(&self) -> usize {
        self.posts.len()
    }
}

impl<'a> Index<'a> {
    /// Folds `posts` into buckets keyed by `labels(post)`, lower-cased. A
    /// post listing the same label twice (in any casing) lands in that
    /// bucket once. Labels that can't name a single directory (empty, `.`,
    /// `..`, or containing a path separator) are skipped.
    pub fn build<F>(posts: &[&'a Post], labels: F) -> Index<'a>
    where
        F: Fn(&'a Post) -> &'a [String],
    {
        let mut buckets: HashMap<String, Vec<&'a Post>> = HashMap::new();
        for &post in posts {
            let mut seen: Vec<String> = Vec::new();
            for label in labels(post) {
                if !is_valid_label(label) {
                    warn!(post = %post.name, label = %label, "skipping invalid label");
                    continue;
                }
                let key = label.to_lowercase();
                if seen.contains(&key) {
                    continue;
                }
                buckets.entry(key.clone()).or_default().push(post);
                seen.push(key);
            }
        }
        Index { buckets }
    }

    /// Indexes `posts` by their tags.
    pub fn tags(posts: &[&'a Post]) -> Index<'a> {
        Index::build(posts, |p| p.meta.tags.as_slice())
    }

    /// Indexes `posts` by their categories.
    pub fn categories(posts: &[&'a Post]) -> Index<'a> {
        Index::build(posts, |p| p.meta.categories.as_slice())
    }

    /// The buckets in output order: most posts first, ties broken by name.
    /// Anything that emits pages or entries per label iterates this instead
    /// of the underlying map.
    pub fn sorted(&self) -> Vec<Label<'_, 'a>> {
        let mut labels: Vec<Label> = self
            .buckets
            .iter()
            .map(|(name, posts)| Label {
                name: name.as_str(),
                posts: posts.as_slice(),
            })
            .collect();
        sort_desc_by_key(&mut labels, |l| (l.count(), Reverse(l.name)));
        labels
    }
}

/// Whether `label` names exactly one directory inside its section.
pub fn is_valid_label(label: &str) -> bool {
    if label.contains(|c: char| c == '/' || c == '\\') {
        return false;
    }
    let mut components = Path::new(label).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
