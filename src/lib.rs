//! The library code for the `folio` static blog generator. A run goes
//! through three steps:
//!
//! 1. Loading the content units on disk into [`post::Post`]s, sorted newest
//!    first ([`crate::post`]).
//! 2. Deriving the tag and category indices from the posts
//!    ([`crate::index`]).
//! 3. Generating the site: every output artifact (a post page, a front page,
//!    the archive, the tag and category sections, the sitemap, the RSS feed,
//!    the static pages) is produced by an independent task, and the tasks run
//!    concurrently on a bounded pool of workers ([`crate::task`]).
//!
//! All three steps share one read-only [`config::SiteConfig`], and every
//! task reads from the same sorted post list and indices, so every page is
//! consistent with every other.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod datasource;
pub mod feed;
pub mod index;
pub mod listing;
pub mod markdown;
pub mod paginate;
pub mod post;
pub mod sitemap;
pub mod statics;
pub mod task;
pub mod taxonomy;
pub mod util;
pub mod write;

#[cfg(test)]
pub(crate) mod testutil;
