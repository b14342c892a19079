//! Static pages: files from the theme folder that are either copied into
//! the site as-is or rendered through the page template.

use crate::build::{Error, Result};
use crate::task::{Generate, Site};
use crate::util::{copy_file, create_dir};
use crate::write::Page;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Copies and renders the configured static pages. Both maps go from a
/// source file in the theme folder to a destination in the site.
pub struct StaticsTask<'a> {
    site: Site<'a>,
    verbatim: BTreeMap<PathBuf, PathBuf>,
    templated: BTreeMap<PathBuf, PathBuf>,
}

impl<'a> StaticsTask<'a> {
    /// Resolves the configured `StaticPages` against the theme and
    /// destination folders.
    pub fn new(site: Site<'a>) -> StaticsTask<'a> {
        let config = site.config;
        let mut verbatim = BTreeMap::new();
        let mut templated = BTreeMap::new();
        for page in &config.static_pages {
            let from = config.theme_folder.join(&page.file);
            let to = config.dest_folder.join(&page.to);
            if page.is_template {
                templated.insert(from, to);
            } else {
                verbatim.insert(from, to);
            }
        }
        StaticsTask {
            site,
            verbatim,
            templated,
        }
    }

    /// A templated page becomes the `index.html` of the directory its
    /// destination lives in.
    fn render(&self, from: &Path, to: &Path) -> Result<()> {
        let dir = match to.parent() {
            Some(dir) => dir.to_owned(),
            None => self.site.dest().to_owned(),
        };
        create_dir(&dir)?;
        let content = std::fs::read_to_string(from).map_err(|err| Error::io(from, err))?;
        let title = title_from_path(from);
        self.site.writer().write(&Page {
            dir,
            title: &title,
            content,
            page_num: 0,
            max_page_num: 0,
            is_post: false,
        })?;
        Ok(())
    }
}

impl Generate for StaticsTask<'_> {
    fn describe(&self) -> String {
        String::from("statics")
    }

    fn generate(&self) -> Result<()> {
        for (from, to) in &self.verbatim {
            debug!(from = %from.display(), to = %to.display(), "copying static file");
            copy_file(from, to)?;
        }
        for (from, to) in &self.templated {
            debug!(from = %from.display(), to = %to.display(), "rendering static page");
            self.render(from, to)?;
        }
        Ok(())
    }
}

/// The file's base name with its first letter upper-cased:
/// `theme/about.html` becomes `About`.
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
