//! The tags and categories sections of the site. Both work the same way: an
//! index page listing every label with its post count, plus one listing page
//! per label.

use crate::build::Result;
use crate::index::{Index, Label};
use crate::listing::ListingTask;
use crate::task::{Generate, Site};
use crate::util::{clear_and_create, create_dir};
use crate::write::{text_value, Page, Template};
use gtmpl_value::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Which kind of label a section is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Tags,
    Categories,
}

impl Taxonomy {
    /// The section's directory under the site root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Taxonomy::Tags => "tags",
            Taxonomy::Categories => "categories",
        }
    }

    /// The title of the section's index page.
    pub fn title(self) -> &'static str {
        match self {
            Taxonomy::Tags => "Tags",
            Taxonomy::Categories => "Categories",
        }
    }

    /// The site-relative link to a label's listing page.
    pub fn link(self, label: &str) -> String {
        format!("/{}/{}/", self.dir_name(), label.to_lowercase())
    }
}

/// Writes a whole section: `{dest}/tags/index.html` and
/// `{dest}/tags/{tag}/index.html` for every tag (likewise for categories).
pub struct TaxonomyTask<'a> {
    pub site: Site<'a>,
    pub taxonomy: Taxonomy,
    pub index: &'a Index<'a>,
}

impl<'a> TaxonomyTask<'a> {
    fn dir(&self) -> PathBuf {
        self.site.dest().join(self.taxonomy.dir_name())
    }

    fn template(&self) -> &'a Template {
        match self.taxonomy {
            Taxonomy::Tags => &self.site.theme.tags,
            Taxonomy::Categories => &self.site.theme.categories,
        }
    }

    fn write_index(&self, labels: &[Label]) -> Result<()> {
        let content = self.template().render(labels_value(self.taxonomy, labels))?;
        self.site.writer().write(&Page {
            dir: self.dir(),
            title: self.taxonomy.title(),
            content,
            page_num: 0,
            max_page_num: 0,
            is_post: false,
        })?;
        Ok(())
    }

    fn write_label(&self, label: &Label<'a, 'a>) -> Result<()> {
        let dir = self.dir().join(label.name);
        create_dir(&dir)?;
        ListingTask {
            site: self.site,
            posts: label.posts,
            dir,
            title: label.name.to_owned(),
            page_num: 0,
            max_page_num: 0,
        }
        .generate()
    }
}

impl Generate for TaxonomyTask<'_> {
    fn describe(&self) -> String {
        self.taxonomy.dir_name().to_owned()
    }

    fn generate(&self) -> Result<()> {
        clear_and_create(&self.dir())?;
        let labels = self.index.sorted();
        self.write_index(&labels)?;
        for label in &labels {
            debug!(label = label.name, posts = label.count(), "writing label page");
            self.write_label(label)?;
        }
        Ok(())
    }
}

/// The value the section's index template is executed against: an array of
/// `{Name, Link, Count}` in the order given.
fn labels_value(taxonomy: Taxonomy, labels: &[Label]) -> Value {
    Value::Array(
        labels
            .iter()
            .map(|label| {
                let mut m: HashMap<String, Value> = HashMap::new();
                m.insert("Name".to_owned(), text_value(label.name));
                m.insert("Link".to_owned(), text_value(&taxonomy.link(label.name)));
                m.insert("Count".to_owned(), Value::from(label.count() as i64));
                Value::Object(m)
            })
            .collect(),
    )
}
