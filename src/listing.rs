//! Listing pages: the paginated front page, the archive, and the per-tag and
//! per-category pages all render a list of post summaries through the
//! theme's `short.html` and wrap the result in the page template.

use crate::build::Result;
use crate::post::Post;
use crate::task::{Generate, Site};
use crate::taxonomy::Taxonomy;
use crate::util::create_dir;
use crate::write::{self, text_value, Page, Template};
use gtmpl_value::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Separates summary blocks in a listing.
const SEPARATOR: &str = "<br />";

/// Writes one listing page.
pub struct ListingTask<'a> {
    pub site: Site<'a>,
    pub posts: &'a [&'a Post],
    pub dir: PathBuf,
    pub title: String,

    /// 1-indexed position among the front pages; `0` for listings that
    /// aren't paginated.
    pub page_num: usize,
    pub max_page_num: usize,
}

impl Generate for ListingTask<'_> {
    fn describe(&self) -> String {
        format!("listing `{}`", self.dir.display())
    }

    fn generate(&self) -> Result<()> {
        create_dir(&self.dir)?;
        let content = render_summaries(&self.site.theme.short, self.posts)?;
        self.site.writer().write(&Page {
            dir: self.dir.clone(),
            title: &self.title,
            content,
            page_num: self.page_num,
            max_page_num: self.max_page_num,
            is_post: false,
        })?;
        Ok(())
    }
}

/// Renders each post through `short` and joins the blocks.
pub fn render_summaries(short: &Template, posts: &[&Post]) -> write::Result<String> {
    let blocks = posts
        .iter()
        .map(|post| short.render(summary_value(post)))
        .collect::<write::Result<Vec<String>>>()?;
    Ok(blocks.join(SEPARATOR))
}

/// The value `short.html` is executed against.
fn summary_value(post: &Post) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("Title".to_owned(), text_value(&post.meta.title));
    m.insert("Date".to_owned(), text_value(&post.meta.date));
    m.insert("Short".to_owned(), text_value(&post.meta.short));
    m.insert("Link".to_owned(), text_value(&format!("/{}/", post.name)));
    m.insert("TimeToRead".to_owned(), Value::String(time_to_read(&post.html)));
    m.insert(
        "Tags".to_owned(),
        label_values(Taxonomy::Tags, &post.meta.tags),
    );
    m.insert(
        "Categories".to_owned(),
        label_values(Taxonomy::Categories, &post.meta.categories),
    );
    Value::Object(m)
}

fn label_values(taxonomy: Taxonomy, labels: &[String]) -> Value {
    Value::Array(
        labels
            .iter()
            .map(|label| {
                let mut m: HashMap<String, Value> = HashMap::new();
                m.insert("Name".to_owned(), text_value(label));
                m.insert("Link".to_owned(), text_value(&taxonomy.link(label)));
                Value::Object(m)
            })
            .collect(),
    )
}

/// Estimated reading time as `"{minutes}m"`: 200 words a minute plus 12
/// seconds per image, never less than a minute.
pub fn time_to_read(html: &str) -> String {
    const SECONDS_PER_WORD: f64 = 60.0 / 200.0;
    const SECONDS_PER_IMAGE: f64 = 12.0;

    let words = html.split(' ').count() as f64 * SECONDS_PER_WORD;
    let images = html.matches("<img").count() as f64 * SECONDS_PER_IMAGE;
    let minutes = ((words + images) / 60.0).max(1.0);
    format!("{:.0}m", minutes)
}
