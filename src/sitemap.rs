//! Sitemap generation. The sitemap lists the site root, the fixed top-level
//! pages, every tag and category page, and every post along with the images
//! it carries (via the Google image sitemap extension).

use crate::build::{Error, Result};
use crate::config::SiteConfig;
use crate::index::Index;
use crate::post::{Post, IMAGES_DIR};
use crate::task::{Generate, Site};
use crate::taxonomy::Taxonomy;
use quick_xml::escape::escape;

pub const SITEMAP_FILE: &str = "sitemap.xml";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Top-level pages that always exist (or are expected to, for `about`).
const FIXED_PAGES: [&str; 4] = ["about", "archive", "tags", "categories"];

/// Writes `{dest}/sitemap.xml`.
pub struct SitemapTask<'a> {
    pub site: Site<'a>,
    pub posts: &'a [&'a Post],
    pub tags: &'a Index<'a>,
    pub categories: &'a Index<'a>,
}

impl Generate for SitemapTask<'_> {
    fn describe(&self) -> String {
        String::from("sitemap")
    }

    fn generate(&self) -> Result<()> {
        let xml = sitemap(self.site.config, self.posts, self.tags, self.categories);
        let path = self.site.dest().join(SITEMAP_FILE);
        std::fs::write(&path, xml).map_err(|err| Error::io(&path, err))
    }
}

struct Entry {
    loc: String,
    images: Vec<String>,
}

impl Entry {
    fn page(loc: String) -> Entry {
        Entry {
            loc,
            images: Vec::new(),
        }
    }
}

/// Renders the sitemap document. Tags and categories are visited in
/// [`Index::sorted`] order and posts in the order given, so the same input
/// always produces the same document.
pub fn sitemap(config: &SiteConfig, posts: &[&Post], tags: &Index, categories: &Index) -> String {
    let mut entries = vec![Entry::page(config.site_url(""))];
    entries.extend(
        FIXED_PAGES
            .iter()
            .map(|page| Entry::page(config.site_url(&format!("{}/", page)))),
    );
    for (taxonomy, index) in [(Taxonomy::Tags, tags), (Taxonomy::Categories, categories)] {
        entries.extend(
            index
                .sorted()
                .iter()
                .map(|label| Entry::page(config.site_url(&taxonomy.link(label.name)))),
        );
    }
    entries.extend(posts.iter().map(|post| Entry {
        loc: config.site_url(&format!("{}/", post.name)),
        images: post
            .images
            .iter()
            .map(|image| config.site_url(&format!("{}/{}/{}", post.name, IMAGES_DIR, image)))
            .collect(),
    }));

    let mut xml = String::with_capacity(256 * entries.len());
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<urlset xmlns=\"{}\" xmlns:image=\"{}\">\n",
        SITEMAP_NS, IMAGE_NS
    ));
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(entry.loc.as_str())));
        for image in entry.images {
            xml.push_str("    <image:image>\n");
            xml.push_str(&format!(
                "      <image:loc>{}</image:loc>\n",
                escape(image.as_str())
            ));
            xml.push_str("    </image:image>\n");
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{self, post};
    use std::path::Path;

    fn locs(xml: &str) -> Vec<&str> {
        xml.lines()
            .filter_map(|line| {
                let line = line.trim();
                line.strip_prefix("<loc>")
                    .and_then(|rest| rest.strip_suffix("</loc>"))
            })
            .collect()
    }

    #[test]
    fn test_sitemap() {
        let config = testutil::config(Path::new("./public"), Path::new("./theme"));
        let mut a = post("a", "2021-02-01", &["Rust", "web"], &["Code"]);
        a.images = vec![String::from("diagram.png"), String::from("x&y.jpg")];
        let b = post("b", "2021-01-01", &["rust"], &[]);
        let refs: Vec<&Post> = vec![&a, &b];
        let tags = Index::tags(&refs);
        let categories = Index::categories(&refs);

        let xml = sitemap(&config, &refs, &tags, &categories);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset"));
        assert_eq!(
            locs(&xml),
            vec![
                "https://example.com/",
                "https://example.com/about/",
                "https://example.com/archive/",
                "https://example.com/tags/",
                "https://example.com/categories/",
                "https://example.com/tags/rust/",
                "https://example.com/tags/web/",
                "https://example.com/categories/code/",
                "https://example.com/a/",
                "https://example.com/b/",
            ]
        );
        assert!(xml.contains(
            "<image:loc>https://example.com/a/images/diagram.png</image:loc>"
        ));
        assert!(xml.contains("<image:loc>https://example.com/a/images/x&amp;y.jpg</image:loc>"));
        assert_eq!(xml.matches("<image:image>").count(), 2);
    }

    #[test]
    fn test_sitemap_is_deterministic() {
        let config = testutil::config(Path::new("./public"), Path::new("./theme"));
        let posts: Vec<Post> = ["go", "rust", "zig", "c"]
            .iter()
            .enumerate()
            .map(|(i, &tag)| post(&format!("p{}", i), "2021-01-01", &[tag], &[tag]))
            .collect();
        let refs: Vec<&Post> = posts.iter().collect();

        let render = || {
            let tags = Index::tags(&refs);
            let categories = Index::categories(&refs);
            sitemap(&config, &refs, &tags, &categories)
        };
        let first = render();
        for _ in 0..10 {
            assert_eq!(render(), first);
        }
    }
}
