use folio::build::{build_site, ErrorKind};
use folio::config::{SiteConfig, StaticPage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

struct Fixture {
    _tmp: TempDir,
    config: SiteConfig,
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn unit(root: &Path, name: &str, date: &str, tags: &str, categories: &str) {
    write(
        &root.join(name).join("meta.yml"),
        &format!(
            "title: {}\nshort: About {}\ndate: {}\ntags: [{}]\ncategories: [{}]\n",
            name, name, date, tags, categories
        ),
    );
    write(
        &root.join(name).join("post.md"),
        &format!("# {}\n\nSome *text*.\n", name),
    );
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let theme = tmp.path().join("theme");
    write(
        &theme.join("template.html"),
        "<title>{{.HTMLTitle}}</title>\
         <link rel=\"canonical\" href=\"{{.CanonicalLink}}\">\
         <p>{{.PageNum}}/{{.PrevPageNum}}/{{.NextPageNum}}</p>\
         {{.Content}}",
    );
    write(
        &theme.join("short.html"),
        "<a href=\"{{.Link}}\">{{.Title}}</a> {{.TimeToRead}}",
    );
    write(
        &theme.join("tags.html"),
        "{{range .}}<a href=\"{{.Link}}\">{{.Name}} ({{.Count}})</a>{{end}}",
    );
    write(
        &theme.join("categories.html"),
        "{{range .}}<a href=\"{{.Link}}\">{{.Name}} ({{.Count}})</a>{{end}}",
    );
    write(&theme.join("about.html"), "<p>Who I am</p>");
    write(&theme.join("robots.txt"), "User-agent: *");

    let posts = tmp.path().join("tmp");
    unit(&posts, "first-post", "2021-01-10 08:00:00", "Rust", "Code");
    unit(&posts, "second-post", "2021-02-10 08:00:00", "rust, Web", "Code");
    unit(&posts, "third-post", "2021-03-10 08:00:00", "Life", "Misc");
    write(&posts.join("first-post/images/cat.png"), "meow");
    write(&posts.join("first-post/slides.pdf"), "pdf");

    let mut config = SiteConfig::from_yaml(
        "Author: Jane Doe\n\
         BlogURL: https://blog.example.com\n\
         BlogTitle: Notes\n\
         BlogLanguage: en-us\n\
         BlogDescription: Things I wrote down\n\
         NumPostsFrontPage: 2\n",
    )
    .unwrap();
    config.temp_folder = posts;
    config.theme_folder = theme;
    config.dest_folder = tmp.path().join("public");
    config.static_pages = vec![
        StaticPage {
            file: PathBuf::from("about.html"),
            to: PathBuf::from("about/index.html"),
            is_template: true,
        },
        StaticPage {
            file: PathBuf::from("robots.txt"),
            to: PathBuf::from("robots.txt"),
            is_template: false,
        },
    ];
    Fixture { _tmp: tmp, config }
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path))
        .unwrap_or_else(|e| panic!("reading {}: {}", root.join(path).display(), e))
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            (
                entry.path().strip_prefix(root).unwrap().to_owned(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_site_layout() {
    let fixture = fixture();
    build_site(&fixture.config).unwrap();
    let dest = &fixture.config.dest_folder;

    // front pages, newest first
    let front = read(dest, "index.html");
    assert!(front.starts_with("<title>Notes</title>"));
    assert!(front.contains("<link rel=\"canonical\" href=\"/\">"));
    assert!(front.contains("<p>1/0/2</p>"));
    assert!(front.find("third-post").unwrap() < front.find("second-post").unwrap());
    assert!(!front.contains("first-post"));

    let second = read(dest, "2/index.html");
    assert!(second.contains("<p>2/1/0</p>"));
    assert!(second.contains("href=\"https://blog.example.com/2/index.html\""));
    assert!(second.contains("<a href=\"/first-post/\">first-post</a> 1m"));
    assert!(!dest.join("3").exists());

    let archive = read(dest, "archive/index.html");
    assert!(archive.starts_with("<title>Archive - Notes</title>"));
    assert_eq!(archive.matches("<br />").count(), 2);

    // labels are case-folded and sorted by count
    let tags = read(dest, "tags/index.html");
    assert!(tags.ends_with(
        "<a href=\"/tags/rust/\">rust (2)</a>\
         <a href=\"/tags/life/\">life (1)</a>\
         <a href=\"/tags/web/\">web (1)</a>"
    ));
    assert!(read(dest, "tags/rust/index.html").contains("first-post"));
    assert!(read(dest, "categories/code/index.html").contains("second-post"));
    assert!(read(dest, "categories/misc/index.html").contains("third-post"));

    // posts, with their images and artifacts
    let post = read(dest, "first-post/index.html");
    assert!(post.starts_with("<title>first-post - Notes</title>"));
    assert!(post.contains("<h1>first-post</h1>"));
    assert!(post.contains("<em>text</em>"));
    assert_eq!(read(dest, "first-post/images/cat.png"), "meow");
    assert_eq!(read(dest, "first-post/slides.pdf"), "pdf");
    assert!(!dest.join("first-post/meta.yml").exists());

    // statics
    assert!(read(dest, "about/index.html").contains("<title>About - Notes</title>"));
    assert_eq!(read(dest, "robots.txt"), "User-agent: *");

    // feeds
    let sitemap = read(dest, "sitemap.xml");
    assert!(sitemap.contains("<loc>https://blog.example.com/tags/web/</loc>"));
    assert!(sitemap.contains(
        "<image:loc>https://blog.example.com/first-post/images/cat.png</image:loc>"
    ));
    let rss = read(dest, "index.xml");
    assert!(rss.contains("<link>https://blog.example.com/third-post/</link>"));
    assert!(rss.contains("10 Mar 2021 08:00 +0000"));
}

#[test]
fn test_rebuild_is_identical() {
    let fixture = fixture();
    let dest = &fixture.config.dest_folder;

    build_site(&fixture.config).unwrap();
    let first = snapshot(dest);
    fs::write(dest.join("leftover.html"), "stale").unwrap();

    build_site(&fixture.config).unwrap();
    let second = snapshot(dest);
    assert_eq!(first, second);
}

#[test]
fn test_bad_date_aborts_the_run() {
    let fixture = fixture();
    let dest = &fixture.config.dest_folder;
    write(&dest.join("index.html"), "previous build");
    unit(
        &fixture.config.temp_folder,
        "broken-post",
        "March 3rd",
        "",
        "",
    );

    let err = build_site(&fixture.config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    // nothing was touched
    assert_eq!(read(dest, "index.html"), "previous build");
}

#[test]
fn test_missing_template() {
    let fixture = fixture();
    fs::remove_file(fixture.config.theme_folder.join("short.html")).unwrap();

    let err = build_site(&fixture.config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Template);
}

#[test]
fn test_template_execution_error() {
    let fixture = fixture();
    // `Count` is a number, so it has no fields
    write(
        &fixture.config.theme_folder.join("tags.html"),
        "{{range .}}{{.Count.Value}}{{end}}",
    );

    let err = build_site(&fixture.config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Template);
    // the other tasks still ran
    assert!(fixture
        .config
        .dest_folder
        .join("first-post/index.html")
        .exists());
}
