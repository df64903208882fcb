//! Exports the two operations wired to the command line: generating a
//! single post (which then rebuilds every listing page so the post shows
//! up) and rebuilding the listing pages alone. Also defines the top-level
//! error type aggregating the per-module errors.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::Config;
use crate::feed::{self, Error as FeedError, FeedConfig};
use crate::markdown;
use crate::post::{self, Error as PostError, Post};
use crate::write::{Error as WriteError, Writer};

/// Renders one post from `source` to `{blog_dir}/{slug}/index.html`, then
/// rebuilds every listing page so the post appears in (or updates its entry
/// in) the catalog. Returns the post page's output path.
///
/// The slug and source are validated up front: an invalid slug or a missing
/// source file fails before anything is written. A failure after the post
/// page is written (say, a missing listing template) leaves the post page
/// in place; there is no rollback across the multi-file rebuild.
pub fn generate_post(config: &Config, source: &Path, slug: &str) -> Result<PathBuf> {
    validate_slug(slug)?;
    if !source.exists() {
        return Err(Error::SourceNotFound(source.to_owned()));
    }

    let (post, body) = Post::from_file(source, slug)?;
    let html_body = markdown::render(&body);

    let writer = writer(config);
    let output_path = writer.write_post_page(&post, &html_body)?;
    info!("Generated: `{}`", output_path.display());
    info!("Clean URL: /{}/{}/", config.blog_dir.display(), slug);

    rebuild_listing_with(config, &writer)?;
    info!("Updated blog listing");
    Ok(output_path)
}

/// Rescans the source directory and regenerates every listing page (and the
/// Atom feed, when a site URL is configured), with no single-post side
/// effects. This is the `--regenerate-pagination` entry point.
pub fn rebuild_listing(config: &Config) -> Result<()> {
    rebuild_listing_with(config, &writer(config))
}

fn writer(config: &Config) -> Writer {
    Writer {
        post_template: &config.post_template,
        listing_template: &config.listing_template,
        blog_dir: &config.blog_dir,
        page_size: config.posts_per_page,
        escape_values: config.escape_html,
    }
}

fn rebuild_listing_with(config: &Config, writer: &Writer) -> Result<()> {
    let posts = post::scan_posts(&config.source_dir)?;
    let pages = writer.write_listing_pages(&posts)?;
    info!("Generated {} page(s) with {} total posts", pages, posts.len());

    if let Some(site_url) = &config.site_url {
        let feed_config = FeedConfig {
            title: config.title.clone(),
            site_url: site_url.clone(),
        };
        let path = config.blog_dir.join("feed.atom");
        feed::write_feed(&feed_config, &posts, File::create(&path)?)?;
        info!("Wrote feed to `{}`", path.display());
    }

    Ok(())
}

// Slugs become path segments and clean URLs; anything outside the slug
// charset is rejected before a single file is written.
fn validate_slug(slug: &str) -> Result<()> {
    if post::is_valid_slug(slug) {
        return Ok(());
    }
    Err(Error::InvalidSlug {
        slug: slug.to_owned(),
        suggestion: slug::slugify(slug),
    })
}

/// The result of a top-level build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for the top-level operations. Errors can come from slug
/// validation, post loading, page writing, feed generation, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// The operator-provided url slug contains characters outside
    /// `[a-z0-9-]`.
    InvalidSlug { slug: String, suggestion: String },

    /// The Markdown source file does not exist.
    SourceNotFound(PathBuf),

    /// Returned for errors loading the post source.
    Post(PostError),

    /// Returned for errors writing post or listing pages.
    Write(WriteError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidSlug { slug, suggestion } => write!(
                f,
                "URL path `{}` must contain only lowercase letters, numbers, and hyphens (try `{}`)",
                slug, suggestion
            ),
            Error::SourceNotFound(path) => {
                write!(f, "Source file not found: `{}`", path.display())
            }
            Error::Post(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidSlug { .. } => None,
            Error::SourceNotFound(_) => None,
            Error::Post(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<PostError> for Error {
    /// Converts [`PostError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: PostError) -> Error {
        Error::Post(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    /// Lays out a blog root with templates and a markdown source directory
    /// inside `dir`, returning the matching configuration.
    fn test_config(dir: &Path, posts_per_page: usize) -> Config {
        let blog_dir = dir.join("blog");
        fs::create_dir_all(blog_dir.join("markdown")).unwrap();
        fs::write(
            blog_dir.join("template.html"),
            "<article><h2>{{TITLE}}</h2><time>{{DATE}}</time>{{CONTENT}}</article>",
        )
        .unwrap();
        fs::write(
            blog_dir.join("listing.html"),
            "<section class=\"blog\">\n{{POSTS}}\n{{PAGINATION}}\n</section>",
        )
        .unwrap();
        Config {
            source_dir: blog_dir.join("markdown"),
            post_template: blog_dir.join("template.html"),
            listing_template: blog_dir.join("listing.html"),
            posts_per_page,
            title: String::from("Test Blog"),
            site_url: None,
            escape_html: true,
            blog_dir,
        }
    }

    fn write_source(config: &Config, slug: &str, title: &str, date: &str) -> PathBuf {
        let path = config.source_dir.join(format!("{}.md", slug));
        fs::write(
            &path,
            format!("---\ntitle: {}\ndate: {}\n---\n# {}\n**bold** text", title, date, title),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_generate_post_writes_page_and_listing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = test_config(dir.path(), 5);
        let source = write_source(&config, "hello-world", "Hello World", "January 1, 2024");

        let output = generate_post(&config, &source, "hello-world")?;
        assert_eq!(output, config.blog_dir.join("hello-world/index.html"));

        let page = fs::read_to_string(&output)?;
        assert!(page.contains("<h2>Hello World</h2>"));
        assert!(page.contains("<h1>Hello World</h1>\n<strong>bold</strong> text"));

        let listing = fs::read_to_string(config.blog_dir.join("index.html"))?;
        assert!(listing.contains(r#"<a href="hello-world/">Hello World</a>"#));
        Ok(())
    }

    #[test]
    fn test_generate_post_rejects_invalid_slug_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 5);
        let source = write_source(&config, "valid", "Valid", "January 1, 2024");

        match generate_post(&config, &source, "Bad Slug!") {
            Err(Error::InvalidSlug { slug, suggestion }) => {
                assert_eq!(slug, "Bad Slug!");
                assert_eq!(suggestion, "bad-slug");
            }
            other => panic!("wanted InvalidSlug, got {:?}", other),
        }
        // Nothing was generated.
        assert!(!config.blog_dir.join("index.html").exists());
        assert!(!config.blog_dir.join("Bad Slug!").exists());
    }

    #[test]
    fn test_generate_post_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 5);

        match generate_post(&config, &config.source_dir.join("nope.md"), "nope") {
            Err(Error::SourceNotFound(_)) => {}
            other => panic!("wanted SourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_post_missing_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 5);
        let path = config.source_dir.join("bare.md");
        fs::write(&path, "no frontmatter at all").unwrap();

        match generate_post(&config, &path, "bare") {
            Err(Error::Post(PostError::MissingMetadata(_))) => {}
            other => panic!("wanted MissingMetadata, got {:?}", other),
        }
        assert!(!config.blog_dir.join("bare").exists());
    }

    #[test]
    fn test_rebuild_listing_paginates_catalog() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = test_config(dir.path(), 5);
        for i in 0..12 {
            // Posts 01..12, newest last by date so the listing order is
            // post-12 first.
            write_source(
                &config,
                &format!("post-{:02}", i + 1),
                &format!("Post {}", i + 1),
                &format!("January {}, 2024", i + 1),
            );
        }

        rebuild_listing(&config)?;

        let root = fs::read_to_string(config.blog_dir.join("index.html"))?;
        assert!(root.contains("post-12/"));
        assert!(root.contains("post-08/"));
        assert!(!root.contains("post-07/"));

        let page2 = fs::read_to_string(config.blog_dir.join("page/2/index.html"))?;
        assert!(page2.contains("post-07/"));
        assert!(page2.contains("post-03/"));

        let page3 = fs::read_to_string(config.blog_dir.join("page/3/index.html"))?;
        assert!(page3.contains("post-02/"));
        assert!(page3.contains("post-01/"));
        assert!(page3.contains(r#"<span class="pagination-btn disabled">Next →</span>"#));
        Ok(())
    }

    #[test]
    fn test_rebuild_listing_empty_catalog_still_writes_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = test_config(dir.path(), 5);

        rebuild_listing(&config)?;

        let root = fs::read_to_string(config.blog_dir.join("index.html"))?;
        assert!(root.contains(r#"<p class="no-posts">No blog posts yet."#));
        assert!(!config.blog_dir.join("page").exists());
        Ok(())
    }

    #[test]
    fn test_regenerating_updated_post_replaces_listing_entry() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = test_config(dir.path(), 5);
        let source = write_source(&config, "hello", "First Title", "January 1, 2024");
        generate_post(&config, &source, "hello")?;

        // Rewrite the same source under the same slug and regenerate.
        write_source(&config, "hello", "Second Title", "January 1, 2024");
        generate_post(&config, &source, "hello")?;

        let listing = fs::read_to_string(config.blog_dir.join("index.html"))?;
        assert!(listing.contains("Second Title"));
        assert!(!listing.contains("First Title"));
        assert_eq!(listing.matches(r#"href="hello/""#).count(), 1);
        Ok(())
    }

    #[test]
    fn test_generate_post_missing_listing_template_keeps_post_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path(), 5);
        config.listing_template = dir.path().join("missing-listing.html");
        let source = write_source(&config, "hello", "Hello", "January 1, 2024");

        match generate_post(&config, &source, "hello") {
            Err(Error::Write(WriteError::Template { .. })) => {}
            other => panic!("wanted Template error, got {:?}", other),
        }
        // The post page stays; the invocation fails without rolling it
        // back.
        assert!(config.blog_dir.join("hello/index.html").exists());
    }

    #[test]
    fn test_rebuild_listing_writes_feed_when_site_url_set() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut config = test_config(dir.path(), 5);
        config.site_url = Some(String::from("https://example.com/blog"));
        write_source(&config, "hello", "Hello", "January 1, 2024");

        rebuild_listing(&config)?;

        let feed = fs::read_to_string(config.blog_dir.join("feed.atom"))?;
        assert!(feed.contains("Test Blog"));
        assert!(feed.contains("https://example.com/blog/hello/"));
        Ok(())
    }
}
