//! Responsible for templating and writing the output HTML pages: one page
//! per post, plus the paginated listing pages.
//!
//! Every page is rendered fresh from its template plus data. Previously
//! generated output is never read back or patched in place, so regenerating
//! is idempotent and a structural drift in old output cannot poison new
//! output.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::paginate;
use crate::post::Post;

/// Placeholder tokens recognized in the single-post template.
const TITLE_TOKEN: &str = "{{TITLE}}";
const DATE_TOKEN: &str = "{{DATE}}";
const CONTENT_TOKEN: &str = "{{CONTENT}}";

/// Placeholder tokens recognized in the listing template.
const POSTS_TOKEN: &str = "{{POSTS}}";
const PAGINATION_TOKEN: &str = "{{PAGINATION}}";

/// Responsible for templating and writing HTML pages to disk from [`Post`]
/// data.
pub struct Writer<'a> {
    /// The single-post template, containing the [`TITLE_TOKEN`],
    /// [`DATE_TOKEN`], and [`CONTENT_TOKEN`] placeholders.
    pub post_template: &'a Path,

    /// The listing-page template, containing the [`POSTS_TOKEN`] and
    /// [`PAGINATION_TOKEN`] placeholders. Every listing page, the root
    /// included, is rendered from this template.
    pub listing_template: &'a Path,

    /// Root of the generated site. Page 1 of the listing lands at
    /// `{blog_dir}/index.html`, page `n` at `{blog_dir}/page/{n}/index.html`,
    /// and each post at `{blog_dir}/{slug}/index.html`.
    pub blog_dir: &'a Path,

    /// The number of posts per listing page.
    pub page_size: usize,

    /// Whether to HTML-escape title, date, and excerpt values on
    /// substitution. Rendered Markdown bodies are always substituted raw.
    pub escape_values: bool,
}

impl Writer<'_> {
    /// Renders a post page and writes it to `{blog_dir}/{slug}/index.html`,
    /// creating the slug directory as needed. Returns the output path.
    pub fn write_post_page(&self, post: &Post, html_body: &str) -> Result<PathBuf> {
        let template = load_template(self.post_template)?;
        let html = render_post(&template, &post.title, &post.date, html_body, self.escape_values);

        let post_dir = self.blog_dir.join(&post.slug);
        fs::create_dir_all(&post_dir)?;
        let output_path = post_dir.join("index.html");
        fs::write(&output_path, html)?;
        Ok(output_path)
    }

    /// Regenerates every listing page from the catalog: page 1 at the
    /// listing root, pages 2..N each in a numbered directory. Returns the
    /// number of pages written.
    pub fn write_listing_pages(&self, posts: &[Post]) -> Result<usize> {
        let template = load_template(self.listing_template)?;
        let total = paginate::total_pages(posts.len(), self.page_size);

        for page_number in 1..=total {
            let page_posts = paginate::page_slice(posts, page_number, self.page_size);
            let html = render_listing(&template, page_posts, page_number, total, self.escape_values);
            let path = self.listing_page_path(page_number);
            fs::create_dir_all(path.parent().unwrap())?; // listing paths always have a dir
            fs::write(&path, html)?;
            info!("Wrote listing page {}/{} to `{}`", page_number, total, path.display());
        }

        Ok(total)
    }

    /// Output location for 1-indexed listing page `page_number`.
    pub fn listing_page_path(&self, page_number: usize) -> PathBuf {
        match page_number {
            1 => self.blog_dir.join("index.html"),
            n => self
                .blog_dir
                .join("page")
                .join(n.to_string())
                .join("index.html"),
        }
    }
}

/// Substitutes the single-post template's placeholder tokens. The body is
/// already-rendered HTML and is always inserted raw; `escape_values`
/// controls the title and date.
pub fn render_post(
    template: &str,
    title: &str,
    date: &str,
    html_body: &str,
    escape_values: bool,
) -> String {
    template
        .replace(TITLE_TOKEN, &escape(title, escape_values))
        .replace(DATE_TOKEN, &escape(date, escape_values))
        .replace(CONTENT_TOKEN, html_body)
}

/// Renders one listing page: the entry list and the navigation controls
/// substituted into the listing template.
pub fn render_listing(
    template: &str,
    posts: &[Post],
    current_page: usize,
    total_pages: usize,
    escape_values: bool,
) -> String {
    template
        .replace(POSTS_TOKEN, &render_entries(posts, escape_values))
        .replace(
            PAGINATION_TOKEN,
            &paginate::render_controls(current_page, total_pages),
        )
}

/// Renders the `<ul class="blog-posts">` entry list for one page of posts,
/// or the empty-state placeholder when the catalog has no posts at all.
fn render_entries(posts: &[Post], escape_values: bool) -> String {
    if posts.is_empty() {
        return String::from(
            r#"<p class="no-posts">No blog posts yet. Create your first post!</p>"#,
        );
    }

    let mut entries = vec![String::from(r#"<ul class="blog-posts">"#)];
    for post in posts {
        entries.push(format!(
            "<li class=\"blog-post\">\n<h3><a href=\"{slug}/\">{title}</a></h3>\n<div class=\"date\">{date}</div>\n<p class=\"excerpt\">{excerpt}</p>\n</li>",
            slug = post.slug,
            title = escape(&post.title, escape_values),
            date = escape(&post.date, escape_values),
            excerpt = escape(&post.excerpt, escape_values),
        ));
    }
    entries.push(String::from("</ul>"));
    entries.join("\n")
}

fn escape(value: &str, escape_values: bool) -> String {
    if !escape_values {
        return value.to_owned();
    }
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// Loads a template file, annotating the failure with the path so the
// operator knows which template to create.
fn load_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| Error::Template {
        path: path.to_owned(),
        err,
    })
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// A template file could not be read.
    Template { path: PathBuf, err: io::Error },

    /// An error writing the output files.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template { path, err } => {
                write!(f, "Reading template `{}`: {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
