//! Defines the [`Post`] record and the catalog scan that derives an ordered
//! list of posts from a directory of Markdown sources.
//!
//! Nothing here is cached between runs. The catalog is rebuilt from the
//! source directory on every invocation, which is what lets the listing
//! pages be regenerated idempotently.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use crate::frontmatter;

const MARKDOWN_EXTENSION: &str = "md";

/// The display format posts carry in their `date` key, e.g.
/// `January 1, 2024`.
const DATE_FORMAT: &str = "%B %d, %Y";

lazy_static! {
    static ref SLUG: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Whether `slug` is safe to use as a path segment, a clean URL, and a raw
/// `href` value: lowercase letters, digits, and hyphens only. Enforced for
/// operator-provided url paths and for file stems picked up by the catalog
/// scan alike.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG.is_match(slug)
}

/// A single blog post, reconstructed from its source file on every run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// Display title, taken verbatim from the `title` frontmatter key.
    pub title: String,

    /// Display date, preserved verbatim even when it fails to parse.
    pub date: String,

    /// The date as parsed for ordering. A `date` value that does not match
    /// [`DATE_FORMAT`] falls back to today, which sorts the post to the top
    /// of the listing.
    pub sort_date: NaiveDate,

    /// Listing blurb. Derived from the title when the `excerpt` key is
    /// absent.
    pub excerpt: String,

    /// URL path segment for the post. In a catalog scan this is the source
    /// file's base name; when generating a single post it is the
    /// operator-provided url path.
    pub slug: String,

    /// The originating source file. A lookup key, not owned data.
    pub source_path: PathBuf,
}

impl Post {
    /// Loads a single post, returning the parsed record together with its
    /// body text. Unlike the catalog scan, missing metadata here is a hard
    /// error: this is the post the operator asked to generate.
    pub fn from_file(path: &Path, slug: &str) -> Result<(Post, String), Error> {
        let content = fs::read_to_string(path)?;
        let (meta, body) = frontmatter::parse(&content);
        match Post::from_meta(path, slug, &meta) {
            Some(post) => Ok((post, body.to_owned())),
            None => Err(Error::MissingMetadata(path.to_owned())),
        }
    }

    /// Builds a [`Post`] from a parsed metadata mapping, or `None` when the
    /// required `title` or `date` key is absent.
    fn from_meta(
        source_path: &Path,
        slug: &str,
        meta: &BTreeMap<String, String>,
    ) -> Option<Post> {
        let title = meta.get("title")?;
        let date = meta.get("date")?;
        let excerpt = match meta.get("excerpt") {
            Some(excerpt) => excerpt.clone(),
            None => format!("Read about {} and more insights.", title.to_lowercase()),
        };
        Some(Post {
            title: title.clone(),
            date: date.clone(),
            sort_date: parse_sort_date(date),
            excerpt,
            slug: slug.to_owned(),
            source_path: source_path.to_owned(),
        })
    }
}

/// Parses a display date for ordering, falling back to today for anything
/// unparsable. The fallback is ordering-only; the display string is never
/// rewritten.
fn parse_sort_date(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .unwrap_or_else(|_| Local::now().date_naive())
}

/// Walks `source_dir` (non-recursively) and returns the catalog of posts,
/// newest first. A file that cannot be read or that lacks the required
/// metadata is warned about and skipped; one bad post must not abort
/// generation of the rest. Only the directory itself being unreadable is an
/// error.
pub fn scan_posts(source_dir: &Path) -> io::Result<Vec<Post>> {
    let mut posts = Vec::new();

    for result in fs::read_dir(source_dir)? {
        let entry = result?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(MARKDOWN_EXTENSION) {
            continue;
        }
        let slug = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_owned(),
            None => {
                warn!("Skipping `{}`: file name is not valid UTF-8", path.display());
                continue;
            }
        };
        if !is_valid_slug(&slug) {
            warn!(
                "Skipping `{}`: file stem must contain only lowercase letters, numbers, and hyphens",
                path.display()
            );
            continue;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Could not parse `{}`: {}", path.display(), err);
                continue;
            }
        };
        let (meta, _) = frontmatter::parse(&content);
        match Post::from_meta(&path, &slug, &meta) {
            Some(post) => posts.push(post),
            None => warn!(
                "Skipping `{}`: missing `title` or `date` in frontmatter",
                path.display()
            ),
        }
    }

    // The slug breaks date ties so the ordering is stable regardless of the
    // platform's directory enumeration order.
    posts.sort_by(|a, b| b.sort_date.cmp(&a.sort_date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(posts)
}

/// Lists the base names of the Markdown sources in `source_dir`, sorted.
/// Used by the bare CLI invocation to show what could be generated.
pub fn list_sources(source_dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for result in fs::read_dir(source_dir)? {
        let entry = result?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".md") {
            names.push(name.into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Represents an error loading a single post source.
#[derive(Debug)]
pub enum Error {
    /// The source document lacks the required `title` or `date` key.
    MissingMetadata(PathBuf),

    /// Returned for I/O problems reading the source document.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingMetadata(path) => write!(
                f,
                "`{}` must have `title` and `date` in its frontmatter",
                path.display()
            ),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingMetadata(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts a [`io::Error`] into an [`Error`]. It allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
