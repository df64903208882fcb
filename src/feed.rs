//! Support for creating an Atom feed from the post catalog.
//!
//! The feed is only written when the project configuration carries an
//! absolute `site_url`; relative listing links are useless to feed readers.

use std::fmt;
use std::io::Write;

use atom_syndication::{Entry, Error as AtomError, Feed, Link};
use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

use crate::post::Post;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    /// The feed's human-readable title.
    pub title: String,

    /// Absolute base URL of the published site, e.g.
    /// `https://example.com/blog`.
    pub site_url: String,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// posts (newest first) and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(config: &FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts).write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, posts: &[Post]) -> Feed {
    use std::collections::BTreeMap;
    Feed {
        entries: posts.iter().map(|post| entry(config, post)).collect(),
        title: config.title.clone().into(),
        id: config.site_url.clone(),
        updated: Utc::now().fixed_offset(),
        authors: Vec::new(),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        extensions: BTreeMap::new(),
        namespaces: BTreeMap::new(),
        links: vec![alternate_link(&config.site_url)],
        base: None,
        lang: None,
    }
}

fn entry(config: &FeedConfig, post: &Post) -> Entry {
    use std::collections::BTreeMap;
    let url = post_url(&config.site_url, &post.slug);
    let date = entry_date(post);
    Entry {
        id: url.clone(),
        title: post.title.clone().into(),
        updated: date,
        authors: Vec::new(),
        links: vec![alternate_link(&url)],
        rights: None,
        summary: Some(post.excerpt.clone().into()),
        categories: Vec::new(),
        contributors: Vec::new(),
        published: Some(date),
        source: None,
        content: None,
        extensions: BTreeMap::new(),
    }
}

/// Atom timestamps need a time and an offset; posts only carry a date. The
/// entry is stamped midnight UTC on the post's sort date, so a post whose
/// display date failed to parse carries the same now-fallback the listing
/// order uses.
fn entry_date(post: &Post) -> DateTime<FixedOffset> {
    post.sort_date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .fixed_offset()
}

fn post_url(site_url: &str, slug: &str) -> String {
    format!("{}/{}/", site_url.trim_end_matches('/'), slug)
}

fn alternate_link(href: &str) -> Link {
    Link {
        href: href.to_owned(),
        rel: String::from("alternate"),
        title: None,
        hreflang: None,
        mime_type: None,
        length: None,
    }
}

/// The result of a fallible feed operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}
