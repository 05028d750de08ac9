//! Support for creating Atom feeds from a list of posts.

use crate::author;
use crate::config::Author;
use crate::post::Post;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,

    /// The site-level author, used for feed entries whose post has no
    /// byline authors of its own.
    pub author: Option<Author>,
    pub home_page: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts).write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, posts: &[Post]) -> Feed {
    Feed {
        entries: feed_entries(&config, posts),
        title: config.title.into(),
        id: config.id,
        updated: utc_now(),
        authors: site_people(&config.author),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        base: None,
        lang: None,
        extensions: Default::default(),
        namespaces: Default::default(),
        links: vec![Link {
            href: config.home_page.to_string(),
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    }
}

fn feed_entries(config: &FeedConfig, posts: &[Post]) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());

    for post in posts {
        // Atom wants a fully-specified timestamp; a post only carries a
        // date, so pin it to midnight UTC.
        let date = FixedOffset::east(0).from_utc_datetime(&NaiveDateTime::new(
            post.published,
            NaiveTime::from_hms(0, 0, 0),
        ));

        entries.push(Entry {
            id: post.url.to_string(),
            title: post.title.clone().into(),
            updated: date,
            authors: entry_people(post, config),
            links: vec![Link {
                href: post.url.to_string(),
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: None,
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(date),
            source: None,
            content: None,
            extensions: Default::default(),
        })
    }
    entries
}

fn utc_now() -> DateTime<FixedOffset> {
    FixedOffset::east(0).from_utc_datetime(&Utc::now().naive_utc())
}

/// Converts a post's byline authors into Atom [`Person`]s, falling back to
/// the site-level author when the post has none.
fn entry_people(post: &Post, config: &FeedConfig) -> Vec<Person> {
    if post.authors.is_empty() {
        return site_people(&config.author);
    }
    post.authors
        .iter()
        .map(|author: &author::Author| Person {
            name: author.name.clone(),
            email: None,
            uri: None,
        })
        .collect()
}

fn site_people(author: &Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name.clone(),
            email: author.email.clone(),
            uri: None,
        }],
        None => Vec::new(),
    }
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O and Atom
/// issues.
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
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}
