//! The content layer. Defines the [`Post`], [`PostSummary`], [`Parser`],
//! and [`Error`] types, and the logic for parsing post metadata from source
//! files into memory. See [`PostSummary`] for details on how posts are
//! projected into the shape consumed by [`crate::render`].

use std::{
    collections::HashSet,
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::author::Author;

/// A parsed post. Only the metadata needed for the index page and the feed
/// is retained; the post body is the concern of whatever tool renders the
/// post pages themselves.
#[derive(Clone, Debug)]
pub struct Post {
    /// The post's title, from the frontmatter `Title` key.
    pub title: String,

    /// The site-relative link target for the post page (e.g.
    /// `/blog/my-post.html`), derived from the source file's stem. Unique
    /// across the parsed set.
    pub slug: String,

    /// The absolute form of `slug`. The feed requires absolute URLs.
    pub url: Url,

    /// The publication date, from the frontmatter `Date` key (`%Y-%m-%d`).
    pub published: NaiveDate,

    /// The post's authors, from the frontmatter `Author` key. Empty when the
    /// key is absent.
    pub authors: Vec<Author>,
}

/// The read-only, per-post record consumed by the index renderer. A pure
/// projection of [`Post`]: the date is pre-formatted here, and the renderer
/// treats it as opaque text.
#[derive(Clone, Debug)]
pub struct PostSummary {
    /// The post's title.
    pub title: String,

    /// The link target; also the entry's key in the rendered list.
    pub slug: String,

    /// The formatted publication date (e.g. "April 16, 2021").
    pub date: String,

    /// The post's authors, in byline order. May be empty.
    pub authors: Vec<Author>,
}

impl From<&Post> for PostSummary {
    fn from(p: &Post) -> PostSummary {
        PostSummary {
            title: p.title.clone(),
            slug: p.slug.clone(),
            date: p.published.format("%B %d, %Y").to_string(),
            authors: p.authors.clone(),
        }
    }
}

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `posts_url` is the base URL for post pages (i.e., the URL for a post
    /// is `{posts_url}{post_id}.html`). Must end in a trailing slash so that
    /// [`Url::join`] treats it as a directory.
    posts_url: &'a Url,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(posts_url: &'a Url) -> Parser<'a> {
        Parser { posts_url }
    }

    /// Searches a provided `source_directory` recursively for post files
    /// (extension = `.md`) and returns a list of [`Post`] objects sorted by
    /// date (most recent first). Each post file must be structured as
    /// follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `Title`, `Date`, and optionally
    ///    `Author` (one name or a list of names)
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body (ignored by this tool)
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// Title: Hello, world!
    /// Date: 2021-04-16
    /// Author: [Ada Lovelace, Grace Hopper]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    ///
    /// Slugs are derived from file stems; two source files whose stems
    /// slugify to the same value are an error, since the slug is the entry
    /// key on the rendered index page.
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        const MARKDOWN_EXTENSION: &str = ".md";

        let mut posts = Vec::new();
        for result in walkdir::WalkDir::new(source_directory) {
            let entry = result?;
            let file_name = entry.file_name().to_string_lossy();
            if entry.file_type().is_file() && file_name.ends_with(MARKDOWN_EXTENSION) {
                posts.push(self.parse_post_file(entry.path())?);
            }
        }

        posts.sort_by(|a, b| b.published.cmp(&a.published));

        let mut seen: HashSet<&str> = HashSet::new();
        for post in posts.iter() {
            if !seen.insert(&post.slug) {
                return Err(Error::DuplicateSlug(post.slug.clone()));
            }
        }

        Ok(posts)
    }

    /// Parses a single [`Post`] from an `id` and `input` string. The `id` is
    /// the slugified stem of the source file (e.g., the ID for a post whose
    /// source file is `{source_directory}/2021/foo.md` is `foo`).
    pub fn parse_post_str(&self, id: &str, input: &str) -> Result<Post> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find("---") {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, _body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
        let published = NaiveDate::parse_from_str(frontmatter.date.trim(), "%Y-%m-%d")?;
        let file_name = format!("{}.html", id);

        Ok(Post {
            title: frontmatter.title,
            slug: format!("{}{}", self.posts_url.path(), file_name),
            url: self.posts_url.join(&file_name)?,
            published,
            authors: frontmatter.authors,
        })
    }

    fn parse_post_file(&self, path: &Path) -> Result<Post> {
        match self._parse_post_file(path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post_file(&self, path: &Path) -> Result<Post> {
        use std::io::Read;

        let stem = path
            .file_stem()
            .ok_or_else(|| InvalidFileNameError(path.to_owned()))?
            .to_str()
            .ok_or_else(|| InvalidFileNameError(path.to_owned()))?;

        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        self.parse_post_str(&slug::slugify(stem), &contents)
    }
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The title of the post.
    #[serde(rename = "Title")]
    pub title: String,

    /// The publication date of the post, `%Y-%m-%d`.
    #[serde(rename = "Date")]
    pub date: String,

    /// The author name or list of author names.
    #[serde(
        default,
        rename = "Author",
        deserialize_with = "Author::deserialize_seq"
    )]
    pub authors: Vec<Author>,
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for
    /// [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the frontmatter `Date` isn't a valid `%Y-%m-%d` date.
    DateParse(chrono::ParseError),

    /// Returned when two source files resolve to the same slug. Slugs are
    /// the entry keys on the index page, so they must be unique.
    DuplicateSlug(String),

    /// Returned when there is a problem parsing URLs.
    UrlParse(url::ParseError),

    /// Returned for walkdir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned when a source file isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::DateParse(err) => err.fmt(f),
            Error::DuplicateSlug(slug) => {
                write!(f, "Duplicate post slug `{}`", slug)
            }
            Error::UrlParse(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::DateParse(err) => Some(err),
            Error::DuplicateSlug(_) => None,
            Error::UrlParse(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts a [`chrono::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator for date parsing functions.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateParse(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn posts_url() -> Url {
        Url::parse("https://example.org/blog/").unwrap()
    }

    #[test]
    fn test_parse_post_str() -> Result<()> {
        let posts_url = posts_url();
        let post = Parser::new(&posts_url).parse_post_str(
            "hello-world",
            "---\nTitle: Hello, world!\nDate: 2021-04-16\nAuthor: Ada Lovelace\n---\n# Hello\n",
        )?;

        assert_eq!(post.title, "Hello, world!");
        assert_eq!(post.slug, "/blog/hello-world.html");
        assert_eq!(post.url.as_str(), "https://example.org/blog/hello-world.html");
        assert_eq!(post.published, NaiveDate::from_ymd(2021, 4, 16));
        let wanted: Vec<Author> = vec!["Ada Lovelace".parse().unwrap()];
        assert_eq!(post.authors, wanted);
        Ok(())
    }

    #[test]
    fn test_parse_post_str_author_list() -> Result<()> {
        let posts_url = posts_url();
        let post = Parser::new(&posts_url).parse_post_str(
            "pairing",
            "---\nTitle: Pairing\nDate: 2021-05-02\nAuthor: [Ada, Grace]\n---\n",
        )?;

        let wanted: Vec<Author> =
            vec!["Ada".parse().unwrap(), "Grace".parse().unwrap()];
        assert_eq!(post.authors, wanted);
        Ok(())
    }

    #[test]
    fn test_parse_post_str_no_author() -> Result<()> {
        let posts_url = posts_url();
        let post = Parser::new(&posts_url)
            .parse_post_str("quiet", "---\nTitle: Quiet\nDate: 2021-03-01\n---\n")?;

        assert!(post.authors.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_post_str_missing_start_fence() {
        let posts_url = posts_url();
        match Parser::new(&posts_url).parse_post_str("x", "Title: X\n") {
            Err(Error::FrontmatterMissingStartFence) => {}
            other => panic!("wanted missing-start-fence error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_post_str_missing_end_fence() {
        let posts_url = posts_url();
        match Parser::new(&posts_url).parse_post_str("x", "---\nTitle: X\n") {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("wanted missing-end-fence error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_post_str_bad_date() {
        let posts_url = posts_url();
        match Parser::new(&posts_url)
            .parse_post_str("x", "---\nTitle: X\nDate: April 16th\n---\n")
        {
            Err(Error::DateParse(_)) => {}
            other => panic!("wanted date-parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let posts_url = posts_url();
        let posts =
            Parser::new(&posts_url).parse_posts(Path::new("./testdata/posts/"))?;

        // Most recent first, nested directories included.
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "/blog/pair-programming.html",
                "/blog/hello-world.html",
                "/blog/no-author.html",
            ],
        );
        Ok(())
    }

    #[test]
    fn test_summary_projection() {
        let post = Post {
            title: "Hello, world!".to_owned(),
            slug: "/blog/hello-world.html".to_owned(),
            url: Url::parse("https://example.org/blog/hello-world.html").unwrap(),
            published: NaiveDate::from_ymd(2021, 4, 16),
            authors: vec!["Ada".parse().unwrap()],
        };

        let summary = PostSummary::from(&post);
        assert_eq!(summary.title, "Hello, world!");
        assert_eq!(summary.slug, "/blog/hello-world.html");
        assert_eq!(summary.date, "April 16, 2021");
        assert_eq!(summary.authors, post.authors);
    }
}
