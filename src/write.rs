//! Responsible for templating and writing the index page to disk. The
//! layout template supplies the page chrome (navigation, head metadata); the
//! fragment produced by [`crate::render`] is handed to it as `content`.

use crate::post::PostSummary;
use crate::render;
use gtmpl::Template;
use gtmpl_derive::Gtmpl;
use std::fmt;
use std::io;
use std::path::Path;
use url::Url;

/// The file name of the index page inside the index output directory.
const INDEX_FILE_NAME: &str = "all.html";

/// Responsible for templating and writing the index HTML page to disk from
/// [`PostSummary`] records.
pub struct Writer<'a> {
    /// The template for the index page. The template receives the fields of
    /// `IndexPage`.
    pub index_template: &'a Template,

    /// The directory in which the index HTML file will be written. The index
    /// page will be located at `{index_output_directory}/all.html`.
    pub index_output_directory: &'a Path,

    /// The page title, typically the site title. Made available to the
    /// template as `title`.
    pub title: &'a str,

    /// The canonical URL of the index page. Made available to the template
    /// as `canonical_url`.
    pub canonical_url: &'a Url,

    /// The URL for the site's home page. This is made available to the
    /// template, typically as the destination for the site-header link.
    pub home_page: &'a Url,

    /// The URL for the static assets. This is made available to the
    /// template, typically for the theme's stylesheet.
    pub static_url: &'a Url,
}

/// The template context for the index page. Field names are the template's
/// vocabulary: `{{.title}}`, `{{.canonical_url}}`, `{{.home_page}}`,
/// `{{.static_url}}`, and `{{.content}}` (the rendered list fragment).
#[derive(Gtmpl)]
struct IndexPage {
    title: String,
    canonical_url: String,
    home_page: String,
    static_url: String,
    content: String,
}

impl Writer<'_> {
    /// Renders the list fragment for `posts`, templates it into the layout,
    /// and writes the result to `{index_output_directory}/all.html`. The
    /// summaries are written in the order provided; ordering is the
    /// caller's contract.
    pub fn write_index(&self, posts: &[PostSummary]) -> Result<()> {
        std::fs::create_dir_all(self.index_output_directory)?;

        let page = IndexPage {
            title: self.title.to_owned(),
            canonical_url: self.canonical_url.to_string(),
            home_page: self.home_page.to_string(),
            static_url: self.static_url.to_string(),
            content: render::render_index(posts)?,
        };

        let path = self.index_output_directory.join(INDEX_FILE_NAME);
        self.index_template.execute(
            &mut std::fs::File::create(&path)?,
            &gtmpl::Context::from(gtmpl::Value::from(page))?,
        )?;
        Ok(())
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
