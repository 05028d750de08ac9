//! Project and theme configuration. A project is a directory containing a
//! `postroll.yaml` file, a `posts/` source directory, and a `theme/`
//! directory; the theme supplies the index page's layout template
//! (`theme.yaml`) and a `static/` directory of assets copied verbatim into
//! the output.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "postroll.yaml";

/// The site-level author, used by the feed when a post carries no byline
/// authors of its own.
#[derive(Deserialize, Clone, Debug)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// The raw shape of `postroll.yaml`.
#[derive(Deserialize)]
struct Project {
    /// The absolute root URL of the site. Must end in a trailing slash so
    /// that joins treat it as a directory.
    site_root: Url,

    /// The site title, used as the index page's title and the feed title.
    title: String,

    /// The site's home page, relative to `site_root`. Defaults to
    /// `site_root` itself.
    #[serde(default)]
    home_page: Option<String>,

    #[serde(default)]
    author: Option<Author>,
}

/// The raw shape of `theme/theme.yaml`.
#[derive(Deserialize)]
struct Theme {
    /// The template files for the index page, relative to the theme
    /// directory, concatenated in order before parsing.
    index_template: Vec<PathBuf>,
}

/// Fully-resolved configuration for a site build.
pub struct Config {
    pub title: String,
    pub author: Option<Author>,
    pub home_page: Url,
    pub canonical_url: Url,
    pub posts_url: Url,
    pub static_url: Url,
    pub posts_source_directory: PathBuf,
    pub index_template: Vec<PathBuf>,
    pub index_output_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub static_output_directory: PathBuf,
    pub root_output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a `postroll.yaml` project file
    /// and loads the configuration from the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the configuration from a specific project file. The project
    /// root is the file's parent directory; the posts source directory and
    /// the theme directory are resolved relative to it.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)
            .map_err(|e| anyhow!("Parsing project file `{}`: {}", path.display(), e))?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{}'",
                path.display()
            )
        })?;

        let theme_dir = project_root.join("theme");
        let theme_path = theme_dir.join("theme.yaml");
        let theme: Theme = serde_yaml::from_reader(open(&theme_path, "theme")?)
            .map_err(|e| anyhow!("Parsing theme file `{}`: {}", theme_path.display(), e))?;

        let site_root = project.site_root;
        let home_page = match &project.home_page {
            Some(relative) => site_root.join(relative)?,
            None => site_root.clone(),
        };

        Ok(Config {
            title: project.title,
            author: project.author,
            home_page,
            canonical_url: site_root.join("blog/all.html")?,
            posts_url: site_root.join("blog/")?,
            static_url: site_root.join("static/")?,
            posts_source_directory: project_root.join("posts"),
            index_template: theme
                .index_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            index_output_directory: output_directory.join("blog"),
            static_source_directory: theme_dir.join("static"),
            static_output_directory: output_directory.join("static"),
            root_output_directory: output_directory.to_owned(),
        })
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!(
            "Opening {} file `{}`: {}",
            kind,
            path.display(),
            e
        )),
        Ok(file) => Ok(file),
    }
}
