//! The library code for the `postroll` static site generator, which builds
//! the "all posts" index page of a blog. The architecture can be generally
//! broken down into two distinct steps:
//!
//! 1. Parsing post metadata from source files on disk ([`crate::post`])
//! 2. Converting the posts into output files on disk ([`crate::write`])
//!
//! The first step is the content layer: it walks the posts source directory,
//! parses each file's YAML frontmatter (title, date, authors), derives the
//! post's slug from its file name, and returns the posts sorted by date, most
//! recent first. The second step projects the posts into summaries, renders
//! the summaries into the index-list markup fragment ([`crate::render`]),
//! and embeds the fragment into the theme's layout template.
//!
//! [`crate::build`] stitches the steps together and additionally copies the
//! theme's static assets and generates the Atom feed ([`crate::feed`]) for
//! the same list of posts.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod author;
pub mod build;
pub mod config;
pub mod feed;
pub mod post;
pub mod render;
pub mod write;
