//! The index renderer: converts an ordered slice of
//! [`PostSummary`](crate::post::PostSummary) records into the list-of-posts
//! HTML fragment that [`crate::write`] embeds into the layout template. A
//! pure, stateless projection: one pass over the input, no I/O of its own,
//! no re-sorting. The entry widths at the theme's breakpoints are the
//! stylesheet's concern, keyed off the `post-list`/`post-entry` classes
//! emitted here.

use crate::author::byline;
use crate::post::PostSummary;
use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::fmt::{self, Display};
use std::io;

struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

struct EscapeHref<'a>(&'a str);

impl<'a> Display for EscapeHref<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

struct EscapeHtml<'a>(&'a str);

impl<'a> Display for EscapeHtml<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Appends the index-list fragment for `posts` to `w`. Emits one
/// `<li class="post-entry">` per summary, in input order, each containing a
/// linked heading (href = slug, label = title) and the formatted date. The
/// byline element is emitted only when the post has authors; see
/// [`crate::author::byline`] for the joining rule.
pub fn push_index<W: StrWrite>(w: &mut W, posts: &[PostSummary]) -> io::Result<()> {
    w.write_str("<ul class=\"post-list\">\n")?;
    for post in posts {
        write!(
            w,
            concat!(
                r#"<li class="post-entry">"#,
                r#"<h2 class="post-title"><a href="{}">{}</a></h2>"#,
                r#"<div class="post-date">{}</div>"#,
            ),
            EscapeHref(&post.slug),
            EscapeHtml(&post.title),
            EscapeHtml(&post.date),
        )?;
        if let Some(byline) = byline(&post.authors) {
            write!(w, r#"<div class="post-byline">{}</div>"#, EscapeHtml(&byline))?;
        }
        w.write_str("</li>\n")?;
    }
    w.write_str("</ul>\n")
}

/// Renders the index-list fragment for `posts` into a fresh [`String`].
pub fn render_index(posts: &[PostSummary]) -> io::Result<String> {
    let mut out = String::new();
    push_index(&mut out, posts)?;
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn summary(title: &str, slug: &str, date: &str, authors: &[&str]) -> PostSummary {
        PostSummary {
            title: title.to_owned(),
            slug: slug.to_owned(),
            date: date.to_owned(),
            authors: authors.iter().map(|name| name.parse().unwrap()).collect(),
        }
    }

    #[test]
    fn test_entry_per_post_in_input_order() -> io::Result<()> {
        let posts = vec![
            summary("Second", "/blog/second.html", "May 02, 2021", &[]),
            summary("First", "/blog/first.html", "April 16, 2021", &[]),
        ];
        let html = render_index(&posts)?;

        assert_eq!(html.matches("<li class=\"post-entry\">").count(), 2);
        let second = html.find("/blog/second.html").unwrap();
        let first = html.find("/blog/first.html").unwrap();
        assert!(second < first);
        Ok(())
    }

    #[test]
    fn test_link_target_and_label() -> io::Result<()> {
        let posts = vec![summary(
            "Hello, world!",
            "/blog/hello-world.html",
            "April 16, 2021",
            &[],
        )];
        let html = render_index(&posts)?;

        assert!(html.contains(r#"<a href="/blog/hello-world.html">Hello, world!</a>"#));
        assert!(html.contains(r#"<div class="post-date">April 16, 2021</div>"#));
        Ok(())
    }

    #[test]
    fn test_no_byline_without_authors() -> io::Result<()> {
        let posts = vec![summary("Quiet", "/blog/quiet.html", "March 01, 2021", &[])];
        let html = render_index(&posts)?;

        assert!(!html.contains("post-byline"));
        assert!(!html.contains("by "));
        Ok(())
    }

    #[test]
    fn test_byline_two_authors() -> io::Result<()> {
        let posts = vec![summary(
            "Pairing",
            "/blog/pairing.html",
            "May 02, 2021",
            &["Ada", "Grace"],
        )];
        let html = render_index(&posts)?;

        assert!(html.contains(r#"<div class="post-byline">by Ada and Grace</div>"#));
        Ok(())
    }

    #[test]
    fn test_byline_three_authors() -> io::Result<()> {
        let posts = vec![summary(
            "Trio",
            "/blog/trio.html",
            "May 03, 2021",
            &["A", "B", "C"],
        )];
        let html = render_index(&posts)?;

        assert!(html.contains(r#"<div class="post-byline">by A, B, and C</div>"#));
        Ok(())
    }

    #[test]
    fn test_title_is_escaped() -> io::Result<()> {
        let posts = vec![summary(
            "Generics: <T> & friends",
            "/blog/generics.html",
            "May 04, 2021",
            &[],
        )];
        let html = render_index(&posts)?;

        assert!(html.contains("Generics: &lt;T&gt; &amp; friends"));
        assert!(!html.contains("<T>"));
        Ok(())
    }

    #[test]
    fn test_empty_list() -> io::Result<()> {
        let html = render_index(&[])?;
        assert_eq!(html, "<ul class=\"post-list\">\n</ul>\n");
        Ok(())
    }

    #[test]
    fn test_author_name_is_escaped() -> io::Result<()> {
        let posts = vec![summary(
            "Escapes",
            "/blog/escapes.html",
            "May 05, 2021",
            &["Ada <script>"],
        )];
        let html = render_index(&posts)?;

        assert!(html.contains("by Ada &lt;script&gt;"));
        Ok(())
    }
}
