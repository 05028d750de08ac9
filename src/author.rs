//! Defines the [`Author`] type, which represents a [`crate::post::Post`]
//! author, and the [`byline`] rule for joining author names into the text
//! shown under a post title.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// Represents a single [`crate::post::Post`] author. Parsed from the
/// frontmatter `Author` key, which accepts either one name or a list of
/// names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    /// The author's display name.
    pub name: String,
}

impl std::str::FromStr for Author {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Author {
            name: s.trim().to_owned(),
        })
    }
}

impl<'de> Deserialize<'de> for Author {
    fn deserialize<D>(deserializer: D) -> Result<Author, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<Author>()
            .map_err(|e| D::Error::custom(format!("{}", e)))
    }
}

impl Author {
    /// Deserializes the frontmatter `Author` value. A single scalar name and
    /// a sequence of names both produce a `Vec<Author>`, preserving order.
    pub fn deserialize_seq<'de, D>(deserializer: D) -> Result<Vec<Author>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(Author),
            Many(Vec<Author>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(author) => vec![author],
            OneOrMany::Many(authors) => authors,
        })
    }
}

/// Joins author names into the byline text shown under a post title. Returns
/// `None` for an empty list so callers can omit the byline element entirely.
/// One name stands alone, two names are joined with "and", and three or more
/// names are comma-separated with a final ", and":
///
/// ```
/// # use postroll::author::{byline, Author};
/// let authors: Vec<Author> = ["Ada", "Grace"].iter().map(|n| n.parse().unwrap()).collect();
/// assert_eq!(byline(&authors), Some("by Ada and Grace".to_owned()));
/// ```
pub fn byline(authors: &[Author]) -> Option<String> {
    match authors {
        [] => None,
        [only] => Some(format!("by {}", only.name)),
        [first, second] => Some(format!("by {} and {}", first.name, second.name)),
        [init @ .., last] => {
            let mut text = String::from("by ");
            for author in init {
                text.push_str(&author.name);
                text.push_str(", ");
            }
            text.push_str("and ");
            text.push_str(&last.name);
            Some(text)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn authors(names: &[&str]) -> Vec<Author> {
        names.iter().map(|name| name.parse().unwrap()).collect()
    }

    #[test]
    fn test_byline_empty() {
        assert_eq!(byline(&[]), None);
    }

    #[test]
    fn test_byline_one() {
        assert_eq!(byline(&authors(&["Ada"])), Some("by Ada".to_owned()));
    }

    #[test]
    fn test_byline_two() {
        assert_eq!(
            byline(&authors(&["Ada", "Grace"])),
            Some("by Ada and Grace".to_owned()),
        );
    }

    #[test]
    fn test_byline_three() {
        assert_eq!(
            byline(&authors(&["A", "B", "C"])),
            Some("by A, B, and C".to_owned()),
        );
    }

    #[test]
    fn test_byline_four() {
        assert_eq!(
            byline(&authors(&["A", "B", "C", "D"])),
            Some("by A, B, C, and D".to_owned()),
        );
    }

    #[test]
    fn test_deserialize_scalar() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "Author::deserialize_seq")]
            author: Vec<Author>,
        }

        let wrapper: Wrapper = serde_yaml::from_str("author: Ada Lovelace").unwrap();
        assert_eq!(wrapper.author, authors(&["Ada Lovelace"]));
    }

    #[test]
    fn test_deserialize_sequence() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "Author::deserialize_seq")]
            author: Vec<Author>,
        }

        let wrapper: Wrapper =
            serde_yaml::from_str("author: [Ada Lovelace, Grace Hopper]").unwrap();
        assert_eq!(wrapper.author, authors(&["Ada Lovelace", "Grace Hopper"]));
    }
}
