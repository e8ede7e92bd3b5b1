use std::fmt::{Display, Formatter};

/// Ordered set of tags of a feature.
///
/// Tags are stored in GeoJSON as a single string with tags separated by `;`. Empty entries are ignored when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Parses a `;` separated list of tags.
    pub fn parse(tags: &str) -> Self {
        tags.split(';').collect()
    }

    /// Adds the tag to the end of the list. Returns false if the tag was already there.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if tag.is_empty() || self.contains(&tag) {
            return false;
        }

        self.0.push(tag);
        true
    }

    /// Removes the tag. Returns false if there was no such tag.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.0.iter().position(|t| t == tag) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns true if the set contains the tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Returns true if the set contains every one of `tags`, or, with `all = false`, at least one of them. An empty
    /// list of tags is matched by any set when `all` is true and by none otherwise.
    pub fn matches<S: AsRef<str>>(&self, tags: &[S], all: bool) -> bool {
        if all {
            tags.iter().all(|tag| self.contains(tag.as_ref()))
        } else {
            tags.iter().any(|tag| self.contains(tag.as_ref()))
        }
    }

    /// Iterates over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut tags = Tags::default();
        for tag in iter {
            tags.insert(tag);
        }

        tags
    }
}

impl Display for Tags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format() {
        let tags = Tags::parse("Arctic;Ocean;;Arctic");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.to_string(), "Arctic;Ocean");

        assert!(Tags::parse("").is_empty());
        assert_eq!(Tags::parse("").to_string(), "");
    }

    #[test]
    fn insert_and_remove() {
        let mut tags = Tags::parse("A");
        assert!(tags.insert("B"));
        assert!(!tags.insert("A"));
        assert_eq!(tags.to_string(), "A;B");

        assert!(tags.remove("A"));
        assert!(!tags.remove("C"));
        assert_eq!(tags.to_string(), "B");
    }

    #[test]
    fn match_all_or_any() {
        let tags = Tags::parse("Arctic;Ocean");
        assert!(tags.matches(&["Arctic", "Ocean"], true));
        assert!(!tags.matches(&["Arctic", "Land"], true));
        assert!(tags.matches(&["Arctic", "Land"], false));
        assert!(!tags.matches(&["Land"], false));
        assert!(tags.matches::<&str>(&[], true));
        assert!(!tags.matches::<&str>(&[], false));
    }
}
