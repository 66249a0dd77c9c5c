//! The set of known disposable domains and its text format.

use std::collections::HashSet;

/// Normalized (trimmed, lowercase) disposable domains.
///
/// A set is built once per successful fetch and never mutated afterwards;
/// the cache swaps whole sets in and out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a one-domain-per-line list.
    ///
    /// Lines are trimmed; blank lines and `#` comments are skipped; the rest
    /// is lowercased.
    pub fn parse(text: &str) -> Self {
        text.lines().filter_map(parse_line).collect()
    }

    /// Exact-match lookup of an already normalized domain.
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

impl FromIterator<String> for DomainSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for DomainSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().filter_map(parse_line).collect()
    }
}

fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let set = DomainSet::parse("# comment\n\nEVIL.COM\n  other.org  \n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("evil.com"));
        assert!(set.contains("other.org"));
        assert!(!set.contains("EVIL.COM"));
    }

    #[test]
    fn test_parse_handles_crlf_and_duplicates() {
        let set = DomainSet::parse("mailinator.com\r\nMailinator.com\r\n   # indented comment\r\n");
        assert_eq!(set.len(), 1);
        assert!(set.contains("mailinator.com"));
    }

    #[test]
    fn test_parse_only_comments_is_empty() {
        assert!(DomainSet::parse("# header\n#another\n\n   \n").is_empty());
        assert!(DomainSet::parse("").is_empty());
    }

    #[test]
    fn test_from_str_iter_normalizes() {
        let set: DomainSet = ["  Trash-Mail.com ", "#skip", ""].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["trash-mail.com"]);
    }
}
