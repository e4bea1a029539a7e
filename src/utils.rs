use regex::Regex;
use std::sync::LazyLock;

static ICS_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ics\b").expect("static regex"));

/// Collapses whitespace runs to a single space and trims both ends.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Splits a comma separated list of completed courses into the lower-cased
/// names course queries are matched against. `ics` is how students write the
/// `I&C SCI` department.
pub fn parse_taken(s: &str) -> Vec<String> {
    s.split(',')
        .map(|course| normalize(&course.to_lowercase()))
        .filter(|course| !course.is_empty())
        .map(|course| ICS_PREFIX.replace(&course, "i&c sci").into_owned())
        .collect()
}

#[cfg(test)]
mod test_utils {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!("COMPSCI 161", normalize("  COMPSCI \u{a0} 161\n"));
        assert_eq!("", normalize(" \t "));
    }

    #[test]
    fn test_parse_taken() {
        assert_eq!(
            vec!["i&c sci 33", "math 2b", "physics 7c"],
            parse_taken("ICS 33, Math 2B,,physics 7c ")
        );
        assert!(parse_taken(" , ").is_empty());
    }
}
