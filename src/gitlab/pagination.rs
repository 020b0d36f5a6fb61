//! `Link` header pagination
//!
//! GitLab advertises further pages of a list response through an RFC 8288
//! `Link` header, e.g.
//!
//! ```text
//! <https://gitlab.example.com/api/v4/groups/1/variables?page=2&per_page=20>; rel="next",
//! <https://gitlab.example.com/api/v4/groups/1/variables?page=5&per_page=20>; rel="last"
//! ```

use reqwest::header::{HeaderMap, LINK};

/// Extract the URI of the `rel="next"` relation, if any
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(find_rel_next)
}

/// Find the `next` target in a single `Link` header value
fn find_rel_next(value: &str) -> Option<String> {
    split_links(value).into_iter().find_map(|link| {
        let (target, params) = parse_link(link)?;
        params
            .iter()
            .any(|(name, val)| name.eq_ignore_ascii_case("rel") && has_relation(val, "next"))
            .then(|| target.to_string())
    })
}

// Commas inside `<...>` are part of the URI, not link separators.
fn split_links(value: &str) -> Vec<&str> {
    let mut links = Vec::new();
    let mut in_uri = false;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '<' if !in_quotes => in_uri = true,
            '>' if !in_quotes => in_uri = false,
            '"' if !in_uri => in_quotes = !in_quotes,
            ',' if !in_uri && !in_quotes => {
                links.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    links.push(&value[start..]);
    links
}

fn parse_link(link: &str) -> Option<(&str, Vec<(&str, &str)>)> {
    let link = link.trim();
    let rest = link.strip_prefix('<')?;
    let end = rest.find('>')?;
    let target = rest[..end].trim();

    let params = rest[end + 1..]
        .split(';')
        .filter_map(|param| {
            let (name, val) = param.split_once('=')?;
            Some((name.trim(), val.trim().trim_matches('"')))
        })
        .collect();

    Some((target, params))
}

// `rel` may carry several space-separated relation types.
fn has_relation(rel: &str, wanted: &str) -> bool {
    rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(wanted))
}
