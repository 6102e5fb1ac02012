//! # Path Patterns
//!
//! Matches a pathname against a card's path pattern.
//!
//! ```text
//! "/users/:id"      matches "/users/42"      → params { id: "42" }
//! "/files/*"        matches "/files/a/b.txt" → params { 0: "a/b.txt" }
//! "/posts/:slug?"   matches "/posts"         → params {}
//! ```
//!
//! Without `exact`, a pattern matches any pathname it is a segment-aligned
//! prefix of (`/users` matches `/users/42`). With `strict`, a trailing slash
//! in either the pattern or the pathname is significant.
//!
//! Matching is pure: the same `(pathname, pattern, exact, strict)` always
//! gives the same answer.

use std::collections::BTreeMap;

/// The result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// The pattern that matched.
    pub path: String,
    /// The portion of the pathname the pattern consumed.
    pub url: String,
    /// True if the whole pathname was consumed.
    pub is_exact: bool,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param { name: String, optional: bool },
    Splat,
}

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    tokens: Vec<Token>,
    trailing_slash: bool,
}

impl PathPattern {
    pub fn parse(source: &str) -> Self {
        let body = source.strip_prefix('/').unwrap_or(source);
        let (body, trailing_slash) = match body.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (body, false),
        };

        let tokens = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/')
                .map(|segment| {
                    if segment == "*" {
                        Token::Splat
                    } else if let Some(name) = segment.strip_prefix(':') {
                        match name.strip_suffix('?') {
                            Some(name) => Token::Param {
                                name: name.to_string(),
                                optional: true,
                            },
                            None => Token::Param {
                                name: name.to_string(),
                                optional: false,
                            },
                        }
                    } else {
                        Token::Literal(segment.to_string())
                    }
                })
                .collect()
        };

        Self {
            source: source.to_string(),
            tokens,
            trailing_slash,
        }
    }

    /// Match `pathname` against this pattern.
    pub fn matches(&self, pathname: &str, exact: bool, strict: bool) -> Option<PathMatch> {
        let body = pathname.strip_prefix('/')?;

        // The root pattern is a prefix of everything.
        if self.tokens.is_empty() {
            let is_exact = pathname == "/";
            if exact && !is_exact {
                return None;
            }
            return Some(PathMatch {
                path: self.source.clone(),
                url: "/".to_string(),
                is_exact,
                params: BTreeMap::new(),
            });
        }

        let segments: Vec<&str> = body.split('/').collect();
        let mut params = BTreeMap::new();
        self.match_tokens(&self.tokens, &segments, 0, &mut params, exact, strict)
    }

    /// Match `tokens` against `segments[consumed..]`. An optional param first
    /// tries to take a segment, then retries the rest without it.
    fn match_tokens(
        &self,
        tokens: &[Token],
        segments: &[&str],
        consumed: usize,
        params: &mut BTreeMap<String, String>,
        exact: bool,
        strict: bool,
    ) -> Option<PathMatch> {
        let Some((token, rest)) = tokens.split_first() else {
            return self.finish(segments, consumed, params, exact, strict);
        };

        match token {
            Token::Literal(literal) => {
                let segment = segments.get(consumed)?;
                if !segment.eq_ignore_ascii_case(literal) {
                    return None;
                }
                self.match_tokens(rest, segments, consumed + 1, params, exact, strict)
            }
            Token::Param { name, optional } => {
                if let Some(segment) = segments.get(consumed).filter(|s| !s.is_empty()) {
                    params.insert(name.clone(), (*segment).to_string());
                    let found = self.match_tokens(rest, segments, consumed + 1, params, exact, strict);
                    if found.is_some() {
                        return found;
                    }
                    params.remove(name);
                }
                if !*optional {
                    return None;
                }
                self.match_tokens(rest, segments, consumed, params, exact, strict)
            }
            // `*` needs a separator after the prefix, so `/files/*` never matches `/files`.
            Token::Splat => {
                if consumed >= segments.len() {
                    return None;
                }
                params.insert("0".to_string(), segments[consumed..].join("/"));
                self.match_tokens(rest, segments, segments.len(), params, exact, strict)
            }
        }
    }

    fn finish(
        &self,
        segments: &[&str],
        consumed: usize,
        params: &BTreeMap<String, String>,
        exact: bool,
        strict: bool,
    ) -> Option<PathMatch> {
        let rest = &segments[consumed..];
        let prefix = format!("/{}", segments[..consumed].join("/"));
        let ends_with_slash = rest.len() == 1 && rest[0].is_empty();

        let (url, is_exact) = if rest.is_empty() {
            if strict && self.trailing_slash {
                return None;
            }
            (prefix, true)
        } else if ends_with_slash && (!strict || self.trailing_slash) {
            (format!("{prefix}/"), true)
        } else {
            (prefix, false)
        };

        if exact && !is_exact {
            return None;
        }

        Some(PathMatch {
            path: self.source.clone(),
            url,
            is_exact,
            params: params.clone(),
        })
    }
}

/// Convenience wrapper: parse `pattern` and match `pathname` against it.
///
/// A missing pattern behaves like `/` and matches every pathname.
pub fn match_path(
    pathname: &str,
    pattern: Option<&str>,
    exact: bool,
    strict: bool,
) -> Option<PathMatch> {
    PathPattern::parse(pattern.unwrap_or("/")).matches(pathname, exact, strict)
}
