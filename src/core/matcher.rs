// cross-tool name equivalence
//
// Two tools rarely agree on how to spell the same package or class. The
// matcher decides whether a name from one tool and a name from another tool
// denote the same thing. Both algorithms walk the token sequences from the
// end, because tools disagree on leading namespaces far more often than on
// the trailing (most specific) segments.
use crate::core::types::{Granularity, NamingConvention};

pub const DEFAULT_SEPARATOR: &str = ".";
pub const DEFAULT_UNKNOWN_MARKER: &str = "(";

#[derive(Clone, Debug)]
pub struct NameMatcher {
    granularity: Granularity,
    separator: String,
    unknown_marker: String,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(Granularity::Package, DEFAULT_SEPARATOR, DEFAULT_UNKNOWN_MARKER)
    }
}

impl NameMatcher {
    pub fn new(granularity: Granularity, separator: &str, unknown_marker: &str) -> Self {
        Self {
            granularity,
            separator: separator.to_string(),
            unknown_marker: unknown_marker.to_string(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Decide whether `existing` (stored under `existing_conv`) and
    /// `incoming` (reported under `incoming_conv`) name the same entity.
    ///
    /// At class level the conventions assign the dotted and the underscored
    /// side. Two tools sharing a convention must agree on the exact spelling.
    pub fn equivalent(
        &self,
        existing: &str,
        existing_conv: NamingConvention,
        incoming: &str,
        incoming_conv: NamingConvention,
    ) -> bool {
        match self.granularity {
            Granularity::Package => same_package(existing, incoming, &self.separator),
            Granularity::Class => match (existing_conv, incoming_conv) {
                (NamingConvention::Dotted, NamingConvention::Underscored) => {
                    same_class(existing, incoming, &self.unknown_marker)
                }
                (NamingConvention::Underscored, NamingConvention::Dotted) => {
                    same_class(incoming, existing, &self.unknown_marker)
                }
                _ => existing == incoming,
            },
        }
    }

    /// Remove the first matching root namespace (plus its separator) from
    /// the front of `name`. A name equal to a bare prefix is left untouched.
    pub fn strip_root<'a>(&self, name: &'a str, prefixes: &[String]) -> &'a str {
        for prefix in prefixes {
            if let Some(rest) = name
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix(self.separator.as_str()))
            {
                if !rest.is_empty() {
                    return rest;
                }
            }
        }
        name
    }
}

/// Package-level equivalence: the shorter segment sequence must be a suffix
/// of the longer one.
pub fn same_package(a: &str, b: &str, separator: &str) -> bool {
    if a == b {
        return true;
    }

    let a_parts: Vec<&str> = a.split(separator).collect();
    let b_parts: Vec<&str> = b.split(separator).collect();

    let (shorter, longer) = if a_parts.len() <= b_parts.len() {
        (&a_parts, &b_parts)
    } else {
        (&b_parts, &a_parts)
    };

    shorter
        .iter()
        .rev()
        .zip(longer.iter().rev())
        .all(|(s, l)| s == l)
}

/// Class-level equivalence between a dot-qualified name and an
/// underscore-flattened one.
///
/// The last dotted segment is split on `_` as well, so an inner class whose
/// own name contains underscores lines up token for token. Tokens are
/// compared from the end, ASCII case-insensitively, and a pair matches when
/// one token is a prefix of the other (tools truncate long names). An
/// underscored token starting with `unknown_marker` is an unresolved
/// placeholder and accepts the rest of the name unconditionally. Running out
/// of tokens on either side without a mismatch is a match.
pub fn same_class(dotted: &str, underscored: &str, unknown_marker: &str) -> bool {
    if dotted == underscored {
        return true;
    }

    let mut dotted_tokens: Vec<&str> = dotted.split('.').collect();
    if let Some(last) = dotted_tokens.pop() {
        dotted_tokens.extend(last.split('_'));
    }
    let mut underscored_tokens = underscored.split('_').rev();

    for d in dotted_tokens.iter().rev() {
        let Some(u) = underscored_tokens.next() else {
            return true;
        };
        if !unknown_marker.is_empty() && u.starts_with(unknown_marker) {
            return true;
        }
        if !tokens_agree(d, u) {
            return false;
        }
    }

    true
}

fn tokens_agree(dotted: &str, underscored: &str) -> bool {
    let d = dotted.to_ascii_lowercase();
    let u = underscored.to_ascii_lowercase();
    u.starts_with(&d) || d.starts_with(&u)
}
