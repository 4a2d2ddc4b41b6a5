//! # Path Codec
//!
//! Pure functions over the 44-character identifier space.
//!
//! An identifier is either the base-64 encoding of a 32-byte public key or
//! a path-encoded synthetic key padded to the same width. The two
//! distinguished shapes are:
//!
//! - labelling keys, `//label//` plus padding, which announce a directory
//!   or bind a label to a sender;
//! - path keys, `root/node1/.../nodeK/+++` plus padding, where the
//!   trailing `+` run encodes a revision number.
//!
//! Padding characters are `'0'` to length 43 followed by a single `'='`,
//! so every synthetic key is itself a decodable 32-byte value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{PublicKey, PUB_KEY_STRING_LENGTH};

lazy_static! {
    /// A labelling key reads `//<non-slash-content>//` once padding is gone.
    static ref LABELLING_RE: Regex =
        Regex::new("//([^/]+)//").expect("labelling pattern compiles");
}

/// A directory path decoded from a recipient identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflatedPath {
    /// First path segment, before any revision folding; names the
    /// directory the path belongs to.
    pub root_label: String,
    /// Path nodes in root-to-leaf order. A node whose child carries a
    /// revision run has that run folded onto its own identifier
    /// (`node/+++`), so each node is uniquely named by the revision chain
    /// above it.
    pub nodes: Vec<String>,
    /// Count of trailing `+` characters in the revision segment.
    pub revision: u32,
}

/// Canonicalize an identifier to the 44-character key width.
///
/// Inputs at or above the width pass through unchanged. Anything shorter
/// gains a `/` terminator (unless it is the root sentinel `"0"` or already
/// contains one), zero padding to 43 characters and a `=` suffix, matching
/// the base-64 shape of a real key.
pub fn pad44(input: &str) -> String {
    if input.len() >= PUB_KEY_STRING_LENGTH {
        return input.to_string();
    }

    let mut padded = String::with_capacity(PUB_KEY_STRING_LENGTH);
    padded.push_str(input);
    if input != "0" && !input.contains('/') {
        padded.push('/');
    }
    while padded.len() < PUB_KEY_STRING_LENGTH - 1 {
        padded.push('0');
    }
    padded.push('=');
    padded
}

/// String form of a transaction's sender or recipient key.
///
/// The absent sender (coinbase, directory announcements) stringifies to
/// the padded root sentinel so it lands on the graph's root sink.
pub fn pub_key_to_string(pub_key: Option<&PublicKey>) -> String {
    match pub_key {
        Some(key) => STANDARD.encode(key),
        None => pad44("0"),
    }
}

/// Recognize a labelling key and extract its label.
///
/// The label is the padding-trimmed key with surrounding slashes removed
/// and `+` decoded to a space.
pub fn is_labelling(key: &str) -> Option<String> {
    if !key.starts_with("//") {
        return None;
    }
    let trimmed = key.trim_end_matches(['0', '=']);
    if !LABELLING_RE.is_match(trimmed) {
        return None;
    }
    Some(trimmed.trim_matches('/').replace('+', " "))
}

/// Interpret an identifier as a directory path.
///
/// Validation runs over the key with padding, revision runs and trailing
/// slashes removed: the path must be non-empty and contain no empty
/// segments. The returned nodes keep interior revision runs, with each
/// run folded onto its parent's identifier.
pub fn inflate_nodes(key: &str) -> Option<InflatedPath> {
    let coarse = key.trim_end_matches(['/', '+', '0', '=']);
    let segments: Vec<&str> = coarse.split('/').collect();
    if segments.is_empty() || segments[0].is_empty() {
        return None;
    }
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    // Re-split keeping any revision segment.
    let fine = key.trim_end_matches(['0', '=']);
    let mut nodes: Vec<String> = fine.split('/').map(str::to_string).collect();

    let mut revision = 0u32;
    if let Some(last) = nodes.last() {
        if last.trim_matches('+').is_empty() {
            revision = last.len() as u32;
            nodes.pop();
        }
    }

    let root_label = nodes.first()?.clone();

    // Fold each child's revision run onto its parent's identifier.
    for i in 0..nodes.len() {
        if i + 1 < nodes.len() {
            let run: String = nodes[i + 1].chars().take_while(|&c| c == '+').collect();
            if !run.is_empty() {
                nodes[i].push('/');
                nodes[i].push_str(&run);
            }
        }
    }

    Some(InflatedPath {
        root_label,
        nodes,
        revision,
    })
}

/// Progressively rounded copies of a block height.
///
/// Returns `n, n−(n mod 10), n−(n mod 100), …` for moduli up to the
/// largest power of ten at or below `n`, deduplicated preserving order.
/// `diminishing_orders(0)` is `[0]`.
pub fn diminishing_orders(n: i64) -> Vec<i64> {
    if n == 0 {
        return vec![0];
    }

    let mut orders = vec![n];
    let mut last = n;
    let mut power: i64 = 10;
    while power <= n {
        let rounded = n - n % power;
        if rounded != last {
            orders.push(rounded);
            last = rounded;
        }
        power = match power.checked_mul(10) {
            Some(next) => next,
            None => break,
        };
    }
    orders
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== pad44 ==========

    #[test]
    fn test_pad44_root_sentinel() {
        let padded = pad44("0");
        assert_eq!(padded.len(), 44);
        assert!(padded.starts_with('0'));
        assert!(padded.ends_with('='));
        // The sentinel keeps no slash terminator.
        assert!(!padded.contains('/'));
    }

    #[test]
    fn test_pad44_appends_slash_to_bare_label() {
        let padded = pad44("docs");
        assert!(padded.starts_with("docs/"));
        assert_eq!(padded.len(), 44);
        assert!(padded.ends_with('='));
    }

    #[test]
    fn test_pad44_keeps_existing_slash() {
        let padded = pad44("docs/intro");
        assert!(padded.starts_with("docs/intro0"));
        assert_eq!(padded.len(), 44);
    }

    #[test]
    fn test_pad44_full_width_unchanged() {
        let key = "A".repeat(44);
        assert_eq!(pad44(&key), key);
    }

    #[test]
    fn test_pad44_idempotent() {
        for input in ["0", "docs", "docs/intro/+", "//docs//"] {
            let once = pad44(input);
            assert_eq!(pad44(&once), once);
        }
    }

    #[test]
    fn test_padded_synthetic_key_decodes_to_32_bytes() {
        let decoded = STANDARD.decode(pad44("//docs//")).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    // ========== pub_key_to_string ==========

    #[test]
    fn test_pub_key_to_string_absent_is_root() {
        assert_eq!(pub_key_to_string(None), pad44("0"));
    }

    #[test]
    fn test_pub_key_to_string_is_44_chars() {
        let key: PublicKey = [0x5A; 32];
        let encoded = pub_key_to_string(Some(&key));
        assert_eq!(encoded.len(), 44);
        assert!(encoded.ends_with('='));
    }

    // ========== is_labelling ==========

    #[test]
    fn test_is_labelling_simple() {
        assert_eq!(is_labelling(&pad44("//docs//")), Some("docs".to_string()));
    }

    #[test]
    fn test_is_labelling_decodes_plus_as_space() {
        assert_eq!(
            is_labelling(&pad44("//my+docs//")),
            Some("my docs".to_string())
        );
    }

    #[test]
    fn test_is_labelling_rejects_plain_path() {
        assert_eq!(is_labelling(&pad44("docs/intro")), None);
    }

    #[test]
    fn test_is_labelling_rejects_unclosed_label() {
        // No closing `//` before the padding.
        assert_eq!(is_labelling(&pad44("//docs/")), None);
    }

    #[test]
    fn test_is_labelling_rejects_empty_label() {
        assert_eq!(is_labelling(&pad44("////")), None);
    }

    // ========== inflate_nodes ==========

    #[test]
    fn test_inflate_single_node() {
        let path = inflate_nodes(&pad44("docs")).unwrap();
        assert_eq!(path.root_label, "docs");
        assert_eq!(path.nodes, vec!["docs"]);
        assert_eq!(path.revision, 0);
    }

    #[test]
    fn test_inflate_two_nodes() {
        let path = inflate_nodes(&pad44("docs/intro")).unwrap();
        assert_eq!(path.root_label, "docs");
        assert_eq!(path.nodes, vec!["docs", "intro"]);
        assert_eq!(path.revision, 0);
    }

    #[test]
    fn test_inflate_trailing_revision_run() {
        let path = inflate_nodes(&pad44("docs/intro/++")).unwrap();
        assert_eq!(path.root_label, "docs");
        // The revision segment is dropped from the nodes.
        assert_eq!(path.nodes, vec!["docs", "intro"]);
        assert_eq!(path.revision, 2);
    }

    #[test]
    fn test_inflate_folds_child_revision_onto_parent() {
        let path = inflate_nodes(&pad44("docs/intro/++revised")).unwrap();
        assert_eq!(path.root_label, "docs");
        assert_eq!(path.nodes, vec!["docs", "intro/++", "++revised"]);
        assert_eq!(path.revision, 0);
    }

    #[test]
    fn test_inflate_root_label_taken_before_folding() {
        let path = inflate_nodes(&pad44("docs/+v2")).unwrap();
        assert_eq!(path.root_label, "docs");
        assert_eq!(path.nodes, vec!["docs/+", "+v2"]);
    }

    #[test]
    fn test_inflate_rejects_leading_slash() {
        assert!(inflate_nodes(&pad44("/docs")).is_none());
        assert!(inflate_nodes(&pad44("//docs//")).is_none());
    }

    #[test]
    fn test_inflate_rejects_interior_empty_segment() {
        assert!(inflate_nodes(&pad44("docs//intro")).is_none());
    }

    #[test]
    fn test_inflate_rejects_empty_key() {
        assert!(inflate_nodes(&pad44("0")).is_none());
        assert!(inflate_nodes("").is_none());
    }

    // ========== diminishing_orders ==========

    #[test]
    fn test_diminishing_orders_zero() {
        assert_eq!(diminishing_orders(0), vec![0]);
    }

    #[test]
    fn test_diminishing_orders_single_digit() {
        assert_eq!(diminishing_orders(7), vec![7]);
    }

    #[test]
    fn test_diminishing_orders_full_sequence() {
        assert_eq!(diminishing_orders(1234), vec![1234, 1230, 1200, 1000]);
    }

    #[test]
    fn test_diminishing_orders_dedupes_round_numbers() {
        assert_eq!(diminishing_orders(1000), vec![1000]);
        assert_eq!(diminishing_orders(1230), vec![1230, 1200, 1000]);
    }
}
