//! Request path policy.
//!
//! Paths are checked literally, as received: nothing is decoded or
//! normalized first. A rejected path is answered with 404.

use std::fmt;

/// Why a request path was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRejection {
    Empty,
    NotAbsolute,
    Charset,
    Traversal,
}

impl fmt::Display for PathRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            PathRejection::Empty => "empty path",
            PathRejection::NotAbsolute => "path does not start with '/'",
            PathRejection::Charset => "path contains a disallowed character",
            PathRejection::Traversal => "path escapes the root directory",
        };
        f.write_str(reason)
    }
}

/// Runs every check in order.
pub fn check(path: &str) -> Result<(), PathRejection> {
    if path.is_empty() {
        return Err(PathRejection::Empty);
    }
    if !path.starts_with('/') {
        return Err(PathRejection::NotAbsolute);
    }
    if !has_allowed_charset(path) {
        return Err(PathRejection::Charset);
    }
    if escapes_root(path) {
        return Err(PathRejection::Traversal);
    }
    Ok(())
}

/// Only `[0-9a-zA-Z./-]` may appear in a served path.
pub fn has_allowed_charset(path: &str) -> bool {
    path.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'/' | b'-'))
}

/// Tracks directory depth across the path and reports whether any prefix
/// climbs above the root.
///
/// A `/..` segment moves up one level, a `/.` segment stays put, an empty
/// segment (`//`) is ignored and anything else moves down one level.
///
/// This is stricter than counting only `/../` against every other `/`:
/// `/./../x` and a trailing `/..` are both caught, and no path accepted
/// here would be rejected by that simpler count.
pub fn escapes_root(path: &str) -> bool {
    let bytes = path.as_bytes();
    let mut depth: i64 = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'/' {
            continue;
        }

        let rest = &bytes[i + 1..];
        if is_segment(rest, b"..") {
            depth -= 1;
        } else if is_segment(rest, b".") || rest.first() == Some(&b'/') {
            // stays at the same level
        } else {
            depth += 1;
        }

        if depth < 0 {
            return true;
        }
    }

    false
}

// Whether `rest` begins with the segment `name`, followed by `/` or the end.
fn is_segment(rest: &[u8], name: &[u8]) -> bool {
    match rest.strip_prefix(name) {
        Some(after) => after.is_empty() || after[0] == b'/',
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_pass() {
        assert_eq!(check("/"), Ok(()));
        assert_eq!(check("/index.html"), Ok(()));
        assert_eq!(check("/a/b-c/d.tar.gz"), Ok(()));
    }

    #[test]
    fn structure_checks() {
        assert_eq!(check(""), Err(PathRejection::Empty));
        assert_eq!(check("index.html"), Err(PathRejection::NotAbsolute));
        assert_eq!(check("*"), Err(PathRejection::NotAbsolute));
    }

    #[test]
    fn charset() {
        assert!(!has_allowed_charset("/a b"));
        assert!(!has_allowed_charset("/search?q=x"));
        assert!(!has_allowed_charset("/a_b"));
        assert!(!has_allowed_charset("/%2e%2e/"));
        assert!(has_allowed_charset("/A-z.0/9"));
    }

    #[test]
    fn traversal_from_root() {
        assert!(escapes_root("/../etc/passwd"));
        assert!(escapes_root("/.."));
        assert!(escapes_root("/a/../../b"));
    }

    #[test]
    fn traversal_within_root_allowed() {
        assert!(!escapes_root("/a/../b"));
        assert!(!escapes_root("/a/b/../../c"));
        assert!(!escapes_root("/a/.."));
    }

    #[test]
    fn dot_and_empty_segments_do_not_add_depth() {
        assert!(escapes_root("/./../x"));
        assert!(escapes_root("//../x"));
        assert!(!escapes_root("/a//b/../.."));
    }

    #[test]
    fn dotted_names_are_not_parent_refs() {
        assert!(!escapes_root("/..a/b"));
        assert!(!escapes_root("/.hidden"));
        assert!(!escapes_root("/a/...b"));
    }

    #[test]
    fn traversal_rejected_regardless_of_charset() {
        // '?' fails the charset, but the traversal check alone still fires.
        assert!(escapes_root("/../etc?x"));
        assert_eq!(check("/../etc/passwd"), Err(PathRejection::Traversal));
    }
}
