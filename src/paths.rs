//! Path utilities for document path normalization
//!
//! Document paths inside an uploaded index are repository-relative strings
//! using `/` separators regardless of the host OS, so these helpers work on
//! `str` with POSIX semantics instead of `std::path::Path`.

use url::Url;

/// Parent-directory token marking a path that escapes its base directory.
pub const PARENT_DIR: &str = "..";

/// Lexically normalize a `/`-separated path.
///
/// - Collapses empty and `.` segments
/// - Resolves `..` against the preceding segment when there is one
/// - Keeps leading `..` segments of relative paths (they escape the base)
/// - Drops `..` directly under `/` for absolute paths
/// - Preserves a trailing slash
///
/// An empty result is returned as `"."`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing_slash = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            PARENT_DIR => match segments.last() {
                Some(&last) if last != PARENT_DIR => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(PARENT_DIR),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if normalized.is_empty() {
        normalized.push('.');
    }
    if trailing_slash && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Join `path` onto `base` and normalize the result.
///
/// Empty components are skipped, so `join("", "a/b.ts")` is `"a/b.ts"` and
/// `join("src", "../x.ts")` is `"x.ts"`. An absolute `path` is appended to
/// `base`, not substituted for it.
pub fn join(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => normalize(path),
        (false, true) => normalize(base),
        (false, false) => normalize(&format!("{base}/{path}")),
    }
}

/// POSIX `dirname`: `"a/b.ts"` -> `"a"`, `"b.ts"` -> `"."`, `"/b"` -> `"/"`.
pub fn dirname(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rfind('/') {
        None => ".".to_string(),
        Some(idx) => {
            let parent = trimmed[..idx].trim_end_matches('/');
            if parent.is_empty() {
                "/".to_string()
            } else {
                parent.to_string()
            }
        }
    }
}

/// Return the dirname of the given path.
///
/// Returns the empty string if the path denotes a file in the current
/// directory, so the repository top level is keyed as `""`.
pub fn dirname_without_dot(path: &str) -> String {
    let parent = dirname(path);
    if parent == "." { String::new() } else { parent }
}

/// Last segment of a path, ignoring any trailing slash.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Whether a path starts with the parent-directory token.
pub fn escapes_root(path: &str) -> bool {
    path == PARENT_DIR || path.starts_with("../")
}

/// Compute the path of `document_uri` relative to `project_root`.
///
/// `project_root` is always treated as a directory (a trailing slash is
/// added when missing). Ports are compared after parsing, so a scheme's
/// default port written out (`http://h:80`) matches the same URL without it.
/// When the two URLs do not share scheme, host and port the document URI is
/// returned unchanged. Query and fragment of the document URI are kept.
pub fn relative_path(project_root: &Url, document_uri: &Url) -> String {
    let same_origin = project_root.scheme() == document_uri.scheme()
        && project_root.host_str() == document_uri.host_str()
        && project_root.port() == document_uri.port()
        && project_root.username() == document_uri.username();
    if !same_origin {
        return document_uri.as_str().to_string();
    }

    let root_path = project_root.path();
    let root_segments: Vec<&str> = root_path
        .trim_end_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let target_path = document_uri.path();
    let target_is_dir = target_path.ends_with('/');
    let mut target_segments: Vec<&str> = target_path.split('/').filter(|s| !s.is_empty()).collect();
    // The final segment names the file unless the target is itself a directory
    let target_file = if target_is_dir { None } else { target_segments.pop() };

    let common = root_segments
        .iter()
        .zip(target_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat_n(PARENT_DIR, root_segments.len() - common));
    parts.extend(&target_segments[common..]);

    let mut relative = parts.join("/");
    if target_is_dir && !relative.is_empty() {
        relative.push('/');
    }
    if let Some(file) = target_file {
        if !relative.is_empty() {
            relative.push('/');
        }
        relative.push_str(file);
    }
    if let Some(query) = document_uri.query() {
        relative.push('?');
        relative.push_str(query);
    }
    if let Some(fragment) = document_uri.fragment() {
        relative.push('#');
        relative.push_str(fragment);
    }
    relative
}
