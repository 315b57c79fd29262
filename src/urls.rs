// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! URL hygiene: normalization, validation, and stable ids.
//!
//! The crawl frontier these corpora come from is full of calendar traps,
//! session tokens, VCS mirrors, and binary assets. Validation is a gauntlet:
//! scheme check, domain allow-list, trap-substring scan, then a binary/media
//! extension check on the path. A URL has to clear all four to be indexed.
//!
//! Normalization drops the fragment and query and trims one trailing slash,
//! so `http://x.edu/a?b#c` and `http://x.edu/a/` collapse to the same
//! document identity. Ids are the first 32 bits of the MD5 of the normalized
//! URL; they are stable across builds, which is what lets a doc map from one
//! build be compared against another.

use crate::types::DocId;
use url::Url;

/// Host suffixes accepted by default. An entry containing a `/` is split into
/// a host suffix and a required path prefix.
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 5] = [
    "ics.uci.edu",
    "cs.uci.edu",
    "informatics.uci.edu",
    "stat.uci.edu",
    "today.uci.edu/department/information_computer_sciences",
];

/// Substrings that mark crawler traps and low-value endpoints.
///
/// Checked against the raw URL. `.sql`, `/attachment`, and `releases/` have
/// special handling in [`is_valid`].
const TRAP_PATTERNS: [&str; 51] = [
    "/calendar",
    "/event",
    "?action=login",
    "timeline?",
    "/history",
    "rev=",
    "version=",
    "/diff?version=",
    "?share=",
    "/?afg",
    "/img_",
    ".ppsx",
    "/git",
    "sort=",
    "orderby=",
    "/print/",
    "/export/",
    "/preview/",
    "/feed/",
    "sandbox",
    "staging",
    "test=",
    "/archive/",
    "/archives/",
    "/version/",
    "/versions/",
    "mailto:",
    "share=",
    "/backup/",
    "/mirror/",
    "admin=",
    "user=",
    "auth=",
    "captcha",
    "trackback",
    "?sessionid=",
    "?token=",
    "releases/",
    "src/",
    "source/",
    ".svn/",
    "/build/",
    "/dist/",
    "/static/",
    "/tmp/",
    "/text-base/",
    "/props/",
    "/prop-base/",
    "/format",
    "/all-wcprops",
    "/attachment",
];

/// Directories whose `.txt` files are machine output, not content.
const LOW_VALUE_DIRS: [&str; 6] = ["precision", "test", "demo", "features", "output", "logs"];

/// Path suffixes for binary and media assets the analyzer cannot use.
const BINARY_EXTENSIONS: [&str; 66] = [
    ".css", ".js", ".bmp", ".gif", ".jpeg", ".jpg", ".ico", ".png", ".tiff", ".tif", ".mid",
    ".mp2", ".mp3", ".mp4", ".wav", ".avi", ".mov", ".mpeg", ".ram", ".m4v", ".mkv", ".ogg",
    ".ogv", ".pdf", ".ps", ".eps", ".tex", ".ppt", ".pptx", ".doc", ".docx", ".xls", ".xlsx",
    ".names", ".data", ".dat", ".exe", ".bz2", ".tar", ".msi", ".bin", ".7z", ".psd", ".dmg",
    ".iso", ".epub", ".dll", ".cnf", ".tgz", ".sha1", ".thmx", ".mso", ".arff", ".rtf", ".jar",
    ".csv", ".rm", ".smil", ".wmv", ".swf", ".wma", ".zip", ".rar", ".gz", ".img", ".ppsx",
];

/// Canonical form of a URL: no fragment, no query, at most one trailing
/// slash trimmed. Unparseable input is returned unchanged; it will fail
/// validation anyway.
pub fn normalize(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    parsed.set_fragment(None);
    parsed.set_query(None);

    let mut normalized = parsed.to_string();
    if normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Full validation gauntlet. `allowed_domains` uses the entry format of
/// [`DEFAULT_ALLOWED_DOMAINS`].
pub fn is_valid(url: &str, allowed_domains: &[String]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };

    if !allowed_domains
        .iter()
        .any(|entry| domain_entry_matches(entry, host, parsed.path()))
    {
        return false;
    }

    let url_lower = url.to_lowercase();
    if url_lower.ends_with(".txt")
        && LOW_VALUE_DIRS
            .iter()
            .any(|dir| url_lower.contains(&format!("/{dir}/")))
    {
        return false;
    }
    if url_lower.ends_with(".sql") {
        return false;
    }

    for pattern in TRAP_PATTERNS {
        if !url.contains(pattern) {
            continue;
        }
        // Release pages are allowed when they point at real documents.
        if pattern == "releases/" && is_release_document(url) {
            continue;
        }
        return false;
    }

    let path_lower = parsed.path().to_lowercase();
    !BINARY_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext))
}

/// First 32 bits of the MD5 of the URL, the same id a string-keyed JSON store
/// round-trips as its decimal rendering.
pub fn stable_id(url: &str) -> DocId {
    let digest = md5::compute(url.as_bytes());
    DocId(u32::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3],
    ]))
}

fn domain_entry_matches(entry: &str, host: &str, path: &str) -> bool {
    match entry.split_once('/') {
        Some((host_part, path_prefix)) => {
            host.ends_with(host_part) && path.trim_start_matches('/').starts_with(path_prefix)
        }
        None => host.ends_with(entry),
    }
}

/// `releases/` URLs survive only as `.../releases/<something>.html|.htm|.txt`.
fn is_release_document(url: &str) -> bool {
    let Some(idx) = url.find("/releases/") else {
        return false;
    };
    let rest = &url[idx + "/releases/".len()..];
    !rest.is_empty()
        && (url.ends_with(".html") || url.ends_with(".htm") || url.ends_with(".txt"))
}
