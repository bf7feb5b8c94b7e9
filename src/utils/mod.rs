//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Extract `owner/name` from a GitHub repository URL.
///
/// Accepts `github.com` and `www.github.com` hosts and ignores anything after
/// the second path segment, so links to files, issues or trees still resolve
/// to their repository. A trailing `.git` is stripped.
pub fn github_repo_from_url(url_str: &str) -> Option<(String, String)> {
    let url = Url::parse(url_str.trim()).ok()?;
    let host = url.host_str()?;
    if host != "github.com" && host != "www.github.com" {
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    let name = name.strip_suffix(".git").unwrap_or(name);

    let valid = |s: &str| {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    if valid(owner) && valid(name) {
        Some((owner.to_string(), name.to_string()))
    } else {
        None
    }
}
