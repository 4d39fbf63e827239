use regex::Regex;
use url::Url;

/// Host used when the input carries a handle but no recognizable host
pub const DEFAULT_PROFILE_HOST: &str = "www.tiktok.com";

lazy_static::lazy_static! {
    static ref HANDLE: Regex = Regex::new(r"@[\w.]+").expect("valid handle regex");
}

/// Reduce any profile-related URL to the root profile URL.
///
/// `https://www.tiktok.com/@jane/video/123/` becomes
/// `https://www.tiktok.com/@jane`. Input without an `@handle` is returned
/// with trailing slashes removed and nothing else touched.
pub fn normalize(raw_url: &str) -> String {
    let stripped = raw_url.trim().trim_end_matches('/');

    match extract_handle(stripped) {
        Some(handle) => {
            let host = profile_host(stripped).unwrap_or_else(|| DEFAULT_PROFILE_HOST.to_string());
            format!("https://{host}/{handle}")
        }
        None => stripped.to_string(),
    }
}

/// The `@handle` token of a profile URL, if present
pub fn extract_handle(url: &str) -> Option<&str> {
    HANDLE.find(url).map(|m| m.as_str())
}

fn profile_host(url: &str) -> Option<String> {
    let parsed = if url.contains("://") {
        Url::parse(url).ok()?
    } else if url.starts_with('@') {
        return None;
    } else {
        Url::parse(&format!("https://{url}")).ok()?
    };

    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;
