//! Domain extraction from free text and URLs

use url::Url;

/// Hosts treated as social platforms
pub const SOCIAL_MEDIA_DOMAINS: [&str; 8] = [
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
    "linkedin.com",
    "reddit.com",
];

const URL_PREFIXES: [&str; 3] = ["https://", "http://", "www."];

/// Lower-cased host of `url` with any leading `www.` removed.
///
/// Scheme-less input such as `www.example.com/path` is accepted.
pub fn domain_of(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = if url.contains("://") {
        Url::parse(url).ok()?
    } else {
        Url::parse(&format!("http://{}", url)).ok()?
    };

    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Unique domains of the URLs referenced in `text`, in first-seen order
pub fn extract_domains(text: &str) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();

    for token in text.split_whitespace() {
        let lowered = token.to_ascii_lowercase();
        let Some(start) = URL_PREFIXES.iter().filter_map(|p| lowered.find(p)).min() else {
            continue;
        };

        let candidate = lowered[start..]
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '>' | '"' | '\''));

        if let Some(domain) = domain_of(candidate) {
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
    }

    domains
}

/// Whether `url` points at a known social platform
pub fn is_social_media_url(url: &str) -> bool {
    domain_of(url).is_some_and(|d| SOCIAL_MEDIA_DOMAINS.contains(&d.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(
            domain_of("https://www.Example.com/a?b=c"),
            Some("example.com".to_string())
        );
        assert_eq!(domain_of("bit.ly/abc"), Some("bit.ly".to_string()));
        assert_eq!(domain_of("http://localhost:8000/x"), Some("localhost".to_string()));
        assert_eq!(domain_of(""), None);
        assert_eq!(domain_of("   "), None);
    }

    #[test]
    fn test_extract_domains_from_text() {
        let text = "Claim it at https://bit.ly/abc, or (www.tinyurl.com/x). Also HTTPS://Bit.ly/other";
        assert_eq!(extract_domains(text), vec!["bit.ly", "tinyurl.com"]);
    }

    #[test]
    fn test_extract_domains_ignores_plain_words() {
        assert!(extract_domains("no links in here, just words.").is_empty());
        assert!(extract_domains("").is_empty());
    }

    #[test]
    fn test_unparseable_url_is_skipped() {
        assert!(extract_domains("broken http:// link").is_empty());
    }

    #[test]
    fn test_social_media_url() {
        assert!(is_social_media_url("https://twitter.com/user123/status/1"));
        assert!(is_social_media_url("https://www.reddit.com/r/rust"));
        assert!(!is_social_media_url("https://hackerforum.com/threads/123"));
        assert!(!is_social_media_url("not a url"));
    }
}
