use std::borrow::Cow;

use url::Url;

pub const MALFORMED_URL_PROMPT: &str = "This does not look like a valid URL. Are you sure you want to analyze it?\nYou can force the analysis by clicking on \"OK\".";
pub const TRUSTED_URL_PROMPT: &str = "This URL seems to point to an internal or fully trusted domain. Are you sure you want to analyze it?\nYou can force the analysis by clicking on \"OK\".";
pub const MALFORMED_HASH_PROMPT: &str = "This does not look like a valid hash format. Are you sure you want to analyze it?\nYou can force the analysis by clicking on \"OK\".";

/// The submission form's input tabs that carry validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTab {
    Url,
    Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Length of the hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha224 => 56,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 => 96,
            HashAlgorithm::Sha512 => 128,
        }
    }
}

/// Recognizes a raw hex digest by its length. The value is not trimmed.
pub fn recognize_hash(raw: &str) -> Option<HashAlgorithm> {
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    HashAlgorithm::ALL
        .into_iter()
        .find(|algorithm| algorithm.hex_len() == raw.len())
}

/// Prepends `http://` when the input has no scheme separator. Only used for
/// parsing; the raw input is what gets submitted.
pub fn normalize_for_parse(raw: &str) -> Cow<'_, str> {
    if raw.contains("://") {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("http://{raw}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlShape {
    WellFormed { scheme: String, host: String },
    Malformed,
}

/// Web scheme and a dotted host, or not.
pub fn inspect_url(raw: &str) -> UrlShape {
    let Ok(parsed) = Url::parse(&normalize_for_parse(raw)) else {
        return UrlShape::Malformed;
    };
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return UrlShape::Malformed;
    }
    match parsed.host_str() {
        Some(host) if host.contains('.') => UrlShape::WellFormed {
            scheme: scheme.to_string(),
            host: host.to_string(),
        },
        _ => UrlShape::Malformed,
    }
}

/// Synchronous verdict on a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Let the native submit go ahead.
    Allow,
    /// Ask the user; declining cancels the submit.
    Confirm(&'static str),
    /// Hold the submit and ask the backend whether the raw URL is safe.
    SafetyCheck(String),
}

/// Decides what happens to a submit given the expanded tab and the raw inputs.
pub fn gate(tab: Option<InputTab>, url_input: &str, hash_input: &str) -> Gate {
    match tab {
        Some(InputTab::Url) => match inspect_url(url_input) {
            UrlShape::WellFormed { .. } => Gate::SafetyCheck(url_input.to_string()),
            UrlShape::Malformed => Gate::Confirm(MALFORMED_URL_PROMPT),
        },
        Some(InputTab::Hash) => match recognize_hash(hash_input) {
            Some(_) => Gate::Allow,
            None => Gate::Confirm(MALFORMED_HASH_PROMPT),
        },
        None => Gate::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemeless_input_is_normalized() {
        assert_eq!(normalize_for_parse("example.com/x"), "http://example.com/x");
        assert_eq!(normalize_for_parse("https://a.b"), "https://a.b");
    }

    #[test]
    fn hash_lengths_map_to_algorithms() {
        for algorithm in HashAlgorithm::ALL {
            let digest = "a".repeat(algorithm.hex_len());
            assert_eq!(recognize_hash(&digest), Some(algorithm));
        }
        assert_eq!(recognize_hash(&"A".repeat(40)), Some(HashAlgorithm::Sha1));
    }

    #[test]
    fn bad_hashes_are_rejected() {
        assert_eq!(recognize_hash(&"a".repeat(41)), None);
        assert_eq!(recognize_hash(&format!("{}g", "a".repeat(39))), None);
        assert_eq!(recognize_hash(&format!(" {}", "a".repeat(40))), None);
        assert_eq!(recognize_hash(""), None);
    }
}
