use chrono::NaiveDate;
use url::{Host, Url};
use validator::ValidateEmail;

/// Syntactic patterns a string field can be held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `vMAJOR.MINOR.PATCH` with an optional `.BUILD` segment.
    Version,
    /// `#RRGGBB`.
    HexColor,
    /// Absolute `http` or `https` URL with a host.
    Url,
    /// `YYYY-MM-DD`, and a real calendar date.
    Date,
    Email,
    /// Exactly `n` ASCII digits.
    Digits(usize),
}

impl Format {
    pub fn matches(self, value: &str) -> bool {
        match self {
            Format::Version => is_version(value),
            Format::HexColor => is_hex_color(value),
            Format::Url => is_url(value),
            Format::Date => is_date(value),
            Format::Email => is_email(value),
            Format::Digits(n) => value.len() == n && value.bytes().all(|b| b.is_ascii_digit()),
        }
    }

    pub(crate) fn message(self, label: &str) -> String {
        match self {
            Format::Version => {
                format!("{label} harus berformat vMAJOR.MINOR.PATCH, contoh v1.0.0")
            }
            Format::HexColor => format!("{label} harus berupa warna hex, contoh #FF69B4"),
            Format::Url => format!("{label} harus berupa URL yang valid"),
            Format::Date => format!("{label} harus berformat YYYY-MM-DD"),
            Format::Email => format!("{label} harus berupa email yang valid"),
            Format::Digits(n) => format!("{label} harus terdiri dari {n} digit"),
        }
    }
}

fn is_version(value: &str) -> bool {
    let Some(rest) = value.strip_prefix('v') else {
        return false;
    };
    let segments: Vec<&str> = rest.split('.').collect();
    (3..=4).contains(&segments.len())
        && segments
            .iter()
            .all(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

fn is_url(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https")
        && match url.host() {
            Some(Host::Domain(domain)) => is_hostname(domain),
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
            None => false,
        }
}

/// Dot-separated labels of letters, digits and inner hyphens.
fn is_hostname(domain: &str) -> bool {
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// RFC 5322 address whose domain has at least one dot.
fn is_email(value: &str) -> bool {
    value.validate_email()
        && value
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

fn is_date(value: &str) -> bool {
    // chrono accepts single-digit months and days; the wire format does not.
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_requires_prefix_and_three_or_four_segments() {
        assert!(Format::Version.matches("v1.0.0"));
        assert!(Format::Version.matches("v2.10.3.45"));
        assert!(!Format::Version.matches("1.0.0"));
        assert!(!Format::Version.matches("v1.0"));
        assert!(!Format::Version.matches("v1.0.0.0.0"));
        assert!(!Format::Version.matches("v1..0"));
        assert!(!Format::Version.matches("v1.0.x"));
    }

    #[test]
    fn hex_color() {
        assert!(Format::HexColor.matches("#FF69B4"));
        assert!(Format::HexColor.matches("#ff69b4"));
        assert!(!Format::HexColor.matches("FF69B4"));
        assert!(!Format::HexColor.matches("#ZZZZZZ"));
        assert!(!Format::HexColor.matches("#FFF"));
    }

    #[test]
    fn url() {
        assert!(Format::Url.matches("https://radio.example.go.id/stream"));
        assert!(Format::Url.matches("http://localhost:8000/live?x=1"));
        assert!(!Format::Url.matches("not-a-url"));
        assert!(!Format::Url.matches("ftp://example.com"));
        assert!(!Format::Url.matches("https://"));
        assert!(!Format::Url.matches("https://exa mple.com"));
    }

    #[test]
    fn url_rejects_malformed_hosts_and_ports() {
        for bad in ["https://...", "http://-", "https://example.com:99999", "https://a..b/x", "https://-a.com"] {
            assert!(!Format::Url.matches(bad), "{bad}");
        }
        assert!(Format::Url.matches("http://10.0.0.7/stream"));
        assert!(Format::Url.matches("https://sub-domain.example.co.id:8443/a?b=c"));
    }

    #[test]
    fn date_checks_calendar() {
        assert!(Format::Date.matches("2024-02-29"));
        assert!(!Format::Date.matches("2023-02-29"));
        assert!(!Format::Date.matches("2024-13-01"));
        assert!(!Format::Date.matches("2024-1-01"));
        assert!(!Format::Date.matches("17-08-2024"));
        assert!(!Format::Date.matches("2024-08-1"));
        assert!(!Format::Date.matches("2024-04-31"));
    }

    #[test]
    fn email_and_digits() {
        assert!(Format::Email.matches("tamu@pemkot.go.id"));
        assert!(!Format::Email.matches("tamu@localhost"));
        assert!(!Format::Email.matches("@pemkot.go.id"));
        assert!(!Format::Email.matches("a@b..c"));
        assert!(!Format::Email.matches("tamu pemkot@go.id"));
        assert!(Format::Digits(4).matches("1234"));
        assert!(!Format::Digits(4).matches("12a4"));
        assert!(!Format::Digits(4).matches("12345"));
    }
}
