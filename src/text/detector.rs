//! Link and phone number detection
//!
//! URLs come from `linkify`; phone numbers from a regex candidate scan that
//! is then validated by digit count. Both streams are merged into a single
//! left-to-right list of non-overlapping matches.

use linkify::{LinkFinder, LinkKind};
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;
use url::Url;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;
const MIN_LAST_GROUP_DIGITS: usize = 3;

fn phone_candidate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:\+\d{1,3}[ .-]?)?(?:\(\d{1,4}\)[ .-]?)?\d{1,5}(?:[ .-]?\d{1,5}){1,5}")
            .expect("phone pattern is valid")
    })
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d{4}-\d{2}-\d{2}|\d{1,2}[ ./-]\d{1,2}[ ./-]\d{4})$").expect("date pattern is valid")
    })
}

/// A normalized phone number: digit groups joined by `-`, with an optional
/// leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize a detected number. Returns `None` when the digit count is
    /// outside 7..=15, the text contains anything but digits and common
    /// separators, the last group is shorter than 3 digits, or the text reads
    /// as a decimal (`3.14159265`).
    pub fn parse(candidate: &str) -> Option<Self> {
        let candidate = candidate.trim();
        let (international, rest) = match candidate.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, candidate),
        };
        if !international && is_decimal(rest) {
            return None;
        }

        let mut groups: Vec<&str> = Vec::new();
        for group in rest.split(|c: char| matches!(c, ' ' | '.' | '-' | '(' | ')')) {
            if group.is_empty() {
                continue;
            }
            if !group.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            groups.push(group);
        }

        let digits: usize = groups.iter().map(|g| g.len()).sum();
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
            return None;
        }
        if groups.last().is_some_and(|g| g.len() < MIN_LAST_GROUP_DIGITS) {
            return None;
        }

        let joined = groups.join("-");
        Some(if international {
            Self(format!("+{}", joined))
        } else {
            Self(joined)
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits only, keeping a leading `+`
    pub fn dial_string(&self) -> String {
        self.0.chars().filter(|c| *c != '-').collect()
    }

    /// `tel:` URL for the platform dialer
    pub fn tel_url(&self) -> Option<Url> {
        self.scheme_url("tel")
    }

    /// URL for another number-based scheme such as `sms` or `facetime-audio`
    pub fn scheme_url(&self, scheme: &str) -> Option<Url> {
        Url::parse(&format!("{}:{}", scheme, self.dial_string())).ok()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a match points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanPayload {
    Link(Url),
    Phone(PhoneNumber),
}

impl SpanPayload {
    pub fn kind(&self) -> SpanKind {
        match self {
            Self::Link(_) => SpanKind::Link,
            Self::Phone(_) => SpanKind::Phone,
        }
    }

    /// Text placed on the clipboard by a Copy action
    pub fn copy_text(&self) -> String {
        match self {
            Self::Link(url) => url.to_string(),
            Self::Phone(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Link,
    Phone,
}

/// A detected link or phone number. `range` is in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub range: Range<usize>,
    pub payload: SpanPayload,
}

/// Combined link and phone number detector
#[derive(Debug)]
pub struct Detector {
    finder: LinkFinder,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    pub fn new() -> Self {
        let mut finder = LinkFinder::new();
        finder.kinds(&[LinkKind::Url]);
        finder.url_must_have_scheme(false);
        Self { finder }
    }

    /// All matches in `text`, sorted by start and never overlapping.
    ///
    /// Where candidates overlap the one starting first wins, and among those
    /// starting at the same byte the longest.
    pub fn detect(&self, text: &str) -> Vec<Detection> {
        let mut candidates = self.detect_links(text);
        candidates.extend(detect_phone_numbers(text));
        resolve_overlaps(candidates)
    }

    fn detect_links(&self, text: &str) -> Vec<Detection> {
        let mut links = Vec::new();
        for link in self.finder.links(text) {
            let start = link.start();
            let (matched, _) = strip_trailing_punctuation(link.as_str());
            if matched.is_empty() {
                continue;
            }

            match parse_url(matched) {
                Some(url) => links.push(Detection {
                    range: start..start + matched.len(),
                    payload: SpanPayload::Link(url),
                }),
                None => tracing::trace!("Dropping malformed link candidate {:?}", matched),
            }
        }
        links
    }
}

fn detect_phone_numbers(text: &str) -> Vec<Detection> {
    let mut numbers = Vec::new();
    for m in phone_candidate_regex().find_iter(text) {
        if !is_token_boundary(text, m.start(), m.end()) {
            continue;
        }
        let (matched, range) = trim_short_tail(m.as_str(), m.range());
        if date_regex().is_match(matched) {
            continue;
        }

        match PhoneNumber::parse(matched) {
            Some(number) => numbers.push(Detection {
                range,
                payload: SpanPayload::Phone(number),
            }),
            None => tracing::trace!("Dropping phone candidate {:?}", matched),
        }
    }
    numbers
}

/// Drop a trailing 1-2 digit token after a space, so `555 1234 2 times`
/// matches `555 1234` rather than swallowing the count.
fn trim_short_tail(matched: &str, range: Range<usize>) -> (&str, Range<usize>) {
    match matched.rsplit_once(' ') {
        Some((head, tail))
            if !head.is_empty() && tail.len() < MIN_LAST_GROUP_DIGITS && tail.chars().all(|c| c.is_ascii_digit()) =>
        {
            let head = head.trim_end();
            (head, range.start..range.start + head.len())
        }
        _ => (matched, range),
    }
}

/// Two digit groups joined by a single `.`
fn is_decimal(text: &str) -> bool {
    text.matches('.').count() == 1 && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn resolve_overlaps(mut candidates: Vec<Detection>) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then_with(|| b.range.len().cmp(&a.range.len()))
    });

    let mut accepted: Vec<Detection> = Vec::with_capacity(candidates.len());
    let mut cursor = 0;
    for candidate in candidates {
        if candidate.range.start < cursor {
            continue;
        }
        cursor = candidate.range.end;
        accepted.push(candidate);
    }
    accepted
}

fn parse_url(matched: &str) -> Option<Url> {
    match Url::parse(matched) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{}", matched)).ok(),
        Err(_) => None,
    }
}

/// A number glued to letters or digits (`abc5551234`, `5551234x`) is not a
/// phone number.
fn is_token_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric() || c == '+')
        && !after.is_some_and(|c| c.is_alphanumeric())
}

fn strip_trailing_punctuation(s: &str) -> (&str, &str) {
    let trimmed = s.trim_end_matches(|c: char| {
        matches!(c, '.' | ',' | '?' | '!' | ':' | ';' | ')' | ']' | '\'' | '"')
    });
    (trimmed, &s[trimmed.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Detection> {
        Detector::new().detect(text)
    }

    #[test]
    fn test_phone_number_normalization() {
        assert_eq!(PhoneNumber::parse("555-1234").unwrap().as_str(), "555-1234");
        assert_eq!(PhoneNumber::parse("(555) 123-4567").unwrap().as_str(), "555-123-4567");
        assert_eq!(PhoneNumber::parse("+1 555.123.4567").unwrap().as_str(), "+1-555-123-4567");
        assert!(PhoneNumber::parse("12-34").is_none());
        assert!(PhoneNumber::parse("1234567890123456").is_none());
        assert!(PhoneNumber::parse("555-12a4").is_none());
    }

    #[test]
    fn test_phone_urls() {
        let number = PhoneNumber::parse("+1 555 123 4567").unwrap();
        assert_eq!(number.dial_string(), "+15551234567");
        assert_eq!(number.tel_url().unwrap().as_str(), "tel:+15551234567");
        assert_eq!(number.scheme_url("sms").unwrap().as_str(), "sms:+15551234567");
    }

    #[test]
    fn test_detects_phone_number() {
        let text = "call 555-1234";
        let found = detect(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].range.clone()], "555-1234");
        assert_eq!(
            found[0].payload,
            SpanPayload::Phone(PhoneNumber::parse("555-1234").unwrap())
        );
    }

    #[test]
    fn test_detects_url_without_trailing_period() {
        let text = "see https://example.com/docs.";
        let found = detect(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].range.clone()], "https://example.com/docs");
        match &found[0].payload {
            SpanPayload::Link(url) => assert_eq!(url.as_str(), "https://example.com/docs"),
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn test_schemeless_link_gets_http() {
        let found = detect("visit www.rust-lang.org today");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].payload.copy_text(), "http://www.rust-lang.org/");
    }

    #[test]
    fn test_number_inside_url_is_not_a_phone() {
        let text = "https://example.com/555-1234-999";
        let found = detect(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].payload.kind(), SpanKind::Link);
        assert_eq!(found[0].range, 0..text.len());
    }

    #[test]
    fn test_mixed_matches_are_ordered() {
        let text = "Ring +44 20 7946 0958 or read https://rust-lang.org then 555-1234";
        let found = detect(text);
        let kinds: Vec<SpanKind> = found.iter().map(|d| d.payload.kind()).collect();
        assert_eq!(kinds, vec![SpanKind::Phone, SpanKind::Link, SpanKind::Phone]);
        assert!(found.windows(2).all(|w| w[0].range.end <= w[1].range.start));
    }

    #[test]
    fn test_rejects_non_phone_numbers() {
        assert!(detect("released on 2024-01-15").is_empty());
        assert!(detect("order 42 costs 1999").is_empty());
        assert!(detect("id abc5551234567").is_empty());
    }

    #[test]
    fn test_rejects_decimals_and_counts() {
        assert!(detect("ratio 3.14159265 ok").is_empty());
        assert!(detect("price 1234567.89 dollars").is_empty());
        assert!(detect("Meet at 10 30 2024 room 5").is_empty());
        assert!(detect("due 12/31/2024").is_empty());
        assert!(PhoneNumber::parse("555-1234-2").is_none());

        let text = "call 555 1234 2 times";
        let found = detect(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].range.clone()], "555 1234");
        assert_eq!(found[0].payload, SpanPayload::Phone(PhoneNumber::parse("555-1234").unwrap()));
    }

    #[test]
    fn test_overlap_prefers_earliest_then_longest() {
        let candidates = vec![
            Detection {
                range: 4..10,
                payload: SpanPayload::Phone(PhoneNumber::parse("5551234").unwrap()),
            },
            Detection {
                range: 0..6,
                payload: SpanPayload::Phone(PhoneNumber::parse("5551234").unwrap()),
            },
            Detection {
                range: 0..8,
                payload: SpanPayload::Phone(PhoneNumber::parse("5551235").unwrap()),
            },
            Detection {
                range: 12..14,
                payload: SpanPayload::Phone(PhoneNumber::parse("5551236").unwrap()),
            },
        ];
        let resolved = resolve_overlaps(candidates);
        let ranges: Vec<Range<usize>> = resolved.into_iter().map(|d| d.range).collect();
        assert_eq!(ranges, vec![0..8, 12..14]);
    }

    #[test]
    fn test_empty_text() {
        assert!(detect("").is_empty());
    }
}
