use crate::utils::error::ErrorKind;
use regex::Regex;
use std::sync::LazyLock;

pub const EMAIL_MAX_LENGTH: usize = 254;
pub const EMAIL_LOCAL_MAX_LENGTH: usize = 64;
pub const GSM_MAX_LENGTH: usize = 12;
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

static LOCAL_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._+-]+$").unwrap());
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.-]+$").unwrap());
static NUMBER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Syntactic email check. Rules are applied in a fixed order and the first
/// violation wins; no DNS lookup is made.
pub fn validate_email(email: &str) -> Result<(), ErrorKind> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ErrorKind::Empty);
    }

    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err(ErrorKind::TooLong);
    }

    if !email.contains('@') {
        return Err(ErrorKind::MissingAt);
    }

    let parts: Vec<&str> = email.split('@').collect();
    let [local, domain] = parts.as_slice() else {
        return Err(ErrorKind::InvalidFormat);
    };

    if local.is_empty() {
        return Err(ErrorKind::NoLocalPart);
    }
    if local.chars().count() > EMAIL_LOCAL_MAX_LENGTH {
        return Err(ErrorKind::InvalidFormat);
    }

    if domain.is_empty() {
        return Err(ErrorKind::NoDomain);
    }
    if !domain.contains('.') {
        return Err(ErrorKind::NoDot);
    }

    let extension = domain.rsplit('.').next().unwrap_or_default();
    if extension.chars().count() < 2 {
        return Err(ErrorKind::InvalidDomainExt);
    }

    if !LOCAL_PART_RE.is_match(local) || !DOMAIN_RE.is_match(domain) {
        return Err(ErrorKind::InvalidChars);
    }

    if local.starts_with('.') || local.ends_with('.') {
        return Err(ErrorKind::InvalidFormat);
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return Err(ErrorKind::InvalidFormat);
    }
    if local.contains("..") || domain.contains("..") {
        return Err(ErrorKind::InvalidFormat);
    }

    Ok(())
}

/// Digits only, everything else dropped.
pub fn normalize_gsm(gsm: &str) -> String {
    gsm.chars().filter(char::is_ascii_digit).collect()
}

/// Input-time cleanup for the GSM field: digits only, cut to `max_length`.
pub fn sanitize_gsm(value: &str, max_length: usize) -> String {
    normalize_gsm(value).chars().take(max_length).collect()
}

pub fn validate_gsm(gsm: &str) -> Result<(), ErrorKind> {
    let digits = normalize_gsm(gsm);
    if digits.is_empty() {
        return Err(ErrorKind::Empty);
    }
    if digits.len() > GSM_MAX_LENGTH {
        return Err(ErrorKind::TooLong);
    }
    Ok(())
}

/// Parses a score entry from its longest leading decimal number, so "85abc"
/// reads as 85. Input without a leading number is `OUT_OF_RANGE`, as is
/// anything outside `SCORE_MIN..=SCORE_MAX`. Fractional scores are kept as given.
pub fn validate_score(input: &str) -> Result<f64, ErrorKind> {
    let prefix = NUMBER_PREFIX_RE
        .find(input.trim_start())
        .ok_or(ErrorKind::OutOfRange)?;
    let score: f64 = prefix.as_str().parse().map_err(|_| ErrorKind::OutOfRange)?;
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(ErrorKind::OutOfRange);
    }
    Ok(score)
}
