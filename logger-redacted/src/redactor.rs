use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref NPI_REGEX: Regex = Regex::new(r"\b\d{10}\b").unwrap();
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"\(\d{3}\)\s?\d{3}-\d{4}|\b\d{3}[-.]\d{3}[-.]\d{4}\b").unwrap();
}

/// Number of trailing characters left visible by `mask_identifier`
const VISIBLE_SUFFIX: usize = 4;

/// Mask a member or provider identifier for logging, keeping the last four characters.
///
/// Identifiers of four characters or fewer are masked entirely.
pub fn mask_identifier(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX {
        return "***".to_string();
    }
    let suffix: String = value.chars().skip(len - VISIBLE_SUFFIX).collect();
    format!("***{suffix}")
}

/// Short, stable digest of a value so redacted log lines can still be correlated
pub fn correlation_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    general_purpose::URL_SAFE_NO_PAD.encode(&digest[..8])
}

/// Redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_npis: bool,
    pub redact_ssn: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_npis: true,
            redact_ssn: true,
            redact_emails: true,
            redact_phones: true,
            hash_for_correlation: true,
        }
    }
}

/// Redactor for free-text log content (error messages, rejected payload excerpts)
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // SSNs and phones before NPIs: a bare ten digit phone would otherwise read as an NPI
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", "***-**-****");
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", "(***) ***-****");
        }

        if self.config.redact_npis {
            result = self.replace(&NPI_REGEX, &result, "NPI", "**********");
        }

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", "***@***");
        }

        result
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    format!("{label}[{}]", correlation_hash(&caps[0]))
                } else {
                    mask.to_string()
                }
            })
            .to_string()
    }
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("1497775530"), "***5530");
        assert_eq!(mask_identifier("6546546"), "***6546");
        assert_eq!(mask_identifier("1234"), "***");
        assert_eq!(mask_identifier(""), "***");
    }

    #[test]
    fn test_npi_redaction() {
        let redacted = masking_redactor().redact("provider 1497775530 rejected");
        assert_eq!(redacted, "provider ********** rejected");
    }

    #[test]
    fn test_phone_is_not_read_as_npi() {
        let redacted = masking_redactor().redact("call 555-123-4567");
        assert_eq!(redacted, "call (***) ***-****");
    }

    #[test]
    fn test_correlation_hash_is_stable() {
        let redactor = PiiRedactor::default();
        let first = redactor.redact("npi 1497775530");
        let second = redactor.redact("npi 1497775530");
        assert_eq!(first, second);
        assert!(first.starts_with("npi NPI["));
        assert!(!first.contains("1497775530"));
    }
}
