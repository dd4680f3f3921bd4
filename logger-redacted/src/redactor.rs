use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
}

/// What to redact and how.
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    /// Replace values with a short stable hash instead of a mask, so the same
    /// address can be followed across log lines.
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hash_for_correlation: true,
        }
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        self.redact_emails(text)
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let email = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", hash_value(email));
                }
                match email.split_once('@') {
                    Some((local, domain)) => {
                        format!("{}***@{}***", first_char(local), first_char(domain))
                    }
                    None => "***@***".to_string(),
                }
            })
            .to_string()
    }
}

fn first_char(s: &str) -> String {
    s.chars().next().map(String::from).unwrap_or_default()
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // first 8 bytes keep the tag short
    general_purpose::STANDARD_NO_PAD.encode(digest.get(..8).unwrap_or_default())
}
