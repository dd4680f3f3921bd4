// Email service configuration
use config_engine::de;
use serde::{Deserialize, Serialize};

/// Email provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailProvider {
    /// Generic SMTP server
    Smtp {
        #[serde(deserialize_with = "de::string")]
        host: String,
        port: u16,
        #[serde(default, deserialize_with = "de::option_string")]
        username: Option<String>,
        #[serde(default, deserialize_with = "de::option_string")]
        password: Option<String>,
        /// TLS from the first byte (usually port 465); otherwise STARTTLS.
        #[serde(default)]
        implicit_tls: bool,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmailProvider {
    fn default() -> Self {
        Self::Smtp {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
            implicit_tls: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmailProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Smtp { .. } => "smtp",
        }
    }
}

/// The message sent by [`crate::EmailService::send_notification`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Notification {
    pub to: Vec<String>,
    #[serde(deserialize_with = "de::string")]
    pub subject: String,
    #[serde(deserialize_with = "de::string")]
    pub body: String,
    pub html: bool,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            to: Vec::new(),
            subject: "Mailflow notification".to_string(),
            body: "This message was sent by a Mailflow workflow.".to_string(),
            html: false,
        }
    }
}

/// Email service configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub from_email: String,
    #[serde(deserialize_with = "de::string")]
    pub from_name: String,
    pub email_enabled: bool,
    pub notification: Notification,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::default(),
            from_email: "noreply@mailflow.local".to_string(),
            from_name: "Mailflow".to_string(),
            email_enabled: true,
            notification: Notification::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
provider:
  type: smtp
  host: mail.example.com
  port: 465
  implicit_tls: true
notification:
  to: ["ops@example.com"]
"#;
        let config: EmailConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            config.provider,
            EmailProvider::Smtp {
                host: "mail.example.com".to_string(),
                port: 465,
                username: None,
                password: None,
                implicit_tls: true,
                timeout_secs: 30,
            }
        );
        assert_eq!(config.from_name, "Mailflow");
        assert!(config.email_enabled);
        assert_eq!(config.notification.to, vec!["ops@example.com"]);
        assert_eq!(config.notification.subject, "Mailflow notification");
    }

    #[test]
    fn test_numeric_credentials_are_text() {
        let yaml = r#"
provider:
  type: smtp
  host: 10.0.0.5
  port: 2525
  username: 1001
  password: 123456
"#;
        let config: EmailConfig = serde_yaml::from_str(yaml).unwrap();

        let EmailProvider::Smtp {
            username, password, ..
        } = config.provider;
        assert_eq!(username.as_deref(), Some("1001"));
        assert_eq!(password.as_deref(), Some("123456"));
    }
}
