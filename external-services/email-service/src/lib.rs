//! Email notifications for Mailflow workflows
//!
//! Sends plain text or HTML mail through an SMTP relay using Stalwart Labs'
//! `mail-send` and `mail-builder`. The configured notification can be sent
//! without arguments, which is what workflow tasks bind to.
//!
//! # Example
//!
//! ```rust,no_run
//! use email_service::{EmailConfig, EmailService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = EmailConfig::default();
//!     config.notification.to = vec!["ops@example.com".to_string()];
//!
//!     let service = EmailService::new(config)?;
//!     let message_id = service.send_notification().await?;
//!     println!("sent {message_id}");
//!     Ok(())
//! }
//! ```
//!
//! # Configuration Example
//!
//! ```yaml
//! email:
//!   provider:
//!     type: smtp
//!     host: "smtp.example.com"
//!     port: 587
//!     username: "mailer"
//!     password: "secret"
//!     implicit_tls: false
//!   from_email: "noreply@example.com"
//!   from_name: "Mailflow"
//!   email_enabled: true
//!   notification:
//!     to: ["ops@example.com"]
//!     subject: "Daily report"
//!     body: "The report is ready."
//!     html: false
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::*;
pub use error::*;
pub use service::*;
