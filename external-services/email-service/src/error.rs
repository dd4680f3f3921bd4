use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("SMTP connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No recipients configured")]
    NoRecipients,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Invalid email configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type EmailResult<T> = Result<T, EmailError>;
