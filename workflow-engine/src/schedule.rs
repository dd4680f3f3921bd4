// Workflow recurrence
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::{Result, WorkflowError};

/// When a workflow runs on its own.
///
/// `Manual` workflows have no recurrence and only run when explicitly
/// triggered. `Cron` carries a validated expression in the six or seven
/// field format (seconds first) or one of the `@daily` style presets.
#[derive(Debug, Clone, Default)]
pub enum Schedule {
    #[default]
    Manual,
    Cron {
        expression: String,
        schedule: cron::Schedule,
    },
}

impl Schedule {
    /// Parse a recurrence expression.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidSchedule`] when the expression is blank
    /// or not understood by the cron parser.
    pub fn cron(expression: &str) -> Result<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(WorkflowError::InvalidSchedule {
                expression: expression.to_string(),
                reason: "expression is empty".to_string(),
            });
        }

        let schedule =
            cron::Schedule::from_str(trimmed).map_err(|e| WorkflowError::InvalidSchedule {
                expression: trimmed.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::Cron {
            expression: trimmed.to_string(),
            schedule,
        })
    }

    /// Build from an optional expression; `None` means manual only.
    ///
    /// # Errors
    ///
    /// See [`Schedule::cron`].
    pub fn from_expression(expression: Option<&str>) -> Result<Self> {
        expression.map_or(Ok(Self::Manual), Self::cron)
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }

    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Manual => None,
            Self::Cron { expression, .. } => Some(expression),
        }
    }

    /// Next fire time strictly after `after`, never earlier than `not_before`.
    pub fn next_after(
        &self,
        after: DateTime<Utc>,
        not_before: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            Self::Manual => None,
            Self::Cron { schedule, .. } => {
                let from = if after < not_before {
                    not_before - chrono::Duration::seconds(1)
                } else {
                    after
                };
                schedule.after(&from).next()
            }
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("none"),
            Self::Cron { expression, .. } => f.write_str(expression),
        }
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
