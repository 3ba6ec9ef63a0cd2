//! Interface to the log-group administration API.
//!
//! The reconciler only ever talks to this trait; production code binds it
//! to the real administration client, tests bind it to a recording mock.

use async_trait::async_trait;
use thiserror::Error;

/// Opaque error from the administration API.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AdminError {
    pub message: String,
}

impl AdminError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of log group names.
#[derive(Clone, Debug, Default)]
pub struct LogGroupPage {
    pub names: Vec<String>,
    /// Continuation token; absent (or empty) on the last page.
    pub next_token: Option<String>,
}

/// How records are spread across the destination. Only one logical value is
/// ever used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Distribution {
    #[default]
    ByLogStream,
}

/// Desired routing state for one log group.
///
/// Only `filter_name` and `filter_pattern` participate in drift detection;
/// the remaining fields are write-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub log_group_name: String,
    pub destination_arn: String,
    pub filter_name: String,
    pub filter_pattern: String,
    pub role_arn: String,
    pub distribution: Distribution,
}

/// An installed filter as reported back by the API.
#[derive(Clone, Debug)]
pub struct InstalledFilter {
    pub filter_name: String,
    pub filter_pattern: String,
}

/// Administration surface the reconciler drives.
#[async_trait]
pub trait LogsAdmin: Send + Sync {
    /// Lists one page of log group names under `prefix`.
    async fn list_log_groups(
        &self,
        prefix: &str,
        limit: usize,
        next_token: Option<&str>,
    ) -> Result<LogGroupPage, AdminError>;

    /// Creates the subscription filter. Fails when a conflicting filter
    /// already exists.
    async fn put_subscription_filter(&self, filter: &SubscriptionFilter)
        -> Result<(), AdminError>;

    /// Lists the filters currently installed on a log group.
    async fn describe_subscription_filters(
        &self,
        log_group_name: &str,
    ) -> Result<Vec<InstalledFilter>, AdminError>;

    /// Deletes an installed filter by name.
    async fn delete_subscription_filter(
        &self,
        log_group_name: &str,
        filter_name: &str,
    ) -> Result<(), AdminError>;

    /// Sets the retention policy on a log group.
    async fn put_retention_policy(
        &self,
        log_group_name: &str,
        retention_days: i32,
    ) -> Result<(), AdminError>;
}
