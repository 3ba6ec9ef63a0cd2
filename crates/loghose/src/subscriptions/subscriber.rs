//! Subscription reconciliation across all matching log groups.
//!
//! For every log group under the configured prefix: skip it when it belongs
//! to the shipper itself, otherwise install the subscription filter (upsert
//! on a failed create) and re-apply the retention policy. Work is
//! sequential per group; one group's failure is logged and the pass moves
//! on.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::SubscriberConfig;
use crate::subscriptions::api::{AdminError, Distribution, LogsAdmin, SubscriptionFilter};

/// Page size used when enumerating log groups.
pub const LOG_GROUP_PAGE_SIZE: usize = 50;

/// Errors aborting reconciliation of a single log group (or, for listing,
/// the whole pass).
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("administration call failed: {0}")]
    Admin(#[from] AdminError),

    #[error("no subscription filter installed on [{log_group}] after a failed create")]
    NoInstalledFilter { log_group: String },
}

/// Drives one end-to-end subscription pass.
pub struct Subscriber<A> {
    admin: A,
    config: SubscriberConfig,
}

impl<A: LogsAdmin> Subscriber<A> {
    #[must_use]
    pub fn new(admin: A, config: SubscriberConfig) -> Self {
        Self { admin, config }
    }

    /// Read access to the underlying administration client.
    #[must_use]
    pub fn admin(&self) -> &A {
        &self.admin
    }

    /// Runs the full pass over every log group under the configured prefix.
    ///
    /// Listing failures abort the pass; per-group failures are logged and
    /// the remaining groups are still processed.
    pub async fn subscribe_all(&self) -> Result<(), SubscribeError> {
        let log_groups = self.list_log_groups().await?;

        for log_group in &log_groups {
            if log_group.ends_with(&self.config.shipper_function_name) {
                info!(
                    "SUBSCRIBER | Skipping [{log_group}] because it would create cyclic events from its own logs"
                );
                continue;
            }

            if let Err(e) = self.reconcile_log_group(log_group).await {
                error!("SUBSCRIBER | Reconciliation failed for [{log_group}]: {e}");
            }
        }

        Ok(())
    }

    /// Accumulates every matching log group name across pages.
    async fn list_log_groups(&self) -> Result<Vec<String>, SubscribeError> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .admin
                .list_log_groups(
                    &self.config.log_group_prefix,
                    LOG_GROUP_PAGE_SIZE,
                    next_token.as_deref(),
                )
                .await?;
            names.extend(page.names);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(names)
    }

    async fn reconcile_log_group(&self, log_group: &str) -> Result<(), SubscribeError> {
        info!("SUBSCRIBER | Subscribing [{log_group}]");
        self.subscribe_log_group(log_group).await?;

        info!(
            "SUBSCRIBER | Updating retention policy to [{} days] for [{log_group}]",
            self.config.retention_days
        );
        self.admin
            .put_retention_policy(log_group, self.config.retention_days)
            .await?;

        Ok(())
    }

    fn desired_filter(&self, log_group: &str) -> SubscriptionFilter {
        SubscriptionFilter {
            log_group_name: log_group.to_string(),
            destination_arn: self.config.destination_arn.clone(),
            filter_name: self.config.filter_name.clone(),
            filter_pattern: self.config.filter_pattern.clone(),
            role_arn: self.config.role_arn.clone(),
            distribution: Distribution::ByLogStream,
        }
    }

    /// Unconditional create, falling back to the upsert path on failure.
    ///
    /// A successful create never checks for drift: create fails iff a
    /// filter already exists.
    async fn subscribe_log_group(&self, log_group: &str) -> Result<(), SubscribeError> {
        let desired = self.desired_filter(log_group);

        if let Err(e) = self.admin.put_subscription_filter(&desired).await {
            warn!("SUBSCRIBER | Failed to subscribe [{log_group}]: {e}");
            self.upsert_subscription_filter(&desired).await?;
        }

        Ok(())
    }

    /// Compares the first installed filter against the desired state and
    /// replaces it on drift: delete-old and create-new run concurrently and
    /// both are awaited.
    async fn upsert_subscription_filter(
        &self,
        desired: &SubscriptionFilter,
    ) -> Result<(), SubscribeError> {
        debug!(
            "SUBSCRIBER | Upserting subscription filter for [{}]",
            desired.log_group_name
        );

        let installed = self
            .admin
            .describe_subscription_filters(&desired.log_group_name)
            .await?;
        let Some(current) = installed.first() else {
            return Err(SubscribeError::NoInstalledFilter {
                log_group: desired.log_group_name.clone(),
            });
        };

        if current.filter_name == desired.filter_name
            && current.filter_pattern == desired.filter_pattern
        {
            // Already in the desired state
            return Ok(());
        }

        let (deleted, created) = tokio::join!(
            self.admin
                .delete_subscription_filter(&desired.log_group_name, &current.filter_name),
            self.admin.put_subscription_filter(desired),
        );
        deleted?;
        created?;

        Ok(())
    }
}
