//! Customer directory
//!
//! Owns the customer record lifecycle: lookup by phone, create-if-absent,
//! reconcile-and-save. The sole writer of customer records — every address
//! mutation in the system funnels through `upsert`.
//!
//! Concurrent upserts for the same phone are resolved optimistically: the
//! write-back is guarded by the row version and retried on conflict, so
//! neither writer's address edits are lost.

use crate::customers::reconciler::{self, ReconcileError};
use crate::db::DbService;
use crate::db::repository::{self, RepoError};
use shared::models::{Address, Customer, CustomerUpsert};
use thiserror::Error;
use tracing::{debug, info};

/// Directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    /// Optimistic-concurrency retries exhausted; operational, not part of
    /// the caller-facing taxonomy.
    #[error("Customer write conflict persisted after {0} retries")]
    ConflictRetriesExhausted(u32),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Customer directory service
#[derive(Clone)]
pub struct CustomerDirectory {
    db: DbService,
    retry_limit: u32,
}

impl CustomerDirectory {
    pub fn new(db: DbService, retry_limit: u32) -> Self {
        Self { db, retry_limit }
    }

    pub async fn find_by_phone(&self, phone: &str) -> DirectoryResult<Option<Customer>> {
        let phone = phone.trim();
        Ok(repository::customer::find_by_phone(&self.db.pool, phone).await?)
    }

    /// Create-or-update a customer and resolve the address selected for the
    /// current order.
    ///
    /// Rejected upserts (unresolvable selection, negative cost) persist
    /// nothing. Version conflicts and create races are retried with a fresh
    /// read up to the configured bound.
    pub async fn upsert(
        &self,
        input: CustomerUpsert,
    ) -> DirectoryResult<(Customer, Option<Address>)> {
        let phone = input.phone.trim().to_string();
        let selected = input.selected_address_text.as_deref();

        for attempt in 0..=self.retry_limit {
            match repository::customer::find_by_phone(&self.db.pool, &phone).await? {
                None => {
                    let merged = reconciler::reconcile(&[], &input.addresses, selected)?;
                    let now = shared::util::now_millis();
                    let customer = Customer {
                        id: shared::util::snowflake_id(),
                        phone: phone.clone(),
                        name: input.name.clone().unwrap_or_default(),
                        comment: input.comment.clone(),
                        addresses: merged.addresses,
                        version: 0,
                        created_at: now,
                        updated_at: now,
                    };
                    match repository::customer::insert(&self.db.pool, &customer).await {
                        Ok(()) => {
                            info!(
                                customer_id = customer.id,
                                phone = %customer.phone,
                                address_count = customer.addresses.len(),
                                "Customer created"
                            );
                            return Ok((customer, merged.selected));
                        }
                        // Lost the create race; re-read and merge into the winner.
                        Err(RepoError::Duplicate(_)) => {
                            debug!(phone = %phone, attempt, "Create race lost, retrying as update");
                            continue;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Some(existing) => {
                    let merged =
                        reconciler::reconcile(&existing.addresses, &input.addresses, selected)?;
                    let name = input.name.as_deref().unwrap_or(&existing.name);
                    let comment = input
                        .comment
                        .as_deref()
                        .or(existing.comment.as_deref());

                    let written = repository::customer::update_guarded(
                        &self.db.pool,
                        existing.id,
                        name,
                        comment,
                        &merged.addresses,
                        existing.version,
                    )
                    .await?;

                    if !written {
                        debug!(
                            customer_id = existing.id,
                            attempt, "Version conflict on customer write, retrying"
                        );
                        continue;
                    }

                    let customer = Customer {
                        name: name.to_string(),
                        comment: comment.map(str::to_string),
                        addresses: merged.addresses,
                        version: existing.version + 1,
                        updated_at: shared::util::now_millis(),
                        ..existing
                    };
                    return Ok((customer, merged.selected));
                }
            }
        }

        Err(DirectoryError::ConflictRetriesExhausted(self.retry_limit))
    }
}
