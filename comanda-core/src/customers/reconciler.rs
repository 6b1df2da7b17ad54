//! Address reconciliation
//!
//! Merges a caller-proposed address list into a customer's persisted
//! collection without duplicating or losing entries. Pure function over
//! the two input collections; persistence is the directory's job.
//!
//! Per proposed entry, in precedence order:
//! 1. a caller-supplied id matching an existing address updates that
//!    address in place (text and delivery cost), keeping its id;
//! 2. a stale/foreign id is discarded and the entry falls through;
//! 3. an existing address with the same text (case-sensitive) gets its
//!    delivery cost updated, keeping its id;
//! 4. anything else is appended with a freshly assigned id.
//!
//! Existing addresses absent from the proposal survive unchanged. Within
//! one call each existing address can be matched at most once — first
//! match wins, a later entry re-using a spent id falls through to the
//! text rule and only appends when that misses too.

use shared::models::{Address, ProposedAddress};
use std::collections::HashSet;
use thiserror::Error;

/// Reconciliation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The designated address text is not in the merged collection.
    #[error("Address not associated with customer: {0}")]
    AddressNotAssociated(String),

    #[error("Delivery cost must be non-negative for address '{text}', got {delivery_cost}")]
    NegativeDeliveryCost { text: String, delivery_cost: i64 },
}

/// Result of a reconcile run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Full merged collection, existing entries first, appends in
    /// proposal order.
    pub addresses: Vec<Address>,
    /// The address matching `selected_text`, when one was requested.
    pub selected: Option<Address>,
}

/// Merge `proposed` into `existing` and resolve the selected address.
pub fn reconcile(
    existing: &[Address],
    proposed: &[ProposedAddress],
    selected_text: Option<&str>,
) -> Result<Reconciled, ReconcileError> {
    let mut merged: Vec<Address> = existing.to_vec();
    // Appends in this call are not match targets; only the persisted
    // snapshot is.
    let existing_len = merged.len();
    let mut matched: HashSet<usize> = HashSet::new();
    // Ids are never reused: the collection never shrinks, so max+1 is safe.
    let mut next_id = merged.iter().map(|a| a.id).max().unwrap_or(0) + 1;

    for entry in proposed {
        if entry.delivery_cost < 0 {
            return Err(ReconcileError::NegativeDeliveryCost {
                text: entry.text.clone(),
                delivery_cost: entry.delivery_cost,
            });
        }

        // 1. Match by id (stale/foreign ids fall through as if absent).
        if let Some(id) = entry.id
            && let Some(idx) = (0..existing_len).find(|i| merged[*i].id == id)
            && !matched.contains(&idx)
        {
            merged[idx].text = entry.text.clone();
            merged[idx].delivery_cost = entry.delivery_cost;
            matched.insert(idx);
            continue;
        }

        // 2. Match by text (case-sensitive natural key).
        if let Some(idx) =
            (0..existing_len).find(|i| !matched.contains(i) && merged[*i].text == entry.text)
        {
            merged[idx].delivery_cost = entry.delivery_cost;
            matched.insert(idx);
            continue;
        }

        // 3. Fresh entry.
        merged.push(Address {
            id: next_id,
            text: entry.text.clone(),
            delivery_cost: entry.delivery_cost,
        });
        next_id += 1;
    }

    let selected = match selected_text {
        None => None,
        Some(text) => Some(
            merged
                .iter()
                .find(|a| a.text == text)
                .cloned()
                .ok_or_else(|| ReconcileError::AddressNotAssociated(text.to_string()))?,
        ),
    };

    Ok(Reconciled {
        addresses: merged,
        selected,
    })
}
