//! Order service
//!
//! The exposed operations of the engine: create, update, transition.
//! Sequencing of a create is deliberate: line items are validated and
//! priced *before* the customer upsert commits, so a rejected order never
//! leaves a stray customer/address write behind.

use super::compiler;
use super::error::{OrderError, OrderResult};
use super::lifecycle::{self, Transition};
use super::sequencer::OrderSequencer;
use crate::customers::CustomerDirectory;
use crate::db::DbService;
use crate::db::repository;
use shared::models::{
    Address, BuyerInput, BuyerRef, CustomerUpsert, LineItemSnapshot, Order, OrderCreate,
    OrderStatus, OrderUpdate, ProposedAddress,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Order engine facade
#[derive(Clone)]
pub struct OrderService {
    db: DbService,
    directory: CustomerDirectory,
    sequencer: OrderSequencer,
    retry_limit: u32,
}

/// Buyer resolution outcome: the tagged buyer plus the address snapshot
/// fields for the order.
struct ResolvedBuyer {
    buyer: BuyerRef,
    selected_address_text: Option<String>,
    delivery_cost: i64,
}

impl OrderService {
    pub fn new(db: DbService, directory: CustomerDirectory, retry_limit: u32) -> Self {
        let sequencer = OrderSequencer::new(db.clone());
        Self {
            db,
            directory,
            sequencer,
            retry_limit,
        }
    }

    pub fn sequencer(&self) -> &OrderSequencer {
        &self.sequencer
    }

    pub async fn get_order(&self, order_id: &str) -> OrderResult<Order> {
        repository::order::find_by_id(&self.db.pool, order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Create an order: validate → price → resolve buyer → total →
    /// number → persist with `status = Preparing`.
    pub async fn create_order(&self, input: OrderCreate) -> OrderResult<Order> {
        compiler::validate_line_items(&input.line_items)?;
        let line_items = self
            .price_line_items(&input.restaurant_id, &input.line_items)
            .await?;

        // Only now, with the order known to be priceable, may the
        // customer record be touched.
        let resolved = self
            .resolve_buyer(
                &input.buyer,
                &input.addresses,
                input.selected_address_text.as_deref(),
            )
            .await?;

        let total = compiler::order_total(&line_items, resolved.delivery_cost);
        let order_number = self.sequencer.next(&input.restaurant_id).await?;

        let now = shared::util::now_millis();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            restaurant_id: input.restaurant_id,
            order_number,
            line_items,
            payment_method: input.payment_method,
            section: input.section,
            status: OrderStatus::Preparing,
            buyer: resolved.buyer,
            selected_address_text: resolved.selected_address_text,
            delivery_cost: resolved.delivery_cost,
            total,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        };
        repository::order::insert(&self.db.pool, &order).await?;

        info!(
            order_id = %order.id,
            restaurant_id = %order.restaurant_id,
            order_number = order.order_number,
            section = order.section.as_str(),
            total = order.total,
            "Order created"
        );
        Ok(order)
    }

    /// Update a non-terminal order. Line items, payment method and buyer/
    /// address fields are editable only while `Preparing`; the comment
    /// stays editable until a terminal state. The write is guarded by the
    /// status the order was read in and retried on a concurrent transition.
    pub async fn update_order(&self, order_id: &str, input: OrderUpdate) -> OrderResult<Order> {
        for attempt in 0..=self.retry_limit {
            let order = self.get_order(order_id).await?;

            if !lifecycle::can_edit_comment(order.status) {
                return Err(OrderError::OrderNotEditable {
                    status: order.status,
                });
            }
            let content_edit = input.line_items.is_some()
                || input.payment_method.is_some()
                || input.buyer.is_some()
                || input.addresses.is_some()
                || input.selected_address_text.is_some();
            if content_edit && !lifecycle::can_edit_content(order.status) {
                return Err(OrderError::OrderNotEditable {
                    status: order.status,
                });
            }

            let line_items: Vec<LineItemSnapshot> = match &input.line_items {
                Some(items) => {
                    compiler::validate_line_items(items)?;
                    self.price_line_items(&order.restaurant_id, items).await?
                }
                None => order.line_items.clone(),
            };

            // Buyer/address changes re-run the same resolution as create;
            // absent buyer input keeps the compile-time snapshots.
            let resolved = match &input.buyer {
                Some(buyer) => {
                    let addresses = input.addresses.clone().unwrap_or_default();
                    let selected = input.selected_address_text.as_deref();
                    self.resolve_buyer(buyer, &addresses, selected).await?
                }
                None => {
                    if input.selected_address_text.is_some() || input.addresses.is_some() {
                        return Err(OrderError::AddressWithoutCustomer);
                    }
                    ResolvedBuyer {
                        buyer: order.buyer.clone(),
                        selected_address_text: order.selected_address_text.clone(),
                        delivery_cost: order.delivery_cost,
                    }
                }
            };

            let total = compiler::order_total(&line_items, resolved.delivery_cost);
            let updated = Order {
                line_items,
                payment_method: input.payment_method.unwrap_or(order.payment_method),
                buyer: resolved.buyer,
                selected_address_text: resolved.selected_address_text,
                delivery_cost: resolved.delivery_cost,
                total,
                comment: input.comment.clone().or(order.comment.clone()),
                updated_at: shared::util::now_millis(),
                ..order.clone()
            };

            let written =
                repository::order::update_content_guarded(&self.db.pool, &updated, order.status)
                    .await?;
            if written {
                info!(
                    order_id = %updated.id,
                    total = updated.total,
                    "Order updated"
                );
                return Ok(updated);
            }
            debug!(order_id = %order_id, attempt, "Order moved during update, retrying");
        }
        Err(OrderError::WriteConflict(self.retry_limit))
    }

    /// Drive an order through its lifecycle. Re-requesting the terminal
    /// state the order is already in is a no-op.
    pub async fn transition_order(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> OrderResult<Order> {
        for attempt in 0..=self.retry_limit {
            let order = self.get_order(order_id).await?;

            match lifecycle::transition(order.status, target, order.section)? {
                Transition::Noop => return Ok(order),
                Transition::Apply => {
                    let moved = repository::order::update_status(
                        &self.db.pool,
                        &order.id,
                        order.status,
                        target,
                    )
                    .await?;
                    if moved {
                        info!(
                            order_id = %order.id,
                            from = order.status.as_str(),
                            to = target.as_str(),
                            "Order transitioned"
                        );
                        return Ok(Order {
                            status: target,
                            updated_at: shared::util::now_millis(),
                            ..order
                        });
                    }
                    debug!(order_id = %order_id, attempt, "Status raced during transition, retrying");
                }
            }
        }
        Err(OrderError::WriteConflict(self.retry_limit))
    }

    async fn price_line_items(
        &self,
        restaurant_id: &str,
        items: &[shared::models::LineItemInput],
    ) -> OrderResult<Vec<LineItemSnapshot>> {
        let ids: Vec<i64> = items.iter().map(|i| i.food_id).collect();
        let foods =
            repository::food::find_by_ids_and_restaurant(&self.db.pool, &ids, restaurant_id)
                .await?;
        compiler::snapshot_line_items(items, &foods)
    }

    /// Resolve the buyer side of a request. A phone number turns the
    /// buyer into a customer upsert (and the selected address into the
    /// delivery-cost source); without one the buyer is an inline name and
    /// delivery cost is zero.
    async fn resolve_buyer(
        &self,
        buyer: &BuyerInput,
        addresses: &[ProposedAddress],
        selected_address_text: Option<&str>,
    ) -> OrderResult<ResolvedBuyer> {
        let phone = buyer
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        match phone {
            Some(phone) => {
                let (customer, selected): (_, Option<Address>) = self
                    .directory
                    .upsert(CustomerUpsert {
                        phone: phone.to_string(),
                        name: buyer.name.clone(),
                        comment: buyer.comment.clone(),
                        addresses: addresses.to_vec(),
                        selected_address_text: selected_address_text.map(str::to_string),
                    })
                    .await?;
                let delivery_cost = selected.as_ref().map(|a| a.delivery_cost).unwrap_or(0);
                Ok(ResolvedBuyer {
                    buyer: BuyerRef::CustomerRef(customer.id),
                    selected_address_text: selected.map(|a| a.text),
                    delivery_cost,
                })
            }
            None => {
                if selected_address_text.is_some() {
                    return Err(OrderError::AddressWithoutCustomer);
                }
                Ok(ResolvedBuyer {
                    buyer: BuyerRef::InlineName(buyer.name.clone().unwrap_or_default()),
                    selected_address_text: None,
                    delivery_cost: 0,
                })
            }
        }
    }
}
