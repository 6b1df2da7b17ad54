//! Order compilation: line-item validation, pricing snapshots, totals.
//!
//! Pure over its inputs — the service fetches the food records and this
//! module decides. Prices are captured here once; an order is never
//! partially priced, and later food edits never touch compiled orders.

use super::error::{OrderError, OrderResult};
use shared::models::{Food, LineItemInput, LineItemSnapshot};
use std::collections::HashMap;

/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i64 = 9_999;

/// Reject empty orders and out-of-range quantities before anything else
/// runs — all-or-nothing, nothing persisted on failure.
pub fn validate_line_items(items: &[LineItemInput]) -> OrderResult<()> {
    if items.is_empty() {
        return Err(OrderError::EmptyLineItems);
    }
    for item in items {
        if item.quantity < 1 || item.quantity > MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity {
                food_id: item.food_id,
                quantity: item.quantity,
                max: MAX_QUANTITY,
            });
        }
    }
    Ok(())
}

/// Snapshot each line item against the foods resolved for this restaurant.
///
/// `foods` must come from a restaurant-scoped lookup; an id missing from it
/// is foreign (wrong restaurant or nonexistent) and fails the whole compile.
pub fn snapshot_line_items(
    items: &[LineItemInput],
    foods: &[Food],
) -> OrderResult<Vec<LineItemSnapshot>> {
    let by_id: HashMap<i64, &Food> = foods.iter().map(|f| (f.id, f)).collect();
    items
        .iter()
        .map(|item| {
            let food = by_id
                .get(&item.food_id)
                .ok_or(OrderError::ForeignLineItem {
                    food_id: item.food_id,
                })?;
            Ok(LineItemSnapshot {
                food_id: food.id,
                name: food.name.clone(),
                unit_price: food.price,
                quantity: item.quantity,
            })
        })
        .collect()
}

/// Order total: Σ(unit_price × quantity) + delivery cost, minor units.
pub fn order_total(line_items: &[LineItemSnapshot], delivery_cost: i64) -> i64 {
    let subtotal: i64 = line_items.iter().map(|i| i.line_total()).sum();
    subtotal + delivery_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: i64, price: i64) -> Food {
        Food {
            id,
            restaurant_id: "r1".to_string(),
            name: format!("food-{id}"),
            price,
        }
    }

    fn item(food_id: i64, quantity: i64) -> LineItemInput {
        LineItemInput { food_id, quantity }
    }

    #[test]
    fn test_empty_line_items_rejected() {
        assert!(matches!(
            validate_line_items(&[]),
            Err(OrderError::EmptyLineItems)
        ));
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        assert!(matches!(
            validate_line_items(&[item(1, 0)]),
            Err(OrderError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            validate_line_items(&[item(1, -2)]),
            Err(OrderError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            validate_line_items(&[item(1, MAX_QUANTITY + 1)]),
            Err(OrderError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_snapshot_captures_prices() {
        let foods = vec![food(1, 500), food(2, 300)];
        let snapshots = snapshot_line_items(&[item(1, 2), item(2, 1)], &foods).unwrap();
        assert_eq!(snapshots[0].unit_price, 500);
        assert_eq!(snapshots[0].quantity, 2);
        assert_eq!(snapshots[1].unit_price, 300);
    }

    #[test]
    fn test_foreign_line_item_fails_whole_compile() {
        let foods = vec![food(1, 500)];
        let err = snapshot_line_items(&[item(1, 1), item(99, 1)], &foods).unwrap_err();
        assert!(matches!(err, OrderError::ForeignLineItem { food_id: 99 }));
    }

    #[test]
    fn test_total_with_delivery_cost() {
        let foods = vec![food(1, 500), food(2, 300)];
        let snapshots = snapshot_line_items(&[item(1, 2), item(2, 1)], &foods).unwrap();
        // 500×2 + 300×1 + 400 = 1700
        assert_eq!(order_total(&snapshots, 400), 1700);
    }

    #[test]
    fn test_total_without_delivery_cost() {
        let foods = vec![food(1, 250)];
        let snapshots = snapshot_line_items(&[item(1, 4)], &foods).unwrap();
        assert_eq!(order_total(&snapshots, 0), 1000);
    }
}
