//! Order status lifecycle
//!
//! Pure state machine over (current status, requested status, section).
//! Delivery orders move Preparing → Sent → Delivered; counter orders move
//! Preparing → Completed; Cancelled is reachable from Preparing and Sent.
//! Dispatch (Preparing → Sent) freezes the delivery cost and address text
//! already snapshotted at compile time — nothing is recomputed here.
//!
//! Re-requesting the terminal state an order already holds is a no-op, not
//! an error. Everything else off the table above is rejected.

use super::error::OrderError;
use shared::models::{OrderSection, OrderStatus};

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Persist the new status.
    Apply,
    /// Terminal state re-requested; leave the order untouched.
    Noop,
}

/// Decide whether `current -> target` is allowed for an order in `section`.
pub fn transition(
    current: OrderStatus,
    target: OrderStatus,
    section: OrderSection,
) -> Result<Transition, OrderError> {
    use OrderStatus::*;

    if current == target && current.is_terminal() {
        return Ok(Transition::Noop);
    }

    let allowed = match (current, target) {
        (Preparing, Sent) => section == OrderSection::Delivery,
        (Sent, Delivered) => section == OrderSection::Delivery,
        (Preparing, Completed) => section == OrderSection::Counter,
        (Preparing, Cancelled) | (Sent, Cancelled) => true,
        _ => false,
    };

    if allowed {
        Ok(Transition::Apply)
    } else {
        Err(OrderError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

/// Line items and payment method are only editable before the order
/// leaves the kitchen.
pub fn can_edit_content(status: OrderStatus) -> bool {
    status == OrderStatus::Preparing
}

/// The comment stays editable until the order reaches a terminal state.
pub fn can_edit_comment(status: OrderStatus) -> bool {
    !status.is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderSection::{Counter, Delivery};
    use OrderStatus::*;

    #[test]
    fn test_delivery_happy_path() {
        assert_eq!(transition(Preparing, Sent, Delivery).unwrap(), Transition::Apply);
        assert_eq!(transition(Sent, Delivered, Delivery).unwrap(), Transition::Apply);
    }

    #[test]
    fn test_counter_happy_path() {
        assert_eq!(
            transition(Preparing, Completed, Counter).unwrap(),
            Transition::Apply
        );
    }

    #[test]
    fn test_cancel_from_preparing_and_sent() {
        assert_eq!(
            transition(Preparing, Cancelled, Counter).unwrap(),
            Transition::Apply
        );
        assert_eq!(
            transition(Sent, Cancelled, Delivery).unwrap(),
            Transition::Apply
        );
    }

    #[test]
    fn test_section_mismatch_rejected() {
        // Counter orders are never dispatched.
        assert!(matches!(
            transition(Preparing, Sent, Counter),
            Err(OrderError::InvalidTransition { .. })
        ));
        // Delivery orders do not complete at the counter.
        assert!(matches!(
            transition(Preparing, Completed, Delivery),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_terminal_repeat_is_noop() {
        assert_eq!(
            transition(Completed, Completed, Counter).unwrap(),
            Transition::Noop
        );
        assert_eq!(
            transition(Delivered, Delivered, Delivery).unwrap(),
            Transition::Noop
        );
        assert_eq!(
            transition(Cancelled, Cancelled, Counter).unwrap(),
            Transition::Noop
        );
    }

    #[test]
    fn test_nonterminal_repeat_rejected() {
        assert!(matches!(
            transition(Preparing, Preparing, Counter),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_no_escape_from_terminal() {
        assert!(transition(Completed, Cancelled, Counter).is_err());
        assert!(transition(Delivered, Sent, Delivery).is_err());
        assert!(transition(Cancelled, Preparing, Counter).is_err());
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(transition(Preparing, Delivered, Delivery).is_err());
    }

    #[test]
    fn test_edit_guards() {
        assert!(can_edit_content(Preparing));
        assert!(!can_edit_content(Sent));
        assert!(!can_edit_content(Completed));

        assert!(can_edit_comment(Preparing));
        assert!(can_edit_comment(Sent));
        assert!(!can_edit_comment(Delivered));
        assert!(!can_edit_comment(Cancelled));
    }
}
