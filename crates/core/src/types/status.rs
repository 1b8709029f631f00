//! Status enums for orders and payments.
//!
//! Wire values match the stored database values exactly (`Processing`,
//! `Paid`, `Cash`, ...), so serde needs no renames. The database stores
//! these as constrained text; repositories convert through
//! `Display`/`FromStr`.

use serde::{Deserialize, Serialize};

/// Fulfillment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
}

/// Whether an order has been paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Unpaid => write!(f, "Unpaid"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(Self::Paid),
            "Unpaid" => Ok(Self::Unpaid),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Card => write!(f, "Card"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(Self::Cash),
            "Card" => Ok(Self::Card),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_new_orders() {
        assert_eq!(OrderStatus::default(), OrderStatus::Processing);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_wire_values_match_stored_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).expect("serialize"),
            "\"Processing\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).expect("serialize"),
            "\"Card\""
        );
        assert_eq!(
            "Delivered".parse::<OrderStatus>().expect("parse"),
            OrderStatus::Delivered
        );
        assert!("delivered".parse::<OrderStatus>().is_err());
    }
}
