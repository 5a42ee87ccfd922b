// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::error::AppError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Picking,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Picking,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Próxima etapa do fluxo linear (None para estados terminais).
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Picking),
            OrderStatus::Picking => Some(OrderStatus::Packed),
            OrderStatus::Packed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Estados em que o pedido obrigatoriamente possui código de rastreio.
    pub fn carries_tracking(self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }

    /// Itens só podem ser alterados antes da separação.
    pub fn accepts_line_changes(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Valida a transição `self -> to`.
    /// Aceita apenas o próximo passo do fluxo ou o cancelamento de um pedido não terminal.
    pub fn validate_transition(self, to: OrderStatus) -> Result<(), AppError> {
        let allowed = if to == OrderStatus::Cancelled {
            !self.is_terminal()
        } else {
            self.next() == Some(to)
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                entity: "order",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Picking => "picking",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

// --- Structs de Pedido ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    pub customer: String,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub priority: OrderPriority,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub tracking_number: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total sempre recalculado a partir dos itens (nunca em cache).
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn line_for(&self, sku: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.sku == sku)
    }
}

// Resposta detalhada: cabeçalho + valores calculados
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub total: Decimal,
    pub item_count: u32,
}

impl From<Order> for OrderDetail {
    fn from(header: Order) -> Self {
        let total = header.total();
        let item_count = header.item_count();
        Self { header, total, item_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with(lines: Vec<OrderLine>) -> Order {
        let now = Utc::now();
        Order {
            order_number: "ORD-2024-001".into(),
            customer: "John Smith".into(),
            customer_email: None,
            shipping_address: None,
            notes: None,
            priority: OrderPriority::High,
            lines,
            status: OrderStatus::Pending,
            order_date: now,
            due_date: now,
            tracking_number: None,
            updated_at: now,
        }
    }

    fn line(sku: &str, quantity: u32, unit_price: Decimal) -> OrderLine {
        OrderLine { sku: sku.into(), name: sku.into(), quantity, unit_price }
    }

    #[test]
    fn total_is_sum_of_lines() {
        let order = order_with(vec![line("WH-001", 2, Decimal::new(2999, 2))]);
        assert_eq!(order.total(), Decimal::new(5998, 2));

        let order = order_with(vec![
            line("WH-001", 2, Decimal::new(2999, 2)),
            line("TB-004", 3, Decimal::new(1500, 2)),
        ]);
        assert_eq!(order.total(), Decimal::new(10498, 2));
        assert_eq!(order.item_count(), 5);
    }

    #[test]
    fn total_follows_line_changes() {
        let mut order = order_with(vec![line("WH-001", 1, Decimal::from(10))]);
        assert_eq!(order.total(), Decimal::from(10));
        order.lines[0].quantity = 4;
        assert_eq!(order.total(), Decimal::from(40));
        order.lines.clear();
        assert_eq!(order.total(), Decimal::ZERO);
    }

    #[test]
    fn linear_steps_are_accepted() {
        let mut status = OrderStatus::Pending;
        while let Some(next) = status.next() {
            assert!(status.validate_transition(next).is_ok());
            status = next;
        }
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn skipping_stages_is_rejected() {
        let err = OrderStatus::Pending
            .validate_transition(OrderStatus::Shipped)
            .unwrap_err();
        match err {
            AppError::InvalidTransition { entity, from, to } => {
                assert_eq!(entity, "order");
                assert_eq!(from, "pending");
                assert_eq!(to, "shipped");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn moving_backwards_or_staying_is_rejected() {
        assert!(OrderStatus::Packed.validate_transition(OrderStatus::Picking).is_err());
        assert!(OrderStatus::Packed.validate_transition(OrderStatus::Packed).is_err());
        assert!(OrderStatus::Delivered.validate_transition(OrderStatus::Pending).is_err());
    }

    #[test]
    fn cancellation_only_from_non_terminal_states() {
        for status in OrderStatus::ALL {
            let result = status.validate_transition(OrderStatus::Cancelled);
            assert_eq!(result.is_ok(), !status.is_terminal(), "{status}");
        }
    }

    #[test]
    fn only_shipped_and_delivered_carry_tracking() {
        let carrying: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.carries_tracking())
            .collect();
        assert_eq!(carrying, vec![OrderStatus::Shipped, OrderStatus::Delivered]);
    }
}
