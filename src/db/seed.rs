// src/db/seed.rs
//
// Dados de demonstração: as mesmas telas que o dashboard exibia, agora servidas de um único store.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    db::store::Tables,
    models::{
        inventory::Product,
        notifications::{Notification, NotificationCategory, NotificationKind, NotificationPriority},
        orders::{Order, OrderLine, OrderPriority, OrderStatus},
        receiving::{ReceivingLine, ReceivingShipment, ReceivingStatus},
        returns::{DispositionAction, ItemCondition, ReturnAuthorization, ReturnReason, ReturnStatus},
        storage::{StorageRequest, StorageRequestStatus, StorageType},
    },
};

fn at(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(raw.parse::<DateTime<Utc>>()?)
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn line(sku: &str, name: &str, quantity: u32, unit_price: Decimal) -> OrderLine {
    OrderLine {
        sku: sku.to_string(),
        name: name.to_string(),
        quantity,
        unit_price,
    }
}

pub fn seed_demo_data(tables: &mut Tables) -> anyhow::Result<()> {
    seed_products(tables)?;
    seed_orders(tables)?;
    seed_returns(tables)?;
    seed_storage(tables)?;
    seed_receiving(tables)?;
    seed_notifications(tables);

    tracing::info!(
        products = tables.products.len(),
        orders = tables.orders.len(),
        returns = tables.returns.len(),
        storage_requests = tables.storage_requests.len(),
        shipments = tables.shipments.len(),
        "🌱 Dados de demonstração carregados"
    );
    Ok(())
}

fn seed_products(tables: &mut Tables) -> anyhow::Result<()> {
    let rows = [
        ("WH-001", "Wireless Headphones", 150, 50, "A1-B2", "2024-01-15T10:30:00Z", 7500, "Tech Corp"),
        ("KB-002", "Mechanical Keyboard", 25, 30, "A2-C1", "2024-01-15T09:15:00Z", 12000, "KeyTech Ltd"),
        ("MO-003", "Gaming Mouse", 0, 20, "A2-C2", "2024-01-14T16:45:00Z", 4500, "GameGear Inc"),
        ("TB-004", "USB-C Cable", 500, 100, "B1-A1", "2024-01-15T11:00:00Z", 1500, "Cable Co"),
        ("SP-005", "Bluetooth Speaker", 75, 25, "A3-B1", "2024-01-15T08:30:00Z", 8500, "Audio Systems"),
    ];

    for (sku, name, quantity, safety_stock, location, updated, cost, supplier) in rows {
        let category = if sku == "TB-004" { "Accessories" } else { "Electronics" };
        tables.products.insert(
            sku.to_string(),
            Product {
                sku: sku.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                description: None,
                quantity,
                safety_stock,
                unit_cost: money(cost),
                location: location.to_string(),
                supplier: supplier.to_string(),
                last_updated: at(updated)?,
            },
        );
    }
    Ok(())
}

fn seed_orders(tables: &mut Tables) -> anyhow::Result<()> {
    let orders = vec![
        (
            "ORD-2024-001", "John Smith", OrderStatus::Pending, OrderPriority::High,
            "2024-01-15T09:00:00Z", "2024-01-17T17:00:00Z",
            vec![
                line("KB-002", "Mechanical Keyboard", 1, money(12000)),
                line("SP-005", "Bluetooth Speaker", 1, money(9500)),
                line("TB-004", "USB-C Cable", 1, money(3000)),
            ],
        ),
        (
            "ORD-2024-002", "Sarah Johnson", OrderStatus::Processing, OrderPriority::Medium,
            "2024-01-15T10:30:00Z", "2024-01-18T17:00:00Z",
            vec![line("KB-002", "Mechanical Keyboard", 1, money(12000))],
        ),
        (
            "ORD-2024-003", "Mike Brown", OrderStatus::Picking, OrderPriority::Low,
            "2024-01-14T14:15:00Z", "2024-01-19T17:00:00Z",
            vec![
                line("WH-001", "Wireless Headphones", 2, money(9500)),
                line("SP-005", "Bluetooth Speaker", 2, money(8000)),
                line("TB-004", "USB-C Cable", 1, money(3000)),
            ],
        ),
        (
            "ORD-2024-004", "Emily Davis", OrderStatus::Packed, OrderPriority::Medium,
            "2024-01-14T11:20:00Z", "2024-01-16T17:00:00Z",
            vec![line("MO-003", "Gaming Mouse", 2, money(8000))],
        ),
        (
            "ORD-2024-005", "Alex Wilson", OrderStatus::Shipped, OrderPriority::High,
            "2024-01-13T16:45:00Z", "2024-01-15T17:00:00Z",
            vec![
                line("TB-004", "USB-C Cable", 2, money(3000)),
                line("WH-001", "Wireless Headphones", 1, money(9500)),
                line("SP-005", "Bluetooth Speaker", 1, money(14000)),
            ],
        ),
        (
            "ORD-2024-006", "Mike Brown", OrderStatus::Delivered, OrderPriority::Medium,
            "2024-01-05T10:00:00Z", "2024-01-08T17:00:00Z",
            vec![line("WH-001", "Wireless Headphones", 1, money(7500))],
        ),
        (
            "ORD-2024-007", "John Smith", OrderStatus::Delivered, OrderPriority::Low,
            "2024-01-04T12:00:00Z", "2024-01-07T17:00:00Z",
            vec![line("MO-003", "Gaming Mouse", 1, money(4500))],
        ),
        (
            "ORD-2024-008", "Sarah Johnson", OrderStatus::Delivered, OrderPriority::Low,
            "2024-01-03T15:30:00Z", "2024-01-06T17:00:00Z",
            vec![line("TB-004", "USB-C Cable", 1, money(1500))],
        ),
    ];

    for (number, customer, status, priority, ordered, due, lines) in orders {
        let tracking_number = if status.carries_tracking() {
            tables.sequences.tracking += 1;
            Some(format!("TRK{:09}", 123_456_788 + tables.sequences.tracking))
        } else {
            None
        };
        let order_date = at(ordered)?;

        tables.orders.insert(
            number.to_string(),
            Order {
                order_number: number.to_string(),
                customer: customer.to_string(),
                customer_email: None,
                shipping_address: None,
                notes: None,
                priority,
                lines,
                status,
                order_date,
                due_date: at(due)?,
                tracking_number,
                updated_at: order_date,
            },
        );
        tables.sequences.order += 1;
    }
    Ok(())
}

fn seed_returns(tables: &mut Tables) -> anyhow::Result<()> {
    let returns = [
        (
            "RMA-2024-001", "ORD-2024-006", "Mike Brown", "WH-001", "Wireless Headphones",
            ReturnReason::Defective, ReturnStatus::PendingInspection, None, None,
            7500, "2024-01-05T10:00:00Z", "2024-01-15T10:30:00Z",
        ),
        (
            "RMA-2024-002", "ORD-2024-007", "John Smith", "MO-003", "Gaming Mouse",
            ReturnReason::WrongItem, ReturnStatus::Approved, Some(ItemCondition::Perfect), None,
            4500, "2024-01-04T12:00:00Z", "2024-01-14T14:20:00Z",
        ),
        (
            "RMA-2024-003", "ORD-2024-008", "Sarah Johnson", "TB-004", "USB-C Cable",
            ReturnReason::NotNeeded, ReturnStatus::Restocked, Some(ItemCondition::Perfect),
            Some(DispositionAction::Restock),
            1500, "2024-01-03T15:30:00Z", "2024-01-13T09:15:00Z",
        ),
    ];

    for (rma, order, customer, sku, product, reason, status, condition, action, value, ordered, returned) in returns {
        let return_date = at(returned)?;
        tables.returns.insert(
            rma.to_string(),
            ReturnAuthorization {
                rma_number: rma.to_string(),
                order_number: order.to_string(),
                customer: customer.to_string(),
                sku: sku.to_string(),
                product_name: product.to_string(),
                quantity: 1,
                reason,
                status,
                condition,
                action,
                value: money(value),
                order_date: at(ordered)?,
                return_date,
                notes: None,
                updated_at: return_date,
            },
        );
        tables.sequences.rma += 1;
    }
    Ok(())
}

fn seed_storage(tables: &mut Tables) -> anyhow::Result<()> {
    let arrival = NaiveDate::from_ymd_opt(2025, 5, 23)
        .ok_or_else(|| anyhow::anyhow!("data de chegada inválida"))?;
    let created = at("2025-05-23T09:00:00Z")?;

    // Aprovadas somam 280 m² (sobram 80 m² dos 360 m² padrão)
    let requests = [
        ("4001RRD", "10 boxes of shoes", 40, StorageType::Shelves, StorageRequestStatus::Approved),
        ("4002RRD", "20 bags of clothes", 40, StorageType::Shelves, StorageRequestStatus::Declined),
        ("4003RRD", "10 boxes of shoes", 40, StorageType::Shelves, StorageRequestStatus::Pending),
        ("4004RRD", "20 bags of clothes", 40, StorageType::Shelves, StorageRequestStatus::Approved),
        ("4005RRD", "10 boxes of shoes", 40, StorageType::Shelves, StorageRequestStatus::Approved),
        ("4006RRD", "Seasonal pallet stock", 160, StorageType::Floor, StorageRequestStatus::Approved),
    ];

    for (id, item, space, storage_type, status) in requests {
        let decided_at = (status != StorageRequestStatus::Pending).then_some(created);
        tables.storage_requests.insert(
            id.to_string(),
            StorageRequest {
                id: id.to_string(),
                item_name: item.to_string(),
                product_id: None,
                quantity: 10,
                requested_space: Decimal::from(space),
                storage_type,
                special_handling: false,
                requirement: None,
                arrival_date: Some(arrival),
                duration_days: Some(50),
                notes: None,
                status,
                created_at: created,
                decided_at,
            },
        );
        tables.sequences.storage_request += 1;
    }
    Ok(())
}

fn seed_receiving(tables: &mut Tables) -> anyhow::Result<()> {
    let shipments = [
        (
            "PO-2024-001", "Tech Corp", "Jane Smith", (2024, 1, 15), ReceivingStatus::InProgress,
            vec![("WH-001", 100, 60), ("KB-002", 50, 35)],
        ),
        (
            "PO-2024-002", "KeyTech Ltd", "Mike Johnson", (2024, 1, 14), ReceivingStatus::Completed,
            vec![("KB-002", 75, 75)],
        ),
    ];

    for (po, supplier, inspector, (y, m, d), status, lines) in shipments {
        let arrival_date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| anyhow::anyhow!("data de chegada inválida para {}", po))?;
        let created_at = at(&format!("{}T08:00:00Z", arrival_date))?;
        let id = format!("SH-{:03}", tables.sequences.next_shipment());

        tables.shipments.insert(
            id.clone(),
            ReceivingShipment {
                id,
                po_number: po.to_string(),
                supplier: supplier.to_string(),
                inspector: Some(inspector.to_string()),
                arrival_date,
                status,
                lines: lines
                    .into_iter()
                    .map(|(sku, expected, received)| ReceivingLine {
                        sku: sku.to_string(),
                        expected,
                        received,
                    })
                    .collect(),
                notes: None,
                created_at,
                updated_at: created_at,
            },
        );
    }
    Ok(())
}

fn seed_notifications(tables: &mut Tables) {
    let now = Utc::now();
    let rows = [
        (NotificationKind::Alert, NotificationCategory::Inventory, NotificationPriority::High,
         "Low Stock Alert", "KB-002 (Mechanical Keyboard) is running low. Only 25 units remaining.",
         Duration::minutes(2), false),
        (NotificationKind::Success, NotificationCategory::Orders, NotificationPriority::Medium,
         "Order Shipped", "Order ORD-2024-005 has been shipped with tracking TRK123456789.",
         Duration::minutes(15), false),
        (NotificationKind::Info, NotificationCategory::Receiving, NotificationPriority::Medium,
         "Shipment Received", "Incoming shipment SH-789 with 250 items has been received at dock 2.",
         Duration::hours(1), true),
        (NotificationKind::Alert, NotificationCategory::System, NotificationPriority::High,
         "System Maintenance", "Scheduled maintenance will begin at 2:00 AM tonight. System downtime expected.",
         Duration::hours(2), true),
        (NotificationKind::Info, NotificationCategory::Team, NotificationPriority::Low,
         "New Team Member", "Sarah Johnson has joined the warehouse team as a Quality Control Specialist.",
         Duration::days(1), true),
    ];

    for (kind, category, priority, title, message, age, read) in rows {
        let id = tables.sequences.next_notification();
        tables.notifications.insert(
            id,
            Notification {
                id,
                kind,
                category,
                priority,
                title: title.to_string(),
                message: message.to_string(),
                read,
                created_at: now - age,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::storage_repo::allocated_space, models::settings::{RmaRules, WarehouseSettings}};

    fn seeded() -> Tables {
        let mut tables = Tables::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        seed_demo_data(&mut tables).unwrap();
        tables
    }

    #[test]
    fn seeded_orders_respect_tracking_invariant() {
        let tables = seeded();
        for order in tables.orders.values() {
            assert_eq!(
                order.tracking_number.is_some(),
                order.status.carries_tracking(),
                "{}",
                order.order_number
            );
        }
        assert_eq!(
            tables.orders["ORD-2024-005"].tracking_number.as_deref(),
            Some("TRK123456789")
        );
    }

    #[test]
    fn seeded_order_totals_match_dashboard_values() {
        let tables = seeded();
        assert_eq!(tables.orders["ORD-2024-001"].total(), money(24500));
        assert_eq!(tables.orders["ORD-2024-003"].total(), money(38000));
        assert_eq!(tables.orders["ORD-2024-005"].total(), money(29500));
        assert_eq!(tables.orders["ORD-2024-005"].item_count(), 4);
    }

    #[test]
    fn seeded_storage_leaves_eighty_square_meters() {
        let tables = seeded();
        let allocated = allocated_space(tables.storage_requests.values());
        assert_eq!(allocated, Decimal::from(280));
        assert_eq!(tables.settings.total_capacity - allocated, Decimal::from(80));
    }

    #[test]
    fn seeded_shipments_match_receiving_screen() {
        let tables = seeded();
        let open = &tables.shipments["SH-001"];
        assert_eq!(open.po_number, "PO-2024-001");
        assert_eq!((open.expected_items(), open.received_items()), (150, 95));

        let done = &tables.shipments["SH-002"];
        assert!(done.is_fully_received());
        assert_eq!(tables.sequences.shipment, 2);
    }
}
