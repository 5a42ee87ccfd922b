// src/db/notifications_repo.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::store::{Store, Tables},
    models::notifications::{NewNotification, Notification, NotificationCategory},
};

#[derive(Clone)]
pub struct NotificationsRepository {
    store: Store,
}

impl NotificationsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Mais recentes primeiro.
    pub async fn list_notifications(
        &self,
        category: Option<NotificationCategory>,
        search: Option<&str>,
    ) -> Vec<Notification> {
        let tables = self.store.read().await;
        let mut list: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| category.is_none_or(|c| n.category == c))
            .filter(|n| search.is_none_or(|s| n.matches(s)))
            .cloned()
            .collect();

        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        list
    }

    // --- Escrita ---

    pub fn insert_notification(&self, tx: &mut Tables, new: NewNotification) -> Notification {
        let notification = Notification {
            id: tx.sequences.next_notification(),
            kind: new.kind,
            category: new.category,
            priority: new.priority,
            title: new.title,
            message: new.message,
            read: false,
            created_at: Utc::now(),
        };
        tx.notifications.insert(notification.id, notification.clone());
        notification
    }

    pub fn mark_read(&self, tx: &mut Tables, id: u64) -> Result<Notification, AppError> {
        let notification = tx
            .notifications
            .get_mut(&id)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Notificação {}", id)))?;
        notification.read = true;
        Ok(notification.clone())
    }

    /// Devolve quantas estavam não lidas.
    pub fn mark_all_read(&self, tx: &mut Tables) -> usize {
        let mut count = 0;
        for notification in tx.notifications.values_mut().filter(|n| !n.read) {
            notification.read = true;
            count += 1;
        }
        count
    }

    pub fn delete_notification(&self, tx: &mut Tables, id: u64) -> Result<Notification, AppError> {
        tx.notifications
            .remove(&id)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Notificação {}", id)))
    }
}
