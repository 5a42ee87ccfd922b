// src/services/notification_service.rs

use crate::{
    common::error::AppError,
    db::{NotificationsRepository, Store},
    models::notifications::{Notification, NotificationCategory},
};

#[derive(Clone)]
pub struct NotificationService {
    store: Store,
    repo: NotificationsRepository,
}

impl NotificationService {
    pub fn new(store: Store) -> Self {
        Self {
            repo: NotificationsRepository::new(store.clone()),
            store,
        }
    }

    pub async fn list_notifications(
        &self,
        category: Option<NotificationCategory>,
        search: Option<&str>,
    ) -> Vec<Notification> {
        self.repo.list_notifications(category, search).await
    }

    pub async fn mark_read(&self, id: u64) -> Result<Notification, AppError> {
        let mut tx = self.store.begin().await;
        self.repo.mark_read(&mut tx, id)
    }

    pub async fn mark_all_read(&self) -> usize {
        let mut tx = self.store.begin().await;
        let updated = self.repo.mark_all_read(&mut tx);
        tracing::debug!(updated, "Notificações marcadas como lidas");
        updated
    }

    pub async fn delete_notification(&self, id: u64) -> Result<(), AppError> {
        let mut tx = self.store.begin().await;
        self.repo.delete_notification(&mut tx, id)?;
        Ok(())
    }
}
