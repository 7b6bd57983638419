//! Client surface the worker controls
//!
//! Abstracts over "open pages" so real hosts can wire actual windows and
//! tests can record calls. Claiming puts a freshly activated worker in
//! control of pages loaded before activation, without a reload.

use super::push::Notification;
use crate::error::EdgeResult;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

/// Host seam for client windows and notifications
#[async_trait]
pub trait ClientSurface: Send + Sync {
    /// Take control of all open clients; returns how many were claimed
    async fn claim(&self) -> EdgeResult<usize>;

    /// Display a notification
    async fn show_notification(&self, notification: &Notification) -> EdgeResult<()>;

    /// Dismiss a notification by tag
    async fn dismiss(&self, tag: &Uuid) -> EdgeResult<()>;

    /// Focus an existing client showing `url`, or open a new one
    async fn open_or_focus(&self, url: &str) -> EdgeResult<()>;
}

/// Surface with no client host attached; logs and succeeds
///
/// The CLI runs with this one.
pub struct LoggingClients;

#[async_trait]
impl ClientSurface for LoggingClients {
    async fn claim(&self) -> EdgeResult<usize> {
        info!("No client host attached; claimed 0 clients");
        Ok(0)
    }

    async fn show_notification(&self, notification: &Notification) -> EdgeResult<()> {
        info!(
            "Notification [{}]: {}: {}",
            notification.tag, notification.title, notification.body
        );
        Ok(())
    }

    async fn dismiss(&self, tag: &Uuid) -> EdgeResult<()> {
        info!("Dismissed notification {}", tag);
        Ok(())
    }

    async fn open_or_focus(&self, url: &str) -> EdgeResult<()> {
        info!("Would focus or open {}", url);
        Ok(())
    }
}
