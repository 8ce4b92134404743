use std::sync::Arc;

use quotedesk_db::DbPool;
use quotedesk_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is a handle and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    /// Event bus for assignment and rule-change notifications.
    pub event_bus: Arc<EventBus>,
}
