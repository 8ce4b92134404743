//! Background subscriber that logs every published event.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::bus::DomainEvent;

/// Drains a bus subscription into the tracing log until the bus is dropped.
pub struct EventLogger;

impl EventLogger {
    /// Run until the sending side closes. Lagged receivers log a warning and
    /// keep going.
    pub async fn run(mut rx: broadcast::Receiver<DomainEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::debug!(
                        event_type = %event.event_type,
                        source_entity_type = ?event.source_entity_type,
                        source_entity_id = ?event.source_entity_id,
                        actor = ?event.actor,
                        payload = %event.payload,
                        "Domain event"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger lagged, events dropped");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger stopping");
                    break;
                }
            }
        }
    }
}
