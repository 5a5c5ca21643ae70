use async_trait::async_trait;
use tracing::info;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// LogPublisher records domain events in the log stream only; it backs the
// in-memory store where no broker is reachable.
#[derive(Debug, Default)]
pub struct LogPublisher {}

impl LogPublisher {
    pub(crate) fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn create_topic(&mut self, topic: &str) -> Result<String, LibraryError> {
        Ok(topic.to_string())
    }

    async fn get_topics(&mut self) -> Result<Vec<String>, LibraryError> {
        Ok(vec![])
    }

    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        info!("domain event {} {} key={} data={}", event.group, event.name, event.key, event.json_data);
        Ok(())
    }
}
