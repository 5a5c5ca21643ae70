use crate::core::repository::RepositoryStore;
use crate::gateway::ddb::publisher::DDBPublisher;
use crate::gateway::events::EventPublisher;
use crate::gateway::GatewayPublisherVia;
use crate::gateway::logs::publisher::LogPublisher;
use crate::gateway::sns::publisher::SnsPublisher;
use crate::utils::ddb::{build_db_client, build_sns_client};

pub(crate) async fn create_publisher(via: GatewayPublisherVia) -> Box<dyn EventPublisher> {
    match via {
        GatewayPublisherVia::Sns => {
            let client = build_sns_client().await;
            Box::new(SnsPublisher::new(client))
        }
        GatewayPublisherVia::LocalDynamoDB => {
            let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
            Box::new(DDBPublisher::new(client, "events", "events_ndx"))
        }
        GatewayPublisherVia::Logs => {
            Box::new(LogPublisher::new())
        }
    }
}
