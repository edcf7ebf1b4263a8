pub mod gateway;
pub mod metadata;
pub mod prompt;

pub use gateway::{LikeGateway, ListGateway, ReviewGateway, UserGateway};
pub use metadata::MetadataSource;
pub use prompt::UserPrompt;

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}
