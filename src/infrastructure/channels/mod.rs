mod push_client;
mod realtime_hub;

pub use push_client::{HttpPushGateway, NoopPushGateway};
pub use realtime_hub::{OutboundMessage, RealtimeHub};
