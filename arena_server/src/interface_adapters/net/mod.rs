// Network adapter modules: per-connection socket handling and the shared
// serializers that turn world output into JSON bytes once per tick.

pub mod client;
pub mod serializers;

pub use client::ws_handler;
pub use serializers::{event_serializer, map_data_bytes, world_update_serializer};
