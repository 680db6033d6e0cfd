pub mod client;
pub mod transport;
pub mod types;

pub use client::{EventPump, PushChannel, TransportHandle};
pub use types::{ChannelEvent, ClientFrame, ServerFrame};
