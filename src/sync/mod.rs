pub mod service;

pub use service::NotificationSync;
