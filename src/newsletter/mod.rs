//! Newsletter module - subscriber storage and batch email delivery

pub mod sender;
mod store;
mod subscriber;

pub use sender::{dispatch, Announcement, DispatchReport, EmailClient, SEND_BATCH_SIZE};
pub use store::{StoreError, SubscribeOutcome, SubscriberStore};
pub use subscriber::{EmailParseError, Subscriber, SubscriberEmail};
