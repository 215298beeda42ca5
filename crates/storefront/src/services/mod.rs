//! Services shared by storefront handlers.
//!
//! - `cart_events` - Cart observers that forward changes to tracing and Sentry

pub mod cart_events;

pub use cart_events::{BreadcrumbObserver, TracingObserver, default_observers};
