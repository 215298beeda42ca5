//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (add unique ID to each request and span)
//! 4. Security headers (CSP, frame denial, no-store)
//! 5. CSP nonce (generate per-request nonce for inline scripts)
//! 6. Session layer (tower-sessions over a bounded moka store)
//!
//! Extractors:
//! - [`CartSession`] - the session's cart
//! - [`CspNonce`] - the request's CSP nonce
//! - [`HxRequest`] - whether HTMX issued the request

pub mod cart;
pub mod csp;
pub mod htmx;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use cart::CartSession;
pub use csp::{CspNonce, csp_nonce_middleware};
pub use htmx::{CART_UPDATED_EVENT, HX_TRIGGER_HEADER, HxRequest};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
