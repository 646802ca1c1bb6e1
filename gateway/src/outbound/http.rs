//! HTTP adapters: origin resolution and the reqwest transport.

pub mod resolver;
pub mod transport;

pub use self::resolver::OriginResolver;
pub use self::transport::ReqwestTransport;
