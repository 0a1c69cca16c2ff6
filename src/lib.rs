//! # Gremlin Driver
//!
//! An async Rust client for Gremlin graph servers (Apache TinkerPop Gremlin
//! Server and compatible databases).
//!
//! ## Features
//!
//! - **Traversal Builder** - Build traversals as data and compile them to Gremlin-Groovy text
//! - **GraphSON 3.0** - Decode tagged results into typed values and graph entities
//! - **Session Pool** - Fixed-size pool of protocol sessions with FIFO checkout
//! - **SASL Authentication** - PLAIN challenge/response handled per request
//! - **Transport Agnostic** - Bring any WebSocket implementation through [`gremlin::Connector`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gremlin_driver::{DriverConfig, GremlinClient};
//! use gremlin_driver::traversal::{g, predicate::gt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DriverConfig::builder("ws://localhost:8182/gremlin")?
//!         .with_pool_size(4)
//!         .build();
//!
//!     // `MyWebSocketConnector` implements `gremlin_driver::gremlin::Connector`
//!     let client = GremlinClient::connect(config, Arc::new(MyWebSocketConnector)).await?;
//!
//!     let names = client
//!         .query(g().v(()).has_label("person").has(("age", gt(30))).values("name"))
//!         .await?;
//!     for name in names {
//!         println!("{}", name);
//!     }
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Building Traversals
//!
//! ```rust
//! use gremlin_driver::traversal::{anonymous, g, v};
//!
//! let query = g()
//!     .v(v(1))
//!     .repeat(anonymous().out("knows"))
//!     .times(2)
//!     .values("name");
//! assert_eq!(
//!     query.to_string(),
//!     "g.V(V(1)).repeat(out('knows')).times(2).values('name')"
//! );
//! ```
//!
//! String literals are single-quoted without escaping. Callers must not pass
//! untrusted text containing `'` as a traversal argument.
//!
//! ## Value Types
//!
//! ```rust
//! use gremlin_driver::Value;
//!
//! let count = Value::Integer(6);
//! assert_eq!(count.as_int(), Some(6));
//!
//! let name = Value::from("marko");
//! assert_eq!(name.to_string(), "marko");
//! ```
//!
//! ## Error Handling
//!
//! Every query returns [`DriverResult`]. [`DriverError::kind`] and
//! [`DriverError::message`] give the error category and the server's message.
//!
//! ```rust
//! use gremlin_driver::{DriverError, ErrorKind};
//!
//! let err = DriverError::from_status(597, "No such property: nme").unwrap();
//! assert_eq!(err.kind(), ErrorKind::ScriptEvaluation);
//! assert_eq!(err.message(), "No such property: nme");
//! ```
//!
//! ## Modules
//!
//! - [`traversal`] - Step queue, builder, predicates and script compiler
//! - [`driver`] - Client, configuration, session pool and result values
//! - [`gremlin`] - Wire protocol, GraphSON decoding and transport traits
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod driver;
pub mod gremlin;
pub mod traversal;

// Re-exports for convenience
pub use driver::{
    Credentials, DriverConfig, DriverConfigBuilder, DriverError, DriverResult, Edge, ErrorKind,
    GremlinClient, Path, PoolMetrics, Query, ServerAddress, Value, Vertex, VertexProperty,
};

pub use gremlin::{Channel, Connector, GraphSONDecoder, Message, TransportError};

pub use traversal::{anonymous, g, v, StepQueue};
