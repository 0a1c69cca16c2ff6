//! Driver Module
//!
//! Gremlin Server 클라이언트
//!
//! # 구성
//!
//! - 클라이언트 및 설정 (GremlinClient, DriverConfig, ServerAddress)
//! - 세션 풀 (SessionPool, PoolMetrics)
//! - 프로토콜 세션 (Session, Exchange)
//! - 결과 값 및 그래프 엔티티 (Value, Vertex, Edge, Path)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gremlin_driver::driver::{DriverConfig, GremlinClient};
//! use gremlin_driver::traversal::g;
//!
//! let config = DriverConfig::builder("ws://localhost:8182/gremlin")?
//!     .with_pool_size(4)
//!     .with_credentials("stephen", "password")
//!     .build();
//!
//! // connector: WebSocket 채널을 여는 Connector 구현
//! let client = GremlinClient::connect(config, Arc::new(connector)).await?;
//!
//! let names = client.query(g().v(()).has_label("person").values("name")).await?;
//! let count = client.query("g.V().count()").await?;
//!
//! client.close().await;
//! ```

mod driver;
pub mod error;
pub mod pool;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use driver::{
    Credentials, DriverConfig, DriverConfigBuilder, GremlinClient, Query, ServerAddress,
    DEFAULT_PATH, DEFAULT_PORT, DEFAULT_QUERY_TIMEOUT,
};
pub use error::{DriverError, DriverResult, ErrorKind, MISSING_CREDENTIALS};
pub use pool::{PoolMetrics, SessionPool};
pub use session::{Exchange, Session, SessionState, Transition};
pub use types::{Edge, EdgeVertex, Path, Property, Value, Vertex, VertexProperty};
