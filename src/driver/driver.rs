//! Driver
//!
//! 클라이언트 인스턴스 및 설정

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::error::{DriverError, DriverResult};
use super::pool::{PoolMetrics, SessionPool};
use super::types::Value;
use crate::gremlin::message::{DEFAULT_LANGUAGE, DEFAULT_PROCESSOR};
use crate::gremlin::{Connector, GraphSONDecoder, MessageFormat};
use crate::traversal::StepQueue;

/// 기본 Gremlin Server 포트
pub const DEFAULT_PORT: u16 = 8182;

/// 기본 WebSocket 경로
pub const DEFAULT_PATH: &str = "/gremlin";

/// 기본 쿼리 타임아웃 (5000ms)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(5000);

// ============================================================================
// Credentials - 자격 증명
// ============================================================================

/// SASL PLAIN 자격 증명
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// 사용자명
    pub username: String,
    /// 비밀번호
    pub password: String,
}

impl Credentials {
    /// 새 자격 증명 생성
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// ServerAddress - 서버 주소
// ============================================================================

/// 서버 주소
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
    /// WebSocket 경로
    pub path: String,
    /// TLS 사용 여부 (wss)
    pub secure: bool,
}

impl ServerAddress {
    /// 새 서버 주소 생성
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            path: DEFAULT_PATH.to_string(),
            secure: false,
        }
    }

    /// 경로 설정
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// TLS 설정
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// URI에서 파싱
    ///
    /// `ws://host:port/path` 또는 `wss://host:port/path`. 스킴이 없으면 `ws`,
    /// 포트가 없으면 8182, 경로가 없으면 `/gremlin`.
    pub fn from_uri(uri: &str) -> DriverResult<Self> {
        let (secure, rest) = if let Some(rest) = uri.strip_prefix("wss://") {
            (true, rest)
        } else if let Some(rest) = uri.strip_prefix("ws://") {
            (false, rest)
        } else if uri.contains("://") {
            return Err(DriverError::configuration(format!(
                "Unsupported scheme in '{}'",
                uri
            )));
        } else {
            (false, uri)
        };

        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, DEFAULT_PATH),
        };

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            // IPv6 literal: [addr] or [addr]:port
            let (host, after) = bracketed
                .split_once(']')
                .ok_or_else(|| DriverError::configuration("Unterminated IPv6 address"))?;
            let port = match after {
                "" => DEFAULT_PORT,
                _ => parse_port(
                    after
                        .strip_prefix(':')
                        .ok_or_else(|| DriverError::configuration("Invalid server address"))?,
                )?,
            };
            (host, port)
        } else {
            match authority.rsplit_once(':') {
                Some((host, _)) if host.contains(':') => {
                    return Err(DriverError::configuration("Invalid server address"));
                }
                Some((host, port)) => (host, parse_port(port)?),
                None => (authority, DEFAULT_PORT),
            }
        };

        if host.is_empty() {
            return Err(DriverError::configuration("Missing host"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
            secure,
        })
    }

    /// WebSocket URL
    pub fn to_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        if self.host.contains(':') {
            format!("{}://[{}]:{}{}", scheme, self.host, self.port, self.path)
        } else {
            format!("{}://{}:{}{}", scheme, self.host, self.port, self.path)
        }
    }
}

fn parse_port(port: &str) -> DriverResult<u16> {
    port.parse()
        .map_err(|_| DriverError::configuration(format!("Invalid port '{}'", port)))
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::new("localhost", DEFAULT_PORT)
    }
}

// ============================================================================
// DriverConfig - 드라이버 설정
// ============================================================================

/// 드라이버 설정
#[derive(Clone)]
pub struct DriverConfig {
    /// 서버 주소
    pub address: ServerAddress,
    /// 세션 풀 크기
    pub pool_size: usize,
    /// keepalive ping 간격 (0이면 비활성화)
    pub ping_interval: Duration,
    /// SASL 자격 증명
    pub credentials: Option<Credentials>,
    /// 연결 타임아웃
    pub connection_timeout: Duration,
    /// 기본 쿼리 타임아웃
    pub query_timeout: Duration,
    /// 타임아웃된 요청의 최대 정리 시간
    pub drain_timeout: Duration,
    /// 요청 프로세서
    pub processor: String,
    /// 스크립트 언어
    pub language: String,
    /// 메시지 형식
    pub message_format: MessageFormat,
    /// GraphSON 디코더
    pub decoder: Arc<GraphSONDecoder>,
}

impl DriverConfig {
    /// 새 설정 생성
    pub fn new(uri: &str) -> DriverResult<Self> {
        Ok(Self {
            address: ServerAddress::from_uri(uri)?,
            ..Self::default()
        })
    }

    /// 빌더 시작
    pub fn builder(uri: &str) -> DriverResult<DriverConfigBuilder> {
        let config = Self::new(uri)?;
        Ok(DriverConfigBuilder { config })
    }

    /// 설정 검증
    pub fn validate(&self) -> DriverResult<()> {
        if self.pool_size == 0 {
            return Err(DriverError::configuration("Pool size must be at least 1"));
        }
        if self.query_timeout.is_zero() {
            return Err(DriverError::configuration("Query timeout must be positive"));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: ServerAddress::default(),
            pool_size: 10,
            ping_interval: Duration::from_secs(30),
            credentials: None,
            connection_timeout: Duration::from_secs(10),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            drain_timeout: Duration::from_secs(30),
            processor: DEFAULT_PROCESSOR.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            message_format: MessageFormat::default(),
            decoder: Arc::new(GraphSONDecoder::new()),
        }
    }
}

impl fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverConfig")
            .field("address", &self.address)
            .field("pool_size", &self.pool_size)
            .field("ping_interval", &self.ping_interval)
            .field("credentials", &self.credentials)
            .field("query_timeout", &self.query_timeout)
            .field("processor", &self.processor)
            .field("message_format", &self.message_format)
            .finish()
    }
}

// ============================================================================
// DriverConfigBuilder - 설정 빌더
// ============================================================================

/// 드라이버 설정 빌더
pub struct DriverConfigBuilder {
    config: DriverConfig,
}

impl DriverConfigBuilder {
    /// 세션 풀 크기 설정
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// keepalive 간격 설정
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.config.ping_interval = interval;
        self
    }

    /// 자격 증명 설정
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::new(username, password));
        self
    }

    /// 연결 타임아웃 설정
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    /// 기본 쿼리 타임아웃 설정
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = timeout;
        self
    }

    /// 정리 타임아웃 설정
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.config.drain_timeout = timeout;
        self
    }

    /// 프로세서 설정
    pub fn with_processor(mut self, processor: impl Into<String>) -> Self {
        self.config.processor = processor.into();
        self
    }

    /// 스크립트 언어 설정
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// 메시지 형식 설정
    pub fn with_message_format(mut self, format: MessageFormat) -> Self {
        self.config.message_format = format;
        self
    }

    /// 디코더 설정 (커스텀 태그 핸들러)
    pub fn with_decoder(mut self, decoder: GraphSONDecoder) -> Self {
        self.config.decoder = Arc::new(decoder);
        self
    }

    /// 빌드
    pub fn build(self) -> DriverConfig {
        self.config
    }
}

// ============================================================================
// Query - 쿼리
// ============================================================================

/// 실행할 쿼리 (순회 또는 원시 스크립트)
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// 순회 빌더로 만든 쿼리
    Traversal(StepQueue),
    /// 스크립트 문자열
    Script(String),
}

impl Query {
    /// 스크립트로 컴파일
    pub fn to_script(&self) -> String {
        match self {
            Query::Traversal(queue) => crate::traversal::compile(queue),
            Query::Script(script) => script.clone(),
        }
    }
}

impl From<StepQueue> for Query {
    fn from(queue: StepQueue) -> Self {
        Query::Traversal(queue)
    }
}

impl From<&StepQueue> for Query {
    fn from(queue: &StepQueue) -> Self {
        Query::Traversal(queue.clone())
    }
}

impl From<String> for Query {
    fn from(script: String) -> Self {
        Query::Script(script)
    }
}

impl From<&str> for Query {
    fn from(script: &str) -> Self {
        Query::Script(script.to_string())
    }
}

// ============================================================================
// GremlinClient - 클라이언트
// ============================================================================

/// Gremlin Server 클라이언트
///
/// 세션 풀을 소유하며, 호출자마다 세션 하나를 빌려 쿼리를 실행합니다.
pub struct GremlinClient {
    /// 설정
    config: Arc<DriverConfig>,
    /// 세션 풀 (열린 상태도 풀이 관리)
    pool: Arc<SessionPool>,
}

impl GremlinClient {
    /// 클라이언트 생성 및 세션 연결
    ///
    /// 연결에 실패한 세션도 풀에 남으며, 처음 사용할 때 `Disconnected`를 반환합니다.
    pub async fn connect(config: DriverConfig, connector: Arc<dyn Connector>) -> DriverResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let pool = SessionPool::connect(config.clone(), connector).await?;

        Ok(Self {
            config,
            pool: Arc::new(pool),
        })
    }

    /// 기본 타임아웃으로 쿼리 실행
    pub async fn query(&self, query: impl Into<Query>) -> DriverResult<Vec<Value>> {
        self.query_with_timeout(query, self.config.query_timeout).await
    }

    /// 타임아웃 지정 쿼리 실행
    pub async fn query_with_timeout(
        &self,
        query: impl Into<Query>,
        timeout: Duration,
    ) -> DriverResult<Vec<Value>> {
        self.ensure_open()?;
        let script = query.into().to_script();
        tracing::trace!("Submitting script: {}", script);
        self.pool.execute(script, timeout).await
    }

    /// 클라이언트 종료
    pub async fn close(&self) {
        if self.pool.is_open() {
            self.pool.close().await;
        }
    }

    /// 열린 상태 확인
    pub fn is_open(&self) -> bool {
        self.pool.is_open()
    }

    /// 설정
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// 풀 메트릭
    pub fn metrics(&self) -> PoolMetrics {
        self.pool.metrics()
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DriverError::pool_exhausted("Client is closed"))
        }
    }
}

impl fmt::Debug for GremlinClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GremlinClient")
            .field("address", &self.config.address)
            .field("open", &self.is_open())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
