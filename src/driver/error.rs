//! Driver Error Types
//!
//! 드라이버 에러 정의

use std::fmt;
use thiserror::Error;

use crate::gremlin::{ResponseCode, TransportError};

/// 자격 증명 누락 메시지
pub const MISSING_CREDENTIALS: &str = "Missing user credentials";

// ============================================================================
// DriverError - 드라이버 에러
// ============================================================================

/// 드라이버 에러
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// 인증 실패 (401/407)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 잘못된 요청 (409/498)
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// 잘못된 요청 인자 (499)
    #[error("Invalid request arguments: {0}")]
    InvalidRequestArguments(String),

    /// 서버 에러 (500)
    #[error("Server error: {0}")]
    ServerError(String),

    /// 스크립트 평가 에러 (597)
    #[error("Script evaluation error: {0}")]
    ScriptEvaluation(String),

    /// 서버 타임아웃 (598)
    #[error("Server timeout: {0}")]
    ServerTimeout(String),

    /// 서버 직렬화 에러 (599)
    #[error("Server serialization error: {0}")]
    ServerSerialization(String),

    /// 연결 끊김
    #[error("Disconnected: {0}")]
    Disconnected(String),

    /// 사용 가능한 세션 없음
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),

    /// 타임아웃 에러
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 프로토콜 에러
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 직렬화 에러
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 타입 변환 에러
    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    /// 내부 에러
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DriverError {
    /// 인증 에러 생성
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// 자격 증명 누락 에러 생성
    pub fn missing_credentials() -> Self {
        Self::Unauthorized(MISSING_CREDENTIALS.to_string())
    }

    /// 연결 끊김 에러 생성
    pub fn disconnected(msg: impl Into<String>) -> Self {
        Self::Disconnected(msg.into())
    }

    /// 풀 소진 에러 생성
    pub fn pool_exhausted(msg: impl Into<String>) -> Self {
        Self::PoolExhausted(msg.into())
    }

    /// 타임아웃 에러 생성
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// 프로토콜 에러 생성
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// 설정 에러 생성
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 직렬화 에러 생성
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// 타입 변환 에러 생성
    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Self::TypeConversion(msg.into())
    }

    /// 내부 에러 생성
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 에러 상태 코드를 에러로 변환
    ///
    /// 성공 코드(200/204/206)와 인증 요청(401/407)은 에러가 아니므로 `None`.
    /// 알 수 없는 코드는 프로토콜 에러로 처리합니다.
    pub fn from_status(code: u16, message: &str) -> Option<Self> {
        let message = message.to_string();
        let err = match ResponseCode::from_code(code) {
            Some(ResponseCode::Success)
            | Some(ResponseCode::NoContent)
            | Some(ResponseCode::PartialContent)
            | Some(ResponseCode::Unauthorized)
            | Some(ResponseCode::Authenticate) => return None,
            Some(ResponseCode::MalformedRequest) => Self::MalformedRequest(message),
            Some(ResponseCode::InvalidRequestArguments) => Self::InvalidRequestArguments(message),
            Some(ResponseCode::ServerError) => Self::ServerError(message),
            Some(ResponseCode::ScriptEvaluationError) => Self::ScriptEvaluation(message),
            Some(ResponseCode::ServerTimeout) => Self::ServerTimeout(message),
            Some(ResponseCode::ServerSerializationError) => Self::ServerSerialization(message),
            None => Self::Protocol(format!("unexpected status code {}: {}", code, message)),
        };
        Some(err)
    }

    /// 에러 종류
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::MalformedRequest(_) => ErrorKind::MalformedRequest,
            Self::InvalidRequestArguments(_) => ErrorKind::InvalidRequestArguments,
            Self::ServerError(_) => ErrorKind::ServerError,
            Self::ScriptEvaluation(_) => ErrorKind::ScriptEvaluation,
            Self::ServerTimeout(_) => ErrorKind::ServerTimeout,
            Self::ServerSerialization(_) => ErrorKind::ServerSerialization,
            Self::Disconnected(_) => ErrorKind::Disconnected,
            Self::PoolExhausted(_) => ErrorKind::PoolExhausted,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::TypeConversion(_) => ErrorKind::TypeConversion,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// 에러 메시지 (서버 메시지 그대로)
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::MalformedRequest(m)
            | Self::InvalidRequestArguments(m)
            | Self::ServerError(m)
            | Self::ScriptEvaluation(m)
            | Self::ServerTimeout(m)
            | Self::ServerSerialization(m)
            | Self::Disconnected(m)
            | Self::PoolExhausted(m)
            | Self::Timeout(m)
            | Self::Protocol(m)
            | Self::Configuration(m)
            | Self::Serialization(m)
            | Self::TypeConversion(m)
            | Self::Internal(m) => m,
        }
    }

    /// 재시도 가능 여부
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Disconnected(_) | Self::Timeout(_) | Self::ServerTimeout(_) | Self::PoolExhausted(_)
        )
    }

    /// 서버가 보고한 에러 여부
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest(_)
                | Self::InvalidRequestArguments(_)
                | Self::ServerError(_)
                | Self::ScriptEvaluation(_)
                | Self::ServerTimeout(_)
                | Self::ServerSerialization(_)
        )
    }

    /// 세션을 더 이상 쓸 수 없는 에러 여부
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Disconnected(_) | Self::Protocol(_))
    }
}

// ============================================================================
// ErrorKind - 에러 종류
// ============================================================================

/// 에러 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 인증 실패
    Unauthorized,
    /// 잘못된 요청
    MalformedRequest,
    /// 잘못된 요청 인자
    InvalidRequestArguments,
    /// 서버 에러
    ServerError,
    /// 스크립트 평가 에러
    ScriptEvaluation,
    /// 서버 타임아웃
    ServerTimeout,
    /// 서버 직렬화 에러
    ServerSerialization,
    /// 연결 끊김
    Disconnected,
    /// 세션 없음
    PoolExhausted,
    /// 타임아웃
    Timeout,
    /// 프로토콜 에러
    Protocol,
    /// 설정 에러
    Configuration,
    /// 직렬화 에러
    Serialization,
    /// 타입 변환 에러
    TypeConversion,
    /// 내부 에러
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthorized => "unauthorized",
            Self::MalformedRequest => "malformed_request",
            Self::InvalidRequestArguments => "invalid_request_arguments",
            Self::ServerError => "server_error",
            Self::ScriptEvaluation => "script_evaluation_error",
            Self::ServerTimeout => "server_timeout",
            Self::ServerSerialization => "server_serialization_error",
            Self::Disconnected => "disconnected",
            Self::PoolExhausted => "pool_exhausted",
            Self::Timeout => "timeout",
            Self::Protocol => "protocol_error",
            Self::Configuration => "configuration_error",
            Self::Serialization => "serialization_error",
            Self::TypeConversion => "type_conversion_error",
            Self::Internal => "internal_error",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 드라이버 결과 타입
pub type DriverResult<T> = Result<T, DriverError>;

impl From<TransportError> for DriverError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Serialization(msg) => DriverError::serialization(msg),
            other => DriverError::Disconnected(other.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
