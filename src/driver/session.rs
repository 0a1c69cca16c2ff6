//! Protocol Session
//!
//! 채널 하나를 소유하는 요청/응답 세션
//!
//! ```text
//! Idle ─submit─▶ Sending ─▶ AwaitingFrame ─206─▶ Accumulating ─▶ AwaitingFrame
//!                                 │                                   │
//!                                 ├─401/407─▶ (SASL 응답 전송) ────────┤
//!                                 └─200/204/에러─▶ Completed ─▶ Idle ◀─┘
//!
//! Close 프레임 / 전송 실패 ─▶ Disconnected (풀에서 제거)
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::driver::DriverConfig;
use super::error::{DriverError, DriverResult};
use super::types::Value;
use crate::gremlin::{
    Channel, Connector, GraphSONDecoder, Message, RequestMessage, ResponseCode, ResponseMessage,
};

/// 공유 채널 슬롯 (None = 연결 끊김)
type Link = Arc<Mutex<Option<Box<dyn Channel>>>>;

// ============================================================================
// SessionState - 세션 상태
// ============================================================================

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 요청 없음, 대여 가능
    Idle,
    /// 요청 전송 중
    Sending,
    /// 다음 프레임 대기
    AwaitingFrame,
    /// 부분 결과(206) 누적 중
    Accumulating,
    /// 최종 프레임 수신 완료
    Completed,
    /// 연결 끊김
    Disconnected,
}

// ============================================================================
// Exchange - 단일 요청의 프레임 상태 기계
// ============================================================================

/// 프레임 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// 다음 프레임 대기
    Continue,
    /// 최종 결과
    Complete(Vec<Value>),
    /// SASL 인증 응답 필요
    Authenticate,
    /// 에러로 종료
    Fail(DriverError),
}

/// 요청 하나에 대한 응답 프레임 상태 기계
///
/// 전송 계층과 무관한 순수 값입니다. 수신 루프가 프레임마다 [`on_frame`]을
/// 호출하고 반환된 [`Transition`]에 따라 동작합니다.
///
/// [`on_frame`]: Exchange::on_frame
#[derive(Debug)]
pub struct Exchange {
    request_id: Uuid,
    has_credentials: bool,
    authenticated: bool,
    results: Vec<Value>,
    state: SessionState,
}

impl Exchange {
    /// 새 교환 시작
    pub fn new(request_id: Uuid, has_credentials: bool) -> Self {
        Self {
            request_id,
            has_credentials,
            authenticated: false,
            results: Vec::new(),
            state: SessionState::AwaitingFrame,
        }
    }

    /// 요청 ID
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// 현재 상태
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 지금까지 누적된 결과 수
    pub fn accumulated(&self) -> usize {
        self.results.len()
    }

    /// 프레임 처리
    pub fn on_frame(&mut self, frame: &ResponseMessage, decoder: &GraphSONDecoder) -> Transition {
        if let Some(id) = frame.request_id() {
            if id != self.request_id {
                tracing::debug!("Ignoring frame for request {} (awaiting {})", id, self.request_id);
                return Transition::Continue;
            }
        }

        let code = frame.status.code;
        let Some(known) = frame.code() else {
            return self.fail(DriverError::protocol(format!(
                "unexpected status code {}: {}",
                code,
                frame.status.message()
            )));
        };

        if known.is_challenge() {
            return if !self.has_credentials {
                self.fail(DriverError::missing_credentials())
            } else if self.authenticated {
                self.fail(DriverError::unauthorized(frame.status.message()))
            } else {
                self.authenticated = true;
                self.state = SessionState::Sending;
                Transition::Authenticate
            };
        }

        if known.is_terminal_success() {
            // 204 carries no data to decode
            if known == ResponseCode::Success {
                self.results.extend(decoder.decode_results(frame.data()));
            }
            return self.complete();
        }

        if known == ResponseCode::PartialContent {
            self.results.extend(decoder.decode_results(frame.data()));
            self.state = SessionState::Accumulating;
            return Transition::Continue;
        }

        let err = DriverError::from_status(code, frame.status.message())
            .unwrap_or_else(|| DriverError::protocol(format!("unexpected status code {}", code)));
        self.fail(err)
    }

    fn complete(&mut self) -> Transition {
        self.state = SessionState::Completed;
        Transition::Complete(std::mem::take(&mut self.results))
    }

    fn fail(&mut self, err: DriverError) -> Transition {
        self.state = SessionState::Completed;
        Transition::Fail(err)
    }
}

// ============================================================================
// Session - 프로토콜 세션
// ============================================================================

/// 프로토콜 세션
///
/// 한 번에 요청 하나만 처리합니다. 풀이 세션을 독점적으로 빌려주므로
/// 같은 채널에서 두 요청의 프레임이 섞이지 않습니다.
pub struct Session {
    /// 세션 ID
    id: u64,
    /// 채널
    link: Link,
    /// 상태
    state: SessionState,
    /// 설정
    config: Arc<DriverConfig>,
    /// keepalive 중지 토큰
    keepalive: CancellationToken,
}

impl Session {
    /// 서버에 연결하여 세션 생성
    ///
    /// 연결 실패는 에러가 아니라 끊긴 세션이 됩니다.
    pub async fn connect(id: u64, config: Arc<DriverConfig>, connector: &dyn Connector) -> Self {
        let opened = tokio::time::timeout(config.connection_timeout, connector.open(&config.address)).await;

        let channel = match opened {
            Ok(Ok(channel)) => {
                tracing::debug!("Session {} connected to {}", id, config.address);
                Some(channel)
            }
            Ok(Err(e)) => {
                tracing::warn!("Session {} failed to connect to {}: {}", id, config.address, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Session {} timed out connecting to {} after {:?}",
                    id,
                    config.address,
                    config.connection_timeout
                );
                None
            }
        };

        Self::from_channel(id, config, channel)
    }

    /// 열린 채널로 세션 생성
    ///
    /// keepalive 태스크를 띄우므로 Tokio 런타임 안에서 호출해야 합니다.
    pub fn from_channel(id: u64, config: Arc<DriverConfig>, channel: Option<Box<dyn Channel>>) -> Self {
        let state = if channel.is_some() {
            SessionState::Idle
        } else {
            SessionState::Disconnected
        };
        let link: Link = Arc::new(Mutex::new(channel));
        let keepalive = CancellationToken::new();

        if state == SessionState::Idle && !config.ping_interval.is_zero() {
            spawn_keepalive(id, Arc::downgrade(&link), config.ping_interval, keepalive.clone());
        }

        Self {
            id,
            link,
            state,
            config,
            keepalive,
        }
    }

    /// 세션 ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 상태
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 연결 여부
    pub fn is_connected(&self) -> bool {
        self.state != SessionState::Disconnected
    }

    /// 스크립트 실행
    ///
    /// 최종 프레임까지 수신하고 누적된 결과를 반환합니다. 연결이 끊기면
    /// 세션은 `Disconnected` 상태가 됩니다.
    pub async fn submit(&mut self, script: &str) -> DriverResult<Vec<Value>> {
        let link = Arc::clone(&self.link);
        let mut slot = link.lock().await;

        let Some(channel) = slot.as_mut() else {
            self.state = SessionState::Disconnected;
            return Err(DriverError::disconnected(format!("Session {} is not connected", self.id)));
        };

        let request = RequestMessage::eval(script, &self.config.processor, &self.config.language);
        let result = self.exchange(channel.as_mut(), request).await;

        match &result {
            Err(e) if e.is_fatal() => {
                tracing::warn!("Session {} disconnected: {}", self.id, e);
                if let Some(mut channel) = slot.take() {
                    if let Err(e) = channel.close().await {
                        tracing::debug!("Session {} close failed: {}", self.id, e);
                    }
                }
                self.state = SessionState::Disconnected;
                self.keepalive.cancel();
            }
            _ => self.state = SessionState::Idle,
        }

        result
    }

    /// 요청 전송 및 수신 루프
    async fn exchange(&mut self, channel: &mut dyn Channel, request: RequestMessage) -> DriverResult<Vec<Value>> {
        let format = self.config.message_format;

        self.state = SessionState::Sending;
        tracing::trace!(
            "Session {} sending request {}: {}",
            self.id,
            request.request_id,
            request.script().unwrap_or_default()
        );
        channel.send(request.to_message(format)?).await?;

        let mut exchange = Exchange::new(request.request_id, self.config.credentials.is_some());
        self.state = exchange.state();

        loop {
            let message = channel
                .receive()
                .await?
                .ok_or_else(|| DriverError::disconnected("Channel closed"))?;

            let frame = match message {
                Message::Text(text) => ResponseMessage::from_text(&text),
                Message::Binary(bytes) => ResponseMessage::from_slice(&bytes),
                Message::Ping(payload) => {
                    channel.send(Message::Pong(payload)).await?;
                    continue;
                }
                // replies to our own keepalive pings
                Message::Pong(_) => continue,
                Message::Close(frame) => {
                    let reason = frame
                        .map(|f| format!("Server closed connection ({}: {})", f.code, f.reason))
                        .unwrap_or_else(|| "Server closed connection".to_string());
                    return Err(DriverError::disconnected(reason));
                }
            }
            .map_err(|e| DriverError::protocol(format!("Invalid response frame: {}", e)))?;

            tracing::trace!("Session {} received {}", self.id, frame);

            match exchange.on_frame(&frame, &self.config.decoder) {
                Transition::Continue => self.state = exchange.state(),
                Transition::Complete(values) => {
                    self.state = SessionState::Completed;
                    return Ok(values);
                }
                Transition::Authenticate => {
                    let credentials = self
                        .config
                        .credentials
                        .as_ref()
                        .ok_or_else(DriverError::missing_credentials)?;
                    tracing::debug!("Session {} answering authentication challenge", self.id);

                    let auth = RequestMessage::authentication(
                        request.request_id,
                        &self.config.processor,
                        &credentials.username,
                        &credentials.password,
                    );
                    channel.send(auth.to_message(format)?).await?;
                    self.state = SessionState::AwaitingFrame;
                }
                Transition::Fail(err) => {
                    self.state = SessionState::Completed;
                    return Err(err);
                }
            }
        }
    }

    /// 연결 끊기
    pub async fn disconnect(&mut self) {
        self.keepalive.cancel();
        if let Some(mut channel) = self.link.lock().await.take() {
            if let Err(e) = channel.close().await {
                tracing::debug!("Session {} close failed: {}", self.id, e);
            }
        }
        self.state = SessionState::Disconnected;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.keepalive.cancel();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("address", &self.config.address)
            .field("state", &self.state)
            .finish()
    }
}

/// 유휴 상태에서 주기적으로 ping 전송
///
/// 요청 처리 중에는 채널 잠금을 얻지 못하므로 건너뜁니다.
fn spawn_keepalive(id: u64, link: Weak<Mutex<Option<Box<dyn Channel>>>>, interval: Duration, stop: CancellationToken) {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let Some(link) = link.upgrade() else { break };
            let Ok(mut slot) = link.try_lock() else { continue };
            let Some(channel) = slot.as_mut() else { break };

            if let Err(e) = channel.send(Message::Ping(Bytes::new())).await {
                tracing::debug!("Session {} keepalive ping failed: {}", id, e);
            }
        }

        tracing::trace!("Session {} keepalive stopped", id);
    });
}

// ============================================================================
// Tests
// ============================================================================
