//! Session Pool
//!
//! 고정 크기 세션 풀
//!
//! 세션은 시작 시 모두 생성됩니다. 호출자는 FIFO 순서로 세션 하나를 빌리고,
//! 요청이 끝나면 세션을 반환합니다. 연결이 끊긴 세션은 반환 대신 폐기되며
//! 풀은 남은 세션으로 계속 동작합니다.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::Semaphore;
use tokio::time::Instant;

use super::driver::DriverConfig;
use super::error::{DriverError, DriverResult};
use super::session::Session;
use super::types::Value;
use crate::gremlin::Connector;

/// 표현 가능한 최대 대기 시간 (약 30년)
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `start + timeout`, 넘치면 먼 미래로 고정
fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

// ============================================================================
// PoolMetrics - 풀 메트릭
// ============================================================================

/// 풀 메트릭
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolMetrics {
    /// 설정된 크기
    pub size: usize,
    /// 폐기되지 않은 세션 수
    pub live: usize,
    /// 유휴 세션 수
    pub idle: usize,
    /// 사용 중인 세션 수
    pub in_use: usize,
    /// 총 대여 횟수
    pub total_checkouts: u64,
    /// 총 폐기 횟수
    pub total_discarded: u64,
    /// 총 타임아웃 횟수
    pub total_timeouts: u64,
}

// ============================================================================
// SessionPool - 세션 풀
// ============================================================================

/// 세션 풀
///
/// 세마포어 허가 수는 항상 유휴 세션 수와 같습니다. 허가를 얻은 호출자는
/// 반드시 유휴 세션 하나를 꺼낼 수 있고, 세션을 돌려놓을 때 허가를 추가합니다.
/// Tokio 세마포어는 대기 순서를 보존하므로 대여는 FIFO입니다.
pub struct SessionPool {
    /// 설정
    config: Arc<DriverConfig>,
    /// 유휴 세션들
    idle: Mutex<VecDeque<Session>>,
    /// 유휴 세션 허가
    semaphore: Semaphore,
    /// 살아있는 세션 수
    live: AtomicUsize,
    /// 사용 중인 세션 수
    in_use: AtomicUsize,
    /// 총 대여 횟수
    total_checkouts: AtomicU64,
    /// 총 폐기 횟수
    total_discarded: AtomicU64,
    /// 총 타임아웃 횟수
    total_timeouts: AtomicU64,
    /// 열린 상태
    open: RwLock<bool>,
}

impl SessionPool {
    /// 풀 생성 및 모든 세션 연결
    pub async fn connect(config: Arc<DriverConfig>, connector: Arc<dyn Connector>) -> DriverResult<Self> {
        config.validate()?;

        let size = config.pool_size;
        let sessions = futures::future::join_all(
            (0..size).map(|i| Session::connect(i as u64 + 1, Arc::clone(&config), connector.as_ref())),
        )
        .await;

        let connected = sessions.iter().filter(|s| s.is_connected()).count();
        if connected == 0 {
            tracing::warn!("No session could connect to {}", config.address);
        } else if connected < size {
            tracing::warn!("{} of {} sessions connected to {}", connected, size, config.address);
        } else {
            tracing::debug!("Session pool ready: {} sessions to {}", size, config.address);
        }

        Ok(Self {
            config,
            idle: Mutex::new(sessions.into_iter().collect()),
            semaphore: Semaphore::new(size),
            live: AtomicUsize::new(size),
            in_use: AtomicUsize::new(0),
            total_checkouts: AtomicU64::new(0),
            total_discarded: AtomicU64::new(0),
            total_timeouts: AtomicU64::new(0),
            open: RwLock::new(true),
        })
    }

    /// 스크립트 실행
    ///
    /// 대여 대기와 실행 모두 `timeout` 안에 끝나야 합니다. 타임아웃된 요청은
    /// 백그라운드에서 최종 프레임까지 계속 수신한 뒤 세션을 반환하며,
    /// `drain_timeout` 안에 끝나지 않으면 세션을 끊고 폐기합니다.
    pub async fn execute(self: &Arc<Self>, script: String, timeout: Duration) -> DriverResult<Vec<Value>> {
        let deadline = deadline_after(Instant::now(), timeout);
        let drain_deadline = deadline_after(deadline, self.config.drain_timeout);
        let mut session = self.checkout(deadline, timeout).await?;

        let pool = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let outcome = tokio::time::timeout_at(drain_deadline, session.submit(&script)).await;
            let result = match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Session {} did not finish draining, disconnecting", session.id());
                    session.disconnect().await;
                    Err(DriverError::timeout("Request did not complete"))
                }
            };
            pool.release(session).await;
            result
        });

        match tokio::time::timeout_at(deadline, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(DriverError::internal(format!("Request task failed: {}", e))),
            Err(_) => {
                self.total_timeouts.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Request timed out after {:?}", timeout);
                Err(DriverError::timeout(format!("Request timed out after {:?}", timeout)))
            }
        }
    }

    /// 세션 대여
    async fn checkout(&self, deadline: Instant, timeout: Duration) -> DriverResult<Session> {
        if !self.is_open() {
            return Err(DriverError::pool_exhausted("Pool is closed"));
        }

        let permit = match tokio::time::timeout_at(deadline, self.semaphore.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(self.exhausted()),
            Err(_) => {
                self.total_timeouts.fetch_add(1, Ordering::Relaxed);
                return Err(DriverError::timeout(format!(
                    "No session available within {:?}",
                    timeout
                )));
            }
        };
        permit.forget();

        let session = self.idle.lock().pop_front().ok_or_else(|| self.exhausted())?;
        self.in_use.fetch_add(1, Ordering::Relaxed);
        self.total_checkouts.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Checked out session {}", session.id());

        Ok(session)
    }

    /// 세션 반환 또는 폐기
    async fn release(&self, session: Session) {
        self.in_use.fetch_sub(1, Ordering::Relaxed);

        let rejected = if session.is_connected() {
            let mut idle = self.idle.lock();
            if *self.open.read() {
                idle.push_back(session);
                None
            } else {
                Some(session)
            }
        } else {
            Some(session)
        };

        match rejected {
            None => self.semaphore.add_permits(1),
            Some(session) => self.discard(session).await,
        }
    }

    /// 세션 폐기
    async fn discard(&self, mut session: Session) {
        session.disconnect().await;
        self.total_discarded.fetch_add(1, Ordering::Relaxed);

        let remaining = self.live.fetch_sub(1, Ordering::AcqRel).saturating_sub(1);
        tracing::warn!("Discarded session {} ({} live)", session.id(), remaining);

        if remaining == 0 {
            if self.is_open() {
                tracing::warn!("No live sessions left to {}", self.config.address);
            }
            self.semaphore.close();
        }
    }

    fn exhausted(&self) -> DriverError {
        if self.is_open() {
            DriverError::pool_exhausted("No live sessions")
        } else {
            DriverError::pool_exhausted("Pool is closed")
        }
    }

    /// 풀 닫기
    ///
    /// 유휴 세션을 즉시 닫고, 사용 중인 세션은 반환될 때 닫습니다.
    pub async fn close(&self) {
        let drained: Vec<Session> = {
            let mut idle = self.idle.lock();
            *self.open.write() = false;
            idle.drain(..).collect()
        };
        self.semaphore.close();

        for mut session in drained {
            session.disconnect().await;
            self.live.fetch_sub(1, Ordering::AcqRel);
        }
        tracing::debug!("Session pool to {} closed", self.config.address);
    }

    /// 열린 상태 확인
    pub fn is_open(&self) -> bool {
        *self.open.read()
    }

    /// 메트릭 조회
    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            size: self.config.pool_size,
            live: self.live.load(Ordering::Acquire),
            idle: self.idle.lock().len(),
            in_use: self.in_use.load(Ordering::Relaxed),
            total_checkouts: self.total_checkouts.load(Ordering::Relaxed),
            total_discarded: self.total_discarded.load(Ordering::Relaxed),
            total_timeouts: self.total_timeouts.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for SessionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = self.metrics();
        f.debug_struct("SessionPool")
            .field("address", &self.config.address)
            .field("live", &metrics.live)
            .field("idle", &metrics.idle)
            .field("in_use", &metrics.in_use)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::error::ErrorKind;
    use crate::driver::testing::{config, frame, results_frame, MockConnector};
    use crate::gremlin::{CloseFrame, Message};
    use serde_json::json;

    const LONG: Duration = Duration::from_secs(5);

    async fn pool_with(connector: &MockConnector, size: usize) -> Arc<SessionPool> {
        let mut config = config();
        config.pool_size = size;
        pool_with_config(connector, config).await
    }

    async fn pool_with_config(connector: &MockConnector, config: DriverConfig) -> Arc<SessionPool> {
        let connector: Arc<dyn Connector> = Arc::new(connector.clone());
        Arc::new(SessionPool::connect(Arc::new(config), connector).await.unwrap())
    }

    #[tokio::test]
    async fn test_pool_opens_all_sessions() {
        let connector = MockConnector::echo();
        let pool = pool_with(&connector, 3).await;

        assert_eq!(connector.opened(), 3);
        let metrics = pool.metrics();
        assert_eq!(metrics.size, 3);
        assert_eq!(metrics.live, 3);
        assert_eq!(metrics.idle, 3);
        assert_eq!(metrics.in_use, 0);
    }

    #[tokio::test]
    async fn test_pool_rejects_zero_size() {
        let mut config = config();
        config.pool_size = 0;
        let result = SessionPool::connect(Arc::new(config), Arc::new(MockConnector::echo())).await;
        assert!(matches!(result, Err(DriverError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_execute_returns_session() {
        let connector = MockConnector::echo();
        let pool = pool_with(&connector, 1).await;

        for _ in 0..3 {
            let values = pool.execute("g.V()".to_string(), LONG).await.unwrap();
            assert_eq!(values, vec![Value::from("g.V()")]);
        }

        let metrics = pool.metrics();
        assert_eq!(metrics.total_checkouts, 3);
        assert_eq!(metrics.idle, 1);
        assert_eq!(metrics.in_use, 0);
        assert_eq!(connector.opened(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bounded_by_pool_size() {
        let connector = MockConnector::echo().with_delay(Duration::from_millis(20));
        let pool = pool_with(&connector, 2).await;

        let tasks: Vec<_> = (0..6)
            .map(|i| {
                let pool = Arc::clone(&pool);
                tokio::spawn(async move { pool.execute(format!("g.V({})", i), LONG).await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert!(connector.max_in_flight() <= 2);
        assert_eq!(connector.requests().len(), 6);
        assert_eq!(pool.metrics().total_checkouts, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_is_fifo() {
        let connector = MockConnector::echo().with_delay(Duration::from_millis(50));
        let pool = pool_with(&connector, 1).await;

        let mut tasks = Vec::new();
        for script in ["first", "second", "third", "fourth"] {
            let pool = Arc::clone(&pool);
            tasks.push(tokio::spawn(async move { pool.execute(script.to_string(), LONG).await }));
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let order: Vec<_> = connector
            .requests()
            .iter()
            .map(|r| r["args"]["gremlin"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(order, vec!["first", "second", "third", "fourth"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_wait_times_out() {
        let connector = MockConnector::echo().with_delay(Duration::from_secs(1));
        let pool = pool_with(&connector, 1).await;

        let busy = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.execute("g.V()".to_string(), LONG).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let err = pool.execute("g.E()".to_string(), Duration::from_millis(100)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(pool.metrics().total_timeouts, 1);

        assert!(busy.await.unwrap().is_ok());
        // the abandoned waiter never reached the server
        assert_eq!(connector.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_request_drains_then_returns_session() {
        let connector = MockConnector::echo().with_delay(Duration::from_millis(200));
        let pool = pool_with(&connector, 1).await;

        let err = pool.execute("g.V()".to_string(), Duration::from_millis(50)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(pool.metrics().in_use, 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let metrics = pool.metrics();
        assert_eq!(metrics.idle, 1);
        assert_eq!(metrics.live, 1);
        assert_eq!(metrics.total_discarded, 0);

        let values = pool.execute("g.E()".to_string(), LONG).await.unwrap();
        assert_eq!(values, vec![Value::from("g.E()")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_timeout_discards_session() {
        let connector = MockConnector::new(|_| vec![]);
        let mut config = config();
        config.pool_size = 1;
        config.drain_timeout = Duration::from_millis(100);
        let pool = pool_with_config(&connector, config).await;

        let err = pool.execute("g.V()".to_string(), Duration::from_millis(50)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let metrics = pool.metrics();
        assert_eq!(metrics.live, 0);
        assert_eq!(metrics.total_discarded, 1);
        assert_eq!(connector.closed(), 1);

        let err = pool.execute("g.V()".to_string(), LONG).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PoolExhausted);
    }

    #[tokio::test]
    async fn test_execute_with_unbounded_timeout() {
        let connector = MockConnector::echo();
        let mut config = config();
        config.pool_size = 1;
        config.drain_timeout = Duration::MAX;
        let pool = pool_with_config(&connector, config).await;

        let values = pool.execute("g.V()".to_string(), Duration::MAX).await.unwrap();
        assert_eq!(values, vec![Value::from("g.V()")]);

        let metrics = pool.metrics();
        assert_eq!(metrics.idle, 1);
        assert_eq!(metrics.in_use, 0);
    }

    #[tokio::test]
    async fn test_deadline_after_saturates() {
        let now = Instant::now();
        assert_eq!(deadline_after(now, Duration::from_secs(1)), now + Duration::from_secs(1));
        assert_eq!(deadline_after(now, Duration::MAX), now + FAR_FUTURE);
    }

    #[tokio::test]
    async fn test_failed_session_reports_disconnected_then_discarded() {
        let connector = MockConnector::echo().with_failed_opens(1);
        let pool = pool_with(&connector, 2).await;
        assert_eq!(pool.metrics().live, 2);

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            outcomes.push(pool.execute("g.V()".to_string(), LONG).await);
        }

        let disconnected = outcomes
            .iter()
            .filter(|r| matches!(r, Err(DriverError::Disconnected(_))))
            .count();
        assert_eq!(disconnected, 1);
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 2);

        let metrics = pool.metrics();
        assert_eq!(metrics.live, 1);
        assert_eq!(metrics.total_discarded, 1);
    }

    #[tokio::test]
    async fn test_no_live_sessions_fails_fast() {
        let connector = MockConnector::unreachable();
        let pool = pool_with(&connector, 2).await;

        for _ in 0..2 {
            let err = pool.execute("g.V()".to_string(), LONG).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Disconnected);
        }

        let err = pool.execute("g.V()".to_string(), LONG).await.unwrap_err();
        assert_eq!(err, DriverError::PoolExhausted("No live sessions".into()));
        assert_eq!(pool.metrics().live, 0);
    }

    #[tokio::test]
    async fn test_close_frame_discards_session() {
        let connector = MockConnector::new(|request| match request["args"]["gremlin"].as_str() {
            Some("bye") => vec![Message::Close(Some(CloseFrame::new(1001, "going away")))],
            _ => vec![results_frame(request, 200, json!([1]))],
        });
        let pool = pool_with(&connector, 2).await;

        let err = pool.execute("bye".to_string(), LONG).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Disconnected);

        let metrics = pool.metrics();
        assert_eq!(metrics.live, 1);
        assert_eq!(metrics.idle, 1);

        let values = pool.execute("g.V()".to_string(), LONG).await.unwrap();
        assert_eq!(values, vec![Value::Integer(1)]);
    }

    #[tokio::test]
    async fn test_server_error_keeps_session() {
        let connector = MockConnector::new(|request| vec![frame(request, 500, "boom")]);
        let pool = pool_with(&connector, 1).await;

        let err = pool.execute("g.V()".to_string(), LONG).await.unwrap_err();
        assert_eq!(err, DriverError::ServerError("boom".into()));
        assert!(err.is_server_error());

        let metrics = pool.metrics();
        assert_eq!(metrics.live, 1);
        assert_eq!(metrics.idle, 1);
        assert_eq!(metrics.total_discarded, 0);
    }

    #[tokio::test]
    async fn test_close_pool() {
        let connector = MockConnector::echo();
        let pool = pool_with(&connector, 3).await;

        pool.close().await;
        assert!(!pool.is_open());
        assert_eq!(connector.closed(), 3);
        assert_eq!(pool.metrics().live, 0);

        let err = pool.execute("g.V()".to_string(), LONG).await.unwrap_err();
        assert_eq!(err, DriverError::PoolExhausted("Pool is closed".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_while_in_use_closes_on_return() {
        let connector = MockConnector::echo().with_delay(Duration::from_millis(100));
        let pool = pool_with(&connector, 1).await;

        let running = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.execute("g.V()".to_string(), LONG).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        pool.close().await;
        assert!(running.await.unwrap().is_ok());
        assert_eq!(connector.closed(), 1);
        assert_eq!(pool.metrics().live, 0);
    }
}
