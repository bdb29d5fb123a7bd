//! 모니터 실행 주기.
//!
//! 모니터링을 시작하고, 종료 신호가 오면 구독을 해제한다.

use shopdesk_core::error::CoreError;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tracing::info;

use crate::notification_manager::NotificationManager;

/// 종료 신호가 올 때까지 주문 모니터링 실행
///
/// 신호 대기가 실패해도 구독은 해제한 뒤 에러를 돌려준다.
pub async fn run_until<F>(manager: &Arc<NotificationManager>, shutdown: F) -> Result<(), CoreError>
where
    F: Future<Output = io::Result<()>>,
{
    manager.start_monitoring().await?;

    let outcome = shutdown.await;
    manager.stop_monitoring();

    outcome.map_err(CoreError::from)
}

/// OS 종료 시그널 대기 (unix: SIGINT/SIGTERM, 그 외: Ctrl+C)
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl+C 수신");
    }

    Ok(())
}
