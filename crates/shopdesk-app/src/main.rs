//! # shopdesk
//!
//! SHOPDESK 데스크톱 바이너리 진입점.
//! DI 와이어링, 주문 모니터링 시작, 시그널 대기 후 정리.

use anyhow::{Context, Result};
use clap::Parser;
use shopdesk_app::event_bus::{AppEvent, EventBus};
use shopdesk_app::lifecycle::{run_until, shutdown_signal};
use shopdesk_app::notification_manager::{MonitorPorts, NotificationManager};
use shopdesk_app::shell_window::ShellWindow;
use shopdesk_core::config::{AppConfig, FeedMode};
use shopdesk_core::config_manager::ConfigManager;
use shopdesk_network::create_order_feed;
use shopdesk_storage::sqlite::SqliteStorage;
use shopdesk_ui::badge::WatchBadge;
use shopdesk_ui::notifier::DesktopNotifierImpl;
use shopdesk_ui::sound::EmbeddedAlertPlayer;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// SHOPDESK 데스크톱
///
/// 소상공인용 주문 관리 앱. 새 주문이 들어오면 데스크톱 알림을 띄운다.
#[derive(Parser, Debug)]
#[command(name = "shopdesk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: 설정 파일 값)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 데이터 저장 경로 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// SSE 대신 REST 폴링으로 주문 수 조회
    #[arg(long)]
    poll: bool,
}

/// 데이터베이스 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.shopdesk.shopdesk/shopdesk.db`
/// - Windows: `%APPDATA%\shopdesk\shopdesk\data\shopdesk.db`
/// - Linux: `~/.local/share/shopdesk/shopdesk.db`
fn resolve_db_path(data_dir: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => ConfigManager::data_dir()?,
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("데이터 디렉토리 생성 실패: {}", dir.display()))?;
    Ok(dir.join(&config.storage.db_file_name))
}

/// 셸 대신 이벤트와 배지 변화를 로그로 남긴다
async fn log_shell_events(
    mut events: broadcast::Receiver<AppEvent>,
    mut badge: watch::Receiver<shopdesk_ui::badge::BadgeState>,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(AppEvent::NewOrders { delta, total }) => info!("새 주문 {delta}건 (처리 대기 {total}건)"),
                Ok(AppEvent::FeedStatusChanged(status)) => info!("피드 상태: {status:?}"),
                Ok(AppEvent::FocusRequested) => info!("창 포커스 요청"),
                Ok(AppEvent::NavigateRequested(url)) => info!("이동 요청: {url}"),
                Err(broadcast::error::RecvError::Lagged(n)) => warn!("이벤트 {n}건 누락"),
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = badge.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = badge.borrow_and_update().clone();
                debug!("배지: {:?} (표시 {})", state.text, state.visible);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "shopdesk={},shopdesk_app={},shopdesk_core={},shopdesk_storage={},shopdesk_network={},shopdesk_ui={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("SHOPDESK 시작");

    // 설정 로드
    let config_manager = match args.config {
        Some(path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.get();
    debug!("설정 파일: {}", config_manager.config_path().display());

    // CLI 인자로 설정 오버라이드
    if let Some(server_url) = args.server {
        config.feed.base_url = server_url;
    }
    if args.poll {
        config.feed.mode = FeedMode::Poll;
    }
    config.validate()?;
    info!("서버: {} ({:?})", config.feed.base_url, config.feed.mode);

    // ── 어댑터 생성 (DI 와이어링) ──

    let db_path = resolve_db_path(args.data_dir, &config)?;
    let storage = Arc::new(SqliteStorage::open(&db_path)?);
    info!("저장소: {}", db_path.display());

    let feed = create_order_feed(&config)?;
    let badge = Arc::new(WatchBadge::new());
    let event_bus = Arc::new(EventBus::default());

    let ports = MonitorPorts {
        store: storage,
        feed,
        notifier: Arc::new(DesktopNotifierImpl::new()),
        player: Arc::new(EmbeddedAlertPlayer::new()),
        badge: badge.clone(),
        window: Arc::new(ShellWindow::new(event_bus.clone())),
    };

    let shell = tokio::spawn(log_shell_events(event_bus.subscribe(), badge.subscribe()));

    let manager = Arc::new(
        NotificationManager::new(config.notification.clone(), ports, event_bus.clone()).await,
    );

    if !manager.request_permission().await {
        warn!("알림 권한 없음: 배지만 갱신됩니다");
    }

    info!("SHOPDESK 실행 중 (Ctrl+C로 종료)");
    run_until(&manager, shutdown_signal()).await?;

    shell.abort();

    info!("SHOPDESK 종료");
    Ok(())
}
