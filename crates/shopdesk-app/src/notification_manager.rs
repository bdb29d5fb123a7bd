//! 주문 모니터 및 알림 관리자.
//!
//! 주문 피드에서 처리 대기(`Ordered`, `Shipped`) 주문 수를 구독하고,
//! 이전 값보다 늘어나면 새 주문 알림을 띄운다. 마지막 주문 수는 저장소에
//! 남겨 재시작 후에도 비교 기준으로 쓴다.
//!
//! 기준값이 0(처음 실행 또는 명시적 0)이면 알림을 띄우지 않는다.

use shopdesk_core::config::NotificationConfig;
use shopdesk_core::error::CoreError;
use shopdesk_core::models::feed::{FeedEvent, FeedStatus};
use shopdesk_core::models::notification::{
    new_order_message, Notification, NotificationOptions, NEW_ORDER_TAG, NEW_ORDER_TITLE,
};
use shopdesk_core::models::order::StatusFilter;
use shopdesk_core::ports::audio::AlertPlayer;
use shopdesk_core::ports::badge::BadgeView;
use shopdesk_core::ports::feed::{OrderFeed, SubscriptionTeardown};
use shopdesk_core::ports::notifier::{DesktopNotifier, ShownNotification};
use shopdesk_core::ports::storage::{KeyValueStore, LAST_ORDER_COUNT_KEY, SOUND_ENABLED_KEY};
use shopdesk_core::ports::window::AppWindow;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::event_bus::{AppEvent, EventBus};

/// 표시 대기 중인 새 주문 알림 상한. 넘치면 알림만 생략한다.
const ALERT_QUEUE: usize = 16;

/// 관리자가 사용하는 외부 기능
pub struct MonitorPorts {
    pub store: Arc<dyn KeyValueStore>,
    pub feed: Arc<dyn OrderFeed>,
    pub notifier: Arc<dyn DesktopNotifier>,
    pub player: Arc<dyn AlertPlayer>,
    pub badge: Arc<dyn BadgeView>,
    pub window: Arc<dyn AppWindow>,
}

/// 모니터 상태
#[derive(Debug)]
struct MonitorState {
    /// 마지막으로 관찰한 주문 수 (저장소와 동기화)
    last_order_count: u64,
    permission_granted: bool,
    sound_enabled: bool,
}

/// 활성 구독 — 수신 태스크, 알림 태스크, 해제 핸들은 항상 함께 교체된다
struct ActiveSubscription {
    task: JoinHandle<()>,
    alerts: JoinHandle<()>,
    teardown: SubscriptionTeardown,
}

impl ActiveSubscription {
    fn shutdown(self) {
        self.teardown.teardown();
        self.task.abort();
        self.alerts.abort();
    }
}

/// 주문 모니터 및 알림 관리자
pub struct NotificationManager {
    config: NotificationConfig,
    ports: MonitorPorts,
    events: Arc<EventBus>,
    state: RwLock<MonitorState>,
    active: parking_lot::Mutex<Option<ActiveSubscription>>,
    feed_status: parking_lot::Mutex<FeedStatus>,
}

impl NotificationManager {
    /// 새 관리자 생성. 저장된 알림음 설정을 읽는다 (없으면 켜짐).
    pub async fn new(config: NotificationConfig, ports: MonitorPorts, events: Arc<EventBus>) -> Self {
        let sound_enabled = load_sound_enabled(ports.store.as_ref()).await;
        debug!("알림음 설정 로드: {sound_enabled}");

        Self {
            config,
            ports,
            events,
            state: RwLock::new(MonitorState {
                last_order_count: 0,
                permission_granted: false,
                sound_enabled,
            }),
            active: parking_lot::Mutex::new(None),
            feed_status: parking_lot::Mutex::new(FeedStatus::Stopped),
        }
    }

    /// 알림 권한 요청. 플랫폼 에러는 거부로 취급한다.
    pub async fn request_permission(&self) -> bool {
        let granted = match self.ports.notifier.request_permission().await {
            Ok(permission) => {
                info!("알림 권한: {permission:?}");
                permission.is_granted()
            }
            Err(e) => {
                warn!("알림 권한 요청 실패: {e}");
                false
            }
        };

        self.state.write().await.permission_granted = granted;
        granted
    }

    /// 주문 수 모니터링 시작
    ///
    /// 이미 구독 중이면 기존 구독을 해제한 뒤 다시 구독한다.
    /// 주문 수 처리(저장, 배지)와 알림 표시는 별도 태스크에서 돌아
    /// 알림 표시가 멈춰도 주문 수는 계속 갱신된다.
    pub async fn start_monitoring(self: &Arc<Self>) -> Result<(), CoreError> {
        self.stop_monitoring();

        let last = load_last_order_count(self.ports.store.as_ref()).await;
        self.state.write().await.last_order_count = last;

        let subscription = self.ports.feed.subscribe(&StatusFilter::actionable()).await?;
        let (mut updates, teardown) = subscription.into_parts();

        let (alert_tx, mut alert_rx) = mpsc::channel::<u64>(ALERT_QUEUE);
        let alert_manager = Arc::downgrade(self);
        let alerts = tokio::spawn(async move {
            while let Some(delta) = alert_rx.recv().await {
                let Some(manager) = alert_manager.upgrade() else {
                    return;
                };
                manager.notify_new_orders(delta).await;
            }
        });

        let manager = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            while let Some(event) = updates.recv().await {
                let Some(manager) = manager.upgrade() else {
                    return;
                };
                manager.handle_feed_event(event, &alert_tx).await;
            }
            warn!("주문 피드가 닫혔습니다. 모니터링 종료");
            if let Some(manager) = Weak::upgrade(&manager) {
                manager.set_feed_status(FeedStatus::Stopped);
            }
        });

        let replaced = self
            .active
            .lock()
            .replace(ActiveSubscription {
                task,
                alerts,
                teardown,
            });
        if let Some(previous) = replaced {
            previous.shutdown();
        }

        info!("주문 모니터링 시작 (기준값 {last})");
        Ok(())
    }

    /// 주문 수 모니터링 중지. 구독이 없으면 아무것도 하지 않는다.
    pub fn stop_monitoring(&self) {
        let active = self.active.lock().take();
        if let Some(active) = active {
            active.shutdown();
            self.set_feed_status(FeedStatus::Stopped);
            info!("주문 모니터링 중지");
        }
    }

    /// 알림 표시
    ///
    /// 권한이 없으면 아무것도 하지 않는다. 표시 실패와 알림음 재생 실패는
    /// 로그만 남긴다.
    pub async fn notify(&self, title: &str, options: NotificationOptions) {
        let (granted, sound_enabled) = {
            let state = self.state.read().await;
            (state.permission_granted, state.sound_enabled)
        };
        if !granted {
            debug!("알림 권한 없음, 생략: {title}");
            return;
        }

        let notification = build_notification(&self.config, title, options);

        match self.ports.notifier.show(&notification).await {
            Ok(shown) => {
                debug!("알림 표시: {} (id {})", notification.title, shown.id);
                self.watch_activation(shown, notification.url.clone());
            }
            Err(e) => warn!("알림 표시 실패: {e}"),
        }

        if sound_enabled {
            let player = Arc::clone(&self.ports.player);
            let volume = self.config.sound_volume;
            tokio::spawn(async move {
                if let Err(e) = player.play(volume).await {
                    warn!("알림음 재생 실패: {e}");
                }
            });
        }
    }

    /// 알림음 켜기/끄기. 다음 알림부터 적용되고 저장소에 남는다.
    pub async fn toggle_sound(&self, enabled: bool) {
        self.state.write().await.sound_enabled = enabled;

        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.ports.store.set(SOUND_ENABLED_KEY, value).await {
            warn!("알림음 설정 저장 실패: {e}");
        }
        info!("알림음 {}", if enabled { "켜짐" } else { "꺼짐" });
    }

    pub fn is_monitoring(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    pub async fn last_order_count(&self) -> u64 {
        self.state.read().await.last_order_count
    }

    pub async fn sound_enabled(&self) -> bool {
        self.state.read().await.sound_enabled
    }

    pub async fn permission_granted(&self) -> bool {
        self.state.read().await.permission_granted
    }

    pub fn feed_status(&self) -> FeedStatus {
        *self.feed_status.lock()
    }

    async fn handle_feed_event(&self, event: FeedEvent, alerts: &mpsc::Sender<u64>) {
        match event {
            FeedEvent::Count(current) => {
                self.set_feed_status(FeedStatus::Live);
                self.handle_count(current, alerts).await;
            }
            FeedEvent::Error(message) => {
                // 배지는 마지막 값 유지
                warn!("주문 피드 에러, 재연결 대기: {message}");
                self.set_feed_status(FeedStatus::Degraded);
            }
        }
    }

    async fn handle_count(&self, current: u64, alerts: &mpsc::Sender<u64>) {
        let delta = {
            let mut state = self.state.write().await;
            let last = state.last_order_count;
            state.last_order_count = current;
            new_orders_since(last, current)
        };
        debug!("주문 수 업데이트: {current}");

        if let Some(delta) = delta {
            info!("새 주문 {delta}건 (총 {current}건)");
            self.events.publish(AppEvent::NewOrders {
                delta,
                total: current,
            });
            if let Err(e) = alerts.try_send(delta) {
                warn!("새 주문 알림 생략 ({delta}건): {e}");
            }
        }

        if let Err(e) = self
            .ports
            .store
            .set(LAST_ORDER_COUNT_KEY, &current.to_string())
            .await
        {
            warn!("마지막 주문 수 저장 실패: {e}");
        }

        self.ports.badge.set_count(current);
    }

    async fn notify_new_orders(&self, delta: u64) {
        let options = NotificationOptions::default()
            .with_body(new_order_message(delta))
            .with_tag(NEW_ORDER_TAG)
            .with_require_interaction(true);
        self.notify(NEW_ORDER_TITLE, options).await;
    }

    /// 클릭 시: 창 포커스 → URL 이동 → 알림 닫기
    fn watch_activation(&self, shown: ShownNotification, url: Option<String>) {
        let window = Arc::clone(&self.ports.window);
        let notifier = Arc::clone(&self.ports.notifier);
        let ShownNotification { id, activated } = shown;

        tokio::spawn(async move {
            if activated.await.is_err() {
                return;
            }
            debug!("알림 클릭: id {id}");

            if let Err(e) = window.focus().await {
                warn!("창 포커스 실패: {e}");
            }
            if let Some(url) = url {
                if let Err(e) = window.navigate(&url).await {
                    warn!("이동 실패 ({url}): {e}");
                }
            }
            if let Err(e) = notifier.close(id).await {
                debug!("알림 닫기 실패: {e}");
            }
        });
    }

    fn set_feed_status(&self, status: FeedStatus) {
        let changed = {
            let mut current = self.feed_status.lock();
            let changed = *current != status;
            *current = status;
            changed
        };
        if changed {
            self.events.publish(AppEvent::FeedStatusChanged(status));
        }
    }
}

/// 새 주문 수 계산. 기준값이 0이면 알리지 않는다.
pub fn new_orders_since(last: u64, current: u64) -> Option<u64> {
    if last > 0 && current > last {
        Some(current - last)
    } else {
        None
    }
}

/// 설정 기본값 위에 호출자 옵션을 덮어써 최종 알림 구성
fn build_notification(
    config: &NotificationConfig,
    title: &str,
    options: NotificationOptions,
) -> Notification {
    Notification {
        title: title.to_string(),
        body: options.body.unwrap_or_default(),
        tag: options.tag.unwrap_or_else(|| config.default_tag.clone()),
        icon: options.icon.unwrap_or_else(|| config.icon.clone()),
        badge_icon: options
            .badge_icon
            .unwrap_or_else(|| config.badge_icon.clone()),
        vibration_pattern: options
            .vibration_pattern
            .unwrap_or_else(|| config.vibration_pattern.clone()),
        require_interaction: options.require_interaction.unwrap_or(false),
        url: options.url,
    }
}

async fn load_last_order_count(store: &dyn KeyValueStore) -> u64 {
    match store.get(LAST_ORDER_COUNT_KEY).await {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("저장된 주문 수를 해석할 수 없음: {raw:?}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            warn!("마지막 주문 수 로드 실패: {e}");
            0
        }
    }
}

async fn load_sound_enabled(store: &dyn KeyValueStore) -> bool {
    match store.get(SOUND_ENABLED_KEY).await {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or(true),
        Ok(None) => true,
        Err(e) => {
            warn!("알림음 설정 로드 실패: {e}");
            true
        }
    }
}
