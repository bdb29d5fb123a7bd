//! 알림음 재생 어댑터.
//!
//! `audio` 기능이 켜진 빌드는 rodio로 내장 클립을 재생한다.
//! 꺼진 빌드는 재생 요청을 기록만 한다.

use async_trait::async_trait;
use shopdesk_core::error::CoreError;
use shopdesk_core::ports::audio::AlertPlayer;
use tracing::debug;

/// 내장 알림음 (22.05kHz mono WAV, 약 0.3초)
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
static ALERT_WAV: &[u8] = include_bytes!("../assets/alert.wav");

/// 내장 알림음 재생기 — `AlertPlayer` 포트 구현
#[derive(Debug, Default)]
pub struct EmbeddedAlertPlayer;

impl EmbeddedAlertPlayer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertPlayer for EmbeddedAlertPlayer {
    async fn play(&self, volume: f32) -> Result<(), CoreError> {
        let volume = volume.clamp(0.0, 1.0);
        debug!("알림음 재생: volume={volume:.2}");

        // 출력 스트림은 Send가 아니므로 blocking 스레드에서 재생을 끝까지 마친다
        tokio::task::spawn_blocking(move || play_blocking(volume))
            .await
            .map_err(|e| CoreError::Playback(format!("재생 태스크 실패: {e}")))?
    }
}

#[cfg(feature = "audio")]
fn play_blocking(volume: f32) -> Result<(), CoreError> {
    use rodio::{Decoder, OutputStream, Sink};
    use std::io::Cursor;

    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| CoreError::Playback(format!("오디오 출력 장치 없음: {e}")))?;
    let sink =
        Sink::try_new(&handle).map_err(|e| CoreError::Playback(format!("싱크 생성 실패: {e}")))?;
    let source = Decoder::new(Cursor::new(ALERT_WAV))
        .map_err(|e| CoreError::Playback(format!("알림음 디코딩 실패: {e}")))?;

    sink.set_volume(volume);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(not(feature = "audio"))]
fn play_blocking(volume: f32) -> Result<(), CoreError> {
    debug!("오디오 기능 없이 빌드됨, 알림음 생략 (volume={volume:.2})");
    Ok(())
}
