use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::config::CameraConfig;

/// OpenCVを使用したウェブカメラキャプチャ
pub struct Camera {
    capture: VideoCapture,
    width: u32,
    height: u32,
}

impl Camera {
    /// 設定どおりにカメラを開く
    ///
    /// 解像度・FPSは要求値であり、デバイスが近い値に丸めることがある。
    /// 実際の解像度は resolution() で取得する。
    pub fn open(config: &CameraConfig) -> Result<Self> {
        let mut capture = VideoCapture::new(config.index, VideoCaptureAPIs::CAP_ANY as i32)
            .context("Failed to open camera — check that it is connected and access is allowed")?;

        if !capture.is_opened()? {
            anyhow::bail!(
                "Camera {} is not available — close other apps using it and retry",
                config.index
            );
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.height as f64)?;
        capture.set(videoio::CAP_PROP_FPS, config.fps as f64)?;
        // 古いフレームを溜めない
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        Ok(Self {
            capture,
            width,
            height,
        })
    }

    /// 実際の解像度
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式）
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        Ok(frame)
    }
}

/// 別スレッドでキャプチャを回し、常に最新フレームだけを提供する
///
/// 推論がフレームレートより遅くてもキャプチャ側は止まらない。
pub struct ThreadedCamera {
    latest: Arc<Mutex<Option<Mat>>>,
    frame_id: Arc<AtomicU64>,
    width: u32,
    height: u32,
    _handle: thread::JoinHandle<()>,
}

impl ThreadedCamera {
    pub fn start(config: &CameraConfig) -> Result<Self> {
        let mut camera = Camera::open(config)?;
        let (width, height) = camera.resolution();
        let latest = Arc::new(Mutex::new(None::<Mat>));
        let latest_ref = latest.clone();
        let frame_id = Arc::new(AtomicU64::new(0));
        let frame_id_ref = frame_id.clone();

        let handle = thread::spawn(move || loop {
            if let Ok(frame) = camera.read_frame() {
                *latest_ref.lock().unwrap() = Some(frame);
                frame_id_ref.fetch_add(1, Ordering::Release);
            }
        });

        Ok(Self {
            latest,
            frame_id,
            width,
            height,
            _handle: handle,
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 現在のフレームID。新フレームが到着するたびにインクリメントされる。
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }

    /// 最新フレームを取得。初回フレーム到着前のみNone。
    pub fn latest_frame(&self) -> Option<Mat> {
        let guard = self.latest.lock().unwrap();
        guard.as_ref().map(|m| m.clone())
    }
}
