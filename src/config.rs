use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// アプリ全体の設定 (config.toml)
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub idle: IdleConfig,
    #[serde(default)]
    pub character: CharacterConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// メインループの上限FPS
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// 鏡像表示（自撮りミラー）
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// ランドマークモデル(ONNX)のパス
    #[serde(default = "default_detector_model")]
    pub model_path: String,
    /// 人物検出スコアの閾値
    #[serde(default = "default_confidence")]
    pub min_detection_confidence: f32,
    /// ランドマーク可視度の閾値
    #[serde(default = "default_confidence")]
    pub min_tracking_confidence: f32,
    /// ランドマークの時間方向平滑化
    #[serde(default = "default_smooth_landmarks")]
    pub smooth_landmarks: bool,
    /// 平滑化のEMA係数 (1.0で平滑化なし)
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlacementConfig {
    /// 肩中心から頭上へのYオフセット
    #[serde(default = "default_head_offset")]
    pub head_offset: f32,
    /// カメラ前方の固定深度（シーン座標、負が前方）
    #[serde(default = "default_depth")]
    pub depth: f32,
    /// 肩幅→スケールの係数
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdleConfig {
    /// 縦揺れの振幅（シーン座標）
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,
    /// 縦揺れの角速度（rad/s）
    #[serde(default = "default_bob_frequency")]
    pub bob_frequency: f32,
    /// 左右スイングの振幅（ラジアン）
    #[serde(default = "default_sway_amplitude")]
    pub sway_amplitude: f32,
    /// 左右スイングの角速度（rad/s）
    #[serde(default = "default_sway_frequency")]
    pub sway_frequency: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CharacterConfig {
    /// キャラクターモデル(glTF/GLB)のパス
    #[serde(default = "default_character_model")]
    pub model_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DebugConfig {
    /// ランドマークと骨格のオーバーレイ表示
    #[serde(default)]
    pub landmarks: bool,
}

fn default_target_fps() -> u32 { 60 }
fn default_camera_width() -> u32 { 1280 }
fn default_camera_height() -> u32 { 720 }
fn default_camera_fps() -> u32 { 30 }
fn default_detector_model() -> String { "models/pose_landmark_full.onnx".to_string() }
fn default_confidence() -> f32 { 0.5 }
fn default_smooth_landmarks() -> bool { true }
fn default_smoothing_alpha() -> f32 { 0.5 }
fn default_head_offset() -> f32 { 0.3 }
fn default_depth() -> f32 { -0.5 }
fn default_scale_factor() -> f32 { 1.5 }
fn default_bob_amplitude() -> f32 { 0.001 }
fn default_bob_frequency() -> f32 { 2.0 }
fn default_sway_amplitude() -> f32 { 0.1 }
fn default_sway_frequency() -> f32 { 1.0 }
fn default_character_model() -> String { "models/character.glb".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            mirror: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: default_detector_model(),
            min_detection_confidence: default_confidence(),
            min_tracking_confidence: default_confidence(),
            smooth_landmarks: default_smooth_landmarks(),
            smoothing_alpha: default_smoothing_alpha(),
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            head_offset: default_head_offset(),
            depth: default_depth(),
            scale_factor: default_scale_factor(),
        }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            bob_amplitude: default_bob_amplitude(),
            bob_frequency: default_bob_frequency(),
            sway_amplitude: default_sway_amplitude(),
            sway_frequency: default_sway_frequency(),
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            model_path: default_character_model(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読み込みに失敗した場合はデフォルト設定を返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
