use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::detection::Detection;
use super::landmark::{Landmark, LandmarkIndex, LandmarkSet};
use super::preprocess::LANDMARK_INPUT_SIZE;
use crate::config::DetectorConfig;

/// BlazePose系ランドマークモデルを使用した人物姿勢検出器
///
/// 出力は33ランドマーク x (x, y, z, visibility, presence) の195要素と
/// 人物存在スコア。スコアが閾値未満のフレームは Detection::NoPerson。
pub struct OnnxLandmarkDetector {
    session: Session,
    min_detection_confidence: f32,
}

impl OnnxLandmarkDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P, min_detection_confidence: f32) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX landmark model")?;

        Ok(Self {
            session,
            min_detection_confidence,
        })
    }

    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        Self::new(&config.model_path, config.min_detection_confidence)
    }

    /// 前処理済みテンソルからランドマークを検出
    ///
    /// 入力: [1, 256, 256, 3] の f32 テンソル (0.0-1.0)
    /// 出力: Detection (33ランドマーク、または人物なし)
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Detection> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["input_1" => input_tensor])
            .context("Inference failed")?;

        // 人物存在スコア [1, 1]
        let score: ndarray::ArrayViewD<f32> = outputs["Identity_1"]
            .try_extract_array()
            .context("Failed to extract score tensor")?;
        if score[[0, 0]] < self.min_detection_confidence {
            return Ok(Detection::NoPerson);
        }

        // ランドマーク [1, 195] = 33 x (x, y, z, visibility, presence)
        // x, y は入力ピクセル単位なので 0-1 に正規化する
        let output: ndarray::ArrayViewD<f32> = outputs["Identity"]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;

        let scale = LANDMARK_INPUT_SIZE as f32;
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];

        for i in 0..LandmarkIndex::COUNT {
            let x = output[[0, i * 5]] / scale;
            let y = output[[0, i * 5 + 1]] / scale;
            let z = output[[0, i * 5 + 2]] / scale;
            let visibility = sigmoid(output[[0, i * 5 + 3]]);

            landmarks[i] = Landmark::new_3d(x, y, z, visibility);
        }

        Ok(Detection::Person(LandmarkSet::new(landmarks)))
    }
}

/// 可視度のロジットを 0-1 に変換
fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}
