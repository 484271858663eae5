use crate::config::DetectorConfig;

use super::landmark::{Landmark, LandmarkIndex, LandmarkSet};

/// ランドマーク列のEMA平滑化
///
/// MediaPipeのsmoothLandmarksに相当。座標(x, y, z)のみ平滑化し、
/// 可視度は当該フレームの値をそのまま通す。
pub struct LandmarkSmoother {
    alpha: f32,
    prev: Option<[Landmark; LandmarkIndex::COUNT]>,
}

impl LandmarkSmoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, prev: None }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.smoothing_alpha)
    }

    pub fn apply(&mut self, set: &LandmarkSet) -> LandmarkSet {
        let prev = match self.prev {
            Some(prev) => prev,
            None => {
                // 初回フレームはそのまま通す
                self.prev = Some(set.landmarks);
                return set.clone();
            }
        };

        let a = self.alpha;
        let mut smoothed = set.landmarks;
        for (lm, p) in smoothed.iter_mut().zip(prev.iter()) {
            lm.x = a * lm.x + (1.0 - a) * p.x;
            lm.y = a * lm.y + (1.0 - a) * p.y;
            lm.z = a * lm.z + (1.0 - a) * p.z;
        }

        self.prev = Some(smoothed);
        LandmarkSet::new(smoothed)
    }

    /// 追跡ロスト時に呼ぶ。次のapplyは初回フレーム扱いになる。
    pub fn reset(&mut self) {
        self.prev = None;
    }
}
