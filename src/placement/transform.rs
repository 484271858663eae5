use crate::config::PlacementConfig;
use crate::pose::{LandmarkIndex, LandmarkSet};

/// キャラクターの空間配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// シーン座標 (x右, y上, カメラ原点, 前方が-z)
    pub position: [f32; 3],
    /// 等方スケール
    pub scale: f32,
    /// Y軸回転（ラジアン）
    pub yaw: f32,
}

/// 肩ランドマーク → キャラクター配置の変換
///
/// フレーム座標（左上原点、下向き正）を中心原点・Y上向きの単位正方形へ
/// 写像し、肩中心の少し上・固定深度にキャラクターを置く。スケールは
/// 見かけの肩幅に比例させて遠近の代わりにする。
pub struct PlacementMapper {
    head_offset: f32,
    depth: f32,
    scale_factor: f32,
    mirror_x: bool,
    visibility_threshold: f32,
}

impl PlacementMapper {
    pub fn new(config: &PlacementConfig, mirror_x: bool, visibility_threshold: f32) -> Self {
        Self {
            head_offset: config.head_offset,
            depth: config.depth,
            scale_factor: config.scale_factor,
            mirror_x,
            visibility_threshold,
        }
    }

    /// 肩ランドマークから配置を計算
    ///
    /// 両肩のどちらかが可視度閾値未満なら None（このフレームは追跡なし。
    /// エラーではなく、呼び出し側は前回の配置を保持する）。
    pub fn compute(&self, set: &LandmarkSet) -> Option<Placement> {
        let ls = set.get(LandmarkIndex::LeftShoulder);
        let rs = set.get(LandmarkIndex::RightShoulder);

        if !ls.is_valid(self.visibility_threshold) || !rs.is_valid(self.visibility_threshold) {
            return None;
        }

        // 肩の中心と見かけの肩幅
        let center_x = (ls.x + rs.x) / 2.0;
        let center_y = (ls.y + rs.y) / 2.0;
        let shoulder_width = (ls.x - rs.x).abs();

        // フレーム座標 [0,1] → 中心原点・Y反転の単位正方形
        let mut x = (center_x - 0.5) * 2.0;
        if self.mirror_x {
            x = -x;
        }
        let y = -(center_y - 0.5) * 2.0;

        Some(Placement {
            // 肩中心から頭上へ持ち上げ、固定深度に置く
            position: [x, y + self.head_offset, self.depth],
            // 近い被写体ほど肩幅が広く映る → スケール大
            scale: shoulder_width * self.scale_factor,
            yaw: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;

    fn mapper() -> PlacementMapper {
        PlacementMapper::new(&PlacementConfig::default(), false, 0.5)
    }

    fn shoulders(ls: (f32, f32), rs: (f32, f32)) -> LandmarkSet {
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        landmarks[LandmarkIndex::LeftShoulder as usize] = Landmark::new(ls.0, ls.1, 0.9);
        landmarks[LandmarkIndex::RightShoulder as usize] = Landmark::new(rs.0, rs.1, 0.9);
        LandmarkSet::new(landmarks)
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_centered_shoulders() {
        // 肩中心 (0.5, 0.5), 肩幅 0.2
        let set = shoulders((0.4, 0.5), (0.6, 0.5));
        let p = mapper().compute(&set).unwrap();
        assert!(approx_eq(p.position[0], 0.0));
        assert!(approx_eq(p.position[1], 0.3));
        assert!(approx_eq(p.position[2], -0.5));
        assert!(approx_eq(p.scale, 0.3));
        assert!(approx_eq(p.yaw, 0.0));
    }

    #[test]
    fn test_upper_frame_shoulders() {
        // 肩中心 (0.5, 0.3): フレーム上方 → シーン座標では上 (y正)
        let set = shoulders((0.2, 0.3), (0.8, 0.3));
        let p = mapper().compute(&set).unwrap();
        assert!(approx_eq(p.position[0], 0.0));
        // y = -(0.3 - 0.5) * 2 = 0.4, +head_offset 0.3
        assert!(approx_eq(p.position[1], 0.7));
        assert!(approx_eq(p.position[2], -0.5));
        assert!(approx_eq(p.scale, 0.9));
    }

    #[test]
    fn test_scale_non_negative() {
        for &(lx, rx) in &[(0.4, 0.6), (0.6, 0.4), (0.5, 0.5), (0.0, 1.0)] {
            let set = shoulders((lx, 0.5), (rx, 0.5));
            let p = mapper().compute(&set).unwrap();
            assert!(p.scale >= 0.0, "scale={} for lx={}, rx={}", p.scale, lx, rx);
        }
    }

    #[test]
    fn test_swap_invariance() {
        // 左右の値を入れ替えても中心と肩幅は不変
        let a = mapper().compute(&shoulders((0.4, 0.5), (0.6, 0.4))).unwrap();
        let b = mapper().compute(&shoulders((0.6, 0.4), (0.4, 0.5))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_left_shoulder() {
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        landmarks[LandmarkIndex::RightShoulder as usize] = Landmark::new(0.6, 0.5, 0.9);
        let set = LandmarkSet::new(landmarks);
        assert!(mapper().compute(&set).is_none());
    }

    #[test]
    fn test_low_visibility_shoulder() {
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        landmarks[LandmarkIndex::LeftShoulder as usize] = Landmark::new(0.4, 0.5, 0.4);
        landmarks[LandmarkIndex::RightShoulder as usize] = Landmark::new(0.6, 0.5, 0.9);
        let set = LandmarkSet::new(landmarks);
        // 閾値 0.5 未満の肩は欠落扱い
        assert!(mapper().compute(&set).is_none());
    }

    #[test]
    fn test_idempotent() {
        let set = shoulders((0.35, 0.45), (0.65, 0.55));
        let m = mapper();
        let a = m.compute(&set).unwrap();
        let b = m.compute(&set).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_output_finite() {
        let set = shoulders((0.0, 0.0), (1.0, 1.0));
        let p = mapper().compute(&set).unwrap();
        assert!(p.position.iter().all(|v| v.is_finite()));
        assert!(p.scale.is_finite());
    }

    #[test]
    fn test_mirror_x() {
        let config = PlacementConfig::default();
        let m = PlacementMapper::new(&config, true, 0.5);
        // 肩中心 x=0.6 → 通常 0.2, ミラーで -0.2
        let set = shoulders((0.5, 0.5), (0.7, 0.5));
        let p = m.compute(&set).unwrap();
        assert!(approx_eq(p.position[0], -0.2));
        // yとスケールはミラーの影響を受けない
        assert!(approx_eq(p.position[1], 0.3));
        assert!(approx_eq(p.scale, 0.3));
    }
}
