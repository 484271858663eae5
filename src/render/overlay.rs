use crate::pose::LandmarkIndex;
use crate::scene::{Aabb, CharacterNode};

/// デバッグ表示用の骨格接続（上半身中心のサブセット）
pub const SKELETON_CONNECTIONS: [(LandmarkIndex, LandmarkIndex); 13] = [
    // 顔
    (LandmarkIndex::Nose, LandmarkIndex::LeftEyeInner),
    (LandmarkIndex::Nose, LandmarkIndex::RightEyeInner),
    (LandmarkIndex::LeftEyeOuter, LandmarkIndex::LeftEar),
    (LandmarkIndex::RightEyeOuter, LandmarkIndex::RightEar),
    (LandmarkIndex::MouthLeft, LandmarkIndex::MouthRight),
    // 腕
    (LandmarkIndex::LeftShoulder, LandmarkIndex::LeftElbow),
    (LandmarkIndex::LeftElbow, LandmarkIndex::LeftWrist),
    (LandmarkIndex::RightShoulder, LandmarkIndex::RightElbow),
    (LandmarkIndex::RightElbow, LandmarkIndex::RightWrist),
    // 胴体
    (LandmarkIndex::LeftShoulder, LandmarkIndex::RightShoulder),
    (LandmarkIndex::LeftShoulder, LandmarkIndex::LeftHip),
    (LandmarkIndex::RightShoulder, LandmarkIndex::RightHip),
    (LandmarkIndex::LeftHip, LandmarkIndex::RightHip),
];

/// ランドマークの色 (RGB)
pub const LANDMARK_COLOR: u32 = 0x00FF00;

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0xFFFF00;

/// 可視度が低いランドマークの色 (RGB)
pub const LOW_VISIBILITY_COLOR: u32 = 0xFF0000;

/// キャラクターワイヤーフレームの色 (RGB)
pub const CHARACTER_COLOR: u32 = 0x00C8FF;

/// 仮想カメラの垂直FOV（度）
pub const FOV_V_DEG: f32 = 75.0;

/// AABBの12辺（corners()のインデックスペア）
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0), // 手前の面
    (4, 5), (5, 6), (6, 7), (7, 4), // 奥の面
    (0, 4), (1, 5), (2, 6), (3, 7), // 側面
];

/// シーン座標をウィンドウピクセルへピンホール投影
///
/// シーン座標: x右, y上, カメラ原点, 前方が-z。
/// 近接面より手前の点と、ビューポートから大きく外れた点は None
/// （はみ出した座標でBresenhamを走らせない）。
pub fn project_point(p: [f32; 3], width: usize, height: usize) -> Option<(i32, i32)> {
    if p[2] >= -0.01 {
        return None;
    }

    let focal = (height as f32 / 2.0) / (FOV_V_DEG.to_radians() / 2.0).tan();
    let inv_depth = 1.0 / -p[2];
    let px = width as f32 / 2.0 + p[0] * focal * inv_depth;
    let py = height as f32 / 2.0 - p[1] * focal * inv_depth;

    // 4ビューポート分までは線のクリッピングに任せる
    if px.abs() > width as f32 * 4.0 || py.abs() > height as f32 * 4.0 {
        return None;
    }

    Some((px as i32, py as i32))
}

/// ノードの変換（スケール → ヨー回転 → 平行移動）を適用したAABB頂点
pub fn transformed_corners(bounds: &Aabb, node: &CharacterNode) -> [[f32; 3]; 8] {
    let (sin_y, cos_y) = node.yaw.sin_cos();
    let mut out = [[0.0; 3]; 8];
    for (dst, corner) in out.iter_mut().zip(bounds.corners().iter()) {
        let x = corner[0] * node.scale[0];
        let y = corner[1] * node.scale[1];
        let z = corner[2] * node.scale[2];
        // Y軸回転
        let xr = x * cos_y + z * sin_y;
        let zr = -x * sin_y + z * cos_y;
        *dst = [
            xr + node.position[0],
            y + node.position[1],
            zr + node.position[2],
        ];
    }
    out
}
