use anyhow::{bail, Context, Result};
use std::path::Path;

/// 軸平行バウンディングボックス
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f32; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;
        for p in iter {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// 8頂点（ワイヤーフレーム描画用）
    pub fn corners(&self) -> [[f32; 3]; 8] {
        let (n, x) = (self.min, self.max);
        [
            [n[0], n[1], n[2]],
            [x[0], n[1], n[2]],
            [x[0], x[1], n[2]],
            [n[0], x[1], n[2]],
            [n[0], n[1], x[2]],
            [x[0], n[1], x[2]],
            [x[0], x[1], x[2]],
            [n[0], x[1], x[2]],
        ]
    }
}

/// 読み込んだキャラクターモデル
///
/// GPUレンダラは持たないので、保持するのは全プリミティブを結合した
/// 頂点位置とバウンディングボックスのみ。プレビューはAABBのワイヤー
/// フレーム投影で描く。
#[derive(Debug, Clone)]
pub struct CharacterModel {
    pub positions: Vec<[f32; 3]>,
    pub bounds: Aabb,
}

/// glTF/GLBファイルからキャラクターモデルを読み込む
pub fn load_character_model(path: &Path) -> Result<CharacterModel> {
    let (doc, buffers, _images) = gltf::import(path)
        .with_context(|| format!("Failed to import glTF model: {}", path.display()))?;

    let mut positions: Vec<[f32; 3]> = Vec::new();

    for mesh in doc.meshes() {
        for prim in mesh.primitives() {
            let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            if let Some(iter) = reader.read_positions() {
                positions.extend(iter);
            }
        }
    }

    if positions.is_empty() {
        bail!("no geometry found in {}", path.display());
    }

    // positionsが非空なのでfrom_pointsは必ずSome
    let bounds = Aabb::from_points(positions.iter())
        .context("failed to compute model bounds")?;

    Ok(CharacterModel { positions, bounds })
}
