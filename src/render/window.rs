use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

use crate::pose::LandmarkSet;
use crate::render::overlay::{
    project_point, transformed_corners, BOX_EDGES, CHARACTER_COLOR, LANDMARK_COLOR,
    LOW_VISIBILITY_COLOR, SKELETON_COLOR, SKELETON_CONNECTIONS,
};
use crate::scene::{Aabb, CharacterNode};

/// minifbを使用したプレビューウィンドウ
///
/// カメラ映像の上にキャラクターのワイヤーフレームとデバッグ用の
/// 骨格オーバーレイをソフトウェア描画で合成する。
pub struct PreviewWindow {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    mirror: bool,
}

impl PreviewWindow {
    pub fn new(title: &str, width: usize, height: usize, mirror: bool) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![0u32; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
            mirror,
        })
    }

    /// ウィンドウが開いているか（Escで閉じる）
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// ミラー表示を考慮したX座標
    fn map_x(&self, x: i32) -> i32 {
        if self.mirror {
            self.width as i32 - 1 - x
        } else {
            x
        }
    }

    /// BGR Mat をバッファにコピー
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<opencv::core::Vec3b>(y as i32, x as i32)?;
                // BGR -> RGB -> u32
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                let dx = self.map_x(x as i32) as usize;
                self.buffer[y * self.width + dx] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// ランドマークと骨格を描画（デバッグ用）
    pub fn draw_landmarks(&mut self, set: &LandmarkSet, visibility_threshold: f32) {
        let w = self.width as u32;
        let h = self.height as u32;

        for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
            let start = set.get(*start_idx);
            let end = set.get(*end_idx);

            if start.is_valid(visibility_threshold) && end.is_valid(visibility_threshold) {
                let (x1, y1) = start.to_pixel(w, h);
                let (x2, y2) = end.to_pixel(w, h);
                self.draw_line(self.map_x(x1), y1, self.map_x(x2), y2, SKELETON_COLOR);
            }
        }

        for lm in set.landmarks.iter() {
            let (px, py) = lm.to_pixel(w, h);
            let color = if lm.is_valid(visibility_threshold) {
                LANDMARK_COLOR
            } else {
                LOW_VISIBILITY_COLOR
            };
            self.draw_circle(self.map_x(px), py, 4, color);
        }
    }

    /// キャラクターをAABBワイヤーフレームとして投影描画
    ///
    /// シーン座標とミラーの整合は配置側で取っているため、ここでは
    /// 反転せずそのまま投影する。
    pub fn draw_character(&mut self, bounds: &Aabb, node: &CharacterNode) {
        let corners = transformed_corners(bounds, node);
        let projected: Vec<Option<(i32, i32)>> = corners
            .iter()
            .map(|&c| project_point(c, self.width, self.height))
            .collect();

        for (a, b) in BOX_EDGES.iter() {
            if let (Some((x1, y1)), Some((x2, y2))) = (projected[*a], projected[*b]) {
                self.draw_line(x1, y1, x2, y2, CHARACTER_COLOR);
            }
        }

        // アンカー（配置位置）の十字マーク
        if let Some((cx, cy)) = project_point(node.position, self.width, self.height) {
            self.draw_line(cx - 6, cy, cx + 6, cy, CHARACTER_COLOR);
            self.draw_line(cx, cy - 6, cx, cy + 6, CHARACTER_COLOR);
        }
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}
