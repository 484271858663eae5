use anyhow::{Context, Result};
use std::time::Instant;

use katanori::camera::Camera;
use katanori::config::Config;
use katanori::pose::{preprocess_frame, Detection, OnnxLandmarkDetector};
use katanori::render::PreviewWindow;

const CONFIG_PATH: &str = "config.toml";

/// ランドマーク確認用ビューア
///
/// キャラクターは出さず、カメラ映像と33ランドマークだけを表示する。
/// モデルとカメラの動作確認に使う。
fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Landmark Viewer");
    println!("Press ESC to exit");

    println!("Opening camera...");
    let mut camera = Camera::open(&config.camera)
        .context("Camera setup failed — grant camera access and make sure no other app is using it")?;
    let (width, height) = camera.resolution();
    println!("Camera resolution: {}x{}", width, height);

    println!("Loading model from {}...", config.detector.model_path);
    let mut detector = OnnxLandmarkDetector::from_config(&config.detector)?;
    println!("Model loaded");

    let mut window = PreviewWindow::new(
        "Landmark Viewer",
        width as usize,
        height as usize,
        config.app.mirror,
    )?;

    // FPS計測用
    let mut frame_count = 0u32;
    let mut person_count = 0u32;
    let mut fps_timer = Instant::now();

    while window.is_open() {
        let frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Frame capture error: {}", e);
                continue;
            }
        };

        let input = preprocess_frame(&frame)?;
        let detection = detector.detect(input)?;

        window.draw_frame(&frame)?;
        match &detection {
            Detection::Person(set) => {
                person_count += 1;
                window.draw_landmarks(set, config.detector.min_tracking_confidence);
            }
            Detection::NoPerson => {}
        }
        window.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let avg_visibility = detection
                .landmarks()
                .map(|set| set.average_visibility())
                .unwrap_or(0.0);
            println!(
                "FPS: {:.1}, person: {}/{}, avg visibility: {:.2}",
                frame_count as f32 / elapsed,
                person_count,
                frame_count,
                avg_visibility
            );
            frame_count = 0;
            person_count = 0;
            fps_timer = Instant::now();
        }
    }

    println!("Shutting down...");
    Ok(())
}
