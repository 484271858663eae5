use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

use katanori::camera::ThreadedCamera;
use katanori::config::Config;
use katanori::pose::{preprocess_frame, Detection, OnnxLandmarkDetector};
use katanori::render::PreviewWindow;
use katanori::scene::load_character_model;
use katanori::session::{FrameStatus, MonotonicClock, SessionContext};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("katanori {} - shoulder AR", env!("GIT_VERSION"));
    println!("Camera: index={} {}x{}", config.camera.index, config.camera.width, config.camera.height);
    println!("Model: {}", config.detector.model_path);
    println!("Character: {}", config.character.model_path);
    println!("Mirror: {}  Smooth: {}  Debug landmarks: {}",
        if config.app.mirror { "ON" } else { "OFF" },
        if config.detector.smooth_landmarks { "ON" } else { "OFF" },
        if config.debug.landmarks { "ON" } else { "OFF" });
    println!();
    println!("操作: [Esc] 終了");
    println!();

    // 起動時の失敗はここで一度だけ報告して終了（リトライなし）
    let camera = ThreadedCamera::start(&config.camera)
        .context("Camera setup failed — grant camera access and make sure no other app is using it")?;
    let (width, height) = camera.resolution();
    println!("Camera ready: {}x{}", width, height);

    let mut detector = OnnxLandmarkDetector::from_config(&config.detector)
        .with_context(|| format!("Pose model load failed: {}", config.detector.model_path))?;
    println!("Pose model loaded");

    let model = load_character_model(Path::new(&config.character.model_path))
        .with_context(|| format!("Character model load failed: {}", config.character.model_path))?;
    println!("Character model loaded: {} vertices", model.positions.len());

    let mut window = PreviewWindow::new(
        "katanori",
        width as usize,
        height as usize,
        config.app.mirror,
    )?;

    let mut session = SessionContext::new(&config, MonotonicClock::new());

    let frame_duration = Duration::from_secs_f64(1.0 / config.app.target_fps as f64);

    // FPS計測
    let mut frame_count = 0u32;
    let mut inference_count = 0u32;
    let mut tracked_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut t_preprocess = 0.0f64;
    let mut t_inference = 0.0f64;
    let mut t_render = 0.0f64;

    // フレーム追跡
    let mut last_frame_id: u64 = 0;
    let mut current_frame = None;
    let mut last_detection = Detection::NoPerson;

    while window.is_open() {
        let loop_start = Instant::now();

        let frame_id = camera.frame_id();
        if frame_id != last_frame_id {
            // 新フレーム: 推論してセッションを更新
            let frame = match camera.latest_frame() {
                Some(f) => f,
                None => {
                    std::thread::sleep(Duration::from_millis(1));
                    continue;
                }
            };

            let t0 = Instant::now();
            let input = preprocess_frame(&frame)?;
            let t1 = Instant::now();
            let detection = detector.detect(input)?;
            let t2 = Instant::now();

            if session.apply_detection(&detection) == FrameStatus::Tracked {
                tracked_count += 1;
            }

            t_preprocess += (t1 - t0).as_secs_f64() * 1000.0;
            t_inference += (t2 - t1).as_secs_f64() * 1000.0;
            inference_count += 1;

            current_frame = Some(frame);
            last_detection = detection;
            last_frame_id = frame_id;
        }

        // 合成は毎イテレーション（フレーム未更新でも待機アニメーションは進む）
        if let Some(ref frame) = current_frame {
            let t3 = Instant::now();
            window.draw_frame(frame)?;
            if config.debug.landmarks {
                if let Some(set) = last_detection.landmarks() {
                    window.draw_landmarks(set, config.detector.min_tracking_confidence);
                }
            }
            window.draw_character(&model.bounds, &session.character);
            window.update()?;
            t_render += t3.elapsed().as_secs_f64() * 1000.0;
        }

        // ログ（1秒に1回）
        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            if inference_count > 0 {
                let n = inference_count as f64;
                println!(
                    "FPS: {:.1} (infer: {}, tracked: {}/{}) | preprocess {:.1}ms  inference {:.1}ms  render {:.1}ms",
                    frame_count as f32 / elapsed,
                    inference_count,
                    tracked_count,
                    inference_count,
                    t_preprocess / n,
                    t_inference / n,
                    t_render / frame_count as f64,
                );
            } else {
                println!("FPS: {:.1} (infer: 0)", frame_count as f32 / elapsed);
            }
            frame_count = 0;
            inference_count = 0;
            tracked_count = 0;
            fps_timer = Instant::now();
            t_preprocess = 0.0;
            t_inference = 0.0;
            t_render = 0.0;
        }

        // FPS上限制御（spin wait for precision）
        while loop_start.elapsed() < frame_duration {
            std::hint::spin_loop();
        }
    }

    println!("Shutting down...");
    Ok(())
}
