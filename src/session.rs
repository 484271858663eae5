use std::time::Instant;

use crate::config::Config;
use crate::placement::{IdleMotion, PlacementMapper};
use crate::pose::{Detection, LandmarkSmoother};
use crate::scene::CharacterNode;

/// 単調クロック（秒）
///
/// 待機アニメーションの位相に使う。テストでは固定クロックを注入する。
pub trait Clock {
    fn now_secs(&self) -> f32;
}

/// Instantベースの実クロック
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_secs(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// 1フレームの更新結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// 肩を追跡してノードを更新した
    Tracked,
    /// 人物なし、または肩の可視度不足。ノードは前回の配置のまま
    Lost,
}

/// セッションコンテキスト
///
/// フレームごとの更新に必要な状態を1つにまとめた入れ物。暗黙の共有可変
/// 状態を持たず、コラボレータはコンストラクタで注入する。
pub struct SessionContext<C: Clock> {
    smoother: LandmarkSmoother,
    smoothing_enabled: bool,
    mapper: PlacementMapper,
    idle: IdleMotion,
    clock: C,
    pub character: CharacterNode,
}

impl<C: Clock> SessionContext<C> {
    pub fn new(config: &Config, clock: C) -> Self {
        Self {
            smoother: LandmarkSmoother::from_config(&config.detector),
            smoothing_enabled: config.detector.smooth_landmarks,
            mapper: PlacementMapper::new(
                &config.placement,
                config.app.mirror,
                config.detector.min_tracking_confidence,
            ),
            idle: IdleMotion::from_config(&config.idle),
            clock,
            character: CharacterNode::new(),
        }
    }

    /// 検出結果を1フレーム分反映する
    ///
    /// 人物なしのフレームでは平滑化をリセットし、ノードには触れない。
    /// 肩の可視度不足も同様にノードを保持する（平滑化は人物が写って
    /// いる限り継続）。
    pub fn apply_detection(&mut self, detection: &Detection) -> FrameStatus {
        let set = match detection {
            Detection::Person(set) => set,
            Detection::NoPerson => {
                self.smoother.reset();
                return FrameStatus::Lost;
            }
        };

        let smoothed;
        let set = if self.smoothing_enabled {
            smoothed = self.smoother.apply(set);
            &smoothed
        } else {
            set
        };

        match self.mapper.compute(set) {
            Some(base) => {
                let placed = self.idle.apply(base, self.clock.now_secs());
                self.character.apply(&placed);
                FrameStatus::Tracked
            }
            None => FrameStatus::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LandmarkIndex, LandmarkSet};
    use std::cell::Cell;

    /// テスト用固定クロック
    struct FixedClock(Cell<f32>);

    impl FixedClock {
        fn new(t: f32) -> Self {
            Self(Cell::new(t))
        }

        fn set(&self, t: f32) {
            self.0.set(t);
        }
    }

    impl Clock for &FixedClock {
        fn now_secs(&self) -> f32 {
            self.0.get()
        }
    }

    fn person(ls: (f32, f32), rs: (f32, f32)) -> Detection {
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        landmarks[LandmarkIndex::LeftShoulder as usize] = Landmark::new(ls.0, ls.1, 0.9);
        landmarks[LandmarkIndex::RightShoulder as usize] = Landmark::new(rs.0, rs.1, 0.9);
        Detection::Person(LandmarkSet::new(landmarks))
    }

    fn no_smoothing_config() -> Config {
        let mut config = Config::default();
        config.detector.smooth_landmarks = false;
        config
    }

    #[test]
    fn test_tracked_frame_updates_node() {
        let clock = FixedClock::new(0.0);
        let mut session = SessionContext::new(&no_smoothing_config(), &clock);

        let status = session.apply_detection(&person((0.4, 0.5), (0.6, 0.5)));
        assert_eq!(status, FrameStatus::Tracked);
        // t=0: 待機アニメーションのオフセットはゼロ
        assert!((session.character.position[0]).abs() < 1e-6);
        assert!((session.character.position[1] - 0.3).abs() < 1e-6);
        assert!((session.character.position[2] + 0.5).abs() < 1e-6);
        assert!((session.character.scale[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_no_person_keeps_node() {
        let clock = FixedClock::new(0.0);
        let mut session = SessionContext::new(&no_smoothing_config(), &clock);

        session.apply_detection(&person((0.4, 0.5), (0.6, 0.5)));
        let before = session.character.clone();

        let status = session.apply_detection(&Detection::NoPerson);
        assert_eq!(status, FrameStatus::Lost);
        // ノードはビット単位で前回のまま
        assert_eq!(session.character, before);
    }

    #[test]
    fn test_invisible_shoulders_keep_node() {
        let clock = FixedClock::new(0.0);
        let mut session = SessionContext::new(&no_smoothing_config(), &clock);

        session.apply_detection(&person((0.4, 0.5), (0.6, 0.5)));
        let before = session.character.clone();

        // 人物は写っているが肩の可視度が閾値未満
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        landmarks[LandmarkIndex::LeftShoulder as usize] = Landmark::new(0.4, 0.5, 0.2);
        landmarks[LandmarkIndex::RightShoulder as usize] = Landmark::new(0.6, 0.5, 0.2);
        let status = session.apply_detection(&Detection::Person(LandmarkSet::new(landmarks)));

        assert_eq!(status, FrameStatus::Lost);
        assert_eq!(session.character, before);
    }

    #[test]
    fn test_idle_bob_bounded_over_time() {
        let clock = FixedClock::new(0.0);
        let mut session = SessionContext::new(&no_smoothing_config(), &clock);

        let detection = person((0.4, 0.5), (0.6, 0.5));
        for i in 0..200 {
            clock.set(i as f32 * 0.317);
            session.apply_detection(&detection);
            let offset = session.character.position[1] - 0.3;
            assert!(offset.abs() <= 0.001 + 1e-6);
            assert!(session.character.yaw.abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn test_smoother_resets_after_loss() {
        let clock = FixedClock::new(0.0);
        let mut config = Config::default();
        config.detector.smooth_landmarks = true;
        config.detector.smoothing_alpha = 0.5;
        let mut session = SessionContext::new(&config, &clock);

        session.apply_detection(&person((0.1, 0.5), (0.3, 0.5)));
        session.apply_detection(&Detection::NoPerson);

        // ロスト後の再検出は初回フレーム扱い。旧位置に引きずられない
        session.apply_detection(&person((0.6, 0.5), (0.8, 0.5)));
        // 肩中心 0.7 → x = (0.7 - 0.5) * 2 = 0.4
        assert!((session.character.position[0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_drags_between_frames() {
        let clock = FixedClock::new(0.0);
        let mut config = Config::default();
        config.detector.smooth_landmarks = true;
        config.detector.smoothing_alpha = 0.5;
        let mut session = SessionContext::new(&config, &clock);

        session.apply_detection(&person((0.1, 0.5), (0.3, 0.5)));
        session.apply_detection(&person((0.6, 0.5), (0.8, 0.5)));
        // EMA(0.5): 肩中心 0.2 → 0.45、x = (0.45 - 0.5) * 2 = -0.1
        assert!((session.character.position[0] + 0.1).abs() < 1e-6);
    }
}
