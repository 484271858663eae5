use crate::config::IdleConfig;

use super::transform::Placement;

/// 待機アニメーション
///
/// 追跡で得た配置の上に、時刻だけを入力とする微小な縦揺れと
/// 左右スイングを毎フレーム重ねる。積分しないので蓄積もドリフトもせず、
/// 振幅で常に有界。
pub struct IdleMotion {
    bob_amplitude: f32,
    bob_frequency: f32,
    sway_amplitude: f32,
    sway_frequency: f32,
}

impl IdleMotion {
    pub fn new(bob_amplitude: f32, bob_frequency: f32, sway_amplitude: f32, sway_frequency: f32) -> Self {
        Self {
            bob_amplitude,
            bob_frequency,
            sway_amplitude,
            sway_frequency,
        }
    }

    pub fn from_config(config: &IdleConfig) -> Self {
        Self::new(
            config.bob_amplitude,
            config.bob_frequency,
            config.sway_amplitude,
            config.sway_frequency,
        )
    }

    /// t_secs: 単調クロックの秒
    pub fn apply(&self, base: Placement, t_secs: f32) -> Placement {
        let mut p = base;
        p.position[1] += (self.bob_frequency * t_secs).sin() * self.bob_amplitude;
        p.yaw = (self.sway_frequency * t_secs).sin() * self.sway_amplitude;
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Placement {
        Placement {
            position: [0.0, 0.3, -0.5],
            scale: 0.3,
            yaw: 0.0,
        }
    }

    fn default_idle() -> IdleMotion {
        IdleMotion::from_config(&IdleConfig::default())
    }

    #[test]
    fn test_bob_bounded() {
        let idle = default_idle();
        for i in 0..1000 {
            let t = i as f32 * 0.137;
            let p = idle.apply(base(), t);
            let offset = p.position[1] - 0.3;
            assert!(offset.abs() <= 0.001 + 1e-7, "t={}: offset={}", t, offset);
        }
    }

    #[test]
    fn test_sway_bounded() {
        let idle = default_idle();
        for i in 0..1000 {
            let t = i as f32 * 0.137;
            let p = idle.apply(base(), t);
            assert!(p.yaw.abs() <= 0.1 + 1e-7, "t={}: yaw={}", t, p.yaw);
        }
    }

    #[test]
    fn test_same_time_same_output() {
        let idle = default_idle();
        let a = idle.apply(base(), 12.34);
        let b = idle.apply(base(), 12.34);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_accumulation() {
        // 同じtで何度適用しても基準位置からの差は変わらない
        let idle = default_idle();
        let mut p = base();
        for _ in 0..100 {
            p = idle.apply(base(), 5.0);
        }
        let single = idle.apply(base(), 5.0);
        assert_eq!(p, single);
    }

    #[test]
    fn test_position_xz_and_scale_untouched() {
        let idle = default_idle();
        let p = idle.apply(base(), 3.3);
        assert_eq!(p.position[0], 0.0);
        assert_eq!(p.position[2], -0.5);
        assert_eq!(p.scale, 0.3);
    }

    #[test]
    fn test_known_phase() {
        // t = pi/4 (bob_frequency=2): sin(pi/2) = 1 で縦揺れが最大
        let idle = default_idle();
        let t = std::f32::consts::FRAC_PI_4;
        let p = idle.apply(base(), t);
        assert!((p.position[1] - (0.3 + 0.001)).abs() < 1e-6);
        assert!((p.yaw - t.sin() * 0.1).abs() < 1e-6);
    }
}
