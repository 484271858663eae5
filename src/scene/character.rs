use crate::placement::Placement;

/// シーン内のキャラクターノード
///
/// 毎フレーム配置を書き込むだけの可変ハンドル。変換側から読み返される
/// ことはない。肩が見えないフレームでは書き込みが起きず、最後に追跡
/// できた配置を保持し続ける。
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterNode {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub yaw: f32,
}

impl CharacterNode {
    /// 原点・等倍で作成
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            yaw: 0.0,
        }
    }

    /// 配置をノードに書き込む（スケールは3軸等方）
    pub fn apply(&mut self, placement: &Placement) {
        self.position = placement.position;
        self.scale = [placement.scale, placement.scale, placement.scale];
        self.yaw = placement.yaw;
    }
}

impl Default for CharacterNode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_identity() {
        let node = CharacterNode::new();
        assert_eq!(node.position, [0.0, 0.0, 0.0]);
        assert_eq!(node.scale, [1.0, 1.0, 1.0]);
        assert_eq!(node.yaw, 0.0);
    }

    #[test]
    fn test_apply_writes_all_fields() {
        let mut node = CharacterNode::new();
        let p = Placement {
            position: [0.1, 0.7, -0.5],
            scale: 0.9,
            yaw: 0.05,
        };
        node.apply(&p);
        assert_eq!(node.position, [0.1, 0.7, -0.5]);
        assert_eq!(node.scale, [0.9, 0.9, 0.9]);
        assert_eq!(node.yaw, 0.05);
    }
}
