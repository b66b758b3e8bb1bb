// 盤面定数・フレーム定数とユーティリティ型定義

use nohash_hasher::BuildNoHashHasher;

/// ====== 盤面定数 ======
pub const W: usize = 6; // 可視列数
pub const H: usize = 12; // 可視段数
pub const H_AIR: usize = 14; // 14段目まで置ける（13,14段目は画面外）
pub const MAP_W: usize = W + 2; // 番兵込み
pub const MAP_H: usize = H_AIR + 2;

/// 同色この個数以上つながると消える
pub const ERASE_NUM: usize = 4;

/// 組ぷよの出現位置
pub const SPAWN_X: usize = 3;
pub const SPAWN_Y: usize = 12;

/// 窒息点
pub const DEATH_X: usize = 3;
pub const DEATH_Y: usize = 12;

/// ====== 操作フレーム ======
pub const FRAMES_CONTINUOUS_TURN_PROHIBITED: u8 = 1;
pub const FRAMES_CONTINUOUS_ARROW_PROHIBITED: u8 = 1;
pub const FRAMES_QUICKTURN: u8 = 20;
pub const FRAMES_FREE_FALL: u8 = 16;
/// 接地してから固定されるまでの猶予
pub const FRAMES_GROUNDING_GRACE: u8 = 32;
/// 接地回数の上限（これに達すると即固定）
pub const MAX_GROUNDING_COUNT: u8 = 8;

/// ====== 連鎖アニメーション（目安） ======
pub const FRAMES_VANISH_ANIMATION: u32 = 50;
pub const FRAMES_GROUNDING: u32 = 16;
/// 連鎖後の落下にかかるフレーム（落下段数で引く）
pub const FRAMES_TO_DROP_FAST: [u32; H_AIR + 1] =
    [0, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36];
/// 下キーを押しっぱなしにしたときの落下フレーム
pub const FRAMES_TO_DROP: [u32; H_AIR + 1] =
    [0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28];
/// 出現位置から横移動にかかるフレーム（移動列数で引く）
pub const FRAMES_TO_MOVE_HORIZONTALLY: [u32; 4] = [0, 2, 4, 6];

// u64 キー専用のノーハッシュ（高速化）
pub type U64Map<V> = std::collections::HashMap<u64, V, BuildNoHashHasher<u64>>;
