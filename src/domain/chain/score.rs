// 得点計算の係数表

use crate::constants::ERASE_NUM;

/// 連鎖ボーナス（n 連鎖目で引く、1連鎖目は 0）
const CHAIN_BONUS: [u32; 20] = [
    0, 0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 480, 512,
];

/// 連結ボーナス（1グループの個数で引く、11個以上は 10）
const LONG_BONUS: [u32; 12] = [0, 0, 0, 0, 0, 2, 3, 4, 5, 6, 7, 10];

/// 色数ボーナス
const COLOR_BONUS: [u32; 6] = [0, 0, 3, 6, 12, 24];

const MAX_COEF: u32 = 999;

#[inline]
pub fn chain_bonus(nth_chain: u32) -> u32 {
    CHAIN_BONUS[(nth_chain as usize).min(CHAIN_BONUS.len() - 1)]
}

#[inline]
pub fn long_bonus(group_size: usize) -> u32 {
    debug_assert!(group_size >= ERASE_NUM);
    LONG_BONUS[group_size.min(LONG_BONUS.len() - 1)]
}

#[inline]
pub fn color_bonus(num_colors: usize) -> u32 {
    COLOR_BONUS[num_colors.min(COLOR_BONUS.len() - 1)]
}

/// 各ボーナスの和。0 なら 1、上限 999。
#[inline]
pub fn calculate_rensa_bonus_coef(chain: u32, long: u32, color: u32) -> u32 {
    (chain + long + color).clamp(1, MAX_COEF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_chain_has_no_bonus() {
        assert_eq!(chain_bonus(1), 0);
        assert_eq!(chain_bonus(2), 8);
        assert_eq!(chain_bonus(5), 64);
        assert_eq!(chain_bonus(100), 512);
    }

    #[test]
    fn long_bonus_table() {
        assert_eq!(long_bonus(4), 0);
        assert_eq!(long_bonus(5), 2);
        assert_eq!(long_bonus(10), 7);
        assert_eq!(long_bonus(11), 10);
        assert_eq!(long_bonus(30), 10);
    }

    #[test]
    fn color_bonus_table() {
        assert_eq!(color_bonus(1), 0);
        assert_eq!(color_bonus(2), 3);
        assert_eq!(color_bonus(4), 12);
    }

    #[test]
    fn coef_is_at_least_one_and_capped() {
        assert_eq!(calculate_rensa_bonus_coef(0, 0, 0), 1);
        assert_eq!(calculate_rensa_bonus_coef(8, 2, 3), 13);
        assert_eq!(calculate_rensa_bonus_coef(512, 500, 24), 999);
    }
}
