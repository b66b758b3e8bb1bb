// 連鎖結果の定義

use crate::constants::{MAP_H, MAP_W};
use crate::domain::field::Position;
use serde::{Deserialize, Serialize};

/// 連鎖シミュレーションの結果
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RensaResult {
    /// 連鎖数（得点が入ったステップ数）
    pub chains: u32,
    pub score: u32,
    /// アニメーション込みのフレーム数（目安）
    pub frames: u32,
    /// 最後の連鎖の後に落下がなかった
    pub quick: bool,
}

impl RensaResult {
    pub fn new(chains: u32, score: u32, frames: u32, quick: bool) -> Self {
        Self {
            chains,
            score,
            frames,
            quick,
        }
    }
}

/// 各マス（元の位置）が何連鎖目で消えたか。0 は消えていない。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RensaTrackResult {
    erased_at: [[u32; MAP_H]; MAP_W],
}

impl Default for RensaTrackResult {
    fn default() -> Self {
        Self {
            erased_at: [[0; MAP_H]; MAP_W],
        }
    }
}

impl RensaTrackResult {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn erased_at(&self, x: usize, y: usize) -> u32 {
        self.erased_at[x][y]
    }

    #[inline]
    pub fn set_erased_at(&mut self, x: usize, y: usize, nth_chain: u32) {
        self.erased_at[x][y] = nth_chain;
    }
}

/// 連鎖ごとの消去数と係数
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RensaCoefResult {
    num_erased: Vec<usize>,
    coefs: Vec<u32>,
}

impl RensaCoefResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_coef(&mut self, nth_chain: u32, num_erased: usize, coef: u32) {
        let i = nth_chain as usize;
        if self.coefs.len() < i {
            self.coefs.resize(i, 0);
            self.num_erased.resize(i, 0);
        }
        self.coefs[i - 1] = coef;
        self.num_erased[i - 1] = num_erased;
    }

    pub fn chain_count(&self) -> usize {
        self.coefs.len()
    }

    pub fn coef(&self, nth_chain: u32) -> u32 {
        self.coefs[nth_chain as usize - 1]
    }

    pub fn num_erased(&self, nth_chain: u32) -> usize {
        self.num_erased[nth_chain as usize - 1]
    }

    pub fn score(&self, nth_chain: u32) -> u32 {
        10 * self.num_erased(nth_chain) as u32 * self.coef(nth_chain)
    }
}

/// 連鎖ごとに、落ちずに消えたぷよと直前に落ちてきて消えたぷよを分けて記録
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RensaVanishingPositionResult {
    base_puyos: Vec<Vec<Position>>,
    falling_puyos: Vec<Vec<Position>>,
    falling_puyo_original_positions: Vec<Vec<Position>>,
}

impl RensaVanishingPositionResult {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, nth_chain: u32) -> usize {
        let i = nth_chain as usize;
        if self.base_puyos.len() < i {
            self.base_puyos.resize_with(i, Vec::new);
            self.falling_puyos.resize_with(i, Vec::new);
            self.falling_puyo_original_positions.resize_with(i, Vec::new);
        }
        i - 1
    }

    pub fn set_base_puyo(&mut self, x: usize, y: usize, nth_chain: u32) {
        let i = self.ensure(nth_chain);
        self.base_puyos[i].push(Position::new(x, y));
    }

    pub fn set_falling_puyo(&mut self, x: usize, y_before: usize, y_after: usize, nth_chain: u32) {
        let i = self.ensure(nth_chain);
        self.falling_puyos[i].push(Position::new(x, y_after));
        self.falling_puyo_original_positions[i].push(Position::new(x, y_before));
    }

    pub fn size(&self) -> usize {
        self.base_puyos.len()
    }

    pub fn base_puyos(&self, nth_chain: u32) -> &[Position] {
        &self.base_puyos[nth_chain as usize - 1]
    }

    pub fn falling_puyos(&self, nth_chain: u32) -> &[Position] {
        &self.falling_puyos[nth_chain as usize - 1]
    }

    pub fn falling_puyo_original_positions(&self, nth_chain: u32) -> &[Position] {
        &self.falling_puyo_original_positions[nth_chain as usize - 1]
    }
}

/// 観測イベント
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RensaEvent {
    ColorVanished { x: usize, y: usize, nth_chain: u32 },
    OjamaVanished { x: usize, y: usize, nth_chain: u32 },
    Dropped { x: usize, from_y: usize, to_y: usize },
    ChainDone { nth_chain: u32, num_erased: usize, coef: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coef_result_grows_on_demand() {
        let mut r = RensaCoefResult::new();
        r.set_coef(1, 4, 1);
        r.set_coef(2, 5, 10);
        assert_eq!(r.chain_count(), 2);
        assert_eq!(r.score(1), 40);
        assert_eq!(r.score(2), 500);
    }

    #[test]
    fn vanishing_position_result_separates_falling() {
        let mut r = RensaVanishingPositionResult::new();
        r.set_base_puyo(1, 1, 1);
        r.set_falling_puyo(2, 5, 2, 2);
        assert_eq!(r.size(), 2);
        assert_eq!(r.base_puyos(1), &[Position::new(1, 1)]);
        assert!(r.base_puyos(2).is_empty());
        assert_eq!(r.falling_puyos(2), &[Position::new(2, 2)]);
        assert_eq!(r.falling_puyo_original_positions(2), &[Position::new(2, 5)]);
    }
}
