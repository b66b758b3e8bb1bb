// 連鎖の観測者（消去・落下・連鎖完了の通知を受ける）

use super::result::{
    RensaCoefResult, RensaEvent, RensaTrackResult, RensaVanishingPositionResult,
};
use crate::constants::{MAP_H, MAP_W};

/// 連鎖エンジンからの通知。既定実装は何もしない。
pub trait RensaObserver {
    fn color_puyo_vanished(&mut self, _x: usize, _y: usize, _nth_chain: u32) {}
    fn ojama_puyo_vanished(&mut self, _x: usize, _y: usize, _nth_chain: u32) {}
    fn puyo_dropped(&mut self, _x: usize, _from_y: usize, _to_y: usize) {}
    fn nth_chain_done(&mut self, _nth_chain: u32, _num_erased: usize, _coef: u32) {}
}

/// 何も記録しない
#[derive(Clone, Copy, Debug, Default)]
pub struct RensaNonTracker;

impl RensaObserver for RensaNonTracker {}

/// 元の位置ごとに消えた連鎖番号を記録する
pub struct RensaTracker<'a> {
    original_y: [[usize; MAP_H]; MAP_W],
    result: &'a mut RensaTrackResult,
}

// 各マスの元の段（初期値は自分自身）
fn identity_rows() -> [[usize; MAP_H]; MAP_W] {
    let mut rows = [[0; MAP_H]; MAP_W];
    for col in rows.iter_mut() {
        for (y, v) in col.iter_mut().enumerate() {
            *v = y;
        }
    }
    rows
}

impl<'a> RensaTracker<'a> {
    pub fn new(result: &'a mut RensaTrackResult) -> Self {
        Self {
            original_y: identity_rows(),
            result,
        }
    }
}

impl RensaObserver for RensaTracker<'_> {
    fn color_puyo_vanished(&mut self, x: usize, y: usize, nth_chain: u32) {
        self.result.set_erased_at(x, self.original_y[x][y], nth_chain);
    }

    fn ojama_puyo_vanished(&mut self, x: usize, y: usize, nth_chain: u32) {
        self.result.set_erased_at(x, self.original_y[x][y], nth_chain);
    }

    fn puyo_dropped(&mut self, x: usize, from_y: usize, to_y: usize) {
        self.original_y[x][to_y] = self.original_y[x][from_y];
    }
}

/// 連鎖ごとの係数を記録する
pub struct RensaCoefTracker<'a> {
    result: &'a mut RensaCoefResult,
}

impl<'a> RensaCoefTracker<'a> {
    pub fn new(result: &'a mut RensaCoefResult) -> Self {
        Self { result }
    }
}

impl RensaObserver for RensaCoefTracker<'_> {
    fn nth_chain_done(&mut self, nth_chain: u32, num_erased: usize, coef: u32) {
        self.result.set_coef(nth_chain, num_erased, coef);
    }
}

/// 直前の連鎖から動いたかどうかで消えたぷよを分類する
pub struct RensaVanishingPositionTracker<'a> {
    // 0 は前の連鎖以降動いていない
    y_at_prev_rensa: [[usize; MAP_H]; MAP_W],
    result: &'a mut RensaVanishingPositionResult,
}

impl<'a> RensaVanishingPositionTracker<'a> {
    pub fn new(result: &'a mut RensaVanishingPositionResult) -> Self {
        Self {
            y_at_prev_rensa: [[0; MAP_H]; MAP_W],
            result,
        }
    }
}

impl RensaObserver for RensaVanishingPositionTracker<'_> {
    fn color_puyo_vanished(&mut self, x: usize, y: usize, nth_chain: u32) {
        match self.y_at_prev_rensa[x][y] {
            0 => self.result.set_base_puyo(x, y, nth_chain),
            y_before => self.result.set_falling_puyo(x, y_before, y, nth_chain),
        }
    }

    fn puyo_dropped(&mut self, x: usize, from_y: usize, to_y: usize) {
        self.y_at_prev_rensa[x][to_y] = from_y;
    }

    fn nth_chain_done(&mut self, _nth_chain: u32, _num_erased: usize, _coef: u32) {
        self.y_at_prev_rensa = [[0; MAP_H]; MAP_W];
    }
}

/// 全イベントを順に記録する。消去イベントの y は連鎖開始前の段。
#[derive(Clone, Debug)]
pub struct RensaEventRecorder {
    pub events: Vec<RensaEvent>,
    original_y: [[usize; MAP_H]; MAP_W],
}

impl Default for RensaEventRecorder {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            original_y: identity_rows(),
        }
    }
}

impl RensaEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RensaObserver for RensaEventRecorder {
    fn color_puyo_vanished(&mut self, x: usize, y: usize, nth_chain: u32) {
        let y = self.original_y[x][y];
        self.events.push(RensaEvent::ColorVanished { x, y, nth_chain });
    }

    fn ojama_puyo_vanished(&mut self, x: usize, y: usize, nth_chain: u32) {
        let y = self.original_y[x][y];
        self.events.push(RensaEvent::OjamaVanished { x, y, nth_chain });
    }

    fn puyo_dropped(&mut self, x: usize, from_y: usize, to_y: usize) {
        self.original_y[x][to_y] = self.original_y[x][from_y];
        self.events.push(RensaEvent::Dropped { x, from_y, to_y });
    }

    fn nth_chain_done(&mut self, nth_chain: u32, num_erased: usize, coef: u32) {
        self.events.push(RensaEvent::ChainDone {
            nth_chain,
            num_erased,
            coef,
        });
    }
}
