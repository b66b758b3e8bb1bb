// 置き場所までの入力列を求める（定型表 → 貪欲 → ダイクストラ）

use super::dijkstra::find_key_stroke_by_dijkstra;
use super::fastpath::find_key_stroke_fastpath;
use super::key::{Key, KeySet, KeySetSeq};
use super::online::find_key_stroke_online;
use crate::constants::{FRAMES_FREE_FALL, FRAMES_QUICKTURN, MAP_H, MAP_W, SPAWN_X, SPAWN_Y};
use crate::domain::field::{CoreField, PlainField};
use crate::domain::piece::{Decision, KumipuyoMovingState, KumipuyoPos};
use crate::vlog;
use serde::{Deserialize, Serialize};

/// どの段階の探索を使うか。ダイクストラは常に使う。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub enable_fastpath: bool,
    pub enable_online: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            enable_fastpath: true,
            enable_online: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PuyoController {
    config: ControllerConfig,
}

impl PuyoController {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// 出現位置から decision まで
    pub fn find_key_stroke(&self, field: &CoreField, decision: &Decision) -> KeySetSeq {
        self.find_key_stroke_from(field, &KumipuyoMovingState::initial(), decision)
    }

    /// 到達できなければ空列
    pub fn find_key_stroke_from(
        &self,
        field: &CoreField,
        mks: &KumipuyoMovingState,
        decision: &Decision,
    ) -> KeySetSeq {
        assert!(decision.is_valid(), "不正な Decision: {}", decision);

        if !passes_reachability_precheck(field.plain(), mks, decision) {
            vlog!("controller: {} は事前判定で到達不能", decision);
            return KeySetSeq::new();
        }

        if self.config.enable_fastpath && mks.is_initial() {
            let seq = find_key_stroke_fastpath(field, decision);
            if !seq.is_empty() {
                if lands_on(field.plain(), mks, &seq, decision) {
                    return seq;
                }
                vlog!("controller: 定型表 {} が {} に届かない", seq, decision);
            }
        }

        if self.config.enable_online {
            let seq = find_key_stroke_online(field.plain(), mks, decision);
            if !seq.is_empty() {
                if lands_on(field.plain(), mks, &seq, decision) {
                    return seq;
                }
                vlog!("controller: 貪欲解 {} が {} に届かない", seq, decision);
            }
        }

        find_key_stroke_by_dijkstra(field.plain(), mks, decision)
    }

    pub fn is_reachable(&self, field: &CoreField, decision: &Decision) -> bool {
        self.is_reachable_from(field, &KumipuyoMovingState::initial(), decision)
    }

    pub fn is_reachable_from(
        &self,
        field: &CoreField,
        mks: &KumipuyoMovingState,
        decision: &Decision,
    ) -> bool {
        !self.find_key_stroke_from(field, mks, decision).is_empty()
    }
}

/// 既定設定での経路探索
pub fn find_key_stroke(field: &CoreField, mks: &KumipuyoMovingState, decision: &Decision) -> KeySetSeq {
    PuyoController::default().find_key_stroke_from(field, mks, decision)
}

pub fn is_reachable(field: &CoreField, decision: &Decision) -> bool {
    PuyoController::default().is_reachable(field, decision)
}

/// false なら確実に到達不能。true は「まだ否定できない」。
/// 13段目が埋まった列は越えられず、子を下にするには 12段目が空いている必要がある。
pub fn passes_reachability_precheck(
    field: &PlainField,
    mks: &KumipuyoMovingState,
    decision: &Decision,
) -> bool {
    if mks.grounded {
        return false;
    }
    if mks.is_initial() && !field.is_empty(SPAWN_X, SPAWN_Y) {
        return false;
    }

    let cols = [
        mks.pos.axis_x(),
        mks.pos.child_x(),
        decision.axis_x(),
        decision.child_x(),
    ];
    let lo = cols.iter().copied().min().unwrap_or(SPAWN_X);
    let hi = cols.iter().copied().max().unwrap_or(SPAWN_X);
    if (lo..=hi).any(|x| !field.is_empty(x, 13)) {
        return false;
    }

    if decision.r == 2 && !field.is_empty(decision.x, 12) {
        return false;
    }
    reaches_ignoring_timers(field, &mks.pos, decision)
}

// 1フレームに試す入力（矢印 × 回転）
const ARROW_CHOICES: [Option<Key>; 4] = [None, Some(Key::Right), Some(Key::Left), Some(Key::Down)];
const TURN_CHOICES: [Option<Key>; 3] = [None, Some(Key::RightTurn), Some(Key::LeftTurn)];

/// カウンタを忘れて位置 (x, y, r) だけのグラフで (x, r) に届くか。
/// クイックターン受付の有無と自由落下の有無を両方試すので、実際に届く位置は必ずここでも届く。
fn reaches_ignoring_timers(field: &PlainField, start: &KumipuyoPos, decision: &Decision) -> bool {
    let mut visited = [[[false; 4]; MAP_H]; MAP_W];
    let mut stack = vec![*start];
    visited[start.x][start.y][start.r] = true;

    while let Some(pos) = stack.pop() {
        if pos.x == decision.x && pos.r == decision.r {
            return true;
        }
        for quick in [0, FRAMES_QUICKTURN] {
            for free_fall in [0, FRAMES_FREE_FALL] {
                for arrow in ARROW_CHOICES {
                    for turn in TURN_CHOICES {
                        let keys = arrow.into_iter().chain(turn).fold(KeySet::new(), KeySet::with);
                        let mut mks = KumipuyoMovingState::new(pos);
                        mks.rest_frames_to_accept_quick_turn = quick;
                        mks.rest_frames_for_free_fall = free_fall;
                        mks.move_kumipuyo(field, keys);

                        let next = mks.pos;
                        if !visited[next.x][next.y][next.r] {
                            visited[next.x][next.y][next.r] = true;
                            stack.push(next);
                        }
                    }
                }
            }
        }
    }
    false
}

/// 再生して (x, r) が一致するか
fn lands_on(
    field: &PlainField,
    mks: &KumipuyoMovingState,
    seq: &KeySetSeq,
    decision: &Decision,
) -> bool {
    let mut state = *mks;
    state.replay(field, seq.iter().copied());
    state.pos.x == decision.x && state.pos.r == decision.r
}
