// 連鎖処理: 消去 → 落下 を得点が出なくなるまで繰り返す

use super::context::SimulationContext;
use super::result::{
    RensaCoefResult, RensaResult, RensaTrackResult, RensaVanishingPositionResult,
};
use super::score::{calculate_rensa_bonus_coef, chain_bonus, color_bonus, long_bonus};
use super::tracker::{
    RensaCoefTracker, RensaNonTracker, RensaObserver, RensaTracker,
    RensaVanishingPositionTracker,
};
use crate::constants::{
    ERASE_NUM, FRAMES_GROUNDING, FRAMES_TO_DROP_FAST, FRAMES_VANISH_ANIMATION, H, H_AIR, W,
};
use crate::domain::field::{
    CoreField, FieldBits, Position, PuyoColor, NUM_PUYO_COLORS, SCAN_CAPACITY,
};
use crate::domain::piece::Decision;

/// 1回の走査で見つかった消去対象
struct VanishScan {
    erased: usize,
    long_bonus: u32,
    num_colors: usize,
}

impl CoreField {
    /// min_heights より上だけを起点に、4個以上のグループを erase_queue に詰める
    fn scan_vanishing(
        &self,
        ctx: &SimulationContext,
        erase_queue: &mut [Position; SCAN_CAPACITY],
    ) -> VanishScan {
        let mut checked = FieldBits::new();
        let mut head = 0;
        let mut used_colors = [false; NUM_PUYO_COLORS];
        let mut num_colors = 0;
        let mut long_bonus_coef = 0;

        for x in 1..=W {
            let max_y = self.height(x).min(H);
            for y in ctx.min_heights[x]..=max_y {
                let c = self.color(x, y);
                if checked.get(x, y) || !c.is_normal() {
                    continue;
                }
                let n = self
                    .fill_same_color_positions(x, y, c, &mut erase_queue[head..], &mut checked)
                    .len();
                if n < ERASE_NUM {
                    continue;
                }
                head += n;
                long_bonus_coef += long_bonus(n);
                if !used_colors[c.index()] {
                    used_colors[c.index()] = true;
                    num_colors += 1;
                }
            }
        }

        VanishScan {
            erased: head,
            long_bonus: long_bonus_coef,
            num_colors,
        }
    }

    /// 1ステップ分の消去。得点を返す（0 なら何も消えていない）。
    pub(crate) fn vanish<T: RensaObserver>(
        &mut self,
        ctx: &mut SimulationContext,
        tracker: &mut T,
    ) -> u32 {
        let mut erase_queue = [Position::default(); SCAN_CAPACITY];
        let scan = self.scan_vanishing(ctx, &mut erase_queue);
        if scan.erased == 0 {
            return 0;
        }

        self.erase_queued_puyos(ctx, &erase_queue[..scan.erased], tracker);

        let coef = calculate_rensa_bonus_coef(
            chain_bonus(ctx.current_chain),
            scan.long_bonus,
            color_bonus(scan.num_colors),
        );
        tracker.nth_chain_done(ctx.current_chain, scan.erased, coef);
        10 * scan.erased as u32 * coef
    }

    /// 消去対象と隣接するおじゃまを消し、min_heights を更新する
    fn erase_queued_puyos<T: RensaObserver>(
        &mut self,
        ctx: &mut SimulationContext,
        erase_queue: &[Position],
        tracker: &mut T,
    ) {
        ctx.update_from_field(self);
        let nth = ctx.current_chain;

        for &Position { x, y } in erase_queue {
            self.field.set(x, y, PuyoColor::Empty);
            tracker.color_puyo_vanished(x, y, nth);
            ctx.min_heights[x] = ctx.min_heights[x].min(y);

            if self.color(x + 1, y) == PuyoColor::Ojama {
                self.field.set(x + 1, y, PuyoColor::Empty);
                tracker.ojama_puyo_vanished(x + 1, y, nth);
                ctx.min_heights[x + 1] = ctx.min_heights[x + 1].min(y);
            }
            if self.color(x - 1, y) == PuyoColor::Ojama {
                self.field.set(x - 1, y, PuyoColor::Empty);
                tracker.ojama_puyo_vanished(x - 1, y, nth);
                ctx.min_heights[x - 1] = ctx.min_heights[x - 1].min(y);
            }
            // 13段目のおじゃまは巻き込まない
            if y + 1 <= H && self.color(x, y + 1) == PuyoColor::Ojama {
                self.field.set(x, y + 1, PuyoColor::Empty);
                tracker.ojama_puyo_vanished(x, y + 1, nth);
            }
            if self.color(x, y - 1) == PuyoColor::Ojama {
                self.field.set(x, y - 1, PuyoColor::Empty);
                tracker.ojama_puyo_vanished(x, y - 1, nth);
                ctx.min_heights[x] = ctx.min_heights[x].min(y - 1);
            }
        }
    }

    /// 消去後の落下。最大落下段数を返す。
    fn drop_after_vanish<T: RensaObserver>(
        &mut self,
        ctx: &SimulationContext,
        tracker: &mut T,
    ) -> usize {
        let mut max_drops = 0;
        for x in 1..=W {
            let mut write_at = ctx.min_heights[x];
            if write_at >= H_AIR {
                continue;
            }
            let max_height = self.heights[x];
            self.heights[x] = write_at - 1;
            debug_assert_eq!(self.color(x, write_at), PuyoColor::Empty);

            for y in (write_at + 1)..=max_height {
                let c = self.color(x, y);
                if c == PuyoColor::Empty {
                    continue;
                }
                max_drops = max_drops.max(y - write_at);
                self.field.set(x, write_at, c);
                self.field.set(x, y, PuyoColor::Empty);
                self.heights[x] = write_at;
                tracker.puyo_dropped(x, y, write_at);
                write_at += 1;
            }
        }
        max_drops
    }

    /// 消去1回だけ（落下しない）。得点を返す。
    pub fn vanish_only(&mut self) -> u32 {
        let mut ctx = SimulationContext::new(1);
        let score = self.vanish(&mut ctx, &mut RensaNonTracker);
        for x in 1..=W {
            self.recalc_height_on(x);
        }
        score
    }

    /// 消去と落下を1ステップ進める
    pub fn vanish_drop(&mut self, ctx: &mut SimulationContext) -> RensaResult {
        let score = self.vanish(ctx, &mut RensaNonTracker);
        if score == 0 {
            return RensaResult::default();
        }
        ctx.current_chain += 1;
        let max_drops = self.drop_after_vanish(ctx, &mut RensaNonTracker);
        let mut frames = FRAMES_VANISH_ANIMATION;
        if max_drops > 0 {
            frames += FRAMES_TO_DROP_FAST[max_drops] + FRAMES_GROUNDING;
        }
        RensaResult::new(1, score, frames, max_drops == 0)
    }

    pub fn simulate(&mut self) -> RensaResult {
        let mut ctx = SimulationContext::new(1);
        self.simulate_with_tracker(&mut ctx, &mut RensaNonTracker)
    }

    pub fn simulate_with_context(&mut self, ctx: &mut SimulationContext) -> RensaResult {
        self.simulate_with_tracker(ctx, &mut RensaNonTracker)
    }

    /// 任意の観測者付きで連鎖を最後まで進める
    pub fn simulate_with_tracker<T: RensaObserver>(
        &mut self,
        ctx: &mut SimulationContext,
        tracker: &mut T,
    ) -> RensaResult {
        let mut chains = 0;
        let mut score = 0;
        let mut frames = 0;
        let mut quick = false;

        loop {
            let step_score = self.vanish(ctx, tracker);
            if step_score == 0 {
                break;
            }
            ctx.current_chain += 1;
            chains += 1;
            score += step_score;
            frames += FRAMES_VANISH_ANIMATION;
            let max_drops = self.drop_after_vanish(ctx, tracker);
            if max_drops > 0 {
                frames += FRAMES_TO_DROP_FAST[max_drops] + FRAMES_GROUNDING;
            } else {
                quick = true;
            }
        }

        RensaResult::new(chains, score, frames, quick)
    }

    /// 結果の受け皿を高々1つ指定して連鎖させる。2つ以上は呼び出し側のバグ。
    pub fn simulate_with_results(
        &mut self,
        track: Option<&mut RensaTrackResult>,
        coef: Option<&mut RensaCoefResult>,
        vanishing: Option<&mut RensaVanishingPositionResult>,
    ) -> RensaResult {
        let given = [track.is_some(), coef.is_some(), vanishing.is_some()]
            .iter()
            .filter(|&&b| b)
            .count();
        assert!(given <= 1, "観測結果は1種類まで: {} 種類指定された", given);

        let mut ctx = SimulationContext::new(1);
        if let Some(result) = track {
            return self.simulate_with_tracker(&mut ctx, &mut RensaTracker::new(result));
        }
        if let Some(result) = coef {
            return self.simulate_with_tracker(&mut ctx, &mut RensaCoefTracker::new(result));
        }
        if let Some(result) = vanishing {
            return self
                .simulate_with_tracker(&mut ctx, &mut RensaVanishingPositionTracker::new(result));
        }
        self.simulate_with_tracker(&mut ctx, &mut RensaNonTracker)
    }

    /// 次の1ステップで消えるマス（盤面は変えない）
    pub fn erasing_puyo_positions(&self, ctx: &SimulationContext) -> Vec<Position> {
        let mut erase_queue = [Position::default(); SCAN_CAPACITY];
        let scan = self.scan_vanishing(ctx, &mut erase_queue);
        erase_queue[..scan.erased].to_vec()
    }

    pub fn rensa_will_occur_with_context(&self, ctx: &SimulationContext) -> bool {
        let mut erase_queue = [Position::default(); SCAN_CAPACITY];
        self.scan_vanishing(ctx, &mut erase_queue).erased > 0
    }

    /// 直前の decision で置いたぷよから連鎖が始まるか
    pub fn rensa_will_occur_when_last_decision_is(&self, decision: &Decision) -> bool {
        let ctx = SimulationContext::from_last_decision(self, decision);
        self.rensa_will_occur_with_context(&ctx)
    }
}
