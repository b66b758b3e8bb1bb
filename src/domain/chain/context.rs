// 連鎖シミュレーションの作業状態

use crate::constants::MAP_W;
use crate::constants::W;
use crate::domain::field::CoreField;
use crate::domain::piece::Decision;

/// current_chain: 次に消えたら何連鎖目か
/// min_heights[x]: x 列でこの段より下は変化していない
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationContext {
    pub current_chain: u32,
    pub min_heights: [usize; MAP_W],
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SimulationContext {
    /// 盤面全体を走査する
    pub fn new(current_chain: u32) -> Self {
        Self {
            current_chain,
            min_heights: [1; MAP_W],
        }
    }

    /// 変化がない状態（各列の高さ+1 から）
    pub fn from_field(field: &CoreField) -> Self {
        let mut ctx = Self::new(1);
        ctx.update_from_field(field);
        ctx
    }

    /// 直前に decision で置いた2個だけが変化している。1段目より下には下げない。
    pub fn from_last_decision(field: &CoreField, decision: &Decision) -> Self {
        let mut ctx = Self::from_field(field);
        for x in [decision.axis_x(), decision.child_x()] {
            ctx.min_heights[x] = ctx.min_heights[x].saturating_sub(1).max(1);
        }
        ctx
    }

    pub fn update_from_field(&mut self, field: &CoreField) {
        for x in 1..=W {
            self.min_heights[x] = field.height(x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::PuyoColor;
    use crate::domain::piece::Kumipuyo;

    #[test]
    fn last_decision_lowers_touched_columns() {
        let mut field = CoreField::from_text("R.....\nB.....").unwrap();
        let decision = Decision::new(3, 1);
        assert!(field.drop_kumipuyo(&decision, &Kumipuyo::new(PuyoColor::Red, PuyoColor::Red)));
        let ctx = SimulationContext::from_last_decision(&field, &decision);
        assert_eq!(ctx.min_heights[1], 3);
        assert_eq!(ctx.min_heights[3], 1);
        assert_eq!(ctx.min_heights[4], 1);
        assert_eq!(ctx.min_heights[5], 1);
    }

    #[test]
    fn last_decision_on_empty_column_stays_in_field() {
        let field = CoreField::new();
        let ctx = SimulationContext::from_last_decision(&field, &Decision::new(3, 0));
        assert_eq!(ctx.min_heights[3], 1);
        let ctx = SimulationContext::from_last_decision(&field, &Decision::new(2, 1));
        assert_eq!(ctx.min_heights[2], 1);
        assert_eq!(ctx.min_heights[3], 1);
    }
}
