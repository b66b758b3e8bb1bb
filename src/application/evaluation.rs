// 全置き場所の並列評価（経路・落下フレーム・連鎖結果・窒息）

use crate::domain::chain::RensaResult;
use crate::domain::control::{ControllerConfig, KeySetSeq, PuyoController};
use crate::domain::field::CoreField;
use crate::domain::piece::{Decision, Kumipuyo};
use crate::vlog;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 評価の設定
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// 到達できない置き場所を結果から外す
    pub skip_unreachable: bool,
    /// ゾロ目のとき同じ形になる置き場所を外す
    pub skip_duplicates: bool,
    pub controller: ControllerConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            skip_unreachable: true,
            skip_duplicates: true,
            controller: ControllerConfig::default(),
        }
    }
}

/// 1つの置き場所の評価結果
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    pub decision: Decision,
    /// 空なら到達不能
    pub key_stroke: KeySetSeq,
    pub frames_to_drop: u32,
    pub rensa: RensaResult,
    pub dead: bool,
}

impl PlacementOutcome {
    pub fn is_reachable(&self) -> bool {
        !self.key_stroke.is_empty()
    }
}

pub struct PlacementEvaluator {
    config: EvaluationConfig,
    controller: PuyoController,
}

impl Default for PlacementEvaluator {
    fn default() -> Self {
        Self::new(EvaluationConfig::default())
    }
}

impl PlacementEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            controller: PuyoController::new(config.controller),
        }
    }

    /// 評価対象の置き場所
    pub fn candidate_decisions(&self, kumipuyo: &Kumipuyo) -> Vec<Decision> {
        Decision::all_valid()
            .filter(|d| !(self.config.skip_duplicates && kumipuyo.is_rep() && (d.r == 2 || d.r == 3)))
            .collect()
    }

    /// 各置き場所を盤面のコピー上で並列に評価する（順序は Decision 順）
    pub fn evaluate(&self, field: &CoreField, kumipuyo: &Kumipuyo) -> Vec<PlacementOutcome> {
        let decisions = self.candidate_decisions(kumipuyo);

        let outcomes: Vec<Option<PlacementOutcome>> = decisions
            .par_iter()
            .map(|decision| self.evaluate_one(field, kumipuyo, decision))
            .collect();

        outcomes.into_iter().flatten().collect()
    }

    fn evaluate_one(
        &self,
        field: &CoreField,
        kumipuyo: &Kumipuyo,
        decision: &Decision,
    ) -> Option<PlacementOutcome> {
        let key_stroke = self.controller.find_key_stroke(field, decision);
        if key_stroke.is_empty() && self.config.skip_unreachable {
            vlog!("evaluate: {} は到達不能", decision);
            return None;
        }

        let frames_to_drop = field.frames_to_drop_next(decision);
        let mut after = field.clone();
        if !after.drop_kumipuyo(decision, kumipuyo) {
            vlog!("evaluate: {} は置けない", decision);
            return None;
        }
        let rensa = after.simulate();
        let dead = after.is_dead();

        vlog!(
            "evaluate: {} 入力={} 連鎖={} 点={} 窒息={}",
            decision,
            key_stroke,
            rensa.chains,
            rensa.score,
            dead
        );

        Some(PlacementOutcome {
            decision: *decision,
            key_stroke,
            frames_to_drop,
            rensa,
            dead,
        })
    }

    /// 窒息しない中で得点が最大のもの
    pub fn best_by_score(&self, field: &CoreField, kumipuyo: &Kumipuyo) -> Option<PlacementOutcome> {
        self.evaluate(field, kumipuyo)
            .into_iter()
            .filter(|o| o.is_reachable() && !o.dead)
            .max_by_key(|o| (o.rensa.score, std::cmp::Reverse(o.decision)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::PuyoColor;

    #[test]
    fn empty_field_all_reachable() {
        let evaluator = PlacementEvaluator::default();
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Blue);
        let outcomes = evaluator.evaluate(&CoreField::new(), &pair);
        assert_eq!(outcomes.len(), 22);
        assert!(outcomes.iter().all(|o| o.is_reachable() && !o.dead && o.rensa.chains == 0));
        assert_eq!(outcomes[0].decision, Decision::new(1, 0));
    }

    #[test]
    fn rep_pair_skips_duplicates() {
        let evaluator = PlacementEvaluator::default();
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Red);
        assert_eq!(evaluator.candidate_decisions(&pair).len(), 11);
    }

    #[test]
    fn best_by_score_finds_chain() {
        let evaluator = PlacementEvaluator::default();
        let field = CoreField::from_text("RR....").unwrap();
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Red);
        let best = evaluator.best_by_score(&field, &pair).unwrap();
        assert_eq!(best.rensa.chains, 1);
        assert_eq!(best.rensa.score, 40);
    }

    #[test]
    fn config_from_json_uses_defaults() {
        let config: EvaluationConfig = serde_json::from_str(r#"{"skip_unreachable": false}"#).unwrap();
        assert!(!config.skip_unreachable);
        assert!(config.skip_duplicates);
        assert!(config.controller.enable_fastpath);
    }
}
