// フレーム単位で入力を受けて進む対戦盤面（1人分）

use crate::domain::chain::RensaResult;
use crate::domain::control::{KeySet, KeySetSeq};
use crate::domain::field::CoreField;
use crate::domain::piece::{Decision, Kumipuyo, KumipuyoMovingState};
use crate::vlog;
use anyhow::{anyhow, Result};

/// 1フレーム進めた結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameEvent {
    /// 操作中のぷよなし
    Idle,
    Moving,
    /// 接地して連鎖まで処理した
    Landed { rensa: RensaResult, dead: bool },
}

#[derive(Clone, Debug, Default)]
pub struct FieldRealtime {
    field: CoreField,
    current: Option<(Kumipuyo, KumipuyoMovingState)>,
    score: u64,
    total_chains: u32,
    dead: bool,
}

impl FieldRealtime {
    pub fn new(field: CoreField) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }

    pub fn field(&self) -> &CoreField {
        &self.field
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn total_chains(&self) -> u32 {
        self.total_chains
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn moving_state(&self) -> Option<&KumipuyoMovingState> {
        self.current.as_ref().map(|(_, mks)| mks)
    }

    /// 次の組ぷよを出現させる
    pub fn spawn(&mut self, kumipuyo: Kumipuyo) -> Result<()> {
        if self.dead {
            return Err(anyhow!("窒息済みの盤面には出現できません"));
        }
        if self.current.is_some() {
            return Err(anyhow!("操作中の組ぷよがあります"));
        }
        self.current = Some((kumipuyo, KumipuyoMovingState::initial()));
        Ok(())
    }

    /// 1フレーム分の入力を処理する
    pub fn play_frame(&mut self, keys: KeySet) -> FrameEvent {
        let Some((kumipuyo, mut mks)) = self.current else {
            return FrameEvent::Idle;
        };

        mks.move_kumipuyo(self.field.plain(), keys);
        if !mks.grounded {
            self.current = Some((kumipuyo, mks));
            return FrameEvent::Moving;
        }

        self.current = None;
        let decision = Decision::new(mks.pos.x, mks.pos.r);
        if !self.field.drop_kumipuyo(&decision, &kumipuyo) {
            // 14段目より上に出た分は消える
            self.field.drop_puyo_on(decision.axis_x(), kumipuyo.axis);
            self.field.drop_puyo_on(decision.child_x(), kumipuyo.child);
        }

        let rensa = self.field.simulate();
        self.score += rensa.score as u64;
        self.total_chains += rensa.chains;
        self.dead = self.field.is_dead();
        vlog!(
            "realtime: {} に接地 連鎖={} 点={} 窒息={}",
            decision,
            rensa.chains,
            rensa.score,
            self.dead
        );

        FrameEvent::Landed {
            rensa,
            dead: self.dead,
        }
    }

    /// 入力列を流し、そのあとは接地するまで何も押さずに進める
    pub fn play_until_landed(&mut self, seq: &KeySetSeq, max_frames: usize) -> Option<FrameEvent> {
        let idle = std::iter::repeat(KeySet::new());
        for keys in seq.iter().copied().chain(idle).take(max_frames) {
            match self.play_frame(keys) {
                FrameEvent::Moving => continue,
                event => return Some(event),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::control::find_key_stroke;
    use crate::domain::field::PuyoColor;

    #[test]
    fn planned_sequence_lands_on_target() {
        let mut game = FieldRealtime::new(CoreField::new());
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Blue);
        game.spawn(pair).unwrap();
        let decision = Decision::new(1, 0);
        let seq = find_key_stroke(game.field(), &KumipuyoMovingState::initial(), &decision);
        let event = game.play_until_landed(&seq, 1000).unwrap();
        assert!(matches!(event, FrameEvent::Landed { dead: false, .. }));
        assert_eq!(game.field().color(1, 1), PuyoColor::Red);
        assert_eq!(game.field().color(1, 2), PuyoColor::Blue);
        assert_eq!(game.play_frame(KeySet::new()), FrameEvent::Idle);
    }

    #[test]
    fn landing_fires_chain() {
        let mut game = FieldRealtime::new(CoreField::from_text("RR....").unwrap());
        game.spawn(Kumipuyo::new(PuyoColor::Red, PuyoColor::Red)).unwrap();
        let seq: KeySetSeq = "v".parse().unwrap();
        let event = game.play_until_landed(&seq, 1000).unwrap();
        match event {
            FrameEvent::Landed { rensa, dead } => {
                assert_eq!(rensa.chains, 1);
                assert_eq!(rensa.score, 40);
                assert!(!dead);
            }
            other => panic!("接地していない: {:?}", other),
        }
        assert_eq!(game.score(), 40);
        assert!(game.field().is_zenkeshi());
    }

    #[test]
    fn spawn_twice_is_error() {
        let mut game = FieldRealtime::new(CoreField::new());
        let pair = Kumipuyo::new(PuyoColor::Red, PuyoColor::Blue);
        game.spawn(pair).unwrap();
        assert!(game.spawn(pair).is_err());
    }
}
