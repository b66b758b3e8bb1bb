// 操作状態を頂点、1フレームの入力を辺とする最短経路探索

use super::key::{Key, KeySet, KeySetSeq};
use crate::constants::U64Map;
use crate::domain::field::PlainField;
use crate::domain::piece::{Decision, KumipuyoMovingState};
use crate::vlog;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

// 何も押さないのが最も安く、同時押しは高い
const WEIGHT_NONE: u32 = 100;
const WEIGHT_SINGLE: u32 = 101;
const WEIGHT_COMBO: u32 = 103;

/// ヒープに積む辺。cost が同じなら積んだ順。
struct Edge {
    cost: u32,
    order: u64,
    src: u64,
    dest: KumipuyoMovingState,
    key_set: KeySet,
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Edge {}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.cost, self.order).cmp(&(other.cost, other.order))
    }
}

/// ロック中の入力は効かないので辺から外す
fn candidate_edges(mks: &KumipuyoMovingState) -> Vec<(KeySet, u32)> {
    let none = (KeySet::new(), WEIGHT_NONE);
    let single = |k: Key| (KeySet::from(k), WEIGHT_SINGLE);
    let combo = |a: Key, b: Key| (KeySet::from_keys(&[a, b]), WEIGHT_COMBO);

    let arrow_ok = mks.rest_frames_arrow_prohibited == 0;
    let turn_ok = mks.rest_frames_turn_prohibited == 0;

    let mut edges = vec![none];
    if arrow_ok {
        edges.push(single(Key::Left));
        edges.push(single(Key::Right));
    }
    if arrow_ok && turn_ok {
        edges.push(combo(Key::Left, Key::LeftTurn));
        edges.push(combo(Key::Left, Key::RightTurn));
        edges.push(combo(Key::Right, Key::LeftTurn));
        edges.push(combo(Key::Right, Key::RightTurn));
    }
    if turn_ok {
        edges.push(single(Key::LeftTurn));
        edges.push(single(Key::RightTurn));
    }
    edges
}

/// (x, r) が一致する状態までの最小コスト列。末尾に下を足す。見つからなければ空列。
pub(crate) fn find_key_stroke_by_dijkstra(
    field: &PlainField,
    start: &KumipuyoMovingState,
    decision: &Decision,
) -> KeySetSeq {
    // 頂点 → (直前の頂点, そこで押した入力)
    let mut potential: U64Map<(u64, KeySet)> = U64Map::default();
    let mut heap = BinaryHeap::new();
    let mut order = 0u64;

    let start_key = start.key();
    heap.push(Reverse(Edge {
        cost: 0,
        order,
        src: start_key,
        dest: *start,
        key_set: KeySet::new(),
    }));

    while let Some(Reverse(edge)) = heap.pop() {
        let key = edge.dest.key();
        if potential.contains_key(&key) {
            continue;
        }
        potential.insert(key, (edge.src, edge.key_set));

        let mks = edge.dest;
        if mks.pos.x == decision.x && mks.pos.r == decision.r {
            vlog!(
                "dijkstra: {} に到達 (cost={}, 頂点数={})",
                decision,
                edge.cost,
                potential.len()
            );
            return reconstruct(&potential, start_key, key);
        }
        if mks.grounded {
            continue;
        }

        for (key_set, weight) in candidate_edges(&mks) {
            let mut next = mks;
            next.move_kumipuyo(field, key_set);
            if potential.contains_key(&next.key()) {
                continue;
            }
            order += 1;
            heap.push(Reverse(Edge {
                cost: edge.cost + weight,
                order,
                src: key,
                dest: next,
                key_set,
            }));
        }
    }

    vlog!("dijkstra: {} は到達不能 (頂点数={})", decision, potential.len());
    KeySetSeq::new()
}

fn reconstruct(potential: &U64Map<(u64, KeySet)>, start_key: u64, goal_key: u64) -> KeySetSeq {
    let mut keys = Vec::new();
    let mut p = goal_key;
    while p != start_key {
        let Some(&(prev, key_set)) = potential.get(&p) else {
            break;
        };
        keys.push(key_set);
        p = prev;
    }
    keys.reverse();
    keys.push(KeySet::from(Key::Down));
    KeySetSeq::from_vec(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(field: &PlainField, seq: &KeySetSeq) -> KumipuyoMovingState {
        let mut mks = KumipuyoMovingState::initial();
        mks.replay(field, seq.iter().copied());
        mks
    }

    #[test]
    fn already_at_goal_is_just_down() {
        let field = PlainField::new();
        let seq = find_key_stroke_by_dijkstra(&field, &KumipuyoMovingState::initial(), &Decision::new(3, 0));
        assert_eq!(seq.to_string(), "v");
    }

    #[test]
    fn finds_every_decision_on_empty_field() {
        let field = PlainField::new();
        for d in Decision::all_valid() {
            let seq = find_key_stroke_by_dijkstra(&field, &KumipuyoMovingState::initial(), &d);
            assert!(!seq.is_empty(), "{}", d);
            let mks = replay(&field, &seq);
            assert_eq!((mks.pos.x, mks.pos.r), (d.x, d.r), "{} {}", d, seq);
        }
    }

    #[test]
    fn shortest_path_to_adjacent_column() {
        let field = PlainField::new();
        let seq = find_key_stroke_by_dijkstra(&field, &KumipuyoMovingState::initial(), &Decision::new(2, 0));
        assert_eq!(seq.to_string(), "<,v");
    }

    #[test]
    fn climbs_over_a_step() {
        let field = PlainField::from_text(concat!(
            "O....O\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO",
        ))
        .unwrap();
        let d = Decision::new(1, 0);
        let seq = find_key_stroke_by_dijkstra(&field, &KumipuyoMovingState::initial(), &d);
        assert!(!seq.is_empty());
        let mks = replay(&field, &seq);
        assert_eq!((mks.pos.x, mks.pos.r), (1, 0));
    }

    #[test]
    fn walled_off_column_is_unreachable() {
        let field = PlainField::from_text(concat!(
            ".O.O..\n",
            ".O.O..\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO\n",
            "OOOOOO",
        ))
        .unwrap();
        let seq = find_key_stroke_by_dijkstra(&field, &KumipuyoMovingState::initial(), &Decision::new(1, 0));
        assert!(seq.is_empty());
    }
}
