// ボタン・1フレームの入力・入力列とそのテキスト表記

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// ボタン。並び順がテキスト出力の順になる。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Right,
    Down,
    Left,
    RightTurn, // 時計回り
    LeftTurn,  // 反時計回り
}

impl Key {
    pub const ALL: [Key; 5] = [Key::Right, Key::Down, Key::Left, Key::RightTurn, Key::LeftTurn];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn to_char(self) -> char {
        match self {
            Key::Right => '>',
            Key::Down => 'v',
            Key::Left => '<',
            Key::RightTurn => 'A',
            Key::LeftTurn => 'B',
        }
    }

    pub fn from_char(ch: char) -> Result<Self> {
        match ch {
            '>' => Ok(Key::Right),
            'v' => Ok(Key::Down),
            '<' => Ok(Key::Left),
            'A' => Ok(Key::RightTurn),
            'B' => Ok(Key::LeftTurn),
            _ => Err(anyhow!("不正なキー文字: {:?}", ch)),
        }
    }
}

/// 1フレームに押しているボタンの集合
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySet(u8);

impl KeySet {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().fold(Self::new(), |ks, &k| ks.with(k))
    }

    #[must_use]
    pub fn with(self, key: Key) -> Self {
        Self(self.0 | key.bit())
    }

    #[inline]
    pub fn has_key(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn has_turn_key(&self) -> bool {
        self.has_key(Key::RightTurn) || self.has_key(Key::LeftTurn)
    }

    /// 左右と下
    pub fn has_arrow_key(&self) -> bool {
        self.has_key(Key::Right) || self.has_key(Key::Down) || self.has_key(Key::Left)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(move |&k| self.has_key(k))
    }
}

impl From<Key> for KeySet {
    fn from(key: Key) -> Self {
        KeySet::new().with(key)
    }
}

impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for k in self.keys() {
            write!(f, "{}", k.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for KeySet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .try_fold(KeySet::new(), |ks, ch| Ok(ks.with(Key::from_char(ch)?)))
    }
}

/// フレームごとの入力列。空は「解なし」を表す。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeySetSeq {
    seq: Vec<KeySet>,
}

impl KeySetSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(seq: Vec<KeySet>) -> Self {
        Self { seq }
    }

    /// 組み込みの定数表記用。不正な文字は無視する。
    pub(crate) fn from_literal(s: &str) -> Self {
        let seq = s
            .split(',')
            .map(|token| {
                token.chars().fold(KeySet::new(), |ks, ch| match Key::from_char(ch) {
                    Ok(k) => ks.with(k),
                    Err(_) => {
                        debug_assert!(false, "不正なキー文字: {:?}", ch);
                        ks
                    }
                })
            })
            .collect();
        Self { seq }
    }

    pub fn push(&mut self, ks: KeySet) {
        self.seq.push(ks);
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeySet> {
        self.seq.iter()
    }

    pub fn as_slice(&self) -> &[KeySet] {
        &self.seq
    }

    pub fn first(&self) -> Option<&KeySet> {
        self.seq.first()
    }

    pub fn remove_front(&mut self) -> Option<KeySet> {
        if self.seq.is_empty() {
            None
        } else {
            Some(self.seq.remove(0))
        }
    }
}

impl std::ops::Index<usize> for KeySetSeq {
    type Output = KeySet;

    fn index(&self, i: usize) -> &KeySet {
        &self.seq[i]
    }
}

impl<'a> IntoIterator for &'a KeySetSeq {
    type Item = &'a KeySet;
    type IntoIter = std::slice::Iter<'a, KeySet>;

    fn into_iter(self) -> Self::IntoIter {
        self.seq.iter()
    }
}

impl FromIterator<KeySet> for KeySetSeq {
    fn from_iter<I: IntoIterator<Item = KeySet>>(iter: I) -> Self {
        Self {
            seq: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for KeySetSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ks) in self.seq.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", ks)?;
        }
        Ok(())
    }
}

impl FromStr for KeySetSeq {
    type Err = anyhow::Error;

    /// "<,,<,v" のようなカンマ区切り。"" は空列。
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::new());
        }
        s.split(',').map(str::parse::<KeySet>).collect()
    }
}

impl Serialize for KeySetSeq {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for KeySetSeq {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_set_prints_in_canonical_order() {
        let ks: KeySet = "Bv".parse().unwrap();
        assert!(ks.has_key(Key::Down));
        assert!(ks.has_key(Key::LeftTurn));
        assert_eq!(ks.to_string(), "vB");
        assert!(ks.has_turn_key());
        assert!(ks.has_arrow_key());
    }

    #[test]
    fn empty_key_set() {
        let ks: KeySet = "".parse().unwrap();
        assert!(ks.is_empty());
        assert_eq!(ks.to_string(), "");
        assert!(!ks.has_turn_key());
        assert!(!ks.has_arrow_key());
    }

    #[test]
    fn key_set_seq_roundtrip() {
        for text in ["<,,<,v", ">A,v,vA,v", "A,,A,v", "v", ""] {
            let seq: KeySetSeq = text.parse().unwrap();
            assert_eq!(seq.to_string(), text);
        }
        let seq: KeySetSeq = "<,,<,v".parse().unwrap();
        assert_eq!(seq.len(), 4);
        assert!(seq[1].is_empty());
        assert_eq!(seq[3], KeySet::from(Key::Down));
    }

    #[test]
    fn key_set_seq_rejects_unknown() {
        assert!("<,x".parse::<KeySetSeq>().is_err());
        assert!("^".parse::<KeySetSeq>().is_err());
    }

    #[test]
    fn literal_matches_parse() {
        let parsed: KeySetSeq = ">B,,>,,>,B,v".parse().unwrap();
        assert_eq!(KeySetSeq::from_literal(">B,,>,,>,B,v"), parsed);
    }

    #[test]
    fn remove_front() {
        let mut seq: KeySetSeq = "A,B".parse().unwrap();
        assert_eq!(seq.remove_front(), Some(KeySet::from(Key::RightTurn)));
        assert_eq!(seq.to_string(), "B");
    }
}
