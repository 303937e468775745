//! Non-repeating word rotation
//!
//! Words come out in a shuffled order and none repeats until every word of
//! the list has been played. The order and the set of played indices can be
//! saved and restored so the rotation survives restarts.

use super::{WordList, WordListError, WordSource};
use crate::game::Word;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Saved rotation progress for one list version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub version: u32,
    pub order: Vec<usize>,
    pub used: Vec<usize>,
}

pub struct WordPool {
    words: Vec<Word>,
    version: u32,
    order: Vec<usize>,
    used: BTreeSet<usize>,
    rng: StdRng,
}

impl WordPool {
    pub fn with_rng(list: WordList, rng: StdRng) -> Self {
        let mut pool = Self {
            order: Vec::new(),
            used: BTreeSet::new(),
            version: list.version,
            words: list.words,
            rng,
        };
        pool.reshuffle();
        pool
    }

    /// Build a pool and continue a saved rotation if it still fits the list.
    ///
    /// Saved state from another list version, or one that is not a
    /// permutation of this list, is discarded in favour of a fresh shuffle.
    pub fn restore(list: WordList, saved: Option<PoolState>, rng: StdRng) -> Self {
        let mut pool = Self::with_rng(list, rng);
        let Some(saved) = saved else {
            return pool;
        };

        if saved.version != pool.version {
            info!(
                saved = saved.version,
                current = pool.version,
                "word list changed, starting a new rotation"
            );
            return pool;
        }
        if !is_permutation(&saved.order, pool.words.len()) {
            info!("saved word rotation does not fit the list, starting over");
            return pool;
        }

        pool.order = saved.order;
        pool.used = saved
            .used
            .into_iter()
            .filter(|&index| index < pool.words.len())
            .collect();
        debug!(
            used = pool.used.len(),
            total = pool.words.len(),
            "restored word rotation"
        );
        pool
    }

    pub fn snapshot(&self) -> PoolState {
        PoolState {
            version: self.version,
            order: self.order.clone(),
            used: self.used.iter().copied().collect(),
        }
    }

    /// Words left before the rotation starts over.
    pub fn remaining(&self) -> usize {
        self.words.len() - self.used.len()
    }

    fn reshuffle(&mut self) {
        self.order = (0..self.words.len()).collect();
        self.order.shuffle(&mut self.rng);
        self.used.clear();
    }
}

impl WordSource for WordPool {
    fn next_word(&mut self) -> Result<Word, WordListError> {
        if self.words.is_empty() {
            return Err(WordListError::Empty);
        }

        let next = self.order.iter().copied().find(|i| !self.used.contains(i));
        let index = match next {
            Some(index) => index,
            None => {
                debug!("every word played, reshuffling");
                self.reshuffle();
                self.order[0]
            }
        };

        self.used.insert(index);
        Ok(self.words[index].clone())
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let distinct: BTreeSet<usize> = order.iter().copied().collect();
    distinct.len() == len && order.iter().all(|&i| i < len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(version: u32, words: &[&str]) -> WordList {
        WordList {
            version,
            words: words.iter().map(|w| Word::new(*w, "hint")).collect(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn draw(pool: &mut WordPool, n: usize) -> Vec<String> {
        (0..n).map(|_| pool.next_word().unwrap().text).collect()
    }

    #[test]
    fn test_no_repeats_within_rotation() {
        let mut pool = WordPool::with_rng(list(1, &["КОТ", "ДОМ", "ЛЕС", "РЕКА"]), rng());
        let mut drawn = draw(&mut pool, 4);
        drawn.sort();
        assert_eq!(drawn, vec!["ДОМ", "КОТ", "ЛЕС", "РЕКА"]);
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn test_rotation_restarts_when_exhausted() {
        let mut pool = WordPool::with_rng(list(1, &["КОТ", "ДОМ"]), rng());
        draw(&mut pool, 2);
        let word = pool.next_word().unwrap();
        assert!(word.text == "КОТ" || word.text == "ДОМ");
        assert_eq!(pool.remaining(), 1);
    }

    #[test]
    fn test_empty_pool_errors() {
        let mut pool = WordPool::with_rng(list(1, &[]), rng());
        assert!(matches!(pool.next_word(), Err(WordListError::Empty)));
    }

    #[test]
    fn test_snapshot_restore_continues_rotation() {
        let words = ["КОТ", "ДОМ", "ЛЕС", "РЕКА", "МОРЕ"];
        let mut pool = WordPool::with_rng(list(2, &words), rng());
        let first = draw(&mut pool, 2);

        let saved = pool.snapshot();
        assert_eq!(saved.used.len(), 2);

        let mut restored = WordPool::restore(list(2, &words), Some(saved), StdRng::seed_from_u64(5));
        let rest = draw(&mut restored, 3);
        for word in &rest {
            assert!(!first.contains(word), "{} repeated after restore", word);
        }
        assert_eq!(restored.remaining(), 0);
    }

    #[test]
    fn test_restore_discards_other_version() {
        let words = ["КОТ", "ДОМ", "ЛЕС"];
        let mut pool = WordPool::with_rng(list(2, &words), rng());
        draw(&mut pool, 2);

        let restored = WordPool::restore(list(3, &words), Some(pool.snapshot()), rng());
        assert_eq!(restored.remaining(), 3);
        assert_eq!(restored.snapshot().version, 3);
    }

    #[test]
    fn test_restore_discards_bad_order() {
        let saved = PoolState {
            version: 1,
            order: vec![0, 0, 1],
            used: vec![0],
        };
        let restored = WordPool::restore(list(1, &["КОТ", "ДОМ", "ЛЕС"]), Some(saved), rng());
        assert_eq!(restored.remaining(), 3);

        let short = PoolState {
            version: 1,
            order: vec![1, 0],
            used: vec![],
        };
        let restored = WordPool::restore(list(1, &["КОТ", "ДОМ", "ЛЕС"]), Some(short), rng());
        assert_eq!(restored.snapshot().order.len(), 3);
    }

    #[test]
    fn test_restore_without_saved_state() {
        let restored = WordPool::restore(list(1, &["КОТ", "ДОМ"]), None, rng());
        assert_eq!(restored.remaining(), 2);
        assert_eq!(restored.snapshot().order.len(), 2);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[2, 0, 1], 3));
        assert!(is_permutation(&[], 0));
        assert!(!is_permutation(&[0, 1, 3], 3));
        assert!(!is_permutation(&[0, 1], 3));
    }
}
