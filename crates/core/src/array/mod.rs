use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use rand::Rng;

use crate::{Result, SortVizError};

const NO_HIGHLIGHT: usize = usize::MAX;

/// Shared, thread-safe handle over the array being sorted.
///
/// Cloning the handle shares the same storage. Every primitive takes the lock
/// for exactly one operation, so a [`snapshot`](Self::snapshot) never observes
/// half of a swap.
#[derive(Clone, Default)]
pub struct ArrayModel {
    values: Arc<RwLock<Vec<u32>>>,
    highlights: Arc<Highlights>,
}

impl ArrayModel {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<u32>) -> Self {
        Self {
            values: Arc::new(RwLock::new(values)),
            highlights: Arc::default(),
        }
    }

    /// Replaces the contents with `size` uniform magnitudes in
    /// `[min_value, max_value]`.
    pub fn reset<R: Rng>(
        &self,
        size: usize,
        min_value: u32,
        max_value: u32,
        rng: &mut R,
    ) -> Result<()> {
        let upper = max_value.max(min_value);
        let fresh: Vec<u32> = (0..size).map(|_| rng.gen_range(min_value..=upper)).collect();
        *self.write()? = fresh;
        self.highlights.clear();
        Ok(())
    }

    /// Number of slots. Errors only when the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Value at `index`, or [`SortVizError::Index`] past the end.
    pub fn get(&self, index: usize) -> Result<u32> {
        let values = self.read()?;
        values.get(index).copied().ok_or(SortVizError::Index {
            index,
            len: values.len(),
        })
    }

    /// Overwrites one slot. Out-of-range writes leave the array untouched.
    pub fn set(&self, index: usize, value: u32) -> Result<()> {
        let mut values = self.write()?;
        let len = values.len();
        let slot = values
            .get_mut(index)
            .ok_or(SortVizError::Index { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Exchanges two slots under a single write lock. Both indices are
    /// checked before anything moves.
    pub fn swap(&self, i: usize, j: usize) -> Result<()> {
        let mut values = self.write()?;
        let len = values.len();
        for index in [i, j] {
            if index >= len {
                return Err(SortVizError::Index { index, len });
            }
        }
        values.swap(i, j);
        Ok(())
    }

    /// Point-in-time copy of every value.
    pub fn snapshot(&self) -> Result<Vec<u32>> {
        Ok(self.read()?.clone())
    }

    /// Records the indices touched by the latest step.
    pub fn mark(&self, primary: usize, secondary: Option<usize>) {
        self.highlights.set(primary, secondary);
    }

    /// Returns and clears the highlight slots. A second call before the next
    /// [`mark`](Self::mark) yields `(None, None)`.
    pub fn take_highlights(&self) -> (Option<usize>, Option<usize>) {
        self.highlights.take()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<u32>>> {
        self.values
            .read()
            .map_err(|_| SortVizError::msg("array model has been poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<u32>>> {
        self.values
            .write()
            .map_err(|_| SortVizError::msg("array model has been poisoned"))
    }
}

impl std::fmt::Debug for ArrayModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.values.read().map(|values| values.len()).ok();
        f.debug_struct("ArrayModel").field("len", &len).finish()
    }
}

/// Single-shot primary/secondary markers consumed by the renderer.
#[derive(Debug)]
struct Highlights {
    primary: AtomicUsize,
    secondary: AtomicUsize,
}

impl Default for Highlights {
    fn default() -> Self {
        Self {
            primary: AtomicUsize::new(NO_HIGHLIGHT),
            secondary: AtomicUsize::new(NO_HIGHLIGHT),
        }
    }
}

impl Highlights {
    fn set(&self, primary: usize, secondary: Option<usize>) {
        self.secondary
            .store(secondary.unwrap_or(NO_HIGHLIGHT), Ordering::Release);
        self.primary.store(primary, Ordering::Release);
    }

    fn take(&self) -> (Option<usize>, Option<usize>) {
        let primary = self.primary.swap(NO_HIGHLIGHT, Ordering::AcqRel);
        let secondary = self.secondary.swap(NO_HIGHLIGHT, Ordering::AcqRel);
        (slot(primary), slot(secondary))
    }

    fn clear(&self) {
        self.take();
    }
}

fn slot(raw: usize) -> Option<usize> {
    (raw != NO_HIGHLIGHT).then_some(raw)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn reset_fills_within_bounds() {
        let model = ArrayModel::new();
        let mut rng = StdRng::seed_from_u64(3);
        model.reset(200, 10, 480, &mut rng).unwrap();

        let values = model.snapshot().unwrap();
        assert_eq!(values.len(), 200);
        assert!(values.iter().all(|v| (10..=480).contains(v)));
    }

    #[test]
    fn reset_collapses_inverted_range() {
        let model = ArrayModel::new();
        let mut rng = StdRng::seed_from_u64(3);
        model.reset(4, 10, 5, &mut rng).unwrap();
        assert_eq!(model.snapshot().unwrap(), vec![10; 4]);
    }

    #[test]
    fn swap_and_set_reject_out_of_range() {
        let model = ArrayModel::from_values(vec![1, 2, 3]);
        model.swap(0, 2).unwrap();
        assert_eq!(model.snapshot().unwrap(), vec![3, 2, 1]);

        let err = model.swap(1, 3).unwrap_err();
        assert!(matches!(err, SortVizError::Index { index: 3, len: 3 }));
        assert!(model.set(5, 9).is_err());
        assert!(model.get(3).is_err());
        assert_eq!(model.snapshot().unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn highlights_are_read_once() {
        let model = ArrayModel::from_values(vec![1, 2]);
        model.mark(1, Some(0));

        assert_eq!(model.take_highlights(), (Some(1), Some(0)));
        assert_eq!(model.take_highlights(), (None, None));

        model.mark(0, None);
        assert_eq!(model.take_highlights(), (Some(0), None));
    }
}
