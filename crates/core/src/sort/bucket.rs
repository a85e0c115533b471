use super::{Step, StepContext};
use crate::StepKind;

/// Value span covered by one bucket.
pub const BUCKET_WIDTH: u32 = 10;

/// Number of buckets needed when the largest value is `max`.
pub fn bucket_count(max: u32) -> usize {
    (max / BUCKET_WIDTH) as usize + 1
}

pub fn bucket_index(value: u32) -> usize {
    (value / BUCKET_WIDTH) as usize
}

/// Distributes into fixed-width buckets, sorts each, and writes them back in
/// ascending bucket order.
pub(super) fn bucket_sort(ctx: &mut StepContext<'_>) -> Step {
    let values = ctx.snapshot()?;
    let Some(&max) = values.iter().max() else {
        return Ok(());
    };

    let mut buckets = vec![Vec::new(); bucket_count(max)];
    for (index, &value) in values.iter().enumerate() {
        ctx.checkpoint()?;
        buckets[bucket_index(value)].push(value);
        ctx.emit_at(StepKind::Compare, index, None)?;
    }

    let mut slot = 0;
    for bucket in &mut buckets {
        bucket.sort();
        for &value in bucket.iter() {
            ctx.checkpoint()?;
            ctx.place(slot, value)?;
            slot += 1;
        }
    }
    Ok(())
}
