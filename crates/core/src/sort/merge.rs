use super::{Step, StepContext};

pub(super) fn merge_sort(ctx: &mut StepContext<'_>) -> Step {
    match ctx.len() {
        0 | 1 => Ok(()),
        len => sort_range(ctx, 0, len - 1),
    }
}

fn sort_range(ctx: &mut StepContext<'_>, left: usize, right: usize) -> Step {
    ctx.checkpoint()?;
    if left >= right {
        return Ok(());
    }
    let mid = (left + right) / 2;
    sort_range(ctx, left, mid)?;
    sort_range(ctx, mid + 1, right)?;
    merge(ctx, left, mid, right)
}

/// Merges `[left, mid]` and `[mid + 1, right]`, taking from the left run on
/// ties. Every written slot is reported.
///
/// Both runs are copied out before writing, so a stop part-way through leaves
/// the range holding duplicates of already merged values while the rest
/// survive only in the copies.
fn merge(ctx: &mut StepContext<'_>, left: usize, mid: usize, right: usize) -> Step {
    let lower = (left..=mid).map(|i| ctx.get(i)).collect::<Step<Vec<_>>>()?;
    let upper = (mid + 1..=right)
        .map(|i| ctx.get(i))
        .collect::<Step<Vec<_>>>()?;

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < lower.len() && j < upper.len() {
        ctx.checkpoint()?;
        let value = if lower[i] <= upper[j] {
            i += 1;
            lower[i - 1]
        } else {
            j += 1;
            upper[j - 1]
        };
        ctx.place(k, value)?;
        k += 1;
    }

    for &value in lower[i..].iter().chain(&upper[j..]) {
        ctx.checkpoint()?;
        ctx.place(k, value)?;
        k += 1;
    }
    Ok(())
}
