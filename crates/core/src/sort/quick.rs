use super::{Step, StepContext};
use crate::StepKind;

pub(super) fn quick_sort(ctx: &mut StepContext<'_>) -> Step {
    match ctx.len() {
        0 | 1 => Ok(()),
        len => sort_range(ctx, 0, len - 1),
    }
}

fn sort_range(ctx: &mut StepContext<'_>, low: usize, high: usize) -> Step {
    ctx.checkpoint()?;
    if low >= high {
        return Ok(());
    }
    let pivot = partition(ctx, low, high)?;
    if pivot > low {
        sort_range(ctx, low, pivot - 1)?;
    }
    sort_range(ctx, pivot + 1, high)
}

/// Lomuto partition around `values[high]`. Returns the pivot's final slot.
fn partition(ctx: &mut StepContext<'_>, low: usize, high: usize) -> Step<usize> {
    let pivot = ctx.get(high)?;
    let mut boundary = low;
    for j in low..high {
        ctx.checkpoint()?;
        if ctx.get(j)? < pivot {
            ctx.swap(boundary, j)?;
            ctx.emit_at(StepKind::Swap, j, Some(boundary))?;
            boundary += 1;
        }
    }
    ctx.checkpoint()?;
    ctx.swap(boundary, high)?;
    ctx.emit_at(StepKind::Swap, boundary, Some(high))?;
    Ok(boundary)
}
