use super::{Step, StepContext};
use crate::StepKind;

pub(super) fn selection_sort(ctx: &mut StepContext<'_>) -> Step {
    let len = ctx.len();
    for i in 0..len.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..len {
            ctx.checkpoint()?;
            if ctx.get(j)? < ctx.get(min)? {
                min = j;
            }
            ctx.emit_at(StepKind::Compare, j, Some(min))?;
        }
        ctx.checkpoint()?;
        ctx.swap(i, min)?;
        ctx.emit_at(StepKind::Swap, i, Some(min))?;
    }
    Ok(())
}
