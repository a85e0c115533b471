use super::{Step, StepContext};
use crate::StepKind;

/// Shift-right insertion with a held key.
///
/// A stop observed while shifting leaves the key out of the array, with its
/// slot temporarily duplicated by the shifted neighbour. The stopped array is
/// then no longer a permutation of the input.
pub(super) fn insertion_sort(ctx: &mut StepContext<'_>) -> Step {
    for i in 1..ctx.len() {
        ctx.checkpoint()?;
        let key = ctx.get(i)?;
        let mut hole = i;
        while hole > 0 {
            ctx.checkpoint()?;
            let previous = ctx.get(hole - 1)?;
            if previous <= key {
                break;
            }
            ctx.set(hole, previous)?;
            ctx.emit_at(StepKind::Place, hole, Some(hole - 1))?;
            hole -= 1;
        }
        ctx.checkpoint()?;
        ctx.place(hole, key)?;
    }
    Ok(())
}
