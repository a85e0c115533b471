use rand::Rng;

use super::{Step, StepContext};
use crate::StepKind;

/// Swaps two uniformly drawn slots until a scan finds no inversion.
///
/// The swap is not aimed at the inversion that was found, so there is no
/// bound on how long this takes.
pub(super) fn random_sort(ctx: &mut StepContext<'_>) -> Step {
    let len = ctx.len();
    while first_inversion(ctx)?.is_some() {
        ctx.checkpoint()?;
        let i = ctx.rng().gen_range(0..len);
        let j = ctx.rng().gen_range(0..len);
        ctx.swap(i, j)?;
        ctx.emit_at(StepKind::Swap, i, Some(j))?;
    }
    Ok(())
}

fn first_inversion(ctx: &mut StepContext<'_>) -> Step<Option<usize>> {
    for i in 0..ctx.len().saturating_sub(1) {
        ctx.checkpoint()?;
        ctx.emit_at(StepKind::Compare, i, Some(i + 1))?;
        if ctx.get(i)? > ctx.get(i + 1)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}
