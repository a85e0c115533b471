use super::{Step, StepContext};
use crate::StepKind;

/// Adjacent-pair passes; the sorted tail grows by one slot per pass.
pub(super) fn bubble_sort(ctx: &mut StepContext<'_>) -> Step {
    let len = ctx.len();
    for pass in 0..len.saturating_sub(1) {
        for j in 0..len - pass - 1 {
            ctx.checkpoint()?;
            ctx.emit_at(StepKind::Compare, j + 1, Some(j))?;
            if ctx.get(j)? > ctx.get(j + 1)? {
                ctx.checkpoint()?;
                ctx.swap(j, j + 1)?;
                ctx.emit_at(StepKind::Swap, j, Some(j + 1))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        sort::tests::{kinds, run_sort},
        Algorithm, StepKind,
    };

    #[test]
    fn sorts_the_reference_input() {
        let sorted = run_sort(Algorithm::Bubble, &[5, 3, 8, 1], 0);
        assert_eq!(sorted.values, vec![1, 3, 5, 8]);

        use StepKind::*;
        assert_eq!(
            kinds(&sorted.events),
            vec![
                Compare, Swap, Compare, Compare, Swap, // pass 0
                Compare, Compare, Swap, // pass 1
                Compare, Swap, // pass 2
                Finalize, Finalize, Finalize, Finalize,
            ]
        );
        let swaps: Vec<_> = sorted
            .events
            .iter()
            .filter(|event| event.kind == Swap)
            .map(|event| (event.primary, event.value))
            .collect();
        assert_eq!(swaps, vec![(0, 3), (2, 1), (1, 1), (0, 1)]);
    }

    #[test]
    fn equal_neighbours_are_never_swapped() {
        let sorted = run_sort(Algorithm::Bubble, &[4, 4, 4], 0);
        assert!(sorted.events.iter().all(|event| event.kind != StepKind::Swap));
    }
}
