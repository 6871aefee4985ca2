//! Keyboard navigation over the visible slots.
//!
//! Pure functions: given the active slot and the visible slots in document
//! order (General then Context), compute where the highlight goes next.
//! Hidden slots never appear in `order`, so they are skipped for free. The
//! active slot itself may be hidden (stale); lookups compare by document
//! position rather than by membership so traversal still resumes from it.

use super::item::SlotRef;

/// What a navigation key should do to the active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Activate(SlotRef),
    /// Fell off the end of the list.
    Deactivate,
    Stay,
}

/// Next visible slot after `current`, or the first one when nothing is active.
pub fn step_down(order: &[SlotRef], current: Option<SlotRef>) -> Step {
    let next = match current {
        None => order.first().copied(),
        Some(cur) => order.iter().copied().find(|s| *s > cur),
    };
    match (next, current) {
        (Some(slot), _) => Step::Activate(slot),
        (None, Some(_)) => Step::Deactivate,
        (None, None) => Step::Stay,
    }
}

/// Previous visible slot before `current`, or the last one when nothing is active.
pub fn step_up(order: &[SlotRef], current: Option<SlotRef>) -> Step {
    let prev = match current {
        None => order.last().copied(),
        Some(cur) => order.iter().rev().copied().find(|s| *s < cur),
    };
    match (prev, current) {
        (Some(slot), _) => Step::Activate(slot),
        (None, Some(_)) => Step::Deactivate,
        (None, None) => Step::Stay,
    }
}

/// Jump between the two groups.
///
/// With nothing active the first visible entry is taken. Otherwise, when
/// the context group has a visible head, a slot before it jumps to it and
/// any slot at or past it jumps back to the general head. Without a
/// visible context head there is nowhere to cycle to.
pub fn tab_jump(
    order: &[SlotRef],
    general_head: Option<SlotRef>,
    context_head: Option<SlotRef>,
    current: Option<SlotRef>,
) -> Step {
    let Some(cur) = current else {
        return order.first().copied().map_or(Step::Stay, Step::Activate);
    };
    let Some(context_head) = context_head else {
        return Step::Stay;
    };
    if cur < context_head {
        Step::Activate(context_head)
    } else {
        general_head.map_or(Step::Stay, Step::Activate)
    }
}

/// The slot to highlight right after the menu is populated.
pub fn first_selection(
    general_head: Option<SlotRef>,
    context_head: Option<SlotRef>,
) -> Option<SlotRef> {
    general_head.or(context_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(i: usize) -> SlotRef {
        SlotRef::general(i)
    }

    fn c(i: usize) -> SlotRef {
        SlotRef::context(i)
    }

    #[test]
    fn down_from_nothing_takes_first() {
        assert_eq!(step_down(&[g(0), g(1), c(0)], None), Step::Activate(g(0)));
    }

    #[test]
    fn down_skips_hidden_slot() {
        // General = [visible, hidden, visible]
        let order = [g(0), g(2)];
        assert_eq!(step_down(&order, Some(g(0))), Step::Activate(g(2)));
    }

    #[test]
    fn down_crosses_into_context() {
        let order = [g(0), g(1), c(0)];
        assert_eq!(step_down(&order, Some(g(1))), Step::Activate(c(0)));
    }

    #[test]
    fn down_falls_off_end() {
        let order = [g(0), c(0)];
        assert_eq!(step_down(&order, Some(c(0))), Step::Deactivate);
    }

    #[test]
    fn down_resumes_from_stale_active() {
        // g(1) was active, then got hidden by a shorter refresh
        let order = [g(0), c(0), c(1)];
        assert_eq!(step_down(&order, Some(g(1))), Step::Activate(c(0)));
    }

    #[test]
    fn down_on_empty_menu_stays() {
        assert_eq!(step_down(&[], None), Step::Stay);
        assert_eq!(step_down(&[], Some(g(0))), Step::Deactivate);
    }

    #[test]
    fn up_from_nothing_takes_last() {
        assert_eq!(step_up(&[g(0), c(0), c(1)], None), Step::Activate(c(1)));
    }

    #[test]
    fn up_skips_hidden_and_crosses_back() {
        let order = [g(0), g(2), c(0)];
        assert_eq!(step_up(&order, Some(c(0))), Step::Activate(g(2)));
        assert_eq!(step_up(&order, Some(g(2))), Step::Activate(g(0)));
    }

    #[test]
    fn up_falls_off_top() {
        assert_eq!(step_up(&[g(0), g(1)], Some(g(0))), Step::Deactivate);
    }

    #[test]
    fn tab_from_nothing_takes_first_entry() {
        let order = [g(0), c(0)];
        assert_eq!(tab_jump(&order, Some(g(0)), Some(c(0)), None), Step::Activate(g(0)));
    }

    #[test]
    fn tab_cycles_between_groups() {
        let order = [g(0), g(1), c(0), c(1)];
        let gh = Some(g(0));
        let ch = Some(c(0));
        assert_eq!(tab_jump(&order, gh, ch, Some(g(1))), Step::Activate(c(0)));
        assert_eq!(tab_jump(&order, gh, ch, Some(c(0))), Step::Activate(g(0)));
        assert_eq!(tab_jump(&order, gh, ch, Some(c(1))), Step::Activate(g(0)));
    }

    #[test]
    fn tab_without_context_stays() {
        let order = [g(0), g(1)];
        assert_eq!(tab_jump(&order, Some(g(0)), None, Some(g(1))), Step::Stay);
    }

    #[test]
    fn tab_back_without_general_stays() {
        let order = [c(0), c(1)];
        assert_eq!(tab_jump(&order, None, Some(c(0)), Some(c(1))), Step::Stay);
    }

    #[test]
    fn first_selection_prefers_general() {
        assert_eq!(first_selection(Some(g(0)), Some(c(0))), Some(g(0)));
        assert_eq!(first_selection(None, Some(c(0))), Some(c(0)));
        assert_eq!(first_selection(None, None), None);
    }
}
