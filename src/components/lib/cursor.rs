use crate::action::localaction::ListAction;

/// Where the cursor of a list with `len` rows lands after `action`. Returns `None` for anything
/// that is not a movement, and for empty lists.
pub fn moved(current: Option<usize>, len: usize, action: ListAction) -> Option<usize> {
    let last = len.checked_sub(1)?;
    match action {
        ListAction::Up => Some(current.map_or(0, |i| i.saturating_sub(1).min(last))),
        ListAction::Down => Some(current.map_or(0, |i| (i + 1).min(last))),
        ListAction::Top => Some(0),
        ListAction::Bottom => Some(last),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_inside_the_list() {
        assert_eq!(moved(Some(2), 3, ListAction::Down), Some(2));
        assert_eq!(moved(Some(0), 3, ListAction::Up), Some(0));
        assert_eq!(moved(None, 3, ListAction::Down), Some(0));
        assert_eq!(moved(Some(7), 3, ListAction::Up), Some(2));
        assert_eq!(moved(Some(0), 3, ListAction::Bottom), Some(2));
        assert_eq!(moved(Some(1), 0, ListAction::Down), None);
        assert_eq!(moved(Some(1), 3, ListAction::Confirm), None);
    }
}
