//! Directional focus movement over the focusable set.

/// Requested focus movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMove {
    /// Relative move, wrapping at both ends.
    By(isize),
    First,
    Last,
}

/// Stateless focus arithmetic.
pub struct FocusModel;

impl FocusModel {
    /// Index to focus given `count` focusables and the current index.
    ///
    /// Relative moves compute `(i + delta + count) mod count` with `i = -1`
    /// when nothing is focused. Returns `None` only for an empty set.
    pub fn next_index(current: Option<usize>, count: usize, movement: FocusMove) -> Option<usize> {
        if count == 0 {
            return None;
        }

        let index = match movement {
            FocusMove::First => 0,
            FocusMove::Last => count - 1,
            FocusMove::By(delta) => {
                let current = current.filter(|&i| i < count).map_or(-1, |i| i as isize);
                (current + delta).rem_euclid(count as isize) as usize
            }
        };
        Some(index)
    }
}
