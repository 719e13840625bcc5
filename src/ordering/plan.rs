//! Pure position arithmetic for dense `1..N` collections
//!
//! Nothing in here touches storage. Each planner looks at a snapshot of the
//! collection and returns the writes needed to reach the next dense state;
//! [`OrderedCollection`](super::OrderedCollection) applies them.

use crate::core::Orderable;
use std::cmp::Ordering;
use uuid::Uuid;

/// One pending position write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub id: Uuid,
    pub from: i64,
    pub to: i64,
}

/// Display order: position first, then creation time, then id for a stable tie-break
pub fn compare_position<T: Orderable>(a: &T, b: &T) -> Ordering {
    a.order()
        .cmp(&b.order())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(&b.id()))
}

pub fn sort_by_position<T: Orderable>(records: &mut [T]) {
    records.sort_by(compare_position);
}

/// Insert position in `[1, len + 1]`; no preference appends.
pub fn clamp_insert(desired: Option<i64>, len: usize) -> i64 {
    let upper = len as i64 + 1;
    desired.unwrap_or(upper).clamp(1, upper)
}

/// Target position for a move in `[1, len]`.
pub fn clamp_move(desired: i64, len: usize) -> i64 {
    desired.clamp(1, (len as i64).max(1))
}

/// Every record at or after `position` slides up by one.
pub fn plan_insert<T: Orderable>(records: &[T], position: i64) -> Vec<Shift> {
    records
        .iter()
        .filter(|r| r.order() >= position)
        .map(|r| Shift {
            id: r.id(),
            from: r.order(),
            to: r.order() + 1,
        })
        .collect()
}

/// Writes that move `target` from `from` to `to`, including the target itself.
///
/// Moving toward the head bumps `[to, from)` up by one; moving toward the
/// tail pulls `(from, to]` down by one. Equal positions produce no writes.
pub fn plan_move<T: Orderable>(records: &[T], target: Uuid, from: i64, to: i64) -> Vec<Shift> {
    if from == to {
        return Vec::new();
    }

    let mut shifts: Vec<Shift> = records
        .iter()
        .filter(|r| r.id() != target)
        .filter_map(|r| {
            let order = r.order();
            let next = if to < from && (to..from).contains(&order) {
                order + 1
            } else if to > from && order > from && order <= to {
                order - 1
            } else {
                return None;
            };
            Some(Shift {
                id: r.id(),
                from: order,
                to: next,
            })
        })
        .collect();

    shifts.push(Shift {
        id: target,
        from,
        to,
    });
    shifts
}

/// Records after the removed position close the gap.
pub fn plan_remove<T: Orderable>(records: &[T], removed: i64) -> Vec<Shift> {
    records
        .iter()
        .filter(|r| r.order() > removed)
        .map(|r| Shift {
            id: r.id(),
            from: r.order(),
            to: r.order() - 1,
        })
        .collect()
}

/// Rewrite every record whose position deviates from its rank.
///
/// `records` must already be sorted with [`sort_by_position`].
pub fn plan_normalize<T: Orderable>(records: &[T]) -> Vec<Shift> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, r)| {
            let rank = index as i64 + 1;
            (r.order() != rank).then(|| Shift {
                id: r.id(),
                from: r.order(),
                to: rank,
            })
        })
        .collect()
}

/// Apply shifts to an in-memory snapshot.
pub fn apply<T: Orderable>(records: &mut [T], shifts: &[Shift]) {
    for shift in shifts {
        if let Some(record) = records.iter_mut().find(|r| r.id() == shift.id) {
            record.set_order(shift.to);
        }
    }
}

/// Whether positions are exactly `{1..N}`.
pub fn is_dense<T: Orderable>(records: &[T]) -> bool {
    let mut orders: Vec<i64> = records.iter().map(Orderable::order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(index, order)| *order == index as i64 + 1)
}
