//! Circular index arithmetic and slot relocation.
//!
//! All functions here operate modulo the slot count of the backing buffer.
//! The relocation helpers move slots by swapping, so a move never clones or
//! drops an element: destination slots that are not part of the source range
//! must be empty, and their (empty) contents end up in the vacated source
//! slots.

use std::ops::Range;

/// Circularly increments `index`. Requires `index < modulus`.
#[inline]
pub(crate) const fn advance(index: usize, modulus: usize) -> usize {
    let next = index + 1;
    if next >= modulus { 0 } else { next }
}

/// Circularly decrements `index`. Requires `index < modulus`.
#[inline]
pub(crate) const fn retreat(index: usize, modulus: usize) -> usize {
    if index == 0 { modulus - 1 } else { index - 1 }
}

/// Circularly adds `distance` to `index`.
///
/// Requires `index < modulus` and `distance <= modulus`.
#[inline]
pub(crate) const fn advance_by(index: usize, distance: usize, modulus: usize) -> usize {
    let sum = index + distance;
    if sum >= modulus { sum - modulus } else { sum }
}

/// Circularly subtracts `distance` from `index`.
///
/// Requires `index < modulus` and `distance <= modulus`.
#[inline]
pub(crate) const fn retreat_by(index: usize, distance: usize, modulus: usize) -> usize {
    if distance > index {
        index + modulus - distance
    } else {
        index - distance
    }
}

/// Returns the number of forward steps from `from` to `to`.
///
/// `distance_from(i, i)` is 0, which is how an empty range is represented.
#[inline]
pub(crate) const fn distance_from(to: usize, from: usize, modulus: usize) -> usize {
    if to >= from {
        to - from
    } else {
        to + modulus - from
    }
}

/// Splits the circular range `[head, tail)` into at most two contiguous legs.
#[inline]
pub(crate) const fn legs(head: usize, tail: usize, modulus: usize) -> (Range<usize>, Range<usize>) {
    if head <= tail {
        (head..tail, 0..0)
    } else {
        (head..modulus, 0..tail)
    }
}

/// Moves `len` contiguous slots from `source` to `destination`.
///
/// Overlapping ranges are rotated in place; disjoint ranges are swapped.
pub(crate) fn move_slots<T>(slots: &mut [Option<T>], source: usize, destination: usize, len: usize) {
    if len == 0 || source == destination {
        return;
    }
    if source + len <= destination {
        let (low, high) = slots.split_at_mut(destination);
        low[source..source + len].swap_with_slice(&mut high[..len]);
    } else if destination + len <= source {
        let (low, high) = slots.split_at_mut(source);
        low[destination..destination + len].swap_with_slice(&mut high[..len]);
    } else if destination < source {
        slots[destination..source + len].rotate_left(source - destination);
    } else {
        slots[source..destination + len].rotate_right(destination - source);
    }
}

/// Moves the circular run of `len` slots starting at `source` by `distance`
/// slots toward the front (lower circular positions).
///
/// Requires `len + distance <= slots.len()`. The run is processed from its
/// first slot onward, split wherever either the source or the destination
/// crosses the end of the buffer.
pub(crate) fn shift_toward_front<T>(slots: &mut [Option<T>], source: usize, len: usize, distance: usize) {
    let modulus = slots.len();
    let mut moved = 0;
    while moved < len {
        let from = advance_by(source, moved, modulus);
        let to = retreat_by(from, distance, modulus);
        let run = (len - moved).min(modulus - from).min(modulus - to);
        move_slots(slots, from, to, run);
        moved += run;
    }
}

/// Moves the circular run of `len` slots starting at `source` by `distance`
/// slots toward the back (higher circular positions).
///
/// Requires `len + distance <= slots.len()`. The run is processed from its
/// last slot backward.
pub(crate) fn shift_toward_back<T>(slots: &mut [Option<T>], source: usize, len: usize, distance: usize) {
    let modulus = slots.len();
    let mut remaining = len;
    while remaining > 0 {
        let last = advance_by(source, remaining - 1, modulus);
        let last_target = advance_by(last, distance, modulus);
        let run = remaining.min(last + 1).min(last_target + 1);
        move_slots(slots, last + 1 - run, last_target + 1 - run, run);
        remaining -= run;
    }
}

/// Empties every slot of the circular range `[from, to)`.
pub(crate) fn clear_range<T>(slots: &mut [Option<T>], from: usize, to: usize) {
    let (first, second) = legs(from, to, slots.len());
    for slot in &mut slots[first] {
        *slot = None;
    }
    for slot in &mut slots[second] {
        *slot = None;
    }
}
