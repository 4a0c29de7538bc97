// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2025 Cornell University
// released under BSD 3-Clause License

use crate::value::Value;
use crate::{Result, WaveDbError};
use std::fmt::{Debug, Formatter};

/// Simulation time as recorded in the wave file.
pub type Time = u64;

/// One recorded change: the signal takes `value` at `time`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueChange {
    pub time: Time,
    pub value: Value,
}

/// Append-only, time-ordered log of the value changes of one id code.
///
/// A timeline is created empty when the first variable with its id code is
/// declared and only ever grows. Times are non-decreasing; several changes may
/// share a time (delta cycles), in which case the last entry wins for point
/// queries.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    width: u32,
    changes: Vec<ValueChange>,
}

impl Debug for Timeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Timeline({} bits, {} changes)",
            self.width,
            self.changes.len()
        )
    }
}

impl Timeline {
    pub(crate) fn new(width: u32) -> Self {
        Timeline {
            width,
            changes: Vec::new(),
        }
    }

    /// Declared bit width of the signal(s) recorded here.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Time of the first recorded change.
    pub fn first_time(&self) -> Option<Time> {
        self.changes.first().map(|c| c.time)
    }

    /// Time of the last recorded change.
    pub fn last_time(&self) -> Option<Time> {
        self.changes.last().map(|c| c.time)
    }

    /// Appends a change at `time`.
    ///
    /// Times must be non-decreasing; a time below the last recorded one fails
    /// with [`WaveDbError::OutOfOrderTimestamp`] and leaves the timeline
    /// untouched. Appending at the current last time is legal and shadows the
    /// earlier entry for point queries.
    pub fn append(&mut self, time: Time, value: Value) -> Result<()> {
        if let Some(last) = self.last_time() {
            if time < last {
                return Err(WaveDbError::OutOfOrderTimestamp { last, time });
            }
        }
        self.changes.push(ValueChange { time, value });
        Ok(())
    }

    /// Returns the value in effect at `time`: the value of the last change
    /// with a time at or before `time`. Before the first change (this
    /// includes all negative times) the conventional unknown value for the
    /// timeline's width is returned.
    pub fn value_at(&self, time: i64) -> Value {
        let Ok(time) = Time::try_from(time) else {
            return Value::unknown(self.width);
        };
        match self.changes.first() {
            None => Value::unknown(self.width),
            Some(first) if first.time > time => Value::unknown(self.width),
            _ => {
                let mut idx = last_index_at_or_before(&self.changes, time);
                // several changes can share a time, the last one wins
                while idx + 1 < self.changes.len() && self.changes[idx + 1].time <= time {
                    idx += 1;
                }
                self.changes[idx].value.clone()
            }
        }
    }

    /// Iterates over all recorded changes in time order.
    pub fn iter_changes(&self) -> std::slice::Iter<'_, ValueChange> {
        self.changes.iter()
    }

    /// Iterates over the changes with `start <= time <= end_inclusive` in
    /// time order. Inverted or entirely negative ranges yield an empty
    /// iterator.
    pub fn changes_in_range(
        &self,
        start: i64,
        end_inclusive: i64,
    ) -> std::slice::Iter<'_, ValueChange> {
        let slice = match Time::try_from(end_inclusive) {
            Err(_) => &self.changes[0..0],
            Ok(end) => {
                let start = Time::try_from(start).unwrap_or(0);
                if start > end {
                    &self.changes[0..0]
                } else {
                    let lo = self.changes.partition_point(|c| c.time < start);
                    let hi = self.changes.partition_point(|c| c.time <= end);
                    &self.changes[lo..hi]
                }
            }
        };
        slice.iter()
    }
}

/// Finds the index of a change with a time that is the same or less than the
/// needle. The changes must be sorted by time and are required to contain at
/// least one entry at or before the needle. Essentially implements a binary
/// search!
fn last_index_at_or_before(changes: &[ValueChange], needle: Time) -> usize {
    debug_assert!(!changes.is_empty(), "empty timeline");
    let mut lower_idx = 0usize;
    let mut upper_idx = changes.len() - 1;
    while lower_idx <= upper_idx {
        let mid_idx = lower_idx + ((upper_idx - lower_idx) / 2);

        match changes[mid_idx].time.cmp(&needle) {
            std::cmp::Ordering::Less => {
                lower_idx = mid_idx + 1;
            }
            std::cmp::Ordering::Equal => {
                return mid_idx;
            }
            std::cmp::Ordering::Greater => {
                upper_idx = mid_idx - 1;
            }
        }
    }
    lower_idx - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BitValue;

    fn bit(value: char) -> Value {
        Value::Scalar(BitValue::from_char(value).unwrap())
    }

    fn clk_timeline() -> Timeline {
        let mut t = Timeline::new(1);
        t.append(0, bit('0')).unwrap();
        t.append(5, bit('1')).unwrap();
        t.append(10, bit('0')).unwrap();
        t
    }

    #[test]
    fn test_value_at() {
        let t = clk_timeline();
        assert_eq!(t.value_at(-1), bit('x'));
        assert_eq!(t.value_at(0), bit('0'));
        assert_eq!(t.value_at(3), bit('0'));
        assert_eq!(t.value_at(5), bit('1'));
        assert_eq!(t.value_at(7), bit('1'));
        assert_eq!(t.value_at(10), bit('0'));
        assert_eq!(t.value_at(1000), bit('0'));
    }

    #[test]
    fn test_value_before_first_change() {
        let mut t = Timeline::new(1);
        assert_eq!(t.value_at(0), bit('x'));
        t.append(4, bit('1')).unwrap();
        assert_eq!(t.value_at(3), bit('x'));
        assert_eq!(t.value_at(4), bit('1'));

        let wide = Timeline::new(8);
        assert_eq!(wide.value_at(0), Value::unknown(8));
    }

    #[test]
    fn test_duplicate_times_last_wins() {
        let mut t = Timeline::new(1);
        t.append(2, bit('0')).unwrap();
        t.append(2, bit('1')).unwrap();
        t.append(2, bit('z')).unwrap();
        assert_eq!(t.value_at(2), bit('z'));
        assert_eq!(t.value_at(3), bit('z'));
        assert_eq!(t.changes_in_range(2, 2).count(), 3);
    }

    #[test]
    fn test_out_of_order_append_is_rejected() {
        let mut t = clk_timeline();
        let err = t.append(7, bit('1')).unwrap_err();
        assert!(matches!(
            err,
            WaveDbError::OutOfOrderTimestamp { last: 10, time: 7 }
        ));
        // the failed append must not modify the log
        assert_eq!(t.len(), 3);
        assert_eq!(t.last_time(), Some(10));
    }

    #[test]
    fn test_changes_in_range() {
        let t = clk_timeline();
        let times: Vec<Time> = t.changes_in_range(1, 10).map(|c| c.time).collect();
        assert_eq!(times, [5, 10]);
        assert_eq!(t.changes_in_range(0, 100).count(), 3);
        assert_eq!(t.changes_in_range(6, 9).count(), 0);
        assert_eq!(t.changes_in_range(10, 5).count(), 0);
        assert_eq!(t.changes_in_range(-5, -1).count(), 0);
        // negative start is clamped, the iterator restarts from scratch
        let iter = t.changes_in_range(-5, 5);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_empty_and_populated() {
        let mut t = Timeline::new(1);
        assert!(t.is_empty());
        assert_eq!(t.first_time(), None);
        t.append(0, bit('1')).unwrap();
        assert!(!t.is_empty());
        assert_eq!(t.first_time(), Some(0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// reference implementation: linear scan for the last change at or before `time`
        fn value_at_linear(changes: &[(Time, bool)], time: i64, width: u32) -> Value {
            let mut result = Value::unknown(width);
            for (t, v) in changes.iter() {
                if i64::try_from(*t).unwrap() <= time {
                    result = Value::Scalar(BitValue::from(*v));
                }
            }
            result
        }

        fn sorted_changes() -> impl Strategy<Value = Vec<(Time, bool)>> {
            prop::collection::vec((0u64..200, any::<bool>()), 0..50).prop_map(|mut changes| {
                changes.sort_by_key(|(t, _)| *t);
                changes
            })
        }

        proptest! {
            #[test]
            fn prop_times_non_decreasing(changes in sorted_changes()) {
                let mut timeline = Timeline::new(1);
                for (time, value) in changes.iter() {
                    timeline.append(*time, Value::Scalar(BitValue::from(*value))).unwrap();
                }
                let times: Vec<Time> = timeline.iter_changes().map(|c| c.time).collect();
                let mut sorted = times.clone();
                sorted.sort_unstable();
                prop_assert_eq!(times, sorted);
            }

            #[test]
            fn prop_value_at_matches_linear_scan(
                changes in sorted_changes(),
                query in -10i64..250,
            ) {
                let mut timeline = Timeline::new(1);
                for (time, value) in changes.iter() {
                    timeline.append(*time, Value::Scalar(BitValue::from(*value))).unwrap();
                }
                prop_assert_eq!(
                    timeline.value_at(query),
                    value_at_linear(&changes, query, 1)
                );
            }
        }
    }
}
