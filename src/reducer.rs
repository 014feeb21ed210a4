//! Reducer semantics
//!
//! In-process model of what the generated SQL computes. [`Direction`] is the
//! single source of the comparison used by both the rendered `case` expression
//! and [`combine`], so the model and the migration agree by construction.
//!
//! # Ties
//!
//! `combine_min` keeps the left operand on equal ranking values and
//! `combine_max` keeps the right one. The engine picks the pairing order
//! (and may merge partial aggregates from parallel workers), so among tied
//! candidates the winner is unspecified. It is deterministic only in the
//! sense that equal inputs evaluated the same way give equal results; it is
//! not "first row wins".

use std::fmt;

/// Which extreme of the ranking value an aggregate selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Min, Direction::Max];

    /// Name fragment used in generated object names (`arg_min_int4`)
    pub fn name(self) -> &'static str {
        match self {
            Direction::Min => "min",
            Direction::Max => "max",
        }
    }

    /// Comparison under which the left operand wins
    pub fn sql_operator(self) -> &'static str {
        match self {
            Direction::Min => "<=",
            Direction::Max => ">",
        }
    }

    /// Adjective for documentation strings
    pub fn extreme(self) -> &'static str {
        match self {
            Direction::Min => "minimal",
            Direction::Max => "maximal",
        }
    }

    /// Rust rendition of [`Direction::sql_operator`]
    pub fn prefers_left(self, left: i64, right: i64) -> bool {
        match self {
            Direction::Min => left <= right,
            Direction::Max => left > right,
        }
    }

    /// Aggregate name for a type, e.g. `arg_max_int8`
    pub fn aggregate_name(self, type_name: &str) -> String {
        format!("arg_{}_{}", self.name(), type_name)
    }

    /// Reducer function name for a type, e.g. `arg_min_agg_numeric`
    pub fn reducer_name(self, type_name: &str) -> String {
        format!("arg_{}_agg_{}", self.name(), type_name)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate `(arg, value)` pair
///
/// `arg == None` is the "no candidate yet" marker; its `value` is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedValue<T> {
    pub arg: Option<T>,
    pub value: i64,
}

impl<T> RankedValue<T> {
    pub fn new(arg: T, value: i64) -> Self {
        Self {
            arg: Some(arg),
            value,
        }
    }

    pub fn empty() -> Self {
        Self {
            arg: None,
            value: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.arg.is_none()
    }

    /// Whether two values are interchangeable as aggregation results: both
    /// empty, or both present with the same ranking value.
    pub fn same_rank(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => self.value == other.value,
            _ => false,
        }
    }
}

/// Combine two candidates
pub fn combine<T>(direction: Direction, a: RankedValue<T>, b: RankedValue<T>) -> RankedValue<T> {
    if a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }
    if direction.prefers_left(a.value, b.value) {
        a
    } else {
        b
    }
}

pub fn combine_min<T>(a: RankedValue<T>, b: RankedValue<T>) -> RankedValue<T> {
    combine(Direction::Min, a, b)
}

pub fn combine_max<T>(a: RankedValue<T>, b: RankedValue<T>) -> RankedValue<T> {
    combine(Direction::Max, a, b)
}

/// Finalizer: the winning argument
pub fn project<T>(value: RankedValue<T>) -> Option<T> {
    value.arg
}

/// Sequential aggregation
///
/// Mirrors a strict transition function without an initial condition: the
/// first row becomes the state, and an empty group yields `None`.
pub fn aggregate<T, I>(direction: Direction, rows: I) -> Option<T>
where
    I: IntoIterator<Item = RankedValue<T>>,
{
    reduce(direction, rows).and_then(project)
}

/// Aggregation over independently reduced partitions
///
/// Each partition is folded on its own, then the partial states are merged
/// with the same reducer, like the engine's parallel aggregate plan.
pub fn aggregate_partitioned<T, P, I>(direction: Direction, partitions: P) -> Option<T>
where
    P: IntoIterator<Item = I>,
    I: IntoIterator<Item = RankedValue<T>>,
{
    let partials = partitions
        .into_iter()
        .filter_map(|rows| reduce(direction, rows));
    reduce(direction, partials).and_then(project)
}

fn reduce<T, I>(direction: Direction, rows: I) -> Option<RankedValue<T>>
where
    I: IntoIterator<Item = RankedValue<T>>,
{
    rows.into_iter()
        .fold(None, |state, row| match state {
            None => Some(row),
            Some(state) => Some(combine(direction, state, row)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RankedValue<i32>> {
        vec![
            RankedValue::new(1, 5),
            RankedValue::new(2, 3),
            RankedValue::new(3, 3),
        ]
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(Direction::Min.aggregate_name("int4"), "arg_min_int4");
        assert_eq!(Direction::Max.reducer_name("numeric"), "arg_max_agg_numeric");
        assert_eq!(Direction::Max.to_string(), "max");
    }

    #[test]
    fn test_min_with_tie_never_picks_loser() {
        let winner = aggregate(Direction::Min, rows()).unwrap();
        assert!(winner == 2 || winner == 3);

        let mut reversed = rows();
        reversed.reverse();
        let winner = aggregate(Direction::Min, reversed).unwrap();
        assert!(winner == 2 || winner == 3);
    }

    #[test]
    fn test_tie_keeps_left_for_min_and_right_for_max() {
        let a = RankedValue::new("a", 1);
        let b = RankedValue::new("b", 1);
        assert_eq!(combine_min(a.clone(), b.clone()).arg, Some("a"));
        assert_eq!(combine_max(a, b).arg, Some("b"));
    }

    #[test]
    fn test_empty_group_is_null() {
        let none: Vec<RankedValue<i64>> = vec![];
        assert_eq!(aggregate(Direction::Max, none.clone()), None);
        assert_eq!(aggregate(Direction::Min, none), None);
    }

    #[test]
    fn test_single_row() {
        let row = vec![RankedValue::new(7, 10)];
        assert_eq!(aggregate(Direction::Min, row.clone()), Some(7));
        assert_eq!(aggregate(Direction::Max, row), Some(7));
    }

    #[test]
    fn test_rows_with_null_arg_are_skipped() {
        let rows = vec![
            RankedValue { arg: None, value: -100 },
            RankedValue::new(4, 8),
            RankedValue { arg: None, value: 100 },
        ];
        assert_eq!(aggregate(Direction::Min, rows.clone()), Some(4));
        assert_eq!(aggregate(Direction::Max, rows), Some(4));
    }

    #[test]
    fn test_only_null_args_project_to_null() {
        let rows: Vec<RankedValue<i32>> = vec![RankedValue { arg: None, value: 1 }];
        assert_eq!(aggregate(Direction::Min, rows), None);
    }

    #[test]
    fn test_partitioned_matches_extreme() {
        let partitions = vec![
            vec![RankedValue::new(10, 4), RankedValue::new(11, 9)],
            vec![],
            vec![RankedValue::new(12, -2), RankedValue::new(13, 30)],
        ];
        assert_eq!(
            aggregate_partitioned(Direction::Min, partitions.clone()),
            Some(12)
        );
        assert_eq!(aggregate_partitioned(Direction::Max, partitions), Some(13));
    }
}
