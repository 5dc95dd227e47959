//! "Find the best item" scans behind keyboard navigation.
//!
//! A scan walks the items in list order and keeps a running best. Each
//! [`Heuristic`] decides whether a candidate beats the best so far, given
//! the item the move starts from and the recorded arrow start point.

use std::cmp::Ordering;

use super::compare::{
    cmp_point, compare_horizontal_first, compare_vertical, compare_vertical_first,
    compare_with_start_column, compare_with_start_row, CmpPoint,
};
use super::keyboard::Direction;
use crate::models::{Icon, IconId, IconRegistry};
use crate::source::IconSource;

/// Admissibility rule of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    LeftmostInTopRow,
    /// Compares rows only; which item of the top row wins depends on list
    /// order.
    RightmostInTopRow,
    RightmostInBottomRow,
    SameRowRightSideLeftmost,
    SameRowLeftSideRightmost,
    NextRowLeftmost,
    NextRowRightmost,
    PreviousRowRightmost,
    SameColumnAboveLowest,
    SameColumnBelowHighest,
    /// Nearest item inside the 90 degree cone around the arrow direction.
    ClosestIn90Degrees,
}

/// Where the current arrow move started, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowStart {
    pub point: CmpPoint,
    pub direction: Direction,
}

/// Read-only view of the registry for one navigation step.
pub struct Navigator<'a> {
    registry: &'a IconRegistry,
    source: &'a dyn IconSource,
    arrow: Option<ArrowStart>,
}

/// Mutable state of a single scan.
#[derive(Debug, Default)]
struct ScanState {
    best_distance: i64,
}

impl<'a> Navigator<'a> {
    pub fn new(registry: &'a IconRegistry, source: &'a dyn IconSource) -> Self {
        Self {
            registry,
            source,
            arrow: None,
        }
    }

    pub fn with_arrow_start(mut self, arrow: ArrowStart) -> Self {
        self.arrow = Some(arrow);
        self
    }

    /// Best item other than `start`.
    pub fn find_best(&self, start: Option<IconId>, heuristic: Heuristic) -> Option<IconId> {
        self.scan(start, heuristic, false)
    }

    /// Best selected item other than `start`.
    pub fn find_best_selected(&self, start: Option<IconId>, heuristic: Heuristic) -> Option<IconId> {
        self.scan(start, heuristic, true)
    }

    fn scan(&self, start: Option<IconId>, heuristic: Heuristic, selected_only: bool) -> Option<IconId> {
        let start_icon = start.and_then(|id| self.registry.get(id));
        let mut state = ScanState::default();
        let mut best: Option<(IconId, &Icon)> = None;

        for (id, candidate) in self.registry.iter() {
            if Some(id) == start || (selected_only && !candidate.is_selected()) {
                continue;
            }
            if self.is_better(heuristic, &mut state, start_icon, best.map(|(_, icon)| icon), candidate) {
                best = Some((id, candidate));
            }
        }

        best.map(|(id, _)| id)
    }

    fn is_better(
        &self,
        heuristic: Heuristic,
        state: &mut ScanState,
        start: Option<&Icon>,
        best: Option<&Icon>,
        candidate: &Icon,
    ) -> bool {
        let hf = |a: &Icon, b: &Icon| compare_horizontal_first(self.source, a, b);
        let vf = |a: &Icon, b: &Icon| compare_vertical_first(self.source, a, b);
        let row = |icon: &Icon| match self.arrow {
            Some(arrow) => compare_with_start_row(arrow.point.y, icon),
            None => Ordering::Equal,
        };
        let column = |icon: &Icon| match self.arrow {
            Some(arrow) => compare_with_start_column(arrow.point.x, icon),
            None => Ordering::Equal,
        };

        match heuristic {
            Heuristic::LeftmostInTopRow => best.map_or(true, |best| vf(best, candidate).is_gt()),
            Heuristic::RightmostInTopRow => {
                best.map_or(true, |best| compare_vertical(best, candidate).is_gt())
            }
            Heuristic::RightmostInBottomRow => best.map_or(true, |best| vf(best, candidate).is_lt()),

            Heuristic::SameRowRightSideLeftmost => {
                let Some(start) = start else { return false };
                row(candidate).is_eq()
                    && !best.is_some_and(|best| hf(best, candidate).is_lt())
                    && hf(candidate, start).is_gt()
            }
            Heuristic::SameRowLeftSideRightmost => {
                let Some(start) = start else { return false };
                row(candidate).is_eq()
                    && !best.is_some_and(|best| hf(best, candidate).is_gt())
                    && hf(candidate, start).is_lt()
            }

            // Rows below the start compare Less, rows above Greater
            Heuristic::NextRowLeftmost => {
                row(candidate).is_lt()
                    && best.map_or(true, |best| {
                        vf(best, candidate).is_gt() || hf(best, candidate).is_gt()
                    })
            }
            Heuristic::NextRowRightmost => {
                row(candidate).is_lt()
                    && best.map_or(true, |best| {
                        vf(best, candidate).is_gt() || hf(best, candidate).is_lt()
                    })
            }
            Heuristic::PreviousRowRightmost => {
                row(candidate).is_gt()
                    && best.map_or(true, |best| {
                        vf(best, candidate).is_lt() || hf(best, candidate).is_lt()
                    })
            }

            Heuristic::SameColumnAboveLowest => {
                let Some(start) = start else { return false };
                column(candidate).is_eq()
                    && !best.is_some_and(|best| vf(best, candidate).is_gt())
                    && vf(candidate, start).is_lt()
            }
            Heuristic::SameColumnBelowHighest => {
                let Some(start) = start else { return false };
                column(candidate).is_eq()
                    && !best.is_some_and(|best| vf(best, candidate).is_lt())
                    && vf(candidate, start).is_gt()
            }

            Heuristic::ClosestIn90Degrees => {
                let Some(arrow) = self.arrow else { return false };
                let point = cmp_point(candidate);
                let dx = point.x - arrow.point.x;
                let dy = point.y - arrow.point.y;

                let outside_cone = match arrow.direction {
                    Direction::Up => dy > 0 || dx.abs() > dy.abs(),
                    Direction::Down => dy < 0 || dx.abs() > dy.abs(),
                    Direction::Left => dx > 0 || dy.abs() > dx.abs(),
                    Direction::Right => dx < 0 || dy.abs() > dx.abs(),
                };
                if outside_cone {
                    return false;
                }

                let distance = dx * dx + dy * dy;
                if best.is_none() || distance < state.best_distance {
                    state.best_distance = distance;
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntrinsicSize, ItemKey};
    use crate::source::UniformSource;

    /// 40x40 label-less items at the given positions.
    fn grid(keys: &[(&str, f64, f64)]) -> (IconRegistry, Vec<IconId>) {
        let mut registry = IconRegistry::new();
        let ids = keys
            .iter()
            .map(|(key, x, y)| {
                let id = registry
                    .insert(ItemKey::from(*key), IntrinsicSize::new(40.0, 40.0, 40.0))
                    .unwrap();
                registry.get_mut(id).unwrap().set_position(*x, *y);
                id
            })
            .collect();
        (registry, ids)
    }

    /// ```text
    /// a b c
    /// d e f
    /// ```
    fn standard_grid() -> (IconRegistry, Vec<IconId>) {
        grid(&[
            ("a", 0.0, 0.0),
            ("b", 80.0, 0.0),
            ("c", 160.0, 0.0),
            ("d", 0.0, 80.0),
            ("e", 80.0, 80.0),
            ("f", 160.0, 80.0),
        ])
    }

    fn arrow_from(registry: &IconRegistry, id: IconId, direction: Direction) -> ArrowStart {
        ArrowStart {
            point: cmp_point(registry.get(id).unwrap()),
            direction,
        }
    }

    #[test]
    fn test_extremes() {
        let (registry, ids) = standard_grid();
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source);
        assert_eq!(nav.find_best(None, Heuristic::LeftmostInTopRow), Some(ids[0]));
        assert_eq!(nav.find_best(None, Heuristic::RightmostInBottomRow), Some(ids[5]));
        // Row-only comparison keeps the first item of the top row
        assert_eq!(nav.find_best(None, Heuristic::RightmostInTopRow), Some(ids[0]));
    }

    #[test]
    fn test_same_row_neighbours() {
        let (registry, ids) = standard_grid();
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[1], Direction::Right));
        assert_eq!(nav.find_best(Some(ids[1]), Heuristic::SameRowRightSideLeftmost), Some(ids[2]));
        assert_eq!(nav.find_best(Some(ids[1]), Heuristic::SameRowLeftSideRightmost), Some(ids[0]));
    }

    #[test]
    fn test_row_wraparound() {
        let (registry, ids) = standard_grid();
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[2], Direction::Right));
        assert_eq!(nav.find_best(Some(ids[2]), Heuristic::SameRowRightSideLeftmost), None);
        assert_eq!(nav.find_best(Some(ids[2]), Heuristic::NextRowLeftmost), Some(ids[3]));
        assert_eq!(nav.find_best(Some(ids[2]), Heuristic::NextRowRightmost), Some(ids[5]));

        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[3], Direction::Left));
        assert_eq!(nav.find_best(Some(ids[3]), Heuristic::PreviousRowRightmost), Some(ids[2]));
    }

    #[test]
    fn test_same_column() {
        let (registry, ids) = standard_grid();
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[1], Direction::Down));
        assert_eq!(nav.find_best(Some(ids[1]), Heuristic::SameColumnBelowHighest), Some(ids[4]));

        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[4], Direction::Up));
        assert_eq!(nav.find_best(Some(ids[4]), Heuristic::SameColumnAboveLowest), Some(ids[1]));
        assert_eq!(nav.find_best(Some(ids[1]), Heuristic::SameColumnAboveLowest), None);
    }

    #[test]
    fn test_closest_in_cone() {
        let (registry, ids) = grid(&[
            ("a", 0.0, 0.0),
            ("far", 300.0, 20.0),
            ("near", 120.0, 60.0),
            ("steep", 10.0, 200.0),
        ]);
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[0], Direction::Right));
        assert_eq!(nav.find_best(Some(ids[0]), Heuristic::ClosestIn90Degrees), Some(ids[2]));

        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[0], Direction::Left));
        assert_eq!(nav.find_best(Some(ids[0]), Heuristic::ClosestIn90Degrees), None);
    }

    #[test]
    fn test_selected_only_scan() {
        let (mut registry, ids) = standard_grid();
        registry.set_selected(ids[1], true);
        registry.set_selected(ids[4], true);
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source);
        assert_eq!(nav.find_best_selected(None, Heuristic::RightmostInBottomRow), Some(ids[4]));
        assert_eq!(nav.find_best_selected(None, Heuristic::LeftmostInTopRow), Some(ids[1]));
    }

    #[test]
    fn test_empty_and_single_registry() {
        let registry = IconRegistry::new();
        let source = UniformSource::default();
        let nav = Navigator::new(&registry, &source);
        assert_eq!(nav.find_best(None, Heuristic::LeftmostInTopRow), None);

        let (registry, ids) = grid(&[("solo", 0.0, 0.0)]);
        let nav = Navigator::new(&registry, &source)
            .with_arrow_start(arrow_from(&registry, ids[0], Direction::Down));
        for heuristic in [
            Heuristic::SameColumnBelowHighest,
            Heuristic::NextRowRightmost,
            Heuristic::ClosestIn90Degrees,
        ] {
            assert_eq!(nav.find_best(Some(ids[0]), heuristic), None);
        }
    }
}
