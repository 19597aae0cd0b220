//! Pairwise collision detection via a distance-history matrix.
//!
//! For every ordered ball pair the matrix stores the center distance measured
//! at the previous simulation step. A pair counts as *entering* a collision
//! when it is interpenetrating (distance below the radius sum) **and** still
//! approaching (distance below the stored reading). The second condition is
//! what keeps a single approach from producing an impulse on every tick while
//! the balls overlap.
//!
//! This gate is a heuristic stand-in for continuous collision detection and
//! is preserved exactly as specified, known warts included: a pair crossing
//! within one 9 ms step can tunnel through undetected, and a pair whose
//! distance keeps shrinking across ticks (or oscillates near the threshold)
//! can fire more than once per approach. `test_gate_refires_on_monotone_approach`
//! pins that behavior down so it does not get silently "fixed".

use crate::types::constants::DISTANCE_SENTINEL;

/// Last-observed center-to-center distances for every ball pair.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    len: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    /// Matrix for `len` balls, all cells at the sentinel distance.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            distances: vec![DISTANCE_SENTINEL; len * len],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Re-initialize every cell to the sentinel. Called at the start of a
    /// new rack; readings persist across shots within a rack.
    pub fn reset(&mut self) {
        self.distances.fill(DISTANCE_SENTINEL);
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.len + j]
    }

    /// Record `current` for the ordered pair `(i, j)` and report whether the
    /// pair is entering a collision: interpenetrating and still approaching
    /// relative to the previous reading.
    ///
    /// The stored distance is updated unconditionally, whether or not the
    /// gate fires.
    pub fn observe(&mut self, i: usize, j: usize, current: f64, min_distance: f64) -> bool {
        let entering = current < min_distance && current < self.get(i, j);
        self.distances[i * self.len + j] = current;
        entering
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialized_to_sentinel() {
        let matrix = DistanceMatrix::new(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), DISTANCE_SENTINEL);
            }
        }
    }

    #[test]
    fn test_gate_fires_once_on_crafted_sequence() {
        // Combined radius 2.2. Only the 2.0 reading is both below the
        // threshold and closer than the previous reading; 2.5 and 2.3 are
        // not interpenetrating.
        let mut matrix = DistanceMatrix::new(2);
        let readings = [5.0, 3.0, 2.0, 2.5, 2.3];
        let expected = [false, false, true, false, false];
        for (reading, fired) in readings.iter().zip(expected) {
            assert_eq!(
                matrix.observe(0, 1, *reading, 2.2),
                fired,
                "reading {}",
                reading
            );
        }
    }

    #[test]
    fn test_gate_suppresses_receding_overlap() {
        // Below threshold but no longer approaching: must not fire.
        let mut matrix = DistanceMatrix::new(2);
        assert!(matrix.observe(0, 1, 2.0, 2.2));
        assert!(!matrix.observe(0, 1, 2.1, 2.2));
    }

    #[test]
    fn test_gate_refires_on_monotone_approach() {
        // Known limitation of the decreasing-distance heuristic: if the
        // distance keeps shrinking (no response reversed the approach), the
        // gate fires again. Pinned, not fixed.
        let mut matrix = DistanceMatrix::new(2);
        assert!(matrix.observe(0, 1, 2.0, 2.2));
        assert!(matrix.observe(0, 1, 1.8, 2.2));
    }

    #[test]
    fn test_distance_stored_unconditionally() {
        let mut matrix = DistanceMatrix::new(2);
        matrix.observe(0, 1, 7.5, 2.2); // no collision, still recorded
        assert_eq!(matrix.get(0, 1), 7.5);
        // Ordered pairs are independent cells
        assert_eq!(matrix.get(1, 0), DISTANCE_SENTINEL);
    }

    #[test]
    fn test_reset_restores_sentinel() {
        let mut matrix = DistanceMatrix::new(2);
        matrix.observe(0, 1, 1.0, 2.2);
        matrix.reset();
        assert_eq!(matrix.get(0, 1), DISTANCE_SENTINEL);
    }
}
