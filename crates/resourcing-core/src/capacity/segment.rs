//! Prefix-sum index over capacity days.
//!
//! Each capacity day contributes one half-open segment `[start, end)` of the
//! assignee's hour axis. Segments are contiguous and strictly increasing, so
//! an hour offset maps to a date with one binary search.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CapacityDay;

/// Hour range contributed by one capacity day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacitySegment {
    pub date: NaiveDate,
    pub start_hour: f64,
    pub end_hour: f64,
    /// Capacity of the day itself
    pub available_hours: f64,
}

impl CapacitySegment {
    /// Length of `[start, end)` that falls inside this segment.
    pub fn overlap(&self, start: f64, end: f64) -> f64 {
        (end.min(self.end_hour) - start.max(self.start_hour)).max(0.0)
    }
}

/// Ordered segments covering `[0, total_hours)` without gaps.
#[derive(Debug, Clone, Default)]
pub struct SegmentIndex {
    segments: Vec<CapacitySegment>,
}

impl SegmentIndex {
    /// Build the index. Days without positive capacity are skipped.
    pub fn new(days: &[CapacityDay]) -> Self {
        let mut running = 0.0;
        let segments = days
            .iter()
            .filter(|d| d.available_hours > 0.0)
            .map(|d| {
                let start_hour = running;
                running += d.available_hours;
                CapacitySegment {
                    date: d.date,
                    start_hour,
                    end_hour: running,
                    available_hours: d.available_hours,
                }
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[CapacitySegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn total_hours(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end_hour)
    }

    /// Index of the segment whose `[start, end)` contains `hour`.
    ///
    /// Upper-bound search on segment ends. `None` once `hour` reaches the
    /// total capacity.
    pub fn locate(&self, hour: f64) -> Option<usize> {
        let hour = hour.max(0.0);
        let idx = self.segments.partition_point(|s| s.end_hour <= hour);
        (idx < self.segments.len()).then_some(idx)
    }

    /// Date that absorbs hour offset `hour`.
    ///
    /// Offsets beyond the calendar clamp to the last capacity day.
    pub fn date_at(&self, hour: f64) -> Option<NaiveDate> {
        match self.locate(hour) {
            Some(idx) => Some(self.segments[idx].date),
            None => self.segments.last().map(|s| s.date),
        }
    }

    /// Capacity available on days up to and including `date`.
    pub fn hours_through(&self, date: NaiveDate) -> f64 {
        let idx = self.segments.partition_point(|s| s.date <= date);
        match idx {
            0 => 0.0,
            n => self.segments[n - 1].end_hour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, hours: f64) -> CapacityDay {
        CapacityDay {
            date: NaiveDate::from_ymd_opt(2026, 3, d).unwrap(),
            available_hours: hours,
        }
    }

    #[test]
    fn segments_are_contiguous_prefix_sums() {
        let index = SegmentIndex::new(&[day(2, 8.0), day(3, 4.0), day(4, 8.0)]);
        let segs = index.segments();
        assert_eq!(segs.len(), 3);
        assert_eq!((segs[0].start_hour, segs[0].end_hour), (0.0, 8.0));
        assert_eq!((segs[1].start_hour, segs[1].end_hour), (8.0, 12.0));
        assert_eq!((segs[2].start_hour, segs[2].end_hour), (12.0, 20.0));
        assert_eq!(index.total_hours(), 20.0);
    }

    #[test]
    fn zero_days_are_skipped() {
        let index = SegmentIndex::new(&[day(2, 0.0), day(3, 6.0)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.segments()[0].start_hour, 0.0);
    }

    #[test]
    fn locate_uses_half_open_ranges() {
        let index = SegmentIndex::new(&[day(2, 8.0), day(3, 4.0)]);
        assert_eq!(index.locate(0.0), Some(0));
        assert_eq!(index.locate(7.999), Some(0));
        assert_eq!(index.locate(8.0), Some(1));
        assert_eq!(index.locate(11.5), Some(1));
        assert_eq!(index.locate(12.0), None);
        assert_eq!(index.locate(-3.0), Some(0));
    }

    #[test]
    fn date_at_clamps_overflow_to_last_day() {
        let index = SegmentIndex::new(&[day(2, 8.0), day(3, 4.0)]);
        assert_eq!(index.date_at(100.0), Some(day(3, 0.0).date));
        assert_eq!(SegmentIndex::default().date_at(0.0), None);
    }

    #[test]
    fn hours_through_accumulates_by_date() {
        let index = SegmentIndex::new(&[day(3, 8.0), day(4, 4.0), day(6, 8.0)]);
        assert_eq!(index.hours_through(day(2, 0.0).date), 0.0);
        assert_eq!(index.hours_through(day(3, 0.0).date), 8.0);
        assert_eq!(index.hours_through(day(5, 0.0).date), 12.0);
        assert_eq!(index.hours_through(day(30, 0.0).date), 20.0);
    }

    #[test]
    fn overlap_is_clipped_to_segment() {
        let seg = SegmentIndex::new(&[day(2, 8.0), day(3, 8.0)]).segments()[1];
        assert_eq!(seg.overlap(4.0, 12.0), 4.0);
        assert_eq!(seg.overlap(0.0, 8.0), 0.0);
        assert_eq!(seg.overlap(10.0, 30.0), 6.0);
    }
}
