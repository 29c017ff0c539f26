//! Silent-gap annotations between adjacent pages.
//!
//! The reading UI flips to the next page at the gap midpoint, so the page
//! turn lands in silence rather than on the first syllable of the next page.

use crate::output::{Page, TransitionInfo};

/// Recompute `transition_info` for every page from the current page order.
///
/// A page gets an annotation when the silence before the next page exceeds
/// `min_gap_secs`; every other page (including the last) has it cleared.
/// Page times are never changed.
pub fn annotate_transitions(pages: &mut [Page], min_gap_secs: f64) {
    let next_starts: Vec<Option<f64>> = pages
        .iter()
        .skip(1)
        .map(|p| Some(p.start_time))
        .chain(std::iter::once(None))
        .collect();

    for (page, next_start) in pages.iter_mut().zip(next_starts) {
        page.transition_info = next_start.and_then(|next_start| {
            let gap = next_start - page.end_time;
            (gap > min_gap_secs).then(|| TransitionInfo {
                gap_start_time: page.end_time,
                gap_end_time: next_start,
                gap_midpoint_time: round_millis(page.end_time + gap / 2.0),
            })
        });
    }
}

fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::WordTimestamp;
    use crate::pipeline::assemble::build_page;

    fn page_at(idx: usize, start: f64, end: f64) -> Page {
        build_page(&[WordTimestamp::new("w.", start, end, idx as i64)], idx, idx)
    }

    #[test]
    fn annotates_gaps_above_threshold() {
        let mut pages = vec![page_at(0, 0.0, 1.0), page_at(1, 1.25, 2.0), page_at(2, 2.005, 3.0)];
        annotate_transitions(&mut pages, 0.01);

        let t = pages[0].transition_info.expect("gap of 250ms");
        assert_eq!(t.gap_start_time, 1.0);
        assert_eq!(t.gap_end_time, 1.25);
        assert_eq!(t.gap_midpoint_time, 1.125);

        assert!(pages[1].transition_info.is_none(), "5ms gap is below threshold");
        assert!(pages[2].transition_info.is_none(), "last page has no successor");
        assert_eq!(pages[1].start_time, 1.25);
    }

    #[test]
    fn midpoint_rounds_to_milliseconds() {
        let mut pages = vec![page_at(0, 0.0, 0.3333), page_at(1, 0.5, 1.0)];
        annotate_transitions(&mut pages, 0.01);
        assert_eq!(pages[0].transition_info.unwrap().gap_midpoint_time, 0.417);
    }

    #[test]
    fn stale_annotations_are_cleared() {
        let mut pages = vec![page_at(0, 0.0, 1.0), page_at(1, 2.0, 3.0)];
        annotate_transitions(&mut pages, 0.01);
        assert!(pages[0].transition_info.is_some());

        pages.truncate(1);
        annotate_transitions(&mut pages, 0.01);
        assert!(pages[0].transition_info.is_none());
    }

    #[test]
    fn overlapping_pages_get_no_transition() {
        let mut pages = vec![page_at(0, 0.0, 1.0), page_at(1, 0.9, 2.0)];
        annotate_transitions(&mut pages, 0.01);
        assert!(pages[0].transition_info.is_none());
    }
}
