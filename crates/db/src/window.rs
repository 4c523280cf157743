use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use units_core::{WindowRequest, WindowRow};

use crate::Db;
use crate::error::Result;

impl Db {
    /// Sums the requested field per window across `[start, stop)`.
    ///
    /// Each row is labelled with the closing instant of its window, so the
    /// window covering `start` is reported at `start_of(start) + every`.
    /// Empty windows are emitted with `value: None` when `create_empty` is
    /// set and dropped otherwise.
    pub fn aggregate_window(&self, request: &WindowRequest<'_>) -> Result<Vec<WindowRow>> {
        if request.stop <= request.start {
            return Ok(Vec::new());
        }
        let window = request.window;
        let mut sums: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for (ts, value) in self.load_points(request.field, request.start, request.stop)? {
            *sums.entry(window.start_of(ts)).or_insert(0.0) += value;
        }

        let mut rows = Vec::new();
        let mut window_start = window.start_of(request.start);
        while window_start < request.stop {
            let window_stop = window.every.advance(window_start, 1);
            match sums.get(&window_start) {
                Some(sum) => rows.push(WindowRow {
                    time: window_stop,
                    value: Some(*sum),
                }),
                None if request.create_empty => rows.push(WindowRow {
                    time: window_stop,
                    value: None,
                }),
                None => {}
            }
            window_start = window_stop;
        }
        Ok(rows)
    }
}
