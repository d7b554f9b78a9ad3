use std::time::Instant;

use tdigest::TDigest;

/// Collects the durations of individual recommendation requests, keyed by the
/// number of sounds in the requesting playlist.
#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
    request_durations: Vec<PlaylistSizeDurationMicros>,
}

pub type PlaylistSizeDurationMicros = (u32, f64);

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
            request_durations: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop(&mut self, playlist_size: usize) {
        let duration_as_micros = self.start_time.elapsed().as_micros() as f64;
        self.record(playlist_size, duration_as_micros);
    }

    pub fn record(&mut self, playlist_size: usize, duration_as_micros: f64) {
        self.request_durations
            .push((playlist_size as u32, duration_as_micros));
    }

    pub fn get_n(&self) -> usize {
        self.request_durations.len()
    }

    pub fn get_percentile_in_micros(&self, q: f64) -> f64 {
        let t_digest = TDigest::new_with_size(100);
        let durations = self
            .request_durations
            .iter()
            .map(|measurement| measurement.1)
            .collect();
        let sorted_digest = t_digest.merge_unsorted(durations);
        sorted_digest.estimate_quantile(q)
    }

    pub fn get_raw_durations(&self) -> &[PlaylistSizeDurationMicros] {
        &self.request_durations
    }
}
