use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use fastrace::collector::{Config as FastraceConfig, Reporter, SpanRecord};
use fastrace::prelude::*;
use ustore_types::FunctionStats;

pub const ROOT_SPAN: &str = "ustore";

type Timings = Arc<Mutex<Vec<(String, u64)>>>;

/// Keeps only the short name and duration of each finished span.
struct TimingReporter {
    timings: Timings,
}

impl Reporter for TimingReporter {
    fn report(&mut self, spans: Vec<SpanRecord>) {
        if let Ok(mut timings) = self.timings.lock() {
            timings.extend(
                spans
                    .into_iter()
                    .map(|s| (short_name(&s.name).to_string(), s.duration_ns / 1000)),
            );
        }
    }
}

/// Runs `f` under a root span and returns its result with per-function timings.
pub fn profiled<T>(f: impl FnOnce() -> T) -> (T, Vec<FunctionStats>) {
    let timings = Timings::default();
    fastrace::set_reporter(
        TimingReporter {
            timings: timings.clone(),
        },
        FastraceConfig::default(),
    );

    let result = {
        let root = Span::root(ROOT_SPAN, SpanContext::random());
        let _guard = root.set_local_parent();
        f()
    };

    fastrace::flush();
    let timings = match timings.lock() {
        Ok(mut timings) => std::mem::take(&mut *timings),
        Err(_) => Vec::new(),
    };
    (result, function_stats(timings))
}

fn short_name(name: &str) -> &str {
    let name = name.trim_end_matches("::{{closure}}");
    name.rsplit("::").next().unwrap_or(name)
}

/// One row per function, slowest total first.
fn function_stats(timings: Vec<(String, u64)>) -> Vec<FunctionStats> {
    let mut by_name: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for (name, duration_us) in timings {
        by_name.entry(name).or_default().push(duration_us);
    }

    let mut stats: Vec<FunctionStats> = by_name
        .into_iter()
        .map(|(name, mut durations)| {
            durations.sort_unstable();
            let calls = durations.len();
            let total_us: u64 = durations.iter().sum();
            let p90_idx = (calls * 9).div_ceil(10).saturating_sub(1);
            FunctionStats {
                name,
                calls: calls as u32,
                total_us,
                avg_us: total_us / calls.max(1) as u64,
                p90_us: durations[p90_idx],
                max_us: durations[calls - 1],
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_us.cmp(&a.total_us));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastrace::trace;

    #[trace(name = "traced_step")]
    fn traced_step() {}

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("ustore_store::RecordStore::add"), "add");
        assert_eq!(short_name("ustore::perform::perform::{{closure}}"), "perform");
        assert_eq!(short_name("read_all"), "read_all");
    }

    #[test]
    fn test_function_stats() {
        let timings = vec![
            ("read_all".to_string(), 10),
            ("add".to_string(), 50),
            ("read_all".to_string(), 30),
        ];
        let stats = function_stats(timings);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "add");
        assert_eq!(stats[1].name, "read_all");
        assert_eq!(stats[1].calls, 2);
        assert_eq!(stats[1].total_us, 40);
        assert_eq!(stats[1].avg_us, 20);
        assert_eq!(stats[1].p90_us, 30);
        assert_eq!(stats[1].max_us, 30);
    }

    #[test]
    fn test_root_span_has_its_own_row() {
        let (value, stats) = profiled(|| {
            traced_step();
            traced_step();
            7
        });

        assert_eq!(value, 7);
        let calls = |name: &str| stats.iter().find(|s| s.name == name).map(|s| s.calls);
        assert_eq!(calls(ROOT_SPAN), Some(1));
        assert_eq!(calls("traced_step"), Some(2));
    }
}
