//! ## stapel-telemetry::metrics
//! **Prometheus counters for allocation traffic**
//!
//! Pull-model recorder: the caller bridges arena events into the
//! counters and renders the registry on demand. The arena itself never
//! touches these; instrumentation must not change allocation behavior.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub allocations_total: Counter,
    pub alloc_failures_total: Counter,
    pub resets_total: Counter,
    pub allocation_bytes: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let allocations_total =
            Counter::new("stapel_allocations_total", "Successful arena allocations").unwrap();
        let alloc_failures_total = Counter::new(
            "stapel_alloc_failures_total",
            "Allocations rejected for lack of capacity",
        )
        .unwrap();
        let resets_total = Counter::new("stapel_resets_total", "Arena resets").unwrap();

        let allocation_bytes = Histogram::with_opts(
            HistogramOpts::new("stapel_allocation_bytes", "Requested allocation sizes")
                .buckets(vec![16.0, 64.0, 256.0, 1024.0, 4096.0, 16384.0]),
        )
        .unwrap();

        registry.register(Box::new(allocations_total.clone())).unwrap();
        registry
            .register(Box::new(alloc_failures_total.clone()))
            .unwrap();
        registry.register(Box::new(resets_total.clone())).unwrap();
        registry.register(Box::new(allocation_bytes.clone())).unwrap();

        Self {
            registry,
            allocations_total,
            alloc_failures_total,
            resets_total,
            allocation_bytes,
        }
    }

    pub fn observe_allocation(&self, size: usize) {
        self.allocations_total.inc();
        self.allocation_bytes.observe(size as f64);
    }

    pub fn inc_alloc_failures(&self) {
        self.alloc_failures_total.inc();
    }

    pub fn inc_resets(&self) {
        self.resets_total.inc();
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_all_counters() {
        let metrics = MetricsRecorder::new();
        metrics.observe_allocation(128);
        metrics.inc_alloc_failures();
        metrics.inc_resets();

        let rendered = metrics.gather_metrics().unwrap();
        assert!(rendered.contains("stapel_allocations_total 1"));
        assert!(rendered.contains("stapel_alloc_failures_total 1"));
        assert!(rendered.contains("stapel_resets_total 1"));
        assert!(rendered.contains("stapel_allocation_bytes"));
    }
}
