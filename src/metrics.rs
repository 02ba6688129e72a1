#[cfg(feature = "metrics")]
mod prom {
    use lazy_static::lazy_static;
    use prometheus::{
        register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
    };

    lazy_static! {
        static ref FRAGMENTS_SCANNED: IntCounter = register_int_counter!(
            "fragments_scanned_total",
            "Total number of stream fragments fed to the boundary scanner"
        )
        .expect("fragments_scanned_total registers once");
        static ref OBJECTS_EMITTED: IntCounter = register_int_counter!(
            "objects_emitted_total",
            "Total number of decoded objects handed to callers"
        )
        .expect("objects_emitted_total registers once");
        static ref DECODE_FAILURES: IntCounter = register_int_counter!(
            "decode_failures_total",
            "Total number of completed objects the decoder rejected"
        )
        .expect("decode_failures_total registers once");
        static ref PENDING_OBJECTS: IntGauge = register_int_gauge!(
            "pending_objects",
            "Completed objects scanned but not yet delivered"
        )
        .expect("pending_objects registers once");
    }

    pub(crate) fn record_fragment() {
        FRAGMENTS_SCANNED.inc();
    }

    pub(crate) fn record_object() {
        OBJECTS_EMITTED.inc();
    }

    pub(crate) fn record_decode_failure() {
        DECODE_FAILURES.inc();
    }

    pub(crate) fn set_pending(pending: usize) {
        PENDING_OBJECTS.set(i64::try_from(pending).unwrap_or(i64::MAX));
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather_metrics() -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        let metric_families = prometheus::gather();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(feature = "metrics")]
pub use prom::gather_metrics;
#[cfg(feature = "metrics")]
pub(crate) use prom::{record_decode_failure, record_fragment, record_object, set_pending};

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_fragment() {}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_object() {}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_decode_failure() {}

#[cfg(not(feature = "metrics"))]
pub(crate) fn set_pending(_pending: usize) {}
