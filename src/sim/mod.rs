pub mod batch;
pub mod driver;
pub mod metrics;
pub mod policy;
pub mod trace;
pub mod workload;

pub use batch::{Batch, Mode};
pub use driver::{Outcome, Run, Sim, simulate};
pub use metrics::{AggregateMetrics, ProcessMetrics};
pub use policy::{Policy, PolicyKind, PolicySpec};
pub use trace::Trace;
pub use workload::{ProcessFacts, ProcessSpec, Workload};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{ProcessSpec, Workload};

    pub fn workload(specs: &[(&str, i64, i64)]) -> Workload {
        Workload::new(
            specs
                .iter()
                .map(|&(name, arrival, service)| ProcessSpec::new(name, arrival, service)),
        )
        .expect("test workload must be valid")
    }
}
