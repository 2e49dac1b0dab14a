//! Tokio runtime builder.

use std::io::Result;

use tokio::runtime::{Builder as RtBuilder, Runtime};

use crate::config::RuntimeConfig;

pub fn build_runtime(cfg: RuntimeConfig) -> Result<Runtime> {
    let mut builder = match cfg {
        RuntimeConfig::SingleThreaded => RtBuilder::new_current_thread(),
        RuntimeConfig::MultiThreaded { worker_threads } => {
            let mut builder = RtBuilder::new_multi_thread();
            if worker_threads > 0 {
                builder.worker_threads(worker_threads);
            }
            builder
        }
    };

    builder.enable_all().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_flavors_run_futures() {
        for cfg in [RuntimeConfig::SingleThreaded, RuntimeConfig::MultiThreaded { worker_threads: 2 }]
        {
            let rt = build_runtime(cfg).unwrap();
            assert_eq!(rt.block_on(async { 7 }), 7);
        }
    }
}
