//! Tracing setup for tests.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::HarnessSettings;

/// Installs a test-friendly tracing subscriber.
///
/// `RUST_LOG` wins over `settings.log_filter`. Output goes through the test
/// writer so it is captured per test. Returns `false` if a global subscriber
/// was already installed, which is expected when many tests call this.
pub fn init_test_tracing(settings: &HarnessSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_a_no_op() {
        let settings = HarnessSettings::default();
        init_test_tracing(&settings);

        assert!(!init_test_tracing(&settings));
    }
}
