//! Process-wide observability setup.

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, settings};

/// Install the tracing subscriber and apply request logging settings.
///
/// Must run once, before the server starts accepting requests.
pub(crate) fn init_observability(config: &ServerConfig) -> Result<(), ObservabilityError> {
    settings::apply_runtime_config(&config.observability);

    logging::init_subscriber(&config.logging)
}
