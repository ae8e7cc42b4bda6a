use crate::interfaces::cli::{log_configuration, log_heading};
use crate::interfaces::input::ServerConfig;
use crate::presets::PresetRegistry;

#[test]
fn test_cli_log_configuration_both_timeout_branches() {
    let registry = PresetRegistry::standard();
    let mut config = ServerConfig::default();
    log_heading();
    log_configuration(&config, &registry);
    config.solver_timeout_secs = None;
    log_configuration(&config, &registry);
}
