use crate::interfaces::input::ServerConfig;

#[test]
fn test_input_empty_document_gives_defaults() {
    let config: ServerConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.bind, "127.0.0.1:8080");
    assert_eq!(config.solver_timeout_secs, Some(300));
    assert_eq!(config.render.grid_size, 64);
    assert_eq!(config.render.batch_grid_size, 48);
    assert_eq!(config.render.margin, 5.0);
    assert_eq!(config.render.molecule, "water");
}

#[test]
fn test_input_partial_overrides() {
    let config: ServerConfig = serde_yaml::from_str(
        r#"
        bind: 0.0.0.0:9000
        solver_timeout_secs: null
        render:
          grid_size: 32
        "#,
    )
    .unwrap();
    assert_eq!(config.bind, "0.0.0.0:9000");
    assert_eq!(config.solver_timeout_secs, None);
    assert_eq!(config.render.grid_size, 32);
    // Unspecified render fields keep their defaults.
    assert_eq!(config.render.batch_grid_size, 48);
    assert_eq!(config.render.margin, 5.0);
}
