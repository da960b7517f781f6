use fibre_inject::{Container, ContainerConfig, LocalOverrides};
use pretty_assertions::assert_eq;

#[test]
fn test_config_defaults_when_fields_are_missing() {
  let config: ContainerConfig = serde_json::from_str("{}").unwrap();
  assert_eq!(config, ContainerConfig::default());
  assert_eq!(config.self_name, "container");
  assert_eq!(config.local_overrides, LocalOverrides::Truthy);
}

#[test]
fn test_config_from_json() {
  let config: ContainerConfig =
    serde_json::from_str(r#"{ "self_name": "injector", "local_overrides": "present" }"#).unwrap();

  assert_eq!(
    config,
    ContainerConfig::new()
      .with_self_name("injector")
      .with_local_overrides(LocalOverrides::Present)
  );
  assert!(Container::with_config(config).is_registered("injector"));
}

#[test]
fn test_unknown_fields_are_rejected() {
  let result = serde_json::from_str::<ContainerConfig>(r#"{ "self": "x" }"#);
  assert!(result.is_err());
}
