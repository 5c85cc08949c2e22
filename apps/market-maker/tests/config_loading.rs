//! Configuration loading from YAML files.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::time::Duration;

use market_maker::application::reconciler::Tolerance;
use market_maker::{
    ConfigError, ModelUpdateMode, OrderPipeline, ReconcilerSettings, load_config,
    load_config_from_string,
};
use rust_decimal_macros::dec;

const FULL_CONFIG: &str = r#"
model_state:
  update_mode: ${MARKET_MAKER_IT_UNSET_MODE:-poll}
  fetch_timeout_ms: 2500
  subscribe_timeout_ms: ${MARKET_MAKER_IT_UNSET_SUBSCRIBE:-7000}
health:
  port: 9100
reconciler:
  strategy: tolerance
  price_tolerance:
    relative: "0.001"
  quantity_tolerance:
    absolute: "0.5"
order_chain:
  - name: MinimumQuantityElement
    options:
      minimum_quantity: 1
      remove: true
  - name: round-to-lot-size
  - name: PREVENT_POST_ONLY_CROSSING_BOOK
"#;

#[test]
fn loads_full_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let config = load_config(file.path().to_str()).unwrap();

    assert_eq!(config.model_state.update_mode, ModelUpdateMode::Poll);
    assert_eq!(
        config.model_state.deadlines().fetch,
        Duration::from_millis(2500)
    );
    assert_eq!(
        config.model_state.deadlines().subscribe,
        Duration::from_millis(7000)
    );
    assert_eq!(config.health.port, 9100);
    assert_eq!(
        config.reconciler,
        ReconcilerSettings::Tolerance {
            price_tolerance: Tolerance::Relative(dec!(0.001)),
            quantity_tolerance: Tolerance::Absolute(dec!(0.5)),
        }
    );
    assert_eq!(config.order_chain.len(), 3);

    let pipeline = OrderPipeline::from_config(&config.order_chain, &config.reconciler).unwrap();
    assert_eq!(pipeline.chain().element_names().len(), 3);
    assert_eq!(pipeline.reconciler_name(), "tolerance");
}

#[test]
fn unknown_chain_element_is_rejected_by_name() {
    let err = load_config_from_string("order_chain:\n  - name: teleport\n").unwrap_err();

    assert!(matches!(err, ConfigError::ChainError(_)));
    assert!(err.to_string().contains("teleport"));
}

#[test]
fn element_missing_required_option_is_rejected() {
    let err = load_config_from_string("order_chain:\n  - name: maximum_quantity\n").unwrap_err();

    assert!(err.to_string().contains("maximum_quantity"));
}

#[test]
fn negative_tolerance_is_rejected() {
    let yaml = "reconciler:\n  strategy: tolerance\n  price_tolerance:\n    absolute: \"-1\"\n";
    let err = load_config_from_string(yaml).unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = load_config_from_string("model_state: [unclosed").unwrap_err();

    assert!(matches!(err, ConfigError::ParseError(_)));
}
