// Logging Configuration Tests

use bridge_resilience::{LogFormat, LoggingConfig};

#[test]
fn default_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, "pretty");
    assert!(config.file_path.is_none());
}

#[test]
fn log_format_parsing() {
    assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert!("xml".parse::<LogFormat>().is_err());
}

#[test]
fn config_round_trips_through_serde() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: "json".to_string(),
        include_targets: true,
        enable_colors: false,
        env_filter: Some("bridge_resilience=trace".to_string()),
        file_path: None,
    };

    let serialized = serde_json::to_string(&config).unwrap();
    let restored: LoggingConfig = serde_json::from_str(&serialized).unwrap();
    assert_eq!(restored.level, "debug");
    assert_eq!(restored.format, "json");
    assert!(restored.include_targets);
}
