//! Configuration commands.

use sheetcal_providers::TransportConfig;

use crate::config::{ClientConfig, EndpointOverrides};
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout, with literal secrets masked.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&config.redacted())
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Collects every problem with the effective configuration.
pub fn problems(config: &ClientConfig, overrides: &EndpointOverrides) -> Vec<String> {
    let mut problems = match config.endpoint.to_transport_config(overrides) {
        Ok(transport) => transport.problems(),
        Err(e) => vec![e],
    };

    problems.extend(config.render.problems());
    problems
}

/// Validate the configuration.
///
/// Pushing never requires this to pass; it is for checking ahead of time.
pub fn validate(config: &ClientConfig, overrides: &EndpointOverrides) -> ClientResult<()> {
    let problems = problems(config, overrides);
    if !problems.is_empty() {
        return Err(ClientError::Config(problems.join("; ")));
    }

    if let Ok(transport) = config.endpoint.to_transport_config(overrides) {
        println!("Endpoint: {}", TransportConfig::update_url(&transport));
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.endpoint.base_address = Some("https://cal.example.com".to_string());
        config.endpoint.api_key = Some("k".to_string());
        config
    }

    #[test]
    fn complete_config_is_valid() {
        assert!(problems(&complete(), &EndpointOverrides::default()).is_empty());
        validate(&complete(), &EndpointOverrides::default()).unwrap();
    }

    #[test]
    fn default_config_reports_missing_endpoint() {
        let problems = problems(&ClientConfig::default(), &EndpointOverrides::default());
        assert_eq!(problems.len(), 2);
        assert!(validate(&ClientConfig::default(), &EndpointOverrides::default()).is_err());
    }

    #[test]
    fn overrides_fill_the_gaps() {
        let overrides = EndpointOverrides {
            base_address: Some("https://cal.example.com".to_string()),
            api_key: Some("k".to_string()),
            timeout: None,
        };
        assert!(problems(&ClientConfig::default(), &overrides).is_empty());
    }

    #[test]
    fn inverted_crew_columns_are_reported() {
        let mut config = complete();
        config.render.crew_first_column = 9;
        config.render.crew_last_column = 2;
        let problems = problems(&config, &EndpointOverrides::default());
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("crew_first_column"));
    }

    #[test]
    fn oversized_duration_is_reported() {
        let mut config = complete();
        config.render.duration_hours = u32::MAX;
        let problems = problems(&config, &EndpointOverrides::default());
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("duration_hours"));
        assert!(validate(&config, &EndpointOverrides::default()).is_err());
    }

    #[test]
    fn dump_serializes() {
        dump(&complete()).unwrap();
    }
}
