use crate::{AppConfig, ConfigError, JwtConfig};
use figment::{
    Figment, Jail,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};

const BASE: &str = r#"
app_name = "bgu-gateway"

[jwt]
secret = "0123456789abcdef0123456789abcdef"
"#;

#[test]
fn test_secret_redaction() {
    let secret = Secret::new("my_secret_password".to_string());
    let debug_output = format!("{:?}", secret);
    assert!(debug_output.contains("Secret([REDACTED"));
    assert!(!debug_output.contains("my_secret_password"));
}

#[test]
fn test_jwt_config_redaction() {
    let config = JwtConfig {
        secret: Secret::new("super-secret-signing-key".to_string()),
        expires_in: 3600,
        issuer: "bgu-erp".to_string(),
        audience: "bgu-erp-api".to_string(),
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("super-secret-signing-key"));
    assert!(debug_output.contains("Secret([REDACTED"));
}

#[test]
fn test_defaults_applied() {
    let config = AppConfig::from_figment(Figment::from(Toml::string(BASE))).unwrap();

    assert_eq!(config.app_env, "development");
    assert!(config.is_development());
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.telemetry.log_level, "info");
    assert!(!config.telemetry.json);
    assert_eq!(config.jwt.expires_in, 3600);
    assert_eq!(config.rbac.auth_timeout_ms, 2000);
    assert!(config.rbac.overrides.is_empty());
}

#[test]
fn test_policy_overrides_parsed() {
    let toml = format!(
        r#"{BASE}
[rbac]
auth_timeout_ms = 500

[[rbac.overrides]]
role = "IMS_QHSE"
module = "sales"
access = "READ"

[[rbac.overrides]]
role = "ADMIN_HR"
module = "reports"
access = "READ"
actions = {{ create = false, read = true, update = false, delete = false }}
"#
    );
    let config = AppConfig::from_figment(Figment::from(Toml::string(&toml))).unwrap();

    assert_eq!(config.rbac.auth_timeout_ms, 500);
    assert_eq!(config.rbac.overrides.len(), 2);
    assert_eq!(config.rbac.overrides[0].role, "IMS_QHSE");
    assert!(config.rbac.overrides[0].actions.is_none());
    assert!(config.rbac.overrides[1].actions.unwrap().read);
}

#[test]
fn test_short_jwt_secret_rejected() {
    let toml = r#"
app_name = "bgu-gateway"

[jwt]
secret = "too-short"
"#;
    let result = AppConfig::from_figment(Figment::from(Toml::string(toml)));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_zero_auth_timeout_rejected() {
    let toml = format!("{BASE}\n[rbac]\nauth_timeout_ms = 0\n");
    let result = AppConfig::from_figment(Figment::from(Toml::string(&toml)));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_missing_jwt_section_is_load_error() {
    let result = AppConfig::from_figment(Figment::from(Toml::string("app_name = \"x\"")));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.set_env("BGU_SERVER__PORT", "9090");
        jail.set_env("BGU_TELEMETRY__JSON", "true");

        let figment = Figment::new()
            .merge(Toml::string(BASE))
            .merge(Env::prefixed("BGU_").split("__"));
        let config = AppConfig::from_figment(figment).map_err(|e| e.to_string())?;

        assert_eq!(config.server.port, 9090);
        assert!(config.telemetry.json);
        assert_eq!(
            config.jwt.secret.expose_secret(),
            "0123456789abcdef0123456789abcdef"
        );
        Ok(())
    });
}
