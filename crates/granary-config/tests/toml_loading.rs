//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment, Jail,
};
use granary_config::GranaryConfig;

#[test]
fn loads_full_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[fetch]
max_attempts = 3
backoff_secs = 1.5
timeout_secs = 2.5

[harvest]
per_page = 50
sort = "downloads"
page_delay_secs = 2.0
detail_delay_secs = 0.25
enrich = false

[output]
dir = "snapshots"
auto_commit = true
commit_message = "nightly snapshot"

[report]
size = 25
"#,
        )?;

        let config: GranaryConfig = Figment::from(Serialized::defaults(GranaryConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.backoff_secs, 1.5);
        assert_eq!(config.fetch.timeout_secs, 2.5);
        assert_eq!(config.harvest.per_page, 50);
        assert_eq!(config.harvest.sort, "downloads");
        assert_eq!(config.harvest.page_delay_secs, 2.0);
        assert!(!config.harvest.enrich);
        assert_eq!(config.output.dir, "snapshots");
        assert!(config.output.auto_commit);
        assert_eq!(config.output.commit_message, "nightly snapshot");
        assert_eq!(config.report.size, 25);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults_for_the_rest() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[output]
dir = "elsewhere"
"#,
        )?;

        let config: GranaryConfig = Figment::from(Serialized::defaults(GranaryConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.output.dir, "elsewhere");
        assert_eq!(config.fetch.max_attempts, 7);
        assert_eq!(config.harvest.per_page, 100);
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("GRANARY_OUTPUT__DIR", "from-env");

        jail.create_file(
            "config.toml",
            r#"
[output]
dir = "from-toml"
auto_commit = true
"#,
        )?;

        let config: GranaryConfig = Figment::from(Serialized::defaults(GranaryConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("GRANARY_").split("__"))
            .extract()?;

        // Env should win over TOML
        assert_eq!(config.output.dir, "from-env");
        // TOML value not overridden by env should remain
        assert!(config.output.auto_commit);
        Ok(())
    });
}

#[test]
fn env_var_overrides_default() {
    Jail::expect_with(|jail| {
        jail.set_env("GRANARY_HARVEST__PER_PAGE", "25");
        jail.set_env("GRANARY_FETCH__BACKOFF_SECS", "0.5");

        // No TOML file -- just defaults + env
        let config: GranaryConfig = Figment::from(Serialized::defaults(GranaryConfig::default()))
            .merge(Env::prefixed("GRANARY_").split("__"))
            .extract()?;

        assert_eq!(config.harvest.per_page, 25);
        assert_eq!(config.fetch.backoff_secs, 0.5);
        Ok(())
    });
}
