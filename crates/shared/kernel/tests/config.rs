use charachat_kernel::config::{ConfigError, load_config};
use charachat_kernel::domain::config::ApiConfig;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_a_partial_tree_over_defaults() {
    let file = write_config(
        r#"
        [server]
        port = 9000

        [database]
        url = "surrealkv://data/charachat"

        [records]
        heal_on_read = false

        [security.kdf]
        iterations = 3
        "#,
    );

    let config: ApiConfig = load_config(Some(file.path())).expect("config loads");

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.database.url, "surrealkv://data/charachat");
    assert_eq!(config.database.namespace, "charachat");
    assert!(!config.records.heal_on_read);
    assert_eq!(config.security.kdf.iterations, 3);
    assert_eq!(config.security.kdf.memory_kib, 19_456);
    assert!(config.security.session.secure);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = load_config::<ApiConfig>(Some(dir.path().join("absent.toml")));

    let err = result.expect_err("missing file must fail");
    assert!(matches!(err, ConfigError::Config { .. }));
}

#[test]
fn mistyped_values_are_rejected() {
    let file = write_config("[server]\nport = \"not a port\"\n");
    assert!(load_config::<ApiConfig>(Some(file.path())).is_err());
}
