use serial_test::serial;

use super::{Settings, load_config};

#[test]
fn default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 3001);
    assert_eq!(settings.server.log_level, "info");
    assert_eq!(settings.relay.max_connections, 1000);
    assert_eq!(settings.relay.max_messages_per_conversation, None);
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    temp_env::with_vars(
        [
            ("SERVER_PORT", Some("4444")),
            ("SERVER_HOST", Some("0.0.0.0")),
        ],
        || {
            let settings = load_config().expect("load config");
            assert_eq!(settings.server.port, 4444);
            assert_eq!(settings.server.host, "0.0.0.0");
            // Untouched values keep their defaults.
            assert_eq!(settings.relay.max_connections, 1000);
        },
    );
}

#[test]
#[serial]
fn file_overrides_defaults() {
    let tmp = tempfile::TempDir::new().expect("create tempdir");
    let orig = std::env::current_dir().expect("current_dir");
    std::env::set_current_dir(tmp.path()).expect("set current dir");

    std::fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [relay]
        max_connections = 10
        max_messages_per_conversation = 500
    "#;
    std::fs::write("config/default.toml", toml).expect("write config file");

    let settings = load_config().expect("load config");
    std::env::set_current_dir(orig).expect("restore current dir");

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.relay.max_messages_per_conversation, Some(500));
}
