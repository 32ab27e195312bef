//! Dispatch files and settings loaded from disk.

use std::io::Write;
use std::path::PathBuf;

use dispatch_emulator::config::{load_config, loader_for, ConfigError, DispatchLoader};
use dispatch_emulator::lifecycle::build_dispatcher;
use dispatch_emulator::routing::Dispatcher;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn settings_for(dispatch_file: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
dispatch_file = {path:?}

[listener]
bind_address = "127.0.0.1:0"

[services]
default = "localhost:8081"
mobile-frontend = "localhost:8082"
static-backend = "http://localhost:8083"
"#,
        path = fixture(dispatch_file).display().to_string()
    )
    .unwrap();
    file
}

fn assert_sample_routing(dispatcher: &Dispatcher) {
    let cases = [
        ("simple-sample.appspot.com", "/", Some("default")),
        ("simple-sample.appspot.com", "/favicon.ico", Some("default")),
        ("other.example.com", "/favicon.ico", Some("default")),
        ("simple-sample.appspot.com", "/mobile/", Some("mobile-frontend")),
        ("other.example.com", "/mobile/index.html", Some("mobile-frontend")),
        ("other.example.com", "/work/queue", Some("static-backend")),
        ("other.example.com", "/", None),
        ("simple-sample.appspot.com", "/register", Some("default")),
    ];
    for (host, path, expected) in cases {
        let actual = dispatcher.dispatch(host, path).map(|s| s.name());
        assert_eq!(actual, expected, "{host}{path}");
    }
}

#[test]
fn yaml_and_xml_load_the_same_rules() {
    let yaml = loader_for(&fixture("dispatch.yaml")).unwrap().load().unwrap();
    let xml = loader_for(&fixture("dispatch.xml")).unwrap().load().unwrap();

    let yaml: Vec<(String, String)> = yaml
        .iter()
        .map(|r| (r.matcher.pattern().to_string(), r.service_name.clone()))
        .collect();
    let xml: Vec<(String, String)> = xml
        .iter()
        .map(|r| (r.matcher.pattern().to_string(), r.service_name.clone()))
        .collect();
    assert_eq!(yaml.len(), 4);
    assert_eq!(yaml, xml);
    assert_eq!(yaml[2], ("*/mobile/*".to_string(), "mobile-frontend".to_string()));
}

#[test]
fn settings_with_yaml_dispatch_file() {
    let settings = settings_for("dispatch.yaml");
    let config = load_config(settings.path()).unwrap();
    let dispatcher = build_dispatcher(&config).unwrap();
    assert_eq!(dispatcher.services().len(), 3);
    assert_sample_routing(&dispatcher);
}

#[test]
fn settings_with_xml_dispatch_file() {
    let settings = settings_for("dispatch.xml");
    let config = load_config(settings.path()).unwrap();
    let dispatcher = build_dispatcher(&config).unwrap();
    assert_sample_routing(&dispatcher);
}

#[test]
fn missing_dispatch_file_is_an_io_error() {
    let err = loader_for(&fixture("absent.yaml")).unwrap().load().unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn invalid_pattern_in_file_aborts_load() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "dispatch:\n  - url: \"*/ok/*\"\n    service: default\n  - url: \"*/a/*/b\"\n    service: default\n"
    )
    .unwrap();

    let err = loader_for(file.path()).unwrap().load().unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, ConfigError::Pattern(_)));
    assert!(msg.contains("*/a/*/b"), "{msg}");
}
