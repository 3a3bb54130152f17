use docquiz::presentation::config::Environment;

#[test]
fn given_known_names_when_parsing_environment_then_accepts_any_case() {
    assert_eq!(Environment::try_from("LOCAL".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from("test".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Prod));
}

#[test]
fn given_unknown_name_when_parsing_environment_then_returns_error() {
    let result = Environment::try_from("staging".to_string());

    assert!(result.unwrap_err().contains("staging"));
}

#[test]
fn given_environment_when_resolving_config_file_then_uses_lowercase_name() {
    assert_eq!(Environment::Prod.config_file(), "appsettings.prod");
    assert_eq!(Environment::Local.to_string(), "local");
}
