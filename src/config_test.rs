use super::*;

/// # Safety
/// Env mutation is process-wide; every test that touches these variables
/// lives in this file and restores a clean slate when done.
unsafe fn clear_console_env() {
    unsafe {
        std::env::remove_var("QUEUEDESK_BASE_URL");
        std::env::remove_var("QUEUEDESK_SESSION_FILE");
        std::env::remove_var("QUEUEDESK_SESSION_TTL_SECS");
        std::env::remove_var("QUEUEDESK_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("QUEUEDESK_CONNECT_TIMEOUT_SECS");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_console_env();
        std::env::set_var("QUEUEDESK_SESSION_FILE", "/tmp/qd/session.json");
    }

    let cfg = ConsoleConfig::from_env().unwrap();
    assert_eq!(cfg.api, ApiConfig::default());
    assert_eq!(cfg.session_ttl, Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/qd/session.json"));

    unsafe { clear_console_env() };
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_console_env();
        std::env::set_var("QUEUEDESK_BASE_URL", "https://queue.example.test/api");
        std::env::set_var("QUEUEDESK_SESSION_TTL_SECS", "120");
        std::env::set_var("QUEUEDESK_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("QUEUEDESK_CONNECT_TIMEOUT_SECS", "2");
    }

    let cfg = ConsoleConfig::from_env().unwrap();
    assert_eq!(cfg.api.base_url, "https://queue.example.test/api/");
    assert_eq!(cfg.session_ttl, Duration::from_secs(120));
    assert_eq!(cfg.api.request_timeout, Duration::from_secs(5));
    assert_eq!(cfg.api.connect_timeout, Duration::from_secs(2));

    unsafe { clear_console_env() };
}

#[test]
fn from_env_rejects_unparseable_ttl() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_console_env();
        std::env::set_var("QUEUEDESK_SESSION_TTL_SECS", "an hour");
    }

    let err = ConsoleConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("QUEUEDESK_SESSION_TTL_SECS"));

    unsafe { clear_console_env() };
}

#[test]
fn from_env_rejects_zero_ttl() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_console_env();
        std::env::set_var("QUEUEDESK_SESSION_TTL_SECS", "0");
    }

    assert!(ConsoleConfig::from_env().is_err());

    unsafe { clear_console_env() };
}

#[test]
fn normalize_base_url_appends_single_slash() {
    assert_eq!(normalize_base_url("http://h/api"), "http://h/api/");
    assert_eq!(normalize_base_url("http://h/api///"), "http://h/api/");
    assert_eq!(normalize_base_url(" http://h/api/ "), "http://h/api/");
}

#[test]
fn default_session_file_lives_under_home() {
    assert_eq!(
        default_session_file(Some("/home/desk")),
        PathBuf::from("/home/desk/.queuedesk/session.json")
    );
    assert_eq!(default_session_file(None), PathBuf::from(".queuedesk/session.json"));
    assert_eq!(default_session_file(Some("")), PathBuf::from(".queuedesk/session.json"));
}
