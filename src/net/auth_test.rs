use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::AUTHORIZATION;

use super::*;
use crate::session::{ManualClock, MemorySessionStore};

fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn pair() -> TokenPair {
    TokenPair { access: "acc-token".to_owned(), refresh: "ref-token".to_owned() }
}

fn make_auth(clock: Arc<ManualClock>, ttl_secs: u64) -> (Arc<MemorySessionStore>, SessionAuth) {
    let store = Arc::new(MemorySessionStore::default());
    let auth = SessionAuth::new(store.clone(), SessionPolicy::new(Duration::from_secs(ttl_secs)), clock);
    (store, auth)
}

fn authorization(auth: &SessionAuth, path: &str) -> Result<Option<String>, ApiError> {
    let request = reqwest::Client::new().get(format!("http://localhost/api/{path}"));
    let request = auth.attach_auth(path, request)?.build().unwrap();
    Ok(request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap().to_owned()))
}

// =============================================================================
// public endpoints
// =============================================================================

#[test]
fn public_endpoint_matching() {
    assert!(is_public_endpoint("users/categories/"));
    assert!(is_public_endpoint("/users/categories/"));
    assert!(is_public_endpoint("auth/token/"));
    assert!(!is_public_endpoint("users/"));
    assert!(!is_public_endpoint("categories/"));
}

#[test]
fn public_endpoint_never_gets_bearer() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (_store, auth) = make_auth(clock, 3600);
    auth.begin(pair()).unwrap();

    assert_eq!(authorization(&auth, "users/categories/").unwrap(), None);
}

// =============================================================================
// attach_auth
// =============================================================================

#[test]
fn live_session_attaches_bearer() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (_store, auth) = make_auth(clock, 3600);
    auth.begin(pair()).unwrap();

    assert_eq!(
        authorization(&auth, "tokens/active/").unwrap().as_deref(),
        Some("Bearer acc-token")
    );
}

#[test]
fn no_session_sends_anonymous_request() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (_store, auth) = make_auth(clock, 3600);

    assert_eq!(authorization(&auth, "tokens/active/").unwrap(), None);
}

#[test]
fn expired_session_is_cleared_and_request_refused() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (store, auth) = make_auth(clock.clone(), 60);
    auth.begin(pair()).unwrap();

    clock.advance(Duration::from_secs(60));
    let err = authorization(&auth, "tokens/active/").unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn activity_does_not_renew_session() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (_store, auth) = make_auth(clock.clone(), 60);
    auth.begin(pair()).unwrap();

    clock.advance(Duration::from_secs(30));
    assert!(authorization(&auth, "tokens/active/").unwrap().is_some());
    clock.advance(Duration::from_secs(30));
    assert!(authorization(&auth, "tokens/active/").is_err());
}

#[test]
fn clear_removes_session() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (store, auth) = make_auth(clock, 3600);
    auth.begin(pair()).unwrap();

    auth.clear();
    assert!(store.load().unwrap().is_none());
    assert!(auth.current().unwrap().is_none());
}

// =============================================================================
// current / remaining
// =============================================================================

#[test]
fn current_hides_and_clears_expired_session() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (store, auth) = make_auth(clock.clone(), 60);
    auth.begin(pair()).unwrap();
    assert!(auth.current().unwrap().is_some());

    clock.advance(Duration::from_secs(90));
    assert!(auth.current().unwrap().is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn remaining_reports_time_left() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (_store, auth) = make_auth(clock.clone(), 60);
    assert_eq!(auth.remaining(), None);

    auth.begin(pair()).unwrap();
    clock.advance(Duration::from_secs(20));
    assert_eq!(auth.remaining(), Some(Duration::from_secs(40)));
}

// =============================================================================
// expiry timer
// =============================================================================

#[tokio::test(start_paused = true)]
async fn expiry_timer_clears_session_after_remaining_ttl() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (store, auth) = make_auth(clock, 3600);
    auth.begin(pair()).unwrap();

    let started = tokio::time::Instant::now();
    spawn_expiry_timer(Arc::new(auth)).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(3600));
    assert!(started.elapsed() < Duration::from_secs(3601));
    assert!(store.load().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn expiry_timer_without_session_exits_immediately() {
    let clock = Arc::new(ManualClock::new(at(1_000)));
    let (_store, auth) = make_auth(clock, 3600);

    let started = tokio::time::Instant::now();
    spawn_expiry_timer(Arc::new(auth)).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);
}
