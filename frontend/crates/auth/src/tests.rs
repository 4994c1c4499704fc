//! Session-layer scenario tests
//!
//! Drive the gateway, resolver, guard and dispatcher together against an
//! in-memory identity provider and storage.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use kernel::id::NavigationId;
use platform::crypto::to_base64_url;
use platform::storage::{DurableStore, MemoryStore};

use crate::application::config::PhoneNormalization;
use crate::domain::entity::session::SessionTokens;
use crate::domain::port::{
    IdentityProvider, Navigator, ProviderError, ProviderResult, ProviderTokens, SignUpOutcome,
    SignUpRequest, UserAttribute,
};
use crate::domain::value_object::subject_id::SubjectId;
use crate::*;

// ============================================================================
// Fakes
// ============================================================================

#[derive(Clone, Copy, Default)]
enum Refresh {
    #[default]
    Succeed,
    Reject,
    Unreachable,
}

#[derive(Clone, Copy, Default)]
enum SignOut {
    #[default]
    Succeed,
    Fail,
    Hang,
}

#[derive(Default)]
struct FakeProvider {
    role_claim: Option<&'static str>,
    login_error: Option<&'static str>,
    confirm_error: Option<&'static str>,
    refresh_role: Option<&'static str>,
    refresh: Refresh,
    sign_out: SignOut,
    calls: Mutex<Vec<&'static str>>,
    sign_ups: Mutex<Vec<Vec<UserAttribute>>>,
}

impl FakeProvider {
    fn with_role(role: &'static str) -> Self {
        Self {
            role_claim: Some(role),
            ..Default::default()
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

fn fake_id_token(role: Option<&str>, exp: i64) -> String {
    let payload = match role {
        Some(role) => format!(r#"{{"sub":"user-1","exp":{exp},"custom:role":"{role}"}}"#),
        None => format!(r#"{{"sub":"user-1","exp":{exp}}}"#),
    };
    format!(
        "{}.{}.sig",
        to_base64_url(br#"{"alg":"RS256"}"#),
        to_base64_url(payload.as_bytes())
    )
}

fn fake_tokens(role: Option<&str>, refresh: Option<&str>) -> ProviderTokens {
    let exp = (Utc::now() + chrono::Duration::hours(1)).timestamp();
    ProviderTokens {
        access_token: "access-token".to_string(),
        id_token: fake_id_token(role, exp),
        refresh_token: refresh.map(str::to_string),
        expires_in_secs: 3600,
    }
}

impl IdentityProvider for FakeProvider {
    async fn sign_up(&self, request: &SignUpRequest) -> ProviderResult<SignUpOutcome> {
        self.record("sign_up");
        self.sign_ups.lock().unwrap().push(request.attributes.clone());
        Ok(SignUpOutcome {
            user_sub: "user-1".to_string(),
            confirmed: false,
            delivery_destination: Some("u***@x.com".to_string()),
        })
    }

    async fn confirm_sign_up(&self, _username: &str, _code: &str) -> ProviderResult<()> {
        self.record("confirm_sign_up");
        match self.confirm_error {
            Some(code) => Err(ProviderError::service(code, "rejected")),
            None => Ok(()),
        }
    }

    async fn resend_confirmation_code(&self, _username: &str) -> ProviderResult<()> {
        self.record("resend_confirmation_code");
        Ok(())
    }

    async fn initiate_auth(&self, _username: &str, _password: &str) -> ProviderResult<ProviderTokens> {
        self.record("initiate_auth");
        match self.login_error {
            Some(code) => Err(ProviderError::service(code, "rejected")),
            None => Ok(fake_tokens(self.role_claim, Some("refresh-token"))),
        }
    }

    async fn refresh_tokens(&self, _refresh_token: &str) -> ProviderResult<ProviderTokens> {
        self.record("refresh_tokens");
        match self.refresh {
            Refresh::Succeed => Ok(fake_tokens(self.refresh_role.or(self.role_claim), None)),
            Refresh::Reject => Err(ProviderError::service("NotAuthorizedException", "revoked")),
            Refresh::Unreachable => Err(ProviderError::Transport("connection refused".into())),
        }
    }

    async fn global_sign_out(&self, _access_token: &str) -> ProviderResult<()> {
        self.record("global_sign_out");
        match self.sign_out {
            SignOut::Succeed => Ok(()),
            SignOut::Fail => Err(ProviderError::Transport("connection reset".into())),
            SignOut::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<String>>);

impl RecordingNavigator {
    fn paths(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.0.lock().unwrap().push(path.to_string());
    }
}

type Gateway = AuthGateway<FakeProvider, Arc<MemoryStore>>;

struct Harness {
    provider: Arc<FakeProvider>,
    backing: Arc<MemoryStore>,
    gateway: Arc<Gateway>,
    navigator: Arc<RecordingNavigator>,
    guard: RouteGuard<RoleResolver<FakeProvider, Arc<MemoryStore>>, RecordingNavigator>,
}

fn harness_with(provider: FakeProvider, config: AuthConfig) -> Harness {
    let provider = Arc::new(provider);
    let backing = Arc::new(MemoryStore::new());
    let store = Arc::new(SessionStore::new(backing.clone(), &config));
    let config = Arc::new(config);
    let gateway = Arc::new(AuthGateway::new(provider.clone(), store, config.clone()));
    let resolver = Arc::new(RoleResolver::new(gateway.clone()));
    let navigator = Arc::new(RecordingNavigator::default());
    let guard = RouteGuard::new(
        resolver,
        navigator.clone(),
        config.login_path.clone(),
        config.guard_history,
    );

    Harness {
        provider,
        backing,
        gateway,
        navigator,
        guard,
    }
}

fn harness(provider: FakeProvider) -> Harness {
    harness_with(provider, AuthConfig::default())
}

fn stored_session(role: Role) -> Session {
    Session {
        subject_id: SubjectId::new("user-1").unwrap(),
        role,
        tokens: SessionTokens {
            access_token: "access-token".into(),
            id_token: fake_id_token(Some(role.code()), 0),
            refresh_token: Some("refresh-token".into()),
        },
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

fn registration(phone: &str) -> RegistrationInput {
    RegistrationInput {
        email: "Ana@X.com".into(),
        password: "Secret1!".into(),
        given_name: "Ana".into(),
        family_name: "Gómez".into(),
        phone: phone.into(),
        address: "Cra 7 # 12-34".into(),
        document_id: "1020304050".into(),
    }
}

fn phone_attribute(provider: &FakeProvider) -> String {
    provider
        .sign_ups
        .lock()
        .unwrap()
        .last()
        .and_then(|attrs| attrs.iter().find(|a| a.name == "phone_number"))
        .map(|a| a.value.clone())
        .unwrap()
}

fn other_role(role: Role) -> Role {
    match role {
        Role::Admin => Role::Client,
        _ => Role::Admin,
    }
}

// ============================================================================
// Route guard properties
// ============================================================================

#[tokio::test]
async fn test_guard_allows_own_role_and_redirects_others_to_their_dashboard() {
    for role in Role::KNOWN {
        let h = harness(FakeProvider::default());
        h.gateway.session_store().set_session(stored_session(role));

        let own = RouteAccessPolicy::only([role]);
        assert!(h.guard.can_activate(NavigationId::new(), &own).await, "{role}");
        assert!(h.navigator.paths().is_empty());

        let excluded = RouteAccessPolicy::only([other_role(role)]);
        let outcome = h.guard.check(NavigationId::new(), &excluded).await;
        let Dispatch::Dashboard(own_dashboard) = dispatch(role) else {
            panic!("known role without dashboard");
        };
        assert_eq!(outcome, GuardOutcome::RedirectDashboard(own_dashboard));
        assert_eq!(h.navigator.paths(), vec![own_dashboard.to_string()]);
    }
}

#[tokio::test]
async fn test_guard_without_session_always_redirects_to_login() {
    let policies = [
        RouteAccessPolicy::any_authenticated(),
        RouteAccessPolicy::only([Role::Client]),
        RouteAccessPolicy::only(Role::KNOWN),
    ];

    for policy in policies {
        let h = harness(FakeProvider::default());
        let outcome = h.guard.check(NavigationId::new(), &policy).await;
        assert_eq!(outcome, GuardOutcome::RedirectLogin);
        assert_eq!(h.navigator.paths(), vec!["login".to_string()]);
        assert!(h.provider.calls().is_empty());
    }
}

#[tokio::test]
async fn test_guard_admin_route_with_client_session() {
    let h = harness(FakeProvider::default());
    h.gateway.session_store().set_session(stored_session(Role::Client));

    let nav = NavigationId::new();
    let admin = RouteAccessPolicy::only([Role::Admin]);
    assert!(!h.guard.can_activate(nav, &admin).await);
    assert!(!h.guard.can_activate(nav, &admin).await);

    assert_eq!(
        h.guard.state(nav),
        Some(GuardState::Decided(GuardOutcome::RedirectDashboard("client")))
    );
    assert_eq!(h.navigator.paths(), vec!["client".to_string()]);
}

#[tokio::test]
async fn test_guard_resolver_no_session_redirects_to_login() {
    // Expired session whose refresh is rejected: the resolver reports NoSession.
    let h = harness(FakeProvider {
        refresh: Refresh::Reject,
        ..Default::default()
    });
    let mut expired = stored_session(Role::Admin);
    expired.expires_at = Utc::now() - chrono::Duration::minutes(5);
    h.gateway.session_store().set_session(expired);

    let outcome = h
        .guard
        .check(NavigationId::new(), &RouteAccessPolicy::only([Role::Admin]))
        .await;
    assert_eq!(outcome, GuardOutcome::RedirectLogin);
    assert_eq!(h.navigator.paths(), vec!["login".to_string()]);
    assert!(h.gateway.session_store().get_session().is_none());
}

#[tokio::test]
async fn test_guard_unknown_role_never_reaches_a_dashboard() {
    let h = harness(FakeProvider::default());
    h.gateway.session_store().set_session(stored_session(Role::Unknown));

    let outcome = h
        .guard
        .check(NavigationId::new(), &RouteAccessPolicy::any_authenticated())
        .await;
    assert_eq!(outcome, GuardOutcome::RedirectLogin);
    assert_eq!(h.navigator.paths(), vec!["login".to_string()]);
}

// ============================================================================
// Login / dispatch
// ============================================================================

#[tokio::test]
async fn test_login_stores_session_and_dispatches_client() {
    let h = harness(FakeProvider::with_role("CLIENT"));

    let role = h.gateway.login("user@x.com", "Secret1!").await.unwrap();
    assert_eq!(role, Role::Client);

    let session = h.gateway.session_store().get_session().unwrap();
    assert_eq!(session.role, Role::Client);
    assert_eq!(session.subject_id.as_str(), "user-1");
    assert!(!h.backing.is_empty());

    assert_eq!(dispatch(session.role), Dispatch::Dashboard("client"));

    let nav = RecordingNavigator::default();
    redirect_after_login(role, &nav, "login");
    assert_eq!(nav.paths(), vec!["client".to_string()]);
}

#[tokio::test]
async fn test_login_then_role_lookup_sees_session() {
    let h = harness(FakeProvider::with_role("SECRETARY"));
    let resolver = RoleResolver::new(h.gateway.clone());

    h.gateway.login("sec@x.com", "whatever").await.unwrap();
    assert_eq!(resolver.get_user_role().await.unwrap(), Role::Secretary);
    assert_eq!(h.provider.calls(), vec!["initiate_auth"]);
}

#[tokio::test]
async fn test_login_error_kinds() {
    let cases = [
        ("NotAuthorizedException", ErrorKind::InvalidCredentials),
        ("UserNotFoundException", ErrorKind::InvalidCredentials),
        ("UserNotConfirmedException", ErrorKind::UserNotConfirmed),
        ("CodeMismatchException", ErrorKind::Unknown),
        ("TooManyRequestsException", ErrorKind::Unknown),
    ];

    for (code, kind) in cases {
        let h = harness(FakeProvider {
            login_error: Some(code),
            ..Default::default()
        });
        let err = h.gateway.login("user@x.com", "Secret1!").await.unwrap_err();
        assert_eq!(err.kind(), kind, "code {code}");
        assert!(h.gateway.session_store().get_session().is_none());
    }
}

#[tokio::test]
async fn test_login_rejects_blank_input_locally() {
    let h = harness(FakeProvider::with_role("CLIENT"));
    assert_eq!(
        h.gateway.login("user@x.com", "   ").await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(
        h.gateway.login("not-an-email", "Secret1!").await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert!(h.provider.calls().is_empty());
}

#[tokio::test]
async fn test_login_with_unrecognized_role_is_denied_a_dashboard() {
    let h = harness(FakeProvider::with_role("ROOT"));
    let role = h.gateway.login("user@x.com", "Secret1!").await.unwrap();
    assert_eq!(role, Role::Unknown);

    let nav = RecordingNavigator::default();
    assert_eq!(redirect_after_login(role, &nav, "login"), Dispatch::Deny);
    assert_eq!(nav.paths(), vec!["login".to_string()]);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_store_whatever_the_remote_outcome() {
    for sign_out in [SignOut::Succeed, SignOut::Fail, SignOut::Hang] {
        let config = AuthConfig {
            sign_out_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let h = harness_with(
            FakeProvider {
                role_claim: Some("ADMIN"),
                sign_out,
                ..Default::default()
            },
            config,
        );

        h.gateway.login("admin@x.com", "Secret1!").await.unwrap();
        assert!(h.gateway.session_store().get_session().is_some());

        h.gateway.logout().await;

        assert!(h.gateway.session_store().get_session().is_none());
        assert!(h.backing.is_empty());
        assert_eq!(h.provider.calls(), vec!["initiate_auth", "global_sign_out"]);
    }
}

#[tokio::test]
async fn test_logout_without_session_skips_remote_call() {
    let h = harness(FakeProvider::default());
    h.gateway.logout().await;
    assert!(h.provider.calls().is_empty());
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_expired_session_is_refreshed_once() {
    let h = harness(FakeProvider {
        role_claim: Some("DELIVERY"),
        ..Default::default()
    });
    let mut expired = stored_session(Role::Delivery);
    expired.expires_at = Utc::now() - chrono::Duration::minutes(1);
    h.gateway.session_store().set_session(expired);

    let resolver = RoleResolver::new(h.gateway.clone());
    assert_eq!(resolver.get_user_role().await.unwrap(), Role::Delivery);
    assert_eq!(resolver.get_user_role().await.unwrap(), Role::Delivery);
    assert_eq!(h.provider.calls(), vec!["refresh_tokens"]);

    // Refresh response carried no refresh token; the old one is kept.
    let session = h.gateway.session_store().get_session().unwrap();
    assert_eq!(session.refresh_token(), Some("refresh-token"));
    assert!(!session.is_expired(Utc::now(), chrono::Duration::zero()));
}

#[tokio::test]
async fn test_refresh_unreachable_keeps_session() {
    let h = harness(FakeProvider {
        refresh: Refresh::Unreachable,
        ..Default::default()
    });
    h.gateway.session_store().set_session(stored_session(Role::Client));

    let err = h.gateway.refresh_session().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkUnavailable);
    assert!(h.gateway.session_store().get_session().is_some());
}

#[tokio::test]
async fn test_refresh_without_session() {
    let h = harness(FakeProvider::default());
    let err = h.gateway.refresh_session().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSession);
    assert!(h.provider.calls().is_empty());
}

// ============================================================================
// Registration / confirmation
// ============================================================================

#[tokio::test]
async fn test_register_phone_legacy_and_canonical() {
    let legacy = harness(FakeProvider::default());
    legacy.gateway.register(registration("3001234567")).await.unwrap();
    assert_eq!(phone_attribute(&legacy.provider), "+573001234567");

    legacy.gateway.register(registration("+573001234567")).await.unwrap();
    assert_eq!(phone_attribute(&legacy.provider), "+57+573001234567");

    let canonical = harness_with(
        FakeProvider::default(),
        AuthConfig {
            phone_normalization: PhoneNormalization::Canonical,
            ..Default::default()
        },
    );
    let pending = canonical
        .gateway
        .register(registration("+573001234567"))
        .await
        .unwrap();
    assert_eq!(pending.phone.as_str(), "+573001234567");
    assert_eq!(phone_attribute(&canonical.provider), "+573001234567");
}

#[tokio::test]
async fn test_register_normalizes_email_and_sets_client_role() {
    let h = harness(FakeProvider::default());
    let pending = h.gateway.register(registration("3001234567")).await.unwrap();

    assert_eq!(pending.email.as_str(), "ana@x.com");
    assert_eq!(pending.user_sub, "user-1");
    assert!(!pending.confirmed);

    let attrs = h.provider.sign_ups.lock().unwrap()[0].clone();
    assert!(attrs.contains(&UserAttribute::new("custom:role", "CLIENT")));
    assert!(attrs.contains(&UserAttribute::new("email", "ana@x.com")));
}

#[tokio::test]
async fn test_register_requires_every_field() {
    let blanks: [fn(&mut RegistrationInput); 7] = [
        |i| i.email.clear(),
        |i| i.password.clear(),
        |i| i.given_name = "  ".into(),
        |i| i.family_name.clear(),
        |i| i.phone.clear(),
        |i| i.address.clear(),
        |i| i.document_id.clear(),
    ];

    let h = harness(FakeProvider::default());
    for blank in blanks {
        let mut input = registration("3001234567");
        blank(&mut input);
        let err = h.gateway.register(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    let mut weak = registration("3001234567");
    weak.password = "password".into();
    assert_eq!(
        h.gateway.register(weak).await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert!(h.provider.calls().is_empty());
}

#[tokio::test]
async fn test_confirm_rejects_malformed_codes_before_provider() {
    let h = harness(FakeProvider::default());
    for code in ["", "12345", "abcdef", "1234567"] {
        let err = h.gateway.confirm("user@x.com", code).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCode, "code {code:?}");
    }
    assert!(h.provider.calls().is_empty());

    h.gateway.confirm("user@x.com", "123456").await.unwrap();
    assert_eq!(h.provider.calls(), vec!["confirm_sign_up"]);
}

#[tokio::test]
async fn test_confirm_provider_errors() {
    let cases = [
        ("CodeMismatchException", ErrorKind::InvalidCode),
        ("ExpiredCodeException", ErrorKind::CodeExpired),
        ("NotAuthorizedException", ErrorKind::Unknown),
    ];
    for (code, kind) in cases {
        let h = harness(FakeProvider {
            confirm_error: Some(code),
            ..Default::default()
        });
        let err = h.gateway.confirm("user@x.com", "123456").await.unwrap_err();
        assert_eq!(err.kind(), kind, "code {code}");
    }
}

#[tokio::test]
async fn test_resend_confirmation() {
    let h = harness(FakeProvider::default());
    h.gateway.resend_confirmation("user@x.com").await.unwrap();
    assert_eq!(h.provider.calls(), vec!["resend_confirmation_code"]);
}

// ============================================================================
// Persisted state
// ============================================================================

#[tokio::test]
async fn test_corrupt_persisted_session_reads_as_signed_out() {
    let config = AuthConfig::default();
    let backing = Arc::new(MemoryStore::new());
    backing
        .set(&config.session_key(), r#"{"role":"ADMIN"}"#)
        .unwrap();

    let store = Arc::new(SessionStore::new(backing.clone(), &config));
    let gateway = Arc::new(AuthGateway::new(
        Arc::new(FakeProvider::default()),
        store,
        Arc::new(config),
    ));
    let resolver = RoleResolver::new(gateway);

    assert_eq!(
        resolver.get_user_role().await.unwrap_err().kind(),
        ErrorKind::NoSession
    );
    assert!(backing.is_empty());
}
