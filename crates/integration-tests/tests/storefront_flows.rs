//! End-to-end flows through the storefront router.
//!
//! Each test drives a fresh in-process instance through `TestContext`. The
//! only sockets opened are local geolocation stand-ins.

use axum::http::{StatusCode, header};

use mauro_core::{Email, ServiceType};
use mauro_integration_tests::{TestContext, spawn_geolocation_service, test_config};

// =============================================================================
// Public Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_home_shows_products_and_unavailable_location() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("iPhone 15 Pro"));
    assert!(resp.body.contains("R$ 7.500"));
    assert!(resp.body.contains("Samsung Galaxy S24"));
    assert!(resp.body.contains("Carregador Turbo 25W"));
    assert!(resp.body.contains("Localização Indisponível"));
    // Anonymous navbar
    assert!(resp.body.contains("href=\"/login\""));
    assert!(resp.body.contains("href=\"/signup\""));
    assert!(!resp.body.contains("href=\"/logout\""));
}

#[tokio::test]
async fn test_home_shows_resolved_location() {
    let mut config = test_config();
    config.geolocation.base_url = spawn_geolocation_service()
        .await
        .parse()
        .expect("valid stand-in URL");
    let mut ctx = TestContext::with_config(config);

    let resp = ctx.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Luanda, Angola"));
    assert!(!resp.body.contains("Localização Indisponível"));
}

#[tokio::test]
async fn test_signup_and_login_pages_use_fixed_banners() {
    let mut ctx = TestContext::new();

    let signup = ctx.get("/signup").await;
    assert_eq!(signup.status, StatusCode::OK);
    assert!(signup.body.contains("Mauro Business Store"));

    let login = ctx.get("/login").await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.contains("Área de Acesso"));
}

// =============================================================================
// Signup & Login
// =============================================================================

#[tokio::test]
async fn test_signup_flashes_success_on_login_page() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .post_form("/signup", "email=ana%40example.com&password=1234")
        .await;
    assert!(resp.redirects_to("/login"));

    let login = ctx.get("/login").await;
    assert!(login.body.contains("Cadastro realizado! Faça login."));

    // One-shot: gone on the next render
    let again = ctx.get("/login").await;
    assert!(!again.body.contains("Cadastro realizado!"));
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let mut ctx = TestContext::new();
    let body = "email=ana%40example.com&password=1234";

    assert!(ctx.post_form("/signup", body).await.redirects_to("/login"));

    let dup = ctx
        .post_form("/signup", "email=ana%40example.com&password=other")
        .await;
    assert_eq!(dup.status, StatusCode::OK);
    assert!(dup.body.contains("E-mail já cadastrado!"));
    assert_eq!(ctx.state.users().len().await, 1);

    // The first password still works
    assert!(ctx.post_form("/login", body).await.redirects_to("/"));
}

#[tokio::test]
async fn test_signup_with_empty_fields_is_rejected() {
    let mut ctx = TestContext::new();

    let no_password = ctx
        .post_form("/signup", "email=ana%40example.com&password=")
        .await;
    assert_eq!(no_password.status, StatusCode::OK);
    assert!(!no_password.body.contains("Cadastro realizado!"));

    let no_email = ctx.post_form("/signup", "password=1234").await;
    assert_eq!(no_email.status, StatusCode::OK);

    assert!(ctx.state.users().is_empty().await);
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let mut ctx = TestContext::new();
    ctx.post_form("/signup", "email=ana%40example.com&password=1234")
        .await;

    let wrong_password = ctx
        .post_form("/login", "email=ana%40example.com&password=4321")
        .await;
    assert_eq!(wrong_password.status, StatusCode::OK);
    assert!(wrong_password.body.contains("Credenciais inválidas!"));

    let unknown = ctx
        .post_form("/login", "email=bob%40example.com&password=1234")
        .await;
    assert!(unknown.body.contains("Credenciais inválidas!"));

    // Still anonymous
    assert!(ctx.get("/agendar").await.redirects_to("/login"));
}

#[tokio::test]
async fn test_login_shows_greeting() {
    let mut ctx = TestContext::new();
    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;

    let home = ctx.get("/").await;
    assert!(home.body.contains("Olá, ana@example.com"));
    assert!(home.body.contains("href=\"/agendar\""));
    assert!(home.body.contains("href=\"/logout\""));
}

#[tokio::test]
async fn test_login_rotates_session_cookie() {
    let mut ctx = TestContext::new();
    let body = "email=ana%40example.com&password=1234";

    assert!(ctx.post_form("/signup", body).await.redirects_to("/login"));
    let before = ctx.session_cookie().map(String::from);
    assert!(before.is_some());

    assert!(ctx.post_form("/login", body).await.redirects_to("/"));
    let after = ctx.session_cookie().map(String::from);
    assert!(after.is_some());
    assert_ne!(before, after);
}

#[tokio::test]
async fn test_session_cookie_lasts_for_browser_session() {
    let mut ctx = TestContext::new();
    ctx.post_form("/signup", "email=ana%40example.com&password=1234")
        .await;

    let login = ctx
        .post_form("/login", "email=ana%40example.com&password=1234")
        .await;
    let cookie = login
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie on login");
    assert!(cookie.starts_with("mauro_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Max-Age"));
    assert!(!cookie.contains("Expires"));
}

#[tokio::test]
async fn test_unreadable_form_bodies_are_treated_as_empty() {
    let mut ctx = TestContext::new();

    let signup = ctx
        .post_raw("/signup", None, "email=ana%40example.com&password=1234")
        .await;
    assert_eq!(signup.status, StatusCode::OK);
    assert!(signup.body.contains("Informe um e-mail válido."));
    assert!(ctx.state.users().is_empty().await);

    let login = ctx
        .post_raw("/login", Some("application/json"), r#"{"email":"x"}"#)
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.contains("Credenciais inválidas!"));

    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;
    let booking = ctx
        .post_raw("/agendar", Some("text/plain"), "Troca de Tela")
        .await;
    assert_eq!(booking.status, StatusCode::OK);
    assert!(booking.body.contains("Selecione um serviço válido."));
    assert!(ctx.state.appointments().is_empty().await);
}

// =============================================================================
// Protected Routes
// =============================================================================

#[tokio::test]
async fn test_protected_routes_redirect_anonymous_visitors() {
    let mut ctx = TestContext::new();

    assert!(ctx.get("/agendar").await.redirects_to("/login"));
    assert!(ctx.get("/logout").await.redirects_to("/login"));

    let post = ctx
        .post_form("/agendar", "servico=Troca+de+Tela&data=2025-12-01")
        .await;
    assert!(post.redirects_to("/login"));
    assert!(ctx.state.appointments().is_empty().await);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let mut ctx = TestContext::new();
    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;

    assert_eq!(ctx.get("/agendar").await.status, StatusCode::OK);
    assert!(ctx.get("/logout").await.redirects_to("/"));
    assert!(ctx.get("/agendar").await.redirects_to("/login"));
}

#[tokio::test]
async fn test_sessions_are_per_browser() {
    let mut ctx = TestContext::new();
    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;

    ctx.forget_session();
    assert!(ctx.get("/agendar").await.redirects_to("/login"));
}

// =============================================================================
// Booking
// =============================================================================

#[tokio::test]
async fn test_full_booking_flow() {
    let mut ctx = TestContext::new();
    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;

    let form = ctx.get("/agendar").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("Setor de Agendamentos"));
    for service in ServiceType::ALL {
        assert!(form.body.contains(service.label()));
    }

    let booked = ctx
        .post_form("/agendar", "servico=Troca+de+Bateria&data=2025-12-01")
        .await;
    assert!(booked.redirects_to("/"));

    let home = ctx.get("/").await;
    assert!(
        home.body
            .contains("Agendamento de Troca de Bateria confirmado para 2025-12-01!")
    );

    let appointments = ctx.state.appointments().list().await;
    assert_eq!(appointments.len(), 1);
    let appointment = appointments.first().expect("one appointment");
    assert_eq!(
        appointment.owner,
        Email::parse("ana@example.com").expect("valid email")
    );
    assert_eq!(appointment.service, ServiceType::BatteryReplacement);

    // Listed on the booking page
    let listed = ctx.get("/agendar").await;
    assert!(listed.body.contains("Meus agendamentos"));
    assert!(listed.body.contains("2025-12-01"));
    assert!(listed.body.contains("agendado em"));
}

#[tokio::test]
async fn test_booking_rejects_invalid_input() {
    let mut ctx = TestContext::new();
    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;

    let bad_service = ctx
        .post_form("/agendar", "servico=Lavagem&data=2025-12-01")
        .await;
    assert_eq!(bad_service.status, StatusCode::OK);
    assert!(bad_service.body.contains("Selecione um serviço válido."));

    let bad_date = ctx
        .post_form("/agendar", "servico=Troca+de+Tela&data=amanha")
        .await;
    assert_eq!(bad_date.status, StatusCode::OK);
    assert!(bad_date.body.contains("Informe uma data válida."));

    assert!(ctx.state.appointments().is_empty().await);
}

#[tokio::test]
async fn test_duplicate_bookings_are_kept() {
    let mut ctx = TestContext::new();
    ctx.sign_up_and_log_in("ana%40example.com", "1234").await;

    for _ in 0..2 {
        let resp = ctx
            .post_form("/agendar", "servico=Troca+de+Tela&data=2025-12-01")
            .await;
        assert!(resp.redirects_to("/"));
    }

    assert_eq!(ctx.state.appointments().len().await, 2);
}

// =============================================================================
// Response Headers
// =============================================================================

#[tokio::test]
async fn test_pages_carry_request_id_and_csp() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/login").await;
    assert_eq!(resp.status, StatusCode::OK);

    assert!(resp.headers.contains_key("x-request-id"));
    assert_eq!(
        resp.headers
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );

    let csp = resp
        .headers
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .expect("CSP header");
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .expect("nonce in CSP");
    assert!(resp.body.contains(&format!("nonce=\"{nonce}\"")));
}
