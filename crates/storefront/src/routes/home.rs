//! Home page route handler.

use std::net::SocketAddr;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{ConnectInfo, State};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{CspNonce, OptionalAuth};
use crate::models::product::{self, Product};
use crate::page::PageShell;
use crate::state::AppState;

/// Home page template: the product showcase.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: PageShell,
    pub products: Vec<Product>,
}

/// Display the home page.
///
/// The location banner is looked up from the client address on every view.
#[instrument(skip_all, fields(client = %addr.ip()))]
pub async fn home(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    nonce: CspNonce,
) -> Result<HomeTemplate> {
    let location = state.geo().resolve(addr.ip().to_canonical()).await;
    let shell = PageShell::load(&session, user, location.display(), &nonce).await?;

    Ok(HomeTemplate {
        shell,
        products: product::showcase(),
    })
}
