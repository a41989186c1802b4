//! OAuth 2.0 management for YouTube API authentication.
//!
//! This module encapsulates all OAuth-related operations for authenticating with the YouTube API,
//! including initial user authorization, token refresh, and secure handling of authorization flows.

use crate::auth::InstalledClient;
use eyre::Context;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Request, Response, body};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, CsrfToken, PkceCodeChallenge, RedirectUrl, Scope,
    TokenUrl,
};
use oauth2::{ClientSecret, TokenResponse, reqwest};
use std::future::Future;

/// Scopes requested during authorization: read access for listing and
/// search, force-ssl for playlist mutations.
const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/youtube.force-ssl",
];

/// Page served to the browser once the authorization redirect has been handled.
const OAUTH_SUCCESS_PAGE: &str = include_str!("../oauth_success.html");

/// Manages OAuth 2.0 authentication flows for YouTube API access.
///
/// The OAuthManager encapsulates all OAuth operations, providing a consistent
/// interface for both initial user authentication and token refresh. The
/// client configuration (id, secret, endpoints) comes from the user's Google
/// client-credentials file.
#[derive(Debug, Clone)]
pub struct OAuthManager {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
}

impl OAuthManager {
    /// Creates a new OAuth manager from parsed "installed application" credentials.
    pub fn new(credentials: InstalledClient) -> Self {
        Self {
            client_id: credentials.client_id,
            client_secret: credentials.client_secret,
            auth_uri: credentials.auth_uri,
            token_uri: credentials.token_uri,
        }
    }

    /// Performs a complete OAuth 2.0 authorization flow to obtain a new access token.
    ///
    /// This method initiates the full OAuth flow, including:
    /// 1. Setting up a local HTTP server to receive the authorization callback
    /// 2. Opening the user's browser for authorization
    /// 3. Exchanging the authorization code for an access token
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client for the code exchange cannot be built (this
    /// should never happen with a default configuration).
    pub async fn authenticate(&self) -> eyre::Result<BasicTokenResponse> {
        let csrf = CsrfToken::new_random();
        let (redirect_url, eventually_authorization_code) = self
            .setup_redirect(csrf.clone())
            .await
            .context("set up redirect endpoint")?;

        let auth_url = AuthUrl::new(self.auth_uri.clone())
            .context("authorization endpoint URL in credentials file is invalid")?;
        let token_url = TokenUrl::new(self.token_uri.clone())
            .context("token endpoint URL in credentials file is invalid")?;
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, _csrf_token) = client
            // The flow runs exactly once per call, so the CSRF token is never re-used.
            .authorize_url(move || csrf.clone())
            .add_scopes(SCOPES.iter().map(|scope| Scope::new(scope.to_string())))
            .set_pkce_challenge(pkce_challenge)
            .url();

        tracing::info!(url = %auth_url, "asking user to follow OAuth flow");
        eprintln!("Opening your browser to authorize youtube-manager.");
        eprintln!("If nothing opens, visit:\n  {}", auth_url);
        webbrowser::open(auth_url.as_ref()).context("open user's browser")?;
        let authorization_code = eventually_authorization_code
            .await
            .context("await user authorization code")?;

        let http_client = reqwest::ClientBuilder::new()
            // A token endpoint that redirects is not one we want to talk to.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("building reqwest client should not fail");
        let token_result = client
            .exchange_code(authorization_code)
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client)
            .await
            .context("exchange authorization code with access token")?;

        Ok(token_result)
    }

    /// Attempts to refresh an existing OAuth token using its refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(new_token))` - Refresh succeeded, new token is available
    /// * `Ok(None)` - No refresh token, or the grant is no longer valid
    /// * `Err(_)` - Network or other error occurred during the refresh attempt
    ///
    /// # Token Lifecycle
    ///
    /// When refresh returns `Ok(None)`, the token should be considered dead
    /// and the user re-authenticated via [`Self::authenticate`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client for the exchange cannot be built (this
    /// should never happen with a default configuration).
    pub async fn refresh_token(
        &self,
        token: BasicTokenResponse,
    ) -> eyre::Result<Option<BasicTokenResponse>> {
        let Some(refresh_token) = token.refresh_token() else {
            tracing::warn!("no refresh token available, cannot refresh");
            return Ok(None);
        };

        tracing::debug!("attempting to refresh OAuth token");

        // Refresh only talks to the token endpoint; no redirect URL needed.
        let token_url = TokenUrl::new(self.token_uri.clone())
            .context("token endpoint URL in credentials file is invalid")?;
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(token_url);

        let http_client = reqwest::ClientBuilder::new()
            // A token endpoint that redirects is not one we want to talk to.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("building reqwest client should not fail");

        match client
            .exchange_refresh_token(refresh_token)
            .request_async(&http_client)
            .await
        {
            Ok(new_token) => {
                tracing::debug!("successfully refreshed OAuth token");
                Ok(Some(new_token))
            }
            Err(ref e @ oauth2::RequestTokenError::ServerResponse(ref sr))
                if matches!(
                    sr.error(),
                    oauth2::basic::BasicErrorResponseType::InvalidGrant
                ) =>
            {
                tracing::warn!("OAuth refresh token considered invalid grant: {}", e);
                Ok(None)
            }
            Err(e) => Err(e).context("exchange refresh token"),
        }
    }

    /// Sets up a local HTTP server to receive the OAuth authorization callback.
    ///
    /// Binds a temporary HTTP server to a random local port to handle the
    /// OAuth redirect after user authorization. The handler validates the
    /// CSRF token, extracts the authorization code, and serves a small
    /// static success page.
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// - The redirect URL to use in the OAuth flow
    /// - A future that resolves to the authorization code when the callback is received
    async fn setup_redirect(
        &self,
        csrf: CsrfToken,
    ) -> eyre::Result<(
        RedirectUrl,
        impl Future<Output = eyre::Result<AuthorizationCode>>,
    )> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind to localhost")?;
        let addr = listener.local_addr().context("get local address")?;
        let url = RedirectUrl::new(format!("http://{}:{}", addr.ip(), addr.port()))
            .context("construct redirect url")?;
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let r = async move {
                let (conn, _) = listener.accept().await.context("accept")?;
                let conn = hyper_util::rt::TokioIo::new(conn);
                let (code_tx, mut code_rx) = tokio::sync::mpsc::channel(1);
                let service = service_fn(move |req: Request<body::Incoming>| {
                    let csrf = csrf.clone();
                    let code_tx = code_tx.clone();
                    async move {
                        // The provider redirects back with the state we sent
                        // and the authorization code in the query string.
                        let mut presented_state = None;
                        let mut presented_code = None;
                        for (k, v) in
                            form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
                        {
                            match &*k {
                                "state" => presented_state = Some(v),
                                "code" => presented_code = Some(v),
                                _ => {}
                            }
                        }
                        if presented_state.as_deref() != Some(csrf.secret().as_str()) {
                            return Err("invalid csrf token");
                        }
                        let Some(code) = presented_code else {
                            return Err("no authorization code found");
                        };
                        let code = AuthorizationCode::new(code.into_owned());
                        code_tx
                            .send(code)
                            .await
                            .expect("channel won't be closed until server exit");
                        Ok(Response::new(Full::<Bytes>::from(OAUTH_SUCCESS_PAGE)))
                    }
                });
                let mut serve = std::pin::pin!(
                    hyper::server::conn::http1::Builder::new().serve_connection(conn, service)
                );

                tokio::select! {
                    exit = &mut serve => {
                        if let Err(e) = exit {
                            Err(e).context("redirect server got bad request")
                        } else {
                            eyre::bail!("redirect server exited prematurely");
                        }
                    }
                    code = code_rx.recv() => {
                        serve.graceful_shutdown();
                        let code = code.expect("channel won't be closed until service_fn is dropped");
                        Ok(code)
                    }
                }
            };
            let _ = tx.send(r.await);
        });
        Ok((url, async move {
            rx.await.context("redirect future dropped prematurely")?
        }))
    }
}
