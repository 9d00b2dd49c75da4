//! Google OAuth 2.0 for installed apps: refresh-token grant plus the
//! loopback-redirect authorization-code flow.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;

use super::client_secret::ClientSecret;
use super::token::StoredToken;
use super::{AuthError, AuthProvider};

const SUCCESS_PAGE: &str = "<html><body><h1>Authorization successful!</h1>\
     <p>You can close this tab and return to the terminal.</p></body></html>";
const FAILURE_PAGE: &str = "<html><body><h1>Authorization failed</h1>\
     <p>Check the terminal for details.</p></body></html>";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in.map(|secs| now + Duration::seconds(secs))
    }
}

/// Talks to Google's OAuth endpoints.
pub struct GoogleOAuth {
    client_secrets_file: PathBuf,
    scopes: Vec<String>,
    open_browser: bool,
}

impl GoogleOAuth {
    pub fn new(client_secrets_file: PathBuf, scopes: Vec<String>) -> Self {
        Self {
            client_secrets_file,
            scopes,
            open_browser: true,
        }
    }

    /// Only print the authorization URL instead of launching a browser.
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Trade an authorization code for tokens.
    pub fn exchange_code(
        &self,
        secret: &ClientSecret,
        code: &str,
        redirect_uri: &str,
    ) -> Result<StoredToken, AuthError> {
        let response = post_token(
            &secret.token_uri,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", secret.client_id.as_str()),
                ("client_secret", secret.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
            ],
        )?;

        let scopes = match response.scope {
            Some(ref s) => s.split_whitespace().map(str::to_string).collect(),
            None => self.scopes.clone(),
        };
        Ok(StoredToken {
            expiry: response.expiry(Utc::now()),
            token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: secret.token_uri.clone(),
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            scopes,
        })
    }
}

impl AuthProvider for GoogleOAuth {
    fn refresh(&self, token: &StoredToken) -> Result<StoredToken, AuthError> {
        let refresh_token = token.refresh_token.as_deref().unwrap_or_default();
        let response = post_token(
            &token.token_uri,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", token.client_id.as_str()),
                ("client_secret", token.client_secret.as_str()),
            ],
        )?;

        Ok(StoredToken {
            expiry: response.expiry(Utc::now()),
            token: response.access_token,
            // Google usually omits the refresh token on refresh; keep the old one.
            refresh_token: response.refresh_token.or_else(|| token.refresh_token.clone()),
            ..token.clone()
        })
    }

    fn authorize(&self) -> Result<StoredToken, AuthError> {
        let secret = ClientSecret::load(&self.client_secrets_file)?;

        let server = tiny_http::Server::http("127.0.0.1:0")
            .map_err(|e| AuthError::Listener(e.to_string()))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| AuthError::Listener("listener has no TCP address".to_string()))?;
        let redirect_uri = format!("http://127.0.0.1:{}/", port);

        let state = random_state();
        let url = authorization_url(&secret, &redirect_uri, &self.scopes, &state);

        eprintln!("Please visit this URL to authorize this application:");
        eprintln!("  {}", url);
        if self.open_browser {
            if let Err(e) = open::that(&url) {
                tracing::warn!("could not open a browser: {}", e);
            }
        }

        serve_callback(&server, &state, |code| {
            self.exchange_code(&secret, code, &redirect_uri)
        })
    }
}

/// Build the consent-screen URL.
pub fn authorization_url(
    secret: &ClientSecret,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
) -> String {
    let scope = scopes.join(" ");
    let params = [
        ("response_type", "code"),
        ("client_id", secret.client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("scope", scope.as_str()),
        ("state", state),
        ("access_type", "offline"),
        ("prompt", "consent"),
    ];
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", secret.auth_uri, query)
}

/// Interpret one request on the loopback listener.
///
/// `None` means the request is not the OAuth redirect (a favicon fetch, say)
/// and the listener should keep waiting.
pub fn check_callback(url: &str, expected_state: &str) -> Option<Result<String, AuthError>> {
    let params = query_params(url);
    if let Some(error) = params.get("error") {
        return Some(Err(AuthError::Denied(error.clone())));
    }
    let code = params.get("code")?;
    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Some(Err(AuthError::StateMismatch));
    }
    Some(Ok(code.clone()))
}

/// Answer requests on the loopback listener until the OAuth redirect arrives.
///
/// Other requests get a 404. The code is handed to `finish` before the browser
/// is answered, so the page it shows reflects the outcome of the exchange.
pub(crate) fn serve_callback<T>(
    server: &tiny_http::Server,
    state: &str,
    finish: impl FnOnce(&str) -> Result<T, AuthError>,
) -> Result<T, AuthError> {
    loop {
        let request = server
            .recv()
            .map_err(|e| AuthError::Listener(e.to_string()))?;
        let Some(callback) = check_callback(request.url(), state) else {
            tracing::debug!("ignoring request for {}", request.url());
            let _ = request.respond(html_response(404, "Not found"));
            continue;
        };
        let outcome = callback.and_then(|code| finish(&code));
        let page = if outcome.is_ok() {
            html_response(200, SUCCESS_PAGE)
        } else {
            html_response(400, FAILURE_PAGE)
        };
        if let Err(e) = request.respond(page) {
            tracing::debug!("failed to answer browser: {}", e);
        }
        return outcome;
    }
}

fn html_response(status: u16, body: &str) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_string(body).with_status_code(status);
    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

fn query_params(url: &str) -> HashMap<String, String> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            let k = urlencoding::decode(&k.replace('+', " ")).ok()?.into_owned();
            let v = urlencoding::decode(&v.replace('+', " ")).ok()?.into_owned();
            Some((k, v))
        })
        .collect()
}

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(30)
        .map(char::from)
        .collect()
}

fn post_token(uri: &str, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
    tracing::debug!("POST {}", uri);
    match ureq::post(uri).send_form(form) {
        Ok(response) => response
            .into_json::<TokenResponse>()
            .map_err(|e| AuthError::Transport(format!("unreadable token response: {}", e))),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(AuthError::TokenEndpoint { status, body })
        }
        Err(e) => Err(AuthError::Transport(e.to_string())),
    }
}
