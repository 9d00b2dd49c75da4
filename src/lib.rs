pub mod auth;
pub mod cli;
pub mod config;
pub mod docs;
pub mod drivefs;
pub mod error;
pub mod util;

use auth::{Acquisition, AuthProvider, CredentialManager, GoogleOAuth};
use cli::{Cli, Target};
use config::Config;
use docs::DocsClient;
pub use error::{Error, Result};

/// Turn the requested target into a document id.
///
/// Only a placeholder path touches the DriveFS metadata store.
pub fn resolve_doc_id(target: &Target, config: &Config) -> Result<String> {
    match target {
        Target::DocId(id) => Ok(id.clone()),
        Target::Url(url) => util::doc_id_from_url(url)
            .ok_or_else(|| Error::Usage(format!("Could not extract a document ID from '{}'", url))),
        Target::Placeholder(path) => {
            let resolution = drivefs::resolve(config, path)?;
            tracing::info!(
                "resolved {} -> {} ({:?} match)",
                path.display(),
                resolution.doc_id,
                resolution.matched
            );
            Ok(resolution.doc_id)
        }
        Target::AuthOnly => Err(Error::Usage("no document requested".to_string())),
    }
}

/// Obtain credentials and return the document's flattened text.
pub fn read_document<P: AuthProvider>(
    config: &Config,
    credentials: &CredentialManager<P>,
    doc_id: &str,
) -> Result<String> {
    let (token, how) = credentials.credentials()?;
    tracing::info!("credential source: {:?}", how);
    let client = DocsClient::new(&config.docs_api_url);
    Ok(client.fetch_text(doc_id, &token.token)?)
}

/// Confirmation for `--auth`; only a new or refreshed token is written.
fn auth_message(how: Acquisition, token_file: &std::path::Path) -> String {
    match how {
        Acquisition::Cached => format!("Token already valid: {}", token_file.display()),
        Acquisition::Refreshed | Acquisition::Interactive => format!(
            "Authorization successful. Token saved to: {}",
            token_file.display()
        ),
    }
}

/// Run one invocation. Returns the text to print, or None for `--auth`.
pub fn run(cli: &Cli, config: &Config) -> Result<Option<String>> {
    let provider = GoogleOAuth::new(config.credentials_file.clone(), config.scopes.clone());
    let credentials = CredentialManager::new(config.token_file.clone(), provider);

    let target = cli.target();
    if target == Target::AuthOnly {
        let (_, how) = credentials.credentials()?;
        eprintln!("{}", auth_message(how, credentials.token_file()));
        return Ok(None);
    }

    let doc_id = resolve_doc_id(&target, config)?;
    read_document(config, &credentials, &doc_id).map(Some)
}
