use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "gdocread",
    version,
    about = "Print the plain text of a Google Doc from its Drive for desktop .gdoc placeholder",
    group(ArgGroup::new("target").required(true).args(["gdoc", "doc_id", "url", "auth"]))
)]
pub struct Cli {
    /// Path to a .gdoc placeholder (only its filename is used)
    #[arg(value_name = "GDOC")]
    pub gdoc: Option<PathBuf>,

    /// Read this document id directly, skipping the DriveFS lookup
    #[arg(long = "doc-id", value_name = "ID", allow_hyphen_values = true)]
    pub doc_id: Option<String>,

    /// Read the document behind a docs.google.com URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Authorize and save the token, then exit
    #[arg(long)]
    pub auth: bool,

    /// DriveFS account directory to use when several are signed in
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// DriveFS root (default: $LOCALAPPDATA/Google/DriveFS)
    #[arg(long = "drivefs-dir", value_name = "DIR")]
    pub drivefs_dir: Option<PathBuf>,

    /// OAuth client JSON downloaded from the Cloud console
    #[arg(long, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Where the access/refresh token is kept
    #[arg(long, value_name = "FILE")]
    pub token: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What the invocation asks for, once arguments are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Placeholder(PathBuf),
    DocId(String),
    Url(String),
    AuthOnly,
}

impl Cli {
    pub fn target(&self) -> Target {
        if let Some(ref id) = self.doc_id {
            Target::DocId(id.clone())
        } else if let Some(ref url) = self.url {
            Target::Url(url.clone())
        } else if self.auth {
            Target::AuthOnly
        } else {
            Target::Placeholder(self.gdoc.clone().unwrap_or_default())
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            drivefs_dir: self.drivefs_dir.clone(),
            account: self.account.clone(),
            credentials_file: self.credentials.clone(),
            token_file: self.token.clone(),
        }
    }
}
