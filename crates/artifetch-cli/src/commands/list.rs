//! Listing commands - artifact names and versions of an account

use artifetch_repo::{ArtifactLister, CredentialsRepository};

use crate::error::{CliError, Result};

fn lister<'a>(accounts: &'a CredentialsRepository, account: &str) -> Result<&'a dyn ArtifactLister> {
    let credentials = accounts.require(account)?;
    credentials.lister().ok_or_else(|| {
        CliError::usage(format!(
            "Account '{}' ({}) does not support listing",
            account,
            credentials.provider_type()
        ))
    })
}

fn print(items: &[String], json: bool) {
    if json {
        println!("{}", serde_json::json!(items));
    } else {
        for item in items {
            println!("{}", item);
        }
    }
}

/// List artifact names
pub async fn names(accounts: &CredentialsRepository, account: &str, json: bool) -> Result<()> {
    let names = lister(accounts, account)?.artifact_names().await?;
    tracing::debug!(account, count = names.len(), "listed artifact names");
    print(&names, json);
    Ok(())
}

/// List versions of one artifact
pub async fn versions(
    accounts: &CredentialsRepository,
    account: &str,
    name: &str,
    json: bool,
) -> Result<()> {
    let versions = lister(accounts, account)?.artifact_versions(name).await?;
    print(&versions, json);
    Ok(())
}
