//! Download command - stream an artifact to a file or stdout

use std::path::Path;

use console::style;
use futures::TryStreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use artifetch_core::Artifact;
use artifetch_repo::{ByteStream, CredentialsRepository};

use crate::error::Result;

/// Download an artifact
///
/// Without an account, the first account serving the artifact type is used.
pub async fn run(
    accounts: &CredentialsRepository,
    account: Option<&str>,
    artifact: &Artifact,
    output: Option<&Path>,
) -> Result<()> {
    let body = accounts.download(account, artifact).await?;

    match output {
        Some(path) => {
            let mut file = tokio::fs::File::create(path).await?;
            let written = match copy_stream(body, &mut file).await {
                Ok(written) => written,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(path).await;
                    return Err(e.into());
                }
            };

            eprintln!(
                "{} Downloaded {} to {} ({} bytes)",
                style("✓").green().bold(),
                artifact,
                path.display(),
                written
            );
        }
        None => {
            let mut stdout = tokio::io::stdout();
            copy_stream(body, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Write every chunk of a body, returning the number of bytes written
async fn copy_stream<W>(mut body: ByteStream, out: &mut W) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(chunk) = body.try_next().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}
