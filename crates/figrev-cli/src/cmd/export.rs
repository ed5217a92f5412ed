use anyhow::bail;
use std::path::Path;

use figrev_core::extract::extract_markdown;
use figrev_core::figma::FigmaClient;
use figrev_core::link::parse_figma_link;

/// `figrev export` — fetch a Figma file and print/write its annotated
/// markdown extract.
pub async fn run(link: &str, token: &str, out: Option<&Path>) -> anyhow::Result<()> {
    let parsed = parse_figma_link(link);
    let Some(file_key) = parsed.file_key else {
        bail!("invalid Figma link or fileKey: {link}");
    };

    let client = FigmaClient::new(token)?;
    let file = client.fetch_file(&file_key).await?;
    let markdown = extract_markdown(&file_key, file.pages()?);

    match out {
        Some(path) => {
            figrev_core::io::atomic_write(path, markdown.as_bytes())?;
            tracing::info!(path = %path.display(), "markdown export written");
        }
        None => print!("{markdown}"),
    }
    Ok(())
}
