use anyhow::bail;

use figrev_core::config;
use figrev_core::extract::extract_markdown;
use figrev_core::figma::FigmaClient;
use figrev_core::link::parse_figma_link;
use figrev_core::prettify::prettify_markdown;
use figrev_core::rubric::{compose_prompt, DEFAULT_RUBRIC};
use gemini_agent::GeminiRunner;

pub struct ReviewArgs {
    pub link: String,
    pub token: String,
    pub gemini_key: String,
    pub prompt: String,
    pub model: Option<String>,
    pub input_char_limit: Option<usize>,
}

/// `figrev review` — one-shot pipeline without the HTTP layer: extract,
/// compose, invoke Gemini, prettify, print.
pub async fn run(args: ReviewArgs) -> anyhow::Result<()> {
    let parsed = parse_figma_link(&args.link);
    let Some(file_key) = parsed.file_key else {
        bail!("invalid Figma link or fileKey: {}", args.link);
    };

    let client = FigmaClient::new(&args.token)?;
    let file = client.fetch_file(&file_key).await?;
    let markdown = extract_markdown(&file_key, file.pages()?);

    let prompt = compose_prompt(&args.prompt, &DEFAULT_RUBRIC);

    let model = args.model.unwrap_or_else(config::default_model);
    let mut runner = GeminiRunner::new(model, prompt.as_str());
    runner.input_char_limit = args
        .input_char_limit
        .unwrap_or_else(config::default_input_char_limit);
    runner.env = vec![("GEMINI_API_KEY".to_string(), args.gemini_key)];

    let review = runner.run(&markdown).await?;
    println!("{}", prettify_markdown(&review));
    Ok(())
}
