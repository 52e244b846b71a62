use anyhow::{bail, Context, Result};
use clap::Parser;
use personachat::transcript::{extract_person_messages, join_segments};
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// The chat export to read
    #[arg(required = true)]
    input: String,
    /// The display name whose messages are extracted
    #[arg(required = true)]
    person: String,
    /// Where the sample file is written
    #[arg(long, short, default_value = "1.txt")]
    output: String,
}

pub async fn handle_extract(args: &ExtractArgs) -> Result<()> {
    info!(input = %args.input, person = %args.person, "Extracting messages");

    let export = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("cannot read input file '{}'", args.input))?;

    let messages = extract_person_messages(&export, &args.person)?;
    if messages.is_empty() {
        bail!("no messages found for '{}'", args.person);
    }

    let sample = join_segments(&messages);
    if let Some(parent) = Path::new(&args.output).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&args.output, &sample)
        .await
        .with_context(|| format!("cannot write output file '{}'", args.output))?;

    println!(
        "Extracted {} messages from '{}' into '{}' ({} characters).",
        messages.len(),
        args.input,
        args.output,
        sample.chars().count()
    );
    Ok(())
}
