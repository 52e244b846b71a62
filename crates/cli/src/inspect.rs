use anyhow::Result;
use clap::Parser;
use personachat::{
    constants::DEFAULT_DATA_DIR,
    sample::{flatten_entries, split_segments, SEGMENT_DELIMITER},
};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

const PREVIEW_CHARS: usize = 100;

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// The directory holding the sample files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// The sample file stem (`<stem>.txt` / `<stem>.json`)
    #[arg(long, default_value = "1")]
    stem: String,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug, Default)]
struct TextReport {
    path: String,
    exists: bool,
    chars: usize,
    /// Raw pieces between delimiters, blank ones included.
    raw_segments: usize,
    /// Segments that survive loading.
    segments: usize,
    preview: String,
}

#[derive(Serialize, Debug, Default)]
struct JsonReport {
    path: String,
    exists: bool,
    parsed: bool,
    data_type: String,
    array_len: Option<usize>,
    /// Entries that carry usable text.
    entries: usize,
}

#[derive(Serialize, Debug)]
struct SampleReport {
    text: TextReport,
    json: JsonReport,
}

async fn inspect_text(path: &Path) -> TextReport {
    let mut report = TextReport {
        path: path.display().to_string(),
        ..Default::default()
    };
    let Ok(content) = tokio::fs::read_to_string(path).await else {
        debug!(path = %path.display(), "Text sample not readable");
        return report;
    };
    report.exists = true;
    report.chars = content.chars().count();
    report.raw_segments = content.split(SEGMENT_DELIMITER).count();
    let loaded = split_segments(&content);
    report.segments = if loaded.is_empty() {
        0
    } else {
        loaded.lines().count()
    };
    report.preview = content.chars().take(PREVIEW_CHARS).collect();
    report
}

async fn inspect_json(path: &Path) -> JsonReport {
    let mut report = JsonReport {
        path: path.display().to_string(),
        ..Default::default()
    };
    let Ok(content) = tokio::fs::read_to_string(path).await else {
        debug!(path = %path.display(), "JSON sample not readable");
        return report;
    };
    report.exists = true;
    let Ok(data) = serde_json::from_str::<Value>(&content) else {
        return report;
    };
    report.parsed = true;
    report.data_type = match &data {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string();
    report.array_len = data.as_array().map(Vec::len);
    let flattened = flatten_entries(&data);
    report.entries = if flattened.is_empty() {
        0
    } else {
        flattened.lines().count()
    };
    report
}

fn print_report(report: &SampleReport) {
    let text = &report.text;
    if text.exists {
        println!("[ok] {} exists", text.path);
        println!("   characters: {}", text.chars);
        println!("   first {PREVIEW_CHARS} characters: {}...", text.preview);
        println!(
            "   segments (split on '{SEGMENT_DELIMITER}'): {} raw, {} non-blank",
            text.raw_segments, text.segments
        );
    } else {
        println!("[missing] {} does not exist or cannot be read", text.path);
    }
    println!();

    let json = &report.json;
    if !json.exists {
        println!("[missing] {} does not exist or cannot be read", json.path);
    } else if !json.parsed {
        println!("[invalid] {} is not valid JSON", json.path);
    } else {
        println!("[ok] {} exists", json.path);
        println!("   data type: {}", json.data_type);
        if let Some(len) = json.array_len {
            println!("   array length: {len}");
            println!("   usable entries: {}", json.entries);
        }
    }
}

pub async fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let report = SampleReport {
        text: inspect_text(&args.data_dir.join(format!("{}.txt", args.stem))).await,
        json: inspect_json(&args.data_dir.join(format!("{}.json", args.stem))).await,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
