use anyhow::Result;

use profileprobe::{OutputFormat, normalize::extract_handle, normalize};

pub fn handle_normalize(url: String, format: OutputFormat) -> Result<()> {
    let normalized = normalize(&url);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "input": url,
                "url": normalized,
                "handle": extract_handle(&normalized),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Simple => println!("{}", normalized),
    }
    Ok(())
}
