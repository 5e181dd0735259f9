use std::path::Path;

use tolgee_pull::formats::AndroidStringsFormat;
use tolgee_pull::traits::Parser;

const PREVIEW_CHARS: usize = 50;

/// Print the `<string>` resources of a written `strings.xml`.
pub fn print_inspect(input: &Path, full: bool) -> Result<(), String> {
    let format = AndroidStringsFormat::read_from(input)
        .map_err(|e| format!("Error reading {}: {}", input.display(), e))?;

    if format.strings.is_empty() {
        return Err(format!("No string resources found in {}", input.display()));
    }

    println!("Resources: {}", format.strings.len());

    for (i, sr) in format.strings.iter().enumerate() {
        println!("\n  Entry {}: {}", i + 1, sr.name);
        println!(
            "    Body: {}",
            if sr.body.is_markup() { "CDATA" } else { "Text" }
        );
        if let Some(formatted) = sr.formatted {
            println!("    Formatted: {}", formatted);
        }
        println!("    Value: {}", preview(sr.value(), full));
    }

    Ok(())
}

fn preview(value: &str, full: bool) -> String {
    if full || value.chars().count() <= PREVIEW_CHARS {
        return value.to_string();
    }
    let truncated: String = value.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", truncated)
}
