// System status display: shows where the artifacts live and whether they're present.

use std::path::Path;

use colored::Colorize;

use crate::config::Config;

/// Display artifact and configuration status to the terminal.
pub fn show(config: &Config) {
    show_artifact("Model", &config.model_path, config.model_url.as_deref(), "MODEL_URL");
    show_artifact(
        "Feature builder",
        &config.features_path,
        config.features_url.as_deref(),
        "FEATURES_URL",
    );

    println!("Model input tensor: {}", config.model_input);

    let index = config.public_dir.join("index.html");
    if index.exists() {
        println!("Landing page: {}", index.display());
    } else {
        println!(
            "Landing page: {} (JSON descriptor will be served)",
            "not found".dimmed()
        );
    }

    if config.debug {
        println!("Debug: {} (/api/test is enabled)", "on".yellow());
    } else {
        println!("Debug: off");
    }
}

fn show_artifact(label: &str, path: &Path, url: Option<&str>, url_var: &str) {
    match std::fs::metadata(path) {
        Ok(meta) => println!(
            "{label}: {} ({})",
            path.display(),
            format_bytes(meta.len())
        ),
        Err(_) => println!("{label}: {} {}", path.display(), "(missing)".red()),
    }

    match url {
        Some(url) => println!("  {url_var}: {url}"),
        None => println!("  {url_var}: not set"),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
