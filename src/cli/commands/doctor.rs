//! Doctor command - verify credentials, configuration and log file.

use crate::cli::Output;
use crate::config::{LlmSettings, Settings};
use console::style;
use std::fs::OpenOptions;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
///
/// `config_path` is the file given with `--config`, if any.
pub fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("Inquestor Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Model").bold());
    let model_checks = vec![
        check_api_key(&settings.llm, std::env::var(&settings.llm.api_key_env).ok()),
        CheckResult::ok(
            "Model",
            &format!("{} via {}", settings.llm.model, settings.llm.api_base),
        ),
    ];
    print_section(&model_checks);
    checks.extend(model_checks);

    println!("{}", style("Tools").bold());
    let tool_checks = check_tools(settings);
    print_section(&tool_checks);
    checks.extend(tool_checks);

    println!("{}", style("Files").bold());
    let file_checks = vec![
        check_config_file(&Settings::config_path(config_path)),
        check_log_file(&settings.log_path()),
    ];
    print_section(&file_checks);
    checks.extend(file_checks);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Inquestor.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Inquestor is ready to use.");
    }

    Ok(())
}

fn print_section(checks: &[CheckResult]) {
    for check in checks {
        check.print();
    }
    println!();
}

/// Check the API key value read from the configured variable.
fn check_api_key(llm: &LlmSettings, value: Option<String>) -> CheckResult {
    let name = llm.api_key_env.as_str();
    let hint = format!("Set {} in your environment or a .env file", name);

    match value {
        Some(key) if key.chars().count() > 12 => {
            let head: String = key.chars().take(4).collect();
            let tail: String = key.chars().skip(key.chars().count() - 4).collect();
            CheckResult::ok(name, &format!("configured ({}...{})", head, tail))
        }
        Some(key) if key.is_empty() => CheckResult::error(name, "empty", &hint),
        Some(_) => CheckResult::warning(name, "set but looks too short", &hint),
        None => CheckResult::error(name, "not set", &hint),
    }
}

fn check_tools(settings: &Settings) -> Vec<CheckResult> {
    let tool = |name: &str, enabled: bool, detail: &str| {
        CheckResult::ok(name, if enabled { detail } else { "disabled" })
    };

    let wikipedia = &settings.tools.wikipedia;
    vec![
        tool(
            "wikipedia",
            wikipedia.enabled,
            &format!(
                "top {} result(s), {} chars",
                wikipedia.top_k_results, wikipedia.doc_content_chars_max
            ),
        ),
        tool(
            "search",
            settings.tools.search.enabled,
            &format!("up to {} snippets", settings.tools.search.max_results),
        ),
        tool("save_text_to_file", settings.tools.save_enabled, "enabled"),
    ]
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            &format!("{} not found, using defaults", config_path.display()),
            "Create with: inquestor config edit",
        )
    }
}

/// Check the research log location.
///
/// An existing log is opened for append, the same way saving opens it.
fn check_log_file(log_path: &Path) -> CheckResult {
    if log_path.exists() {
        if let Err(e) = OpenOptions::new().append(true).open(log_path) {
            return CheckResult::error(
                "Research log",
                &format!("{} is not writable: {}", log_path.display(), e),
                "Fix the file permissions or set output.log_path in the config",
            );
        }

        let size = std::fs::metadata(log_path)
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        return CheckResult::ok(
            "Research log",
            &format!("{} ({})", log_path.display(), size),
        );
    }

    match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => CheckResult::warning(
            "Research log",
            &format!("{} (directory will be created)", log_path.display()),
            "The directory is created on first save",
        ),
        _ => CheckResult::ok(
            "Research log",
            &format!("{} (not created yet)", log_path.display()),
        ),
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_api_key() {
        let llm = LlmSettings::default();
        let ok = check_api_key(&llm, Some("AIzaSyA1234567890abcd".to_string()));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert_eq!(ok.message, "configured (AIza...abcd)");
        assert!(!ok.message.contains("1234567890"));

        assert_eq!(check_api_key(&llm, None).status, CheckStatus::Error);
        assert_eq!(check_api_key(&llm, Some(String::new())).status, CheckStatus::Error);
        assert_eq!(check_api_key(&llm, Some("short".to_string())).status, CheckStatus::Warning);
    }

    #[test]
    fn test_check_tools_names() {
        let mut settings = Settings::default();
        settings.tools.search.enabled = false;
        let checks = check_tools(&settings);

        let names: Vec<&str> = checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["wikipedia", "search", "save_text_to_file"]);
        assert_eq!(checks[1].message, "disabled");
    }

    #[test]
    fn test_check_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");
        assert_eq!(check_log_file(&path).status, CheckStatus::Ok);

        std::fs::write(&path, "x").unwrap();
        assert!(check_log_file(&path).message.contains("1 B"));

        let nested = dir.path().join("missing").join("log.txt");
        assert_eq!(check_log_file(&nested).status, CheckStatus::Warning);
    }

    #[test]
    fn test_check_log_file_not_writable() {
        // A directory where the log file should be cannot be opened for append.
        let dir = tempfile::tempdir().unwrap();
        let check = check_log_file(dir.path());
        assert_eq!(check.status, CheckStatus::Error);
        assert!(check.message.contains("not writable"));
    }

    #[test]
    fn test_check_config_file_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom.toml");
        std::fs::write(&custom, "[llm]\nmodel = \"gemini-2.5-pro\"\n").unwrap();

        let check = check_config_file(&Settings::config_path(Some(custom.as_path())));
        assert_eq!(check.status, CheckStatus::Ok);
        assert_eq!(check.message, custom.display().to_string());

        let missing = dir.path().join("absent.toml");
        let check = check_config_file(&Settings::config_path(Some(missing.as_path())));
        assert_eq!(check.status, CheckStatus::Warning);
        assert!(check.message.contains("absent.toml"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }
}
