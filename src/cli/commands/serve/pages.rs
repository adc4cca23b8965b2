//! HTML pages for the research web form.

use crate::orchestrator::ResearchOutcome;
use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { margin-bottom: 0.2rem; }
textarea { width: 100%; font: inherit; padding: 0.5rem; box-sizing: border-box; }
button { font: inherit; padding: 0.4rem 1rem; margin-top: 0.5rem; cursor: pointer; }
.primary { background: #e4572e; color: #fff; border: none; border-radius: 4px; }
.warning { background: #fff4d6; border-left: 4px solid #f0b429; padding: 0.6rem 0.8rem; }
.success { background: #e3f9e5; border-left: 4px solid #31a24c; padding: 0.6rem 0.8rem; }
.error { background: #fde8e8; border-left: 4px solid #d64545; padding: 0.6rem 0.8rem; }
pre { background: #f5f5f5; padding: 0.8rem; white-space: pre-wrap; word-break: break-word; }
.muted { color: #777; }
"#;

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
        <title>Inquestor</title>\n<style>{}</style>\n</head>\n<body>\n\
        <h1>Inquestor</h1>\n\
        <p class=\"muted\">Ask for any topic. The agent can search, consult Wikipedia, and save results.</p>\n\
        {}\n</body>\n</html>\n",
        STYLE, body
    )
}

/// The query form, optionally pre-filled.
fn form(query: &str, save_checked: bool, log_name: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/\">\n\
        <label for=\"query\"><strong>What can I help you research?</strong></label>\n\
        <textarea id=\"query\" name=\"query\" rows=\"5\" \
        placeholder=\"e.g., The impact of quantum dots in modern displays\">{}</textarea>\n\
        <label><input type=\"checkbox\" name=\"save\" value=\"on\"{}> Save output to {}</label><br>\n\
        <button type=\"submit\" class=\"primary\">Run Research</button>\n\
        </form>\n",
        encode_text(query),
        if save_checked { " checked" } else { "" },
        encode_text(log_name)
    )
}

/// The empty form page.
pub fn form_page(save_checked: bool, log_name: &str) -> String {
    layout(&form("", save_checked, log_name))
}

/// The form followed by a query's outcome.
pub fn result_page(query: &str, outcome: &ResearchOutcome, save_checked: bool, log_name: &str) -> String {
    let mut body = form(query, save_checked, log_name);

    match outcome.structured() {
        Some(result) => {
            body.push_str("<h2>Structured Result</h2>\n");
            body.push_str(&format!(
                "<p><strong>Topic:</strong> {}</p>\n<p><strong>Summary:</strong></p>\n<p>{}</p>\n",
                encode_text(&result.topic),
                encode_text(&result.summary).replace('\n', "<br>")
            ));

            if !result.sources.is_empty() {
                body.push_str("<p><strong>Sources:</strong></p>\n<ul>\n");
                for source in &result.sources {
                    body.push_str(&format!("<li>{}</li>\n", encode_text(source)));
                }
                body.push_str("</ul>\n");
            }

            if !result.tools_used.is_empty() {
                body.push_str(&format!(
                    "<p><strong>Tools used:</strong> {}</p>\n",
                    encode_text(&result.tools_used.join(", "))
                ));
            }

            if let Some(path) = &outcome.saved_to {
                body.push_str(&format!(
                    "<div class=\"success\">Data successfully saved to {}</div>\n",
                    encode_text(&path.display().to_string())
                ));
            }
        }
        None => {
            body.push_str(
                "<div class=\"warning\">Could not parse structured output. Showing raw text below.</div>\n",
            );
            body.push_str(&format!("<pre>{}</pre>\n", encode_text(&outcome.raw_text)));
        }
    }

    if let Some(err) = &outcome.save_error {
        body.push_str(&format!(
            "<div class=\"error\">Could not save output: {}</div>\n",
            encode_text(err)
        ));
    }

    let payload = outcome
        .export()
        .to_json_pretty()
        .unwrap_or_else(|_| "{}".to_string());
    body.push_str(&format!(
        "<form method=\"post\" action=\"/download\">\n\
        <input type=\"hidden\" name=\"payload\" value=\"{}\">\n\
        <button type=\"submit\">Download JSON</button>\n</form>\n",
        encode_double_quoted_attribute(&payload)
    ));

    layout(&body)
}

/// The form with an error message below it.
pub fn error_page(query: &str, message: &str, save_checked: bool, log_name: &str) -> String {
    let mut body = form(query, save_checked, log_name);
    body.push_str(&format!("<div class=\"error\">{}</div>\n", encode_text(message)));
    layout(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::extract_with_strategy;

    fn outcome(raw: &str) -> ResearchOutcome {
        ResearchOutcome {
            raw_text: raw.to_string(),
            extraction: extract_with_strategy(raw),
            tool_calls: Vec::new(),
            iterations: 1,
            saved_to: None,
            save_error: None,
        }
    }

    #[test]
    fn test_form_page_checkbox() {
        assert!(form_page(true, "research_output.txt").contains(" checked"));
        assert!(!form_page(false, "research_output.txt").contains(" checked"));
    }

    #[test]
    fn test_result_page_structured() {
        let raw = r#"{"topic":"<Dots>","summary":"S","sources":["a & b"],"toolsUsed":["wikipedia"]}"#;
        let page = result_page("dots", &outcome(raw), true, "out.txt");

        assert!(page.contains("Structured Result"));
        assert!(page.contains("&lt;Dots&gt;"));
        assert!(page.contains("<li>a &amp; b</li>"));
        assert!(page.contains("Tools used:</strong> wikipedia"));
        assert!(page.contains("action=\"/download\""));
    }

    #[test]
    fn test_result_page_raw_fallback() {
        let page = result_page("q", &outcome("I could not <finish>."), false, "out.txt");
        assert!(page.contains("Could not parse structured output"));
        assert!(page.contains("<pre>I could not &lt;finish&gt;.</pre>"));
        assert!(page.contains("rawText"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = error_page("q", "bad <key>", false, "out.txt");
        assert!(page.contains("bad &lt;key&gt;"));
    }
}
