//! Output format instructions given to the model.

use serde_json::json;

/// JSON schema of `ResearchResult` as shown to the model.
pub fn result_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "topic": { "type": "string", "description": "Short label for the research topic" },
            "summary": { "type": "string", "description": "The research findings" },
            "sources": {
                "type": "array",
                "items": { "type": "string" },
                "description": "References used, most relevant first"
            },
            "toolsUsed": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Names of the tools called, in call order"
            }
        },
        "required": ["topic", "summary", "sources", "toolsUsed"]
    })
}

/// Instructions asking for a single JSON object conforming to the schema.
pub fn format_instructions() -> String {
    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
        As an example, for the schema {{\"properties\": {{\"foo\": {{\"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}\n\
        the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
        The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\n\
        Here is the output schema:\n```\n{:#}\n```\n\n\
        Respond with the JSON object only: no markdown, no commentary.",
        result_schema()
    )
}
