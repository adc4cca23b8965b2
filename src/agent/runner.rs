//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, ToolContext};
use super::{AgentResponse, ResearchAgent, ToolCallRecord};
use crate::config::LlmSettings;
use crate::error::{InquestorError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Research agent backed by an OpenAI-compatible chat completions API.
pub struct Agent {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    tools: ToolContext,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent with the given client, tools and model settings.
    pub fn new(client: Client<OpenAIConfig>, tools: ToolContext, settings: &LlmSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            tools,
            max_iterations: settings.max_iterations.max(1),
            system_prompt: String::new(),
        }
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Names of the tools offered to the model.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.names()
    }

    fn build_messages(&self, query: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if !self.system_prompt.is_empty() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(self.system_prompt.clone())
                    .build()
                    .map_err(|e| InquestorError::Agent(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(query)
                .build()
                .map_err(|e| InquestorError::Agent(e.to_string()))?
                .into(),
        );

        Ok(messages)
    }

    /// Execute a single tool call and return a record of it.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => {
                    warn!("Tool {} failed: {}", name, e);
                    format!("Tool error: {}", e)
                }
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

#[async_trait]
impl ResearchAgent for Agent {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn invoke(&self, query: &str) -> Result<AgentResponse> {
        let mut messages = self.build_messages(query)?;
        let tools = self.tools.definitions();

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(InquestorError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let mut request = CreateChatCompletionRequestArgs::default();
            request
                .model(&self.model)
                .messages(messages.clone())
                .temperature(self.temperature);
            if !tools.is_empty() {
                request.tools(tools.clone());
            }
            let request = request
                .build()
                .map_err(|e| InquestorError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| InquestorError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| InquestorError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    return Ok(AgentResponse {
                        content: choice.message.content.clone().unwrap_or_default(),
                        tool_calls: tool_calls_made,
                        iterations,
                    });
                }
            };

            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| InquestorError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| InquestorError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::Lookup;
    use crate::research::{extract, ResearchLog};
    use async_openai::types::{ChatCompletionToolType, FunctionCall};
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const ANSWER: &str = r#"{"topic":"Rust","summary":"A systems language.","sources":["wikipedia"],"toolsUsed":["wikipedia"]}"#;

    struct EchoLookup;

    #[async_trait]
    impl Lookup for EchoLookup {
        async fn lookup(&self, query: &str) -> Result<String> {
            Ok(format!("echo {}", query))
        }
    }

    /// Chat completions endpoint that asks for `tool_rounds` Wikipedia lookups, then answers.
    #[derive(Clone)]
    struct MockModel {
        tool_rounds: usize,
        served: Arc<AtomicUsize>,
    }

    async fn completions(State(model): State<MockModel>, Json(_request): Json<Value>) -> Json<Value> {
        let n = model.served.fetch_add(1, Ordering::SeqCst);

        let (message, finish_reason) = if n < model.tool_rounds {
            let call = json!({
                "id": format!("call_{}", n),
                "type": "function",
                "function": { "name": "wikipedia", "arguments": r#"{"query": "x"}"# }
            });
            (json!({ "role": "assistant", "content": null, "tool_calls": [call] }), "tool_calls")
        } else {
            (json!({ "role": "assistant", "content": ANSWER }), "stop")
        };

        Json(json!({
            "id": format!("chatcmpl-{}", n),
            "object": "chat.completion",
            "created": 0,
            "model": "mock",
            "choices": [{
                "index": 0,
                "message": message,
                "finish_reason": finish_reason,
                "logprobs": null
            }]
        }))
    }

    /// Serve a mock model on a local port and return its base URL and request counter.
    async fn spawn_model(tool_rounds: usize) -> (String, Arc<AtomicUsize>) {
        let served = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/chat/completions", post(completions))
            .with_state(MockModel {
                tool_rounds,
                served: served.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), served)
    }

    fn agent_at(api_base: &str, max_iterations: usize) -> Agent {
        let settings = LlmSettings {
            max_iterations,
            ..LlmSettings::default()
        };
        let client = Client::with_config(
            OpenAIConfig::new()
                .with_api_base(api_base)
                .with_api_key("test"),
        );
        let tools = ToolContext::new().with_wikipedia(Arc::new(EchoLookup));
        Agent::new(client, tools, &settings).with_system_prompt("system")
    }

    fn agent(tools: ToolContext) -> Agent {
        let settings = LlmSettings::default();
        let client = Client::with_config(OpenAIConfig::new().with_api_key("test"));
        Agent::new(client, tools, &settings).with_system_prompt("system")
    }

    #[test]
    fn test_build_messages() {
        let messages = agent(ToolContext::new()).build_messages("quantum dots").unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_build_messages_without_system_prompt() {
        let agent = agent(ToolContext::new()).with_system_prompt("");
        assert_eq!(agent.build_messages("q").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_tool_call_records_errors() {
        let agent = agent(ToolContext::new());
        let call = ChatCompletionMessageToolCall {
            id: "call_1".to_string(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: "search".to_string(),
                arguments: r#"{"query": "rust"}"#.to_string(),
            },
        };

        let record = agent.execute_tool_call(&call).await;
        assert_eq!(record.name, "search");
        assert!(record.result.starts_with("Tool error:"));
    }

    #[tokio::test]
    async fn test_execute_tool_call_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");
        let agent = agent(ToolContext::new().with_log(ResearchLog::new(&path)));
        let call = ChatCompletionMessageToolCall {
            id: "call_2".to_string(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: "save_text_to_file".to_string(),
                arguments: r#"{"data": "findings"}"#.to_string(),
            },
        };

        let record = agent.execute_tool_call(&call).await;
        assert!(record.result.starts_with("Data successfully saved"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("findings"));
    }

    #[tokio::test]
    async fn test_invoke_runs_tools_until_final_answer() {
        let (api_base, served) = spawn_model(1).await;
        let response = agent_at(&api_base, 3).invoke("Tell me about Rust").await.unwrap();

        assert_eq!(response.iterations, 2);
        assert_eq!(served.load(Ordering::SeqCst), 2);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "wikipedia");
        assert_eq!(response.tool_calls[0].result, "echo x");
        assert_eq!(response.content, ANSWER);
        assert_eq!(extract(&response.content).unwrap().topic, "Rust");
    }

    #[tokio::test]
    async fn test_invoke_fails_after_max_iterations() {
        let (api_base, served) = spawn_model(usize::MAX).await;
        let err = agent_at(&api_base, 3).invoke("loop forever").await.unwrap_err();

        match err {
            InquestorError::Agent(msg) => assert!(msg.contains("maximum iterations (3)")),
            other => panic!("Expected agent error, got {:?}", other),
        }
        assert_eq!(served.load(Ordering::SeqCst), 3);
    }
}
