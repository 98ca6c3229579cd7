//! Free-form answers interpreted through a local stand-in for the
//! chat-completions API.
//!
//! Tests cover:
//! - Answers mapped to options by the model's reply
//! - Typed numbers bypassing the model entirely
//! - Unhelpful replies defaulting to the first option
//! - API errors falling back to numbered selection
//! - The storyteller conversation, page reprints and transcripts

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use serde_json::{Value, json};

use lehua_bots::adventure::Adventure;
use lehua_bots::session::StorySession;
use lehua_bots::terminal::Terminal;
use lehua_story::choice::{ChoiceInterpreter, LlmInterpreter};
use lehua_story::journal::Journal;
use lehua_story::llm::LlmClient;
use lehua_story::scene::ChoiceCategory;
use lehua_story::storyteller::Storyteller;
use lehua_story::Ending;

type Requests = Arc<Mutex<Vec<Value>>>;

fn completion(text: &str) -> Json<Value> {
    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    }))
}

/// Picks an option from keywords in the player's quoted answer.
async fn interpret(State(requests): State<Requests>, Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
    requests.lock().unwrap().push(body);
    let reply = if prompt.contains("\"I'll climb up the ridge\"") {
        "1"
    } else if prompt.contains("\"the friends I meet\"") {
        "Option 3"
    } else if prompt.contains("\"no thanks\"") {
        "2"
    } else {
        "I'm not sure."
    };
    completion(reply)
}

/// Narrates numbered pages.
async fn narrate(State(requests): State<Requests>, Json(body): Json<Value>) -> Json<Value> {
    let told = body["messages"]
        .as_array()
        .map(|m| m.iter().filter(|m| m["role"] == "assistant").count())
        .unwrap_or_default();
    requests.lock().unwrap().push(body);
    completion(&format!("  Page {} of the tale.  ", told + 1))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

async fn fake_interpreter_api() -> (String, Requests) {
    let requests = Requests::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(interpret))
        .with_state(requests.clone());
    (serve(app).await, requests)
}

async fn fake_storyteller_api() -> (String, Requests) {
    let requests = Requests::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(narrate))
        .with_state(requests.clone());
    (serve(app).await, requests)
}

fn client(base_url: &str) -> LlmClient {
    LlmClient::new("test-key".into())
        .with_model("test-model")
        .with_base_url(base_url)
}

fn run_adventure(
    input: &'static str,
    base_url: &str,
) -> Adventure<LlmInterpreter, &'static [u8], Vec<u8>> {
    let term = Terminal::new(input.as_bytes(), Vec::new(), 0, false);
    Adventure::new(term, Some(LlmInterpreter::new(client(base_url))))
}

#[tokio::test]
async fn free_form_answers_steer_the_story() {
    let (url, requests) = fake_interpreter_api().await;

    // welcome, intro, ridge, riddle, chant typed as a number, decline replay
    let input = "\n\nI'll climb up the ridge\nthe friends I meet\n1\nno thanks\n";
    let mut game = run_adventure(input, &url);
    let outcome = game.run().await.unwrap();
    let out = String::from_utf8(game.into_terminal().into_parts().1).unwrap();

    assert_eq!(outcome.journeys.len(), 1);
    assert_eq!(outcome.journeys[0].ending, Ending::Restoration);
    assert!(out.contains("You can respond to choices using natural language instead of numbers."));
    assert!(out.contains("Describe your choice in your own words:"));
    assert!(out.contains("MENEHUNE: Wise answer."));

    let requests = requests.lock().unwrap();
    // The typed "1" never reached the model.
    assert_eq!(requests.len(), 3);
    let first = &requests[0];
    assert_eq!(first["model"], "test-model");
    assert_eq!(first["max_tokens"], 10);
    assert_eq!(first["messages"][0]["role"], "system");
    let prompt = first["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("1. Climb the ridge to search from above."));
    assert!(prompt.contains("which option (1 to 3)"));
}

#[tokio::test]
async fn unhelpful_reply_picks_the_first_option() {
    let (url, _) = fake_interpreter_api().await;
    let interpreter = LlmInterpreter::new(client(&url));
    let choice = interpreter
        .interpret("hmm, maybe", &["Yes", "No"], ChoiceCategory::PlayAgain)
        .await
        .unwrap();
    assert_eq!(choice.number(), 1);
}

#[tokio::test]
async fn api_errors_fall_back_to_numbers() {
    let app = Router::new().route("/v1/chat/completions", post(broken));
    let url = serve(app).await;

    let input = "\n\nclimb\n2\nkin please\n3\nshatter it\n2\nno\n2\n";
    let mut game = run_adventure(input, &url);
    let outcome = game.run().await.unwrap();
    let out = String::from_utf8(game.into_terminal().into_parts().1).unwrap();

    assert_eq!(outcome.journeys[0].ending, Ending::Sacrifice);
    assert!(out.contains("MOʻO WAHINE: Well spoken."));
    assert_eq!(out.matches("Falling back to numbered choice selection.").count(), 4);
    assert!(out.contains("Error processing input with LLM: Chat API error 500"));
}

#[tokio::test]
async fn storyteller_keeps_the_conversation() {
    let (url, requests) = fake_storyteller_api().await;
    let journal = Journal::in_memory().unwrap();

    let input = "I'm Keola, ready\n/pages\n\nclimb the ridge\n/quit\nnever read\n";
    let term = Terminal::new(input.as_bytes(), Vec::new(), 0, false);
    let mut session =
        StorySession::new(Storyteller::new(client(&url)), term, "s1").with_journal(&journal);
    session.run().await.unwrap();

    let pages = session.storyteller().pages().to_vec();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].text, "Page 1 of the tale.");
    assert_eq!(pages[2].text, "Page 3 of the tale.");
    assert_eq!(session.storyteller().conversation().turns(), 5);

    let out = String::from_utf8(session.into_terminal().into_parts().1).unwrap();
    assert!(out.contains("── Page 1 ──"));
    assert!(out.contains("A hui hou."));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    // The storyteller opens with only its persona in context.
    assert_eq!(requests[0]["messages"].as_array().unwrap().len(), 1);
    let last = requests[2]["messages"].as_array().unwrap();
    assert_eq!(last.len(), 5);
    assert_eq!(last[4]["content"], "climb the ridge");

    assert_eq!(journal.pages("s1").unwrap(), pages);
}

#[tokio::test]
async fn storyteller_survives_a_failed_reply() {
    let app = Router::new().route("/v1/chat/completions", post(broken));
    let url = serve(app).await;
    let mut teller = Storyteller::new(client(&url));
    assert!(teller.open().await.is_err());
    assert!(teller.reply("hello").await.is_err());
    assert_eq!(teller.conversation().turns(), 0);
}
