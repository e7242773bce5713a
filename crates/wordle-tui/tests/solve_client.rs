use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wordle_core::session::{SuggestionView, WordList};
use wordle_core::{Board, Cell, SolveOptions, SolveRequest, SolveResult, SolveSession, Status};
use wordle_tui::config::Settings;
use wordle_tui::net::SolverClient;

type Captured = Arc<Mutex<Option<Value>>>;

/// Stand up a stub solving service that answers every request with `reply`
/// and records the last request body.
async fn start_stub(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();

    let app = Router::new().route(
        "/api/solve",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            let reply = reply.clone();
            async move {
                *sink.lock().unwrap() = Some(body);
                (status, Json(reply))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{}", port), captured)
}

fn client_for(base: &str) -> SolverClient {
    let settings = Settings {
        server_url: base.to_string(),
        request_timeout_secs: 2,
        ..Settings::default()
    };
    SolverClient::new(&settings).unwrap()
}

fn sample_board() -> Board {
    let mut board = Board::new();
    for (col, (letter, status)) in [
        ('C', Status::Absent),
        ('R', Status::Present),
        ('A', Status::Correct),
        ('N', Status::Absent),
        ('E', Status::Absent),
    ]
    .into_iter()
    .enumerate()
    {
        board.set(0, col, Cell::new(letter, status)).unwrap();
    }
    board
}

#[tokio::test]
async fn success_reply_decoded_and_request_shaped() {
    let (base, captured) = start_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "valid_words_count": 37,
            "hard_mode_count": 12,
            "suggestions": ["toast", "roast"],
            "suggestion_source": "normal_mode",
            "valid_words": ["roast", "toast"],
            "answer_found": false
        }),
    )
    .await;

    let request = SolveRequest::new(
        &sample_board(),
        SolveOptions {
            hard_mode: true,
            exclude_known_letters: false,
        },
    );
    let result = client_for(&base).submit(&request).await;

    let s = match result {
        SolveResult::Success(s) => s,
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(s.suggestions, vec!["toast", "roast"]);
    assert_eq!(s.valid_words_count, 37);

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(body["invalid_letters"], json!(["c", "n", "e"]));
    assert_eq!(body["hard_mode"], json!(true));
    assert_eq!(body["grid"][0][2], json!({ "letter": "A", "status": "correct" }));
    assert_eq!(body["grid"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn answer_found_renders_single_answer() {
    let (base, _) = start_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "valid_words_count": 500,
            "suggestions": ["crane"],
            "valid_words": ["crane"],
            "answer_found": true,
            "message": "Only one possible word remains: CRANE"
        }),
    )
    .await;

    let board = sample_board();
    let mut session = SolveSession::new();
    let request = session.begin(&board).unwrap();
    let result = client_for(&base).submit(&request).await;
    session.finish(result, Instant::now()).unwrap();

    let plan = session.results().unwrap();
    assert!(matches!(&plan.suggestions, SuggestionView::Answer { word, .. } if word == "CRANE"));
    assert_eq!(plan.word_list, WordList::Hidden);
}

#[tokio::test]
async fn structured_error_on_500_surfaces_message() {
    let (base, _) = start_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": "static/wordlist.txt not found" }),
    )
    .await;

    let request = SolveRequest::new(&Board::new(), SolveOptions::default());
    let result = client_for(&base).submit(&request).await;
    assert_eq!(
        result,
        SolveResult::Failure {
            error: "static/wordlist.txt not found".into()
        }
    );
}

#[tokio::test]
async fn undecodable_reply_is_connection_failure() {
    let (base, _) = start_stub(StatusCode::OK, json!(["not", "an", "object"])).await;

    let request = SolveRequest::new(&Board::new(), SolveOptions::default());
    let result = client_for(&base).submit(&request).await;
    assert_eq!(result, SolveResult::connection_failed());
}

#[tokio::test]
async fn unreachable_service_leaves_board_untouched() {
    // Grab a free port, then close it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let board = sample_board();
    let before = board.clone();
    let mut session = SolveSession::new();
    let request = session.begin(&board).unwrap();
    assert!(session.is_busy());

    let result = client_for(&format!("http://127.0.0.1:{}", port))
        .submit(&request)
        .await;
    assert_eq!(result, SolveResult::connection_failed());

    session.finish(result, Instant::now()).unwrap();
    assert_eq!(board, before);
    assert!(!session.is_busy());
    assert_eq!(session.notification().unwrap().text, "connection failed");
    assert!(session.begin(&board).is_ok());
}
