#![allow(dead_code)]

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mathshare_client::services::http::ApiClient;
use mathshare_client::{Config, ExerciseService};

/// A local mock backend bound to an ephemeral port. Counts every request it
/// receives so tests can assert that an operation made zero network calls.
pub struct MockBackend {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(self.base_url.clone())
    }

    pub fn service(&self) -> ExerciseService {
        ExerciseService::with_client(self.client())
    }

    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.base_url.clone(),
        }
    }
}

pub async fn spawn_backend(router: Router) -> MockBackend {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = router.layer(middleware::from_fn(move |request: Request, next: Next| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let response: Response = next.run(request).await;
            response
        }
    }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock backend crashed");
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        hits,
    }
}

pub fn exercise_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Quadratic Equation Factoring Problem",
        "statement": "Solve $x^2 - 7x + 12 = 0$ by factoring.",
        "solution": "$x = 3$ or $x = 4$",
        "category": "Algebra",
        "level": "advanced",
        "status": "finished",
        "createdAt": "2024-01-15T10:30:00Z",
        "imagePaths": ["images/exercise_001/original_1.jpg"],
        "confidenceScore": 0.95
    })
}

pub fn exercise_list_json(ids: &[&str], total: u64, page: u32, size: u32) -> Value {
    json!({
        "exercises": ids.iter().map(|id| exercise_json(id)).collect::<Vec<_>>(),
        "total": total,
        "page": page,
        "size": size
    })
}

pub fn conversion_json() -> Value {
    json!({
        "title": "Derivative of a polynomial",
        "statement": "Differentiate $f(x) = 3x^2 + 2x$.",
        "solution": "$f'(x) = 6x + 2$",
        "category": "Calculus",
        "confidenceScore": 0.87,
        "message": "AI conversion completed successfully"
    })
}
