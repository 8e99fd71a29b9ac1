use std::net::SocketAddr;
use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pointscan::modules::{evaluation, extract, preprocess};
use pointscan::{config, server, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointscan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    let args: Vec<String> = std::env::args().collect();

    // Evaluation mode: score the OCR pipeline against a reference image
    // instead of serving. `pointscan --eval photo.png --expected lines.json`
    if let Some(pos) = args.iter().position(|arg| arg == "--eval") {
        let image = args
            .get(pos + 1)
            .expect("--eval requires an image path");
        let expected = args
            .iter()
            .position(|arg| arg == "--expected")
            .and_then(|p| args.get(p + 1));
        run_eval(config, image, expected.map(String::as_str)).await;
        return;
    }

    let state = AppState::new(config.clone());
    let app = server::build_router(state);

    // Find available port
    let port = server::find_available_port(config.port).expect("Failed to find available port");
    if port != config.port {
        tracing::warn!(
            "Preferred port {} was not available, using port {} instead",
            config.port,
            port
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("pointscan server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn run_eval(config: config::Config, image: &str, expected_path: Option<&str>) {
    let method = config.preprocess;
    let state = AppState::new(config);

    let image = Path::new(image);
    let temp = preprocess::preprocess_to_temp(image, method).expect("Preprocessing failed");
    let ocr_input = temp.as_deref().unwrap_or(image);

    let lines = state
        .engine
        .extract_lines(ocr_input)
        .await
        .expect("OCR failed");

    if let Some(temp) = &temp {
        let _ = tokio::fs::remove_file(temp).await;
    }

    println!("=== Extracted text ===");
    for line in &lines {
        println!("{}", line);
    }

    if let Some(path) = expected_path {
        let expected =
            evaluation::load_expected(Path::new(path)).expect("Failed to load expected data");
        println!(
            "\nAccuracy:            {:.2}%",
            evaluation::compare(&lines, &expected)
        );
        println!(
            "Normalized accuracy: {:.2}%",
            evaluation::compare_normalized(&lines, &expected)
        );
    }

    let records = extract::extract_records(&lines, &state.name_table);
    println!("\n=== Records ===");
    println!(
        "{}",
        serde_json::to_string_pretty(&records).expect("Failed to serialize records")
    );
}
