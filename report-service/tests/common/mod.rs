use report_service::config::ReportConfig;
use report_service::startup::Application;

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_template("templates/usage_report.json").await
    }

    /// Spawn the app against a specific template path, so tests can point
    /// at a deliberately missing artifact.
    pub async fn spawn_with_template(template_path: &str) -> Self {
        let mut config = ReportConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.template.path = template_path.to_string();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address }
    }
}

/// Raw byte scan for text the exporter wrote into a content stream.
#[allow(dead_code)]
pub fn pdf_contains(bytes: &[u8], needle: &str) -> bool {
    bytes
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}
