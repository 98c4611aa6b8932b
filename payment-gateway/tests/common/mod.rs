use payment_gateway::config::{Config, RazorpayConfig, ServerConfig};
use payment_gateway::services::signature::compute_signature;
use payment_gateway::Application;
use secrecy::Secret;
use wiremock::MockServer;

pub const TEST_KEY_ID: &str = "rzp_test_123";
pub const TEST_KEY_SECRET: &str = "test_key_secret";

pub struct TestApp {
    pub address: String,
    pub gateway: MockServer,
}

impl TestApp {
    /// Spawn the application on a random port, pointed at a mock gateway.
    pub async fn spawn() -> Self {
        let gateway = MockServer::start().await;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            razorpay: RazorpayConfig {
                key_id: TEST_KEY_ID.to_string(),
                key_secret: Secret::new(TEST_KEY_SECRET.to_string()),
                api_base_url: gateway.uri(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp { address, gateway }
    }

    /// Sign an order/payment pair the way Razorpay checkout would.
    pub fn sign(order_id: &str, payment_id: &str) -> String {
        compute_signature(order_id, payment_id, TEST_KEY_SECRET)
            .expect("Failed to compute test signature")
    }
}
