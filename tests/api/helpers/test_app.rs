use std::{net::SocketAddr, time::Duration};

use jyutquiz::config::Config;
use jyutquiz::startup::{create_app_state, create_web_server};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::test_player::TestPlayer;

pub struct TestApp {
    pub base_address: String,
    pub inactivity_timeout: Duration,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        // Binding to port 0 triggers an OS scan for an available port, this way we can run tests in parallel where each runs its own application
        let random_port_address = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(random_port_address)
            .await
            .expect("Failed to bind to bind random port.");
        let address = listener.local_addr().unwrap();
        std::env::set_var("ENVIRONMENT", "dev");
        let config = {
            let mut config = Config::get().expect("Failed to read configuration.");
            config.quiz.settle_delay_millis = 50;
            config.quiz.advance_delay_millis = 100;
            config.quiz.client_inactivity_timeout_seconds = 1;
            config
        };

        let inactivity_timeout = config.quiz.client_inactivity_timeout();
        let app_state = create_app_state(config).expect("Failed to create the app state.");
        let _ = tokio::spawn(create_web_server(app_state, listener));

        TestApp {
            base_address: format!("127.0.0.1:{}", address.port()),
            inactivity_timeout,
        }
    }

    pub async fn open_session_websocket(
        &self,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, String> {
        tokio_tungstenite::connect_async(format!("ws://{}/session/ws", self.base_address))
            .await
            .map(|websocket_stream| websocket_stream.0)
            .map_err(|error| format!("WebSocket could not be created. Error: '{error}'."))
    }

    pub async fn connect_player(&self) -> TestPlayer {
        TestPlayer::new(self.open_session_websocket().await.unwrap())
    }
}
