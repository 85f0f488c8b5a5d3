//! Process lifecycle: the listener is never bound when a store is unreachable.

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use agrilake_server::store::ConnectOptions;
use agrilake_server::{serve, AgrilakeConfig, StartupError, StoreBackend};

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn unreachable_store_prevents_listening() {
    let port = free_port();

    let mut config = AgrilakeConfig::default();
    config.server.bind_addr = SocketAddr::from(([127, 0, 0, 1], port));
    config.store.backend = StoreBackend::Postgres;
    config.store.farm.database_url = "postgres://agrilake@127.0.0.1:1/farmdb".to_string();
    config.store.connect = ConnectOptions {
        max_connections: 1,
        connect_timeout: Duration::from_millis(500),
    };

    let result = serve(config).await;
    match result {
        Err(StartupError::Store { store, .. }) => assert_eq!(store, "farm"),
        other => panic!("expected store startup error, got {:?}", other),
    }

    // nothing ever bound the port
    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}
