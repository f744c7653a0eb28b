//! `SpectrometerClient` against the spectrometer routes on a local listener.

use axum::Router;
use spectrometer::{
    spectrometer_routes, ClientError, ConfigUpdate, DeviceRegistry, SimulatedDriver,
    SimulatedSpectrometer, SpectrometerApiState, SpectrometerClient,
};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn serve_devices(ids: &[&str]) -> (Arc<SimulatedDriver>, SpectrometerClient) {
    let driver = Arc::new(SimulatedDriver::new(
        ids.iter().map(|id| SimulatedSpectrometer::named(*id)).collect(),
    ));
    let registry = Arc::new(DeviceRegistry::new(driver.clone()));
    let url = serve(spectrometer_routes(Arc::new(SpectrometerApiState::new(
        registry,
    ))))
    .await;
    (driver, SpectrometerClient::new(&url).unwrap())
}

#[tokio::test]
async fn test_write_then_read_carries_config_id() {
    let (_, client) = serve_devices(&["SN12345"]).await;

    assert_eq!(client.list_devices().await.unwrap(), vec!["SN12345"]);

    let update = ConfigUpdate::default().with_int_time(200).with_scans_to_avg(4);
    assert_eq!(client.set_config("SN12345", &update).await.unwrap(), 1);

    let config = client.get_config("SN12345").await.unwrap();
    assert_eq!(config.int_time, 200);
    assert_eq!(config.scans_to_avg, 4);

    let reading = client.read_spectrum("SN12345").await.unwrap();
    assert_eq!(reading.config_id, 1);
    assert!(!reading.data.is_empty());
}

#[tokio::test]
async fn test_out_of_range_is_rejected_with_server_message() {
    let (_, client) = serve_devices(&["SN12345"]).await;

    let update = ConfigUpdate::default().with_int_time(1);
    let err = client.set_config("SN12345", &update).await.unwrap_err();
    match err {
        ClientError::Rejected(message) => assert!(message.starts_with("out of range: ")),
        other => panic!("expected Rejected, got {:?}", other),
    }

    assert_eq!(client.read_spectrum("SN12345").await.unwrap().config_id, 0);
}

#[tokio::test]
async fn test_unknown_device_is_not_found() {
    let (_, client) = serve_devices(&["SN12345"]).await;

    let err = client.get_config("SN99999").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(id) if id == "SN99999"));

    let err = client
        .set_config("SN99999", &ConfigUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_ids_with_reserved_characters_round_trip() {
    let (_, client) = serve_devices(&["SN#1", "usb 1/2", "a?b"]).await;

    let ids = client.list_devices().await.unwrap();
    assert_eq!(ids.len(), 3);

    for id in &ids {
        let config = client.get_config(id).await.unwrap();
        assert_eq!(&config.device_id, id);

        let config_id = client
            .set_config(id, &ConfigUpdate::default().with_scans_to_avg(2))
            .await
            .unwrap();
        assert_eq!(config_id, 1);
        assert_eq!(client.read_spectrum(id).await.unwrap().config_id, 1);
    }
}

#[tokio::test]
async fn test_disconnected_device_is_server_error() {
    let (driver, client) = serve_devices(&["SN12345"]).await;
    driver.device("SN12345").unwrap().disconnect();

    let err = client.read_spectrum("SN12345").await.unwrap_err();
    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("SN12345"));
        }
        other => panic!("expected Server, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_listing_route_is_not_a_device_error() {
    let url = serve(Router::new()).await;
    let client = SpectrometerClient::new(&url).unwrap();

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 404, .. }));
}
