use std::time::Duration;

use osrm_client::{OsrmClient, OsrmSettings};
use serde_json::{Value, json};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

pub struct TestHelper {
    pub mock_server: MockServer,
    pub client: OsrmClient,
}

impl TestHelper {
    pub async fn new() -> TestHelper {
        let mock_server = MockServer::start().await;
        let client = OsrmClient::new(&OsrmSettings {
            base_url: mock_server.uri(),
            timeout: Duration::from_secs(5),
        });
        TestHelper {
            mock_server,
            client,
        }
    }

    pub async fn mock_response(&self, status: u16, body: Value) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }
}

pub fn route_response() -> Value {
    json!({
        "code": "Ok",
        "routes": [{
            "geometry": {
                "coordinates": [[10.39, 63.43], [10.41, 63.44], [10.45, 63.46]],
                "type": "LineString",
            },
            "distance": 5_200.0,
            "duration": 420.0,
            "legs": [],
        }],
        "waypoints": [],
    })
}
