use async_trait::async_trait;
use std::sync::Mutex;

use csw_catalog::app::ports::CatalogTransport;
use csw_catalog::request::build_get_records;
use csw_catalog::parser::parse_get_records;
use csw_catalog::{CatalogClient, CatalogError, CatalogResponse, DcValue, RecordFilter, Result, SearchRequest};

const GET_RECORDS: &str = include_str!("fixtures/get_records_response.xml");
const GET_RECORD_BY_ID: &str = include_str!("fixtures/get_record_by_id_response.xml");
const EXCEPTION_REPORT: &str = include_str!("fixtures/exception_report.xml");
const BOGUS_CRS: &str = include_str!("fixtures/bogus_crs_response.xml");

const CATALOG_URL: &str = "https://demo.example.org/geoserver/csw?request=GetCapabilities";

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Get(String),
    Post {
        url: String,
        body: String,
        content_type: String,
    },
}

/// Canned-body transport that records what it was asked to send
struct FakeTransport {
    body: Option<String>,
    sent: Mutex<Vec<Sent>>,
}

impl FakeTransport {
    fn answering(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            body: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn reply(&self) -> Result<String> {
        self.body.clone().ok_or_else(|| CatalogError::Status {
            status: 503,
            url: "https://demo.example.org/geoserver/csw".to_string(),
        })
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.sent.lock().unwrap().push(Sent::Get(url.to_string()));
        self.reply()
    }

    async fn post(&self, url: &str, body: String, content_type: &str) -> Result<String> {
        self.sent.lock().unwrap().push(Sent::Post {
            url: url.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        self.reply()
    }
}

#[test]
fn test_default_request_then_parse_keeps_source_order() {
    let body = build_get_records(1, 10, None);
    assert!(body.contains("startPosition=\"1\" maxRecords=\"10\""));

    let result = parse_get_records(GET_RECORDS).unwrap().found().unwrap();
    assert_eq!(result.number_of_records_returned, Some(2));
    assert_eq!(result.number_of_records_matched, Some(7));
    assert_eq!(result.next_record, Some(3));
    assert_eq!(result.records.len(), 2);

    let identifiers: Vec<_> = result
        .records
        .iter()
        .map(|r| r.dc.as_ref().unwrap().get("identifier").unwrap().clone())
        .collect();
    assert_eq!(
        identifiers,
        vec![
            DcValue::Single("topp:states".into()),
            DcValue::Single("nurc:Arc_Sample".into())
        ]
    );
}

#[test]
fn test_records_are_normalized() {
    let result = parse_get_records(GET_RECORDS).unwrap().found().unwrap();

    let states = &result.records[0];
    let dc = states.dc.as_ref().unwrap();
    assert_eq!(
        dc.get("subject"),
        Some(&DcValue::Many(vec!["census".into(), "united states".into()]))
    );
    assert_eq!(dc.get("title"), Some(&DcValue::Single("USA Population".into())));
    assert_eq!(dc.references.len(), 1);
    assert_eq!(
        dc.references[0].value,
        "http://demo.example.org/geoserver/wms?service=WMS&request=GetCapabilities"
    );
    assert_eq!(dc.references[0].scheme.as_deref(), Some("OGC:WMS"));

    // EPSG URN arrives latitude-first and is swapped
    let bbox = states.bounding_box.as_ref().unwrap();
    assert_eq!(bbox.crs, "EPSG:4326");
    assert_eq!(bbox.extent, [-124.731, 24.956, -66.97, 49.372]);

    // CRS84 is already longitude-first; the second (EPSG:3857) box is ignored
    let sample = &result.records[1];
    let bbox = sample.bounding_box.as_ref().unwrap();
    assert_eq!(bbox.crs, "EPSG:4326");
    assert_eq!(bbox.extent, [-180.0, -90.0, 180.0, 90.0]);
    assert_eq!(sample.dc.as_ref().unwrap().references.len(), 2);

    // csw:Record carries no ISO fields
    assert!(states.file_identifier.is_none());
    assert!(states.date_stamp.is_none());
    assert!(states.identification_info.is_none());
}

#[tokio::test]
async fn test_get_records_posts_xml_to_normalized_url() {
    let client = CatalogClient::new(FakeTransport::answering(GET_RECORDS));

    let response = client.get_records(CATALOG_URL, 1, 10, None).await.unwrap();
    assert_eq!(response.found().unwrap().records.len(), 2);

    let sent = client.transport().sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Post {
            url,
            body,
            content_type,
        } => {
            assert_eq!(url, "https://demo.example.org/geoserver/csw?service=CSW&version=2.0.2");
            assert_eq!(content_type, "application/xml");
            assert_eq!(body, &build_get_records(1, 10, None));
        }
        other => panic!("expected POST, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exception_report_is_a_value_not_an_error() {
    let client = CatalogClient::new(FakeTransport::answering(EXCEPTION_REPORT));

    let response = client.text_search(CATALOG_URL, 1, 10, "roads").await.unwrap();
    let error = response.exception().unwrap();
    assert_eq!(error.message, "Invalid request");
    assert_eq!(error.code.as_deref(), Some("InvalidParameterValue"));
    assert_eq!(error.locator.as_deref(), Some("typeNames"));
    assert_eq!(
        serde_json::to_value(&response).unwrap()["error"],
        serde_json::json!("Invalid request")
    );
}

#[tokio::test]
async fn test_text_search_sends_any_text_constraint() {
    let client = CatalogClient::new(FakeTransport::answering(GET_RECORDS));
    client.text_search(CATALOG_URL, 11, 5, "population").await.unwrap();

    match &client.transport().sent()[0] {
        Sent::Post { body, .. } => {
            assert!(body.contains("<ogc:PropertyName>csw:AnyText</ogc:PropertyName><ogc:Literal>%population%</ogc:Literal>"));
            assert!(body.contains("startPosition=\"11\" maxRecords=\"5\""));
        }
        other => panic!("expected POST, got {other:?}"),
    }
}

#[tokio::test]
async fn test_workspace_search_defaults_to_wildcards() {
    let client = CatalogClient::new(FakeTransport::answering(GET_RECORDS));
    client
        .workspace_search(CATALOG_URL, 1, 10, None, None)
        .await
        .unwrap();

    match &client.transport().sent()[0] {
        Sent::Post { body, .. } => {
            assert!(body.contains("<ogc:PropertyName>identifier</ogc:PropertyName><ogc:Literal>%:%</ogc:Literal>"));
            assert!(!body.contains("AnyText"));
        }
        other => panic!("expected POST, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_uses_validated_request() {
    let client = CatalogClient::new(FakeTransport::answering(GET_RECORDS));
    let request = SearchRequest::new(3, 2)
        .unwrap()
        .with_filter(RecordFilter::Text("states".into()));
    client.search(CATALOG_URL, &request).await.unwrap();

    match &client.transport().sent()[0] {
        Sent::Post { body, .. } => {
            assert!(body.contains("startPosition=\"3\" maxRecords=\"2\""));
            assert!(body.contains("%states%"));
        }
        other => panic!("expected POST, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unresolvable_crs_fails_the_whole_response() {
    let client = CatalogClient::new(FakeTransport::answering(BOGUS_CRS));
    let err = client.get_records(CATALOG_URL, 1, 10, None).await.unwrap_err();
    assert!(matches!(err, CatalogError::CrsResolution { .. }));
    assert!(err.to_string().contains("No suitable EPSG numeric conversion found"));
}

#[tokio::test]
async fn test_transport_errors_propagate_unchanged() {
    let client = CatalogClient::new(FakeTransport::failing());
    let err = client.get_records(CATALOG_URL, 1, 10, None).await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, CatalogError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_unrecognized_root_is_no_data() {
    let client = CatalogClient::new(FakeTransport::answering(
        r#"<csw:Capabilities xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"/>"#,
    ));
    let response = client.get_records(CATALOG_URL, 1, 10, None).await.unwrap();
    assert_eq!(response, CatalogResponse::NoData);
}

#[tokio::test]
async fn test_get_record_by_id_returns_dublin_core_only() {
    let client = CatalogClient::new(FakeTransport::answering(GET_RECORD_BY_ID));
    let dc = client
        .get_record_by_id(
            "https://demo.example.org/geoserver/csw?request=GetRecordById&id=topp:tasmania_roads",
        )
        .await
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(dc.get("title"), Some(&DcValue::Single("Tasmania roads".into())));
    assert_eq!(dc.get("format").unwrap().values().len(), 3);
    assert_eq!(
        dc.references[0].value,
        "http://demo.example.org/geoserver/wms?SERVICE=WMS&LAYERS=topp:tasmania_roads"
    );
    assert!(dc.get("BoundingBox").is_none());

    match &client.transport().sent()[0] {
        Sent::Get(url) => assert_eq!(
            url,
            "https://demo.example.org/geoserver/csw?service=CSW&version=2.0.2&request=GetRecordById&id=topp%3Atasmania_roads"
        ),
        other => panic!("expected GET, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_record_by_id_exception() {
    let client = CatalogClient::new(FakeTransport::answering(EXCEPTION_REPORT));
    let response = client
        .get_record_by_id("https://demo.example.org/geoserver/csw?id=missing")
        .await
        .unwrap();
    assert_eq!(response.exception().unwrap().message, "Invalid request");
}
