//! Verify request building and response parsing against the JSON vectors in
//! `test-vectors/`.
//!
//! Each vector describes an input, the expected request, a simulated
//! response, and the expected result. Bodies are compared as parsed JSON so
//! field order does not matter.

use lardi_core::{
    CargoRequest, CargoResponse, Config, Endpoint, HttpMethod, HttpRequest, HttpResponse, Language, LardiClient,
    Reference, ReqwestTransport,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client(language: Language) -> LardiClient<ReqwestTransport> {
    LardiClient::new(Config::new("vector-key").base_url(BASE_URL).language(language))
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_endpoint(s: &str) -> Endpoint {
    match s {
        "create_cargo" => Endpoint::CreateCargo,
        "currencies" => Endpoint::Currencies,
        "payment_units" => Endpoint::PaymentUnits,
        "areas" => Endpoint::Areas,
        "contacts" => Endpoint::Contacts,
        other => panic!("unknown endpoint: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert_eq!(req.query, pairs(&expected["query"]), "{name}: query");
}

// ---------------------------------------------------------------------------
// Create cargo
// ---------------------------------------------------------------------------

#[test]
fn create_cargo_test_vectors() {
    let raw = include_str!("../../test-vectors/create_cargo.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client(Language::Uk);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: CargoRequest = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_create_cargo(&input).unwrap();
        assert_request(name, &req, expected_req);
        assert_eq!(req.headers, pairs(&expected_req["headers"]), "{name}: headers");

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, expected_req["body"], "{name}: body");

        let created: CargoResponse = c.parse_response(Endpoint::CreateCargo, simulated(case)).unwrap();
        let expected: CargoResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(created, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Reference lists
// ---------------------------------------------------------------------------

#[test]
fn reference_test_vectors() {
    let raw = include_str!("../../test-vectors/references.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let language: Language = case["language"].as_str().unwrap().parse().unwrap();
        let endpoint = parse_endpoint(case["endpoint"].as_str().unwrap());
        let c = client(language);

        let req = c.build_get(endpoint);
        assert_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body");

        let list: Vec<Reference> = c.parse_response(endpoint, simulated(case)).unwrap();
        let expected: Vec<Reference> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(list, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client(Language::Uk);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let endpoint = parse_endpoint(case["endpoint"].as_str().unwrap());

        let err = c.parse_response::<Value>(endpoint, simulated(case)).unwrap_err();
        let api = err.api_error().unwrap_or_else(|| panic!("{name}: expected API error, got {err}"));
        let expected = &case["expected_error"];
        assert_eq!(api.status, expected["status"].as_i64().unwrap(), "{name}: status");
        assert_eq!(api.error_code, expected["error"].as_str().unwrap(), "{name}: error");
        assert_eq!(api.message, expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(err.to_string(), case["expected_message"].as_str().unwrap(), "{name}: display");
    }
}
