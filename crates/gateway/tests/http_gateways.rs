use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use scanstock_core::{AdjustKind, Amount, CartridgeId, DocId, DocPatch};
use scanstock_gateway::{
    CartridgeGateway, DocsGateway, GatewayError, GraphqlGateway, HttpDocsGateway, LookupVars,
    UpdateAmountVars,
};
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn cartridge_json(id: &str, amount: i64) -> Value {
    json!({
        "id": id,
        "name": "CRT-007",
        "amount": amount,
        "info": "HP 85A",
        "logs": [
            {"type": "add", "amount": 10, "description": null, "created_at": "2024-03-01T10:00:00Z"}
        ]
    })
}

async fn graphql(Json(req): Json<Value>) -> (StatusCode, Json<Value>) {
    match req["operationName"].as_str() {
        Some("FindByName") => {
            let data = match req["variables"]["name"].as_str() {
                Some("CRT-007") => json!({"findByName": cartridge_json("7", 10)}),
                Some("BROKEN") => {
                    return (
                        StatusCode::OK,
                        Json(json!({"data": null, "errors": [{"message": "resolver exploded"}]})),
                    );
                }
                _ => json!({"findByName": null}),
            };
            (StatusCode::OK, Json(json!({ "data": data })))
        }
        Some("UpdateAmount") => {
            let vars = &req["variables"];
            assert_eq!(vars["id"], json!(7));
            assert_eq!(vars["type"], json!("add"));
            let amount = 10 + vars["amount"].as_i64().unwrap();
            (
                StatusCode::OK,
                Json(json!({"data": {"updateAmount": cartridge_json("7", amount)}})),
            )
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "unknown operation"}))),
    }
}

async fn graphql_server() -> TestServer {
    TestServer::spawn(Router::new().route("/graphql", post(graphql))).await
}

fn gateway() -> GraphqlGateway {
    GraphqlGateway::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn find_by_name_decodes_cartridge() {
    let server = graphql_server().await;
    let endpoint = format!("{}/graphql", server.base_url);

    let found = gateway()
        .find_by_name(&endpoint, &LookupVars { name: Some("CRT-007".to_string()) })
        .await
        .unwrap()
        .expect("cartridge should be found");

    assert_eq!(found.id, CartridgeId::new(7));
    assert_eq!(found.amount, 10);
    assert_eq!(found.logs.len(), 1);
}

#[tokio::test]
async fn find_by_name_maps_null_to_not_found() {
    let server = graphql_server().await;
    let endpoint = format!("{}/graphql", server.base_url);

    let found = gateway()
        .find_by_name(&endpoint, &LookupVars { name: Some("CRT-001".to_string()) })
        .await
        .unwrap();
    assert!(found.is_none());

    let found = gateway()
        .find_by_name(&endpoint, &LookupVars { name: None })
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn graphql_errors_become_remote_errors() {
    let server = graphql_server().await;
    let endpoint = format!("{}/graphql", server.base_url);

    let err = gateway()
        .find_by_name(&endpoint, &LookupVars { name: Some("BROKEN".to_string()) })
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::Remote(vec!["resolver exploded".to_string()]));
}

#[tokio::test]
async fn update_amount_sends_wire_variables() {
    let server = graphql_server().await;
    let endpoint = format!("{}/graphql", server.base_url);

    let vars = UpdateAmountVars::new(CartridgeId::new(7), Amount::new(3).unwrap(), AdjustKind::Add);
    let updated = gateway().update_amount(&endpoint, &vars).await.unwrap();
    assert_eq!(updated.amount, 13);
}

#[tokio::test]
async fn wrong_path_surfaces_status() {
    let server = graphql_server().await;
    let endpoint = format!("{}/nope", server.base_url);

    let err = gateway()
        .find_by_name(&endpoint, &LookupVars { name: None })
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Status(404, _)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway()
        .find_by_name(&format!("http://{addr}/graphql"), &LookupVars { name: None })
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

#[tokio::test]
async fn docs_gateway_reads_and_updates_total() {
    let app = Router::new().route(
        "/total/:id",
        get(|Path(id): Path<i64>| async move {
            Json(json!([{"id": id, "title": "Act", "signed": false}]))
        })
        .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
            Json(json!({"id": id, "title": "Act", "signed": body["signed"]}))
        }),
    );
    let server = TestServer::spawn(app).await;
    let docs = HttpDocsGateway::new(Duration::from_secs(5)).unwrap();

    let rows = docs.get_docs_item(&server.base_url, DocId::new(3)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field("signed"), Some(&json!(false)));

    let patch = DocPatch::new(DocId::new(3)).set("signed", true);
    let doc = docs.update_doc(&server.base_url, &patch).await.unwrap();
    assert_eq!(doc.id, DocId::new(3));
    assert_eq!(doc.field("signed"), Some(&json!(true)));
}
