use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use vendedores_tracking::config::EnvironmentConfig;
use vendedores_tracking::models::{Cliente, Vendedor};
use vendedores_tracking::routes::create_app_router;
use vendedores_tracking::state::AppState;
use vendedores_tracking::store::MemoryStore;

fn vendedor(id: i64, nombre: &str) -> Vendedor {
    Vendedor {
        id,
        nombre: nombre.to_string(),
        telefono: None,
        correo: None,
        latitud: None,
        longitud: None,
        estado: "activo".to_string(),
        ultima_actualizacion: None,
        fecha_creacion: Utc::now(),
    }
}

fn create_test_app_with_store() -> (Router, Arc<MemoryStore>) {
    let config = EnvironmentConfig::from_lookup(|_| None).unwrap();
    let store = Arc::new(MemoryStore::with_vendedores(vec![
        vendedor(1, "Ana Rivas"),
        vendedor(2, "Bruno Díaz"),
    ]));
    let app = create_app_router(AppState::in_memory(config, store.clone()).state);
    (app, store)
}

fn create_test_app() -> Router {
    create_test_app_with_store().0
}

fn cliente(vendedor_id: i64, nombre: &str) -> Cliente {
    Cliente {
        id: 0,
        vendedor_id,
        nombre: nombre.to_string(),
        direccion: Some("Ruta 5 km 120".to_string()),
        telefono: None,
        latitud: -33.1,
        longitud: -60.2,
        notas: None,
        fecha_creacion: Utc::now(),
        tipo_animal: Some("bovino".to_string()),
        cantidad_animales: Some(250),
        administracion: None,
        nombre_vendedor: String::new(),
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_visita_updates_dashboard() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/visitas",
        Some(json!({ "vendedor_id": 1, "nombre_cliente": "Estancia La Paz" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["estado"], "pendiente");
    assert_eq!(body["data"]["tipo_visita"], "visita");
    assert_eq!(body["data"]["nombre_vendedor"], "Ana Rivas");

    let (_, dashboard) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(dashboard["data"]["stats"]["total_visitas"], 1);
    assert_eq!(dashboard["data"]["visitas"][0]["nombre_cliente"], "Estancia La Paz");
}

#[tokio::test]
async fn test_create_visita_requires_cliente() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/visitas",
        Some(json!({ "vendedor_id": 1, "nombre_cliente": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_complete_visita_sets_fecha_completado() {
    let app = create_test_app();
    let (_, created) = send(
        &app,
        "POST",
        "/api/visitas",
        Some(json!({ "vendedor_id": 2, "nombre_cliente": "Tambo Norte", "tipo_visita": "cobranza" })),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/visitas/{}/estado", id),
        Some(json!({ "estado": "completada" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "completada");
    assert!(body["data"]["fecha_completado"].is_string());
}

#[tokio::test]
async fn test_delete_missing_visita_is_404() {
    let app = create_test_app();
    let (status, _) = send(&app, "DELETE", "/api/visitas/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pedidos_total_ventas() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/pedidos",
        Some(json!({ "vendedor_id": 1, "nombre_cliente": "Agro Sur" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["monto_total"].as_f64(), Some(0.0));

    send(
        &app,
        "POST",
        "/api/pedidos",
        Some(json!({ "vendedor_id": 2, "nombre_cliente": "Agro Sur", "monto_total": 150.5 })),
    )
    .await;

    let (_, dashboard) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(dashboard["data"]["stats"]["total_ventas"].as_f64(), Some(150.5));
    assert_eq!(dashboard["data"]["stats"]["vendedores_activos"], 2);
}

#[tokio::test]
async fn test_tracking_start_requires_vendedor() {
    let app = create_test_app();
    let (status, body) = send(&app, "POST", "/api/tracking/start", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TRACKING_VALIDATION");

    let (_, status_body) = send(&app, "GET", "/api/tracking/status", None).await;
    assert_eq!(status_body["data"]["estado"], "idle");
}

#[tokio::test]
async fn test_tracking_foreground_flow() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/tracking/start",
        Some(json!({ "vendedor_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "active");
    assert_eq!(body["data"]["fuente"], "foreground");

    let (status, _) = send(
        &app,
        "POST",
        "/api/tracking/posicion",
        Some(json!({ "latitud": -34.6, "longitud": -58.4, "precision": 15.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // La segunda lectura cae dentro del intervalo
    send(
        &app,
        "POST",
        "/api/tracking/posicion",
        Some(json!({ "latitud": -34.7, "longitud": -58.5 })),
    )
    .await;

    let mut enviadas = 0;
    for _ in 0..100 {
        let (_, status_body) = send(&app, "GET", "/api/tracking/status", None).await;
        enviadas = status_body["data"]["enviadas"].as_u64().unwrap_or(0);
        if enviadas == 1 && status_body["data"]["omitidas"] == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(enviadas, 1);

    let (status, body) = send(&app, "POST", "/api/tracking/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "idle");

    let (status, _) = send(
        &app,
        "POST",
        "/api/tracking/posicion",
        Some(json!({ "latitud": 1.0, "longitud": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Detener sin sesión no es un error
    let (status, _) = send(&app, "POST", "/api/tracking/stop", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_registrar_ubicacion_messages() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/ubicacion/registrar",
        Some(json!({ "vendedor_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["message"],
        "La geolocalizacion no esta soportada en este navegador."
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/ubicacion/registrar",
        Some(json!({ "vendedor_id": 1, "posicion": { "error": { "code": 1 } } })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "No se pudo obtener la ubicacion. Por favor, verifique los permisos de ubicacion."
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/ubicacion/registrar",
        Some(json!({ "vendedor_id": 1, "posicion": { "latitud": -31.4, "longitud": -64.2 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ubicacion registrada exitosamente");

    let (_, vendedores) = send(&app, "GET", "/api/vendedores", None).await;
    assert_eq!(vendedores["data"][0]["latitud"].as_f64(), Some(-31.4));
}

#[tokio::test]
async fn test_clientes_list_and_delete() {
    let (app, store) = create_test_app_with_store();
    let creado = store.add_cliente(cliente(2, "Estancia El Ombú")).await;

    let (status, body) = send(&app, "GET", "/api/clientes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], creado.id);
    assert_eq!(body["data"][0]["nombre"], "Estancia El Ombú");
    assert_eq!(body["data"][0]["nombre_vendedor"], "Bruno Díaz");

    let (_, dashboard) = send(&app, "POST", "/api/dashboard/refresh", None).await;
    assert_eq!(dashboard["data"]["clientes"].as_array().map(Vec::len), Some(1));

    let uri = format!("/api/clientes/{}", creado.id);
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, dashboard) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(dashboard["data"]["clientes"].as_array().map(Vec::len), Some(0));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
