//! API integration tests
//!
//! These run against a live server started with the default config
//! (bootstrap admin password "admin"): cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so tests can be re-run against the same database
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_millis()
}

/// Client with a cookie store, logged in as the bootstrap admin
async fn admin_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let response = client
        .post(format!("{}/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success(), "admin login failed");
    client
}

/// Create a book through the admin surface, returning its id
async fn create_book(client: &Client, isbn: &str, titulo: &str, categoria: &str) -> i64 {
    let response = client
        .post(format!("{}/libros/", BASE_URL))
        .json(&json!({
            "isbn": isbn,
            "titulo": titulo,
            "autor": "Autor de Prueba",
            "categoria": categoria
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book");
    body["id"].as_i64().expect("No id in book response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_csrf_token_sets_cookie() {
    let client = Client::builder().cookie_store(true).build().unwrap();

    let response = client
        .get(format!("{}/csrf-token/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let cookie = response
        .cookies()
        .find(|c| c.name() == "csrftoken")
        .expect("No csrftoken cookie set");
    assert_eq!(cookie.value().len(), 64);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "CSRF cookie set");
}

#[tokio::test]
#[ignore]
async fn test_login_sets_session_cookie() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.cookies().any(|c| c.name() == "sessionid"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Inicio de sesión exitoso.");
    assert_eq!(body["username"], "admin");
    assert!(body["roles"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password_is_401() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"],
        "Credenciales inválidas. Usuario o contraseña incorrectos."
    );
}

#[tokio::test]
#[ignore]
async fn test_login_inactive_account_is_403() {
    let admin = admin_client().await;
    let username = format!("inactivo_{}", unique_suffix());

    // Register, then deactivate through the clients surface
    let response = admin
        .post(format!("{}/registro/", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "clave123"
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(response.status(), 201);

    let clients: Value = admin
        .get(format!("{}/clientes/", BASE_URL))
        .send()
        .await
        .expect("Failed to list clients")
        .json()
        .await
        .expect("Failed to parse clients");
    let id = clients
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["username"] == username.as_str())
        .expect("Registered account missing from client list")["id"]
        .as_i64()
        .unwrap();

    let response = admin
        .patch(format!("{}/clientes/{}/", BASE_URL, id))
        .json(&json!({ "is_active": false }))
        .send()
        .await
        .expect("Failed to deactivate");
    assert_eq!(response.status(), 200);

    // Correct password, inactive account: 403, distinct from bad credentials
    let response = Client::new()
        .post(format!("{}/login/", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "clave123"
        }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Cuenta inactiva. Contacte al administrador.");
}

#[tokio::test]
#[ignore]
async fn test_registration_assigns_cliente_role() {
    let username = format!("lector_{}", unique_suffix());
    let client = Client::new();

    let response = client
        .post(format!("{}/registro/", BASE_URL))
        .json(&json!({
            "username": username,
            "email": "lector@example.com",
            "first_name": "Lector",
            "last_name": "Nuevo",
            "password": "clave123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Registro exitoso.");
    assert_eq!(body["username"], username.as_str());

    // The login response exposes the attached roles
    let response = client
        .post(format!("{}/login/", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "clave123"
        }))
        .send()
        .await
        .expect("Failed to log in");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["roles"], json!(["Cliente"]));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_username_fails_validation() {
    let username = format!("duplicado_{}", unique_suffix());
    let client = Client::new();
    let payload = json!({
        "username": username,
        "password": "clave123"
    });

    let response = client
        .post(format!("{}/registro/", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/registro/", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["username"],
        json!(["Ya existe un usuario con ese nombre de usuario."])
    );
}

#[tokio::test]
#[ignore]
async fn test_blank_password_fails_validation() {
    let response = Client::new()
        .post(format!("{}/registro/", BASE_URL))
        .json(&json!({
            "username": format!("sinclave_{}", unique_suffix()),
            "password": ""
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["password"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_guarded_route_requires_session() {
    let response = Client::new()
        .get(format!("{}/prestamos/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_guarded_route_rejects_plain_client() {
    let username = format!("cliente_{}", unique_suffix());
    let client = Client::builder().cookie_store(true).build().unwrap();

    client
        .post(format!("{}/registro/", BASE_URL))
        .json(&json!({ "username": username, "password": "clave123" }))
        .send()
        .await
        .expect("Failed to register");

    client
        .post(format!("{}/login/", BASE_URL))
        .json(&json!({ "username": username, "password": "clave123" }))
        .send()
        .await
        .expect("Failed to log in");

    let response = client
        .get(format!("{}/prestamos/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Se requieren permisos de administrador.");
}

#[tokio::test]
#[ignore]
async fn test_book_availability_follows_loans() {
    let admin = admin_client().await;
    let suffix = unique_suffix();
    let book_id = create_book(
        &admin,
        &format!("978-{}", suffix),
        "El libro prestado",
        "Novela",
    )
    .await;

    // No loans yet: available
    let book: Value = admin
        .get(format!("{}/libros/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["estado"], "Disponible");

    // An active loan flips it to Prestado
    let response = admin
        .post(format!("{}/prestamos/", BASE_URL))
        .json(&json!({
            "cliente": 1,
            "libro": book_id,
            "fecha_devolucion_esperada": "2030-01-01"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(loan["estado"], "Activo");

    let book: Value = admin
        .get(format!("{}/libros/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["estado"], "Prestado");

    // Returning the loan makes the book available again
    let response = admin
        .post(format!("{}/prestamos/{}/devolver/", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to return loan");
    assert_eq!(response.status(), 200);

    let book: Value = admin
        .get(format!("{}/libros/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["estado"], "Disponible");
}

#[tokio::test]
#[ignore]
async fn test_devolver_twice_conflicts() {
    let admin = admin_client().await;
    let suffix = unique_suffix();
    let book_id = create_book(
        &admin,
        &format!("979-{}", suffix),
        "Devoluciones",
        "Ensayo",
    )
    .await;

    let loan: Value = admin
        .post(format!("{}/prestamos/", BASE_URL))
        .json(&json!({
            "cliente": 1,
            "libro": book_id,
            "fecha_devolucion_esperada": "2030-01-01"
        }))
        .send()
        .await
        .expect("Failed to create loan")
        .json()
        .await
        .expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().unwrap();

    // First return succeeds and stamps today's date
    let response = admin
        .post(format!("{}/prestamos/{}/devolver/", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to return loan");
    assert_eq!(response.status(), 200);
    let returned: Value = response.json().await.expect("Failed to parse loan");
    assert_eq!(returned["estado"], "Devuelto");
    let fecha_real = returned["fecha_devolucion_real"]
        .as_str()
        .expect("No return date")
        .to_string();

    // Second return is refused and changes nothing
    let response = admin
        .post(format!("{}/prestamos/{}/devolver/", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "El préstamo ya está devuelto.");

    let loan: Value = admin
        .get(format!("{}/prestamos/{}/", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to get loan")
        .json()
        .await
        .expect("Failed to parse loan");
    assert_eq!(loan["estado"], "Devuelto");
    assert_eq!(loan["fecha_devolucion_real"], fecha_real.as_str());
}

#[tokio::test]
#[ignore]
async fn test_book_filters() {
    let admin = admin_client().await;
    let suffix = unique_suffix();
    let marker = format!("Saga {}", suffix);

    create_book(&admin, &format!("860-{}", suffix), &marker, "Novela").await;
    create_book(
        &admin,
        &format!("861-{}", suffix),
        &format!("{} II", marker),
        "Ensayo",
    )
    .await;

    let client = Client::new();

    // Substring title match is case-insensitive
    let books: Value = client
        .get(format!("{}/libros/", BASE_URL))
        .query(&[("q", format!("saga {}", suffix))])
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse books");
    assert_eq!(books.as_array().unwrap().len(), 2);

    // Category filter composes with the title filter
    let books: Value = client
        .get(format!("{}/libros/", BASE_URL))
        .query(&[
            ("q", format!("saga {}", suffix)),
            ("categoria", "novela".to_string()),
        ])
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse books");
    let rows = books.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["categoria"], "Novela");

    // The sentinel category means no category filter
    let books: Value = client
        .get(format!("{}/libros/", BASE_URL))
        .query(&[
            ("q", format!("saga {}", suffix)),
            ("categoria", "Todas".to_string()),
        ])
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse books");
    assert_eq!(books.as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_client_listing_excludes_admins() {
    let admin = admin_client().await;

    let clients: Value = admin
        .get(format!("{}/clientes/", BASE_URL))
        .send()
        .await
        .expect("Failed to list clients")
        .json()
        .await
        .expect("Failed to parse clients");

    for client in clients.as_array().unwrap() {
        assert_ne!(client["username"], "admin");
        let roles = client["roles"].as_array().unwrap();
        assert!(!roles.iter().any(|r| r == "Administrador"));
    }
}

#[tokio::test]
#[ignore]
async fn test_client_write_never_echoes_password() {
    let admin = admin_client().await;
    let username = format!("nuevo_{}", unique_suffix());

    let response = admin
        .post(format!("{}/clientes/", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "clave123"
        }))
        .send()
        .await
        .expect("Failed to create client");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], username.as_str());
    assert!(body.get("password").is_none());
    assert_eq!(body["estado"], "Activo");
}

#[tokio::test]
#[ignore]
async fn test_loan_with_unknown_book_is_field_error() {
    let admin = admin_client().await;

    let response = admin
        .post(format!("{}/prestamos/", BASE_URL))
        .json(&json!({
            "cliente": 1,
            "libro": 999_999,
            "fecha_devolucion_esperada": "2030-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["libro"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_loans_conflicts() {
    let admin = admin_client().await;
    let suffix = unique_suffix();
    let book_id = create_book(&admin, &format!("862-{}", suffix), "Retenido", "Novela").await;

    admin
        .post(format!("{}/prestamos/", BASE_URL))
        .json(&json!({
            "cliente": 1,
            "libro": book_id,
            "fecha_devolucion_esperada": "2030-01-01"
        }))
        .send()
        .await
        .expect("Failed to create loan");

    let response = admin
        .delete(format!("{}/libros/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_reservation_crud() {
    let admin = admin_client().await;
    let suffix = unique_suffix();
    let book_id = create_book(&admin, &format!("863-{}", suffix), "Reservado", "Novela").await;

    let response = admin
        .post(format!("{}/reservas/", BASE_URL))
        .json(&json!({
            "cliente": 1,
            "libro": book_id
        }))
        .send()
        .await
        .expect("Failed to create reservation");
    assert_eq!(response.status(), 201);
    let reservation: Value = response.json().await.expect("Failed to parse reservation");
    let id = reservation["id"].as_i64().unwrap();
    assert_eq!(reservation["estado"], "Pendiente");
    assert_eq!(reservation["libro"], book_id);

    let response = admin
        .patch(format!("{}/reservas/{}/", BASE_URL, id))
        .json(&json!({ "estado": "Cancelada" }))
        .send()
        .await
        .expect("Failed to update reservation");
    assert_eq!(response.status(), 200);
    let reservation: Value = response.json().await.expect("Failed to parse reservation");
    assert_eq!(reservation["estado"], "Cancelada");

    let response = admin
        .delete(format!("{}/reservas/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to delete reservation");
    assert_eq!(response.status(), 204);

    let response = admin
        .get(format!("{}/reservas/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_role_uniqueness() {
    let admin = admin_client().await;
    let nombre = format!("Rol {}", unique_suffix());

    let response = admin
        .post(format!("{}/roles/", BASE_URL))
        .json(&json!({ "nombre": nombre }))
        .send()
        .await
        .expect("Failed to create role");
    assert_eq!(response.status(), 201);

    let response = admin
        .post(format!("{}/roles/", BASE_URL))
        .json(&json!({ "nombre": nombre }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["nombre"], json!(["Este campo debe ser único."]));
}
