use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::BookingRequest;
use appointment_cell::services::booking::BookingService;
use appointment_cell::services::notification::{ConfirmationSender, WebhookSender};
use shared_models::scheduling::{Appointment, AppointmentStatus, ServiceKind};
use shared_storage::{MemoryStore, NewSlot, SlotStore};

fn sample_appointment() -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        data_hora: Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap(),
        servico: ServiceKind::Carregamento,
        nome_cliente: "Ana Silva".into(),
        email_cliente: "ana@x.com".into(),
        telefone_cliente: None,
        empresa_cliente: None,
        observacoes: None,
        status: AppointmentStatus::Confirmado,
        codigo_confirmacao: "A1B2C3".into(),
        criado_em: Utc::now(),
    }
}

#[tokio::test]
async fn webhook_sender_posts_the_confirmation_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({
            "event": "booking_confirmed",
            "appointment": { "codigoConfirmacao": "A1B2C3" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sender = WebhookSender::new(server.uri());
    sender.send_confirmation(&sample_appointment()).await.unwrap();
}

#[tokio::test]
async fn webhook_sender_surfaces_non_success_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sender = WebhookSender::new(server.uri());
    let outcome = sender.send_confirmation(&sample_appointment()).await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn booking_succeeds_even_when_the_webhook_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let data_hora = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
    store
        .create_slot(NewSlot {
            data_hora,
            servico: ServiceKind::Descarregamento,
            disponivel: true,
        })
        .await
        .unwrap();

    let service = BookingService::new(
        store.clone(),
        Arc::new(WebhookSender::new(server.uri())),
    );
    let outcome = service
        .create_booking(BookingRequest {
            data_hora,
            servico: ServiceKind::Descarregamento,
            nome_cliente: "Ana Silva".into(),
            email_cliente: "ana@x.com".into(),
            telefone_cliente: None,
            empresa_cliente: None,
            observacoes: None,
            status: None,
        })
        .await;

    assert_matches!(outcome, Ok(appointment) if appointment.status == AppointmentStatus::Confirmado);
}
