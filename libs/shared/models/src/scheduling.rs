use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// The two service kinds a dock slot can be published for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Carregamento,
    Descarregamento,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Carregamento => write!(f, "Carregamento"),
            ServiceKind::Descarregamento => write!(f, "Descarregamento"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmado,
    Cancelado,
    Pendente,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Confirmado
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmado => write!(f, "confirmado"),
            AppointmentStatus::Cancelado => write!(f, "cancelado"),
            AppointmentStatus::Pendente => write!(f, "pendente"),
        }
    }
}

/// A bookable dock slot. `disponivel` is the single source of truth for
/// whether this moment can be booked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: Uuid,
    pub data_hora: DateTime<Utc>,
    pub servico: ServiceKind,
    pub disponivel: bool,
    pub criado_em: DateTime<Utc>,
}

/// The persisted appointment row. References exactly one slot; the slot's
/// timestamp and service kind are joined in on read, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub telefone_cliente: Option<String>,
    pub empresa_cliente: Option<String>,
    pub observacoes: Option<String>,
    pub status: AppointmentStatus,
    pub codigo_confirmacao: String,
    pub criado_em: DateTime<Utc>,
}

/// An appointment as exposed at the service boundary: the record joined
/// with its slot's timestamp and service kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub data_hora: DateTime<Utc>,
    pub servico: ServiceKind,
    pub nome_cliente: String,
    pub email_cliente: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone_cliente: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa_cliente: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    pub status: AppointmentStatus,
    pub codigo_confirmacao: String,
    pub criado_em: DateTime<Utc>,
}

impl Appointment {
    pub fn from_parts(record: &AppointmentRecord, slot: &Slot) -> Self {
        Self {
            id: record.id,
            data_hora: slot.data_hora,
            servico: slot.servico,
            nome_cliente: record.nome_cliente.clone(),
            email_cliente: record.email_cliente.clone(),
            telefone_cliente: record.telefone_cliente.clone(),
            empresa_cliente: record.empresa_cliente.clone(),
            observacoes: record.observacoes.clone(),
            status: record.status,
            codigo_confirmacao: record.codigo_confirmacao.clone(),
            criado_em: record.criado_em,
        }
    }
}
