//! JSON wire shapes carrying the client-facing field names
//!
//! Internal entities use Rust snake_case names; the wire contract keeps the
//! names clients already depend on. Translation must round-trip: writing a
//! payload and reading the record back yields identical client-facing values.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Charge, ChargeStatus, Configuration, Customer, NewCharge, NewCustomer};

/// Customer as exchanged with clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: String,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub codigo: String,
    #[serde(rename = "contaCorrente")]
    pub conta_corrente: Option<String>,
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            nome: customer.name,
            email: customer.email,
            telefone: customer.phone,
            codigo: customer.code,
            conta_corrente: customer.bank_account,
        }
    }
}

/// Fields accepted when creating or updating a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    pub codigo: String,
    #[serde(rename = "contaCorrente", default)]
    pub conta_corrente: Option<String>,
}

impl From<CustomerPayload> for NewCustomer {
    fn from(payload: CustomerPayload) -> Self {
        Self {
            name: payload.nome,
            email: payload.email,
            phone: payload.telefone,
            code: payload.codigo,
            bank_account: payload.conta_corrente,
        }
    }
}

/// Charge as exchanged with clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeDto {
    pub id: String,
    #[serde(rename = "clienteId")]
    pub cliente_id: String,
    pub descricao: String,
    pub valor: BigDecimal,
    pub vencimento: NaiveDate,
    pub status: ChargeStatus,
    #[serde(rename = "statusRemessa")]
    pub status_remessa: String,
    pub nsa_remessa: Option<String>,
}

impl From<Charge> for ChargeDto {
    fn from(charge: Charge) -> Self {
        Self {
            id: charge.id,
            cliente_id: charge.customer_id,
            descricao: charge.description,
            valor: charge.amount,
            vencimento: charge.due_date,
            status: charge.status,
            status_remessa: charge.shipment_status,
            nsa_remessa: charge.shipment_sequence,
        }
    }
}

/// Fields accepted when creating or updating a charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargePayload {
    #[serde(rename = "clienteId")]
    pub cliente_id: String,
    pub descricao: String,
    pub valor: BigDecimal,
    pub vencimento: NaiveDate,
    #[serde(default)]
    pub status: Option<ChargeStatus>,
}

impl From<ChargePayload> for NewCharge {
    fn from(payload: ChargePayload) -> Self {
        Self {
            customer_id: payload.cliente_id,
            description: payload.descricao,
            amount: payload.valor,
            due_date: payload.vencimento,
            status: payload.status,
        }
    }
}

/// Configuration as exchanged with clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDto {
    pub id: String,
    #[serde(rename = "ultimoNsaSequencial")]
    pub ultimo_nsa_sequencial: i64,
    #[serde(rename = "parteFixaNsa")]
    pub parte_fixa_nsa: String,
}

impl From<Configuration> for ConfigurationDto {
    fn from(configuration: Configuration) -> Self {
        Self {
            id: configuration.id,
            ultimo_nsa_sequencial: configuration.last_sequence_number,
            parte_fixa_nsa: configuration.fixed_sequence_prefix,
        }
    }
}

/// Schema of one archive file: the charge snapshots of a shipment period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub cobrancas: Vec<ChargeDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SHIPMENT_PENDING;

    fn sample_charge() -> Charge {
        Charge::new(NewCharge {
            customer_id: "abcdefabcdefabcd".to_string(),
            description: "Mensalidade".to_string(),
            amount: BigDecimal::from(150),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            status: None,
        })
    }

    #[test]
    fn charge_wire_names_match_the_contract() {
        let value = serde_json::to_value(ChargeDto::from(sample_charge())).unwrap();

        assert!(value.get("clienteId").is_some());
        assert!(value.get("descricao").is_some());
        assert!(value.get("valor").is_some());
        assert!(value.get("vencimento").is_some());
        assert!(value.get("statusRemessa").is_some());
        assert!(value.get("nsa_remessa").is_some());
        assert_eq!(value["status"], "Pendente");
        assert_eq!(value["statusRemessa"], SHIPMENT_PENDING);
    }

    #[test]
    fn charge_dto_round_trips_through_json() {
        let dto = ChargeDto::from(sample_charge());
        let json = serde_json::to_string(&dto).unwrap();
        let back: ChargeDto = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dto);
    }

    #[test]
    fn customer_payload_maps_onto_internal_fields() {
        let payload: CustomerPayload = serde_json::from_str(
            r#"{"nome":"Ana","codigo":"C01","contaCorrente":"12345-6"}"#,
        )
        .unwrap();

        let fields = NewCustomer::from(payload);
        assert_eq!(fields.name, "Ana");
        assert_eq!(fields.code, "C01");
        assert_eq!(fields.bank_account.as_deref(), Some("12345-6"));
        assert!(fields.email.is_none());
    }

    #[test]
    fn customer_round_trips_payload_to_dto() {
        let payload = CustomerPayload {
            nome: "Ana".to_string(),
            email: Some("ana@example.com".to_string()),
            telefone: Some("11 99999-0000".to_string()),
            codigo: "C01".to_string(),
            conta_corrente: Some("12345-6".to_string()),
        };

        let customer = Customer::new(NewCustomer::from(payload.clone()));
        let dto = CustomerDto::from(customer);

        assert_eq!(dto.nome, payload.nome);
        assert_eq!(dto.email, payload.email);
        assert_eq!(dto.telefone, payload.telefone);
        assert_eq!(dto.codigo, payload.codigo);
        assert_eq!(dto.conta_corrente, payload.conta_corrente);
    }

    #[test]
    fn configuration_wire_names_match_the_contract() {
        let value = serde_json::to_value(ConfigurationDto::from(Configuration::default())).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["ultimoNsaSequencial"], 0);
        assert_eq!(value["parteFixaNsa"], "04");
    }

    #[test]
    fn rejected_status_carries_the_occurrence_code_on_the_wire() {
        let mut charge = sample_charge();
        charge.status = ChargeStatus::Rejected("07".to_string());

        let value = serde_json::to_value(ChargeDto::from(charge)).unwrap();
        assert_eq!(value["status"], "Rejeitado (07)");

        let back: ChargeDto = serde_json::from_value(value).unwrap();
        assert_eq!(back.status, ChargeStatus::Rejected("07".to_string()));
    }
}
