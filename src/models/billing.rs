use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::patient::Patient;
use crate::api::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Insurance,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Insurance => "Seguro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub patient_id: String,
    pub appointment_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub patient: Option<Patient>,
    pub patient_name: Option<String>,
}

impl Resource for Payment {
    const PATH: &'static str = "/payments";
    const SINGULAR: &'static str = "payment";
    const PLURAL: &'static str = "payments";
    const LABEL: &'static str = "pago";
    const LABEL_PLURAL: &'static str = "pagos";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub patient_id: String,
    pub invoice_number: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: InvoiceStatus,
    pub due_date: String,
    pub paid_at: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub patient: Option<Patient>,
    pub patient_name: Option<String>,
}

impl Invoice {
    /// Sum of the line totals as sent by the server.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }
}

impl Resource for Invoice {
    const PATH: &'static str = "/invoices";
    const SINGULAR: &'static str = "invoice";
    const PLURAL: &'static str = "invoices";
    const LABEL: &'static str = "factura";
    const LABEL_PLURAL: &'static str = "facturas";

    fn id(&self) -> &str {
        &self.id
    }
}
