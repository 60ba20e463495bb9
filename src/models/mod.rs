pub mod ai;
pub mod appointment;
pub mod assessment;
pub mod billing;
pub mod diagnosis;
pub mod medication;
pub mod patient;
pub mod stats;
pub mod user;

pub use ai::{AiRequest, AiRequestType, AiResponse};
pub use appointment::{Appointment, AppointmentForm, AppointmentStatus, AppointmentType};
pub use assessment::{Assessment, AssessmentForm, AssessmentType};
pub use billing::{Invoice, InvoiceItem, InvoiceStatus, Payment, PaymentMethod, PaymentStatus};
pub use diagnosis::{Diagnosis, DiagnosisForm, DiagnosisStatus, Severity};
pub use medication::{Medication, MedicationForm, MedicationStatus};
pub use patient::{Gender, Patient, PatientForm};
pub use stats::{AssessmentStats, DashboardStats, DiagnosisStats};
pub use user::{AuthPayload, LoginCredentials, RegisterData, Role, User};
