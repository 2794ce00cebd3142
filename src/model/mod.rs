//! Data model for the rental client.
//!
//! Mirrors the backend's JSON shapes (camelCase field names, integer
//! status codes). Deserialization is deliberately tolerant: unknown or
//! missing fields fall back to defaults, an unrecognized role becomes
//! the unprivileged `Role::User`, and an unrecognized verification code
//! maps to `Unverified` — privilege and verification always fail closed.

use serde::{Deserialize, Serialize};

// ── User ─────────────────────────────────────────────────────────

/// Privilege role carried by a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Superadmin,
}

impl Role {
    /// Whether this role grants access to admin routes.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

// Unknown role strings deserialize to the unprivileged role rather
// than failing the whole record.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "admin" => Role::Admin,
            "superadmin" => Role::Superadmin,
            _ => Role::User,
        })
    }
}

/// Identity-verification state, wire-encoded as an integer.
///
/// The backend carries a fourth state (`3` = rejected) beyond the
/// documented `0..=2`; it is modeled here and counts as not verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
    Rejected,
}

impl From<i64> for VerificationStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => VerificationStatus::Pending,
            2 => VerificationStatus::Verified,
            3 => VerificationStatus::Rejected,
            _ => VerificationStatus::Unverified,
        }
    }
}

impl From<VerificationStatus> for i64 {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Unverified => 0,
            VerificationStatus::Pending => 1,
            VerificationStatus::Verified => 2,
            VerificationStatus::Rejected => 3,
        }
    }
}

/// A user account as returned by the auth and profile endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub verification_status: VerificationStatus,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
    pub balance: Option<f64>,
    pub points: Option<i64>,
}

// ── Catalog ──────────────────────────────────────────────────────

/// A rentable vehicle in the catalog.
///
/// The backend entity carries many more operational columns (insurance
/// dates, maintenance history, …); the client binds the fields the
/// rental flows actually read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub id: i64,
    pub plate_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub seats: Option<i32>,
    /// "gasoline", "diesel", "electric", "hybrid".
    pub fuel_type: Option<String>,
    /// "auto" or "manual".
    pub transmission: Option<String>,
    /// "economy", "compact", "midsize", "suv", "luxury", "minivan".
    pub category: Option<String>,
    pub store_id: Option<i64>,
    pub store_name: Option<String>,
    pub daily_price: Option<f64>,
    pub deposit: Option<f64>,
    /// 0 delisted, 1 available, 2 reserved, 3 rented, 4 maintenance.
    pub status: Option<i64>,
    pub main_image: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

// ── Orders ───────────────────────────────────────────────────────

/// A rental order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub id: i64,
    pub order_no: Option<String>,
    pub user_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub vehicle_name: Option<String>,
    pub pickup_store_id: Option<i64>,
    pub return_store_id: Option<i64>,
    pub pickup_time: Option<String>,
    pub return_time: Option<String>,
    pub rental_days: Option<i32>,
    pub daily_price: Option<f64>,
    pub rental_amount: Option<f64>,
    pub deposit: Option<f64>,
    pub total_amount: Option<f64>,
    pub status: Option<i64>,
    /// 1 wechat, 2 alipay, 3 card, 4 balance.
    pub payment_method: Option<i64>,
}

/// Fields sent when placing a new order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub vehicle_id: i64,
    pub pickup_store_id: i64,
    pub return_store_id: i64,
    pub pickup_time: String,
    pub return_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Fields sent when opening an after-sales request against an order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterSalesRequest {
    pub order_id: i64,
    /// Request type code (refund, damage claim, complaint, …).
    pub r#type: i64,
    pub reason_code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
}

// ── Tests ────────────────────────────────────────────────────────
