//! Catalog, order, and after-sales endpoint bindings.

use serde_json::json;

use super::{ApiClient, Envelope};
use crate::error::Result;
use crate::model::{AfterSalesRequest, NewOrder, Order, Vehicle};

impl ApiClient {
    // ── Vehicle endpoints ────────────────────────────────────

    /// `GET /vehicles`.
    pub async fn vehicles(&self) -> Result<Envelope<Vec<Vehicle>>> {
        self.execute(self.get("/vehicles", None)).await
    }

    /// `GET /vehicles?available=true`.
    pub async fn available_vehicles(&self) -> Result<Envelope<Vec<Vehicle>>> {
        self.execute(self.get("/vehicles?available=true", None)).await
    }

    /// `GET /vehicles/{id}`.
    pub async fn vehicle(&self, id: i64) -> Result<Envelope<Vehicle>> {
        self.execute(self.get(&format!("/vehicles/{id}"), None)).await
    }

    /// `GET /vehicles?keyword={keyword}`.
    pub async fn search_vehicles(&self, keyword: &str) -> Result<Envelope<Vec<Vehicle>>> {
        let path = format!("/vehicles?keyword={}", urlencoding::encode(keyword));
        self.execute(self.get(&path, None)).await
    }

    /// `GET /vehicles?category={category}`.
    pub async fn vehicles_by_category(
        &self,
        category: &str,
    ) -> Result<Envelope<Vec<Vehicle>>> {
        let path = format!("/vehicles?category={}", urlencoding::encode(category));
        self.execute(self.get(&path, None)).await
    }

    /// `POST /vehicles` (admin).
    pub async fn create_vehicle(
        &self,
        token: &str,
        vehicle: &Vehicle,
    ) -> Result<Envelope<Vehicle>> {
        self.execute(self.post("/vehicles", Some(token), vehicle)).await
    }

    /// `PUT /vehicles/{id}` (admin).
    pub async fn update_vehicle(
        &self,
        token: &str,
        id: i64,
        vehicle: &Vehicle,
    ) -> Result<Envelope<Vehicle>> {
        self.execute(self.put(&format!("/vehicles/{id}"), Some(token), vehicle))
            .await
    }

    /// `DELETE /vehicles/{id}` (admin).
    pub async fn delete_vehicle(
        &self,
        token: &str,
        id: i64,
    ) -> Result<Envelope<serde_json::Value>> {
        self.execute(self.delete(&format!("/vehicles/{id}"), Some(token))).await
    }

    // ── Order endpoints ──────────────────────────────────────

    /// `GET /orders`.
    pub async fn orders(&self, token: &str) -> Result<Envelope<Vec<Order>>> {
        self.execute(self.get("/orders", Some(token))).await
    }

    /// `GET /orders/{id}`.
    pub async fn order(&self, token: &str, id: i64) -> Result<Envelope<Order>> {
        self.execute(self.get(&format!("/orders/{id}"), Some(token))).await
    }

    /// `GET /orders?userId={user_id}`.
    pub async fn orders_for_user(
        &self,
        token: &str,
        user_id: i64,
    ) -> Result<Envelope<Vec<Order>>> {
        self.execute(self.get(&format!("/orders?userId={user_id}"), Some(token)))
            .await
    }

    /// `POST /orders`.
    pub async fn create_order(
        &self,
        token: &str,
        order: &NewOrder,
    ) -> Result<Envelope<Order>> {
        self.execute(self.post("/orders", Some(token), order)).await
    }

    /// `PUT /orders/{id}/pay` with a payment method code.
    pub async fn pay_order(
        &self,
        token: &str,
        id: i64,
        payment_method: i64,
    ) -> Result<Envelope<Order>> {
        let body = json!({ "paymentMethod": payment_method });
        self.execute(self.put(&format!("/orders/{id}/pay"), Some(token), &body))
            .await
    }

    /// `PUT /orders/{id}/pickup`.
    pub async fn pickup_order(&self, token: &str, id: i64) -> Result<Envelope<Order>> {
        self.order_action(token, id, "pickup").await
    }

    /// `PUT /orders/{id}/return`.
    pub async fn return_order(&self, token: &str, id: i64) -> Result<Envelope<Order>> {
        self.order_action(token, id, "return").await
    }

    /// `PUT /orders/{id}/complete`.
    pub async fn complete_order(&self, token: &str, id: i64) -> Result<Envelope<Order>> {
        self.order_action(token, id, "complete").await
    }

    /// `PUT /orders/{id}/cancel`.
    pub async fn cancel_order(&self, token: &str, id: i64) -> Result<Envelope<Order>> {
        self.order_action(token, id, "cancel").await
    }

    /// `DELETE /orders/{id}`.
    pub async fn delete_order(
        &self,
        token: &str,
        id: i64,
    ) -> Result<Envelope<serde_json::Value>> {
        self.execute(self.delete(&format!("/orders/{id}"), Some(token))).await
    }

    async fn order_action(&self, token: &str, id: i64, action: &str) -> Result<Envelope<Order>> {
        let body = json!({});
        self.execute(self.put(&format!("/orders/{id}/{action}"), Some(token), &body))
            .await
    }

    // ── After-sales ──────────────────────────────────────────

    /// `POST /after-sales`.
    pub async fn create_after_sales(
        &self,
        token: &str,
        request: &AfterSalesRequest,
    ) -> Result<Envelope<serde_json::Value>> {
        self.execute(self.post("/after-sales", Some(token), request)).await
    }
}

// ── Tests ────────────────────────────────────────────────────────
