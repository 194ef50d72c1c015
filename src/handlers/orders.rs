use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{LineItemInput, OrderLineView, OrderStatus, OrderView};
use crate::engine;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderLineRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Buyer placing the order. Optional: when absent, the id resolved by
    /// the authentication layer (forwarded in `x-buyer-id`) is used.
    pub buyer_id: Option<i32>,
    pub lines: Vec<CreateOrderLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    /// Decimal amounts as strings to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub number: String,
    pub issued_on: String,
    pub buyer_id: i32,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
    pub lines: Vec<OrderLineResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsResponse {
    pub total: i64,
    pub paid: i64,
    pub pending: i64,
    pub cancelled: i64,
    pub total_revenue: String,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(line: OrderLineView) -> Self {
        OrderLineResponse {
            id: line.id,
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            subtotal: line.subtotal.to_string(),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            number: order.number,
            issued_on: order.issued_on.to_string(),
            buyer_id: order.buyer_id,
            subtotal: order.subtotal.to_string(),
            tax: order.tax.to_string(),
            total: order.total.to_string(),
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            lines: order.lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Buyer id resolved by the (external) authentication layer and forwarded
/// as a request header.
fn session_buyer(req: &HttpRequest) -> Option<i32> {
    req.headers()
        .get("x-buyer-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order with its lines. Stock validation, pricing, document
/// numbering, persistence and stock decrements all run inside one database
/// transaction; any failure leaves no trace.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Invalid input or insufficient stock"),
        (status = 404, description = "A referenced product does not exist"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    req: HttpRequest,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let buyer_id = body.buyer_id.or_else(|| session_buyer(&req));
    let lines: Vec<LineItemInput> = body
        .lines
        .iter()
        .map(|l| LineItemInput {
            product_id: l.product_id,
            quantity: l.quantity,
        })
        .collect();

    let order = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::create_order(&mut conn, buyer_id, &lines)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// All orders, newest first, each with its lines.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "List of orders", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::list_orders(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/statistics
#[utoipa::path(
    get,
    path = "/orders/statistics",
    responses(
        (status = 200, description = "Counts per status and paid revenue", body = StatisticsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_statistics(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let stats = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::statistics(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(StatisticsResponse {
        total: stats.total,
        paid: stats.paid,
        pending: stats.pending,
        cancelled: stats.cancelled,
        total_revenue: stats.total_revenue.to_string(),
    }))
}

/// GET /orders/buyer/{buyer_id}
#[utoipa::path(
    get,
    path = "/orders/buyer/{buyer_id}",
    params(
        ("buyer_id" = i32, Path, description = "Buyer id"),
    ),
    responses(
        (status = 200, description = "The buyer's orders, newest first", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders_by_buyer(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let buyer_id = path.into_inner();

    let orders = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::find_by_buyer(&mut conn, buyer_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/number/{number}
#[utoipa::path(
    get,
    path = "/orders/number/{number}",
    params(
        ("number" = String, Path, description = "Document number, e.g. BOL-2024-0001"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order_by_number(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let number = path.into_inner();

    let order = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::find_by_number(&mut conn, &number)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::find_order(&mut conn, order_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /orders/{id}
///
/// Updates the order's status; every other field is immutable after
/// creation.
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;

    let order = web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::update_status(&mut conn, order_id, status)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}
///
/// Deletes an order and its lines. Paid orders cannot be deleted.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 400, description = "The order is paid and cannot be deleted"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get().map_err(DomainError::from)?;
        engine::remove_order(&mut conn, order_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
