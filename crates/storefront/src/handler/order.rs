use crate::{
    abstract_trait::order::service::{
        DynOrderCommandService, DynOrderLifecycleService, DynOrderQueryService,
    },
    domain::{
        requests::order::{FindAllOrders, PayOrderRequest, PlaceOrderRequest, QuoteRequest},
        response::order::{OrderResponse, PriceQuoteResponse},
    },
    middleware::{
        jwt::{admin_middleware, auth_middleware},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    domain::{ApiResponse, ApiResponsePagination, AuthUser},
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders/quote",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Price quote for the cart", body = ApiResponse<PriceQuoteResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Business-rule rejection"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_quote(
    Extension(service): Extension<DynOrderCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<QuoteRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.quote(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created (or replayed for a known idempotency key)", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Business-rule rejection"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Storage contention, retries exhausted")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<PlaceOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.place_order(user.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/mine",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders of the authenticated user", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_user(user.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found"),
        (status = 403, description = "Not the order owner"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id, &user).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Order marked as paid", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already paid"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn pay_order(
    Extension(service): Extension<DynOrderLifecycleService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<PayOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.mark_paid(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/deliver",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order marked as delivered", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order not paid or already delivered"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn deliver_order(
    Extension(service): Extension<DynOrderLifecycleService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.mark_delivered(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "List of orders", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let customer = OpenApiRouter::new()
        .route("/api/orders/quote", post(create_quote))
        .route("/api/orders", post(create_order))
        .route("/api/orders/mine", get(get_my_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/pay", post(pay_order))
        .route_layer(middleware::from_fn(auth_middleware));

    let admin = OpenApiRouter::new()
        .route("/api/orders", get(get_orders))
        .route("/api/orders/{id}/deliver", post(deliver_order))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn(auth_middleware));

    customer
        .merge(admin)
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_lifecycle.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.jwt_service.clone()))
}
