//! REST endpoints for customer records.
//!
//! Handlers translate HTTP into one [`CustomerService`] call each and map service errors onto
//! status codes: not-found to 404, email conflicts to 409, storage failures to 503.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use clientele_core::{
    ApplicationError, CreateCustomerRequest, Customer, CustomerGateway, CustomerId,
    CustomerService, InterfaceError, UpdateCustomerRequest,
};
use serde::Serialize;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

pub struct CustomerState<G> {
    service: Arc<CustomerService<G>>,
}

impl<G> Clone for CustomerState<G> {
    fn clone(&self) -> Self {
        Self { service: Arc::clone(&self.service) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub correlation_id: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<T, ApiError>;

pub fn router<G>(service: Arc<CustomerService<G>>) -> Router
where
    G: CustomerGateway + 'static,
{
    Router::new()
        .route("/api/v1/customers", get(list_customers::<G>).post(create_customer::<G>))
        .route(
            "/api/v1/customers/{id}",
            get(get_customer::<G>).put(update_customer::<G>).delete(delete_customer::<G>),
        )
        .with_state(CustomerState { service })
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn error_response(error: InterfaceError) -> ApiError {
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(
            event_name = "http.customers.failed",
            correlation_id = %error.correlation_id(),
            error = %error,
            "customer request failed"
        );
    } else {
        warn!(
            event_name = "http.customers.rejected",
            correlation_id = %error.correlation_id(),
            error = %error,
            "customer request rejected"
        );
    }

    (
        status,
        Json(ErrorBody {
            error: error.user_message().to_string(),
            kind: error.kind(),
            correlation_id: error.correlation_id().to_string(),
        }),
    )
}

fn service_error(error: ApplicationError, correlation_id: &str) -> ApiError {
    error_response(error.into_interface(correlation_id))
}

fn body_error(rejection: JsonRejection, correlation_id: &str) -> ApiError {
    error_response(InterfaceError::bad_request(rejection.body_text(), correlation_id))
}

fn path_error(rejection: PathRejection, correlation_id: &str) -> ApiError {
    error_response(InterfaceError::bad_request(rejection.body_text(), correlation_id))
}

async fn list_customers<G: CustomerGateway + 'static>(
    State(state): State<CustomerState<G>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Customer>>> {
    let correlation_id = correlation_id(&headers);
    let span = tracing::info_span!("customers.list", correlation_id = %correlation_id);

    async {
        let customers = state
            .service
            .list_customers()
            .await
            .map_err(|error| service_error(error, &correlation_id))?;
        Ok::<_, ApiError>(Json(customers))
    }
    .instrument(span)
    .await
}

async fn get_customer<G: CustomerGateway + 'static>(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<CustomerState<G>>,
    headers: HeaderMap,
) -> ApiResult<Json<Customer>> {
    let correlation_id = correlation_id(&headers);
    let Path(id) = path.map_err(|rejection| path_error(rejection, &correlation_id))?;
    let span =
        tracing::info_span!("customers.get", correlation_id = %correlation_id, customer_id = id);

    async {
        let customer = state
            .service
            .get_customer_by_id(CustomerId(id))
            .await
            .map_err(|error| service_error(error, &correlation_id))?;
        Ok::<_, ApiError>(Json(customer))
    }
    .instrument(span)
    .await
}

async fn create_customer<G: CustomerGateway + 'static>(
    State(state): State<CustomerState<G>>,
    headers: HeaderMap,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let correlation_id = correlation_id(&headers);
    let span = tracing::info_span!("customers.create", correlation_id = %correlation_id);

    async {
        let Json(request) = payload.map_err(|rejection| body_error(rejection, &correlation_id))?;
        let customer = state
            .service
            .create_customer(request)
            .await
            .map_err(|error| service_error(error, &correlation_id))?;

        info!(
            event_name = "http.customers.created",
            correlation_id = %correlation_id,
            customer_id = ?customer.id,
            "customer created"
        );
        Ok::<_, ApiError>((StatusCode::CREATED, Json(customer)))
    }
    .instrument(span)
    .await
}

async fn update_customer<G: CustomerGateway + 'static>(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<CustomerState<G>>,
    headers: HeaderMap,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> ApiResult<Json<Customer>> {
    let correlation_id = correlation_id(&headers);
    let Path(id) = path.map_err(|rejection| path_error(rejection, &correlation_id))?;
    let span =
        tracing::info_span!("customers.update", correlation_id = %correlation_id, customer_id = id);

    async {
        let Json(request) = payload.map_err(|rejection| body_error(rejection, &correlation_id))?;
        let customer = state
            .service
            .update_customer(CustomerId(id), request)
            .await
            .map_err(|error| service_error(error, &correlation_id))?;
        Ok::<_, ApiError>(Json(customer))
    }
    .instrument(span)
    .await
}

async fn delete_customer<G: CustomerGateway + 'static>(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<CustomerState<G>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id(&headers);
    let Path(id) = path.map_err(|rejection| path_error(rejection, &correlation_id))?;
    let span =
        tracing::info_span!("customers.delete", correlation_id = %correlation_id, customer_id = id);

    async {
        state
            .service
            .delete_customer(CustomerId(id))
            .await
            .map_err(|error| service_error(error, &correlation_id))?;
        Ok::<_, ApiError>(StatusCode::NO_CONTENT)
    }
    .instrument(span)
    .await
}
