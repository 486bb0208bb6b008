use axum::{body::Bytes, extract::State, http::StatusCode};
use log;

use crate::app_state::AppState;
use crate::services::report_service;
use crate::utils::envelope::decode_report_id;

/// Every stored report carries this fixed outcome string.
const REPORT_RESULT: &str = "Success";

const INSERT_FAILED_BODY: &str = "Unable to successfully insert inspect report ! \
     Please check the application logs for more details.";

/// Pub/Sub push endpoint. Decodes the envelope and stores one report row.
///
/// Redelivery is not deduplicated: the same message inserted twice
/// produces two rows.
pub async fn receive_push(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, String) {
    let report_id = match decode_report_id(&body) {
        Ok(id) => id,
        Err(e) => {
            log::error!("rejecting push request: {}", e);
            return (StatusCode::BAD_REQUEST, format!("Bad Request: {}", e));
        }
    };

    log::info!("received report id: {}", report_id);

    match report_service::insert_report(&state.pool, &report_id, REPORT_RESULT).await {
        Ok(()) => (
            StatusCode::NO_CONTENT,
            "inspect report successfully".to_string(),
        ),
        Err(e) => {
            log::error!("failed to insert report '{}': {}", report_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INSERT_FAILED_BODY.to_string(),
            )
        }
    }
}
