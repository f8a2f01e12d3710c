// POST /api/check: classify a question pair.
//
// The body is taken as raw bytes rather than through the Json extractor so
// that missing, non-JSON and wrongly-typed bodies all get our own
// {"error": ...} responses instead of axum's plain-text rejections.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::checker::{CheckResult, QuestionPair};
use crate::error::CheckError;
use crate::web::AppState;

/// POST /api/check: body `{"q1": string, "q2": string}`.
///
/// 400 for bad input, 500 when an artifact isn't loaded or inference fails.
pub async fn check_duplicate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckResult>, CheckError> {
    let pair = QuestionPair::from_json(&body)?;
    let result = state.checker.check(pair).await?;

    tracing::info!(
        is_duplicate = result.prediction.is_duplicate,
        probability_duplicate = result.prediction.probability_duplicate,
        "Checked question pair"
    );

    Ok(Json(result))
}
