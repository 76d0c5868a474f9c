use crate::config::LIVENESS_MESSAGE;

/// GET /
///
/// Static liveness message; never touches the store.
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
