use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 1000, message = "Comment is required"))]
    pub comment: String,

    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "user_name")]
    pub user_name: String,
}
