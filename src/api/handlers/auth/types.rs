//! Request/response types for account and graph endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public projection of a user record. The password hash is never selected
/// into this type, so it cannot leak through serialization.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub profile_image_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Merge-patch for the caller's own profile: absent or empty fields leave
/// the stored value untouched. Password change requires both password
/// fields together. Image fields carry base64 blobs for the media store.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Followed,
    Unfollowed,
}

/// Which transition a follow request performed, never both.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct FollowResponse {
    pub action: FollowAction,
}
