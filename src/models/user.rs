//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User account (the stored credential record)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Login identifier
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,

    // Profile
    pub full_name: String,
    /// `Gender::as_str` value
    pub gender: String,
    /// `AgeRange::as_str` value
    pub age: String,
    pub education: Option<String>,
    pub income_bracket: Option<String>,
    pub phone_number: Option<String>,
    pub profile_pic: Option<String>,

    // Account state
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Record handed to a store for insertion; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub gender: Gender,
    pub age: AgeRange,
    pub education: Option<String>,
    pub income_bracket: Option<String>,
    pub phone_number: Option<String>,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Age bracket collected at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "15-20")]
    From15To20,
    #[serde(rename = "21-25")]
    From21To25,
    #[serde(rename = "26-30")]
    From26To30,
    #[serde(rename = "31-35")]
    From31To35,
    #[serde(rename = "36-40")]
    From36To40,
    #[serde(rename = "41-50")]
    From41To50,
    #[serde(rename = "51-60")]
    From51To60,
    #[serde(rename = "61-70")]
    From61To70,
    #[serde(rename = "71-80")]
    From71To80,
    #[serde(rename = "80+")]
    Over80,
}

impl AgeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeRange::From15To20 => "15-20",
            AgeRange::From21To25 => "21-25",
            AgeRange::From26To30 => "26-30",
            AgeRange::From31To35 => "31-35",
            AgeRange::From36To40 => "36-40",
            AgeRange::From41To50 => "41-50",
            AgeRange::From51To60 => "51-60",
            AgeRange::From61To70 => "61-70",
            AgeRange::From71To80 => "71-80",
            AgeRange::Over80 => "80+",
        }
    }
}

/// Authenticated identity injected into handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub age: AgeRange,
    #[validate(length(max = 100))]
    pub education: Option<String>,
    #[validate(length(max = 50))]
    pub income_bracket: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: Option<String>,
    pub profile_pic: Option<String>,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub msg: String,
    pub user_id: i64,
}

/// Profile of the current user (without sensitive data)
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub age: String,
    pub education: Option<String>,
    pub income_bracket: Option<String>,
    pub phone_number: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            full_name: user.full_name,
            email: user.email,
            gender: user.gender,
            age: user.age,
            education: user.education,
            income_bracket: user.income_bracket,
            phone_number: user.phone_number,
            profile_pic: user.profile_pic,
            created_at: user.created_at,
        }
    }
}
