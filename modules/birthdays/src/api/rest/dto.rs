use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    Birthday, BirthdayDetail, BirthdayForm, Congratulation, NewCongratulation,
};

/// REST DTO for birthday representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BirthdayDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    pub tags: Vec<String>,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Birthday with the countdown and its congratulations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BirthdayDetailDto {
    #[serde(flatten)]
    pub birthday: BirthdayDto,
    /// Days until the next occurrence, 0 on the day itself.
    pub days_until: u32,
    pub congratulations: Vec<CongratulationDto>,
}

/// Full birthday form, used by both create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BirthdayReq {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub birthday: NaiveDate,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CongratulationDto {
    pub id: Uuid,
    pub birthday_id: Uuid,
    pub text: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CongratulationReq {
    pub text: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<Birthday> for BirthdayDto {
    fn from(b: Birthday) -> Self {
        Self {
            id: b.id,
            first_name: b.first_name,
            last_name: b.last_name,
            birthday: b.birthday,
            tags: b.tags,
            author: b.author,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

impl From<BirthdayDetail> for BirthdayDetailDto {
    fn from(d: BirthdayDetail) -> Self {
        Self {
            birthday: d.birthday.into(),
            days_until: d.days_until,
            congratulations: d.congratulations.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Congratulation> for CongratulationDto {
    fn from(c: Congratulation) -> Self {
        Self {
            id: c.id,
            birthday_id: c.birthday_id,
            text: c.text,
            author: c.author,
            created_at: c.created_at,
        }
    }
}

impl From<BirthdayReq> for BirthdayForm {
    fn from(req: BirthdayReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name.unwrap_or_default(),
            birthday: req.birthday,
            tags: req.tags.unwrap_or_default(),
        }
    }
}

impl From<CongratulationReq> for NewCongratulation {
    fn from(req: CongratulationReq) -> Self {
        Self { text: req.text }
    }
}
