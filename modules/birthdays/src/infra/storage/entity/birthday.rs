use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "birthdays")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::congratulation::Entity")]
    Congratulation,
    #[sea_orm(has_many = "super::birthday_tag::Entity")]
    BirthdayTag,
}

impl Related<super::congratulation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Congratulation.def()
    }
}

impl Related<super::birthday_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BirthdayTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::birthday_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::birthday_tag::Relation::Birthday.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
