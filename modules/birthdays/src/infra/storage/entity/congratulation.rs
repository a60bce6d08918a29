use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "congratulations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub birthday_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::birthday::Entity",
        from = "Column::BirthdayId",
        to = "super::birthday::Column::Id",
        on_delete = "Cascade"
    )]
    Birthday,
}

impl Related<super::birthday::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Birthday.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::contract::model::Congratulation {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            birthday_id: m.birthday_id,
            text: m.text,
            author: m.author,
            created_at: m.created_at,
        }
    }
}
