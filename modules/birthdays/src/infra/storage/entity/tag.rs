use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::birthday_tag::Entity")]
    BirthdayTag,
}

impl Related<super::birthday_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BirthdayTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
