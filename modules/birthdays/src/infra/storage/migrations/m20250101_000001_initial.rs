use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Birthdays {
    Table,
    Id,
    FirstName,
    LastName,
    Birthday,
    Author,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum BirthdayTags {
    Table,
    BirthdayId,
    TagId,
}

#[derive(DeriveIden)]
enum Congratulations {
    Table,
    Id,
    BirthdayId,
    Text,
    Author,
    CreatedAt,
}

const NAME_LEN: u32 = 20;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Birthdays::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Birthdays::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Birthdays::FirstName)
                            .string_len(NAME_LEN)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Birthdays::LastName)
                            .string_len(NAME_LEN)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Birthdays::Birthday).date().not_null())
                    .col(ColumnDef::new(Birthdays::Author).uuid().not_null())
                    .col(
                        ColumnDef::new(Birthdays::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Birthdays::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per person.
        manager
            .create_index(
                Index::create()
                    .name("ux_birthdays_person")
                    .table(Birthdays::Table)
                    .col(Birthdays::FirstName)
                    .col(Birthdays::LastName)
                    .col(Birthdays::Birthday)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tags::Name)
                            .string_len(NAME_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BirthdayTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BirthdayTags::BirthdayId).uuid().not_null())
                    .col(ColumnDef::new(BirthdayTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(BirthdayTags::BirthdayId)
                            .col(BirthdayTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_birthday_tags_birthday")
                            .from(BirthdayTags::Table, BirthdayTags::BirthdayId)
                            .to(Birthdays::Table, Birthdays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_birthday_tags_tag")
                            .from(BirthdayTags::Table, BirthdayTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Congratulations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Congratulations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Congratulations::BirthdayId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Congratulations::Text).text().not_null())
                    .col(ColumnDef::new(Congratulations::Author).uuid().not_null())
                    .col(
                        ColumnDef::new(Congratulations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_congratulations_birthday")
                            .from(Congratulations::Table, Congratulations::BirthdayId)
                            .to(Birthdays::Table, Birthdays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_congratulations_birthday")
                    .table(Congratulations::Table)
                    .col(Congratulations::BirthdayId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Congratulations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BirthdayTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Birthdays::Table).to_owned())
            .await
    }
}
