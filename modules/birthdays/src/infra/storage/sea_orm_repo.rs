//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over the connection so tests can hand in an in-memory SQLite
//! `DatabaseConnection`. Writes that touch several tables run in a transaction.

use std::collections::HashMap;

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{Birthday, Congratulation};
use crate::domain::repo::{BirthdaysRepository, DuplicatePerson};
use crate::infra::storage::entity::{birthday, birthday_tag, congratulation, tag};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmBirthdaysRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmBirthdaysRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn to_contract(m: birthday::Model, tags: Vec<String>) -> Birthday {
    Birthday {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        birthday: m.birthday,
        tags,
        author: m.author,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active(b: &Birthday) -> birthday::ActiveModel {
    birthday::ActiveModel {
        id: Set(b.id),
        first_name: Set(b.first_name.clone()),
        last_name: Set(b.last_name.clone()),
        birthday: Set(b.birthday),
        author: Set(b.author),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

/// The only unique index on `birthdays` covers the person key.
fn person_write_error(e: DbErr, what: &'static str) -> anyhow::Error {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DuplicatePerson.into(),
        _ => anyhow::Error::new(e).context(what),
    }
}

/// Sorted tag names per birthday id.
async fn load_tags<T: ConnectionTrait>(
    db: &T,
    ids: Vec<Uuid>,
) -> anyhow::Result<HashMap<Uuid, Vec<String>>> {
    let mut by_birthday: HashMap<Uuid, Vec<String>> = HashMap::new();
    if ids.is_empty() {
        return Ok(by_birthday);
    }
    let rows = birthday_tag::Entity::find()
        .filter(birthday_tag::Column::BirthdayId.is_in(ids))
        .find_also_related(tag::Entity)
        .all(db)
        .await
        .context("load_tags failed")?;
    for (link, t) in rows {
        if let Some(t) = t {
            by_birthday.entry(link.birthday_id).or_default().push(t.name);
        }
    }
    for names in by_birthday.values_mut() {
        names.sort();
    }
    Ok(by_birthday)
}

/// Point `birthday_id` at exactly `names`, creating missing tags.
async fn replace_tag_links<T: ConnectionTrait>(
    db: &T,
    birthday_id: Uuid,
    names: &[String],
) -> anyhow::Result<()> {
    birthday_tag::Entity::delete_many()
        .filter(birthday_tag::Column::BirthdayId.eq(birthday_id))
        .exec(db)
        .await
        .context("clearing tag links failed")?;

    let mut links = Vec::with_capacity(names.len());
    for name in names {
        let existing = tag::Entity::find()
            .filter(tag::Column::Name.eq(name.as_str()))
            .one(db)
            .await
            .context("tag lookup failed")?;
        let tag_id = match existing {
            Some(t) => t.id,
            None => {
                tag::ActiveModel {
                    name: Set(name.clone()),
                    ..Default::default()
                }
                .insert(db)
                .await
                .with_context(|| format!("creating tag '{name}' failed"))?
                .id
            }
        };
        links.push(birthday_tag::ActiveModel {
            birthday_id: Set(birthday_id),
            tag_id: Set(tag_id),
        });
    }

    if !links.is_empty() {
        birthday_tag::Entity::insert_many(links)
            .exec_without_returning(db)
            .await
            .context("inserting tag links failed")?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl<C> BirthdaysRepository for SeaOrmBirthdaysRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Birthday>> {
        let Some(found) = birthday::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?
        else {
            return Ok(None);
        };
        let mut tags = load_tags(&self.conn, vec![id]).await?;
        Ok(Some(to_contract(found, tags.remove(&id).unwrap_or_default())))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Birthday>> {
        let rows = birthday::Entity::find()
            .order_by_asc(birthday::Column::CreatedAt)
            .order_by_asc(birthday::Column::Id)
            .all(&self.conn)
            .await
            .context("list_all failed")?;
        let mut tags = load_tags(&self.conn, rows.iter().map(|m| m.id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|m| {
                let t = tags.remove(&m.id).unwrap_or_default();
                to_contract(m, t)
            })
            .collect())
    }

    async fn person_exists(
        &self,
        first_name: &str,
        last_name: &str,
        birthday: NaiveDate,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        let mut query = birthday::Entity::find()
            .filter(birthday::Column::FirstName.eq(first_name))
            .filter(birthday::Column::LastName.eq(last_name))
            .filter(birthday::Column::Birthday.eq(birthday));
        if let Some(id) = exclude {
            query = query.filter(birthday::Column::Id.ne(id));
        }
        let count = query
            .count(&self.conn)
            .await
            .context("person_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, b: Birthday) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let _ = to_active(&b)
            .insert(&txn)
            .await
            .map_err(|e| person_write_error(e, "insert failed"))?;
        replace_tag_links(&txn, b.id, &b.tags).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn update(&self, b: Birthday) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let _ = to_active(&b)
            .update(&txn)
            .await
            .map_err(|e| person_write_error(e, "update failed"))?;
        replace_tag_links(&txn, b.id, &b.tags).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        // Children go first so the result does not depend on SQLite's foreign_keys pragma.
        let txn = self.conn.begin().await.context("begin failed")?;
        congratulation::Entity::delete_many()
            .filter(congratulation::Column::BirthdayId.eq(id))
            .exec(&txn)
            .await
            .context("deleting congratulations failed")?;
        birthday_tag::Entity::delete_many()
            .filter(birthday_tag::Column::BirthdayId.eq(id))
            .exec(&txn)
            .await
            .context("deleting tag links failed")?;
        let res = birthday::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list_congratulations(&self, birthday_id: Uuid) -> anyhow::Result<Vec<Congratulation>> {
        let rows = congratulation::Entity::find()
            .filter(congratulation::Column::BirthdayId.eq(birthday_id))
            .order_by_asc(congratulation::Column::CreatedAt)
            .order_by_asc(congratulation::Column::Id)
            .all(&self.conn)
            .await
            .context("list_congratulations failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_congratulation(&self, c: Congratulation) -> anyhow::Result<()> {
        let m = congratulation::ActiveModel {
            id: Set(c.id),
            birthday_id: Set(c.birthday_id),
            text: Set(c.text),
            author: Set(c.author),
            created_at: Set(c.created_at),
        };
        let _ = m
            .insert(&self.conn)
            .await
            .context("insert_congratulation failed")?;
        Ok(())
    }

    async fn list_tags(&self) -> anyhow::Result<Vec<String>> {
        let rows = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.conn)
            .await
            .context("list_tags failed")?;
        Ok(rows.into_iter().map(|t| t.name).collect())
    }
}
