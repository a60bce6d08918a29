use async_trait::async_trait;
use modkit::SecurityCtx;
use uuid::Uuid;

use crate::contract::{
    error::BirthdaysError,
    model::{Birthday, BirthdayDetail, BirthdayForm, Congratulation, NewCongratulation},
};

/// Public API trait for the birthdays module that other in-process consumers can use
#[async_trait]
pub trait BirthdaysApi: Send + Sync {
    async fn list_birthdays(&self) -> Result<Vec<Birthday>, BirthdaysError>;

    async fn get_birthday(&self, id: Uuid) -> Result<BirthdayDetail, BirthdaysError>;

    async fn create_birthday(
        &self,
        ctx: &SecurityCtx,
        form: BirthdayForm,
    ) -> Result<Birthday, BirthdaysError>;

    async fn update_birthday(
        &self,
        ctx: &SecurityCtx,
        id: Uuid,
        form: BirthdayForm,
    ) -> Result<Birthday, BirthdaysError>;

    async fn delete_birthday(&self, ctx: &SecurityCtx, id: Uuid) -> Result<(), BirthdaysError>;

    async fn add_congratulation(
        &self,
        ctx: &SecurityCtx,
        birthday_id: Uuid,
        new: NewCongratulation,
    ) -> Result<Congratulation, BirthdaysError>;

    async fn list_tags(&self) -> Result<Vec<String>, BirthdaysError>;
}
