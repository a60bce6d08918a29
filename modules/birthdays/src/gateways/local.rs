use async_trait::async_trait;
use modkit::SecurityCtx;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::BirthdaysApi,
    error::BirthdaysError,
    model::{Birthday, BirthdayDetail, BirthdayForm, Congratulation, NewCongratulation},
};
use crate::domain::service::Service;

/// Local implementation of the BirthdaysApi trait that delegates to the domain service
pub struct BirthdaysLocalClient {
    service: Arc<Service>,
}

impl BirthdaysLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BirthdaysApi for BirthdaysLocalClient {
    async fn list_birthdays(&self) -> Result<Vec<Birthday>, BirthdaysError> {
        self.service.list_birthdays().await.map_err(Into::into)
    }

    async fn get_birthday(&self, id: Uuid) -> Result<BirthdayDetail, BirthdaysError> {
        self.service.get_birthday(id).await.map_err(Into::into)
    }

    async fn create_birthday(
        &self,
        ctx: &SecurityCtx,
        form: BirthdayForm,
    ) -> Result<Birthday, BirthdaysError> {
        self.service
            .create_birthday(ctx, form)
            .await
            .map_err(Into::into)
    }

    async fn update_birthday(
        &self,
        ctx: &SecurityCtx,
        id: Uuid,
        form: BirthdayForm,
    ) -> Result<Birthday, BirthdaysError> {
        self.service
            .update_birthday(ctx, id, form)
            .await
            .map_err(Into::into)
    }

    async fn delete_birthday(&self, ctx: &SecurityCtx, id: Uuid) -> Result<(), BirthdaysError> {
        self.service
            .delete_birthday(ctx, id)
            .await
            .map_err(Into::into)
    }

    async fn add_congratulation(
        &self,
        ctx: &SecurityCtx,
        birthday_id: Uuid,
        new: NewCongratulation,
    ) -> Result<Congratulation, BirthdaysError> {
        self.service
            .add_congratulation(ctx, birthday_id, new)
            .await
            .map_err(Into::into)
    }

    async fn list_tags(&self) -> Result<Vec<String>, BirthdaysError> {
        self.service.list_tags().await.map_err(Into::into)
    }
}
