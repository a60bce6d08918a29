use std::sync::Arc;

use chrono::Utc;
use modkit::SecurityCtx;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{
    Birthday, BirthdayDetail, BirthdayForm, Congratulation, NewCongratulation,
};
use crate::domain::countdown::days_until_next;
use crate::domain::error::DomainError;
use crate::domain::form::{self, AgeBounds, AlertRecipients, CleanedBirthday};
use crate::domain::guards::{ensure_author, require_login};
use crate::domain::ports::{Clock, Notifier};
use crate::domain::repo::{BirthdaysRepository, DuplicatePerson};

/// Domain service with business rules for birthdays and congratulations.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn BirthdaysRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub age_bounds: AgeBounds,
    pub alert: AlertRecipients,
}

impl Service {
    pub fn new(
        repo: Arc<dyn BirthdaysRepository>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            notifier,
            clock,
            config,
        }
    }

    async fn load(&self, id: Uuid) -> Result<Birthday, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::birthday_not_found(id))
    }

    async fn validate(&self, form: &BirthdayForm) -> Result<CleanedBirthday, DomainError> {
        form::validate_birthday(
            form,
            self.clock.today(),
            self.config.age_bounds,
            self.notifier.as_ref(),
            &self.config.alert,
        )
        .await
    }

    async fn ensure_unique(
        &self,
        cleaned: &CleanedBirthday,
        exclude: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let exists = self
            .repo
            .person_exists(
                &cleaned.first_name,
                &cleaned.last_name,
                cleaned.birthday,
                exclude,
            )
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if exists {
            return Err(DomainError::person_already_exists(
                cleaned.first_name.clone(),
                cleaned.last_name.clone(),
                cleaned.birthday,
            ));
        }
        Ok(())
    }

    #[instrument(name = "birthdays.service.list_birthdays", skip(self))]
    pub async fn list_birthdays(&self) -> Result<Vec<Birthday>, DomainError> {
        debug!("Listing birthdays");
        let items = self
            .repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!("Listed {} birthdays", items.len());
        Ok(items)
    }

    #[instrument(name = "birthdays.service.get_birthday", skip(self), fields(birthday_id = %id))]
    pub async fn get_birthday(&self, id: Uuid) -> Result<BirthdayDetail, DomainError> {
        debug!("Getting birthday by id");
        let birthday = self.load(id).await?;
        let congratulations = self
            .repo
            .list_congratulations(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        let days_until = days_until_next(birthday.birthday, self.clock.today());
        debug!(days_until, "Successfully retrieved birthday");
        Ok(BirthdayDetail {
            birthday,
            days_until,
            congratulations,
        })
    }

    #[instrument(
        name = "birthdays.service.create_birthday",
        skip(self, ctx, form),
        fields(first_name = %form.first_name)
    )]
    pub async fn create_birthday(
        &self,
        ctx: &SecurityCtx,
        form: BirthdayForm,
    ) -> Result<Birthday, DomainError> {
        info!("Creating new birthday");
        let author = require_login(ctx)?;
        let cleaned = self.validate(&form).await?;
        self.ensure_unique(&cleaned, None).await?;

        let now = Utc::now();
        let birthday = Birthday {
            id: Uuid::new_v4(),
            first_name: cleaned.first_name,
            last_name: cleaned.last_name,
            birthday: cleaned.birthday,
            tags: cleaned.tags.into_iter().collect(),
            author,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(birthday.clone())
            .await
            .map_err(|e| write_error(e, &birthday))?;

        info!("Successfully created birthday with id={}", birthday.id);
        Ok(birthday)
    }

    #[instrument(
        name = "birthdays.service.update_birthday",
        skip(self, ctx, form),
        fields(birthday_id = %id)
    )]
    pub async fn update_birthday(
        &self,
        ctx: &SecurityCtx,
        id: Uuid,
        form: BirthdayForm,
    ) -> Result<Birthday, DomainError> {
        info!("Updating birthday");
        let current = self.load(id).await?;
        ensure_author(ctx, &current)?;

        let cleaned = self.validate(&form).await?;
        self.ensure_unique(&cleaned, Some(id)).await?;

        let updated = Birthday {
            first_name: cleaned.first_name,
            last_name: cleaned.last_name,
            birthday: cleaned.birthday,
            tags: cleaned.tags.into_iter().collect(),
            updated_at: Utc::now(),
            ..current
        };

        self.repo
            .update(updated.clone())
            .await
            .map_err(|e| write_error(e, &updated))?;

        info!("Successfully updated birthday");
        Ok(updated)
    }

    #[instrument(
        name = "birthdays.service.delete_birthday",
        skip(self, ctx),
        fields(birthday_id = %id)
    )]
    pub async fn delete_birthday(&self, ctx: &SecurityCtx, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting birthday");
        let current = self.load(id).await?;
        ensure_author(ctx, &current)?;

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::birthday_not_found(id));
        }

        info!("Successfully deleted birthday");
        Ok(())
    }

    #[instrument(
        name = "birthdays.service.add_congratulation",
        skip(self, ctx, new),
        fields(birthday_id = %birthday_id)
    )]
    pub async fn add_congratulation(
        &self,
        ctx: &SecurityCtx,
        birthday_id: Uuid,
        new: NewCongratulation,
    ) -> Result<Congratulation, DomainError> {
        info!("Adding congratulation");
        let author = require_login(ctx)?;
        self.load(birthday_id).await?;
        let text = form::clean_congratulation(&new)?;

        let congratulation = Congratulation {
            id: Uuid::new_v4(),
            birthday_id,
            text,
            author,
            created_at: Utc::now(),
        };
        self.repo
            .insert_congratulation(congratulation.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully added congratulation with id={}", congratulation.id);
        Ok(congratulation)
    }

    #[instrument(name = "birthdays.service.list_tags", skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<String>, DomainError> {
        debug!("Listing tags");
        self.repo
            .list_tags()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}

fn write_error(e: anyhow::Error, b: &Birthday) -> DomainError {
    if e.is::<DuplicatePerson>() {
        return DomainError::person_already_exists(
            b.first_name.clone(),
            b.last_name.clone(),
            b.birthday,
        );
    }
    DomainError::database(e.to_string())
}
