use super::validate::{require, validate_email};
use super::{Gateway, today};
use crate::error::{Error, Result};
use crate::types::{Application, ApplicationInput, ApplicationStatus, ApplicationUpdate};

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Gateway {
    pub async fn list_applications(&self) -> Result<Vec<Application>> {
        self.run(|store| store.list_applications()).await
    }

    /// Records a public submission. New applications always start as
    /// `Pending`, whatever the caller sends.
    pub async fn create_application(&self, input: ApplicationInput) -> Result<Application> {
        require(&input.name, "Name")?;
        validate_email(input.email.trim())?;
        require(&input.role, "Role")?;
        require(&input.message, "Message")?;

        let application = Application {
            id: 0,
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            role: input.role.trim().to_string(),
            portfolio: input.portfolio.trim().to_string(),
            message: input.message,
            cv: optional(input.cv),
            status: ApplicationStatus::Pending,
            date: today(),
        };

        self.run(move |store| store.create_application(&application))
            .await
    }

    /// Applies an admin edit. Status may move between any two values.
    pub async fn update_application(
        &self,
        id: i64,
        update: ApplicationUpdate,
    ) -> Result<Application> {
        if let Some(name) = &update.name {
            require(name, "Name")?;
        }
        if let Some(email) = &update.email {
            validate_email(email.trim())?;
        }
        if let Some(role) = &update.role {
            require(role, "Role")?;
        }
        if let Some(message) = &update.message {
            require(message, "Message")?;
        }

        self.run(move |store| {
            let mut application = store.get_application(id)?.ok_or(Error::NotFound)?;

            if let Some(name) = update.name {
                application.name = name.trim().to_string();
            }
            if let Some(email) = update.email {
                application.email = email.trim().to_string();
            }
            if let Some(role) = update.role {
                application.role = role.trim().to_string();
            }
            if let Some(portfolio) = update.portfolio {
                application.portfolio = portfolio.trim().to_string();
            }
            if let Some(message) = update.message {
                application.message = message;
            }
            if update.cv.is_some() {
                application.cv = optional(update.cv);
            }
            if let Some(status) = update.status {
                application.status = status;
            }

            store.update_application(&application)?;
            Ok(application)
        })
        .await
    }
}
