use aws_lambda_events::event::cognito::CognitoEventUserPoolsPostConfirmation;

use crate::directory::UserDirectory;
use crate::error::HandlerError;
use crate::ids::TimeIdGenerator;
use crate::records::RecordStore;
use crate::types::RegistrationAttributes;

/// Denormalizes a newly confirmed Cognito user into the relational users
/// table (when configured), the user table, and the entity table.
///
/// Clients are built once at cold start and handed in; nothing here is global.
pub struct RegistrationFinalizer<S, D> {
    store: S,
    directory: Option<D>,
    ids: TimeIdGenerator,
}

impl<S, D> RegistrationFinalizer<S, D>
where
    S: RecordStore,
    D: UserDirectory,
{
    pub fn new(store: S, directory: Option<D>) -> Self {
        Self {
            store,
            directory,
            ids: TimeIdGenerator::new(),
        }
    }

    /// Run the write sequence and hand the event back unchanged.
    ///
    /// Only key-value failures are returned; a failed user write means the
    /// entity write is never attempted.
    pub async fn finalize(
        &self,
        event: CognitoEventUserPoolsPostConfirmation,
    ) -> Result<CognitoEventUserPoolsPostConfirmation, HandlerError> {
        match serde_json::to_string(&event) {
            Ok(raw) => tracing::info!("Post confirmation event: {}", raw),
            Err(_) => tracing::info!("Post confirmation event: {:?}", event),
        }

        let attributes = RegistrationAttributes::from_attributes(&event.request.user_attributes)?;
        tracing::info!("Finalizing registration for user: {}", attributes.sub);

        self.add_to_directory(&attributes).await;

        if let Err(e) = self.store.put_user(&attributes.user_record()).await {
            tracing::error!("Unable to add item to user table: {}", e);
            return Err(HandlerError::UserWrite(e));
        }

        let entity = attributes.entity_record(self.ids.next_id());
        if let Err(e) = self.store.put_entity(&entity).await {
            tracing::error!("Unable to add item to entity table: {}", e);
            return Err(HandlerError::EntityWrite(e));
        }

        tracing::info!(
            "Registration finalized for user: {} (entity: {})",
            attributes.sub,
            entity.id
        );
        Ok(event)
    }

    // Best-effort: errors are logged, never returned.
    async fn add_to_directory(&self, attributes: &RegistrationAttributes) {
        let Some(directory) = &self.directory else {
            tracing::info!("PostgreSQL database connection is not initialized, skipping user addition");
            return;
        };

        match directory.insert_user(&attributes.relational_user()).await {
            Ok(Some(row_id)) => {
                tracing::info!("User added to PostgreSQL database with ID: {}", row_id)
            }
            Ok(None) => tracing::info!(
                "User {} already exists in PostgreSQL database, nothing inserted",
                attributes.sub
            ),
            Err(e) => tracing::error!("Failed to add user to PostgreSQL database: {}", e),
        }
    }
}
