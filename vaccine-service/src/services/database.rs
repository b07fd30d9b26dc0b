use crate::models::{Dose, Vaccine};
use crate::services::store::{
    DoseFilter, DoseStore, VaccineFilter, VaccineStore, DUPLICATE_DOSE, DUPLICATE_VACCINE_NAME,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for vaccine-service");

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("vaccine_name_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.vaccines()
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index on vaccines collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on vaccines.name");

        // One record per patient, vaccine and dose number
        let course_index = IndexModel::builder()
            .keys(doc! { "patient_id": 1, "vaccine_id": 1, "dose_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("patient_course_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.doses()
            .create_index(course_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create course index on doses collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on doses.(patient_id, vaccine_id, dose_number)");

        let vaccine_index = IndexModel::builder()
            .keys(doc! { "vaccine_id": 1, "administered_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("vaccine_lookup".to_string())
                    .build(),
            )
            .build();

        self.doses()
            .create_index(vaccine_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create vaccine index on doses collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on doses.(vaccine_id, administered_at)");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn vaccines(&self) -> Collection<Vaccine> {
        self.db.collection("vaccines")
    }

    pub fn doses(&self) -> Collection<Dose> {
        self.db.collection("doses")
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

fn write_error(err: mongodb::error::Error, duplicate_message: &'static str) -> AppError {
    if is_duplicate_key(&err) {
        AppError::conflict(duplicate_message)
    } else {
        AppError::from(err)
    }
}

fn vaccine_query(filter: &VaccineFilter) -> Document {
    let mut query = doc! {};
    if let Some(active) = filter.is_active {
        query.insert("is_active", active);
    }
    query
}

fn dose_query(filter: &DoseFilter) -> Result<Document, AppError> {
    let mut query = doc! {};
    if let Some(vaccine_id) = &filter.vaccine_id {
        query.insert("vaccine_id", vaccine_id.as_str());
    }
    if let Some(patient_id) = &filter.patient_id {
        query.insert("patient_id", patient_id.as_str());
    }
    if let Some(status) = filter.status {
        let bson_status = mongodb::bson::to_bson(&status).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to serialize status: {}", e))
        })?;
        query.insert("status", bson_status);
    }
    Ok(query)
}

#[async_trait]
impl VaccineStore for MongoDb {
    async fn list_vaccines(&self, filter: &VaccineFilter) -> Result<Vec<Vaccine>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .vaccines()
            .find(vaccine_query(filter), options)
            .await
            .map_err(AppError::from)?;

        cursor.try_collect().await.map_err(AppError::from)
    }

    async fn find_vaccine(&self, id: &str) -> Result<Option<Vaccine>, AppError> {
        self.vaccines()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn insert_vaccine(&self, vaccine: &Vaccine) -> Result<(), AppError> {
        self.vaccines()
            .insert_one(vaccine, None)
            .await
            .map_err(|e| write_error(e, DUPLICATE_VACCINE_NAME))?;
        Ok(())
    }

    async fn replace_vaccine(&self, vaccine: &Vaccine) -> Result<bool, AppError> {
        let result = self
            .vaccines()
            .replace_one(doc! { "_id": vaccine.id.as_str() }, vaccine, None)
            .await
            .map_err(|e| write_error(e, DUPLICATE_VACCINE_NAME))?;
        Ok(result.matched_count > 0)
    }

    async fn delete_vaccine(&self, id: &str) -> Result<bool, AppError> {
        let result = self
            .vaccines()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl DoseStore for MongoDb {
    async fn list_doses(&self, filter: &DoseFilter) -> Result<Vec<Dose>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "administered_at": -1 })
            .build();

        let cursor = self
            .doses()
            .find(dose_query(filter)?, options)
            .await
            .map_err(AppError::from)?;

        cursor.try_collect().await.map_err(AppError::from)
    }

    async fn find_dose(&self, id: &str) -> Result<Option<Dose>, AppError> {
        self.doses()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn insert_dose(&self, dose: &Dose) -> Result<(), AppError> {
        self.doses()
            .insert_one(dose, None)
            .await
            .map_err(|e| write_error(e, DUPLICATE_DOSE))?;
        Ok(())
    }

    async fn replace_dose(&self, dose: &Dose) -> Result<bool, AppError> {
        let result = self
            .doses()
            .replace_one(doc! { "_id": dose.id.as_str() }, dose, None)
            .await
            .map_err(|e| write_error(e, DUPLICATE_DOSE))?;
        Ok(result.matched_count > 0)
    }

    async fn delete_dose(&self, id: &str) -> Result<bool, AppError> {
        let result = self
            .doses()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }

    async fn count_doses_for_vaccine(&self, vaccine_id: &str) -> Result<u64, AppError> {
        self.doses()
            .count_documents(doc! { "vaccine_id": vaccine_id }, None)
            .await
            .map_err(AppError::from)
    }
}
