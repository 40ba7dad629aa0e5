use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ProgressStore, ProgressTx, StoreError};
use crate::domain::{
    Approval, ApprovalId, Job, JobId, Photo, PhotoId, PhotoOwner, Step, StepId, SubStep, SubStepId,
    TeamId, UserId,
};

const JOB_COLUMNS: &str = "id, title, status, priority, created_by, assigned_to, team_id, \
     scheduled_date, completed_date, signature_url, signature_latitude, signature_longitude, \
     created_at, updated_at";

const STEP_COLUMNS: &str = "id, job_id, title, step_order, is_completed, completed_at, \
     completed_by, review_status, rejection_reason, approved_by, approved_at, started_at";

const SUBSTEP_COLUMNS: &str = "id, step_id, title, position, is_completed, completed_at, \
     completed_by, review_status, rejection_reason, approved_by, approved_at, started_at";

const APPROVAL_COLUMNS: &str =
    "id, job_id, kind, requester_id, approver_id, status, notes, created_at, updated_at";

const PHOTO_COLUMNS: &str = "id, step_id, substep_id, url, uploaded_by, uploaded_at";

pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn begin(&self) -> Result<Box<dyn ProgressTx>, StoreError> {
        let tx = self.pool.begin().await.map_err(query_err)?;
        Ok(Box::new(PgProgressTx { tx }))
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(job_from_row).transpose()
    }

    #[instrument(skip(self), fields(step_id = %id.as_uuid()))]
    async fn step(&self, id: StepId) -> Result<Option<Step>, StoreError> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(step_from_row).transpose()
    }

    #[instrument(skip(self), fields(substep_id = %id.as_uuid()))]
    async fn substep(&self, id: SubStepId) -> Result<Option<SubStep>, StoreError> {
        let sql = format!("SELECT {SUBSTEP_COLUMNS} FROM substeps WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(substep_from_row).transpose()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn steps_for_job(&self, job_id: JobId) -> Result<Vec<Step>, StoreError> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE job_id = $1 ORDER BY step_order");
        let rows = sqlx::query(&sql)
            .bind(job_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        rows.iter().map(step_from_row).collect()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn substeps_for_job(&self, job_id: JobId) -> Result<Vec<SubStep>, StoreError> {
        let sql = "SELECT ss.id, ss.step_id, ss.title, ss.position, ss.is_completed, \
             ss.completed_at, ss.completed_by, ss.review_status, ss.rejection_reason, \
             ss.approved_by, ss.approved_at, ss.started_at \
             FROM substeps ss \
             JOIN steps s ON ss.step_id = s.id \
             WHERE s.job_id = $1 \
             ORDER BY s.step_order, ss.position";
        let rows = sqlx::query(sql)
            .bind(job_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        rows.iter().map(substep_from_row).collect()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn photos_for_job(&self, job_id: JobId) -> Result<Vec<Photo>, StoreError> {
        let sql = "SELECT p.id, p.step_id, p.substep_id, p.url, p.uploaded_by, p.uploaded_at \
             FROM photos p \
             LEFT JOIN substeps ss ON p.substep_id = ss.id \
             JOIN steps s ON COALESCE(p.step_id, ss.step_id) = s.id \
             WHERE s.job_id = $1 \
             ORDER BY p.uploaded_at";
        let rows = sqlx::query(sql)
            .bind(job_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        rows.iter().map(photo_from_row).collect()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn approvals_for_job(&self, job_id: JobId) -> Result<Vec<Approval>, StoreError> {
        let sql = format!(
            "SELECT {APPROVAL_COLUMNS} FROM approvals WHERE job_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(job_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        rows.iter().map(approval_from_row).collect()
    }

    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO jobs (id, title, status, priority, created_by, assigned_to, team_id, \
             scheduled_date, completed_date, signature_url, signature_latitude, \
             signature_longitude, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(job.id.as_uuid())
        .bind(&job.title)
        .bind(job.status.as_str())
        .bind(job.priority.as_str())
        .bind(job.created_by.as_uuid())
        .bind(job.assigned_to.map(|u| u.as_uuid()))
        .bind(job.team_id.map(|t| t.as_uuid()))
        .bind(job.scheduled_date)
        .bind(job.completed_date)
        .bind(&job.signature_url)
        .bind(job.signature_latitude)
        .bind(job.signature_longitude)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    #[instrument(skip(self, step), fields(step_id = %step.id.as_uuid()))]
    async fn insert_step(&self, step: &Step) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO steps (id, job_id, title, step_order, is_completed, completed_at, \
             completed_by, review_status, rejection_reason, approved_by, approved_at, started_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(step.id.as_uuid())
        .bind(step.job_id.as_uuid())
        .bind(&step.title)
        .bind(step.order)
        .bind(step.is_completed)
        .bind(step.completed_at)
        .bind(step.completed_by.map(|u| u.as_uuid()))
        .bind(step.review_status.as_str())
        .bind(&step.rejection_reason)
        .bind(step.approved_by.map(|u| u.as_uuid()))
        .bind(step.approved_at)
        .bind(step.started_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    #[instrument(skip(self, substep), fields(substep_id = %substep.id.as_uuid()))]
    async fn insert_substep(&self, substep: &SubStep) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO substeps (id, step_id, title, position, is_completed, completed_at, \
             completed_by, review_status, rejection_reason, approved_by, approved_at, started_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(substep.id.as_uuid())
        .bind(substep.step_id.as_uuid())
        .bind(&substep.title)
        .bind(substep.position)
        .bind(substep.is_completed)
        .bind(substep.completed_at)
        .bind(substep.completed_by.map(|u| u.as_uuid()))
        .bind(substep.review_status.as_str())
        .bind(&substep.rejection_reason)
        .bind(substep.approved_by.map(|u| u.as_uuid()))
        .bind(substep.approved_at)
        .bind(substep.started_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    #[instrument(skip(self, photo), fields(photo_id = %photo.id.as_uuid()))]
    async fn insert_photo(&self, photo: &Photo) -> Result<(), StoreError> {
        let (step_id, substep_id) = match photo.owner {
            PhotoOwner::Step(id) => (Some(id.as_uuid()), None),
            PhotoOwner::SubStep(id) => (None, Some(id.as_uuid())),
        };
        sqlx::query(
            "INSERT INTO photos (id, step_id, substep_id, url, uploaded_by, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(photo.id.as_uuid())
        .bind(step_id)
        .bind(substep_id)
        .bind(&photo.url)
        .bind(photo.uploaded_by.as_uuid())
        .bind(photo.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    #[instrument(skip(self), fields(photo_id = %id.as_uuid()))]
    async fn photo(&self, id: PhotoId) -> Result<Option<Photo>, StoreError> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(photo_from_row).transpose()
    }

    #[instrument(skip(self), fields(photo_id = %id.as_uuid()))]
    async fn delete_photo(&self, id: PhotoId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgProgressTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ProgressTx for PgProgressTx {
    async fn step(&mut self, id: StepId) -> Result<Option<Step>, StoreError> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(step_from_row).transpose()
    }

    async fn substep(&mut self, id: SubStepId) -> Result<Option<SubStep>, StoreError> {
        let sql = format!("SELECT {SUBSTEP_COLUMNS} FROM substeps WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(substep_from_row).transpose()
    }

    async fn approval(&mut self, id: ApprovalId) -> Result<Option<Approval>, StoreError> {
        let sql = format!("SELECT {APPROVAL_COLUMNS} FROM approvals WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(approval_from_row).transpose()
    }

    async fn job_for_update(&mut self, id: JobId) -> Result<Option<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(job_from_row).transpose()
    }

    async fn step_for_update(&mut self, id: StepId) -> Result<Option<Step>, StoreError> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(step_from_row).transpose()
    }

    async fn substep_for_update(&mut self, id: SubStepId) -> Result<Option<SubStep>, StoreError> {
        let sql = format!("SELECT {SUBSTEP_COLUMNS} FROM substeps WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(substep_from_row).transpose()
    }

    async fn steps_for_job(&mut self, job_id: JobId) -> Result<Vec<Step>, StoreError> {
        let sql = format!("SELECT {STEP_COLUMNS} FROM steps WHERE job_id = $1 ORDER BY step_order");
        let rows = sqlx::query(&sql)
            .bind(job_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(query_err)?;
        rows.iter().map(step_from_row).collect()
    }

    async fn substeps_for_step(&mut self, step_id: StepId) -> Result<Vec<SubStep>, StoreError> {
        let sql =
            format!("SELECT {SUBSTEP_COLUMNS} FROM substeps WHERE step_id = $1 ORDER BY position");
        let rows = sqlx::query(&sql)
            .bind(step_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(query_err)?;
        rows.iter().map(substep_from_row).collect()
    }

    async fn photo_count(&mut self, owner: PhotoOwner) -> Result<u64, StoreError> {
        let (sql, id) = match owner {
            PhotoOwner::Step(id) => (
                "SELECT COUNT(*) AS n FROM photos WHERE step_id = $1",
                id.as_uuid(),
            ),
            PhotoOwner::SubStep(id) => (
                "SELECT COUNT(*) AS n FROM photos WHERE substep_id = $1",
                id.as_uuid(),
            ),
        };
        let row = sqlx::query(sql)
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(query_err)?;
        let count: i64 = row.try_get("n").map_err(query_err)?;
        Ok(count as u64)
    }

    async fn update_job(&mut self, job: &Job) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE jobs SET title = $1, status = $2, priority = $3, assigned_to = $4, \
             team_id = $5, scheduled_date = $6, completed_date = $7, signature_url = $8, \
             signature_latitude = $9, signature_longitude = $10, updated_at = $11 \
             WHERE id = $12",
        )
        .bind(&job.title)
        .bind(job.status.as_str())
        .bind(job.priority.as_str())
        .bind(job.assigned_to.map(|u| u.as_uuid()))
        .bind(job.team_id.map(|t| t.as_uuid()))
        .bind(job.scheduled_date)
        .bind(job.completed_date)
        .bind(&job.signature_url)
        .bind(job.signature_latitude)
        .bind(job.signature_longitude)
        .bind(job.updated_at)
        .bind(job.id.as_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    async fn update_step(&mut self, step: &Step) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE steps SET title = $1, step_order = $2, is_completed = $3, completed_at = $4, \
             completed_by = $5, review_status = $6, rejection_reason = $7, approved_by = $8, \
             approved_at = $9, started_at = $10 \
             WHERE id = $11",
        )
        .bind(&step.title)
        .bind(step.order)
        .bind(step.is_completed)
        .bind(step.completed_at)
        .bind(step.completed_by.map(|u| u.as_uuid()))
        .bind(step.review_status.as_str())
        .bind(&step.rejection_reason)
        .bind(step.approved_by.map(|u| u.as_uuid()))
        .bind(step.approved_at)
        .bind(step.started_at)
        .bind(step.id.as_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    async fn update_substep(&mut self, substep: &SubStep) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE substeps SET title = $1, position = $2, is_completed = $3, completed_at = $4, \
             completed_by = $5, review_status = $6, rejection_reason = $7, approved_by = $8, \
             approved_at = $9, started_at = $10 \
             WHERE id = $11",
        )
        .bind(&substep.title)
        .bind(substep.position)
        .bind(substep.is_completed)
        .bind(substep.completed_at)
        .bind(substep.completed_by.map(|u| u.as_uuid()))
        .bind(substep.review_status.as_str())
        .bind(&substep.rejection_reason)
        .bind(substep.approved_by.map(|u| u.as_uuid()))
        .bind(substep.approved_at)
        .bind(substep.started_at)
        .bind(substep.id.as_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    async fn pending_approval_for_job(
        &mut self,
        job_id: JobId,
    ) -> Result<Option<Approval>, StoreError> {
        let sql = format!(
            "SELECT {APPROVAL_COLUMNS} FROM approvals WHERE job_id = $1 AND status = 'PENDING'"
        );
        let row = sqlx::query(&sql)
            .bind(job_id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(approval_from_row).transpose()
    }

    async fn approval_for_update(
        &mut self,
        id: ApprovalId,
    ) -> Result<Option<Approval>, StoreError> {
        let sql = format!("SELECT {APPROVAL_COLUMNS} FROM approvals WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(query_err)?;
        row.as_ref().map(approval_from_row).transpose()
    }

    async fn insert_approval(&mut self, approval: &Approval) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO approvals (id, job_id, kind, requester_id, approver_id, status, notes, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(approval.id.as_uuid())
        .bind(approval.job_id.as_uuid())
        .bind(approval.kind.as_str())
        .bind(approval.requester_id.as_uuid())
        .bind(approval.approver_id.as_uuid())
        .bind(approval.status.as_str())
        .bind(&approval.notes)
        .bind(approval.created_at)
        .bind(approval.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    async fn update_approval(&mut self, approval: &Approval) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE approvals SET approver_id = $1, status = $2, notes = $3, updated_at = $4 \
             WHERE id = $5",
        )
        .bind(approval.approver_id.as_uuid())
        .bind(approval.status.as_str())
        .bind(&approval.notes)
        .bind(approval.updated_at)
        .bind(approval.id.as_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(query_err)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(query_err)
    }
}

fn query_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_check_violation() => {
            StoreError::ConstraintViolation(db.to_string())
        }
        _ => StoreError::QueryFailed(e.to_string()),
    }
}

fn col<'r, T>(row: &'r PgRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
}

fn job_from_row(row: &PgRow) -> Result<Job, StoreError> {
    let status: String = col(row, "status")?;
    let priority: String = col(row, "priority")?;
    Ok(Job {
        id: JobId::from_uuid(col(row, "id")?),
        title: col(row, "title")?,
        status: status.parse().map_err(StoreError::QueryFailed)?,
        priority: priority.parse().map_err(StoreError::QueryFailed)?,
        created_by: UserId::from_uuid(col(row, "created_by")?),
        assigned_to: col::<Option<Uuid>>(row, "assigned_to")?.map(UserId::from_uuid),
        team_id: col::<Option<Uuid>>(row, "team_id")?.map(TeamId::from_uuid),
        scheduled_date: col(row, "scheduled_date")?,
        completed_date: col(row, "completed_date")?,
        signature_url: col(row, "signature_url")?,
        signature_latitude: col(row, "signature_latitude")?,
        signature_longitude: col(row, "signature_longitude")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn step_from_row(row: &PgRow) -> Result<Step, StoreError> {
    let review_status: String = col(row, "review_status")?;
    Ok(Step {
        id: StepId::from_uuid(col(row, "id")?),
        job_id: JobId::from_uuid(col(row, "job_id")?),
        title: col(row, "title")?,
        order: col(row, "step_order")?,
        is_completed: col(row, "is_completed")?,
        completed_at: col(row, "completed_at")?,
        completed_by: col::<Option<Uuid>>(row, "completed_by")?.map(UserId::from_uuid),
        review_status: review_status.parse().map_err(StoreError::QueryFailed)?,
        rejection_reason: col(row, "rejection_reason")?,
        approved_by: col::<Option<Uuid>>(row, "approved_by")?.map(UserId::from_uuid),
        approved_at: col(row, "approved_at")?,
        started_at: col(row, "started_at")?,
    })
}

fn substep_from_row(row: &PgRow) -> Result<SubStep, StoreError> {
    let review_status: String = col(row, "review_status")?;
    Ok(SubStep {
        id: SubStepId::from_uuid(col(row, "id")?),
        step_id: StepId::from_uuid(col(row, "step_id")?),
        title: col(row, "title")?,
        position: col(row, "position")?,
        is_completed: col(row, "is_completed")?,
        completed_at: col(row, "completed_at")?,
        completed_by: col::<Option<Uuid>>(row, "completed_by")?.map(UserId::from_uuid),
        review_status: review_status.parse().map_err(StoreError::QueryFailed)?,
        rejection_reason: col(row, "rejection_reason")?,
        approved_by: col::<Option<Uuid>>(row, "approved_by")?.map(UserId::from_uuid),
        approved_at: col(row, "approved_at")?,
        started_at: col(row, "started_at")?,
    })
}

fn approval_from_row(row: &PgRow) -> Result<Approval, StoreError> {
    let kind: String = col(row, "kind")?;
    let status: String = col(row, "status")?;
    Ok(Approval {
        id: ApprovalId::from_uuid(col(row, "id")?),
        job_id: JobId::from_uuid(col(row, "job_id")?),
        kind: kind.parse().map_err(StoreError::QueryFailed)?,
        requester_id: UserId::from_uuid(col(row, "requester_id")?),
        approver_id: UserId::from_uuid(col(row, "approver_id")?),
        status: status.parse().map_err(StoreError::QueryFailed)?,
        notes: col(row, "notes")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

fn photo_from_row(row: &PgRow) -> Result<Photo, StoreError> {
    let step_id: Option<Uuid> = col(row, "step_id")?;
    let substep_id: Option<Uuid> = col(row, "substep_id")?;
    let owner = match (step_id, substep_id) {
        (Some(id), None) => PhotoOwner::Step(StepId::from_uuid(id)),
        (None, Some(id)) => PhotoOwner::SubStep(SubStepId::from_uuid(id)),
        _ => {
            return Err(StoreError::QueryFailed(
                "photo row owns neither a step nor a substep".to_string(),
            ));
        }
    };
    Ok(Photo {
        id: PhotoId::from_uuid(col(row, "id")?),
        owner,
        url: col(row, "url")?,
        uploaded_by: UserId::from_uuid(col(row, "uploaded_by")?),
        uploaded_at: col(row, "uploaded_at")?,
    })
}
