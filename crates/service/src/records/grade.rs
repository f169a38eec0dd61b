use std::sync::Arc;

use common::pagination::Pagination;
use configs::NotificationPolicy;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::domain::{GradeDetails, GradeFilter, GradePatch, NewGrade, User};
use crate::errors::{map_store_error, ErrorTable, Op, RecordError};
use crate::notify::Notifier;
use crate::storage::{Grades, RecordStore, Users};

pub const STUDENT_MISSING: &str = "Student Does Not Exist";
pub const NOT_A_STUDENT: &str = "Not A Student";
pub const NOTIFICATION_FAILED: &str = "Notification Failed";
pub const NEW_GRADE_SUBJECT: &str = "New Grade";

const TABLE: ErrorTable = ErrorTable {
    entity: "Grade",
    already_exists: "Grade Already Exists",
    references: &[
        ("student_id", STUDENT_MISSING),
        ("semester_id", "Semester Does Not Exist"),
        ("discipline_id", "Discipline Does Not Exist"),
    ],
};

pub fn grade_message(student: &str, value: f64, discipline: &str) -> String {
    format!("Hi {student}, you got a(n) {value} in {discipline}!")
}

/// Grades: the student must exist and hold the STUDENT role; creation notifies the student.
///
/// The role check and the insert are separate store calls with no
/// transaction between them, so a student removed in between is only caught
/// by the store's own foreign key.
///
/// Once the role check passes, the insert, the notification and any rollback
/// run as one spawned task: a caller that stops waiting does not cut it short.
pub struct GradeService<S, N>
where
    S: RecordStore<Grades> + RecordStore<Users>,
    N: Notifier + ?Sized,
{
    store: Arc<S>,
    notifier: Arc<N>,
    policy: NotificationPolicy,
}

impl<S, N> GradeService<S, N>
where
    S: RecordStore<Grades> + RecordStore<Users> + 'static,
    N: Notifier + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, policy: NotificationPolicy) -> Self {
        Self { store, notifier, policy }
    }

    /// Resolve `user_id` to a user holding the STUDENT role.
    pub async fn require_student(&self, user_id: i32) -> Result<User, RecordError> {
        let found = RecordStore::<Users>::find(self.store.as_ref(), user_id)
            .await
            .map_err(|e| map_store_error(&TABLE, Op::Read, e))?;
        match found {
            None => Err(RecordError::RelatedEntityMissing(STUDENT_MISSING.into())),
            Some(user) if !user.is_student() => {
                debug!(user_id, role = ?user.role, "grade target is not a student");
                Err(RecordError::RelatedEntityMissing(NOT_A_STUDENT.into()))
            }
            Some(user) => Ok(user),
        }
    }

    #[instrument(skip(self, data), fields(student_id = data.student_id, semester_id = data.semester_id, discipline_id = data.discipline_id))]
    pub async fn create_one(&self, data: NewGrade) -> Result<GradeDetails, RecordError> {
        let student = self.require_student(data.student_id).await?;
        let creation = GradeCreation { store: self.store.clone(), notifier: self.notifier.clone(), policy: self.policy };
        tokio::spawn(creation.run(student, data).in_current_span())
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "grade creation task died");
                Err(RecordError::internal())
            })
    }

    pub async fn get_all(&self, page: Pagination, filter: GradeFilter) -> Result<Vec<GradeDetails>, RecordError> {
        super::get_all::<Grades, S>(self.store.as_ref(), &TABLE, page, filter).await
    }

    pub async fn get_one(&self, id: i32) -> Result<GradeDetails, RecordError> {
        super::get_one::<Grades, S>(self.store.as_ref(), &TABLE, id).await
    }

    /// The student check only runs when the patch moves the grade to another student.
    #[instrument(skip(self, patch))]
    pub async fn update_one(&self, id: i32, patch: GradePatch) -> Result<GradeDetails, RecordError> {
        if let Some(student_id) = patch.student_id {
            self.require_student(student_id).await?;
        }
        let updated = super::update_one::<Grades, S>(self.store.as_ref(), &TABLE, id, patch).await?;
        info!(grade_id = id, "grade_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: i32) -> Result<(), RecordError> {
        super::delete_one::<Grades, S>(self.store.as_ref(), &TABLE, id).await?;
        info!(grade_id = id, "grade_deleted");
        Ok(())
    }
}

/// Insert, notify, and under [`NotificationPolicy::Required`] roll back.
struct GradeCreation<S, N: ?Sized> {
    store: Arc<S>,
    notifier: Arc<N>,
    policy: NotificationPolicy,
}

impl<S, N> GradeCreation<S, N>
where
    S: RecordStore<Grades>,
    N: Notifier + ?Sized,
{
    async fn run(self, student: User, data: NewGrade) -> Result<GradeDetails, RecordError> {
        let created = super::create_one::<Grades, S>(self.store.as_ref(), &TABLE, data).await?;
        info!(grade_id = created.grade.id, "grade_created");
        self.notify_student(&student, &created).await?;
        Ok(created)
    }

    async fn notify_student(&self, student: &User, created: &GradeDetails) -> Result<(), RecordError> {
        let body = grade_message(&student.name, created.grade.value, &created.discipline.name);
        let Err(e) = self.notifier.send(&student.email, NEW_GRADE_SUBJECT, &body).await else {
            return Ok(());
        };
        match self.policy {
            NotificationPolicy::BestEffort => {
                warn!(grade_id = created.grade.id, error = %e, "grade notification failed; keeping grade");
                Ok(())
            }
            NotificationPolicy::Required => {
                error!(grade_id = created.grade.id, error = %e, "grade notification failed; removing grade");
                if let Err(del) = self.store.delete(created.grade.id).await {
                    error!(grade_id = created.grade.id, error = %del, "could not remove unnotified grade");
                }
                Err(RecordError::Internal(NOTIFICATION_FAILED.into()))
            }
        }
    }
}
