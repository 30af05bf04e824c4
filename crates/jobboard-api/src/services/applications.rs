//! Job applications
//!
//! Author: hephaex@gmail.com

use std::collections::HashMap;

use chrono::Utc;
use futures::try_join;
use jobboard_core::{parse_record_id, Application, ApplicationDetails, DocumentStore};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::requests::ApplyJobRequest;
use crate::validation;

pub struct ApplicationService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ApplicationService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Apply `student_id` to the job named by `raw_job_id`
    ///
    /// Checks run in order: id syntax, job existence, duplicate application,
    /// then the request fields. The company reference is taken from the job.
    ///
    /// The duplicate check and the insert are separate store calls, so two
    /// concurrent submissions for the same job can both pass the check.
    pub async fn apply(
        &self,
        student_id: Uuid,
        raw_job_id: &str,
        request: ApplyJobRequest,
    ) -> Result<ApplicationDetails, AppError> {
        let job_id = parse_record_id(raw_job_id, "Job")?;

        let job = self.store.find_job(job_id).await?.ok_or_else(|| {
            AppError::NotFound("No Job found against the specified Job id".to_string())
        })?;

        let existing = self.store.list_applications_by_student(student_id).await?;
        if existing.iter().any(|a| a.job_id == job.id) {
            return Err(AppError::Conflict(
                "You Already have applied to this Job".to_string(),
            ));
        }

        let form = validation::job_application(request)?;

        let student = self
            .store
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No student found!".to_string()))?;

        let now = Utc::now();
        let application = self
            .store
            .insert_application(Application {
                id: Uuid::new_v4(),
                total_experience: form.total_experience,
                area_of_interest: form.area_of_interest,
                experience_in_specified_field: form.experience_in_specified_field,
                is_fresh_graduate: form.is_fresh_graduate,
                certifications: form.certifications,
                job_id: job.id,
                created_for: job.created_by,
                created_by: student.id,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            application_id = %application.id,
            job_id = %job.id,
            student_id = %student.id,
            "Job application created"
        );

        Ok(ApplicationDetails {
            application,
            student: Some(student.to_public()),
            company: None,
        })
    }

    /// Applications received by a company's jobs
    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Application>, AppError> {
        Ok(self.store.list_applications_by_company(company_id).await?)
    }

    /// Applications submitted by a student
    pub async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Application>, AppError> {
        Ok(self.store.list_applications_by_student(student_id).await?)
    }

    /// Every application joined with the student and company it references
    ///
    /// References to records that no longer exist are left empty.
    pub async fn list_all_detailed(&self) -> Result<Vec<ApplicationDetails>, AppError> {
        let (applications, students, companies) = try_join!(
            self.store.list_applications(),
            self.store.list_students(),
            self.store.list_companies()
        )?;

        let students: HashMap<_, _> = students.into_iter().map(|s| (s.id, s)).collect();
        let companies: HashMap<_, _> = companies.into_iter().map(|c| (c.id, c)).collect();

        Ok(applications
            .into_iter()
            .map(|application| ApplicationDetails {
                student: students.get(&application.created_by).map(|s| s.to_public()),
                company: companies.get(&application.created_for).map(|c| c.to_public()),
                application,
            })
            .collect())
    }

    pub async fn delete_applications_for_job(&self, job_id: Uuid) -> Result<usize, AppError> {
        let applications = self.store.list_applications_by_job(job_id).await?;
        self.delete_all(applications).await
    }

    pub async fn delete_applications_for_student(&self, student_id: Uuid) -> Result<usize, AppError> {
        let applications = self.store.list_applications_by_student(student_id).await?;
        self.delete_all(applications).await
    }

    async fn delete_all(&self, applications: Vec<Application>) -> Result<usize, AppError> {
        let mut removed = 0;
        for application in applications {
            if self.store.delete_application(application.id).await?.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_core::{ApplicationStore, Company, CompanyStore, Job, JobStore, Student, StudentStore};
    use jobboard_store::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        company: Company,
        student: Student,
        jobs: Vec<Job>,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let now = Utc::now();

        let company = store
            .insert_company(Company {
                id: Uuid::new_v4(),
                company_name: "Acme".to_string(),
                email: "a@b.com".to_string(),
                password_hash: "hash".to_string(),
                business_phone_number: 555,
                business_details: "d".to_string(),
                company_address: "a".to_string(),
                city: "c".to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let student = store
            .insert_student(Student {
                id: Uuid::new_v4(),
                student_name: "Sam".to_string(),
                father_name: "Pat".to_string(),
                email: "s@b.com".to_string(),
                password_hash: "hash".to_string(),
                college_name: "Uni".to_string(),
                majors: vec!["CS".to_string()],
                gender: "x".to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let mut jobs = Vec::new();
        for position in ["Engineer", "Designer"] {
            let job = Job::new(position.to_string(), "2 years".to_string(), company.id);
            jobs.push(store.insert_job(job).await.unwrap());
        }

        Fixture {
            store,
            company,
            student,
            jobs,
        }
    }

    fn request(total: &str) -> ApplyJobRequest {
        ApplyJobRequest {
            total_experience: Some(total.to_string()),
            experience_in_specified_field: Some("1 year".to_string()),
            area_of_interest: Some(vec!["backend".to_string()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_apply_then_duplicate_then_other_job() {
        let fx = fixture().await;
        let service = ApplicationService::new(&fx.store);
        let j1 = fx.jobs[0].id.to_string();
        let j2 = fx.jobs[1].id.to_string();

        let first = service.apply(fx.student.id, &j1, request("2 years")).await.unwrap();
        assert_eq!(first.application.created_for, fx.company.id);
        assert_eq!(first.application.created_by, fx.student.id);
        assert_eq!(first.application.experience_in_specified_field, "1 year");
        assert_eq!(
            first.student.as_ref().map(|s| s.email.as_str()),
            Some("s@b.com")
        );

        // Field values on the second attempt do not matter
        let err = service
            .apply(fx.student.id, &j1, ApplyJobRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "You Already have applied to this Job"));

        service.apply(fx.student.id, &j2, request("3 years")).await.unwrap();
        assert_eq!(service.list_for_student(fx.student.id).await.unwrap().len(), 2);
        assert_eq!(service.list_for_company(fx.company.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_apply_to_unknown_job() {
        let fx = fixture().await;
        let service = ApplicationService::new(&fx.store);

        let err = service
            .apply(fx.student.id, "zzz", request("2 years"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));

        let err = service
            .apply(fx.student.id, &Uuid::new_v4().to_string(), request("2 years"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_requires_fields() {
        let fx = fixture().await;
        let service = ApplicationService::new(&fx.store);

        let err = service
            .apply(
                fx.student.id,
                &fx.jobs[0].id.to_string(),
                ApplyJobRequest {
                    total_experience: Some("2 years".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Please fill the required fields"));
        assert!(fx.store.list_applications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_detailed_joins_identities() {
        let fx = fixture().await;
        let service = ApplicationService::new(&fx.store);
        service
            .apply(fx.student.id, &fx.jobs[0].id.to_string(), request("2 years"))
            .await
            .unwrap();

        let details = service.list_all_detailed().await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(
            details[0].company.as_ref().map(|c| c.company_name.as_str()),
            Some("Acme")
        );
        assert!(details[0].student.is_some());
    }

    #[tokio::test]
    async fn test_delete_applications_for_student() {
        let fx = fixture().await;
        let service = ApplicationService::new(&fx.store);
        for job in &fx.jobs {
            service
                .apply(fx.student.id, &job.id.to_string(), request("2 years"))
                .await
                .unwrap();
        }

        assert_eq!(
            service
                .delete_applications_for_student(fx.student.id)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            service
                .delete_applications_for_student(fx.student.id)
                .await
                .unwrap(),
            0
        );
    }
}
