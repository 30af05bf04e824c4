//! In-memory document store
//!
//! Each collection is a map behind its own `RwLock`. Listings are returned in
//! creation order so responses are stable across calls.
//!
//! Author: hephaex@gmail.com

use std::collections::HashMap;

use async_trait::async_trait;
use jobboard_core::{
    Admin, AdminStore, Application, ApplicationStore, Company, CompanyStore, Job, JobBoardError,
    JobStore, Result, Student, StudentStore, EMAIL_TAKEN,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store that keeps every collection in process memory
#[derive(Default)]
pub struct MemoryStore {
    admins: RwLock<HashMap<Uuid, Admin>>,
    companies: RwLock<HashMap<Uuid, Company>>,
    students: RwLock<HashMap<Uuid, Student>>,
    jobs: RwLock<HashMap<Uuid, Job>>,
    applications: RwLock<HashMap<Uuid, Application>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted<T: Clone, K: Ord>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn insert_admin(&self, admin: Admin) -> Result<Admin> {
        self.admins.write().await.insert(admin.id, admin.clone());
        Ok(admin)
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<Admin>> {
        Ok(self.admins.read().await.get(&id).cloned())
    }

    async fn find_admin_by_login(&self, admin_name: &str, email: &str) -> Result<Option<Admin>> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .find(|a| a.admin_name == admin_name && a.email == email)
            .cloned())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert_company(&self, company: Company) -> Result<Company> {
        let mut companies = self.companies.write().await;
        if companies.values().any(|c| c.email == company.email) {
            return Err(JobBoardError::Conflict(EMAIL_TAKEN.to_string()));
        }
        companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>> {
        Ok(self.companies.read().await.get(&id).cloned())
    }

    async fn find_company_by_email(&self, email: &str) -> Result<Option<Company>> {
        Ok(self
            .companies
            .read()
            .await
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let companies = self.companies.read().await;
        Ok(sorted(companies.values().cloned(), |c| (c.created_at, c.id)))
    }

    async fn delete_company(&self, id: Uuid) -> Result<Option<Company>> {
        Ok(self.companies.write().await.remove(&id))
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn insert_student(&self, student: Student) -> Result<Student> {
        let mut students = self.students.write().await;
        if students.values().any(|s| s.email == student.email) {
            return Err(JobBoardError::Conflict(EMAIL_TAKEN.to_string()));
        }
        students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>> {
        Ok(self.students.read().await.get(&id).cloned())
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        Ok(self
            .students
            .read()
            .await
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let students = self.students.read().await;
        Ok(sorted(students.values().cloned(), |s| (s.created_at, s.id)))
    }

    async fn delete_student(&self, id: Uuid) -> Result<Option<Student>> {
        Ok(self.students.write().await.remove(&id))
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: Job) -> Result<Job> {
        self.jobs.write().await.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn list_jobs_by_company(&self, company_id: Uuid) -> Result<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(sorted(
            jobs.values().filter(|j| j.created_by == company_id).cloned(),
            |j| (j.created_at, j.id),
        ))
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(sorted(jobs.values().cloned(), |j| (j.created_at, j.id)))
    }

    async fn delete_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.write().await.remove(&id))
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(&self, application: Application) -> Result<Application> {
        self.applications
            .write()
            .await
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn list_applications_by_student(&self, student_id: Uuid) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(sorted(
            applications
                .values()
                .filter(|a| a.created_by == student_id)
                .cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn list_applications_by_company(&self, company_id: Uuid) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(sorted(
            applications
                .values()
                .filter(|a| a.created_for == company_id)
                .cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn list_applications_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(sorted(
            applications.values().filter(|a| a.job_id == job_id).cloned(),
            |a| (a.created_at, a.id),
        ))
    }

    async fn list_applications(&self) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(sorted(applications.values().cloned(), |a| {
            (a.created_at, a.id)
        }))
    }

    async fn delete_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.applications.write().await.remove(&id))
    }
}
