//! Job postings: creation, listings and deletion with cascades
//!
//! Author: hephaex@gmail.com

use std::collections::HashMap;

use futures::try_join;
use jobboard_core::{parse_record_id, CompanyJobs, DocumentStore, Job, JobWithCompany};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::requests::CreateJobRequest;
use crate::services::applications::ApplicationService;
use crate::validation;

/// Number of dependents removed by a cascading delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeCounts {
    pub jobs: usize,
    pub applications: usize,
}

pub struct JobService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> JobService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Post a job owned by `company_id`
    ///
    /// The owner always comes from the authenticated principal, never the body.
    pub async fn create_job(
        &self,
        company_id: Uuid,
        request: CreateJobRequest,
    ) -> Result<JobWithCompany, AppError> {
        let form = validation::new_job(request)?;

        let company = self
            .store
            .find_company(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No company found!".to_string()))?;

        let job = self
            .store
            .insert_job(Job::new(
                form.required_position,
                form.required_experience,
                company.id,
            ))
            .await?;

        info!(job_id = %job.id, company_id = %company.id, "Job created");

        Ok(JobWithCompany {
            job,
            company: company.to_public(),
        })
    }

    pub async fn list_jobs_by_creator(&self, company_id: Uuid) -> Result<Vec<Job>, AppError> {
        Ok(self.store.list_jobs_by_company(company_id).await?)
    }

    /// Every job, grouped under its owning company
    ///
    /// Companies without jobs are left out. Groups follow company creation order.
    pub async fn list_all_grouped_by_company(&self) -> Result<Vec<CompanyJobs>, AppError> {
        let (companies, jobs) = try_join!(self.store.list_companies(), self.store.list_jobs())?;

        let mut by_company: HashMap<Uuid, Vec<Job>> = HashMap::new();
        for job in jobs {
            by_company.entry(job.created_by).or_default().push(job);
        }

        let grouped = companies
            .into_iter()
            .filter_map(|company| {
                by_company.remove(&company.id).map(|jobs| CompanyJobs {
                    company_id: company.id,
                    company_name: company.company_name,
                    total_jobs: jobs,
                })
            })
            .collect();

        Ok(grouped)
    }

    /// Delete a job and the applications made to it
    pub async fn delete_job(&self, raw_id: &str) -> Result<(Job, CascadeCounts), AppError> {
        let job_id = parse_record_id(raw_id, "Job")?;

        if self.store.find_job(job_id).await?.is_none() {
            return Err(not_found_job());
        }

        let applications = ApplicationService::new(self.store)
            .delete_applications_for_job(job_id)
            .await?;

        // A concurrent delete may have won the race since the lookup above
        let job = self
            .store
            .delete_job(job_id)
            .await?
            .ok_or_else(not_found_job)?;

        Ok((
            job,
            CascadeCounts {
                jobs: 1,
                applications,
            },
        ))
    }

    /// Delete every job owned by a company, applications first
    ///
    /// Not atomic: a failure part way leaves the remaining jobs in place and
    /// calling again finishes the work.
    pub async fn delete_jobs_for_company(&self, company_id: Uuid) -> Result<CascadeCounts, AppError> {
        let jobs = self.store.list_jobs_by_company(company_id).await?;
        let applications = ApplicationService::new(self.store);

        let mut counts = CascadeCounts::default();
        for job in jobs {
            counts.applications += applications.delete_applications_for_job(job.id).await?;
            if self.store.delete_job(job.id).await?.is_some() {
                counts.jobs += 1;
            }
        }

        debug!(
            company_id = %company_id,
            jobs = counts.jobs,
            applications = counts.applications,
            "Removed company jobs"
        );
        Ok(counts)
    }
}

fn not_found_job() -> AppError {
    AppError::NotFound("No Job find against the given Job ID".to_string())
}
