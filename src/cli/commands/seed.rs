use anyhow::Context;
use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::event::{EVENT_COMPLETED, EVENT_UPCOMING};
use crate::database::models::{NewEvent, NewJob, NewUser, ProfileFields, UserChanges};
use crate::database::DatabaseManager;
use crate::services::{EventService, JobService, ProfileService, UserService};
use crate::types::UserRole;

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub users_created: u32,
    pub jobs_created: u32,
    pub events_created: u32,
}

struct DemoAccount {
    clerk_user_id: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: UserRole,
    approved: bool,
    profile: ProfileFields,
}

fn demo_accounts() -> Vec<DemoAccount> {
    vec![
        DemoAccount {
            clerk_user_id: "user_tpo_123",
            email: "tpo@example.com",
            first_name: "TPO",
            last_name: "Officer",
            role: UserRole::Tpo,
            approved: true,
            profile: ProfileFields {
                phone: Some("1234567890".into()),
                about: Some("Head of Placement Cell".into()),
                ..Default::default()
            },
        },
        // Left unapproved so the TPO review queue has an entry
        DemoAccount {
            clerk_user_id: "user_student_456",
            email: "student@example.com",
            first_name: "John",
            last_name: "Doe",
            role: UserRole::Student,
            approved: false,
            profile: ProfileFields {
                degree: Some("B.Tech".into()),
                year: Some("2025".into()),
                skills: Some("Python, React, SQL".into()),
                about: Some("Aspiring Software Engineer".into()),
                ..Default::default()
            },
        },
    ]
}

async fn seed_accounts(pool: &PgPool, report: &mut SeedReport) -> anyhow::Result<Option<i64>> {
    let users = UserService::new(pool.clone());
    let profiles = ProfileService::new(pool.clone());
    let mut tpo_id = None;

    for account in demo_accounts() {
        let user = match users.find_by_email(account.email).await? {
            Some(existing) => existing,
            None => {
                let created = users
                    .create(NewUser {
                        clerk_user_id: account.clerk_user_id.to_string(),
                        email: account.email.to_string(),
                        first_name: account.first_name.to_string(),
                        last_name: account.last_name.to_string(),
                        phone_number: None,
                        role: account.role,
                        hashed_password: None,
                        is_approved: account.approved,
                    })
                    .await?;
                let changes = UserChanges {
                    profile_complete: Some(true),
                    ..Default::default()
                };
                report.users_created += 1;
                users.update(created.id, &changes).await?
            }
        };

        if profiles.find(user.id).await?.is_none() {
            profiles.upsert(user.id, &account.profile).await?;
        }
        if user.role == UserRole::Tpo {
            tpo_id = Some(user.id);
        }
    }

    Ok(tpo_id)
}

async fn seed_jobs(pool: &PgPool, created_by: Option<i64>, report: &mut SeedReport) -> anyhow::Result<()> {
    let jobs = JobService::new(pool.clone());
    if !jobs.list(0, 1).await?.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let demo = [
        NewJob {
            title: "Software Engineer Intern".into(),
            company: "TechCorp".into(),
            location: "Bangalore".into(),
            description: "Work on cutting-edge web technologies.".into(),
            requirements: "React, Node.js, Python".into(),
            salary_range: Some("20k-30k/month".into()),
            job_type: Some("Internship".into()),
            application_deadline: Some(now + Duration::days(30)),
            created_by,
        },
        NewJob {
            title: "Data Analyst".into(),
            company: "DataWiz".into(),
            location: "Remote".into(),
            description: "Analyze data trends and create reports.".into(),
            requirements: "SQL, Python, Tableau".into(),
            salary_range: Some("6-8 LPA".into()),
            job_type: Some("Full-time".into()),
            application_deadline: Some(now + Duration::days(15)),
            created_by,
        },
    ];

    for job in &demo {
        jobs.create(job).await?;
        report.jobs_created += 1;
    }
    Ok(())
}

async fn seed_events(pool: &PgPool, created_by: Option<i64>, report: &mut SeedReport) -> anyhow::Result<()> {
    let events = EventService::new(pool.clone());
    if !events.list(None, 0, 1).await?.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let demo = [
        NewEvent {
            title: "Resume Building Workshop".into(),
            description: Some("Learn how to craft a winning resume.".into()),
            location: Some("Seminar Hall 1".into()),
            event_date: Some(now + Duration::days(5)),
            event_time: Some("10:00 AM".into()),
            event_type: Some("Workshop".into()),
            form_url: None,
            status: Some(EVENT_UPCOMING.into()),
            max_participants: None,
            created_by,
        },
        NewEvent {
            title: "Mock Interview Session".into(),
            description: Some("Practice interviews with alumni.".into()),
            location: Some("Online".into()),
            event_date: Some(now - Duration::days(2)),
            event_time: Some("2:00 PM".into()),
            event_type: Some("Interview".into()),
            form_url: None,
            status: Some(EVENT_COMPLETED.into()),
            max_participants: None,
            created_by,
        },
    ];

    for event in &demo {
        events.create(event).await?;
        report.events_created += 1;
    }
    Ok(())
}

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    DatabaseManager::migrate(&pool).await.context("failed to apply migrations")?;

    let mut report = SeedReport::default();
    let tpo_id = seed_accounts(&pool, &mut report).await.context("failed to seed users")?;
    seed_jobs(&pool, tpo_id, &mut report).await.context("failed to seed jobs")?;
    seed_events(&pool, tpo_id, &mut report).await.context("failed to seed events")?;

    tracing::info!("Seed finished: {:?}", report);
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Text => println!(
            "Seeded {} users, {} jobs, {} events",
            report.users_created, report.jobs_created, report.events_created
        ),
    }
    Ok(())
}
