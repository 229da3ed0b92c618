//! Populate a store with a demo team: one manager, four developers, and a
//! month of daily logs with occasional feedback.
//!
//! Reads the same environment as the server (`DATABASE_URL`, ...). Every
//! account uses the password `Demo123!`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use devlog_api::auth::password::hash_password;
use devlog_api::config::Config;
use devlog_api::db::{self, Store};
use devlog_api::models::daily_log::{DailyLog, DailyLogRequest, Task};
use devlog_api::models::feedback::Feedback;
use devlog_api::models::notification::{Notification, NotificationType};
use devlog_api::models::user::{Role, User};

const DEMO_PASSWORD: &str = "Demo123!";
const DAYS: i64 = 30;

const MANAGER: (&str, &str) = ("sarah_manager", "sarah@company.com");
const DEVELOPERS: [(&str, &str); 4] = [
    ("john_dev", "john@company.com"),
    ("alice_dev", "alice@company.com"),
    ("bob_dev", "bob@company.com"),
    ("emma_dev", "emma@company.com"),
];

const TASK_TEMPLATES: [(&str, f64); 15] = [
    ("Implemented authentication system", 3.5),
    ("Fixed bug in user dashboard", 1.5),
    ("Code review for PR #123", 0.5),
    ("Updated API documentation", 2.0),
    ("Optimized database queries", 2.5),
    ("Refactored user interface components", 4.0),
    ("Added unit tests for payment module", 2.0),
    ("Resolved production issue", 1.0),
    ("Implemented new feature: dark mode", 3.0),
    ("Performance optimization", 2.5),
    ("Security audit and fixes", 3.5),
    ("Database migration script", 1.5),
    ("Integration with third-party API", 4.5),
    ("Mobile responsiveness improvements", 2.0),
    ("Error handling improvements", 1.5),
];

const BLOCKERS: [&str; 5] = [
    "Waiting for API documentation from external team",
    "Environment setup issues",
    "Blocked by code review process",
    "Dependency on another team's work",
    "Network connectivity issues",
];

const FEEDBACK: [&str; 8] = [
    "Great work on the authentication system! Very clean implementation.",
    "Good progress today. Please make sure to add more tests for the new features.",
    "Excellent problem-solving on the production issue. Well done!",
    "Thanks for the thorough code review. Your feedback was valuable.",
    "Nice work on the API optimization. The performance improvements are noticeable.",
    "Keep up the good work! Your consistency is impressive.",
    "Good job handling the client requirements. Clear communication!",
    "The documentation updates are very helpful. Thank you!",
];

struct SeedData {
    users: Vec<User>,
    logs: Vec<DailyLog>,
    feedback: Vec<Feedback>,
    notifications: Vec<Notification>,
}

fn new_user(username: &str, email: &str, role: Role, manager_id: Option<Uuid>) -> anyhow::Result<User> {
    Ok(User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        role,
        password_hash: hash_password(DEMO_PASSWORD)?,
        manager_id,
        created_at: Utc::now(),
    })
}

fn random_log(rng: &mut impl Rng, user_id: Uuid, date: chrono::NaiveDate) -> anyhow::Result<DailyLog> {
    let mut tasks = Vec::new();
    for _ in 0..rng.gen_range(2..=5) {
        let (description, base) = TASK_TEMPLATES
            .choose(rng)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no task templates"))?;
        let time_spent = ((base + rng.gen_range(-0.5..1.0)) * 10.0).round() / 10.0;
        tasks.push(Task {
            description: description.to_string(),
            time_spent: time_spent.max(0.5),
            completed: rng.gen_bool(0.75),
        });
    }
    let total_time = (tasks.iter().map(|t| t.time_spent).sum::<f64>() * 10.0).round() / 10.0;

    // Biased towards a good day.
    let mood_weights = WeightedIndex::new([5, 10, 25, 35, 25])?;
    let mood = mood_weights.sample(rng) as i32 + 1;

    let blockers = if rng.gen_bool(0.3) {
        BLOCKERS.choose(rng).map(|b| b.to_string())
    } else {
        None
    };

    Ok(DailyLog::new(
        user_id,
        DailyLogRequest {
            date,
            tasks,
            total_time,
            mood,
            blockers,
        },
    ))
}

fn generate() -> anyhow::Result<SeedData> {
    let mut rng = rand::thread_rng();

    let manager = new_user(MANAGER.0, MANAGER.1, Role::Manager, None)?;
    let mut developers = Vec::with_capacity(DEVELOPERS.len());
    for (username, email) in DEVELOPERS {
        developers.push(new_user(username, email, Role::Developer, Some(manager.id))?);
    }

    let mut logs = Vec::new();
    let mut feedback = Vec::new();
    let mut notifications = Vec::new();
    let today = Utc::now().date_naive();

    for offset in 0..DAYS {
        let date = today - Duration::days(offset);
        for dev in &developers {
            if rng.gen_bool(0.2) {
                continue;
            }
            let log = random_log(&mut rng, dev.id, date)?;

            if rng.gen_bool(0.3) {
                let text = FEEDBACK.choose(&mut rng).copied().unwrap_or(FEEDBACK[0]);
                feedback.push(Feedback::new(log.id, manager.id, text.to_string()));
                let mut n = Notification::new(
                    dev.id,
                    NotificationType::Feedback,
                    format!("New feedback from {} on your {} log", manager.username, date),
                );
                n.read = rng.gen_bool(0.5);
                notifications.push(n);
            }
            logs.push(log);
        }
    }

    let mut users = vec![manager];
    users.extend(developers);
    for user in &users {
        notifications.push(Notification::new(
            user.id,
            NotificationType::Info,
            format!(
                "Welcome to DevLog, {}! Start logging your daily work.",
                user.username
            ),
        ));
    }

    Ok(SeedData {
        users,
        logs,
        feedback,
        notifications,
    })
}

async fn insert(store: &Arc<dyn Store>, data: &SeedData) -> anyhow::Result<()> {
    for user in &data.users {
        store.insert_user(user).await?;
    }
    for log in &data.logs {
        store.insert_log(log).await?;
    }
    for feedback in &data.feedback {
        store.insert_feedback(feedback).await?;
    }
    for notification in &data.notifications {
        store.insert_notification(notification).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devlog_api=info,devlog_seed=info".into()),
        )
        .init();

    let config = Config::from_env();
    let store = db::connect(&config).await?;

    let data = generate()?;
    let result = insert(&store, &data).await;
    store.close().await;
    result?;

    tracing::info!(
        users = data.users.len(),
        logs = data.logs.len(),
        feedback = data.feedback.len(),
        notifications = data.notifications.len(),
        "Sample data created; every account uses password {}",
        DEMO_PASSWORD
    );
    Ok(())
}
