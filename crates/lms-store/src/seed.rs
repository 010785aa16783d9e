//! Default rows for a fresh store.

use lms_core::{Question, Role, User, UserId};

use crate::accessor::TableStore;
use crate::error::Result;

/// Email of the owner account created in an empty store.
pub const DEFAULT_OWNER_EMAIL: &str = "admin@einstein360.com";

/// Password of the owner account created in an empty store.
pub const DEFAULT_OWNER_PASSWORD: &str = "admin123";

const DEFAULT_OWNER_ID: &str = "USR-owner001";

const SAMPLE_QUESTIONS: &[(&str, &str, &str)] = &[
    ("1", "Programming Basics", "Explain the concept of variables in programming."),
    ("1", "Programming Basics", "What is the difference between a function and a method?"),
    ("2", "Data Structures", "Describe the difference between arrays and linked lists."),
    ("2", "Data Structures", "What is a hash table and when would you use it?"),
    ("3", "Algorithms", "Explain the concept of Big O notation."),
];

/// What [`seed_defaults`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Whether the default owner was created.
    pub owner: bool,
    /// Number of sample questions inserted.
    pub questions: usize,
}

/// Insert the default owner into an empty `Users` table and the sample
/// questions into an empty `Questions` table.
///
/// Tables that already hold data rows are left alone, so calling this on
/// every start is safe.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn seed_defaults(store: &TableStore) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let users = store.table_of::<User>().await?;
    if users.read_all().await?.len() <= 1 {
        let mut owner = User::new(
            "Admin Owner",
            DEFAULT_OWNER_EMAIL,
            DEFAULT_OWNER_PASSWORD,
            Role::Owner,
        );
        owner.id = UserId::from(DEFAULT_OWNER_ID);
        users.insert(&owner).await?;
        report.owner = true;
        tracing::info!(email = DEFAULT_OWNER_EMAIL, "Seeded default owner");
    }

    let questions = store.table_of::<Question>().await?;
    if questions.read_all().await?.len() <= 1 {
        for (module_id, module_name, text) in SAMPLE_QUESTIONS {
            questions
                .insert(&Question::new(*module_id, *module_name, *text))
                .await?;
            report.questions += 1;
        }
        tracing::info!(count = report.questions, "Seeded sample questions");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::queries;

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let store = TableStore::new(MemoryBackend::new());

        let first = seed_defaults(&store).await.unwrap();
        assert!(first.owner);
        assert_eq!(first.questions, 5);

        let second = seed_defaults(&store).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let owner = queries::find_user_by_email(&store, DEFAULT_OWNER_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.record.id.as_str(), "USR-owner001");
        assert_eq!(owner.record.role, Role::Owner);
        assert_eq!(queries::all_questions(&store).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn existing_users_are_kept() {
        let store = TableStore::new(MemoryBackend::new());
        let users = store.table_of::<User>().await.unwrap();
        users
            .insert(&User::new("Tom", "tom@example.com", "pw", Role::Trainer))
            .await
            .unwrap();

        let report = seed_defaults(&store).await.unwrap();
        assert!(!report.owner);
        assert!(!queries::email_registered(&store, DEFAULT_OWNER_EMAIL)
            .await
            .unwrap());
    }
}
