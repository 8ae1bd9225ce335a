//! Integration tests for the Postgres repositories
//!
//! These tests need a database and are ignored by default. Run them with
//! `DATABASE_URL=... cargo test -- --ignored`. Migrations are applied on
//! connect; every test works on freshly provisioned users, so runs do not
//! interfere with each other.

use hackathon_portal_api::domain::content::{Resource, ResourceCategory, ResourceDraft};
use hackathon_portal_api::domain::repositories::{
    ConnectionRepository, ContentRepository, RepoError, SubmissionRepository, TeamRepository,
    UserFilter, UserRepository,
};
use hackathon_portal_api::domain::request::RequestStatus;
use hackathon_portal_api::domain::submission::SubmissionDraft;
use hackathon_portal_api::domain::team::{TeamDraft, TeamInput};
use hackathon_portal_api::domain::user::{
    DevpostUsername, Email, NewUser, ProfileUpdate, RegistrationStage, Role, User,
};
use hackathon_portal_api::infrastructure::repositories::{
    PostgresConnectionRepository, PostgresContentRepository, PostgresSubmissionRepository,
    PostgresTeamRepository, PostgresUserRepository,
};
use sqlx::PgPool;

/// Set up test database connection pool
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Provision a user with an identity unique to this run
async fn create_test_user(repo: &PostgresUserRepository, label: &str) -> User {
    let unique = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    repo.provision(NewUser {
        identity_ref: format!("test|{}|{}", label, unique),
        email: Email::new(format!("{}-{}@example.com", label, unique)).expect("valid email"),
        name: label.to_string(),
        role: Role::User,
    })
    .await
    .expect("Failed to provision user")
}

fn team_draft(name: &str, max_members: i32) -> TeamDraft {
    TeamDraft::new(TeamInput {
        name: name.to_string(),
        description: Some("Integration test team".to_string()),
        project_idea: None,
        max_members: Some(max_members),
    })
    .expect("valid team")
}

#[tokio::test]
#[ignore]
async fn test_user_provision_is_idempotent() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool);

    let user = create_test_user(&users, "provision").await;
    let again = users
        .provision(NewUser {
            identity_ref: user.identity_ref.clone(),
            email: user.email.clone(),
            name: "Other name".to_string(),
            role: Role::Admin,
        })
        .await
        .expect("Failed to provision");

    assert_eq!(again.id, user.id);
    assert_eq!(again.role, Role::User);
    assert_eq!(again.stage, RegistrationStage::Registered);
}

#[tokio::test]
#[ignore]
async fn test_user_update_persists_registration() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool);

    let mut user = create_test_user(&users, "register").await;
    user.complete_registration(
        DevpostUsername::new("pg_tester").expect("valid username"),
        ProfileUpdate {
            skills: Some(vec!["Rust".into(), "SQL".into()]),
            looking_for_team: Some(true),
            ..Default::default()
        },
    )
    .expect("valid registration");
    users
        .save_registration(
            user.id,
            &user.name,
            &user.profile,
            user.devpost_username.as_deref().expect("username set"),
        )
        .await
        .expect("Failed to save registration");

    let found = users
        .find_by_identity(&user.identity_ref)
        .await
        .expect("Failed to query")
        .expect("user exists");
    assert_eq!(found.stage, RegistrationStage::DevpostSubmitted);
    assert_eq!(found.profile.skills, vec!["Rust".to_string(), "SQL".to_string()]);

    let submitted = users
        .list(UserFilter {
            stage: Some(RegistrationStage::DevpostSubmitted),
            looking_for_team: Some(true),
        })
        .await
        .expect("Failed to list");
    assert!(submitted.iter().any(|u| u.id == user.id));
}

#[tokio::test]
#[ignore]
async fn test_stale_profile_write_keeps_stage() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool);

    let user = create_test_user(&users, "stale").await;
    users
        .save_registration(user.id, &user.name, &user.profile, "stale_dev")
        .await
        .expect("Failed to save registration");

    let mut stale = users
        .find_by_id(user.id)
        .await
        .expect("Failed to query")
        .expect("user exists");
    users
        .transition_stage(
            user.id,
            RegistrationStage::DevpostSubmitted,
            RegistrationStage::DevpostConfirmed,
        )
        .await
        .expect("Failed to confirm");

    stale.profile.bio = Some("Written from an old copy".into());
    let saved = users
        .update_profile(user.id, &stale.name, &stale.profile)
        .await
        .expect("Failed to update profile");
    assert_eq!(saved.stage, RegistrationStage::DevpostConfirmed);
    assert!(saved.devpost_verified);

    // The same stale copy cannot move the stage either
    let replay = users
        .transition_stage(
            user.id,
            RegistrationStage::DevpostSubmitted,
            RegistrationStage::DevpostConfirmed,
        )
        .await;
    assert!(matches!(replay, Err(RepoError::Conflict(_))));

    let promoted = users.set_role(user.id, Role::Admin).await.expect("Failed to set role");
    assert_eq!(promoted.role, Role::Admin);
    assert_eq!(promoted.stage, RegistrationStage::DevpostConfirmed);
}

#[tokio::test]
#[ignore]
async fn test_team_create_adds_leader_and_enforces_one_team() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool);

    let leader = create_test_user(&users, "leader").await;
    let team = teams
        .create_with_leader(team_draft("PG Crabs", 4), leader.id)
        .await
        .expect("Failed to create team");

    let members = teams.members(team.id()).await.expect("Failed to list members");
    assert_eq!(members.len(), 1);
    assert!(members[0].is_leader());

    let err = teams
        .create_with_leader(team_draft("PG Crabs II", 4), leader.id)
        .await
        .expect_err("second team must fail");
    assert!(matches!(err, RepoError::Conflict(_)));

    assert!(teams.delete(team.id()).await.expect("Failed to delete"));
}

#[tokio::test]
#[ignore]
async fn test_invitation_accept_is_single_shot() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool);

    let leader = create_test_user(&users, "inv-leader").await;
    let invitee = create_test_user(&users, "inv-member").await;
    let team = teams
        .create_with_leader(team_draft("PG Invites", 2), leader.id)
        .await
        .expect("Failed to create team");

    let invitation = teams
        .create_invitation(team.id(), leader.id, invitee.id)
        .await
        .expect("Failed to invite");
    let duplicate = teams.create_invitation(team.id(), leader.id, invitee.id).await;
    assert!(matches!(duplicate, Err(RepoError::Conflict(_))));

    let accepted = teams
        .accept_invitation(invitation.id)
        .await
        .expect("Failed to accept");
    assert_eq!(accepted.status, RequestStatus::Accepted);

    let second = teams.accept_invitation(invitation.id).await;
    assert!(matches!(second, Err(RepoError::Conflict(_))));
    assert_eq!(teams.members(team.id()).await.expect("members").len(), 2);

    assert!(teams.delete(team.id()).await.expect("Failed to delete"));
}

#[tokio::test]
#[ignore]
async fn test_connection_respond_once() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());
    let connections = PostgresConnectionRepository::new(pool);

    let sender = create_test_user(&users, "sender").await;
    let receiver = create_test_user(&users, "receiver").await;

    let request = connections
        .create(sender.id, receiver.id, Some("Hi".into()))
        .await
        .expect("Failed to create request");
    let reverse = connections.create(receiver.id, sender.id, None).await;
    assert!(matches!(reverse, Err(RepoError::Conflict(_))));

    connections
        .respond(request.id, RequestStatus::Accepted)
        .await
        .expect("Failed to respond");
    let again = connections.respond(request.id, RequestStatus::Declined).await;
    assert!(matches!(again, Err(RepoError::Conflict(_))));

    let accepted = connections.list_accepted(sender.id).await.expect("list");
    assert!(accepted.iter().any(|r| r.id == request.id));

    let reconnect = connections.create(sender.id, receiver.id, None).await;
    assert!(matches!(reconnect, Err(RepoError::Conflict(_))));
}

#[tokio::test]
#[ignore]
async fn test_resource_crud() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());
    let content = PostgresContentRepository::new(pool);
    let author = create_test_user(&users, "author").await;

    let draft = ResourceDraft {
        title: "Rust Book".into(),
        description: None,
        url: "https://doc.rust-lang.org/book/".into(),
        category: ResourceCategory::Documentation,
    };
    let created = ContentRepository::<Resource>::create(&content, draft.clone(), author.id)
        .await
        .expect("Failed to create resource");

    let renamed = ResourceDraft {
        title: "The Book".into(),
        ..draft
    };
    let updated = ContentRepository::<Resource>::update(&content, created.id, renamed)
        .await
        .expect("Failed to update");
    assert_eq!(updated.expect("resource exists").title, "The Book");

    let deleted =
        ContentRepository::<Resource>::delete(&content, created.id).await.expect("delete");
    assert!(deleted);
}

#[tokio::test]
#[ignore]
async fn test_submission_upsert_replaces() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let submissions = PostgresSubmissionRepository::new(pool);

    let leader = create_test_user(&users, "submitter").await;
    let team = teams
        .create_with_leader(team_draft("PG Submit", 4), leader.id)
        .await
        .expect("Failed to create team");

    let draft = SubmissionDraft {
        project_name: "First".into(),
        description: None,
        devpost_url: "https://devpost.com/software/first".into(),
        repository_url: None,
        demo_url: None,
    };
    let first = submissions
        .upsert(team.id(), draft.clone(), leader.id)
        .await
        .expect("Failed to submit");
    let second = submissions
        .upsert(
            team.id(),
            SubmissionDraft {
                project_name: "Second".into(),
                ..draft
            },
            leader.id,
        )
        .await
        .expect("Failed to resubmit");

    assert_eq!(first.id, second.id);
    assert_eq!(second.project_name, "Second");

    assert!(teams.delete(team.id()).await.expect("Failed to delete"));
    assert!(submissions
        .find_by_team(team.id())
        .await
        .expect("query")
        .is_none());
}
