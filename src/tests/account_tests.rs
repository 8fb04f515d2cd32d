use super::open_institute;
use crate::GurukulError;
use crate::models::Role;

#[tokio::test]
async fn register_then_authenticate() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    let account = institute
        .register_account("asha", "hunter2", Role::User)
        .await
        .unwrap();
    assert_eq!(account.role, Role::User);
    // the stored value is a hash, never the password itself
    assert_ne!(account.password_hash, "hunter2");

    let authed = institute.authenticate("asha", "hunter2").await.unwrap();
    assert_eq!(authed.id, account.id);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    institute
        .register_account("asha", "hunter2", Role::Admin)
        .await
        .unwrap();

    assert!(matches!(
        institute.authenticate("asha", "wrong").await.unwrap_err(),
        GurukulError::InvalidCredentials
    ));
    assert!(matches!(
        institute.authenticate("nobody", "hunter2").await.unwrap_err(),
        GurukulError::InvalidCredentials
    ));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let institute = open_institute(dir.path()).await;

    institute
        .register_account("asha", "hunter2", Role::User)
        .await
        .unwrap();
    let err = institute
        .register_account("asha", "other", Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, GurukulError::UsernameTaken(name) if name == "asha"));
}

#[tokio::test]
async fn accounts_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let institute = open_institute(dir.path()).await;
        institute
            .register_account("asha", "hunter2", Role::Admin)
            .await
            .unwrap();
    }

    let institute = open_institute(dir.path()).await;
    let account = institute.authenticate("asha", "hunter2").await.unwrap();
    assert_eq!(account.role, Role::Admin);
}
