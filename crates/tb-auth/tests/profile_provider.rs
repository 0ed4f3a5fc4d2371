//! Sign-in, sign-out, and session resumption through the local profile provider.

use pretty_assertions::assert_eq;
use tb_auth::{
    AuthError, IdentityProvider, Profile, ProfileProvider, SessionStore, begin_session,
    end_session, resume_session,
};

fn provider(dir: &tempfile::TempDir) -> ProfileProvider {
    ProfileProvider::new(SessionStore::new(dir.path().join("session.json")))
}

#[tokio::test]
async fn sign_in_persists_identity() {
    let tmp = tempfile::TempDir::new().unwrap();
    let provider = provider(&tmp).with_profile(Profile::new(
        "Ada",
        Some("https://example.com/ada.png".into()),
    ));

    let identity = provider.sign_in().await.unwrap();
    assert!(identity.user_id.starts_with("usr-"));
    assert_eq!(identity.display_name, "Ada");

    assert_eq!(provider.current_user().await.unwrap(), Some(identity));
    assert!(provider.session().is_some());
}

#[tokio::test]
async fn user_id_is_stable_across_sign_ins() {
    let tmp = tempfile::TempDir::new().unwrap();
    let provider = provider(&tmp).with_profile(Profile::new("Ada", None));

    let first = provider.sign_in().await.unwrap();
    provider.sign_out().await.unwrap();
    let second = provider.sign_in().await.unwrap();
    assert_eq!(first.user_id, second.user_id);
}

#[tokio::test]
async fn sign_out_clears_current_user() {
    let tmp = tempfile::TempDir::new().unwrap();
    let provider = provider(&tmp).with_profile(Profile::new("Ada", None));

    provider.sign_in().await.unwrap();
    provider.sign_out().await.unwrap();
    assert_eq!(provider.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn non_interactive_without_profile_is_cancelled() {
    let tmp = tempfile::TempDir::new().unwrap();
    let provider = provider(&tmp);

    let err = provider.sign_in().await.unwrap_err();
    assert!(matches!(err, AuthError::Cancelled));
    assert_eq!(provider.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn current_user_rereads_the_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let signer = provider(&tmp).with_profile(Profile::new("Ada", None));
    let reader = provider(&tmp);

    assert_eq!(reader.current_user().await.unwrap(), None);
    let identity = signer.sign_in().await.unwrap();
    assert_eq!(reader.current_user().await.unwrap(), Some(identity));
}

#[tokio::test]
async fn session_helpers_open_and_resume() {
    let tmp = tempfile::TempDir::new().unwrap();
    let provider = provider(&tmp).with_profile(Profile::new("Grace", None));

    assert!(matches!(
        resume_session(&provider).await,
        Err(AuthError::NotAuthenticated)
    ));

    let session = begin_session(&provider).await.unwrap();
    let resumed = resume_session(&provider).await.unwrap();
    assert_eq!(session.owner_id(), resumed.owner_id());
}

#[tokio::test]
async fn end_session_signs_out_and_returns_identity() {
    let tmp = tempfile::TempDir::new().unwrap();
    let provider = provider(&tmp).with_profile(Profile::new("Ada", None));

    let session = begin_session(&provider).await.unwrap();
    let signed_in = session.identity().clone();

    let resumed = resume_session(&provider).await.unwrap();
    assert_eq!(end_session(&provider, resumed).await.unwrap(), signed_in);

    assert_eq!(provider.current_user().await.unwrap(), None);
    assert!(!tmp.path().join("session.json").exists());
    assert!(matches!(
        resume_session(&provider).await,
        Err(AuthError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn corrupt_profiles_file_blocks_sign_in_without_losing_ids() {
    let tmp = tempfile::TempDir::new().unwrap();
    let profiles = tmp.path().join("profiles.json");
    std::fs::write(&profiles, "{\"Ada\": \"usr-000000ad\"").unwrap();
    let provider = provider(&tmp).with_profile(Profile::new("Ada", None));

    let err = provider.sign_in().await.unwrap_err();
    assert!(matches!(err, AuthError::SessionStore(_)));
    assert_eq!(
        std::fs::read_to_string(&profiles).unwrap(),
        "{\"Ada\": \"usr-000000ad\""
    );
    assert_eq!(provider.current_user().await.unwrap(), None);
}
