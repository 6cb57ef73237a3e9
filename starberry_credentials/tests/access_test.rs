use std::sync::Arc;

use serde_json::{json, Map, Value};
use starberry_credentials::{
    resolve_credential_field, CredentialCollection, CredentialPolicy, CredentialRecord,
    CredentialRegistry, OwnerOrAdmin, PermissionError, Provider, UserRecord, Viewer,
};
use starberry_schema::{ResolveContext, ResolveError};

fn alice() -> UserRecord {
    let credentials = CredentialCollection::new()
        .with(
            Provider::Github,
            CredentialRecord::new("42", "gh-token")
                .with_display_name("Alice")
                .with_username("alice"),
        )
        .with(
            Provider::Twitter,
            CredentialRecord::new("7", "tw-token")
                .with_access_token_secret("tw-secret")
                .with_picture("http://pbs.twimg.com/profile_images/1/avatar_normal.png"),
        );
    UserRecord::new("user-alice", credentials)
}

#[test]
fn test_owner_can_read_own_credentials() {
    let user = alice();
    let record = resolve_credential_field(&user, &Viewer::user("user-alice"), Provider::Github, &OwnerOrAdmin)
        .unwrap()
        .unwrap();
    assert_eq!(record.access_token(), "gh-token");
    assert_eq!(record.username(), Some("alice"));
}

#[test]
fn test_missing_provider_record_is_none() {
    let user = alice();
    let record = resolve_credential_field(&user, &Viewer::user("user-alice"), Provider::Google, &OwnerOrAdmin).unwrap();
    assert!(record.is_none());
}

#[test]
fn test_other_users_are_denied_every_provider() {
    let user = alice();
    for viewer in [Viewer::user("user-bob"), Viewer::anonymous()] {
        for provider in Provider::ALL {
            let err = resolve_credential_field(&user, &viewer, provider, &OwnerOrAdmin).unwrap_err();
            assert_eq!(err, PermissionError::new(format!("credentials.{}", provider.key())));
            assert!(err.to_string().contains(&provider.field_path()));
        }
    }
}

#[test]
fn test_admin_reads_regardless_of_user_id() {
    let user = alice();
    let viewers = [
        Viewer::admin(),
        Viewer { is_admin: true, user_id: Some("user-bob".to_string()) },
    ];
    for viewer in viewers {
        for provider in Provider::ALL {
            assert!(resolve_credential_field(&user, &viewer, provider, &OwnerOrAdmin).is_ok());
        }
    }
}

#[test]
fn test_collection_resolvers_enforce_policy() {
    let registry = CredentialRegistry::new();
    let collection = registry.collection_type().type_definition;
    let parent = alice().credentials_value();
    let none = Map::new();

    let own = ResolveContext::new(Viewer::user("user-alice"));
    let github = collection.resolve_field("github", &parent, &none, &own).unwrap();
    assert_eq!(github["accessToken"], json!("gh-token"));
    assert_eq!(collection.resolve_field("auth0", &parent, &none, &own).unwrap(), Value::Null);

    let other = ResolveContext::new(Viewer::user("user-bob"));
    let err = collection.resolve_field("twitter", &parent, &none, &other).unwrap_err();
    assert_eq!(err, ResolveError::Permission(PermissionError::new("credentials.twitter")));

    // Without an owner only admins get through.
    let orphan = json!({ "github": { "accessToken": "x", "id": "1" } });
    assert!(collection.resolve_field("github", &orphan, &none, &own).is_err());
    let admin = ResolveContext::new(Viewer::admin());
    assert!(collection.resolve_field("github", &orphan, &none, &admin).is_ok());
}

#[test]
fn test_nested_picture_after_permission_check() {
    let registry = CredentialRegistry::new();
    let collection = registry.collection_type().type_definition;
    let twitter_type = registry.provider_type(Provider::Twitter).type_definition;
    let ctx = ResolveContext::new(Viewer::user("user-alice"));

    let record = collection
        .resolve_field("twitter", &alice().credentials_value(), &Map::new(), &ctx)
        .unwrap();
    let mut args = Map::new();
    args.insert("size".to_string(), json!("mini"));
    let picture = twitter_type.resolve_field("picture", &record, &args, &ctx).unwrap();
    assert_eq!(picture, json!("http://pbs.twimg.com/profile_images/1/avatar_mini.png"));
    assert_eq!(
        twitter_type.resolve_field("accessTokenSecret", &record, &Map::new(), &ctx).unwrap(),
        json!("tw-secret")
    );
}

struct AdminsOnly;

impl CredentialPolicy for AdminsOnly {
    fn allows(&self, viewer: &Viewer, _owner_id: Option<&str>) -> bool {
        viewer.is_admin
    }
}

#[test]
fn test_custom_policy() {
    let registry = CredentialRegistry::new().policy(Arc::new(AdminsOnly));
    let user = alice();
    assert!(registry.resolve(&user, &Viewer::user("user-alice"), Provider::Github).is_err());
    assert!(registry.resolve(&user, &Viewer::admin(), Provider::Github).is_ok());

    let collection = registry.collection_type().type_definition;
    let ctx = ResolveContext::new(Viewer::user("user-alice"));
    assert!(collection
        .resolve_field("github", &user.credentials_value(), &Map::new(), &ctx)
        .is_err());
}

#[test]
fn test_user_record_round_trips_through_json() {
    let user: UserRecord = serde_json::from_value(json!({
        "id": "user-carol",
        "credentials": {
            "google": {
                "accessToken": "g-token",
                "id": "g-1",
                "email": "carol@example.com",
                "picture": "https://lh3.googleusercontent.com/a/photo?sz=50"
            }
        }
    }))
    .unwrap();
    assert_eq!(user.node_id, "user-carol");
    let google = user.credentials.get(Provider::Google).unwrap();
    assert_eq!(google.email(), Some("carol@example.com"));
    assert_eq!(user.credentials.providers().collect::<Vec<_>>(), [Provider::Google]);

    let value = user.credentials_value();
    assert_eq!(value["__node"]["id"], json!("user-carol"));
    assert_eq!(value["google"]["accessToken"], json!("g-token"));
}

#[tokio::test]
async fn test_concurrent_reads_share_registry() {
    let registry = Arc::new(CredentialRegistry::new());
    let user = Arc::new(alice());

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = registry.clone();
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            let viewer = if i % 2 == 0 { Viewer::user("user-alice") } else { Viewer::user("user-bob") };
            (i, registry.resolve(&user, &viewer, Provider::Github).is_ok())
        }));
    }
    for handle in handles {
        let (i, allowed) = handle.await.unwrap();
        assert_eq!(allowed, i % 2 == 0);
    }
}

#[test]
fn test_numeric_owner_id_matches_viewer() {
    let collection = CredentialRegistry::new().collection_type().type_definition;
    let parent = json!({
        "__node": { "id": 42 },
        "github": { "accessToken": "gh-token", "id": "1" }
    });
    let none = Map::new();

    let owner = ResolveContext::new(Viewer::user("42"));
    let record = collection.resolve_field("github", &parent, &none, &owner).unwrap();
    assert_eq!(record["accessToken"], json!("gh-token"));

    let other = ResolveContext::new(Viewer::user("43"));
    assert!(collection.resolve_field("github", &parent, &none, &other).is_err());

    // Only strings and numbers name an owner.
    let odd = json!({ "__node": { "id": true }, "github": { "accessToken": "x", "id": "1" } });
    assert!(collection.resolve_field("github", &odd, &none, &ResolveContext::new(Viewer::user("true"))).is_err());
}

#[test]
fn test_record_value_matches_serialized_form() {
    let record = CredentialRecord::new("7", "tw-token")
        .with_display_name("Alice")
        .with_access_token_secret("tw-secret");
    assert_eq!(record.to_value(), serde_json::to_value(&record).unwrap());
    assert_eq!(
        record.to_value(),
        json!({
            "accessToken": "tw-token",
            "id": "7",
            "displayName": "Alice",
            "accessTokenSecret": "tw-secret"
        })
    );
    assert_eq!(alice().credentials_value()["twitter"], alice().credentials.get(Provider::Twitter).unwrap().to_value());
}
