use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use starberry_graph::credentials::{CredentialCollection, CredentialRecord};
use starberry_graph::schema::{
    FieldDefinition, FieldKind, ResolveContext, ResolveError, TypeDefinition, TypeRef, TypeSet,
};
use starberry_graph::{
    credential_schema, init_tracing, CredentialRegistry, Provider, Rule, RuleOutcome, RuleSet,
    Schema, SchemaError, UserRecord, Viewer,
};

fn user() -> UserRecord {
    UserRecord::new(
        "user-1",
        CredentialCollection::new()
            .with(
                Provider::Google,
                CredentialRecord::new("g-1", "g-token")
                    .with_picture("https://lh3.googleusercontent.com/a/photo?sz=50"),
            )
            .with(Provider::Facebook, CredentialRecord::new("123", "fb-token")),
    )
}

fn user_type() -> TypeSet {
    TypeSet::new(
        TypeDefinition::new("User")
            .field(FieldDefinition::new("id", TypeRef::non_null(TypeRef::named("ID"))))
            .field(FieldDefinition::new("credentials", TypeRef::named("CredentialCollection")).kind(FieldKind::Object))
            .field(FieldDefinition::connection("posts", "Post")),
    )
}

fn parameters(type_name: &str) -> HashMap<String, String> {
    HashMap::from([("type".to_string(), type_name.to_string())])
}

#[test]
fn test_credential_schema_registers_every_type() {
    init_tracing("starberry_graph=debug");
    let schema = credential_schema(&CredentialRegistry::new()).unwrap();
    assert_eq!(schema.types().len(), 6);
    for provider in Provider::ALL {
        assert!(schema.get_type(&provider.type_name("")).is_some());
    }
    assert!(schema.get_enum("TwitterPictureSize").is_some());
}

#[test]
fn test_init_tracing_is_idempotent() {
    let first = init_tracing("info");
    assert_eq!(init_tracing("debug"), first);
}

#[test]
fn test_end_to_end_resolution() {
    let registry = CredentialRegistry::new();
    let schema = credential_schema(&registry).unwrap();
    let collection = schema.get_type("CredentialCollection").unwrap();
    let google = schema.get_type("GoogleCredential").unwrap();
    let facebook = schema.get_type("FacebookCredential").unwrap();
    let parent = user().credentials_value();
    let none = Map::new();

    for viewer in [Viewer::admin(), Viewer::user("user-1")] {
        let ctx = ResolveContext::new(viewer);
        let record = collection.resolve_field("google", &parent, &none, &ctx).unwrap();
        let mut args = Map::new();
        args.insert("size".to_string(), json!(200));
        assert_eq!(
            google.resolve_field("picture", &record, &args, &ctx).unwrap(),
            json!("https://lh3.googleusercontent.com/a/photo?sz=200")
        );

        let record = collection.resolve_field("facebook", &parent, &none, &ctx).unwrap();
        assert_eq!(
            facebook.resolve_field("picture", &record, &none, &ctx).unwrap(),
            json!("https://graph.facebook.com/v2.3/123/picture")
        );
        assert_eq!(collection.resolve_field("twitter", &parent, &none, &ctx).unwrap(), Value::Null);
    }

    let stranger = ResolveContext::new(Viewer::user("user-2"));
    match collection.resolve_field("google", &parent, &none, &stranger) {
        Err(ResolveError::Permission(err)) => assert_eq!(err.path, "credentials.google"),
        other => panic!("expected a permission error, got {:?}", other),
    }
}

#[test]
fn test_connection_rule_on_user_type() {
    let mut schema = credential_schema(&CredentialRegistry::new()).unwrap();
    schema.register(user_type()).unwrap();

    let rule = Rule::is_connection("type");
    assert_eq!(rule.validate(&schema, "posts", &parameters("User")), Ok(RuleOutcome::Passed));
    assert_eq!(
        rule.validate(&schema, "credentials", &parameters("User")).unwrap_err().to_string(),
        "Field \"credentials\" of \"User\" is not a connection. Expected a connection field."
    );
    assert!(matches!(
        rule.validate(&schema, "friends", &parameters("User")),
        Err(SchemaError::MissingField { .. })
    ));
    // A type the schema does not know is not checked at all.
    assert_eq!(rule.validate(&schema, "posts", &parameters("Ghost")), Ok(RuleOutcome::Skipped));
}

#[test]
fn test_rule_set_with_credential_types() {
    let schema = credential_schema(&CredentialRegistry::new()).unwrap();
    let rules = RuleSet::new().rule(Rule::has_field("type")).rule(Rule::is_connection("type"));

    let errors = rules.check(&schema, "picture", &parameters("GoogleCredential"));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SchemaError::NotAConnection { .. }));

    let errors = rules.check(&schema, "avatar", &parameters("GoogleCredential"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_prefixed_schema_merges_with_unprefixed() {
    let mut schema = Schema::new();
    schema.register_all(CredentialRegistry::new().type_sets()).unwrap();
    schema.register_all(CredentialRegistry::new().type_prefix("Legacy").type_sets()).unwrap();
    assert_eq!(schema.types().len(), 12);
    assert!(schema.get_enum("LegacyTwitterPictureSize").is_some());

    let err = schema.register_all(CredentialRegistry::new().type_sets()).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateType(_)));
}

#[tokio::test]
async fn test_concurrent_resolution() {
    let schema = Arc::new(credential_schema(&CredentialRegistry::new()).unwrap());
    let parent = Arc::new(user().credentials_value());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let schema = schema.clone();
            let parent = parent.clone();
            tokio::spawn(async move {
                let viewer = if i % 4 == 0 { Viewer::anonymous() } else { Viewer::user("user-1") };
                let ctx = ResolveContext::new(viewer);
                let collection = schema.get_type("CredentialCollection").unwrap();
                (i, collection.resolve_field("google", &parent, &Map::new(), &ctx).is_ok())
            })
        })
        .collect();

    for handle in handles {
        let (i, ok) = handle.await.unwrap();
        assert_eq!(ok, i % 4 != 0);
    }
}
