//! Builds the credential types and resolves a few fields as different viewers.
//! Run with: `cargo run --example credential_schema`

use serde_json::{json, Map};
use starberry_credentials::{
    CredentialCollection, CredentialRecord, CredentialRegistry, Provider, UserRecord, Viewer,
};
use starberry_schema::{ResolveContext, Schema};

fn main() {
    let registry = CredentialRegistry::new();
    let schema = match Schema::from_type_sets(registry.type_sets()) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    for name in schema.types().keys() {
        println!("type {}", name);
    }

    let user = UserRecord::new(
        "user-1",
        CredentialCollection::new().with(
            Provider::Twitter,
            CredentialRecord::new("7", "token")
                .with_picture("http://pbs.twimg.com/profile_images/1/me_normal.jpg"),
        ),
    );
    let parent = user.credentials_value();
    let Some(collection) = schema.get_type(&registry.collection_type_name()) else {
        return;
    };
    let Some(twitter) = schema.get_type(&registry.provider_type_name(Provider::Twitter)) else {
        return;
    };

    for viewer in [Viewer::user("user-1"), Viewer::user("user-2")] {
        let ctx = ResolveContext::new(viewer.clone());
        match collection.resolve_field("twitter", &parent, &Map::new(), &ctx) {
            Ok(record) => {
                let mut args = Map::new();
                args.insert("size".to_string(), json!("bigger"));
                println!("{:?}: {:?}", viewer.user_id, twitter.resolve_field("picture", &record, &args, &ctx));
            }
            Err(err) => println!("{:?}: {}", viewer.user_id, err),
        }
    }
}
