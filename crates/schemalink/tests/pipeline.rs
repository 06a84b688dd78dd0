use schemalink::{
    Error, Output, Pipeline,
    model::RelationKind,
    schema::{Role, TypeSystem},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn types() -> TypeSystem {
    let json = fs::read_to_string(fixtures().join("schema.json")).unwrap();

    TypeSystem::from_json(&json).unwrap()
}

fn run(pipeline: &Pipeline) -> Output {
    init();
    pipeline.run(fixtures().join("models"), &types()).unwrap()
}

fn run_default() -> Output {
    run(&Pipeline::default())
}

fn field_names(output: &Output, model: &str) -> Vec<String> {
    output
        .model(model)
        .unwrap()
        .fields
        .iter()
        .map(|f| f.name.clone())
        .collect()
}

#[test]
fn relational_graph_from_generated_sources() {
    let output = run_default();
    let schema = &output.relational;

    let names: Vec<&str> = schema.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Organization", "Post", "Tag", "UserStat", "User"]);

    let user = schema.by_name("User").unwrap();
    let columns: Vec<&str> = user.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        columns,
        vec![
            "ID",
            "Email",
            "FirstName",
            "Role",
            "OrganizationID",
            "Settings",
            "Posts",
            "CreatedAt",
            "UpdatedAt",
            "DeletedAt",
        ]
    );
    assert!(user.soft_delete);
    assert_eq!(user.table_name, "users");

    let org_id = user.field("OrganizationID").unwrap();
    let relation = org_id.relation.as_ref().unwrap();
    assert_eq!(relation.kind, RelationKind::ForeignKey);
    assert_eq!(relation.target_name, "Organization");
    assert_eq!(relation.accessor, "Organization");
    assert!(!relation.to_many);

    let posts = user.field("Posts").unwrap();
    assert!(posts.is_virtual());
    assert!(posts.is_to_many());

    assert_eq!(user.field("Role").unwrap().enum_name.as_deref(), Some("UserRole"));
    assert!(user.field("Favorites").is_none());
}

#[test]
fn files_outside_the_model_set_are_ignored() {
    let output = run_default();
    let schema = &output.relational;

    assert!(schema.by_name("Broken").is_none());
    assert!(schema.by_name("UserFixture").is_none());
    assert!(schema.by_name("queryHelper").is_none());
    assert!(schema.by_name("organizationR").is_none());
}

#[test]
fn flags_follow_registries_and_keys() {
    let output = run_default();
    let schema = &output.relational;

    let stats = schema.by_name("UserStat").unwrap();
    assert!(stats.is_view);
    assert_eq!(stats.table_name, "user_stats");

    let post = schema.by_name("Post").unwrap();
    assert_eq!(post.primary_key, schemalink::model::PrimaryKeyKind::Text);
    assert!(!post.soft_delete);
    assert_eq!(post.plural_name, "Posts");
}

#[test]
fn no_relation_points_at_a_missing_model() {
    let output = run_default();
    let schema = &output.relational;

    for model in schema.iter() {
        for field in model.relations() {
            let relation = field.relation.as_ref().unwrap();
            assert_eq!(schema.target(relation).unwrap().name, relation.target_name);
            assert_eq!(schema.related(field).unwrap().name, relation.target_name);
        }
    }
    assert!(schema.by_name("Post").unwrap().field("Editor").is_none());
}

#[test]
fn unmodelled_api_types_are_excluded() {
    let output = run_default();

    assert!(output.model("Invoice").is_none());
    assert!(output.model("InvoiceCreateInput").is_none());
    assert!(output.model("PageInfo").is_none());
    assert!(output.model("Query").is_none());
    assert!(output.model("Mutation").is_none());

    let names: Vec<&str> = output.models.iter().map(|m| m.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn classification_links_roles_to_models() {
    let output = run_default();

    let role = |name: &str| output.model(name).map(|m| (m.role, m.base_name.as_str()));
    assert_eq!(role("User"), Some((Role::Normal, "User")));
    assert_eq!(role("UserCreateInput"), Some((Role::CreateInput, "User")));
    assert_eq!(role("UserWhere"), Some((Role::Where, "User")));
    assert_eq!(role("UserPayload"), Some((Role::Payload, "User")));
    assert_eq!(role("UsersPayload"), Some((Role::Payload, "User")));

    let user = output.model("User").unwrap();
    assert_eq!(user.description.as_deref(), Some("A registered account."));
    assert_eq!(user.interfaces, vec!["Node".to_string()]);
}

#[test]
fn normal_models_drop_fields_without_columns() {
    let output = run_default();

    let user = field_names(&output, "User");
    assert!(!user.contains(&"nickname".to_string()));
    assert!(user.contains(&"posts".to_string()));

    let input = field_names(&output, "UserCreateInput");
    assert!(input.contains(&"password".to_string()));
    let password = output.model("UserCreateInput").unwrap().field("password").unwrap();
    assert!(password.column.is_none());
}

#[test]
fn foreign_key_scenario() {
    let output = run_default();
    let user = output.model("User").unwrap();

    let id = user.field("id").unwrap();
    assert!(id.is_primary_id);
    assert!(id.is_primary_number_id);
    assert!(!id.is_primary_string_id);
    assert_eq!(id.convert.to_api, "boilergql.IDToGraphQL(v, \"User\")");
    assert_eq!(id.convert.to_column, "boilergql.IDToBoiler(v, \"User\")");

    let org_id = user.field("organizationId").unwrap();
    assert!(org_id.is_number_id);
    assert!(!org_id.is_primary_id);
    assert!(org_id.is_relation);
    assert_eq!(org_id.convert.to_api, "boilergql.IDToGraphQL(v, \"Organization\")");

    let organization = user.field("organization").unwrap();
    assert!(organization.is_object);
    assert!(organization.is_relation);
    assert_eq!(organization.column.as_ref().unwrap().name, "OrganizationID");
    assert!(!organization.convert.is_custom);
    assert_eq!(organization.api_type.spelling, "*Organization");

    let posts = user.field("posts").unwrap();
    assert!(posts.is_plural);
    assert_eq!(posts.api_type.spelling, "[]*Post");
}

#[test]
fn value_converters() {
    let output = run_default();
    let user = output.model("User").unwrap();

    let first_name = user.field("firstName").unwrap();
    assert_eq!(
        first_name.convert.to_column,
        "boilergql.PointerStringToNullDotString"
    );
    assert_eq!(first_name.convert.to_api, "boilergql.NullDotStringToPointerString");

    let settings = user.field("settings").unwrap();
    assert_eq!(settings.convert.to_column, "PointerStringToTypesDotJSON");

    let role = user.field("role").unwrap();
    assert_eq!(role.convert.to_column, "UserRoleToString");
    assert_eq!(role.convert.to_api, "StringToUserRole");
    assert_eq!(role.enum_def.as_ref().unwrap().name, "UserRole");

    let email = user.field("email").unwrap();
    assert!(!email.convert.is_custom);
}

#[test]
fn text_primary_keys_use_string_pipelines() {
    let output = run_default();
    let post = output.model("Post").unwrap();

    let id = post.field("id").unwrap();
    assert!(id.is_primary_string_id);
    assert_eq!(id.convert.to_api, "boilergql.StringIDToGraphQL(v, \"Post\")");

    let author = post.field("author").unwrap();
    assert_eq!(author.column.as_ref().unwrap().name, "AuthorID");
    assert_eq!(author.api_type.spelling, "*User");
}

#[test]
fn direct_preloads() {
    let output = run_default();

    let keys = |name: &str| -> Vec<String> {
        output.preloads_for(name).iter().map(|e| e.key.clone()).collect()
    };
    assert_eq!(keys("User"), vec!["organization", "posts"]);
    assert_eq!(keys("Post"), vec!["author", "tags", "user"]);
    assert_eq!(keys("Organization"), vec!["users"]);
    assert!(keys("UserPayload").is_empty());

    let author = &output.preloads_for("Post")[0];
    assert_eq!(author.expression(), "models.PostRels.Author");
    assert_eq!(author.related_model.as_deref(), Some("User"));
}

#[test]
fn enum_bindings_pair_values() {
    let output = run_default();

    let names: Vec<&str> = output.enums.iter().map(|e| e.api_enum.as_str()).collect();
    assert_eq!(names, vec!["PostStatus", "UserRole"]);

    let status = &output.enums[0];
    assert_eq!(status.model, "Post");
    assert_eq!(status.field, "Status");

    let values: Vec<(&str, &str)> = status
        .values
        .iter()
        .map(|v| (v.api.as_str(), v.value.as_str()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("DRAFT", "draft"),
            ("PUBLISHED", "published"),
            ("IN_REVIEW", "in_review"),
        ]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let first = run_default();
    let second = run_default();

    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn configuration_file_changes_naming_and_depth() {
    init();
    let pipeline = Pipeline::from_config_path(fixtures().join("schemalink.toml")).unwrap();
    assert_eq!(pipeline.config().build.backend_package, "dm");

    let output = run(&pipeline);

    let org = output.preloads_for("Organization");
    let keys: Vec<&str> = org.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["users", "users.posts"]);
    assert_eq!(
        org[1].expression(),
        "dm.OrganizationRels.Users + \".\" + dm.UserRels.Posts"
    );

    let user = output.model("User").unwrap();
    assert!(user.field("nickname").is_some());

    let created = user.field("createdAt").unwrap();
    assert!(created.api_type.overridden);
    assert_eq!(created.api_type.spelling, "time.Time");
    assert!(!created.convert.is_custom);

    assert_ne!(
        output.fingerprint().unwrap(),
        run_default().fingerprint().unwrap()
    );
}

#[test]
fn copied_directory_without_registries() {
    init();
    let dir = tempfile::tempdir().unwrap();
    for name in ["organizations.go", "users.go"] {
        fs::copy(fixtures().join("models").join(name), dir.path().join(name)).unwrap();
    }

    let output = Pipeline::default().run(dir.path(), &types()).unwrap();
    let schema = &output.relational;

    let user = schema.by_name("User").unwrap();
    assert_eq!(user.table_name, "User");
    assert!(user.enums.is_empty());
    assert!(user.field("Posts").is_none());
    assert!(output.enums.is_empty());
}

#[test]
fn missing_directory_is_an_error() {
    init();
    let err = Pipeline::default()
        .run(fixtures().join("does-not-exist"), &types())
        .unwrap_err();

    assert!(matches!(err, Error::Source(_)));
}

#[test]
fn missing_config_file_is_an_error() {
    let err = Pipeline::from_config_path(fixtures().join("missing.toml")).unwrap_err();

    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn undefined_api_type_aborts_the_run() {
    init();
    let mut types = types();
    let user = types.types.iter_mut().find(|t| t.name == "User").unwrap();
    user.fields.push(schemalink::schema::FieldDefinition::new(
        "avatar",
        schemalink::schema::TypeRef::named("Image"),
    ));

    let err = Pipeline::default()
        .run(fixtures().join("models"), &types)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Build(schemalink::build::BuildError::UnknownType(ref name)) if name == "Image"
    ));
}

#[test]
fn output_serializes_to_json() {
    let output = run_default();
    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

    assert!(json["models"].is_array());
    assert!(json["preloads"]["User"].is_array());
    assert_eq!(json["relational"]["models"][0]["name"], "Organization");
}
